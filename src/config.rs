use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Absent means the process runs on the in-memory store.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub seed_demo_data: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let seed_demo_data = env::var("SEED_DEMO_DATA")
            .ok()
            .map(|v| parse_flag(&v))
            .unwrap_or(database_url.is_none());
        Ok(Self {
            database_url,
            host,
            port,
            seed_demo_data,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
