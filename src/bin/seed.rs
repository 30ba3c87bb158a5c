use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    seed::seed_demo_data,
    store::PgStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let database_url = config
        .database_url
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set to seed the database"))?;

    let orm = create_orm_conn(&database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let store = PgStore::new(orm);
    let summary = seed_demo_data(&store, &store).await?;

    println!(
        "Seed completed. {} products, {} coupons added",
        summary.products, summary.coupons
    );
    Ok(())
}
