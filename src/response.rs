use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    /// Number of records in `data` for list endpoints.
    pub count: Option<usize>,
}

impl Meta {
    pub fn count(count: usize) -> Self {
        Self { count: Some(count) }
    }

    pub fn empty() -> Self {
        Self { count: None }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            meta,
        }
    }

    pub fn failure(message: impl Into<String>, data: T) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Some(data),
            meta: Some(Meta::empty()),
        }
    }
}
