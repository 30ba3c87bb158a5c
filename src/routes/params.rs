use serde::Deserialize;
use utoipa::ToSchema;

/// Catalog browse query. Prices stay strings here so a malformed value can
/// be reported instead of silently ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub search: Option<String>,
    /// A category name, or `all`.
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    /// `price_asc`, `price_desc`, `name`, `rating`; newest first otherwise.
    pub sort: Option<String>,
}
