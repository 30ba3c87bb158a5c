use std::str::FromStr;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    dto::products::{CategoryList, ProductDto, ProductList},
    error::{AppError, AppResult},
    models::Category,
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    state::AppState,
    store::{ProductFilter, ProductSort},
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let filter = filter_from_query(query)?;
    let items: Vec<ProductDto> = state
        .catalog
        .products(&filter)
        .await?
        .into_iter()
        .map(ProductDto::from)
        .collect();

    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ProductDto>> {
    let product = state
        .catalog
        .product(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(ApiResponse::success("Product", product.into(), None))
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = state.catalog.categories().await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Categories", CategoryList { items }, Some(meta)))
}

fn filter_from_query(query: ProductQuery) -> AppResult<ProductFilter> {
    let category = match query.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(c) if c.eq_ignore_ascii_case("all") => None,
        Some(c) => Some(
            c.parse::<Category>()
                .map_err(|e| AppError::Validation(e.to_string()))?,
        ),
    };

    Ok(ProductFilter {
        search: query.search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        category,
        min_price: parse_price(query.min_price, "minPrice")?,
        max_price: parse_price(query.max_price, "maxPrice")?,
        sort: query
            .sort
            .as_deref()
            .map(ProductSort::parse)
            .unwrap_or_default(),
    })
}

fn parse_price(raw: Option<String>, field: &str) -> AppResult<Option<Decimal>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Decimal::from_str(value)
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{field} must be a number"))),
    }
}
