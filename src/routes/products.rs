use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::products::{CategoryList, ProductDto, ProductList},
    error::AppResult,
    response::ApiResponse,
    routes::{extract::ApiPath, params::ProductQuery},
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/categories/list", get(list_categories))
        .route("/{id}", get(get_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive match on name or description"),
        ("category" = Option<String>, Query, description = "Category name, or `all`"),
        ("minPrice" = Option<String>, Query, description = "Lowest price, inclusive"),
        ("maxPrice" = Option<String>, Query, description = "Highest price, inclusive"),
        ("sort" = Option<String>, Query, description = "price_asc, price_desc, name, rating; default newest")
    ),
    responses(
        (status = 200, description = "List active products", body = ApiResponse<ProductList>),
        (status = 400, description = "Malformed filter")
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<ProductDto>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<ProductDto>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/categories/list",
    responses(
        (status = 200, description = "Categories of active products", body = ApiResponse<CategoryList>)
    ),
    tag = "Products"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = product_service::list_categories(&state).await?;
    Ok(Json(resp))
}
