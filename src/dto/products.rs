use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Category, Product};

/// A product as the storefront shows it.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(flatten)]
    pub product: Product,
    pub in_stock: bool,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            in_stock: product.in_stock(),
            product,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<ProductDto>)]
    pub items: Vec<ProductDto>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}
