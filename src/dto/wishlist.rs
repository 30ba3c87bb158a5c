use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::products::ProductDto;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToWishlistRequest {
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct WishlistView {
    #[schema(value_type = Vec<ProductDto>)]
    pub items: Vec<ProductDto>,
}
