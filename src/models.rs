use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum Category {
    Electronics,
    Clothing,
    #[serde(rename = "Home & Garden")]
    HomeAndGarden,
    Sports,
    Books,
    Toys,
    Beauty,
    Food,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Electronics,
        Category::Clothing,
        Category::HomeAndGarden,
        Category::Sports,
        Category::Books,
        Category::Toys,
        Category::Beauty,
        Category::Food,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::HomeAndGarden => "Home & Garden",
            Category::Sports => "Sports",
            Category::Books => "Books",
            Category::Toys => "Toys",
            Category::Beauty => "Beauty",
            Category::Food => "Food",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    pub image: String,
    pub stock: u32,
    /// Average review score, 0 to 5.
    pub rating: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Catalog entry as supplied by seeding, before it has an id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    pub image: String,
    pub stock: u32,
    #[serde(default)]
    pub rating: Decimal,
}

impl NewProduct {
    pub fn into_product(self, now: DateTime<Utc>) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            description: self.description,
            price: self.price.max(Decimal::ZERO),
            category: self.category,
            image: self.image,
            stock: self.stock,
            rating: self.rating.clamp(Decimal::ZERO, Decimal::from(5)),
            is_active: true,
            created_at: now,
        }
    }
}
