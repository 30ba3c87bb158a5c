//! Persistence seams.
//!
//! Services only ever talk to these traits, so a test can swap any one of them
//! for a fake. Two backends ship with the crate: [`memory::MemoryStore`] and
//! [`postgres::PgStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    domain::{Cart, Coupon, Order},
    models::{Category, Product},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    Conflict(String),

    #[error("product {0} does not exist")]
    MissingProduct(Uuid),

    #[error("product {product_id} has only {available} in stock")]
    StockShortage { product_id: Uuid, available: u32 },

    #[error("coupon {0} has no remaining uses")]
    CouponExhausted(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("ORM error")]
    Orm(#[from] sea_orm::DbErr),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One product/quantity pair of a stock reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLine {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSort {
    PriceAsc,
    PriceDesc,
    Name,
    Rating,
    #[default]
    Newest,
}

impl ProductSort {
    pub fn parse(s: &str) -> Self {
        match s {
            "price_asc" => ProductSort::PriceAsc,
            "price_desc" => ProductSort::PriceDesc,
            "name" => ProductSort::Name,
            "rating" => ProductSort::Rating,
            _ => ProductSort::Newest,
        }
    }

    /// In-process ordering; the database backend mirrors it in SQL.
    pub fn sort(&self, products: &mut [Product]) {
        match self {
            ProductSort::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
            ProductSort::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
            ProductSort::Name => products.sort_by(|a, b| a.name.cmp(&b.name)),
            ProductSort::Rating => products.sort_by(|a, b| b.rating.cmp(&a.rating)),
            ProductSort::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
    }
}

/// Catalog browse filter. Only active products ever match.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<Category>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: ProductSort,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if !product.is_active {
            return false;
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            if !product.name.to_lowercase().contains(&needle)
                && !product.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if self.category.is_some_and(|c| c != product.category) {
            return false;
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        true
    }
}

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn product(&self, id: Uuid) -> StoreResult<Option<Product>>;

    async fn products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>>;

    /// Distinct categories of active products.
    async fn categories(&self) -> StoreResult<Vec<Category>>;

    async fn insert_product(&self, product: Product) -> StoreResult<Product>;

    /// Decrement stock for every line, or for none of them.
    ///
    /// Fails with [`StoreError::MissingProduct`] or
    /// [`StoreError::StockShortage`] for the first line that cannot be served.
    async fn reserve_stock(&self, lines: &[StockLine]) -> StoreResult<()>;

    /// Give back a reservation made by [`Catalog::reserve_stock`].
    async fn release_stock(&self, lines: &[StockLine]) -> StoreResult<()>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
    async fn load(&self, user_id: &str) -> StoreResult<Option<Cart>>;

    /// Replace the stored cart for `cart.user_id()`. Last write wins.
    async fn save(&self, cart: &Cart) -> StoreResult<()>;
}

#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Active coupon by normalized code.
    async fn find_active(&self, code: &str) -> StoreResult<Option<Coupon>>;

    /// Active coupons that have not expired at `now`.
    async fn active_coupons(&self, now: DateTime<Utc>) -> StoreResult<Vec<Coupon>>;

    async fn insert_coupon(&self, coupon: Coupon) -> StoreResult<Coupon>;

    /// Count one use, unless the usage limit is already reached.
    async fn redeem(&self, code: &str) -> StoreResult<()>;

    /// Undo one [`CouponStore::redeem`].
    async fn release(&self, code: &str) -> StoreResult<()>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Append an order. Fails with [`StoreError::Conflict`] if the order
    /// number is taken.
    async fn insert(&self, order: &Order) -> StoreResult<()>;

    /// Most recent first.
    async fn by_user(&self, user_id: &str, limit: u64) -> StoreResult<Vec<Order>>;

    async fn by_number(&self, order_number: &str) -> StoreResult<Option<Order>>;
}

#[async_trait]
pub trait WishlistStore: Send + Sync {
    async fn wishlist(&self, user_id: &str) -> StoreResult<Vec<Uuid>>;

    /// Returns false if the product was already listed.
    async fn add(&self, user_id: &str, product_id: Uuid) -> StoreResult<bool>;

    /// Returns false if the product was not listed.
    async fn remove(&self, user_id: &str, product_id: Uuid) -> StoreResult<bool>;
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::models::NewProduct;

    fn product(name: &str, price: &str, category: Category) -> Product {
        NewProduct {
            name: name.into(),
            description: "Ceramic, dishwasher safe".into(),
            price: Decimal::from_str(price).unwrap_or_default(),
            category,
            image: String::new(),
            stock: 1,
            rating: Decimal::ZERO,
        }
        .into_product(Utc::now())
    }

    #[test]
    fn filter_matches_search_category_and_price() {
        let mug = product("Ferris Mug", "12.00", Category::HomeAndGarden);
        let filter = ProductFilter {
            search: Some("ceramic".into()),
            category: Some(Category::HomeAndGarden),
            min_price: Decimal::from_str("10").ok(),
            max_price: Decimal::from_str("12").ok(),
            ..Default::default()
        };
        assert!(filter.matches(&mug));

        let cheaper = ProductFilter {
            max_price: Decimal::from_str("11.99").ok(),
            ..Default::default()
        };
        assert!(!cheaper.matches(&mug));

        let other_category = ProductFilter {
            category: Some(Category::Books),
            ..Default::default()
        };
        assert!(!other_category.matches(&mug));
    }

    #[test]
    fn inactive_products_never_match() {
        let mut mug = product("Ferris Mug", "12.00", Category::HomeAndGarden);
        mug.is_active = false;
        assert!(!ProductFilter::default().matches(&mug));
    }

    #[test]
    fn sort_by_price() {
        let mut items = vec![
            product("b", "3", Category::Food),
            product("a", "1", Category::Food),
            product("c", "2", Category::Food),
        ];
        ProductSort::parse("price_desc").sort(&mut items);
        let names: Vec<&str> = items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["b", "c", "a"]);
    }
}
