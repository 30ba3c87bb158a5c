#![allow(dead_code)]

use std::{
    collections::HashSet,
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use storefront_api::{
    domain::{Coupon, CustomerInfo, DiscountType, Order},
    dto::{cart::AddToCartRequest, orders::CheckoutRequest},
    models::{Category, NewProduct, Product},
    state::AppState,
    store::{
        Catalog, MemoryStore, OrderStore, ProductFilter, StockLine, StoreError, StoreResult,
    },
};
use uuid::Uuid;

pub fn money(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap_or_default()
}

pub struct Fixture {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

pub fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    Fixture {
        state: AppState::from_store(store.clone()),
        store,
    }
}

pub async fn add_product(
    store: &MemoryStore,
    name: &str,
    price: &str,
    stock: u32,
) -> anyhow::Result<Product> {
    let product = NewProduct {
        name: name.to_string(),
        description: format!("{name} for testing"),
        price: money(price),
        category: Category::Sports,
        image: format!("https://img.example/{}.jpg", name.to_lowercase().replace(' ', "-")),
        stock,
        rating: Decimal::ZERO,
    }
    .into_product(Utc::now());
    Ok(store.insert_product(product).await?)
}

pub async fn stock_of(store: &MemoryStore, id: Uuid) -> anyhow::Result<u32> {
    store
        .product(id)
        .await?
        .map(|p| p.stock)
        .ok_or_else(|| anyhow::anyhow!("product {id} missing"))
}

pub fn coupon(code: &str, discount_type: DiscountType, value: &str) -> Coupon {
    Coupon {
        code: code.to_string(),
        discount_type,
        discount_value: money(value),
        min_purchase: Decimal::ZERO,
        max_discount: None,
        expiry_date: Utc::now() + Duration::days(30),
        usage_limit: None,
        used_count: 0,
        is_active: true,
    }
}

pub fn add_request(user_id: &str, product_id: Uuid, quantity: i64) -> AddToCartRequest {
    AddToCartRequest {
        user_id: user_id.to_string(),
        product_id: Some(product_id),
        quantity,
    }
}

pub fn customer() -> CustomerInfo {
    CustomerInfo {
        name: " Ada Lovelace ".into(),
        email: " Ada@Example.com ".into(),
        phone: Some("+1 (555) 010-2030".into()),
        address: Some("12 Analytical Row".into()),
    }
}

pub fn checkout_request(user_id: &str, coupon_code: Option<&str>) -> CheckoutRequest {
    CheckoutRequest {
        user_id: user_id.to_string(),
        customer_info: Some(customer()),
        notes: None,
        coupon_code: coupon_code.map(str::to_string),
    }
}

/// Catalog over a [`MemoryStore`] whose products can be made to disappear.
pub struct VanishingCatalog {
    inner: Arc<MemoryStore>,
    hidden: Mutex<HashSet<Uuid>>,
}

impl VanishingCatalog {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            hidden: Mutex::new(HashSet::new()),
        }
    }

    pub fn hide(&self, id: Uuid) {
        if let Ok(mut hidden) = self.hidden.lock() {
            hidden.insert(id);
        }
    }

    fn is_hidden(&self, id: Uuid) -> bool {
        self.hidden.lock().map(|h| h.contains(&id)).unwrap_or(false)
    }
}

#[async_trait]
impl Catalog for VanishingCatalog {
    async fn product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        if self.is_hidden(id) {
            return Ok(None);
        }
        self.inner.product(id).await
    }

    async fn products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let mut items = self.inner.products(filter).await?;
        items.retain(|p| !self.is_hidden(p.id));
        Ok(items)
    }

    async fn categories(&self) -> StoreResult<Vec<Category>> {
        self.inner.categories().await
    }

    async fn insert_product(&self, product: Product) -> StoreResult<Product> {
        self.inner.insert_product(product).await
    }

    async fn reserve_stock(&self, lines: &[StockLine]) -> StoreResult<()> {
        if let Some(line) = lines.iter().find(|l| self.is_hidden(l.product_id)) {
            return Err(StoreError::MissingProduct(line.product_id));
        }
        self.inner.reserve_stock(lines).await
    }

    async fn release_stock(&self, lines: &[StockLine]) -> StoreResult<()> {
        self.inner.release_stock(lines).await
    }
}

/// Order store that rejects the first `conflicts` inserts as duplicates, or
/// every insert when `broken`.
pub struct FlakyOrders {
    inner: Arc<MemoryStore>,
    conflicts: AtomicU32,
    broken: bool,
    pub attempts: AtomicU32,
}

impl FlakyOrders {
    pub fn conflicting(inner: Arc<MemoryStore>, conflicts: u32) -> Self {
        Self {
            inner,
            conflicts: AtomicU32::new(conflicts),
            broken: false,
            attempts: AtomicU32::new(0),
        }
    }

    pub fn broken(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            conflicts: AtomicU32::new(0),
            broken: true,
            attempts: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl OrderStore for FlakyOrders {
    async fn insert(&self, order: &Order) -> StoreResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.broken {
            return Err(StoreError::Corrupt("order table unavailable".into()));
        }
        let remaining = self.conflicts.load(Ordering::SeqCst);
        if remaining > 0 {
            self.conflicts.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Conflict(order.order_number.clone()));
        }
        self.inner.insert(order).await
    }

    async fn by_user(&self, user_id: &str, limit: u64) -> StoreResult<Vec<Order>> {
        self.inner.by_user(user_id, limit).await
    }

    async fn by_number(&self, order_number: &str) -> StoreResult<Option<Order>> {
        self.inner.by_number(order_number).await
    }
}
