//! In-process store for development and tests.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    domain::{Cart, Coupon, Order},
    models::{Category, Product},
    store::{
        Catalog, CartStore, CouponStore, OrderStore, ProductFilter, StockLine, StoreError,
        StoreResult, WishlistStore,
    },
};

/// Every collection sits behind its own lock. Stock reservation holds the
/// product lock across the whole check-then-decrement, so concurrent
/// checkouts cannot oversell.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<HashMap<Uuid, Product>>,
    carts: RwLock<HashMap<String, Cart>>,
    coupons: RwLock<HashMap<String, Coupon>>,
    orders: RwLock<Vec<Order>>,
    wishlists: RwLock<HashMap<String, Vec<Uuid>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an out-of-band edit to a product, as a back-office tool would.
    /// Returns the edited product, or `None` if it does not exist.
    pub async fn update_product(
        &self,
        id: Uuid,
        edit: impl FnOnce(&mut Product),
    ) -> Option<Product> {
        let mut products = self.products.write().await;
        let product = products.get_mut(&id)?;
        edit(product);
        Some(product.clone())
    }
}

#[async_trait]
impl Catalog for MemoryStore {
    async fn product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let mut items: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        filter.sort.sort(&mut items);
        Ok(items)
    }

    async fn categories(&self) -> StoreResult<Vec<Category>> {
        let categories: BTreeSet<Category> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| p.is_active)
            .map(|p| p.category)
            .collect();
        Ok(categories.into_iter().collect())
    }

    async fn insert_product(&self, product: Product) -> StoreResult<Product> {
        let mut products = self.products.write().await;
        if products.contains_key(&product.id) {
            return Err(StoreError::Conflict(product.id.to_string()));
        }
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn reserve_stock(&self, lines: &[StockLine]) -> StoreResult<()> {
        let mut products = self.products.write().await;

        let mut wanted: HashMap<Uuid, u32> = HashMap::new();
        for line in lines {
            *wanted.entry(line.product_id).or_default() += line.quantity;
        }
        for line in lines {
            let product = products
                .get(&line.product_id)
                .ok_or(StoreError::MissingProduct(line.product_id))?;
            let needed = wanted.get(&line.product_id).copied().unwrap_or(line.quantity);
            if product.stock < needed {
                return Err(StoreError::StockShortage {
                    product_id: line.product_id,
                    available: product.stock,
                });
            }
        }

        for line in lines {
            if let Some(product) = products.get_mut(&line.product_id) {
                product.stock -= line.quantity;
            }
        }
        Ok(())
    }

    async fn release_stock(&self, lines: &[StockLine]) -> StoreResult<()> {
        let mut products = self.products.write().await;
        for line in lines {
            if let Some(product) = products.get_mut(&line.product_id) {
                product.stock = product.stock.saturating_add(line.quantity);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn load(&self, user_id: &str) -> StoreResult<Option<Cart>> {
        Ok(self.carts.read().await.get(user_id).cloned())
    }

    async fn save(&self, cart: &Cart) -> StoreResult<()> {
        self.carts
            .write()
            .await
            .insert(cart.user_id().to_string(), cart.clone());
        Ok(())
    }
}

#[async_trait]
impl CouponStore for MemoryStore {
    async fn find_active(&self, code: &str) -> StoreResult<Option<Coupon>> {
        let code = Coupon::normalize_code(code);
        Ok(self
            .coupons
            .read()
            .await
            .get(&code)
            .filter(|c| c.is_active)
            .cloned())
    }

    async fn active_coupons(&self, now: DateTime<Utc>) -> StoreResult<Vec<Coupon>> {
        let mut coupons: Vec<Coupon> = self
            .coupons
            .read()
            .await
            .values()
            .filter(|c| c.is_active && !c.is_expired(now))
            .cloned()
            .collect();
        coupons.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(coupons)
    }

    async fn insert_coupon(&self, mut coupon: Coupon) -> StoreResult<Coupon> {
        coupon.code = Coupon::normalize_code(&coupon.code);
        let mut coupons = self.coupons.write().await;
        if coupons.contains_key(&coupon.code) {
            return Err(StoreError::Conflict(coupon.code));
        }
        coupons.insert(coupon.code.clone(), coupon.clone());
        Ok(coupon)
    }

    async fn redeem(&self, code: &str) -> StoreResult<()> {
        let code = Coupon::normalize_code(code);
        let mut coupons = self.coupons.write().await;
        let coupon = coupons
            .get_mut(&code)
            .ok_or_else(|| StoreError::CouponExhausted(code.clone()))?;
        if coupon.usage_exhausted() {
            return Err(StoreError::CouponExhausted(code));
        }
        coupon.used_count += 1;
        Ok(())
    }

    async fn release(&self, code: &str) -> StoreResult<()> {
        let code = Coupon::normalize_code(code);
        if let Some(coupon) = self.coupons.write().await.get_mut(&code) {
            coupon.used_count = coupon.used_count.saturating_sub(1);
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert(&self, order: &Order) -> StoreResult<()> {
        let mut orders = self.orders.write().await;
        if orders.iter().any(|o| o.order_number == order.order_number) {
            return Err(StoreError::Conflict(order.order_number.clone()));
        }
        orders.push(order.clone());
        Ok(())
    }

    async fn by_user(&self, user_id: &str, limit: u64) -> StoreResult<Vec<Order>> {
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps; reverse it.
        orders.reverse();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(limit);
        Ok(orders)
    }

    async fn by_number(&self, order_number: &str) -> StoreResult<Option<Order>> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .find(|o| o.order_number == order_number)
            .cloned())
    }
}

#[async_trait]
impl WishlistStore for MemoryStore {
    async fn wishlist(&self, user_id: &str) -> StoreResult<Vec<Uuid>> {
        Ok(self
            .wishlists
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add(&self, user_id: &str, product_id: Uuid) -> StoreResult<bool> {
        let mut wishlists = self.wishlists.write().await;
        let list = wishlists.entry(user_id.to_string()).or_default();
        if list.contains(&product_id) {
            return Ok(false);
        }
        list.push(product_id);
        Ok(true)
    }

    async fn remove(&self, user_id: &str, product_id: Uuid) -> StoreResult<bool> {
        let mut wishlists = self.wishlists.write().await;
        let Some(list) = wishlists.get_mut(user_id) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|id| *id != product_id);
        Ok(list.len() != before)
    }
}
