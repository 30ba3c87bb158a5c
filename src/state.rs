use std::sync::Arc;

use crate::store::{Catalog, CartStore, CouponStore, MemoryStore, OrderStore, WishlistStore};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn Catalog>,
    pub carts: Arc<dyn CartStore>,
    pub coupons: Arc<dyn CouponStore>,
    pub orders: Arc<dyn OrderStore>,
    pub wishlists: Arc<dyn WishlistStore>,
}

impl AppState {
    /// Serve every store trait from one backend.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: Catalog + CartStore + CouponStore + OrderStore + WishlistStore + 'static,
    {
        Self {
            catalog: store.clone(),
            carts: store.clone(),
            coupons: store.clone(),
            orders: store.clone(),
            wishlists: store,
        }
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    /// Swap the product catalog, keeping the other stores.
    pub fn with_catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
        self.catalog = catalog;
        self
    }
}
