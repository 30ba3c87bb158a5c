//! Demo catalog and coupons, shared by the seed binary and the in-memory
//! server.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::{
    domain::{Coupon, DiscountType},
    models::{Category, NewProduct},
    store::{Catalog, CouponStore, ProductFilter, StoreError, StoreResult},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub products: usize,
    pub coupons: usize,
}

fn product(
    name: &str,
    description: &str,
    cents: i64,
    category: Category,
    image: &str,
    stock: u32,
    rating_tenths: i64,
) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: description.to_string(),
        price: Decimal::new(cents, 2),
        category,
        image: format!("https://images.unsplash.com/{image}?w=500&q=80"),
        stock,
        rating: Decimal::new(rating_tenths, 1),
    }
}

pub fn demo_products() -> Vec<NewProduct> {
    vec![
        product(
            "Wireless Noise-Cancelling Headphones",
            "Over-ear headphones with active noise cancellation and a 30-hour battery.",
            18999,
            Category::Electronics,
            "photo-1505740420928-5e560c06d30e",
            45,
            47,
        ),
        product(
            "Smart Fitness Watch",
            "Fitness tracker with heart rate monitoring, GPS and sleep tracking.",
            14999,
            Category::Electronics,
            "photo-1523275335684-37898b6baf30",
            60,
            45,
        ),
        product(
            "Organic Cotton T-Shirt",
            "Soft t-shirt made from 100% organic cotton.",
            799,
            Category::Clothing,
            "photo-1521572163474-6864f9cf17ab",
            150,
            43,
        ),
        product(
            "Leather Crossbody Bag",
            "Genuine leather bag with adjustable strap and several compartments.",
            4999,
            Category::Clothing,
            "photo-1548036328-c9fa89d128fa",
            35,
            46,
        ),
        product(
            "Ceramic Plant Pot Set",
            "Three handcrafted ceramic pots with drainage holes and saucers.",
            1299,
            Category::HomeAndGarden,
            "photo-1485955900006-10f4d324d411",
            80,
            44,
        ),
        product(
            "Yoga Mat Premium",
            "Non-slip yoga mat with extra cushioning and a carrying strap.",
            1499,
            Category::Sports,
            "photo-1601925260368-ae2f83cf8b7f",
            100,
            48,
        ),
        product(
            "Stainless Steel Water Bottle",
            "Insulated bottle, cold for 24 hours or hot for 12. Leak-proof.",
            699,
            Category::Sports,
            "photo-1602143407151-7111542de6e8",
            200,
            46,
        ),
        product(
            "Classic Novel Collection",
            "Hardcover set of five timeless classics.",
            2499,
            Category::Books,
            "photo-1512820790803-83ca734da794",
            50,
            49,
        ),
        product(
            "Wireless Gaming Mouse",
            "High-precision mouse with RGB lighting and programmable buttons.",
            3999,
            Category::Electronics,
            "photo-1527864550417-7fd91fc51a46",
            75,
            45,
        ),
        product(
            "Aromatherapy Diffuser",
            "Ultrasonic essential oil diffuser with LED lights and auto shut-off.",
            1299,
            Category::HomeAndGarden,
            "photo-1608571423902-eed4a5ad8108",
            90,
            44,
        ),
        product(
            "Professional Chef Knife",
            "8-inch high-carbon stainless steel knife with ergonomic handle.",
            2999,
            Category::HomeAndGarden,
            "photo-1593618998160-e34014e67546",
            40,
            47,
        ),
        product(
            "Bamboo Cutting Board Set",
            "Three bamboo cutting boards in different sizes with juice grooves.",
            1799,
            Category::HomeAndGarden,
            "photo-1556909172-54557c7e4fb7",
            65,
            45,
        ),
    ]
}

/// Demo coupons, valid relative to `now`.
pub fn demo_coupons(now: DateTime<Utc>) -> Vec<Coupon> {
    let coupon = |code: &str,
                  discount_type: DiscountType,
                  value: Decimal,
                  min_purchase: i64,
                  max_discount: Option<i64>,
                  days: i64,
                  usage_limit: Option<u32>| Coupon {
        code: code.to_string(),
        discount_type,
        discount_value: value,
        min_purchase: Decimal::from(min_purchase),
        max_discount: max_discount.map(Decimal::from),
        expiry_date: now + Duration::days(days),
        usage_limit,
        used_count: 0,
        is_active: true,
    };

    vec![
        coupon("WELCOME10", DiscountType::Percentage, Decimal::from(10), 50, Some(20), 365, Some(100)),
        coupon("SAVE20", DiscountType::Fixed, Decimal::from(20), 100, None, 365, Some(50)),
        coupon("FREESHIP", DiscountType::Fixed, Decimal::new(599, 2), 25, None, 365, None),
        coupon("FLASH50", DiscountType::Percentage, Decimal::from(50), 200, Some(100), 30, Some(20)),
    ]
}

/// Load the demo data. Products are only added to an empty catalog; coupons
/// whose code already exists are left as they are.
pub async fn seed_demo_data(
    catalog: &dyn Catalog,
    coupons: &dyn CouponStore,
) -> StoreResult<SeedSummary> {
    let now = Utc::now();
    let mut summary = SeedSummary::default();

    if catalog.products(&ProductFilter::default()).await?.is_empty() {
        for (offset, new_product) in demo_products().into_iter().enumerate() {
            // Stagger creation times so "newest first" is deterministic.
            let created_at = now - Duration::seconds(offset as i64);
            catalog.insert_product(new_product.into_product(created_at)).await?;
            summary.products += 1;
        }
    }

    for coupon in demo_coupons(now) {
        match coupons.insert_coupon(coupon).await {
            Ok(_) => summary.coupons += 1,
            Err(StoreError::Conflict(code)) => tracing::debug!(code = %code, "coupon already present"),
            Err(err) => return Err(err),
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn seeding_twice_adds_nothing_new() -> TestResult {
        let store = MemoryStore::new();

        let first = seed_demo_data(&store, &store).await?;
        assert_eq!(first.products, demo_products().len());
        assert_eq!(first.coupons, 4);

        let second = seed_demo_data(&store, &store).await?;
        assert_eq!(second, SeedSummary::default());

        let welcome = store.find_active("welcome10").await?;
        assert!(welcome.is_some_and(|c| c.max_discount == Some(Decimal::from(20))));
        Ok(())
    }
}
