//! Postgres store on sea-orm.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
    sea_query::{Expr, OnConflict, extension::postgres::PgExpr},
};
use uuid::Uuid;

use crate::{
    domain::{Cart, CartItem, Coupon, CustomerInfo, DiscountType, Order, OrderItem, OrderStatus},
    entity::{
        CartItems, Carts, Coupons, OrderItems, Orders, Products, WishlistItems, cart_items, carts,
        coupons, order_items, orders, products, wishlist_items,
    },
    models::{Category, Product},
    store::{
        Catalog, CartStore, CouponStore, OrderStore, ProductFilter, ProductSort, StockLine,
        StoreError, StoreResult, WishlistStore,
    },
};

#[derive(Debug, Clone)]
pub struct PgStore {
    orm: DatabaseConnection,
}

impl PgStore {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }

    async fn order_items<C: ConnectionTrait>(
        conn: &C,
        order_ids: Vec<Uuid>,
    ) -> StoreResult<HashMap<Uuid, Vec<OrderItem>>> {
        let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        if order_ids.is_empty() {
            return Ok(grouped);
        }
        let rows = OrderItems::find()
            .filter(order_items::Column::OrderId.is_in(order_ids))
            .order_by_asc(order_items::Column::Position)
            .all(conn)
            .await?;
        for row in rows {
            grouped
                .entry(row.order_id)
                .or_default()
                .push(order_item_from_entity(row)?);
        }
        Ok(grouped)
    }
}

fn to_i32(value: u32, what: &str) -> StoreResult<i32> {
    i32::try_from(value).map_err(|_| StoreError::Corrupt(format!("{what} {value} out of range")))
}

fn to_u32(value: i32, what: &str) -> StoreResult<u32> {
    u32::try_from(value).map_err(|_| StoreError::Corrupt(format!("negative {what}: {value}")))
}

fn conflict_or(err: DbErr, key: &str) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::Conflict(key.to_string()),
        _ => StoreError::Orm(err),
    }
}

fn product_from_entity(model: products::Model) -> StoreResult<Product> {
    let category = model
        .category
        .parse::<Category>()
        .map_err(|e| StoreError::Corrupt(e.to_string()))?;
    Ok(Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        category,
        image: model.image,
        stock: to_u32(model.stock, "stock")?,
        rating: model.rating,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

fn coupon_from_entity(model: coupons::Model) -> StoreResult<Coupon> {
    let discount_type = DiscountType::parse(&model.discount_type).ok_or_else(|| {
        StoreError::Corrupt(format!("unknown discount type {}", model.discount_type))
    })?;
    Ok(Coupon {
        code: model.code,
        discount_type,
        discount_value: model.discount_value,
        min_purchase: model.min_purchase,
        max_discount: model.max_discount,
        expiry_date: model.expiry_date.with_timezone(&Utc),
        usage_limit: model
            .usage_limit
            .map(|l| to_u32(l, "usage limit"))
            .transpose()?,
        used_count: to_u32(model.used_count, "used count")?,
        is_active: model.is_active,
    })
}

fn order_item_from_entity(model: order_items::Model) -> StoreResult<OrderItem> {
    Ok(OrderItem {
        product_id: model.product_id,
        product_name: model.product_name,
        product_image: model.product_image,
        quantity: to_u32(model.quantity, "quantity")?,
        price: model.price,
        subtotal: model.subtotal,
    })
}

fn order_from_entity(model: orders::Model, items: Vec<OrderItem>) -> StoreResult<Order> {
    let status = OrderStatus::parse(&model.status)
        .ok_or_else(|| StoreError::Corrupt(format!("unknown order status {}", model.status)))?;
    Ok(Order {
        id: model.id,
        order_number: model.order_number,
        user_id: model.user_id,
        items,
        total: model.total,
        coupon_code: model.coupon_code,
        discount: model.discount,
        amount_due: model.amount_due,
        customer_info: CustomerInfo {
            name: model.customer_name,
            email: model.customer_email,
            phone: model.customer_phone,
            address: model.customer_address,
        },
        status,
        payment_method: model.payment_method,
        notes: model.notes,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

/// `ILIKE` pattern matching `search` as a literal substring. Backslash is the
/// default escape character in Postgres.
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl Catalog for PgStore {
    async fn product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        Products::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(product_from_entity)
            .transpose()
    }

    async fn products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let mut condition = Condition::all().add(products::Column::IsActive.eq(true));

        if let Some(search) = filter.search.as_ref().filter(|s| !s.is_empty()) {
            let pattern = contains_pattern(search);
            condition = condition.add(
                Condition::any()
                    .add(Expr::col(products::Column::Name).ilike(pattern.clone()))
                    .add(Expr::col(products::Column::Description).ilike(pattern)),
            );
        }
        if let Some(category) = filter.category {
            condition = condition.add(products::Column::Category.eq(category.as_str()));
        }
        if let Some(min_price) = filter.min_price {
            condition = condition.add(products::Column::Price.gte(min_price));
        }
        if let Some(max_price) = filter.max_price {
            condition = condition.add(products::Column::Price.lte(max_price));
        }

        let finder = Products::find().filter(condition);
        let finder = match filter.sort {
            ProductSort::PriceAsc => finder.order_by_asc(products::Column::Price),
            ProductSort::PriceDesc => finder.order_by_desc(products::Column::Price),
            ProductSort::Name => finder.order_by_asc(products::Column::Name),
            ProductSort::Rating => finder.order_by_desc(products::Column::Rating),
            ProductSort::Newest => finder.order_by_desc(products::Column::CreatedAt),
        };

        finder
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect()
    }

    async fn categories(&self) -> StoreResult<Vec<Category>> {
        let names: Vec<String> = Products::find()
            .select_only()
            .column(products::Column::Category)
            .distinct()
            .filter(products::Column::IsActive.eq(true))
            .into_tuple()
            .all(&self.orm)
            .await?;

        let mut categories = names
            .iter()
            .map(|n| n.parse::<Category>().map_err(|e| StoreError::Corrupt(e.to_string())))
            .collect::<StoreResult<Vec<_>>>()?;
        categories.sort();
        Ok(categories)
    }

    async fn insert_product(&self, product: Product) -> StoreResult<Product> {
        let key = product.id.to_string();
        let active = products::ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            category: Set(product.category.as_str().to_string()),
            image: Set(product.image),
            stock: Set(to_i32(product.stock, "stock")?),
            rating: Set(product.rating),
            is_active: Set(product.is_active),
            created_at: Set(product.created_at.into()),
        };
        let model = active
            .insert(&self.orm)
            .await
            .map_err(|e| conflict_or(e, &key))?;
        product_from_entity(model)
    }

    async fn reserve_stock(&self, lines: &[StockLine]) -> StoreResult<()> {
        let txn = self.orm.begin().await?;

        for line in lines {
            let quantity = to_i32(line.quantity, "quantity")?;
            let result = Products::update_many()
                .col_expr(
                    products::Column::Stock,
                    Expr::col(products::Column::Stock).sub(quantity),
                )
                .filter(products::Column::Id.eq(line.product_id))
                .filter(products::Column::Stock.gte(quantity))
                .exec(&txn)
                .await?;

            if result.rows_affected == 0 {
                let current = Products::find_by_id(line.product_id).one(&txn).await?;
                txn.rollback().await?;
                return Err(match current {
                    None => StoreError::MissingProduct(line.product_id),
                    Some(p) => StoreError::StockShortage {
                        product_id: line.product_id,
                        available: to_u32(p.stock, "stock")?,
                    },
                });
            }
        }

        txn.commit().await?;
        Ok(())
    }

    async fn release_stock(&self, lines: &[StockLine]) -> StoreResult<()> {
        let txn = self.orm.begin().await?;
        for line in lines {
            Products::update_many()
                .col_expr(
                    products::Column::Stock,
                    Expr::col(products::Column::Stock).add(to_i32(line.quantity, "quantity")?),
                )
                .filter(products::Column::Id.eq(line.product_id))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl CartStore for PgStore {
    async fn load(&self, user_id: &str) -> StoreResult<Option<Cart>> {
        let Some(cart) = Carts::find_by_id(user_id.to_string()).one(&self.orm).await? else {
            return Ok(None);
        };

        let items = CartItems::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .order_by_asc(cart_items::Column::Position)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(|row| {
                Ok(CartItem {
                    product_id: row.product_id,
                    quantity: to_u32(row.quantity, "quantity")?,
                    price: row.price,
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(Some(Cart::restore(
            cart.user_id,
            items,
            cart.last_updated.with_timezone(&Utc),
        )))
    }

    async fn save(&self, cart: &Cart) -> StoreResult<()> {
        let txn = self.orm.begin().await?;

        Carts::insert(carts::ActiveModel {
            user_id: Set(cart.user_id().to_string()),
            total: Set(cart.total()),
            last_updated: Set(cart.last_updated().into()),
        })
        .on_conflict(
            OnConflict::column(carts::Column::UserId)
                .update_columns([carts::Column::Total, carts::Column::LastUpdated])
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

        CartItems::delete_many()
            .filter(cart_items::Column::UserId.eq(cart.user_id()))
            .exec(&txn)
            .await?;

        let rows = cart
            .items()
            .iter()
            .enumerate()
            .map(|(position, item)| {
                Ok(cart_items::ActiveModel {
                    user_id: Set(cart.user_id().to_string()),
                    product_id: Set(item.product_id),
                    position: Set(i32::try_from(position).map_err(|_| {
                        StoreError::Corrupt(format!("cart position {position} out of range"))
                    })?),
                    quantity: Set(to_i32(item.quantity, "quantity")?),
                    price: Set(item.price),
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        if !rows.is_empty() {
            CartItems::insert_many(rows)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl CouponStore for PgStore {
    async fn find_active(&self, code: &str) -> StoreResult<Option<Coupon>> {
        Coupons::find_by_id(Coupon::normalize_code(code))
            .filter(coupons::Column::IsActive.eq(true))
            .one(&self.orm)
            .await?
            .map(coupon_from_entity)
            .transpose()
    }

    async fn active_coupons(&self, now: DateTime<Utc>) -> StoreResult<Vec<Coupon>> {
        Coupons::find()
            .filter(coupons::Column::IsActive.eq(true))
            .filter(coupons::Column::ExpiryDate.gte(now))
            .order_by_asc(coupons::Column::Code)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(coupon_from_entity)
            .collect()
    }

    async fn insert_coupon(&self, coupon: Coupon) -> StoreResult<Coupon> {
        let code = Coupon::normalize_code(&coupon.code);
        let active = coupons::ActiveModel {
            code: Set(code.clone()),
            discount_type: Set(coupon.discount_type.as_str().to_string()),
            discount_value: Set(coupon.discount_value),
            min_purchase: Set(coupon.min_purchase),
            max_discount: Set(coupon.max_discount),
            expiry_date: Set(coupon.expiry_date.into()),
            usage_limit: Set(coupon
                .usage_limit
                .map(|l| to_i32(l, "usage limit"))
                .transpose()?),
            used_count: Set(to_i32(coupon.used_count, "used count")?),
            is_active: Set(coupon.is_active),
        };
        let model = active
            .insert(&self.orm)
            .await
            .map_err(|e| conflict_or(e, &code))?;
        coupon_from_entity(model)
    }

    async fn redeem(&self, code: &str) -> StoreResult<()> {
        let code = Coupon::normalize_code(code);
        let result = Coupons::update_many()
            .col_expr(
                coupons::Column::UsedCount,
                Expr::col(coupons::Column::UsedCount).add(1),
            )
            .filter(coupons::Column::Code.eq(code.as_str()))
            .filter(
                Condition::any()
                    .add(coupons::Column::UsageLimit.is_null())
                    .add(
                        Expr::col(coupons::Column::UsedCount)
                            .lt(Expr::col(coupons::Column::UsageLimit)),
                    ),
            )
            .exec(&self.orm)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::CouponExhausted(code));
        }
        Ok(())
    }

    async fn release(&self, code: &str) -> StoreResult<()> {
        Coupons::update_many()
            .col_expr(
                coupons::Column::UsedCount,
                Expr::col(coupons::Column::UsedCount).sub(1),
            )
            .filter(coupons::Column::Code.eq(Coupon::normalize_code(code)))
            .filter(coupons::Column::UsedCount.gt(0))
            .exec(&self.orm)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn insert(&self, order: &Order) -> StoreResult<()> {
        let txn = self.orm.begin().await?;

        orders::ActiveModel {
            id: Set(order.id),
            order_number: Set(order.order_number.clone()),
            user_id: Set(order.user_id.clone()),
            total: Set(order.total),
            coupon_code: Set(order.coupon_code.clone()),
            discount: Set(order.discount),
            amount_due: Set(order.amount_due),
            customer_name: Set(order.customer_info.name.clone()),
            customer_email: Set(order.customer_info.email.clone()),
            customer_phone: Set(order.customer_info.phone.clone()),
            customer_address: Set(order.customer_info.address.clone()),
            status: Set(order.status.as_str().to_string()),
            payment_method: Set(order.payment_method.clone()),
            notes: Set(order.notes.clone()),
            created_at: Set(order.created_at.into()),
        }
        .insert(&txn)
        .await
        .map_err(|e| conflict_or(e, &order.order_number))?;

        let rows = order
            .items
            .iter()
            .enumerate()
            .map(|(position, item)| {
                Ok(order_items::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    order_id: Set(order.id),
                    position: Set(i32::try_from(position).map_err(|_| {
                        StoreError::Corrupt(format!("order position {position} out of range"))
                    })?),
                    product_id: Set(item.product_id),
                    product_name: Set(item.product_name.clone()),
                    product_image: Set(item.product_image.clone()),
                    quantity: Set(to_i32(item.quantity, "quantity")?),
                    price: Set(item.price),
                    subtotal: Set(item.subtotal),
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        if !rows.is_empty() {
            OrderItems::insert_many(rows)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn by_user(&self, user_id: &str, limit: u64) -> StoreResult<Vec<Order>> {
        let rows = Orders::find()
            .filter(orders::Column::UserId.eq(user_id))
            .order_by_desc(orders::Column::CreatedAt)
            .limit(limit)
            .all(&self.orm)
            .await?;

        let mut items = Self::order_items(&self.orm, rows.iter().map(|o| o.id).collect()).await?;

        rows.into_iter()
            .map(|row| {
                let lines = items.remove(&row.id).unwrap_or_default();
                order_from_entity(row, lines)
            })
            .collect()
    }

    async fn by_number(&self, order_number: &str) -> StoreResult<Option<Order>> {
        let Some(row) = Orders::find()
            .filter(orders::Column::OrderNumber.eq(order_number))
            .one(&self.orm)
            .await?
        else {
            return Ok(None);
        };

        let mut items = Self::order_items(&self.orm, vec![row.id]).await?;
        let lines = items.remove(&row.id).unwrap_or_default();
        order_from_entity(row, lines).map(Some)
    }
}

#[async_trait]
impl WishlistStore for PgStore {
    async fn wishlist(&self, user_id: &str) -> StoreResult<Vec<Uuid>> {
        Ok(WishlistItems::find()
            .filter(wishlist_items::Column::UserId.eq(user_id))
            .order_by_asc(wishlist_items::Column::CreatedAt)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(|row| row.product_id)
            .collect())
    }

    async fn add(&self, user_id: &str, product_id: Uuid) -> StoreResult<bool> {
        let inserted = WishlistItems::insert(wishlist_items::ActiveModel {
            user_id: Set(user_id.to_string()),
            product_id: Set(product_id),
            created_at: Set(Utc::now().into()),
        })
        .on_conflict(
            OnConflict::columns([
                wishlist_items::Column::UserId,
                wishlist_items::Column::ProductId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&self.orm)
        .await?;
        Ok(inserted > 0)
    }

    async fn remove(&self, user_id: &str, product_id: Uuid) -> StoreResult<bool> {
        let result = WishlistItems::delete_many()
            .filter(wishlist_items::Column::UserId.eq(user_id))
            .filter(wishlist_items::Column::ProductId.eq(product_id))
            .exec(&self.orm)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
