//! Cart engine.
//!
//! A [`Cart`] is a per-user list of line items, each holding the unit price
//! captured when the product was first added. The cart total is never set
//! directly: every mutation ends in [`Cart::finalize`], which re-derives it as
//! `round2(Σ price × quantity)`. Stock checks are the caller's job.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::money::{line_total, round2};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Item not found in cart")]
    ItemNotFound(Uuid),

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Price cannot be negative")]
    NegativePrice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: Uuid,
    pub quantity: u32,
    /// Unit price snapshot taken on first add.
    pub price: Decimal,
}

impl CartItem {
    pub fn subtotal(&self) -> Decimal {
        line_total(self.price, self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CartDocument")]
pub struct Cart {
    user_id: String,
    items: Vec<CartItem>,
    total: Decimal,
    last_updated: DateTime<Utc>,
}

/// Wire/storage shape of a cart. Converting it into a [`Cart`] re-derives the
/// total from the items, so a stored total can never drift from its lines.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartDocument {
    user_id: String,
    items: Vec<CartItem>,
    last_updated: DateTime<Utc>,
}

impl From<CartDocument> for Cart {
    fn from(doc: CartDocument) -> Self {
        Cart::restore(doc.user_id, doc.items, doc.last_updated)
    }
}

impl Cart {
    /// Empty cart for `user_id`.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            items: Vec::new(),
            total: Decimal::ZERO,
            last_updated: Utc::now(),
        }
    }

    /// Rebuild a cart read back from storage.
    ///
    /// Duplicate lines for one product are merged, keeping the first price.
    pub fn restore(
        user_id: impl Into<String>,
        items: Vec<CartItem>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        let mut merged: Vec<CartItem> = Vec::with_capacity(items.len());
        for item in items {
            match merged.iter_mut().find(|i| i.product_id == item.product_id) {
                Some(existing) => existing.quantity += item.quantity,
                None => merged.push(item),
            }
        }

        let mut cart = Self {
            user_id: user_id.into(),
            items: merged,
            total: Decimal::ZERO,
            last_updated,
        };
        cart.total = cart.recomputed_total();
        cart
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn item(&self, product_id: Uuid) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `quantity` of a product. An existing line keeps its original price
    /// and only grows in quantity; `price` is used for new lines only.
    pub fn add_item(
        &mut self,
        product_id: Uuid,
        quantity: u32,
        price: Decimal,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(existing) => existing.quantity += quantity,
            None => {
                if price.is_sign_negative() {
                    return Err(CartError::NegativePrice);
                }
                self.items.push(CartItem {
                    product_id,
                    quantity,
                    price,
                });
            }
        }

        self.finalize();
        Ok(())
    }

    /// Overwrite a line's quantity. Zero removes the line.
    pub fn update_item_quantity(&mut self, product_id: Uuid, quantity: u32) -> Result<(), CartError> {
        let Some(position) = self.items.iter().position(|i| i.product_id == product_id) else {
            return Err(CartError::ItemNotFound(product_id));
        };

        if quantity == 0 {
            self.items.remove(position);
        } else if let Some(item) = self.items.get_mut(position) {
            item.quantity = quantity;
        }

        self.finalize();
        Ok(())
    }

    /// Remove a line if present.
    pub fn remove_item(&mut self, product_id: Uuid) {
        self.items.retain(|i| i.product_id != product_id);
        self.finalize();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.finalize();
    }

    /// Drop every line for which `keep` returns false. Returns how many lines
    /// were dropped; the cart is only re-finalized when something changed.
    pub fn retain_items(&mut self, mut keep: impl FnMut(&CartItem) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|i| keep(i));
        let dropped = before - self.items.len();
        if dropped > 0 {
            self.finalize();
        }
        dropped
    }

    /// Re-derive the total and stamp the cart. Must run before every persist.
    pub fn finalize(&mut self) {
        self.total = self.recomputed_total();
        self.last_updated = Utc::now();
    }

    /// `round2(Σ price × quantity)` over the current lines.
    pub fn recomputed_total(&self) -> Decimal {
        round2(
            self.items
                .iter()
                .map(|i| i.price * Decimal::from(i.quantity))
                .sum(),
        )
    }
}
