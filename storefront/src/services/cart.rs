//! # Cart
//!
//! Device-local cart persisted under the `cartItems` key as a JSON list.
//!
//! Mutations run read-modify-write under one async mutex and flush to storage
//! before releasing it, so concurrent adds never lose an update. Each mutation
//! bumps a version number; views apply a [`CartSnapshot`] only if it is newer
//! than the one they hold.
//!
//! Pricing mirrors the checkout screen: flat delivery fee on non-empty carts,
//! 5% tax on the subtotal, and a fixed promo discount.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::Product;
use tokio::sync::Mutex;

use crate::core::error::{AppError, Result};
use crate::core::service::KeyValueStore;
use crate::services::storage::keys;

pub const DELIVERY_FEE: f64 = 40.0;
pub const TAX_RATE: f64 = 0.05;
pub const PROMO_CODE: &str = "farmfresh";
pub const PROMO_DISCOUNT: f64 = 50.0;

/// A product line in the cart. Name, price and image are captured when the item
/// is added so the cart renders without a network call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub product_id: String,
    pub name: String,
    pub price: f64,
    /// Always at least 1.
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity: quantity.max(1),
            image: product.cover_image().map(str::to_string),
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    Increase,
    Decrease,
}

/// Cart contents after a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    pub version: u64,
    pub items: Vec<CartItem>,
}

impl CartSnapshot {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Price breakdown shown on the cart screen and passed to checkout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartSummary {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    pub discount: f64,
    pub total: f64,
}

/// Price a set of cart lines. The total never goes below zero.
pub fn summarize(items: &[CartItem], discount: f64) -> CartSummary {
    let subtotal: f64 = items.iter().map(CartItem::line_total).sum();
    let delivery_fee = if items.is_empty() { 0.0 } else { DELIVERY_FEE };
    let tax = subtotal * TAX_RATE;
    let discount = discount.max(0.0);
    let total = (subtotal + delivery_fee + tax - discount).max(0.0);
    CartSummary {
        subtotal,
        delivery_fee,
        tax,
        discount,
        total,
    }
}

/// Discount for a promo code, `None` when the code is not recognised.
pub fn promo_discount(code: &str) -> Option<f64> {
    code.trim()
        .eq_ignore_ascii_case(PROMO_CODE)
        .then_some(PROMO_DISCOUNT)
}

pub struct CartStore {
    store: Arc<dyn KeyValueStore>,
    /// `None` until first loaded from storage.
    items: Mutex<Option<Vec<CartItem>>>,
    version: AtomicU64,
}

impl CartStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            items: Mutex::new(None),
            version: AtomicU64::new(0),
        }
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Current contents.
    pub async fn snapshot(&self) -> CartSnapshot {
        let mut guard = self.items.lock().await;
        let items = self.loaded(&mut guard).await.clone();
        CartSnapshot {
            version: self.version(),
            items,
        }
    }

    pub async fn items(&self) -> Vec<CartItem> {
        self.snapshot().await.items
    }

    /// Add `quantity` of a product, merging into an existing line.
    pub async fn add(&self, product: &Product, quantity: u32) -> Result<CartSnapshot> {
        if product.id.trim().is_empty() {
            return Err(AppError::Validation("Product id is required".to_string()));
        }
        let quantity = quantity.max(1);
        self.mutate(|items| {
            match items.iter_mut().find(|i| i.product_id == product.id) {
                Some(line) => line.quantity = line.quantity.saturating_add(quantity),
                None => items.push(CartItem::from_product(product, quantity)),
            }
        })
        .await
    }

    /// Step a line's quantity by one. Decreasing never goes below 1; use
    /// [`remove`](Self::remove) to drop the line.
    pub async fn update_quantity(
        &self,
        product_id: &str,
        change: QuantityChange,
    ) -> Result<CartSnapshot> {
        self.mutate(|items| {
            if let Some(line) = items.iter_mut().find(|i| i.product_id == product_id) {
                line.quantity = match change {
                    QuantityChange::Increase => line.quantity.saturating_add(1),
                    QuantityChange::Decrease => line.quantity.saturating_sub(1).max(1),
                };
            }
        })
        .await
    }

    pub async fn remove(&self, product_id: &str) -> Result<CartSnapshot> {
        self.mutate(|items| items.retain(|i| i.product_id != product_id))
            .await
    }

    pub async fn clear(&self) -> Result<CartSnapshot> {
        self.mutate(Vec::clear).await
    }

    async fn mutate<F>(&self, change: F) -> Result<CartSnapshot>
    where
        F: FnOnce(&mut Vec<CartItem>),
    {
        let mut guard = self.items.lock().await;
        let mut next = self.loaded(&mut guard).await.clone();
        change(&mut next);

        let body = serde_json::to_string(&next)?;
        self.store.set(keys::CART_ITEMS, &body).await?;

        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(version, lines = next.len(), "Cart updated");
        *guard = Some(next.clone());
        Ok(CartSnapshot {
            version,
            items: next,
        })
    }

    /// Lazily load the persisted cart into `slot`. Unreadable or corrupt data is
    /// logged and read as an empty cart.
    async fn loaded<'a>(&self, slot: &'a mut Option<Vec<CartItem>>) -> &'a mut Vec<CartItem> {
        if slot.is_none() {
            let items = match self.store.get(keys::CART_ITEMS).await {
                Ok(Some(raw)) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                    Ok(items) => items
                        .into_iter()
                        .map(|mut i| {
                            i.quantity = i.quantity.max(1);
                            i
                        })
                        .collect(),
                    Err(e) => {
                        tracing::warn!(error = %e, "Stored cart is corrupt, starting empty");
                        Vec::new()
                    }
                },
                Ok(None) => Vec::new(),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read stored cart");
                    Vec::new()
                }
            };
            *slot = Some(items);
        }
        slot.get_or_insert_with(Vec::new)
    }
}
