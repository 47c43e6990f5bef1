//! # Cart Screen
//!
//! View over [`CartStore`]. Mutations go to the store first; the returned
//! snapshot is applied only when it is newer than the one on screen, so
//! overlapping edits settle on the latest write.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::app::controller::{ScreenController, ScreenLifecycle, ScreenState};
use crate::core::error::{AppError, Result};
use crate::services::cart::{
    promo_discount, summarize, CartItem, CartSnapshot, CartStore, CartSummary, QuantityChange,
};
use crate::services::session::SessionManager;

pub const INVALID_PROMO: &str = "Please enter a valid promo code";
pub const EMPTY_CART: &str = "Your cart is empty. Add items before checkout.";

#[derive(Debug, Clone, PartialEq)]
pub struct CartView {
    /// Version of the snapshot this view renders
    pub version: u64,
    pub items: Vec<CartItem>,
    pub promo_code: String,
    pub discount: f64,
    pub summary: CartSummary,
}

impl CartView {
    fn new(snapshot: CartSnapshot) -> Self {
        let summary = summarize(&snapshot.items, 0.0);
        Self {
            version: snapshot.version,
            items: snapshot.items,
            promo_code: String::new(),
            discount: 0.0,
            summary,
        }
    }

    pub fn promo_applied(&self) -> bool {
        self.discount > 0.0
    }

    /// Apply `snapshot` if it is newer. Returns whether it was applied.
    fn apply(&mut self, snapshot: CartSnapshot) -> bool {
        if snapshot.version <= self.version {
            return false;
        }
        self.version = snapshot.version;
        self.items = snapshot.items;
        self.summary = summarize(&self.items, self.discount);
        true
    }
}

/// What the checkout screen receives.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSummary {
    pub items: Vec<CartItem>,
    pub summary: CartSummary,
}

pub struct CartController {
    session: Arc<SessionManager>,
    cart: Arc<CartStore>,
    last_checkout: Mutex<Option<CheckoutSummary>>,
    screen: ScreenController<CartView>,
}

impl CartController {
    pub fn new(session: Arc<SessionManager>, cart: Arc<CartStore>) -> Self {
        Self {
            session,
            cart,
            last_checkout: Mutex::new(None),
            screen: ScreenController::new("cart"),
        }
    }

    pub fn state(&self) -> ScreenState<CartView> {
        self.screen.state()
    }

    fn apply(&self, snapshot: CartSnapshot) -> CartSnapshot {
        let applied = snapshot.clone();
        self.screen.update(|view| {
            if !view.apply(snapshot) {
                tracing::debug!(version = view.version, "Stale cart snapshot ignored");
            }
        });
        applied
    }

    pub async fn change_quantity(
        &self,
        product_id: &str,
        change: QuantityChange,
    ) -> Result<CartSnapshot> {
        let snapshot = self.cart.update_quantity(product_id, change).await?;
        Ok(self.apply(snapshot))
    }

    pub async fn remove(&self, product_id: &str) -> Result<CartSnapshot> {
        let snapshot = self.cart.remove(product_id).await?;
        Ok(self.apply(snapshot))
    }

    /// Apply a promo code to the summary. Returns the discount; an unknown code
    /// clears any discount already applied.
    pub fn apply_promo(&self, code: &str) -> Result<f64> {
        let discount = promo_discount(code);
        self.screen.update(|view| {
            view.promo_code = code.trim().to_string();
            view.discount = discount.unwrap_or(0.0);
            view.summary = summarize(&view.items, view.discount);
        });
        discount.ok_or_else(|| AppError::Validation(INVALID_PROMO.to_string()))
    }

    /// Hand the current lines and totals to checkout. The cart itself is kept.
    pub fn checkout(&self) -> Result<CheckoutSummary> {
        let view = self
            .screen
            .data()
            .filter(|view| !view.items.is_empty())
            .ok_or_else(|| AppError::Validation(EMPTY_CART.to_string()))?;
        let checkout = CheckoutSummary {
            items: view.items,
            summary: view.summary,
        };
        tracing::info!(
            lines = checkout.items.len(),
            total = checkout.summary.total,
            "Checkout started"
        );
        *self.last_checkout.lock() = Some(checkout.clone());
        Ok(checkout)
    }

    pub fn last_checkout(&self) -> Option<CheckoutSummary> {
        self.last_checkout.lock().clone()
    }
}

#[async_trait]
impl ScreenLifecycle for CartController {
    fn mount(&self) {
        self.screen.mount();
    }

    fn unmount(&self) {
        self.screen.unmount();
    }

    async fn load(&self) -> Result<()> {
        let cart = self.cart.clone();
        self.screen
            .load_for_session(self.session.current(), |_| async move {
                Ok(CartView::new(cart.snapshot().await))
            })
            .await
    }
}
