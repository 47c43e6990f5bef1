//! # Product Detail
//!
//! The product arrives with navigation (no fetch). Local state covers the
//! quantity selector, the delivery pincode check and the review draft.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::{Product, ReviewRequest};

use crate::app::controller::{ScreenController, ScreenLifecycle, ScreenState};
use crate::app::state::Screen;
use crate::core::error::{AppError, Result};
use crate::core::service::ApiService;
use crate::services::cart::{CartSnapshot, CartStore, QuantityChange};
use crate::services::session::SessionManager;
use crate::utils::validation::{validate_pincode, validate_rating};

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 10;
pub const DELIVERY_ESTIMATE: &str = "Delivery available in 3-5 business days";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub product: Product,
    pub image_urls: Vec<String>,
    /// Always within `MIN_QUANTITY..=MAX_QUANTITY`
    pub quantity: u32,
    pub pincode: String,
    pub delivery_estimate: Option<String>,
    pub review: ReviewDraft,
    pub error: Option<String>,
}

impl ProductDetail {
    fn new(product: Product, api: &dyn ApiService) -> Self {
        let image_urls = product
            .images
            .iter()
            .filter_map(|file| api.image_url(file))
            .collect();
        Self {
            product,
            image_urls,
            quantity: MIN_QUANTITY,
            pincode: String::new(),
            delivery_estimate: None,
            review: ReviewDraft::default(),
            error: None,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

pub struct ProductDetailController {
    api: Arc<dyn ApiService>,
    session: Arc<SessionManager>,
    cart: Arc<CartStore>,
    selected: Mutex<Option<Product>>,
    screen: ScreenController<ProductDetail>,
}

impl ProductDetailController {
    pub fn new(
        api: Arc<dyn ApiService>,
        session: Arc<SessionManager>,
        cart: Arc<CartStore>,
    ) -> Self {
        Self {
            api,
            session,
            cart,
            selected: Mutex::new(None),
            screen: ScreenController::new("product_detail"),
        }
    }

    pub fn state(&self) -> ScreenState<ProductDetail> {
        self.screen.state()
    }

    /// Product shown the next time the screen loads.
    pub fn select(&self, product: Product) {
        *self.selected.lock() = Some(product);
    }

    pub fn change_quantity(&self, change: QuantityChange) -> Option<u32> {
        let mut quantity = None;
        self.screen.update(|detail| {
            detail.quantity = match change {
                QuantityChange::Increase => (detail.quantity + 1).min(MAX_QUANTITY),
                QuantityChange::Decrease => detail.quantity.saturating_sub(1).max(MIN_QUANTITY),
            };
            quantity = Some(detail.quantity);
        });
        quantity
    }

    pub fn edit_review<F: FnOnce(&mut ReviewDraft)>(&self, edit: F) -> bool {
        self.screen.update(|detail| edit(&mut detail.review))
    }

    /// Check delivery to a pincode. Answered locally.
    pub fn check_pincode(&self, pincode: &str) -> Result<String> {
        let checked = validate_pincode(pincode).into_result();
        self.screen.update(|detail| {
            detail.pincode = pincode.trim().to_string();
            match &checked {
                Ok(()) => {
                    detail.delivery_estimate = Some(DELIVERY_ESTIMATE.to_string());
                    detail.error = None;
                }
                Err(err) => {
                    detail.delivery_estimate = None;
                    detail.error = Some(err.user_message());
                }
            }
        });
        checked.map(|_| DELIVERY_ESTIMATE.to_string())
    }

    /// Add the selected quantity to the cart. "Buy now" also routes to the cart.
    pub async fn add_to_cart(&self, buy_now: bool) -> Result<(CartSnapshot, Option<Screen>)> {
        let detail = self
            .screen
            .data()
            .ok_or_else(|| AppError::Validation("No product selected".to_string()))?;
        let snapshot = self.cart.add(&detail.product, detail.quantity).await?;
        tracing::info!(
            product_id = %detail.product.id,
            quantity = detail.quantity,
            buy_now,
            "Added to cart"
        );
        Ok((snapshot, buy_now.then_some(Screen::Cart)))
    }

    /// Post the review draft; the draft resets on success.
    pub async fn submit_review(&self) -> Result<()> {
        let api = self.api.clone();
        let author_email = self.session.current().map(|s| s.email);
        self.screen
            .submit_recoverable(
                |mut detail| async move {
                    validate_rating(detail.review.rating).into_result()?;
                    if detail.review.text.trim().is_empty() {
                        return Err(AppError::Validation("Please write your review".to_string()));
                    }
                    let author_email = author_email.ok_or(AppError::Unauthenticated)?;
                    let review = ReviewRequest {
                        rating: detail.review.rating,
                        comment: detail.review.text.trim().to_string(),
                        author_email,
                    };
                    api.submit_review(&detail.product.id, &review).await?;
                    detail.review = ReviewDraft::default();
                    detail.error = None;
                    Ok::<_, AppError>((detail, ()))
                },
                |detail, err| detail.error = Some(err.user_message()),
            )
            .await
    }
}

#[async_trait]
impl ScreenLifecycle for ProductDetailController {
    fn mount(&self) {
        self.screen.mount();
    }

    fn unmount(&self) {
        self.screen.unmount();
    }

    async fn load(&self) -> Result<()> {
        let selected = self.selected.lock().clone();
        let api = self.api.clone();
        self.screen
            .load_for_session(self.session.current(), |_| async move {
                let product = selected
                    .ok_or_else(|| AppError::Validation("No product selected".to_string()))?;
                Ok(ProductDetail::new(product, api.as_ref()))
            })
            .await
    }
}
