//! # Application Events
//!
//! [`Intent`]s flow from presentation into the app; [`AppEvent`]s flow from
//! spawned controller tasks back to the orchestrator, which applies them in
//! [`App::on_tick`](crate::app::App::on_tick).

use shared::{Product, ProfileUpdate};

use crate::app::state::{Notice, Screen};
use crate::services::cart::QuantityChange;

/// User intents emitted by presentation.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Resolve the stored session and leave the splash screen
    Start,
    Navigate(Screen),
    GoBack,
    /// Re-run the current screen's load
    Refresh,
    SubmitLogin,
    SubmitSignup,
    Logout,
    /// Show a product on the detail screen
    OpenProduct(Product),
    AddToCart { buy_now: bool },
    ChangeDetailQuantity(QuantityChange),
    CheckPincode(String),
    SubmitReview,
    ChangeCartQuantity { product_id: String, change: QuantityChange },
    RemoveFromCart(String),
    ApplyPromo(String),
    Checkout,
    /// Farmer home: ask the crop recommender
    RecommendCrop,
    SubmitProduct,
    SaveProfile(ProfileUpdate),
}

/// Side effects sent back to the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Push a screen (guarded)
    Navigate(Screen),
    /// Like `Navigate`, but remount and reload the screen even when it is
    /// already showing
    Open(Screen),
    /// Replace the whole back stack (guarded)
    Reset(Screen),
    Back,
    Notice(Notice),
}
