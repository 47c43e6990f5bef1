//! # Screen Controllers
//!
//! One controller per screen (home and profile serve both roles). Each wraps a
//! [`ScreenController`](crate::app::controller::ScreenController) and exposes the
//! screen's intents as methods.

pub mod add_product;
pub mod auth;
pub mod cart;
pub mod home;
pub mod listing;
pub mod product;
pub mod profile;
pub mod splash;

#[cfg(test)]
pub(crate) mod mock;

use std::sync::Arc;

use crate::app::controller::ScreenLifecycle;
use crate::app::state::Screen;
use crate::core::service::{ApiService, LocationProvider};
use crate::services::cart::CartStore;
use crate::services::session::SessionManager;

pub use add_product::{AddProductController, AddProductForm};
pub use auth::{LoginController, LoginForm, SignupController, SignupForm};
pub use cart::{CartController, CartView, CheckoutSummary};
pub use home::{FarmInsights, HomeController, HomeData, Section};
pub use listing::ListingController;
pub use product::{ProductDetail, ProductDetailController, ReviewDraft};
pub use profile::{ProfileController, ProfileView};
pub use splash::SplashController;

/// Every screen controller, built once over the shared services.
pub struct Controllers {
    pub splash: SplashController,
    pub login: Arc<LoginController>,
    pub signup: Arc<SignupController>,
    pub home: Arc<HomeController>,
    pub listing: Arc<ListingController>,
    pub add_product: Arc<AddProductController>,
    pub product: Arc<ProductDetailController>,
    pub cart: Arc<CartController>,
    pub profile: Arc<ProfileController>,
}

impl Controllers {
    pub fn new(
        api: Arc<dyn ApiService>,
        session: Arc<SessionManager>,
        cart: Arc<CartStore>,
        location: Arc<dyn LocationProvider>,
    ) -> Self {
        let home = HomeController::new(api.clone(), session.clone()).with_location(location);
        let product = ProductDetailController::new(api.clone(), session.clone(), cart.clone());
        Self {
            splash: SplashController::new(session.clone()),
            login: Arc::new(LoginController::new(api.clone(), session.clone())),
            signup: Arc::new(SignupController::new(api.clone())),
            home: Arc::new(home),
            listing: Arc::new(ListingController::new(api.clone(), session.clone())),
            add_product: Arc::new(AddProductController::new(api.clone(), session.clone())),
            product: Arc::new(product),
            cart: Arc::new(CartController::new(session.clone(), cart)),
            profile: Arc::new(ProfileController::new(api, session)),
        }
    }

    /// Controller driving `screen`. Splash, welcome, orders and checkout have no
    /// loaded state.
    pub fn for_screen(&self, screen: Screen) -> Option<Arc<dyn ScreenLifecycle>> {
        let controller: Arc<dyn ScreenLifecycle> = match screen {
            Screen::Login => self.login.clone(),
            Screen::Signup => self.signup.clone(),
            Screen::BuyerHome | Screen::SellerHome => self.home.clone(),
            Screen::SellerListings => self.listing.clone(),
            Screen::AddProduct => self.add_product.clone(),
            Screen::ProductDetails => self.product.clone(),
            Screen::Cart => self.cart.clone(),
            Screen::BuyerProfile | Screen::SellerProfile => self.profile.clone(),
            Screen::Splash | Screen::Welcome | Screen::SellerOrders | Screen::Checkout => {
                return None
            }
        };
        Some(controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::mock::{cart_for, session_with, MockApiService};
    use crate::services::location::FixedLocation;

    #[tokio::test]
    async fn test_every_loaded_screen_has_a_controller() {
        let (store, session) = session_with(None).await;
        let controllers = Controllers::new(
            MockApiService::new(),
            session,
            cart_for(&store),
            Arc::new(FixedLocation::unknown()),
        );

        let without: Vec<Screen> = Screen::all()
            .iter()
            .copied()
            .filter(|s| controllers.for_screen(*s).is_none())
            .collect();
        assert_eq!(
            without,
            vec![Screen::Splash, Screen::Welcome, Screen::SellerOrders, Screen::Checkout]
        );
    }
}
