//! # Application Module
//!
//! The orchestrator between presentation and the screen controllers.
//!
//! ## Architecture
//!
//! - [`App`]: owns the services, the back stack and every controller
//! - [`controller`]: generic load/submit state machine
//! - [`controllers`]: one controller per screen
//! - [`events`]: [`Intent`]s in from presentation, [`AppEvent`]s back from tasks
//! - [`navigation`]: back stack with the auth/role guard
//! - [`state`]: screens, role configuration, notices
//!
//! ## Event Flow
//!
//! ```text
//! presentation ──Intent──▶ App::dispatch ──tokio::spawn──▶ App::perform
//!                                                              │
//!                                            AppEvent (async-channel)
//!                                                              ▼
//! presentation ◀──state── App::on_tick ◀─────────────── event queue
//! ```
//!
//! Navigation is applied on the tick: the old screen's controller is unmounted,
//! the new one mounted, and its load spawned.

pub mod controller;
pub mod controllers;
pub mod events;
pub mod navigation;
pub mod state;

use std::collections::VecDeque;
use std::sync::Arc;

use async_channel::{Receiver, Sender};
use parking_lot::{Mutex, RwLock};

use crate::config::ClientConfig;
use crate::core::error::{AppError, Result};
use crate::core::service::{ApiService, KeyValueStore, LocationProvider};
use crate::services::api::ApiClient;
use crate::services::cart::CartStore;
use crate::services::location::FixedLocation;
use crate::services::session::{Session, SessionManager};
use crate::services::storage::{FileStore, MemoryStore};

pub use controller::{ScreenController, ScreenError, ScreenLifecycle, ScreenState};
pub use controllers::Controllers;
pub use events::{AppEvent, Intent};
pub use navigation::Navigator;
pub use state::{Access, Notice, NoticeLevel, RoleConfig, Screen};

#[derive(Clone)]
pub struct App {
    api: Arc<dyn ApiService>,
    session: Arc<SessionManager>,
    cart: Arc<CartStore>,
    navigator: Arc<RwLock<Navigator>>,
    controllers: Arc<Controllers>,
    event_tx: Sender<AppEvent>,
    event_rx: Receiver<AppEvent>,
    notices: Arc<Mutex<VecDeque<Notice>>>,
}

impl App {
    /// App without a known location; the farmer home shows no weather.
    pub fn new(
        api: Arc<dyn ApiService>,
        session: Arc<SessionManager>,
        cart: Arc<CartStore>,
    ) -> Self {
        Self::with_location(api, session, cart, Arc::new(FixedLocation::unknown()))
    }

    pub fn with_location(
        api: Arc<dyn ApiService>,
        session: Arc<SessionManager>,
        cart: Arc<CartStore>,
        location: Arc<dyn LocationProvider>,
    ) -> Self {
        let (event_tx, event_rx) = async_channel::unbounded();
        let controllers = Arc::new(Controllers::new(
            api.clone(),
            session.clone(),
            cart.clone(),
            location,
        ));
        Self {
            api,
            session,
            cart,
            navigator: Arc::new(RwLock::new(Navigator::new())),
            controllers,
            event_tx,
            event_rx,
            notices: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Wire the app from configuration: file-backed storage (in-memory if the
    /// file cannot be opened) and an HTTP client carrying the session token.
    pub async fn from_config(config: &ClientConfig) -> Result<Self> {
        let opened = FileStore::open(config.session_file.clone()).await;
        let store: Arc<dyn KeyValueStore> = match opened {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::warn!(
                    path = %config.session_file.display(),
                    error = %e,
                    "Session file unavailable, falling back to in-memory storage"
                );
                Arc::new(MemoryStore::new())
            }
        };
        let session = Arc::new(SessionManager::new(store.clone()));
        let cart = Arc::new(CartStore::new(store));
        let api = ApiClient::new(config)?.with_session(session.clone());
        let location = Arc::new(FixedLocation::new(config.farm_location));
        Ok(Self::with_location(Arc::new(api), session, cart, location))
    }

    pub fn api(&self) -> &Arc<dyn ApiService> {
        &self.api
    }

    pub fn session(&self) -> Option<Session> {
        self.session.current()
    }

    pub fn session_manager(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn cart(&self) -> &Arc<CartStore> {
        &self.cart
    }

    pub fn controllers(&self) -> &Controllers {
        &self.controllers
    }

    pub fn current_screen(&self) -> Screen {
        self.navigator.read().current()
    }

    pub fn can_go_back(&self) -> bool {
        self.navigator.read().depth() > 1
    }

    /// Drain queued notices, oldest first.
    pub fn take_notices(&self) -> Vec<Notice> {
        self.notices.lock().drain(..).collect()
    }

    /// Handle an intent on a background task. Effects arrive through
    /// [`on_tick`](Self::on_tick).
    pub fn dispatch(&self, intent: Intent) {
        let app = self.clone();
        tokio::spawn(async move {
            let _ = app.perform(intent).await;
        });
    }

    /// Handle an intent on the current task. Failures are already reflected in
    /// screen state or notices; an `Unauthenticated` failure also queues a
    /// redirect to login.
    pub async fn perform(&self, intent: Intent) -> Result<()> {
        let label = intent_label(&intent);
        tracing::debug!(intent = label, "Handling intent");
        let result = self.run(intent).await;
        match &result {
            Err(AppError::Unauthenticated) => {
                tracing::info!(intent = label, "No session, redirecting to login");
                self.emit(AppEvent::Navigate(Screen::Login)).await;
            }
            Err(err) => tracing::debug!(intent = label, error = %err, "Intent failed"),
            Ok(()) => {}
        }
        result
    }

    async fn run(&self, intent: Intent) -> Result<()> {
        let c = &self.controllers;
        match intent {
            Intent::Start => {
                let first = c.splash.resolve().await;
                self.emit(AppEvent::Reset(first)).await;
            }
            Intent::Navigate(screen) => self.emit(AppEvent::Navigate(screen)).await,
            Intent::GoBack => self.emit(AppEvent::Back).await,
            Intent::Refresh => {
                if let Some(controller) = c.for_screen(self.current_screen()) {
                    controller.load().await?;
                }
            }
            Intent::SubmitLogin => {
                let home = c.login.submit().await?;
                self.emit(AppEvent::Reset(home)).await;
            }
            Intent::SubmitSignup => {
                let next = c.signup.submit().await?;
                self.notify(Notice::success("Account Created", "Please log in to continue.")).await;
                self.emit(AppEvent::Navigate(next)).await;
            }
            Intent::Logout => match c.profile.logout().await {
                Ok(next) => self.emit(AppEvent::Reset(next)).await,
                Err(e) => {
                    self.notify(Notice::error("Error", "Could not log out. Please try again."))
                        .await;
                    return Err(e);
                }
            },
            Intent::OpenProduct(product) => {
                c.product.select(product);
                self.emit(AppEvent::Open(Screen::ProductDetails)).await;
            }
            Intent::AddToCart { buy_now } => match c.product.add_to_cart(buy_now).await {
                Ok((_, next)) => {
                    let message = if buy_now {
                        "Proceeding to checkout..."
                    } else {
                        "Added to cart successfully!"
                    };
                    self.notify(Notice::success("Cart", message)).await;
                    if let Some(next) = next {
                        self.emit(AppEvent::Navigate(next)).await;
                    }
                }
                Err(e) => {
                    self.notify(Notice::error("Error", "Failed to add item to cart. Please try again."))
                        .await;
                    return Err(e);
                }
            },
            Intent::ChangeDetailQuantity(change) => {
                c.product.change_quantity(change);
            }
            Intent::CheckPincode(pincode) => match c.product.check_pincode(&pincode) {
                Ok(_) => {
                    let message = format!(
                        "Delivery to pincode {} will take approximately 3-5 business days.",
                        pincode.trim()
                    );
                    self.notify(Notice::success("Delivery Available", message)).await;
                }
                Err(e) => {
                    self.notify(Notice::warning("Invalid Pincode", e.user_message())).await;
                    return Err(e);
                }
            },
            Intent::SubmitReview => {
                c.product.submit_review().await?;
                self.notify(Notice::success(
                    "Thank You!",
                    "Your review has been submitted successfully.",
                ))
                .await;
            }
            Intent::ChangeCartQuantity { product_id, change } => {
                c.cart.change_quantity(&product_id, change).await?;
            }
            Intent::RemoveFromCart(product_id) => {
                c.cart.remove(&product_id).await?;
            }
            Intent::ApplyPromo(code) => match c.cart.apply_promo(&code) {
                Ok(discount) => {
                    let message = format!(
                        "Promo code applied successfully! ₹{} discount added.",
                        discount
                    );
                    self.notify(Notice::success("Success", message)).await;
                }
                Err(e) => {
                    self.notify(Notice::warning("Invalid Code", e.user_message())).await;
                    return Err(e);
                }
            },
            Intent::Checkout => match c.cart.checkout() {
                Ok(_) => self.emit(AppEvent::Navigate(Screen::Checkout)).await,
                Err(e) => {
                    self.notify(Notice::warning("Empty Cart", e.user_message())).await;
                    return Err(e);
                }
            },
            Intent::RecommendCrop => match c.home.recommend_crop().await {
                Ok(recommendation) => {
                    let message = format!("Recommended Crop: {}", recommendation.crop);
                    self.notify(Notice::info("Crop Recommender", message)).await;
                }
                Err(e) => {
                    self.notify(Notice::error("Error", e.user_message())).await;
                    return Err(e);
                }
            },
            Intent::SubmitProduct => {
                let created = c.add_product.submit().await?;
                tracing::info!(product_id = %created.id, "Product listed");
                self.notify(Notice::success("Success", "Product added successfully")).await;
            }
            Intent::SaveProfile(update) => {
                c.profile.save(update).await?;
                self.notify(Notice::success("Profile Updated", "Your changes have been saved."))
                    .await;
            }
        }
        Ok(())
    }

    async fn emit(&self, event: AppEvent) {
        let _ = self.event_tx.send(event).await;
    }

    async fn notify(&self, notice: Notice) {
        self.emit(AppEvent::Notice(notice)).await;
    }

    /// Apply queued events. Loads for newly shown screens run on background tasks.
    pub fn on_tick(&self) {
        while let Ok(event) = self.event_rx.try_recv() {
            if let Some(controller) = self.apply_event(event) {
                tokio::spawn(async move {
                    let _ = controller.load().await;
                });
            }
        }
    }

    /// Apply queued events and wait for the resulting loads. Repeats until the
    /// queue stays empty.
    pub async fn settle(&self) {
        while let Ok(event) = self.event_rx.try_recv() {
            if let Some(controller) = self.apply_event(event) {
                let _ = controller.load().await;
            }
        }
    }

    /// Apply one event. Returns the controller to load when the visible screen
    /// changed or was reopened.
    fn apply_event(&self, event: AppEvent) -> Option<Arc<dyn ScreenLifecycle>> {
        let session = self.session.current();
        let mut reopen = false;
        let (from, to) = {
            let mut navigator = self.navigator.write();
            let from = navigator.current();
            match event {
                AppEvent::Navigate(target) => {
                    navigator.navigate(target, session.as_ref());
                }
                AppEvent::Open(target) => {
                    navigator.navigate(target, session.as_ref());
                    reopen = true;
                }
                AppEvent::Reset(target) => {
                    navigator.reset(target, session.as_ref());
                }
                AppEvent::Back => {
                    navigator.back();
                }
                AppEvent::Notice(notice) => {
                    drop(navigator);
                    tracing::debug!(title = %notice.title, "Notice queued");
                    self.notices.lock().push_back(notice);
                    return None;
                }
            }
            (from, navigator.current())
        };
        if from == to {
            if !reopen {
                return None;
            }
            tracing::debug!(screen = to.route_name(), "Screen reopened");
        } else {
            tracing::info!(from = from.route_name(), to = to.route_name(), "Screen changed");
        }
        if let Some(previous) = self.controllers.for_screen(from) {
            previous.unmount();
        }
        let next = self.controllers.for_screen(to)?;
        next.mount();
        Some(next)
    }
}

fn intent_label(intent: &Intent) -> &'static str {
    match intent {
        Intent::Start => "start",
        Intent::Navigate(_) => "navigate",
        Intent::GoBack => "go_back",
        Intent::Refresh => "refresh",
        Intent::SubmitLogin => "submit_login",
        Intent::SubmitSignup => "submit_signup",
        Intent::Logout => "logout",
        Intent::OpenProduct(_) => "open_product",
        Intent::AddToCart { .. } => "add_to_cart",
        Intent::ChangeDetailQuantity(_) => "change_detail_quantity",
        Intent::CheckPincode(_) => "check_pincode",
        Intent::SubmitReview => "submit_review",
        Intent::ChangeCartQuantity { .. } => "change_cart_quantity",
        Intent::RemoveFromCart(_) => "remove_from_cart",
        Intent::ApplyPromo(_) => "apply_promo",
        Intent::Checkout => "checkout",
        Intent::RecommendCrop => "recommend_crop",
        Intent::SubmitProduct => "submit_product",
        Intent::SaveProfile(_) => "save_profile",
    }
}
