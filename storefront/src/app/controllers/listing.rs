//! Farmer's own listings, with pull-to-refresh.

use std::sync::Arc;

use async_trait::async_trait;
use shared::Product;

use crate::app::controller::{ScreenController, ScreenLifecycle, ScreenState};
use crate::core::error::Result;
use crate::core::service::ApiService;
use crate::services::session::SessionManager;

pub struct ListingController {
    api: Arc<dyn ApiService>,
    session: Arc<SessionManager>,
    screen: ScreenController<Vec<Product>>,
}

impl ListingController {
    pub fn new(api: Arc<dyn ApiService>, session: Arc<SessionManager>) -> Self {
        Self {
            api,
            session,
            screen: ScreenController::new("listings"),
        }
    }

    pub fn state(&self) -> ScreenState<Vec<Product>> {
        self.screen.state()
    }

    pub async fn refresh(&self) -> Result<()> {
        self.load().await
    }
}

#[async_trait]
impl ScreenLifecycle for ListingController {
    fn mount(&self) {
        self.screen.mount();
    }

    fn unmount(&self) {
        self.screen.unmount();
    }

    async fn load(&self) -> Result<()> {
        let api = self.api.clone();
        self.screen
            .load_for_session(self.session.current(), |session| async move {
                api.fetch_products_by_owner(&session.email).await
            })
            .await
    }
}
