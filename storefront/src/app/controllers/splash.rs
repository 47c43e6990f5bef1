//! Startup routing.

use std::sync::Arc;

use crate::app::state::{RoleConfig, Screen};
use crate::services::session::SessionManager;

pub struct SplashController {
    session: Arc<SessionManager>,
}

impl SplashController {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// Restore the stored session and pick the first screen: the role's home
    /// when signed in, the welcome screen otherwise.
    pub async fn resolve(&self) -> Screen {
        match self.session.restore().await {
            Some(session) => RoleConfig::for_role(session.role).home,
            None => Screen::Welcome,
        }
    }
}
