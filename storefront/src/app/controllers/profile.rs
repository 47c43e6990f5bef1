//! # Profile
//!
//! Shared by the buyer and seller profile screens. The profile is re-fetched on
//! every visit; edits are submitted as a partial update.

use std::sync::Arc;

use async_trait::async_trait;
use shared::{ProfileData, ProfileUpdate};

use crate::app::controller::{ScreenController, ScreenLifecycle, ScreenState};
use crate::app::state::{RoleConfig, Screen};
use crate::core::error::{AppError, Result};
use crate::core::service::ApiService;
use crate::services::session::SessionManager;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub config: RoleConfig,
    pub profile: ProfileData,
    pub error: Option<String>,
}

impl ProfileView {
    /// First letter of the name, for the avatar.
    pub fn initial(&self) -> char {
        self.profile
            .name
            .trim()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}

pub struct ProfileController {
    api: Arc<dyn ApiService>,
    session: Arc<SessionManager>,
    screen: ScreenController<ProfileView>,
}

impl ProfileController {
    pub fn new(api: Arc<dyn ApiService>, session: Arc<SessionManager>) -> Self {
        Self {
            api,
            session,
            screen: ScreenController::new("profile"),
        }
    }

    pub fn state(&self) -> ScreenState<ProfileView> {
        self.screen.state()
    }

    pub async fn save(&self, update: ProfileUpdate) -> Result<ProfileData> {
        let api = self.api.clone();
        let email = self.session.current().map(|s| s.email);
        self.screen
            .submit_recoverable(
                |mut view| async move {
                    let email = email.ok_or(AppError::Unauthenticated)?;
                    let profile = api.update_profile(&email, &update).await?;
                    view.profile = profile.clone();
                    view.error = None;
                    Ok::<_, AppError>((view, profile))
                },
                |view, err| view.error = Some(err.user_message()),
            )
            .await
    }

    /// Clear the session. Returns the screen the back stack resets to.
    pub async fn logout(&self) -> Result<Screen> {
        self.session.logout().await?;
        self.screen.unmount();
        Ok(Screen::Welcome)
    }
}

#[async_trait]
impl ScreenLifecycle for ProfileController {
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
                let profile = api.fetch_profile(&session.email).await?;
                Ok(ProfileView {
                    config: RoleConfig::for_role(session.role),
                    profile,
                    error: None,
                })
            })
            .await
    }
}
