//! # Session Management
//!
//! One [`SessionManager`] per device, created by the app and injected into the
//! HTTP client and every controller. The persisted keys are the source of truth;
//! the manager keeps an in-memory snapshot so the request hook never touches
//! storage.

use std::sync::Arc;

use parking_lot::RwLock;
use shared::{LoginResponse, Role};

use crate::core::error::{AppError, Result};
use crate::core::service::KeyValueStore;
use crate::services::storage::keys;

/// Authenticated identity restored from, or written to, persistent storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub role: Role,
    pub token: String,
    pub phone: Option<String>,
    pub display_name: Option<String>,
}

impl Session {
    /// Name shown in greetings: the stored full name, else the email's local part.
    pub fn greeting_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    current: RwLock<Option<Session>>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            current: RwLock::new(None),
        }
    }

    /// Backing store, shared with the cart.
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    /// Reload the session from storage.
    ///
    /// A session exists only when token, email and a recognised role are all
    /// stored. Storage failures are logged and read as "no session".
    pub async fn restore(&self) -> Option<Session> {
        let restored = match self.read_stored().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored session, treating as logged out");
                None
            }
        };

        match &restored {
            Some(session) => {
                tracing::info!(email = %session.email, role = %session.role, "Session restored")
            }
            None => tracing::debug!("No stored session"),
        }
        *self.current.write() = restored.clone();
        restored
    }

    async fn read_stored(&self) -> Result<Option<Session>> {
        let token = non_blank(self.store.get(keys::USER_TOKEN).await?);
        let email = non_blank(self.store.get(keys::USER_EMAIL).await?);
        let role = self.store.get(keys::USER_ROLE).await?;

        let (Some(token), Some(email), Some(role)) = (token, email, role) else {
            return Ok(None);
        };
        let role = match role.parse::<Role>() {
            Ok(role) => role,
            Err(e) => {
                tracing::warn!(error = %e, "Stored role not recognised");
                return Ok(None);
            }
        };

        Ok(Some(Session {
            email,
            role,
            token,
            phone: non_blank(self.store.get(keys::USER_PHONE).await?),
            display_name: non_blank(self.store.get(keys::USER_NAME).await?),
        }))
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current.read().as_ref().map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }

    /// Current session or [`AppError::Unauthenticated`].
    pub fn require(&self) -> Result<Session> {
        self.current().ok_or(AppError::Unauthenticated)
    }

    /// Persist a successful login.
    ///
    /// Writes email, role, token and phone (the response's, else the phone the
    /// user typed). The name is written when the backend sent one and removed
    /// otherwise, so a previous user's name never outlives their logout.
    pub async fn establish(&self, login: &LoginResponse, submitted_phone: &str) -> Result<Session> {
        let phone = login
            .phone
            .clone()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| submitted_phone.trim().to_string());
        let display_name = login.full_name.clone().filter(|n| !n.trim().is_empty());

        self.store.set(keys::USER_EMAIL, &login.email).await?;
        self.store.set(keys::USER_ROLE, login.role.as_str()).await?;
        self.store.set(keys::USER_TOKEN, &login.token).await?;
        self.store.set(keys::USER_PHONE, &phone).await?;
        match &display_name {
            Some(name) => self.store.set(keys::USER_NAME, name).await?,
            None => self.store.remove(&[keys::USER_NAME]).await?,
        }

        let session = Session {
            email: login.email.clone(),
            role: login.role,
            token: login.token.clone(),
            phone: Some(phone),
            display_name,
        };
        *self.current.write() = Some(session.clone());
        tracing::info!(email = %session.email, role = %session.role, "Session established");
        Ok(session)
    }

    /// Remove token, email and role. Everything else stays on the device.
    pub async fn logout(&self) -> Result<()> {
        *self.current.write() = None;
        self.store.remove(&keys::SESSION_KEYS).await?;
        tracing::info!("Session cleared");
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
