//! # Login and Signup
//!
//! Form drafts, local validation, and the post-submit route.

use std::sync::Arc;

use async_trait::async_trait;
use shared::{RegisterRequest, Role};

use crate::app::controller::{ScreenController, ScreenLifecycle, ScreenState};
use crate::app::state::{RoleConfig, Screen};
use crate::core::error::{AppError, Result};
use crate::core::service::ApiService;
use crate::services::api::auth::{validate_registration, MISSING_CREDENTIALS};
use crate::services::session::SessionManager;
use crate::utils::validation::validate_password;

pub const CONNECTION_ERROR: &str = "Unable to connect to the server. Please check that the server is running and that you're connected to the same network.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub phone: String,
    pub password: String,
    pub error: Option<String>,
}

/// Text for a failed login: the server's message, or a connection hint when the
/// backend could not be reached.
pub fn login_error_message(err: &AppError) -> String {
    match err {
        AppError::NetworkUnreachable(_) | AppError::Timeout(_) => CONNECTION_ERROR.to_string(),
        other => other.user_message(),
    }
}

pub struct LoginController {
    api: Arc<dyn ApiService>,
    session: Arc<SessionManager>,
    screen: ScreenController<LoginForm>,
}

impl LoginController {
    pub fn new(api: Arc<dyn ApiService>, session: Arc<SessionManager>) -> Self {
        Self {
            api,
            session,
            screen: ScreenController::new("login"),
        }
    }

    pub fn state(&self) -> ScreenState<LoginForm> {
        self.screen.state()
    }

    pub fn edit<F: FnOnce(&mut LoginForm)>(&self, edit: F) -> bool {
        self.screen.update(edit)
    }

    /// Log in with the drafted credentials. Returns the role's home screen.
    pub async fn submit(&self) -> Result<Screen> {
        let api = self.api.clone();
        let session = self.session.clone();
        self.screen
            .submit_recoverable(
                |form| async move {
                    let phone = form.phone.trim().to_string();
                    if phone.is_empty() || form.password.is_empty() {
                        return Err(AppError::Validation(MISSING_CREDENTIALS.to_string()));
                    }
                    let response = api.login(&phone, &form.password).await?;
                    let established = session.establish(&response, &phone).await?;
                    Ok((LoginForm::default(), RoleConfig::for_role(established.role).home))
                },
                |form, err| {
                    form.password.clear();
                    form.error = Some(login_error_message(err));
                },
            )
            .await
    }
}

#[async_trait]
impl ScreenLifecycle for LoginController {
    fn mount(&self) {
        self.screen.mount();
    }

    fn unmount(&self) {
        self.screen.unmount();
    }

    async fn load(&self) -> Result<()> {
        self.screen.load(|| async { Ok(LoginForm::default()) }).await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Option<Role>,
    pub error: Option<String>,
}

impl SignupForm {
    fn to_request(&self) -> Result<RegisterRequest> {
        let role = self
            .role
            .ok_or_else(|| AppError::Validation("Please fill in all fields.".to_string()))?;
        let request = RegisterRequest {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            phone: self.phone.trim().to_string(),
            role,
        };
        validate_registration(&request)?;
        validate_password(&request.password).into_result()?;
        Ok(request)
    }
}

pub struct SignupController {
    api: Arc<dyn ApiService>,
    screen: ScreenController<SignupForm>,
}

impl SignupController {
    pub fn new(api: Arc<dyn ApiService>) -> Self {
        Self {
            api,
            screen: ScreenController::new("signup"),
        }
    }

    pub fn state(&self) -> ScreenState<SignupForm> {
        self.screen.state()
    }

    pub fn edit<F: FnOnce(&mut SignupForm)>(&self, edit: F) -> bool {
        self.screen.update(edit)
    }

    /// Register the drafted account. Success leads to the login screen.
    pub async fn submit(&self) -> Result<Screen> {
        let api = self.api.clone();
        self.screen
            .submit_recoverable(
                |form| async move {
                    let request = form.to_request()?;
                    api.register(&request).await?;
                    Ok::<_, AppError>((SignupForm::default(), Screen::Login))
                },
                |form, err| {
                    form.error = Some(match err {
                        AppError::Validation(msg) => msg.clone(),
                        AppError::NetworkUnreachable(_) | AppError::Timeout(_) => {
                            "An error occurred. Please try again later.".to_string()
                        }
                        other => other.user_message(),
                    })
                },
            )
            .await
    }
}

#[async_trait]
impl ScreenLifecycle for SignupController {
    fn mount(&self) {
        self.screen.mount();
    }

    fn unmount(&self) {
        self.screen.unmount();
    }

    async fn load(&self) -> Result<()> {
        self.screen.load(|| async { Ok(SignupForm::default()) }).await
    }
}
