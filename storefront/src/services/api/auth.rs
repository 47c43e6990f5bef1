//! # Authentication Endpoints
//!
//! Login by phone number and account registration.

use reqwest::Method;
use shared::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use super::client::ApiClient;
use crate::core::error::{AppError, Result};
use crate::utils::validation::{validate_email, validate_phone, validate_required};

pub const MISSING_CREDENTIALS: &str = "Please enter both phone number and password";
pub const BAD_CREDENTIALS: &str = "Please check your credentials";

/// Login with phone number and password.
#[tracing::instrument(skip(client, password), fields(phone = %phone))]
pub async fn login(client: &ApiClient, phone: &str, password: &str) -> Result<LoginResponse> {
    let phone = phone.trim();
    if phone.is_empty() || password.is_empty() {
        return Err(AppError::Validation(MISSING_CREDENTIALS.to_string()));
    }

    tracing::info!("Attempting login");
    let request = LoginRequest {
        phone: phone.to_string(),
        password: password.to_string(),
    };
    let request = client
        .request(Method::POST, &["api", "auth", "login"])?
        .json(&request)
        .fallback_message(BAD_CREDENTIALS);

    let response: LoginResponse = client.send_json(request).await?;
    if response.token.trim().is_empty() || response.email.trim().is_empty() {
        return Err(AppError::Server {
            status: None,
            message: "Login response is missing the token or email".to_string(),
        });
    }
    tracing::info!(role = %response.role, "Login successful");
    Ok(response)
}

/// Register a new account. Every field is required.
#[tracing::instrument(skip(client, request), fields(email = %request.email, role = %request.role))]
pub async fn register(client: &ApiClient, request: &RegisterRequest) -> Result<RegisterResponse> {
    validate_registration(request)?;

    let http_request = client
        .request(Method::POST, &["api", "auth", "register"])?
        .json(request)
        .fallback_message("Signup failed. Please try again.");
    let response = client
        .send_optional::<RegisterResponse>(http_request)
        .await?
        .unwrap_or_default();
    tracing::info!("Registration accepted");
    Ok(response)
}

/// Field checks shared by the accessor and the signup form.
pub fn validate_registration(request: &RegisterRequest) -> Result<()> {
    if [
        &request.full_name,
        &request.email,
        &request.phone,
        &request.password,
    ]
    .iter()
    .any(|v| v.trim().is_empty())
    {
        return Err(AppError::Validation("Please fill in all fields.".to_string()));
    }
    validate_required("Full name", &request.full_name).into_result()?;
    validate_email(&request.email).into_result()?;
    validate_phone(&request.phone).into_result()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use shared::Role;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn registration() -> RegisterRequest {
        RegisterRequest {
            full_name: "Asha Patil".to_string(),
            email: "asha@farm.in".to_string(),
            password: "secret1".to_string(),
            phone: "9876543210".to_string(),
            role: Role::Farmer,
        }
    }

    #[tokio::test]
    async fn test_login_posts_phone_and_password() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(serde_json::json!({"phone": "9999999999", "password": "pass123"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "role": "farmer", "email": "a@b.com", "token": "t1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&ClientConfig::with_base_url(server.uri())).unwrap();
        let response = login(&client, " 9999999999 ", "pass123").await.unwrap();
        assert_eq!(response.role, Role::Farmer);
        assert_eq!(response.token, "t1");
    }

    #[tokio::test]
    async fn test_login_rejected_uses_server_message_or_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = ApiClient::new(&ClientConfig::with_base_url(server.uri())).unwrap();
        let err = login(&client, "9999999999", "wrong").await.unwrap_err();
        assert_eq!(err.http_status(), Some(401));
        assert_eq!(err.user_message(), BAD_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_login_validates_before_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ApiClient::new(&ClientConfig::with_base_url(server.uri())).unwrap();
        let err = login(&client, "  ", "pass123").await.unwrap_err();
        assert_eq!(err, AppError::Validation(MISSING_CREDENTIALS.to_string()));
    }

    #[tokio::test]
    async fn test_register_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .and(body_json(serde_json::json!({
                "Fullname": "Asha Patil",
                "email": "asha@farm.in",
                "password": "secret1",
                "phone": "9876543210",
                "role": "farmer"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&ClientConfig::with_base_url(server.uri())).unwrap();
        let response = register(&client, &registration()).await.unwrap();
        assert_eq!(response, RegisterResponse::default());
    }

    #[test]
    fn test_registration_requires_every_field() {
        let mut request = registration();
        request.phone = String::new();
        assert_eq!(
            validate_registration(&request).unwrap_err(),
            AppError::Validation("Please fill in all fields.".to_string())
        );

        let mut request = registration();
        request.email = "asha.farm.in".to_string();
        assert!(validate_registration(&request).is_err());
    }
}
