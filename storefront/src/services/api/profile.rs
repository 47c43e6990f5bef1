//! # Profile Endpoints

use reqwest::Method;
use shared::{ProfileData, ProfileUpdate};

use super::client::ApiClient;
use crate::core::error::{AppError, Result};
use crate::utils::validation::{validate_email, validate_phone, validate_required};

#[tracing::instrument(skip(client))]
pub async fn fetch_profile(client: &ApiClient, email: &str) -> Result<ProfileData> {
    let email = email.trim();
    validate_email(email).into_result()?;

    let request = client.request(Method::GET, &["api", "auth", "profile", email])?;
    client.send_json(request).await
}

/// Update name and/or phone. At least one field must be set.
#[tracing::instrument(skip(client, update))]
pub async fn update_profile(
    client: &ApiClient,
    email: &str,
    update: &ProfileUpdate,
) -> Result<ProfileData> {
    let email = email.trim();
    validate_email(email).into_result()?;
    if update.is_empty() {
        return Err(AppError::Validation("Nothing to update".to_string()));
    }
    if let Some(name) = &update.name {
        validate_required("Name", name).into_result()?;
    }
    if let Some(phone) = &update.phone {
        validate_phone(phone).into_result()?;
    }

    let request = client
        .request(Method::PUT, &["api", "auth", "profile", email])?
        .json(update);
    let profile = client.send_json(request).await?;
    tracing::info!("Profile updated");
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/profile/a@b.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Ravi", "email": "a@b.com", "phone": "9999999999"
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&ClientConfig::with_base_url(server.uri())).unwrap();
        let profile = fetch_profile(&client, "a@b.com").await.unwrap();
        assert_eq!(profile.name, "Ravi");
    }

    #[tokio::test]
    async fn test_update_profile_sends_only_changed_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/auth/profile/a@b.com"))
            .and(body_json(serde_json::json!({"name": "Ravi K"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Ravi K", "email": "a@b.com", "phone": "9999999999"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&ClientConfig::with_base_url(server.uri())).unwrap();
        let update = ProfileUpdate {
            name: Some("Ravi K".to_string()),
            phone: None,
        };
        assert_eq!(update_profile(&client, "a@b.com", &update).await.unwrap().name, "Ravi K");
    }

    #[tokio::test]
    async fn test_update_profile_rejects_empty_update() {
        let client = ApiClient::new(&ClientConfig::default()).unwrap();
        let err = update_profile(&client, "a@b.com", &ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
