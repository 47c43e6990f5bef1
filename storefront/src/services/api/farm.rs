//! # Farm Insight Endpoints
//!
//! Third-party services behind the farmer home: current weather for the farm's
//! location and a crop recommendation. Both go through [`ApiClient::external`],
//! so failures are classified and logged like backend calls, but the session
//! token never leaves for these hosts.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Method;
use shared::{Coordinates, CropConditions, CropRecommendation, WeatherReport, WeatherResponse};

use super::client::ApiClient;
use crate::core::error::{AppError, Result};

pub const WEATHER_NOT_CONFIGURED: &str = "Weather is not configured";
pub const CROP_UNAVAILABLE: &str = "Failed to fetch the crop recommendation.";

/// The recommender answers with an HTML page containing this phrase.
static RECOMMENDED_CROP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Recommended Crop: (\w+)").expect("Invalid regex"));

/// Current weather at `at`, in metric units.
#[tracing::instrument(skip(client), fields(lat = at.latitude, lon = at.longitude))]
pub async fn fetch_weather(client: &ApiClient, at: Coordinates) -> Result<WeatherReport> {
    if !at.is_valid() {
        return Err(AppError::Validation("Location is out of range".to_string()));
    }
    let endpoints = client.farm();
    let api_key = endpoints
        .weather_api_key
        .as_deref()
        .ok_or_else(|| AppError::Validation(WEATHER_NOT_CONFIGURED.to_string()))?;

    let request = client
        .external(Method::GET, endpoints.weather_url.clone())
        .query(&[
            ("lat", at.latitude.to_string()),
            ("lon", at.longitude.to_string()),
            ("appid", api_key.to_string()),
            ("units", "metric".to_string()),
        ]);
    let response: WeatherResponse = client.send_json(request).await?;
    let report = response.into_report();
    tracing::debug!(temperature_c = report.temperature_c, "Weather fetched");
    Ok(report)
}

/// Ask the recommender which crop suits `conditions`.
#[tracing::instrument(skip(client, conditions))]
pub async fn recommend_crop(
    client: &ApiClient,
    conditions: &CropConditions,
) -> Result<CropRecommendation> {
    let request = client
        .external(Method::POST, client.farm().crop_url.clone())
        .form(conditions);
    let body = client.send_text(request).await?;

    let crop = parse_recommendation(&body).ok_or_else(|| {
        tracing::warn!(body_len = body.len(), "Recommendation missing from response");
        AppError::Server {
            status: None,
            message: CROP_UNAVAILABLE.to_string(),
        }
    })?;
    tracing::info!(crop = %crop, "Crop recommended");
    Ok(CropRecommendation { crop })
}

fn parse_recommendation(body: &str) -> Option<String> {
    RECOMMENDED_CROP
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::services::session::SessionManager;
    use crate::services::storage::MemoryStore;
    use shared::{LoginResponse, Role};
    use std::sync::Arc;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> ApiClient {
        let mut config = ClientConfig::with_base_url(server.uri());
        config.weather_url = format!("{}/data/2.5/weather", server.uri());
        config.weather_api_key = api_key.map(str::to_string);
        config.crop_url = format!("{}/predict", server.uri());
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_parse_recommendation() {
        let page = "<html><body><h2>Recommended Crop: rice</h2></body></html>";
        assert_eq!(parse_recommendation(page).as_deref(), Some("rice"));
        assert_eq!(parse_recommendation("<html>Model offline</html>"), None);
    }

    #[tokio::test]
    async fn test_fetch_weather_sends_location_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "18.52"))
            .and(query_param("lon", "73.85"))
            .and(query_param("appid", "k1"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "weather": [{"description": "light rain"}],
                "main": {"temp": 24.5, "humidity": 81},
                "name": "Pune"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("k1"));
        let report = fetch_weather(&client, Coordinates::new(18.52, 73.85)).await.unwrap();
        assert_eq!(report.description, "light rain");
        assert_eq!(report.temperature_c, 24.5);
    }

    #[tokio::test]
    async fn test_fetch_weather_without_key_makes_no_call() {
        let server = MockServer::start().await;
        let client = client_for(&server, None);

        let err = fetch_weather(&client, Coordinates::new(18.52, 73.85)).await.unwrap_err();
        assert_eq!(err, AppError::Validation(WEATHER_NOT_CONFIGURED.to_string()));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_weather_provider_rejection_is_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"cod": 401, "message": "Invalid API key"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Some("bad"));
        let err = fetch_weather(&client, Coordinates::new(18.52, 73.85)).await.unwrap_err();
        assert_eq!(err.http_status(), Some(401));
        assert_eq!(err.user_message(), "Invalid API key");
    }

    #[tokio::test]
    async fn test_recommend_crop_posts_form_without_session_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("N=50"))
            .and(body_string_contains("ph=6.5"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<h2>Recommended Crop: maize</h2>"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let session = Arc::new(SessionManager::new(store));
        let login = LoginResponse {
            email: "a@b.com".to_string(),
            role: Role::Farmer,
            token: "t1".to_string(),
            phone: None,
            full_name: None,
        };
        session.establish(&login, "9999999999").await.unwrap();
        let client = client_for(&server, None).with_session(session);

        let recommendation = recommend_crop(&client, &CropConditions::default()).await.unwrap();
        assert_eq!(recommendation.crop, "maize");

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_recommend_crop_without_answer_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>Try again</p>"))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = recommend_crop(&client, &CropConditions::default()).await.unwrap_err();
        assert_eq!(err.user_message(), CROP_UNAVAILABLE);
    }
}
