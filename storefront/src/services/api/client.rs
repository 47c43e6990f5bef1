//! # API Client
//!
//! The one configured HTTP client for backend communication.
//!
//! Every accessor builds an [`ApiRequest`] with [`ApiClient::request`] and sends
//! it through [`ApiClient::send_json`] (or one of its siblings). That pair is the
//! request and response hook:
//!
//! - request: base URL prefix, percent-encoded path segments, `x-request-id`,
//!   bearer token from the injected session
//! - [`ApiClient::external`]: the same hooks for the weather and crop providers,
//!   on their own absolute URLs and without the session token
//! - response: 2xx bodies decoded as JSON, everything else classified into an
//!   [`AppError`] and logged with request id, status and duration

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{
    Bid, BidRequest, Coordinates, CropConditions, CropRecommendation, ErrorResponse,
    LoginResponse, Product, ProfileData, ProfileUpdate, RegisterRequest, RegisterResponse,
    ReviewRequest, WeatherReport,
};

use crate::config::ClientConfig;
use crate::core::error::{AppError, Result};
use crate::core::service::ApiService;
use crate::services::api::upload::NewProduct;
use crate::services::session::SessionManager;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client for the storefront backend.
///
/// Cheap to clone; clones share the connection pool and the session.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) http: Client,
    base_url: Url,
    base: String,
    farm: FarmEndpoints,
    session: Option<Arc<SessionManager>>,
}

/// Third-party endpoints behind the farmer home's weather and crop sections.
#[derive(Debug, Clone)]
pub(crate) struct FarmEndpoints {
    pub(crate) weather_url: Url,
    pub(crate) weather_api_key: Option<String>,
    pub(crate) crop_url: Url,
}

impl FarmEndpoints {
    fn from_config(config: &ClientConfig) -> Result<Self> {
        let parse = |name: &str, raw: &str| {
            Url::parse(raw)
                .map_err(|e| AppError::Validation(format!("Invalid {} URL: {}", name, e)))
        };
        Ok(Self {
            weather_url: parse("weather", &config.weather_url)?,
            weather_api_key: config.weather_api_key.clone(),
            crop_url: parse("crop recommender", &config.crop_url)?,
        })
    }
}

/// A request under construction. Created by [`ApiClient::request`].
pub struct ApiRequest {
    builder: RequestBuilder,
    method: Method,
    path: String,
    request_id: String,
    fallback_message: Option<&'static str>,
}

impl ApiRequest {
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.builder = self.builder.json(body);
        self
    }

    pub fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
        self.builder = self.builder.multipart(form);
        self
    }

    /// URL-encoded form body.
    pub fn form<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.builder = self.builder.form(body);
        self
    }

    pub fn query<Q: Serialize + ?Sized>(mut self, query: &Q) -> Self {
        self.builder = self.builder.query(query);
        self
    }

    /// Message used for a 4xx response whose body carries no message of its own.
    pub fn fallback_message(mut self, message: &'static str) -> Self {
        self.fallback_message = Some(message);
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}

impl ApiClient {
    /// Build a client from configuration: fixed timeout, JSON defaults.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| AppError::Validation(format!("Invalid API base URL: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base: config.api_base_url.trim_end_matches('/').to_string(),
            base_url,
            farm: FarmEndpoints::from_config(config)?,
            session: None,
        })
    }

    /// Attach the session whose token is sent on every request.
    pub fn with_session(mut self, session: Arc<SessionManager>) -> Self {
        self.session = Some(session);
        self
    }

    pub(crate) fn farm(&self) -> &FarmEndpoints {
        &self.farm
    }

    /// Absolute URL for `segments`, each percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Validation("API base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Request hook.
    pub fn request(&self, method: Method, segments: &[&str]) -> Result<ApiRequest> {
        let url = self.endpoint(segments)?;
        let token = self.session.as_ref().and_then(|s| s.token());
        Ok(self.build(method, url, token))
    }

    /// Request to a third-party absolute URL. The session token is never sent.
    pub fn external(&self, method: Method, url: Url) -> ApiRequest {
        self.build(method, url, None)
    }

    fn build(&self, method: Method, url: Url, token: Option<String>) -> ApiRequest {
        let request_id = uuid::Uuid::new_v4().to_string();
        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .header(REQUEST_ID_HEADER, &request_id);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        ApiRequest {
            builder,
            method,
            path: url.path().to_string(),
            request_id,
            fallback_message: None,
        }
    }

    /// Send and decode a JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let body = self.dispatch(request).await?;
        decode(&body)
    }

    /// Send and decode a JSON body that the backend may leave empty.
    pub async fn send_optional<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Option<T>> {
        let body = self.dispatch(request).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        decode(&body).map(Some)
    }

    /// Send and return the 2xx body as text.
    pub async fn send_text(&self, request: ApiRequest) -> Result<String> {
        let body = self.dispatch(request).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Send and ignore whatever 2xx body comes back.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.dispatch(request).await.map(|_| ())
    }

    /// Response hook.
    async fn dispatch(&self, request: ApiRequest) -> Result<Vec<u8>> {
        let ApiRequest {
            builder,
            method,
            path,
            request_id,
            fallback_message,
        } = request;
        let start = Instant::now();

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = AppError::from(e);
                tracing::warn!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    kind = err.kind().code(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    error = %err,
                    "Request failed"
                );
                return Err(err);
            }
        };

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                let err = AppError::from(e);
                tracing::warn!(
                    request_id = %request_id,
                    path = %path,
                    error = %err,
                    "Failed to read response body"
                );
                err
            })?
            .to_vec();
        let duration_ms = start.elapsed().as_millis() as u64;

        if status.is_success() {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = status.as_u16(),
                duration_ms,
                "Request completed"
            );
            return Ok(body);
        }

        let message = error_message(&body)
            .or_else(|| {
                fallback_message
                    .filter(|_| status.is_client_error())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = status.as_u16(),
                duration_ms,
                message = %message,
                "Server error"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = status.as_u16(),
                duration_ms,
                message = %message,
                "Request rejected"
            );
        }

        Err(AppError::Server {
            status: Some(status.as_u16()),
            message,
        })
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "Response body did not match the expected shape");
        AppError::Server {
            status: None,
            message: format!("Invalid response body: {}", e),
        }
    })
}

/// Structured `message`/`error` field of an error body, or a short plain-text body.
fn error_message(body: &[u8]) -> Option<String> {
    if let Ok(parsed) = serde_json::from_slice::<ErrorResponse>(body) {
        return parsed.into_message();
    }
    let text = std::str::from_utf8(body).ok()?.trim();
    (!text.is_empty() && text.len() <= 200 && !text.starts_with('<')).then(|| text.to_string())
}

#[async_trait]
impl ApiService for ApiClient {
    async fn login(&self, phone: &str, password: &str) -> Result<LoginResponse> {
        super::auth::login(self, phone, password).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        super::auth::register(self, request).await
    }

    async fn fetch_products(&self) -> Result<Vec<Product>> {
        super::products::fetch_products(self).await
    }

    async fn fetch_products_by_owner(&self, email: &str) -> Result<Vec<Product>> {
        super::products::fetch_products_by_owner(self, email).await
    }

    async fn fetch_profile(&self, email: &str) -> Result<ProfileData> {
        super::profile::fetch_profile(self, email).await
    }

    async fn update_profile(&self, email: &str, update: &ProfileUpdate) -> Result<ProfileData> {
        super::profile::update_profile(self, email, update).await
    }

    async fn submit_review(&self, product_id: &str, review: &ReviewRequest) -> Result<()> {
        super::reviews::submit_review(self, product_id, review).await
    }

    async fn create_bid(&self, bid: &BidRequest) -> Result<Bid> {
        super::bids::create_bid(self, bid).await
    }

    async fn upload_product(&self, product: NewProduct) -> Result<Product> {
        super::upload::upload_product(self, product).await
    }

    async fn fetch_weather(&self, at: Coordinates) -> Result<WeatherReport> {
        super::farm::fetch_weather(self, at).await
    }

    async fn recommend_crop(&self, conditions: &CropConditions) -> Result<CropRecommendation> {
        super::farm::recommend_crop(self, conditions).await
    }

    fn image_url(&self, file: &str) -> Option<String> {
        shared::upload_url(&self.base, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::{keys, MemoryStore};
    use crate::core::service::KeyValueStore;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&ClientConfig::with_base_url(server.uri())).unwrap()
    }

    #[test]
    fn test_endpoint_percent_encodes_segments() {
        let client = ApiClient::new(&ClientConfig::with_base_url("http://10.0.0.5:5000/")).unwrap();
        let url = client.endpoint(&["products", "a b/c@farm.in"]).unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.5:5000/products/a%20b%2Fc@farm.in");
    }

    #[test]
    fn test_image_url_uses_configured_base() {
        let client = ApiClient::new(&ClientConfig::with_base_url("http://10.0.0.5:5000/")).unwrap();
        assert_eq!(
            client.image_url("tomato.jpg").as_deref(),
            Some("http://10.0.0.5:5000/uploads/tomato.jpg")
        );
        assert_eq!(client.image_url(""), None);
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(br#"{"message":"Invalid password"}"#).as_deref(),
            Some("Invalid password")
        );
        assert_eq!(error_message(br#"{"error":"Not found"}"#).as_deref(), Some("Not found"));
        assert_eq!(error_message(b"Bad token").as_deref(), Some("Bad token"));
        assert_eq!(error_message(b"<html>oops</html>"), None);
        assert_eq!(error_message(b""), None);
    }

    #[tokio::test]
    async fn test_request_hook_sets_bearer_and_request_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .and(header("authorization", "Bearer t1"))
            .and(header_exists(REQUEST_ID_HEADER))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        store.set(keys::USER_TOKEN, "t1").await.unwrap();
        store.set(keys::USER_EMAIL, "a@b.com").await.unwrap();
        store.set(keys::USER_ROLE, "consumer").await.unwrap();
        let session = Arc::new(SessionManager::new(store));
        session.restore().await;

        let client = client_for(&server).with_session(session);
        let request = client.request(Method::GET, &["products"]).unwrap();
        let products: Vec<Product> = client.send_json(request).await.unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_response_hook_classifies_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/boom"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/denied"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(serde_json::json!({"message": "Not yours"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);

        let err = client
            .send_empty(client.request(Method::GET, &["boom"]).unwrap())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AppError::Server { status: Some(503), message: "Service Unavailable".into() }
        );

        let err = client
            .send_empty(client.request(Method::GET, &["denied"]).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), Some(403));
        assert_eq!(err.user_message(), "Not yours");
    }

    #[tokio::test]
    async fn test_fallback_message_only_for_bodyless_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = client
            .request(Method::POST, &["api", "auth", "login"])
            .unwrap()
            .fallback_message("Please check your credentials");
        let err = client.send_empty(request).await.unwrap_err();
        assert_eq!(err.user_message(), "Please check your credentials");
    }

    #[tokio::test]
    async fn test_undecodable_body_is_server_error_without_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .send_json::<Vec<Product>>(client.request(Method::GET, &["products"]).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Server { status: None, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = ApiClient::new(&ClientConfig::with_base_url("http://127.0.0.1:9")).unwrap();
        let err = client
            .send_empty(client.request(Method::GET, &["products"]).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::core::error::ErrorKind::NetworkUnreachable);
        assert!(err.is_retryable());
    }
}
