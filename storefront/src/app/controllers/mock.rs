//! In-crate `ApiService` double for controller tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::{
    Bid, BidRequest, Coordinates, CropConditions, CropRecommendation, LoginResponse, Product,
    ProfileData, ProfileUpdate, RegisterRequest, RegisterResponse, ReviewRequest, Role,
    WeatherReport,
};

use crate::core::error::{AppError, Result};
use crate::core::service::ApiService;
use crate::services::api::upload::NewProduct;
use crate::services::cart::CartStore;
use crate::services::session::SessionManager;
use crate::services::storage::MemoryStore;

#[derive(Default)]
pub struct MockApiService {
    pub login: Mutex<Option<Result<LoginResponse>>>,
    pub products: Mutex<Option<Result<Vec<Product>>>>,
    pub profile: Mutex<Option<Result<ProfileData>>>,
    pub upload: Mutex<Option<Result<Product>>>,
    pub review: Mutex<Option<Result<()>>>,
    pub weather: Mutex<Option<Result<WeatherReport>>>,
    pub crop: Mutex<Option<Result<CropRecommendation>>>,
    pub delay: Mutex<Option<Duration>>,
    pub calls: Mutex<Vec<String>>,
}

impl MockApiService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    async fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn take<T: Clone>(slot: &Mutex<Option<Result<T>>>, name: &str) -> Result<T> {
        slot.lock().clone().unwrap_or_else(|| {
            Err(AppError::Server {
                status: Some(501),
                message: format!("mock has no {} response", name),
            })
        })
    }
}

#[async_trait]
impl ApiService for MockApiService {
    async fn login(&self, phone: &str, _password: &str) -> Result<LoginResponse> {
        self.record(format!("login:{}", phone)).await;
        Self::take(&self.login, "login")
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        self.record(format!("register:{}", request.email)).await;
        Ok(RegisterResponse::default())
    }

    async fn fetch_products(&self) -> Result<Vec<Product>> {
        self.record("fetch_products").await;
        Self::take(&self.products, "products")
    }

    async fn fetch_products_by_owner(&self, email: &str) -> Result<Vec<Product>> {
        self.record(format!("fetch_products_by_owner:{}", email)).await;
        Self::take(&self.products, "products")
    }

    async fn fetch_profile(&self, email: &str) -> Result<ProfileData> {
        self.record(format!("fetch_profile:{}", email)).await;
        Self::take(&self.profile, "profile")
    }

    async fn update_profile(&self, email: &str, update: &ProfileUpdate) -> Result<ProfileData> {
        self.record(format!("update_profile:{}", email)).await;
        let mut profile = Self::take(&self.profile, "profile")?;
        if let Some(name) = &update.name {
            profile.name = name.clone();
        }
        if let Some(phone) = &update.phone {
            profile.phone = phone.clone();
        }
        Ok(profile)
    }

    async fn submit_review(&self, product_id: &str, _review: &ReviewRequest) -> Result<()> {
        self.record(format!("submit_review:{}", product_id)).await;
        self.review.lock().clone().unwrap_or(Ok(()))
    }

    async fn create_bid(&self, bid: &BidRequest) -> Result<Bid> {
        self.record(format!("create_bid:{}", bid.product_id)).await;
        Ok(Bid {
            id: None,
            product_id: bid.product_id.clone(),
            bidder_email: bid.bidder_email.clone(),
            amount: bid.amount,
        })
    }

    async fn upload_product(&self, product: NewProduct) -> Result<Product> {
        self.record(format!("upload_product:{}", product.id)).await;
        Self::take(&self.upload, "upload")
    }

    async fn fetch_weather(&self, at: Coordinates) -> Result<WeatherReport> {
        self.record(format!("fetch_weather:{},{}", at.latitude, at.longitude)).await;
        Self::take(&self.weather, "weather")
    }

    async fn recommend_crop(&self, _conditions: &CropConditions) -> Result<CropRecommendation> {
        self.record("recommend_crop").await;
        Self::take(&self.crop, "crop")
    }

    fn image_url(&self, file: &str) -> Option<String> {
        shared::upload_url("http://farm.test", file)
    }
}

pub fn product(id: &str, price: f64) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {}", id),
        price,
        quantity: 25,
        images: vec![format!("{}.jpg", id)],
        owner_email: "farmer@farm.in".to_string(),
        description: None,
    }
}

pub fn weather_report(description: &str) -> WeatherReport {
    WeatherReport {
        temperature_c: 29.0,
        humidity: Some(55.0),
        description: description.to_string(),
        place: Some("Nashik".to_string()),
    }
}

pub fn login_response(role: Role) -> LoginResponse {
    LoginResponse {
        email: "a@b.com".to_string(),
        role,
        token: "t1".to_string(),
        phone: None,
        full_name: None,
    }
}

/// Session manager over a fresh memory store, optionally signed in.
pub async fn session_with(role: Option<Role>) -> (Arc<MemoryStore>, Arc<SessionManager>) {
    let store = Arc::new(MemoryStore::new());
    let session = Arc::new(SessionManager::new(store.clone()));
    if let Some(role) = role {
        session
            .establish(&login_response(role), "9999999999")
            .await
            .unwrap();
    }
    (store, session)
}

pub fn cart_for(store: &Arc<MemoryStore>) -> Arc<CartStore> {
    Arc::new(CartStore::new(store.clone()))
}
