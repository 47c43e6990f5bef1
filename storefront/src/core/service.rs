//! # Service Traits
//!
//! Traits for dependency injection, enabling testability and modularity.

use async_trait::async_trait;
use shared::{
    Bid, BidRequest, Coordinates, CropConditions, CropRecommendation, LoginResponse, Product,
    ProfileData, ProfileUpdate, RegisterRequest, RegisterResponse, ReviewRequest, WeatherReport,
};

use crate::core::error::Result;
use crate::services::api::upload::NewProduct;

/// Remote resource accessors.
///
/// Controllers only see this trait, so tests can swap in a mock backend.
/// Every method validates its inputs before touching the network.
#[async_trait]
pub trait ApiService: Send + Sync {
    /// Authenticate with phone number and password.
    async fn login(&self, phone: &str, password: &str) -> Result<LoginResponse>;

    /// Create a new account.
    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse>;

    /// All products, for the buyer home screen.
    async fn fetch_products(&self) -> Result<Vec<Product>>;

    /// Products listed by one farmer.
    async fn fetch_products_by_owner(&self, email: &str) -> Result<Vec<Product>>;

    async fn fetch_profile(&self, email: &str) -> Result<ProfileData>;

    async fn update_profile(&self, email: &str, update: &ProfileUpdate) -> Result<ProfileData>;

    async fn submit_review(&self, product_id: &str, review: &ReviewRequest) -> Result<()>;

    async fn create_bid(&self, bid: &BidRequest) -> Result<Bid>;

    /// Multipart product upload. Returns the product as created by the backend.
    async fn upload_product(&self, product: NewProduct) -> Result<Product>;

    /// Current weather at `at`, from the weather provider.
    async fn fetch_weather(&self, at: Coordinates) -> Result<WeatherReport>;

    /// Crop suggested for the given soil and climate readings.
    async fn recommend_crop(&self, conditions: &CropConditions) -> Result<CropRecommendation>;

    /// Public URL of an uploaded image, `None` for an empty file name.
    fn image_url(&self, file: &str) -> Option<String>;
}

/// Durable string key-value storage backing the session and the cart.
///
/// A missing key is `Ok(None)`, never an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove several keys in one write. Absent keys are ignored.
    async fn remove(&self, keys: &[&str]) -> Result<()>;
}

/// Where the device is.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// `Ok(None)` when the location is unknown or access was denied.
    async fn current_location(&self) -> Result<Option<Coordinates>>;
}
