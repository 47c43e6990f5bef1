//! # Backend API Client Module
//!
//! HTTP client and typed accessors for the storefront REST backend.
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs       - Module exports and documentation
//! ├── client.rs    - ApiClient: configuration, request/response hooks
//! ├── auth.rs      - Login and registration
//! ├── products.rs  - Product listings
//! ├── profile.rs   - Profile read and update
//! ├── reviews.rs   - Product reviews
//! ├── bids.rs      - Bid creation
//! ├── farm.rs      - Weather and crop recommendation (third-party hosts)
//! └── upload.rs    - Multipart product upload
//! ```

pub mod auth;
pub mod bids;
pub mod client;
pub mod farm;
pub mod products;
pub mod profile;
pub mod reviews;
pub mod upload;

pub use client::{ApiClient, ApiRequest};
pub use upload::{ImageUpload, NewProduct};
