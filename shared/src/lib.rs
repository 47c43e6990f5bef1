//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the storefront client and the REST backend.
//! All DTOs use JSON serialization via `serde` for API communication.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Login, registration and role DTOs
//!   - **[`dto::product`]**: Product listings and new-product uploads
//!   - **[`dto::profile`]**: Profile projection and profile edits
//!   - **[`dto::review`]**: Product reviews
//!   - **[`dto::bid`]**: Bid placement (thin wire types only)
//!   - **[`dto::farm`]**: Weather reports and crop recommendations
//! - **[`utils`]**: Wire-format helpers
//!   - **[`utils::upload_url`]**: Build the `/uploads/<file>` image URL
//!   - **[`utils::format_price`]**: Render a rupee amount for display
//!
//! ## Wire Format
//!
//! The backend mixes naming conventions, so field names follow the backend exactly:
//! - Most fields are lowercase single words (`email`, `phone`, `price`)
//! - The user's full name travels as `Fullname` (capital F)
//! - A product's owner travels as `email`
//! - Roles serialize as lowercase strings (`farmer`, `consumer`)
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::auth::{LoginRequest, LoginResponse, Role};
//!
//! let request = LoginRequest {
//!     phone: "9999999999".to_string(),
//!     password: "pass123".to_string(),
//! };
//! let body = serde_json::to_string(&request).unwrap();
//! assert_eq!(body, r#"{"phone":"9999999999","password":"pass123"}"#);
//!
//! let response: LoginResponse = serde_json::from_str(
//!     r#"{"email":"a@b.com","role":"farmer","token":"t1"}"#,
//! ).unwrap();
//! assert_eq!(response.role, Role::Farmer);
//! ```

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
pub use dto::*;
pub use utils::*;
