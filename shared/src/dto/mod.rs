//! # Data Transfer Objects (DTOs)
//!
//! This module contains all data structures used for communication between
//! the storefront client and the backend via the REST API.
//!
//! ## Module Organization
//!
//! - [`auth`] - Login, registration, roles and error bodies
//! - [`product`] - Product listings and uploads
//! - [`profile`] - Profile data and edits
//! - [`review`] - Product reviews
//! - [`bid`] - Bid placement
//! - [`farm`] - Weather and crop recommendation for the farmer home
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /api/auth/login
//! Content-Type: application/json
//!
//! {
//!   "phone": "9999999999",
//!   "password": "pass123"
//! }
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//! Content-Type: application/json
//!
//! {
//!   "email": "a@b.com",
//!   "role": "farmer",
//!   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
//!   "phone": "9999999999",
//!   "Fullname": "Asha Patil"
//! }
//! ```

pub mod auth;
pub mod bid;
pub mod farm;
pub mod product;
pub mod profile;
pub mod review;

pub use auth::*;
pub use bid::*;
pub use farm::*;
pub use product::*;
pub use profile::*;
pub use review::*;
