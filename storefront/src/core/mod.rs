//! # Core Abstractions
//!
//! Core traits and error types for dependency injection and testability.
//!
//! - **[`error`]**: Application error types (`AppError`, `ErrorKind`, `Result<T>`)
//! - **[`service`]**: Service traits for dependency injection (`ApiService`, `KeyValueStore`)
//!
//! ## Error Handling
//!
//! ```rust
//! use storefront::core::error::{AppError, Result};
//!
//! fn require_name(input: &str) -> Result<String> {
//!     if input.trim().is_empty() {
//!         return Err(AppError::Validation("Name is required".to_string()));
//!     }
//!     Ok(input.trim().to_string())
//! }
//!
//! assert!(require_name("  ").is_err());
//! ```
//!
//! ## Dependency Injection
//!
//! Controllers hold an `Arc<dyn ApiService>`; production passes the
//! [`ApiClient`](crate::services::api::ApiClient), tests pass a mock.

pub mod error;
pub mod service;

pub use error::{AppError, ErrorKind, Result};
pub use service::{ApiService, KeyValueStore};
