//! # Utility Functions
//!
//! - **[`validation`]**: Input validation for forms and accessor arguments
//!
//! ## Related Modules
//!
//! - [`shared::utils`]: Wire-format helpers (image URLs, price formatting)
//! - [`crate::core`]: Core abstractions and error types

pub mod validation;
