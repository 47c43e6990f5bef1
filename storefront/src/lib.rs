//! # Farm Storefront - Client Data Layer
//!
//! Everything a farm-to-consumer storefront client needs below the UI: the
//! device session, a REST client for the backend, the local cart, and one
//! controller per screen. Presentation renders [`ScreenState`] snapshots and
//! sends [`Intent`]s; nothing here draws pixels.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │  presentation (external)                              │
//! └──────────────┬──────────────────────▲─────────────────┘
//!         Intent │                      │ ScreenState / Notice
//!                ▼                      │
//! ┌───────────────────────────────────────────────────────┐
//! │  app: App, Navigator, screen controllers              │
//! ├───────────────────────────────────────────────────────┤
//! │  services: ApiClient ─ SessionManager ─ CartStore     │
//! │            FileStore / MemoryStore                    │
//! └──────────────┬───────────────────────┬────────────────┘
//!                │ HTTP/JSON, multipart  │ session.json
//!                ▼                       ▼
//!        REST backend             device storage
//! ```
//!
//! ## Module Structure
//!
//! - **app**: orchestrator, navigation, screen controllers
//! - **config**: client configuration from the environment
//! - **core**: error type and service traits
//! - **debug**: logging setup
//! - **services**: HTTP accessors, storage, session, cart
//! - **utils**: form validation
//!
//! ## Usage
//!
//! ```rust,no_run
//! use storefront::{App, ClientConfig, Intent};
//!
//! # async fn run() -> storefront::Result<()> {
//! let config = ClientConfig::from_env().expect("invalid configuration");
//! let app = App::from_config(&config).await?;
//! app.perform(Intent::Start).await?;
//! app.settle().await;
//! println!("first screen: {}", app.current_screen().route_name());
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test -p storefront
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod debug;
pub mod services;
pub mod utils;

// Re-export commonly used types for convenience
pub use app::{App, AppEvent, Intent, Notice, Screen, ScreenState};
pub use config::{ClientConfig, ConfigError};
pub use core::{AppError, ErrorKind, Result};
