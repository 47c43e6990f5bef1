//! # Services
//!
//! - [`api`]: HTTP client wrapper and remote resource accessors
//! - [`storage`]: Persistent key-value store (file and in-memory)
//! - [`session`]: The device session, restored from and written to storage
//! - [`cart`]: Device-local cart and pricing
//! - [`location`]: Where the farm is, for the weather section

pub mod api;
pub mod cart;
pub mod location;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use cart::CartStore;
pub use location::FixedLocation;
pub use session::{Session, SessionManager};
pub use storage::{FileStore, MemoryStore};
