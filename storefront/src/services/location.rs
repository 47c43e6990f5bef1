//! Device location.
//!
//! A headless client has no GPS, so the location is a fixed point from
//! configuration (`STOREFRONT_FARM_LOCATION`), or unknown.

use async_trait::async_trait;
use shared::Coordinates;

use crate::core::error::Result;
use crate::core::service::LocationProvider;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedLocation {
    at: Option<Coordinates>,
}

impl FixedLocation {
    pub fn new(at: Option<Coordinates>) -> Self {
        Self { at }
    }

    pub fn unknown() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<Option<Coordinates>> {
        Ok(self.at)
    }
}
