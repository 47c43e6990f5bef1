//! # Role Home
//!
//! One controller serves both home screens. The session's role picks the
//! [`RoleConfig`] and what gets fetched:
//!
//! - consumer: every listed product
//! - farmer: profile and own products, fetched concurrently and joined fail-fast,
//!   plus the weather at the farm alongside them as an optional [`Section`]
//!
//! The crop recommendation is fetched on request, never on load.

use std::sync::Arc;

use async_trait::async_trait;
use shared::{CropConditions, CropRecommendation, Product, ProfileData, Role, WeatherReport};

use crate::app::controller::{ScreenController, ScreenError, ScreenLifecycle, ScreenState};
use crate::app::state::RoleConfig;
use crate::core::error::{AppError, Result};
use crate::core::service::{ApiService, LocationProvider};
use crate::services::location::FixedLocation;
use crate::services::session::SessionManager;

pub const LOCATION_UNAVAILABLE: &str = "Location is not available";

#[derive(Debug, Clone, PartialEq)]
pub struct HomeData {
    pub config: RoleConfig,
    pub greeting_name: String,
    pub products: Vec<Product>,
    /// Farmer home only
    pub profile: Option<ProfileData>,
    /// Farmer home only
    pub insights: Option<FarmInsights>,
}

/// Part of a screen loaded on its own. A failed section leaves the rest of the
/// screen usable.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    /// Not requested yet
    Idle,
    /// Cannot be shown on this device
    Unavailable(String),
    Ready(T),
    Failed(ScreenError),
}

impl<T> Section<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Result<T>> for Section<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Section::Ready(value),
            Err(err) => Section::Failed(ScreenError::from(&err)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FarmInsights {
    pub weather: Section<WeatherReport>,
    pub crop: Section<CropRecommendation>,
}

pub struct HomeController {
    api: Arc<dyn ApiService>,
    session: Arc<SessionManager>,
    location: Arc<dyn LocationProvider>,
    screen: ScreenController<HomeData>,
}

impl HomeController {
    pub fn new(api: Arc<dyn ApiService>, session: Arc<SessionManager>) -> Self {
        Self {
            api,
            session,
            location: Arc::new(FixedLocation::unknown()),
            screen: ScreenController::new("home"),
        }
    }

    pub fn with_location(mut self, location: Arc<dyn LocationProvider>) -> Self {
        self.location = location;
        self
    }

    pub fn state(&self) -> ScreenState<HomeData> {
        self.screen.state()
    }

    /// Thumbnail URL for a product card.
    pub fn image_url(&self, product: &Product) -> Option<String> {
        product.cover_image().and_then(|file| self.api.image_url(file))
    }

    /// Ask for a crop recommendation and show it in the farmer home's crop
    /// section. The outcome lands in the section either way.
    pub async fn recommend_crop(&self) -> Result<CropRecommendation> {
        let on_farmer_home = self
            .screen
            .data()
            .is_some_and(|data| data.insights.is_some());
        if !on_farmer_home {
            return Err(AppError::Validation(
                "Crop recommendations are available on the farmer home".to_string(),
            ));
        }

        let result = self.api.recommend_crop(&CropConditions::default()).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Crop recommendation failed");
        }
        let section = Section::from(result.clone());
        self.screen.update(|data| {
            if let Some(insights) = &mut data.insights {
                insights.crop = section;
            }
        });
        result
    }
}

async fn weather_section(
    api: &dyn ApiService,
    location: &dyn LocationProvider,
) -> Section<WeatherReport> {
    match location.current_location().await {
        Ok(Some(at)) => {
            let result = api.fetch_weather(at).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "Weather unavailable");
            }
            Section::from(result)
        }
        Ok(None) => Section::Unavailable(LOCATION_UNAVAILABLE.to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Location lookup failed");
            Section::Failed(ScreenError::from(&e))
        }
    }
}

#[async_trait]
impl ScreenLifecycle for HomeController {
    fn mount(&self) {
        self.screen.mount();
    }

    fn unmount(&self) {
        self.screen.unmount();
    }

    async fn load(&self) -> Result<()> {
        let api = self.api.clone();
        let location = self.location.clone();
        self.screen
            .load_for_session(self.session.current(), |session| async move {
                let config = RoleConfig::for_role(session.role);
                match session.role {
                    Role::Consumer => {
                        let products = api.fetch_products().await?;
                        Ok(HomeData {
                            config,
                            greeting_name: session.greeting_name().to_string(),
                            products,
                            profile: None,
                            insights: None,
                        })
                    }
                    Role::Farmer => {
                        let (listing, weather) = tokio::join!(
                            async {
                                tokio::try_join!(
                                    api.fetch_profile(&session.email),
                                    api.fetch_products_by_owner(&session.email),
                                )
                            },
                            weather_section(api.as_ref(), location.as_ref()),
                        );
                        let (profile, products) = listing?;
                        let greeting_name = if profile.name.trim().is_empty() {
                            session.greeting_name().to_string()
                        } else {
                            profile.name.clone()
                        };
                        Ok(HomeData {
                            config,
                            greeting_name,
                            products,
                            profile: Some(profile),
                            insights: Some(FarmInsights {
                                weather,
                                crop: Section::Idle,
                            }),
                        })
                    }
                }
            })
            .await
    }
}
