//! # Client Configuration
//!
//! Configuration loaded from environment variables and validated on startup,
//! so a misconfigured client fails before the first request.
//!
//! ## Global Config Access
//!
//! ```rust,no_run
//! use storefront::config::{client_config, init_config};
//!
//! init_config().expect("invalid configuration");
//! let base = &client_config().api_base_url;
//! ```
//!
//! | Variable | Default |
//! |---|---|
//! | `STOREFRONT_API_URL` | `http://127.0.0.1:5000` |
//! | `STOREFRONT_HTTP_TIMEOUT_MS` | `10000` (1 to 120000) |
//! | `STOREFRONT_SESSION_FILE` | `data/session.json` |
//! | `STOREFRONT_WEATHER_URL` | `https://api.openweathermap.org/data/2.5/weather` |
//! | `STOREFRONT_WEATHER_API_KEY` | unset (weather section unavailable) |
//! | `STOREFRONT_CROP_URL` | `https://crop-recommender-ml.onrender.com/predict` |
//! | `STOREFRONT_FARM_LOCATION` | unset; `"<lat>,<lon>"` in decimal degrees |

use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use shared::Coordinates;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const MAX_TIMEOUT_MS: u64 = 120_000;
pub const DEFAULT_SESSION_FILE: &str = "data/session.json";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_CROP_URL: &str = "https://crop-recommender-ml.onrender.com/predict";

/// Configuration errors. Reported by the binary, which then exits non-zero.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("Config has already been initialized")]
    AlreadyInitialized,
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash. Every accessor and image
    /// URL is built from this single endpoint.
    pub api_base_url: String,

    /// Fixed per-request timeout. Nothing retries after it elapses.
    pub request_timeout: Duration,

    /// JSON file holding the persisted session and cart keys.
    pub session_file: PathBuf,

    /// Current-weather endpoint of the weather provider.
    pub weather_url: String,

    /// Weather provider key. Without one the farmer home has no weather.
    pub weather_api_key: Option<String>,

    /// Crop recommender predict endpoint.
    pub crop_url: String,

    /// Where the farm is. Stands in for the device location.
    pub farm_location: Option<Coordinates>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            weather_api_key: None,
            crop_url: DEFAULT_CROP_URL.to_string(),
            farm_location: None,
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` with every other value defaulted.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base_url(&base_url.into()),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = env::var("STOREFRONT_API_URL")
            .map(|v| normalize_base_url(&v))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout_ms: u64 = match env::var("STOREFRONT_HTTP_TIMEOUT_MS") {
            Ok(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                name: "STOREFRONT_HTTP_TIMEOUT_MS",
                reason: format!("must be a whole number of milliseconds: {}", e),
            })?,
            Err(_) => DEFAULT_TIMEOUT_MS,
        };

        let session_file = env::var("STOREFRONT_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE));

        let farm_location = match env::var("STOREFRONT_FARM_LOCATION") {
            Ok(raw) => Some(parse_coordinates(&raw).map_err(|reason| ConfigError::Invalid {
                name: "STOREFRONT_FARM_LOCATION",
                reason,
            })?),
            Err(_) => None,
        };

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_millis(timeout_ms),
            session_file,
            weather_url: env::var("STOREFRONT_WEATHER_URL")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|_| DEFAULT_WEATHER_URL.to_string()),
            weather_api_key: env::var("STOREFRONT_WEATHER_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            crop_url: env::var("STOREFRONT_CROP_URL")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|_| DEFAULT_CROP_URL.to_string()),
            farm_location,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("STOREFRONT_API_URL", &self.api_base_url)?;
        validate_http_url("STOREFRONT_WEATHER_URL", &self.weather_url)?;
        validate_http_url("STOREFRONT_CROP_URL", &self.crop_url)?;

        let ms = self.request_timeout.as_millis() as u64;
        if ms == 0 || ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid {
                name: "STOREFRONT_HTTP_TIMEOUT_MS",
                reason: format!("must be between 1 and {}", MAX_TIMEOUT_MS),
            });
        }

        if self.session_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                name: "STOREFRONT_SESSION_FILE",
                reason: "must not be empty".to_string(),
            });
        }

        if let Some(location) = &self.farm_location {
            if !location.is_valid() {
                return Err(ConfigError::Invalid {
                    name: "STOREFRONT_FARM_LOCATION",
                    reason: "latitude must be within ±90 and longitude within ±180".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn validate_http_url(name: &'static str, raw: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(raw).map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(())
}

/// Parse `"<lat>,<lon>"`.
fn parse_coordinates(raw: &str) -> Result<Coordinates, String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| "expected \"<lat>,<lon>\"".to_string())?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("'{}' is not a number: {}", v.trim(), e))
    };
    Ok(Coordinates::new(parse(lat)?, parse(lon)?))
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

static CONFIG: OnceLock<ClientConfig> = OnceLock::new();

/// Initialize the global configuration. Call once at startup.
pub fn init_config() -> Result<&'static ClientConfig, ConfigError> {
    let config = ClientConfig::from_env()?;
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    Ok(client_config())
}

/// Get the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet.
pub fn client_config() -> &'static ClientConfig {
    CONFIG
        .get()
        .expect("Config must be initialized with init_config() before use")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout, Duration::from_millis(10_000));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ClientConfig::with_base_url("http://10.0.0.5:5000/");
        assert_eq!(config.api_base_url, "http://10.0.0.5:5000");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ClientConfig::with_base_url("ftp://farm.example");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { name: "STOREFRONT_API_URL", .. })
        ));

        config = ClientConfig::default();
        config.request_timeout = Duration::from_millis(0);
        assert!(config.validate().is_err());

        config.request_timeout = Duration::from_millis(MAX_TIMEOUT_MS + 1);
        assert!(config.validate().is_err());

        config = ClientConfig::with_base_url("not a url");
        assert!(config.validate().is_err());

        config = ClientConfig::default();
        config.crop_url = "file:///predict".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { name: "STOREFRONT_CROP_URL", .. })
        ));

        config = ClientConfig::default();
        config.farm_location = Some(Coordinates::new(120.0, 10.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_coordinates() {
        assert_eq!(
            parse_coordinates(" 18.52, 73.85 "),
            Ok(Coordinates::new(18.52, 73.85))
        );
        assert!(parse_coordinates("18.52").is_err());
        assert!(parse_coordinates("north,73.85").is_err());
    }
}
