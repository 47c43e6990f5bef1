use serde::{Deserialize, Serialize};

/// A point on the map, in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Current weather at the farm, as shown on the farmer home.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherReport {
    pub temperature_c: f64,
    pub humidity: Option<f64>,
    pub description: String,
    pub place: Option<String>,
}

/// Current-weather body of the weather provider (metric units).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WeatherResponse {
    pub main: WeatherMain,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WeatherMain {
    pub temp: f64,
    #[serde(default)]
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WeatherCondition {
    pub description: String,
}

impl WeatherResponse {
    pub fn into_report(self) -> WeatherReport {
        WeatherReport {
            temperature_c: self.main.temp,
            humidity: self.main.humidity,
            description: self
                .weather
                .into_iter()
                .next()
                .map(|c| c.description)
                .unwrap_or_default(),
            place: self.name.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// Soil and climate readings sent to the crop recommender as a URL-encoded form.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct CropConditions {
    #[serde(rename = "N")]
    pub nitrogen: f64,
    #[serde(rename = "P")]
    pub phosphorus: f64,
    #[serde(rename = "K")]
    pub potassium: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl Default for CropConditions {
    /// Typical readings used when the farm has no soil data of its own.
    fn default() -> Self {
        Self {
            nitrogen: 50.0,
            phosphorus: 30.0,
            potassium: 40.0,
            temperature: 25.0,
            humidity: 60.0,
            ph: 6.5,
            rainfall: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CropRecommendation {
    pub crop: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_response_into_report() {
        let json = r#"{
            "coord": {"lon": 73.85, "lat": 18.52},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}],
            "main": {"temp": 31.4, "feels_like": 33.0, "humidity": 48},
            "name": "Pune"
        }"#;
        let report = serde_json::from_str::<WeatherResponse>(json).unwrap().into_report();
        assert_eq!(report.temperature_c, 31.4);
        assert_eq!(report.humidity, Some(48.0));
        assert_eq!(report.description, "clear sky");
        assert_eq!(report.place.as_deref(), Some("Pune"));
    }

    #[test]
    fn test_crop_conditions_use_short_nutrient_names() {
        let value = serde_json::to_value(CropConditions::default()).unwrap();
        assert_eq!(value["N"], 50.0);
        assert_eq!(value["K"], 40.0);
        assert_eq!(value["ph"], 6.5);
    }

    #[test]
    fn test_coordinates_range() {
        assert!(Coordinates::new(18.52, 73.85).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -181.0).is_valid());
    }
}
