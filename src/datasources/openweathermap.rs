use crate::config::OpenWeatherMapConfig;
use crate::error::{CropwiseError, Result};
use crate::models::WeatherSnapshot;
use chrono::Utc;
use serde::Deserialize;

const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: OpenWeatherMapConfig,
}

// OpenWeatherMap API response structures
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    #[serde(default)]
    name: String,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmWeather>,
    #[serde(default)]
    rain: Option<OwmPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmPrecipitation {
    #[serde(rename = "1h", default)]
    one_hour: Option<f64>,
    #[serde(rename = "3h", default)]
    three_hour: Option<f64>,
}

impl OpenWeatherMapClient {
    pub fn new(config: OpenWeatherMapConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Client for explicit coordinates, reusing the configured API key
    pub fn at(config: &OpenWeatherMapConfig, latitude: f64, longitude: f64) -> Self {
        Self::new(OpenWeatherMapConfig {
            latitude,
            longitude,
            ..config.clone()
        })
    }

    /// Fetch current conditions in metric units
    pub async fn fetch_current(&self) -> Result<WeatherSnapshot> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            API_BASE_URL, self.config.latitude, self.config.longitude, self.config.api_key
        );

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                CropwiseError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CropwiseError::DataSourceUnavailable(format!(
                "OpenWeatherMap returned {}: {}",
                status, body
            )));
        }

        let owm_response: OwmCurrentResponse = response.json().await.map_err(|e| {
            CropwiseError::DataSourceUnavailable(format!(
                "Failed to parse OpenWeatherMap response: {}",
                e
            ))
        })?;

        let snapshot = self.convert_response(owm_response);
        tracing::info!(weather = %snapshot.summary(), "Fetched current weather");
        Ok(snapshot)
    }

    /// Test connection to OpenWeatherMap API
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            API_BASE_URL, self.config.latitude, self.config.longitude, self.config.api_key
        );

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                CropwiseError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        Ok(response.status().is_success())
    }

    fn convert_response(&self, response: OwmCurrentResponse) -> WeatherSnapshot {
        let location = if response.name.is_empty() {
            format!("{:.2}, {:.2}", self.config.latitude, self.config.longitude)
        } else {
            response.name
        };

        let rainfall_mm = response
            .rain
            .and_then(|r| r.one_hour.or(r.three_hour));

        let description = response
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .unwrap_or_default();

        WeatherSnapshot {
            fetched_at: Utc::now(),
            location,
            temperature_c: response.main.temp,
            humidity_percent: response.main.humidity,
            rainfall_mm,
            description,
        }
    }
}
