use super::features::FeatureInput;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions at the field, metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub location: String,
    pub temperature_c: f64,
    pub humidity_percent: f64,
    /// Only present when the provider reported precipitation
    pub rainfall_mm: Option<f64>,
    pub description: String,
}

impl WeatherSnapshot {
    pub fn summary(&self) -> String {
        let rain = self
            .rainfall_mm
            .map(|r| format!("{:.1}mm rain", r))
            .unwrap_or_else(|| "no rain reported".to_string());
        format!(
            "{}: {:.1}°C, {:.0}% humidity, {} ({})",
            self.location, self.temperature_c, self.humidity_percent, rain, self.description
        )
    }

    /// Weather-derived fields of a request. Soil and farm fields stay unset.
    pub fn as_feature_input(&self) -> FeatureInput {
        FeatureInput {
            temperature: Some(self.temperature_c),
            humidity: Some(self.humidity_percent),
            rainfall: self.rainfall_mm,
            ..Default::default()
        }
    }
}
