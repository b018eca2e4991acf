use crate::error::{CropwiseError, Result};
use crate::knowledge::SoilClass;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TEMPERATURE_C: f64 = 25.0;
pub const DEFAULT_HUMIDITY_PERCENT: f64 = 60.0;
pub const DEFAULT_RAINFALL_MM: f64 = 50.0;
pub const DEFAULT_PH: f64 = 6.5;
pub const DEFAULT_NITROGEN: f64 = 30.0;
pub const DEFAULT_PHOSPHORUS: f64 = 15.0;
pub const DEFAULT_POTASSIUM: f64 = 80.0;
pub const DEFAULT_ORGANIC_CARBON: f64 = 1.0;
pub const DEFAULT_SOIL_TYPE: &str = "Loamy";
pub const DEFAULT_AREA_HA: f64 = 1.0;
pub const DEFAULT_EXPERIENCE_YEARS: u32 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FarmingMethod {
    Organic,
    #[default]
    Conventional,
    Mixed,
}

impl FarmingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            FarmingMethod::Organic => "organic",
            FarmingMethod::Conventional => "conventional",
            FarmingMethod::Mixed => "mixed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "organic" => Some(FarmingMethod::Organic),
            "conventional" => Some(FarmingMethod::Conventional),
            "mixed" => Some(FarmingMethod::Mixed),
            _ => None,
        }
    }
}

impl std::fmt::Display for FarmingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IrrigationType {
    #[default]
    Rainfed,
    Irrigated,
    Drip,
    Sprinkler,
}

impl IrrigationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IrrigationType::Rainfed => "rainfed",
            IrrigationType::Irrigated => "irrigated",
            IrrigationType::Drip => "drip",
            IrrigationType::Sprinkler => "sprinkler",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rainfed" | "rain-fed" | "none" => Some(IrrigationType::Rainfed),
            "irrigated" | "flood" | "canal" => Some(IrrigationType::Irrigated),
            "drip" => Some(IrrigationType::Drip),
            "sprinkler" => Some(IrrigationType::Sprinkler),
            _ => None,
        }
    }

    /// Drip and sprinkler systems
    pub fn is_efficient(&self) -> bool {
        matches!(self, IrrigationType::Drip | IrrigationType::Sprinkler)
    }
}

impl std::fmt::Display for IrrigationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Field conditions for a single recommendation request.
///
/// Temperature is in °C, rainfall in mm, nutrients in kg/ha and
/// organic carbon in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub ph: f64,
    #[serde(rename = "N")]
    pub nitrogen: f64,
    #[serde(rename = "P")]
    pub phosphorus: f64,
    #[serde(rename = "K")]
    pub potassium: f64,
    pub organic_carbon: f64,
    pub soil_type: String,
    pub area_ha: f64,
    pub farming_method: FarmingMethod,
    pub irrigation_type: IrrigationType,
    pub experience_years: u32,
}

impl FeatureVector {
    /// Reject vectors the calculators cannot reason about.
    pub fn validate(&self) -> Result<()> {
        let numeric = [
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("rainfall", self.rainfall),
            ("ph", self.ph),
            ("N", self.nitrogen),
            ("P", self.phosphorus),
            ("K", self.potassium),
            ("organic_carbon", self.organic_carbon),
            ("area_ha", self.area_ha),
        ];
        if let Some((name, value)) = numeric.iter().find(|(_, v)| !v.is_finite()) {
            return Err(CropwiseError::InvalidFeature(format!(
                "{} must be a finite number, got {}",
                name, value
            )));
        }

        if self.area_ha <= 0.0 {
            return Err(CropwiseError::InvalidFeature(format!(
                "area_ha must be greater than zero, got {}",
                self.area_ha
            )));
        }
        if !(0.0..=14.0).contains(&self.ph) {
            return Err(CropwiseError::InvalidFeature(format!(
                "ph must be between 0 and 14, got {}",
                self.ph
            )));
        }
        if !(0.0..=100.0).contains(&self.humidity) {
            return Err(CropwiseError::InvalidFeature(format!(
                "humidity must be between 0 and 100, got {}",
                self.humidity
            )));
        }
        if self.soil_type.trim().is_empty() {
            return Err(CropwiseError::InvalidFeature(
                "soil_type must not be empty".into(),
            ));
        }

        Ok(())
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE_C,
            humidity: DEFAULT_HUMIDITY_PERCENT,
            rainfall: DEFAULT_RAINFALL_MM,
            ph: DEFAULT_PH,
            nitrogen: DEFAULT_NITROGEN,
            phosphorus: DEFAULT_PHOSPHORUS,
            potassium: DEFAULT_POTASSIUM,
            organic_carbon: DEFAULT_ORGANIC_CARBON,
            soil_type: DEFAULT_SOIL_TYPE.to_string(),
            area_ha: DEFAULT_AREA_HA,
            farming_method: FarmingMethod::default(),
            irrigation_type: IrrigationType::default(),
            experience_years: DEFAULT_EXPERIENCE_YEARS,
        }
    }
}

/// Partially specified request, as supplied by a form, file or CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureInput {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub rainfall: Option<f64>,
    pub ph: Option<f64>,
    #[serde(rename = "N")]
    pub nitrogen: Option<f64>,
    #[serde(rename = "P")]
    pub phosphorus: Option<f64>,
    #[serde(rename = "K")]
    pub potassium: Option<f64>,
    pub organic_carbon: Option<f64>,
    pub soil_type: Option<String>,
    pub area_ha: Option<f64>,
    pub farming_method: Option<FarmingMethod>,
    pub irrigation_type: Option<IrrigationType>,
    pub experience_years: Option<u32>,
}

impl FeatureInput {
    /// Read a request from a `.json` file, or YAML for any other extension.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let input = if is_json {
            serde_json::from_str(&contents)?
        } else {
            serde_yaml::from_str(&contents)?
        };
        tracing::debug!(path = %path.display(), "Loaded field conditions");
        Ok(input)
    }

    /// Fill gaps in `self` from `fallback`. Values already present win.
    pub fn or(self, fallback: FeatureInput) -> FeatureInput {
        FeatureInput {
            temperature: self.temperature.or(fallback.temperature),
            humidity: self.humidity.or(fallback.humidity),
            rainfall: self.rainfall.or(fallback.rainfall),
            ph: self.ph.or(fallback.ph),
            nitrogen: self.nitrogen.or(fallback.nitrogen),
            phosphorus: self.phosphorus.or(fallback.phosphorus),
            potassium: self.potassium.or(fallback.potassium),
            organic_carbon: self.organic_carbon.or(fallback.organic_carbon),
            soil_type: self.soil_type.or(fallback.soil_type),
            area_ha: self.area_ha.or(fallback.area_ha),
            farming_method: self.farming_method.or(fallback.farming_method),
            irrigation_type: self.irrigation_type.or(fallback.irrigation_type),
            experience_years: self.experience_years.or(fallback.experience_years),
        }
    }

    /// Apply declared defaults and validate.
    ///
    /// Soil chemistry gaps are filled from the soil class's typical values
    /// when the soil type is a known class; otherwise the field defaults apply.
    pub fn resolve(self) -> Result<FeatureVector> {
        let defaults = FeatureVector::default();
        let soil_class = self.soil_type.as_deref().and_then(SoilClass::from_str);
        let typical = soil_class.map(|c| c.typical_values());

        let features = FeatureVector {
            temperature: self.temperature.unwrap_or(defaults.temperature),
            humidity: self.humidity.unwrap_or(defaults.humidity),
            rainfall: self.rainfall.unwrap_or(defaults.rainfall),
            ph: self
                .ph
                .or(typical.map(|t| t.ph))
                .unwrap_or(defaults.ph),
            nitrogen: self
                .nitrogen
                .or(typical.map(|t| t.nitrogen))
                .unwrap_or(defaults.nitrogen),
            phosphorus: self
                .phosphorus
                .or(typical.map(|t| t.phosphorus))
                .unwrap_or(defaults.phosphorus),
            potassium: self
                .potassium
                .or(typical.map(|t| t.potassium))
                .unwrap_or(defaults.potassium),
            organic_carbon: self
                .organic_carbon
                .or(typical.map(|t| t.organic_carbon))
                .unwrap_or(defaults.organic_carbon),
            soil_type: match (self.soil_type, soil_class) {
                (_, Some(class)) => class.as_str().to_string(),
                (Some(raw), None) => raw.trim().to_string(),
                (None, None) => defaults.soil_type,
            },
            area_ha: self.area_ha.unwrap_or(defaults.area_ha),
            farming_method: self.farming_method.unwrap_or(defaults.farming_method),
            irrigation_type: self.irrigation_type.unwrap_or(defaults.irrigation_type),
            experience_years: self.experience_years.unwrap_or(defaults.experience_years),
        };

        features.validate()?;
        Ok(features)
    }
}

impl From<FeatureVector> for FeatureInput {
    fn from(features: FeatureVector) -> Self {
        Self {
            temperature: Some(features.temperature),
            humidity: Some(features.humidity),
            rainfall: Some(features.rainfall),
            ph: Some(features.ph),
            nitrogen: Some(features.nitrogen),
            phosphorus: Some(features.phosphorus),
            potassium: Some(features.potassium),
            organic_carbon: Some(features.organic_carbon),
            soil_type: Some(features.soil_type),
            area_ha: Some(features.area_ha),
            farming_method: Some(features.farming_method),
            irrigation_type: Some(features.irrigation_type),
            experience_years: Some(features.experience_years),
        }
    }
}
