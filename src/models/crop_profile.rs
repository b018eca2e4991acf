use super::market::MarketDemand;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WaterRequirement {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High", alias = "VeryHigh")]
    VeryHigh,
}

impl WaterRequirement {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaterRequirement::Low => "Low",
            WaterRequirement::Medium => "Medium",
            WaterRequirement::High => "High",
            WaterRequirement::VeryHigh => "Very High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(WaterRequirement::Low),
            "medium" => Some(WaterRequirement::Medium),
            "high" => Some(WaterRequirement::High),
            "veryhigh" | "very high" | "very_high" => Some(WaterRequirement::VeryHigh),
            _ => None,
        }
    }
}

impl std::fmt::Display for WaterRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Indian cropping season a crop is sown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    /// Monsoon-sown, June to October
    Kharif,
    /// Winter-sown, November to April
    Rabi,
    /// Year-round crops such as sugarcane
    #[serde(alias = "Year-round")]
    Annual,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Kharif => "Kharif",
            Season::Rabi => "Rabi",
            Season::Annual => "Annual",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "kharif" => Some(Season::Kharif),
            "rabi" => Some(Season::Rabi),
            "annual" | "year-round" | "year round" => Some(Season::Annual),
            _ => None,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed interval of tolerated values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

impl std::fmt::Display for ValueRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// N/P/K amounts in kg/ha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientLevels {
    #[serde(rename = "N")]
    pub nitrogen: f64,
    #[serde(rename = "P")]
    pub phosphorus: f64,
    #[serde(rename = "K")]
    pub potassium: f64,
}

impl NutrientLevels {
    pub const fn new(nitrogen: f64, phosphorus: f64, potassium: f64) -> Self {
        Self {
            nitrogen,
            phosphorus,
            potassium,
        }
    }
}

/// Agronomic requirements and economics for one crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropProfile {
    pub name: String,
    /// Tolerated air temperature in °C
    pub temperature_range: ValueRange,
    pub ph_range: ValueRange,
    /// Minimum rainfall in mm
    pub rainfall_minimum: f64,
    pub nutrient_minimums: NutrientLevels,
    pub preferred_soil_types: Vec<String>,
    pub water_requirement: WaterRequirement,
    /// First entry is the primary season
    pub growing_seasons: Vec<Season>,
    pub base_yield_kg_per_ha: f64,
    /// INR per quintal (100 kg)
    pub reference_price_per_quintal: f64,
    pub cost_fraction_of_revenue: f64,
    #[serde(default)]
    pub market_demand: MarketDemand,
}

impl CropProfile {
    pub fn primary_season(&self) -> Option<Season> {
        self.growing_seasons.first().copied()
    }

    pub fn prefers_soil(&self, soil_type: &str) -> bool {
        let soil_type = soil_type.trim();
        self.preferred_soil_types
            .iter()
            .any(|s| s.eq_ignore_ascii_case(soil_type))
    }

    pub fn optimal_temperature(&self) -> f64 {
        self.temperature_range.midpoint()
    }

    pub fn optimal_ph(&self) -> f64 {
        self.ph_range.midpoint()
    }
}
