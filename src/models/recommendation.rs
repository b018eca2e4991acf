use super::crop_profile::WaterRequirement;
use super::features::FeatureVector;
use super::market::MarketDemand;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            RiskLevel::Low => "✓",
            RiskLevel::Medium => "→",
            RiskLevel::High => "⚠",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How well the current month suits sowing a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonFit {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl SeasonFit {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonFit::Excellent => "Excellent",
            SeasonFit::Good => "Good",
            SeasonFit::Fair => "Fair",
            SeasonFit::Poor => "Poor",
        }
    }
}

impl std::fmt::Display for SeasonFit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub crop: String,
    pub suitability_score: f64,
    pub predicted_yield_kg_per_ha: f64,
    pub estimated_profit_inr: f64,
    pub sustainability_score: f64,
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub season_suitability: SeasonFit,
    pub water_requirement: WaterRequirement,
    pub market_demand: MarketDemand,
}

impl RecommendationRecord {
    /// Conservative record returned when no crop clears the inclusion threshold.
    pub fn fallback(crop: impl Into<String>) -> Self {
        Self {
            crop: crop.into(),
            suitability_score: 0.6,
            predicted_yield_kg_per_ha: 3000.0,
            estimated_profit_inr: 25000.0,
            sustainability_score: 0.7,
            confidence: 0.7,
            risk_level: RiskLevel::Medium,
            season_suitability: SeasonFit::Fair,
            water_requirement: WaterRequirement::High,
            market_demand: MarketDemand::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImpact {
    pub feature: String,
    pub impact: f64,
}

impl FeatureImpact {
    pub fn new(feature: impl Into<String>, impact: f64) -> Self {
        Self {
            feature: feature.into(),
            impact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationBundle {
    pub narrative: String,
    pub top_features: Vec<FeatureImpact>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NutrientStatus {
    Low,
    Medium,
    High,
}

impl NutrientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientStatus::Low => "Low",
            NutrientStatus::Medium => "Medium",
            NutrientStatus::High => "High",
        }
    }
}

impl std::fmt::Display for NutrientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilHealthReport {
    /// 0-100
    pub health_score: u8,
    pub nitrogen: NutrientStatus,
    pub phosphorus: NutrientStatus,
    pub potassium: NutrientStatus,
    pub advice: Vec<String>,
}

impl SoilHealthReport {
    pub fn nutrient_summary(&self) -> String {
        format!(
            "N: {}, P: {}, K: {}",
            self.nitrogen, self.phosphorus, self.potassium
        )
    }
}

/// Everything produced for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub generated_at: DateTime<Utc>,
    pub month: u32,
    pub scoring_policy: String,
    pub risk_policy: String,
    pub features: FeatureVector,
    pub recommendations: Vec<RecommendationRecord>,
    pub explanation: ExplanationBundle,
    pub soil_health: SoilHealthReport,
    pub used_fallback: bool,
}

impl RecommendationReport {
    pub fn top(&self) -> Option<&RecommendationRecord> {
        self.recommendations.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_record_is_conservative() {
        let record = RecommendationRecord::fallback("Rice");
        assert_eq!(record.crop, "Rice");
        assert_eq!(record.risk_level, RiskLevel::Medium);
        assert!((record.suitability_score - 0.6).abs() < 1e-9);
        assert!((record.predicted_yield_kg_per_ha - 3000.0).abs() < 1e-9);
        assert!((record.estimated_profit_inr - 25000.0).abs() < 1e-9);
    }

    #[test]
    fn risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn record_serializes_display_strings() {
        let record = RecommendationRecord {
            water_requirement: WaterRequirement::VeryHigh,
            market_demand: MarketDemand::VeryStrong,
            ..RecommendationRecord::fallback("Sugarcane")
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["water_requirement"], "Very High");
        assert_eq!(json["market_demand"], "Very Strong");
        assert_eq!(json["risk_level"], "Medium");
        assert_eq!(json["season_suitability"], "Fair");
    }
}
