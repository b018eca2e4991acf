use super::ScoringPolicy;
use crate::models::{CropProfile, FeatureVector, NutrientLevels, ValueRange};

const SOIL_MATCH_BONUS: f64 = 1.2;

/// Requirement-ratio suitability
///
/// Each factor is scored independently against the crop's knowledge-base
/// requirements and the sub-scores are multiplied, so a single limiting
/// factor drives the whole score toward zero.
///
/// - Temperature: 1.0 inside range, else decays 0.1 per °C from the midpoint
/// - pH: 1.0 inside range, else decays 0.5 per unit from the midpoint
/// - Rainfall: ratio to the minimum, capped at 1.0, unfloored below it
/// - Nutrients: 0.4 N + 0.3 P + 0.3 K sufficiency, each capped at 1.0
/// - Preferred soil: ×1.2, then clamped to 1.0
pub struct RequirementRatioPolicy;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuitabilityBreakdown {
    pub temperature: f64,
    pub ph: f64,
    pub rainfall: f64,
    pub nutrients: f64,
    pub soil_match: bool,
}

impl SuitabilityBreakdown {
    pub fn combined(&self) -> f64 {
        let mut score = self.temperature * self.ph * self.rainfall * self.nutrients;
        if self.soil_match {
            score *= SOIL_MATCH_BONUS;
        }
        score.clamp(0.0, 1.0)
    }
}

impl RequirementRatioPolicy {
    pub fn breakdown(profile: &CropProfile, features: &FeatureVector) -> SuitabilityBreakdown {
        SuitabilityBreakdown {
            temperature: temperature_fit(&profile.temperature_range, features.temperature),
            ph: ph_fit(&profile.ph_range, features.ph),
            rainfall: rainfall_fit(profile.rainfall_minimum, features.rainfall),
            nutrients: nutrient_fit(
                &profile.nutrient_minimums,
                features.nitrogen,
                features.phosphorus,
                features.potassium,
            ),
            soil_match: profile.prefers_soil(&features.soil_type),
        }
    }
}

impl ScoringPolicy for RequirementRatioPolicy {
    fn id(&self) -> &'static str {
        "requirement_ratio"
    }

    fn name(&self) -> &'static str {
        "Requirement Ratio"
    }

    fn score(&self, profile: &CropProfile, features: &FeatureVector) -> f64 {
        Self::breakdown(profile, features).combined()
    }
}

pub fn temperature_fit(range: &ValueRange, temperature: f64) -> f64 {
    if range.contains(temperature) {
        1.0
    } else {
        (1.0 - (temperature - range.midpoint()).abs() / 10.0).max(0.0)
    }
}

pub fn ph_fit(range: &ValueRange, ph: f64) -> f64 {
    if range.contains(ph) {
        1.0
    } else {
        (1.0 - (ph - range.midpoint()).abs() / 2.0).max(0.0)
    }
}

/// Deficit is penalized linearly with no floor; surplus never helps past 1.0.
pub fn rainfall_fit(minimum: f64, rainfall: f64) -> f64 {
    if rainfall >= minimum {
        (rainfall / minimum).min(1.0)
    } else {
        rainfall / minimum
    }
}

pub fn nutrient_fit(minimums: &NutrientLevels, n: f64, p: f64, k: f64) -> f64 {
    (n / minimums.nitrogen).min(1.0) * 0.4
        + (p / minimums.phosphorus).min(1.0) * 0.3
        + (k / minimums.potassium).min(1.0) * 0.3
}
