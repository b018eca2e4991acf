use super::ScoringPolicy;
use crate::models::{CropProfile, FeatureVector, ValueRange};
use std::collections::BTreeMap;

const BASE_SCORE: f64 = 0.5;

/// Preferred growing conditions for one crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preferences {
    pub temperature: ValueRange,
    pub ph: ValueRange,
    pub rainfall: ValueRange,
}

impl Preferences {
    fn new(temperature: (f64, f64), ph: (f64, f64), rainfall: (f64, f64)) -> Self {
        Self {
            temperature: ValueRange::new(temperature.0, temperature.1),
            ph: ValueRange::new(ph.0, ph.1),
            rainfall: ValueRange::new(rainfall.0, rainfall.1),
        }
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new((20.0, 30.0), (6.0, 7.5), (50.0, 120.0))
    }
}

/// Preference-range suitability
///
/// Additive scoring from a 0.5 base against a preference table kept apart
/// from the knowledge-base requirements:
///
/// - Temperature in range +0.3, else loses 0.02 per °C from the nearest bound
/// - pH in range +0.2, else loses 0.05 per unit from the nearest bound
/// - Rainfall in range +0.2, else loses 0.002 per mm from the nearest bound
/// - N > 30 +0.1, P > 15 +0.05, K > 80 +0.05, organic carbon > 0.8 +0.1
///
/// Crops missing from the table use generic preferences.
pub struct PreferenceRangePolicy {
    table: BTreeMap<String, Preferences>,
}

impl PreferenceRangePolicy {
    pub fn new(table: BTreeMap<String, Preferences>) -> Self {
        Self { table }
    }

    pub fn builtin() -> Self {
        let rows = [
            ("Rice", (25.0, 35.0), (5.5, 7.0), (100.0, 200.0)),
            ("Wheat", (15.0, 25.0), (6.0, 7.5), (30.0, 100.0)),
            ("Maize", (20.0, 30.0), (6.0, 7.5), (50.0, 150.0)),
            ("Cotton", (25.0, 35.0), (6.5, 8.0), (50.0, 150.0)),
            ("Soybean", (20.0, 30.0), (6.0, 7.0), (60.0, 120.0)),
            ("Groundnut", (25.0, 35.0), (6.0, 7.5), (40.0, 100.0)),
            ("Sugarcane", (25.0, 35.0), (6.0, 8.0), (100.0, 200.0)),
            ("Sunflower", (20.0, 30.0), (6.5, 8.0), (40.0, 100.0)),
            ("Chickpea", (15.0, 25.0), (6.0, 7.5), (30.0, 80.0)),
            ("Pigeon Pea", (20.0, 30.0), (6.0, 7.5), (60.0, 120.0)),
            ("Mustard", (15.0, 25.0), (6.0, 7.5), (30.0, 80.0)),
            ("Barley", (15.0, 25.0), (6.0, 7.5), (30.0, 80.0)),
        ];

        let table = rows
            .into_iter()
            .map(|(name, temp, ph, rain)| (name.to_string(), Preferences::new(temp, ph, rain)))
            .collect();
        Self::new(table)
    }

    pub fn preferences_for(&self, crop: &str) -> Preferences {
        self.table.get(crop).copied().unwrap_or_default()
    }
}

impl ScoringPolicy for PreferenceRangePolicy {
    fn id(&self) -> &'static str {
        "preference_range"
    }

    fn name(&self) -> &'static str {
        "Preference Range"
    }

    fn score(&self, profile: &CropProfile, features: &FeatureVector) -> f64 {
        let prefs = self.preferences_for(&profile.name);

        let mut score = BASE_SCORE;
        score += band_score(&prefs.temperature, features.temperature, 0.3, 0.02);
        score += band_score(&prefs.ph, features.ph, 0.2, 0.05);
        score += band_score(&prefs.rainfall, features.rainfall, 0.2, 0.002);

        if features.nitrogen > 30.0 {
            score += 0.1;
        }
        if features.phosphorus > 15.0 {
            score += 0.05;
        }
        if features.potassium > 80.0 {
            score += 0.05;
        }
        if features.organic_carbon > 0.8 {
            score += 0.1;
        }

        score.clamp(0.0, 1.0)
    }

    fn referenced_crops(&self) -> Vec<&str> {
        self.table.keys().map(String::as_str).collect()
    }
}

/// Full `weight` inside the band, else `weight` minus `penalty` per unit of
/// distance to the nearest bound, never below zero.
fn band_score(range: &ValueRange, value: f64, weight: f64, penalty: f64) -> f64 {
    if range.contains(value) {
        return weight;
    }
    let deviation = (value - range.min).abs().min((value - range.max).abs());
    (weight - deviation * penalty).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;

    #[test]
    fn band_score_decays_from_nearest_bound() {
        let range = ValueRange::new(20.0, 30.0);
        assert!((band_score(&range, 25.0, 0.3, 0.02) - 0.3).abs() < 1e-9);
        assert!((band_score(&range, 35.0, 0.3, 0.02) - 0.2).abs() < 1e-9);
        assert!((band_score(&range, 15.0, 0.3, 0.02) - 0.2).abs() < 1e-9);
        assert!(band_score(&range, 60.0, 0.3, 0.02).abs() < 1e-9);
    }

    #[test]
    fn unknown_crop_uses_generic_preferences() {
        let policy = PreferenceRangePolicy::builtin();
        assert_eq!(policy.preferences_for("Millet"), Preferences::default());
        assert_ne!(policy.preferences_for("Rice"), Preferences::default());
    }

    #[test]
    fn references_every_builtin_crop() {
        let kb = KnowledgeBase::builtin().unwrap();
        let policy = PreferenceRangePolicy::builtin();
        assert!(kb
            .require_all(policy.referenced_crops(), "preference table")
            .is_ok());
        assert_eq!(policy.referenced_crops().len(), kb.len());
    }

    #[test]
    fn poor_conditions_stay_near_base() {
        let kb = KnowledgeBase::builtin().unwrap();
        let wheat = kb.get("Wheat").unwrap();
        let features = FeatureVector {
            temperature: 45.0,
            ph: 4.0,
            rainfall: 300.0,
            nitrogen: 10.0,
            phosphorus: 5.0,
            potassium: 20.0,
            organic_carbon: 0.2,
            ..Default::default()
        };
        // Temperature and rainfall bands fully lost, pH 2 units out
        let score = PreferenceRangePolicy::builtin().score(wheat, &features);
        assert!((score - 0.6).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn good_conditions_saturate() {
        let kb = KnowledgeBase::builtin().unwrap();
        let maize = kb.get("Maize").unwrap();
        let features = FeatureVector {
            temperature: 25.0,
            ph: 6.8,
            rainfall: 80.0,
            nitrogen: 45.0,
            ..Default::default()
        };
        let score = PreferenceRangePolicy::builtin().score(maize, &features);
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ignores_knowledge_base_ranges() {
        let kb = KnowledgeBase::builtin().unwrap();
        let mut rice = kb.get("Rice").unwrap().clone();
        let features = FeatureVector::default();
        let policy = PreferenceRangePolicy::builtin();
        let before = policy.score(&rice, &features);
        rice.temperature_range = ValueRange::new(40.0, 45.0);
        rice.rainfall_minimum = 900.0;
        assert_eq!(policy.score(&rice, &features), before);
    }
}
