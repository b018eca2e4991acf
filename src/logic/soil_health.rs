use crate::models::{FeatureVector, NutrientStatus, SoilHealthReport};

/// Soil health card summary: pH band, N/P/K status and remediation advice.
///
/// Neutral pH earns 25 points, acidic 10 and alkaline 15. Each nutrient
/// earns 25 when high and 15 when medium. The score is capped at 100.
pub fn assess(features: &FeatureVector) -> SoilHealthReport {
    let mut score: u32 = 0;
    let mut advice = Vec::new();

    if (6.0..=7.5).contains(&features.ph) {
        score += 25;
    } else if features.ph < 6.0 {
        advice.push("Consider lime application to increase soil pH".to_string());
        score += 10;
    } else {
        advice.push("Soil is alkaline, consider sulfur application".to_string());
        score += 15;
    }

    let nitrogen = grade(features.nitrogen, 40.0, 20.0);
    let phosphorus = grade(features.phosphorus, 20.0, 10.0);
    let potassium = grade(features.potassium, 100.0, 50.0);

    for (status, nutrient) in [
        (nitrogen, "nitrogen"),
        (phosphorus, "phosphorus"),
        (potassium, "potassium"),
    ] {
        match status {
            NutrientStatus::High => score += 25,
            NutrientStatus::Medium => score += 15,
            NutrientStatus::Low => {
                advice.push(format!("Consider {} fertilizer application", nutrient))
            }
        }
    }

    if features.organic_carbon > 0.75 {
        advice.push("Excellent organic matter content".to_string());
    } else {
        advice.push("Consider adding organic matter (compost, crop residues)".to_string());
    }

    SoilHealthReport {
        health_score: score.min(100) as u8,
        nitrogen,
        phosphorus,
        potassium,
        advice,
    }
}

fn grade(value: f64, high_above: f64, medium_above: f64) -> NutrientStatus {
    if value > high_above {
        NutrientStatus::High
    } else if value > medium_above {
        NutrientStatus::Medium
    } else {
        NutrientStatus::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rich_neutral_soil_caps_at_100() {
        let features = FeatureVector {
            ph: 6.8,
            nitrogen: 45.0,
            phosphorus: 25.0,
            potassium: 120.0,
            organic_carbon: 1.0,
            ..Default::default()
        };
        let report = assess(&features);
        assert_eq!(report.health_score, 100);
        assert_eq!(report.nutrient_summary(), "N: High, P: High, K: High");
        assert_eq!(report.advice, vec!["Excellent organic matter content"]);
    }

    #[test]
    fn acidic_depleted_soil() {
        let features = FeatureVector {
            ph: 5.2,
            nitrogen: 10.0,
            phosphorus: 15.0,
            potassium: 40.0,
            organic_carbon: 0.4,
            ..Default::default()
        };
        let report = assess(&features);
        // 10 for pH, 15 for medium phosphorus
        assert_eq!(report.health_score, 25);
        assert_eq!(report.nitrogen, NutrientStatus::Low);
        assert_eq!(report.phosphorus, NutrientStatus::Medium);
        assert!(report.advice.iter().any(|a| a.contains("lime")));
        assert!(report.advice.iter().any(|a| a.contains("nitrogen fertilizer")));
        assert!(report.advice.iter().any(|a| a.contains("potassium fertilizer")));
        assert!(report.advice.iter().any(|a| a.contains("compost")));
    }

    #[test]
    fn alkaline_soil_suggests_sulfur() {
        let features = FeatureVector {
            ph: 8.2,
            ..Default::default()
        };
        let report = assess(&features);
        assert!(report.advice[0].contains("sulfur"));
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(grade(40.0, 40.0, 20.0), NutrientStatus::Medium);
        assert_eq!(grade(20.0, 40.0, 20.0), NutrientStatus::Low);
        assert_eq!(grade(40.1, 40.0, 20.0), NutrientStatus::High);
    }
}
