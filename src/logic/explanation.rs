use crate::models::{CropProfile, FarmingMethod, FeatureImpact, FeatureVector, RecommendationRecord};

/// Most clauses a narrative will cite
const MAX_CLAUSES: usize = 4;

/// Most features an importance breakdown will list
pub const MAX_FEATURES: usize = 5;

/// Plain-language reasons the top crop was picked, closed with the market
/// outlook for that crop.
pub fn narrative(top: &RecommendationRecord, features: &FeatureVector) -> String {
    let clauses = condition_clauses(features);

    let mut text = if clauses.is_empty() {
        format!(
            "{} is the most suitable crop for the current field conditions",
            top.crop
        )
    } else {
        format!(
            "{} is strongly recommended due to: {}",
            top.crop,
            clauses.join(", ")
        )
    };

    text.push_str(&format!(
        ". Current market conditions show {} demand with estimated profit of ₹{}.",
        top.market_demand.as_str().to_lowercase(),
        format_inr(top.estimated_profit_inr)
    ));
    text
}

fn condition_clauses(features: &FeatureVector) -> Vec<&'static str> {
    let mut clauses = Vec::new();

    if (6.5..=7.5).contains(&features.ph) {
        clauses.push("optimal soil pH for most crops");
    } else if features.ph < 6.0 {
        clauses.push("acidic soil conditions requiring lime application");
    } else if features.ph > 8.0 {
        clauses.push("alkaline soil conditions");
    }

    if features.nitrogen > 40.0 {
        clauses.push("excellent nitrogen availability");
    } else if features.nitrogen < 20.0 {
        clauses.push("low nitrogen requiring fertilizer supplementation");
    }

    if (20.0..=35.0).contains(&features.temperature) {
        clauses.push("favorable temperature conditions");
    }

    if features.rainfall > 50.0 {
        clauses.push("adequate rainfall for growth");
    }

    if features.farming_method == FarmingMethod::Organic {
        clauses.push("organic farming practices enhancing sustainability");
    }

    if features.irrigation_type.is_efficient() {
        clauses.push("efficient irrigation system reducing water stress");
    }

    clauses.truncate(MAX_CLAUSES);
    clauses
}

/// Which inputs mattered most for `profile`.
///
/// Raw impacts are proximity or sufficiency ratios against the crop's
/// requirements. The strongest are kept and rescaled to sum to 1.
pub fn feature_importance(profile: &CropProfile, features: &FeatureVector) -> Vec<FeatureImpact> {
    let minimums = &profile.nutrient_minimums;
    let raw = [
        (
            "temperature",
            1.0 - (features.temperature - profile.optimal_temperature()).abs() / 15.0,
        ),
        ("ph", 1.0 - (features.ph - profile.optimal_ph()).abs() / 2.0),
        (
            "rainfall",
            (features.rainfall / profile.rainfall_minimum).min(1.0),
        ),
        ("nitrogen (N)", (features.nitrogen / minimums.nitrogen).min(1.0)),
        (
            "phosphorus (P)",
            (features.phosphorus / minimums.phosphorus).min(1.0),
        ),
        (
            "potassium (K)",
            (features.potassium / minimums.potassium).min(1.0),
        ),
        (
            "soil type",
            if profile.prefers_soil(&features.soil_type) {
                1.2
            } else {
                0.8
            },
        ),
    ];

    let mut impacts: Vec<(&str, f64)> = raw
        .into_iter()
        .map(|(name, value)| (name, value.max(0.0)))
        .collect();
    impacts.sort_by(|a, b| b.1.total_cmp(&a.1));
    impacts.truncate(MAX_FEATURES);

    let total: f64 = impacts.iter().map(|(_, v)| v).sum();
    let count = impacts.len() as f64;
    impacts
        .into_iter()
        .map(|(name, value)| {
            let share = if total > 0.0 { value / total } else { 1.0 / count };
            FeatureImpact::new(name, share)
        })
        .collect()
}

/// Whole rupees with thousands separators, e.g. `67,200`
pub fn format_inr(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;
    use crate::models::{IrrigationType, MarketDemand};

    fn scenario() -> FeatureVector {
        FeatureVector {
            temperature: 28.0,
            humidity: 70.0,
            rainfall: 80.0,
            ph: 6.8,
            nitrogen: 45.0,
            phosphorus: 20.0,
            potassium: 100.0,
            organic_carbon: 1.0,
            soil_type: "Loamy".into(),
            area_ha: 2.5,
            irrigation_type: IrrigationType::Drip,
            experience_years: 8,
            ..Default::default()
        }
    }

    #[test]
    fn format_inr_groups_thousands() {
        assert_eq!(format_inr(0.0), "0");
        assert_eq!(format_inr(999.0), "999");
        assert_eq!(format_inr(1000.0), "1,000");
        assert_eq!(format_inr(67200.0), "67,200");
        assert_eq!(format_inr(1234567.4), "1,234,567");
        assert_eq!(format_inr(-2500.0), "-2,500");
    }

    #[test]
    fn narrative_caps_clauses_at_four() {
        let record = RecommendationRecord {
            estimated_profit_inr: 67200.0,
            market_demand: MarketDemand::High,
            ..RecommendationRecord::fallback("Rice")
        };
        let text = narrative(&record, &scenario());
        assert_eq!(
            text,
            "Rice is strongly recommended due to: optimal soil pH for most crops, \
             excellent nitrogen availability, favorable temperature conditions, \
             adequate rainfall for growth. Current market conditions show high demand \
             with estimated profit of ₹67,200."
        );
        assert!(!text.contains("irrigation"));
    }

    #[test]
    fn narrative_mentions_practices_when_room_remains() {
        let features = FeatureVector {
            ph: 5.0,
            nitrogen: 30.0,
            temperature: 15.0,
            rainfall: 20.0,
            farming_method: FarmingMethod::Organic,
            irrigation_type: IrrigationType::Sprinkler,
            ..Default::default()
        };
        let text = narrative(&RecommendationRecord::fallback("Barley"), &features);
        assert!(text.starts_with("Barley is strongly recommended due to: acidic soil"));
        assert!(text.contains("organic farming practices"));
        assert!(text.contains("efficient irrigation system"));
    }

    #[test]
    fn narrative_without_clauses_still_names_crop() {
        let features = FeatureVector {
            ph: 6.2,
            nitrogen: 30.0,
            temperature: 10.0,
            rainfall: 30.0,
            ..Default::default()
        };
        let record = RecommendationRecord {
            market_demand: MarketDemand::VeryStrong,
            ..RecommendationRecord::fallback("Wheat")
        };
        let text = narrative(&record, &features);
        assert!(text.starts_with("Wheat is the most suitable crop"));
        assert!(text.contains("very strong demand"));
    }

    #[test]
    fn importance_sums_to_one_with_five_entries() {
        let kb = KnowledgeBase::builtin().unwrap();
        for crop in kb.iter() {
            let impacts = feature_importance(crop, &scenario());
            assert_eq!(impacts.len(), MAX_FEATURES);
            let total: f64 = impacts.iter().map(|i| i.impact).sum();
            assert!((total - 1.0).abs() < 1e-6, "{} summed to {}", crop.name, total);
            assert!(impacts.windows(2).all(|w| w[0].impact >= w[1].impact));
        }
    }

    #[test]
    fn importance_for_rice_leads_with_soil_match() {
        let kb = KnowledgeBase::builtin().unwrap();
        let impacts = feature_importance(kb.get("Rice").unwrap(), &scenario());
        assert_eq!(impacts[0].feature, "soil type");
        // 1.2 out of 1.2 + 4 * 1.0
        assert!((impacts[0].impact - 1.2 / 5.2).abs() < 1e-9);
    }

    #[test]
    fn importance_concentrates_on_remaining_signal() {
        let kb = KnowledgeBase::builtin().unwrap();
        let mut rice = kb.get("Rice").unwrap().clone();
        rice.preferred_soil_types.clear();
        let features = FeatureVector {
            temperature: 80.0,
            ph: 0.5,
            rainfall: 0.0,
            nitrogen: 0.0,
            phosphorus: 0.0,
            potassium: 0.0,
            ..scenario()
        };
        let impacts = feature_importance(&rice, &features);
        let total: f64 = impacts.iter().map(|i| i.impact).sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert_eq!(impacts[0].feature, "soil type");
    }
}
