use crate::models::{CropProfile, FarmingMethod, FeatureVector, WaterRequirement};

/// Yield never drops below this share of the crop's base yield
const YIELD_FLOOR_FRACTION: f64 = 0.3;

/// Predicted yield in kg/ha, truncated to whole kilograms
///
/// Mean of five factors (temperature proximity, nutrient sufficiency,
/// rainfall sufficiency, farm size, experience) scaled by the base yield
/// and the suitability score.
pub fn predict_yield(profile: &CropProfile, features: &FeatureVector, suitability: f64) -> f64 {
    let factors = [
        temperature_factor(profile, features.temperature),
        nutrient_factor(profile, features),
        rainfall_factor(profile, features.rainfall),
        area_factor(features.area_ha),
        experience_factor(features.experience_years),
    ];
    let mean = factors.iter().sum::<f64>() / factors.len() as f64;

    let base = profile.base_yield_kg_per_ha;
    let predicted = (base * mean * suitability).trunc();
    predicted.max((base * YIELD_FLOOR_FRACTION).trunc())
}

fn temperature_factor(profile: &CropProfile, temperature: f64) -> f64 {
    (1.0 - (temperature - profile.optimal_temperature()).abs() / 15.0).max(0.5)
}

fn nutrient_factor(profile: &CropProfile, features: &FeatureVector) -> f64 {
    let minimums = &profile.nutrient_minimums;
    (features.nitrogen / minimums.nitrogen).min(1.5) * 0.4
        + (features.phosphorus / minimums.phosphorus).min(1.5) * 0.3
        + (features.potassium / minimums.potassium).min(1.5) * 0.3
}

fn rainfall_factor(profile: &CropProfile, rainfall: f64) -> f64 {
    (rainfall / profile.rainfall_minimum).min(1.3)
}

/// Smallholdings tend to yield more per hectare
fn area_factor(area_ha: f64) -> f64 {
    if area_ha <= 2.0 {
        1.1
    } else if area_ha <= 5.0 {
        1.05
    } else {
        1.0
    }
}

fn experience_factor(years: u32) -> f64 {
    (0.8 + 0.08 * years as f64).min(1.2)
}

/// Net profit in INR over the whole area, truncated to whole rupees
pub fn estimate_profit(
    profile: &CropProfile,
    yield_kg_per_ha: f64,
    area_ha: f64,
    price_per_quintal: f64,
) -> f64 {
    let revenue = yield_kg_per_ha * area_ha * price_per_quintal / 100.0;
    let cost = revenue * profile.cost_fraction_of_revenue;
    (revenue - cost).max(0.0).trunc()
}

pub fn sustainability_score(water: WaterRequirement, method: FarmingMethod) -> f64 {
    let base: f64 = match water {
        WaterRequirement::Low => 0.9,
        WaterRequirement::Medium => 0.7,
        WaterRequirement::High | WaterRequirement::VeryHigh => 0.5,
    };
    let adjustment = match method {
        FarmingMethod::Organic => 0.15,
        FarmingMethod::Mixed => 0.05,
        FarmingMethod::Conventional => 0.0,
    };
    (base + adjustment).clamp(0.0, 1.0)
}

pub fn confidence(suitability: f64) -> f64 {
    (suitability + 0.1).clamp(0.0, 0.95)
}
