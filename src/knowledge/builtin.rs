use crate::models::{
    CropProfile, MarketDemand, NutrientLevels, Season, ValueRange, WaterRequirement,
};

fn soils(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Requirement table for major Indian field crops.
///
/// Temperatures in °C, rainfall in mm during the growing window,
/// nutrient minimums in kg/ha, prices in INR per quintal.
pub fn builtin_profiles() -> Vec<CropProfile> {
    vec![
        CropProfile {
            name: "Rice".into(),
            temperature_range: ValueRange::new(20.0, 35.0),
            ph_range: ValueRange::new(5.5, 7.0),
            rainfall_minimum: 80.0,
            nutrient_minimums: NutrientLevels::new(40.0, 20.0, 20.0),
            preferred_soil_types: soils(&["Clayey", "Loamy", "Alluvial"]),
            water_requirement: WaterRequirement::High,
            growing_seasons: vec![Season::Kharif],
            base_yield_kg_per_ha: 4000.0,
            reference_price_per_quintal: 2100.0,
            cost_fraction_of_revenue: 0.6,
            market_demand: MarketDemand::High,
        },
        CropProfile {
            name: "Wheat".into(),
            temperature_range: ValueRange::new(15.0, 25.0),
            ph_range: ValueRange::new(6.0, 7.5),
            rainfall_minimum: 50.0,
            nutrient_minimums: NutrientLevels::new(80.0, 25.0, 30.0),
            preferred_soil_types: soils(&["Loamy", "Clayey", "Alluvial"]),
            water_requirement: WaterRequirement::Medium,
            growing_seasons: vec![Season::Rabi],
            base_yield_kg_per_ha: 3200.0,
            reference_price_per_quintal: 2000.0,
            cost_fraction_of_revenue: 0.5,
            market_demand: MarketDemand::High,
        },
        CropProfile {
            name: "Maize".into(),
            temperature_range: ValueRange::new(21.0, 27.0),
            ph_range: ValueRange::new(5.8, 7.0),
            rainfall_minimum: 60.0,
            nutrient_minimums: NutrientLevels::new(120.0, 60.0, 40.0),
            preferred_soil_types: soils(&["Loamy", "Sandy", "Alluvial"]),
            water_requirement: WaterRequirement::Medium,
            growing_seasons: vec![Season::Kharif, Season::Rabi],
            base_yield_kg_per_ha: 5500.0,
            reference_price_per_quintal: 1800.0,
            cost_fraction_of_revenue: 0.55,
            market_demand: MarketDemand::Medium,
        },
        CropProfile {
            name: "Cotton".into(),
            temperature_range: ValueRange::new(21.0, 30.0),
            ph_range: ValueRange::new(5.8, 8.0),
            rainfall_minimum: 50.0,
            nutrient_minimums: NutrientLevels::new(60.0, 30.0, 30.0),
            preferred_soil_types: soils(&["Black", "Alluvial", "Red"]),
            water_requirement: WaterRequirement::Medium,
            growing_seasons: vec![Season::Kharif],
            base_yield_kg_per_ha: 500.0,
            reference_price_per_quintal: 5500.0,
            cost_fraction_of_revenue: 0.7,
            market_demand: MarketDemand::High,
        },
        CropProfile {
            name: "Sugarcane".into(),
            temperature_range: ValueRange::new(21.0, 27.0),
            ph_range: ValueRange::new(6.5, 7.5),
            rainfall_minimum: 75.0,
            nutrient_minimums: NutrientLevels::new(200.0, 80.0, 100.0),
            preferred_soil_types: soils(&["Loamy", "Clayey", "Alluvial"]),
            water_requirement: WaterRequirement::VeryHigh,
            growing_seasons: vec![Season::Annual],
            base_yield_kg_per_ha: 70000.0,
            reference_price_per_quintal: 350.0,
            cost_fraction_of_revenue: 0.65,
            market_demand: MarketDemand::Medium,
        },
        CropProfile {
            name: "Soybean".into(),
            temperature_range: ValueRange::new(20.0, 30.0),
            ph_range: ValueRange::new(6.0, 7.0),
            rainfall_minimum: 45.0,
            nutrient_minimums: NutrientLevels::new(20.0, 60.0, 70.0),
            preferred_soil_types: soils(&["Black", "Red", "Loamy"]),
            water_requirement: WaterRequirement::Medium,
            growing_seasons: vec![Season::Kharif],
            base_yield_kg_per_ha: 1200.0,
            reference_price_per_quintal: 4200.0,
            cost_fraction_of_revenue: 0.5,
            market_demand: MarketDemand::Medium,
        },
        CropProfile {
            name: "Groundnut".into(),
            temperature_range: ValueRange::new(20.0, 30.0),
            ph_range: ValueRange::new(6.0, 7.0),
            rainfall_minimum: 50.0,
            nutrient_minimums: NutrientLevels::new(25.0, 50.0, 75.0),
            preferred_soil_types: soils(&["Sandy", "Red", "Black"]),
            water_requirement: WaterRequirement::Low,
            growing_seasons: vec![Season::Kharif, Season::Rabi],
            base_yield_kg_per_ha: 1500.0,
            reference_price_per_quintal: 5000.0,
            cost_fraction_of_revenue: 0.6,
            market_demand: MarketDemand::Medium,
        },
        CropProfile {
            name: "Sunflower".into(),
            temperature_range: ValueRange::new(20.0, 25.0),
            ph_range: ValueRange::new(6.0, 7.2),
            rainfall_minimum: 50.0,
            nutrient_minimums: NutrientLevels::new(60.0, 30.0, 40.0),
            preferred_soil_types: soils(&["Black", "Red", "Alluvial"]),
            water_requirement: WaterRequirement::Medium,
            growing_seasons: vec![Season::Kharif, Season::Rabi],
            base_yield_kg_per_ha: 1200.0,
            reference_price_per_quintal: 6000.0,
            cost_fraction_of_revenue: 0.55,
            market_demand: MarketDemand::Medium,
        },
        CropProfile {
            name: "Chickpea".into(),
            temperature_range: ValueRange::new(15.0, 25.0),
            ph_range: ValueRange::new(6.2, 7.8),
            rainfall_minimum: 40.0,
            nutrient_minimums: NutrientLevels::new(20.0, 40.0, 30.0),
            preferred_soil_types: soils(&["Black", "Loamy", "Sandy"]),
            water_requirement: WaterRequirement::Low,
            growing_seasons: vec![Season::Rabi],
            base_yield_kg_per_ha: 1000.0,
            reference_price_per_quintal: 5200.0,
            cost_fraction_of_revenue: 0.45,
            market_demand: MarketDemand::Medium,
        },
        CropProfile {
            name: "Mustard".into(),
            temperature_range: ValueRange::new(15.0, 25.0),
            ph_range: ValueRange::new(6.0, 7.5),
            rainfall_minimum: 25.0,
            nutrient_minimums: NutrientLevels::new(60.0, 40.0, 30.0),
            preferred_soil_types: soils(&["Loamy", "Sandy", "Alluvial"]),
            water_requirement: WaterRequirement::Low,
            growing_seasons: vec![Season::Rabi],
            base_yield_kg_per_ha: 1200.0,
            reference_price_per_quintal: 4800.0,
            cost_fraction_of_revenue: 0.4,
            market_demand: MarketDemand::Medium,
        },
        CropProfile {
            name: "Barley".into(),
            temperature_range: ValueRange::new(12.0, 22.0),
            ph_range: ValueRange::new(6.0, 7.8),
            rainfall_minimum: 30.0,
            nutrient_minimums: NutrientLevels::new(50.0, 25.0, 25.0),
            preferred_soil_types: soils(&["Loamy", "Sandy", "Clayey"]),
            water_requirement: WaterRequirement::Low,
            growing_seasons: vec![Season::Rabi],
            base_yield_kg_per_ha: 2500.0,
            reference_price_per_quintal: 1700.0,
            cost_fraction_of_revenue: 0.4,
            market_demand: MarketDemand::Medium,
        },
        CropProfile {
            name: "Pigeon Pea".into(),
            temperature_range: ValueRange::new(20.0, 30.0),
            ph_range: ValueRange::new(6.0, 7.5),
            rainfall_minimum: 60.0,
            nutrient_minimums: NutrientLevels::new(25.0, 50.0, 40.0),
            preferred_soil_types: soils(&["Black", "Red", "Loamy"]),
            water_requirement: WaterRequirement::Medium,
            growing_seasons: vec![Season::Kharif],
            base_yield_kg_per_ha: 800.0,
            reference_price_per_quintal: 6500.0,
            cost_fraction_of_revenue: 0.5,
            market_demand: MarketDemand::Medium,
        },
    ]
}
