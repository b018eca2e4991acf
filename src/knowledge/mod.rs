//! Crop requirement knowledge base.
//!
//! Loaded once at startup and shared read-only by every request. A table
//! can come from the built-in data or from a YAML file with the same shape;
//! either way it is validated before the engine sees it, so integrity
//! problems surface at startup rather than mid-request.

mod builtin;
pub mod soil;

pub use builtin::builtin_profiles;
pub use soil::{SoilClass, SoilDefaults};

use crate::error::{CropwiseError, Result};
use crate::models::CropProfile;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CropTable {
    crops: Vec<CropProfile>,
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    crops: Vec<CropProfile>,
}

impl KnowledgeBase {
    pub fn new(crops: Vec<CropProfile>) -> Result<Self> {
        validate_profiles(&crops)?;
        Ok(Self { crops })
    }

    pub fn builtin() -> Result<Self> {
        Self::new(builtin_profiles())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let table: CropTable = serde_yaml::from_str(yaml)?;
        Self::new(table.crops)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            CropwiseError::KnowledgeBase(format!(
                "Failed to read crop table {}: {}",
                path.display(),
                e
            ))
        })?;
        let kb = Self::from_yaml_str(&yaml)?;
        tracing::info!(
            path = %path.display(),
            crops = kb.len(),
            "Loaded crop knowledge base"
        );
        Ok(kb)
    }

    pub fn to_yaml(&self) -> Result<String> {
        let table = CropTable {
            crops: self.crops.clone(),
        };
        Ok(serde_yaml::to_string(&table)?)
    }

    pub fn get(&self, name: &str) -> Option<&CropProfile> {
        self.crops.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Profiles in table order.
    pub fn iter(&self) -> impl Iterator<Item = &CropProfile> {
        self.crops.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.crops.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }

    /// Fail if any of `names` has no profile.
    pub fn require_all<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
        context: &str,
    ) -> Result<()> {
        let missing: Vec<&str> = names.into_iter().filter(|n| !self.contains(n)).collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CropwiseError::KnowledgeBase(format!(
                "{} references crops with no profile: {}",
                context,
                missing.join(", ")
            )))
        }
    }
}

fn validate_profiles(crops: &[CropProfile]) -> Result<()> {
    if crops.is_empty() {
        return Err(CropwiseError::KnowledgeBase(
            "crop table is empty".into(),
        ));
    }

    let mut seen = HashSet::new();
    for crop in crops {
        let fail = |msg: &str| {
            Err(CropwiseError::KnowledgeBase(format!(
                "{}: {}",
                if crop.name.is_empty() {
                    "<unnamed>"
                } else {
                    crop.name.as_str()
                },
                msg
            )))
        };

        if crop.name.trim().is_empty() {
            return fail("name must not be empty");
        }
        if !seen.insert(crop.name.as_str()) {
            return fail("duplicate profile");
        }
        if !crop.temperature_range.is_valid() {
            return fail("temperature_range min must not exceed max");
        }
        if !crop.ph_range.is_valid() {
            return fail("ph_range min must not exceed max");
        }
        if !(crop.rainfall_minimum.is_finite() && crop.rainfall_minimum > 0.0) {
            return fail("rainfall_minimum must be positive");
        }
        let npk = crop.nutrient_minimums;
        if [npk.nitrogen, npk.phosphorus, npk.potassium]
            .iter()
            .any(|v| !(v.is_finite() && *v > 0.0))
        {
            return fail("nutrient minimums must be positive");
        }
        if crop.growing_seasons.is_empty() {
            return fail("at least one growing season is required");
        }
        if !(crop.base_yield_kg_per_ha.is_finite() && crop.base_yield_kg_per_ha > 0.0) {
            return fail("base_yield_kg_per_ha must be positive");
        }
        if !(crop.reference_price_per_quintal.is_finite()
            && crop.reference_price_per_quintal >= 0.0)
        {
            return fail("reference_price_per_quintal must not be negative");
        }
        if !(0.0..=1.0).contains(&crop.cost_fraction_of_revenue) {
            return fail("cost_fraction_of_revenue must be between 0 and 1");
        }
    }

    Ok(())
}
