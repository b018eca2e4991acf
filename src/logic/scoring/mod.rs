pub mod preference_range;
pub mod requirement_ratio;

pub use preference_range::PreferenceRangePolicy;
pub use requirement_ratio::RequirementRatioPolicy;

use crate::models::{CropProfile, FeatureVector};
use serde::{Deserialize, Serialize};

/// Trait for crop suitability heuristics
pub trait ScoringPolicy: Send + Sync {
    /// Unique identifier for this policy
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Compatibility between a crop and the field, in `0.0..=1.0`
    fn score(&self, profile: &CropProfile, features: &FeatureVector) -> f64;

    /// Crops named by the policy's own tables; each must have a profile
    fn referenced_crops(&self) -> Vec<&str> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicyKind {
    #[default]
    RequirementRatio,
    PreferenceRange,
}

impl ScoringPolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringPolicyKind::RequirementRatio => "requirement_ratio",
            ScoringPolicyKind::PreferenceRange => "preference_range",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "requirement_ratio" | "ratio" => Some(ScoringPolicyKind::RequirementRatio),
            "preference_range" | "range" => Some(ScoringPolicyKind::PreferenceRange),
            _ => None,
        }
    }

    pub fn build(&self) -> Box<dyn ScoringPolicy> {
        match self {
            ScoringPolicyKind::RequirementRatio => Box::new(RequirementRatioPolicy),
            ScoringPolicyKind::PreferenceRange => Box::new(PreferenceRangePolicy::builtin()),
        }
    }
}

impl std::fmt::Display for ScoringPolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
