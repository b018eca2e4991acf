use crate::models::{FeatureVector, RiskLevel};
use serde::{Deserialize, Serialize};

/// Crops with volatile prices or heavy input costs
pub const DEFAULT_VOLATILE_CROPS: [&str; 2] = ["Cotton", "Sugarcane"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskPolicyKind {
    #[default]
    ScoreThreshold,
    PointAccumulation,
}

impl RiskPolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskPolicyKind::ScoreThreshold => "score_threshold",
            RiskPolicyKind::PointAccumulation => "point_accumulation",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "score_threshold" | "threshold" => Some(RiskPolicyKind::ScoreThreshold),
            "point_accumulation" | "points" => Some(RiskPolicyKind::PointAccumulation),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskPolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a crop's risk level is derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RiskPolicy {
    /// Risk falls as suitability rises
    #[default]
    ScoreThreshold,
    /// One point per environmental stress, plus one for volatile crops
    PointAccumulation { volatile_crops: Vec<String> },
}

impl RiskPolicy {
    pub fn build(kind: RiskPolicyKind, volatile_crops: &[String]) -> Self {
        match kind {
            RiskPolicyKind::ScoreThreshold => RiskPolicy::ScoreThreshold,
            RiskPolicyKind::PointAccumulation => RiskPolicy::PointAccumulation {
                volatile_crops: volatile_crops.to_vec(),
            },
        }
    }

    pub fn point_accumulation() -> Self {
        RiskPolicy::PointAccumulation {
            volatile_crops: DEFAULT_VOLATILE_CROPS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn kind(&self) -> RiskPolicyKind {
        match self {
            RiskPolicy::ScoreThreshold => RiskPolicyKind::ScoreThreshold,
            RiskPolicy::PointAccumulation { .. } => RiskPolicyKind::PointAccumulation,
        }
    }

    pub fn id(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn referenced_crops(&self) -> Vec<&str> {
        match self {
            RiskPolicy::ScoreThreshold => Vec::new(),
            RiskPolicy::PointAccumulation { volatile_crops } => {
                volatile_crops.iter().map(String::as_str).collect()
            }
        }
    }

    pub fn classify(&self, crop: &str, features: &FeatureVector, suitability: f64) -> RiskLevel {
        match self {
            RiskPolicy::ScoreThreshold => score_threshold(suitability),
            RiskPolicy::PointAccumulation { volatile_crops } => {
                let volatile = volatile_crops.iter().any(|c| c == crop);
                from_points(stress_points(features, volatile))
            }
        }
    }
}

fn score_threshold(suitability: f64) -> RiskLevel {
    if suitability > 0.8 {
        RiskLevel::Low
    } else if suitability > 0.6 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

fn stress_points(features: &FeatureVector, volatile: bool) -> u32 {
    let mut points = 0;
    if (features.temperature - 25.0).abs() > 10.0 {
        points += 1;
    }
    if features.rainfall < 20.0 || features.rainfall > 200.0 {
        points += 1;
    }
    if features.ph < 5.5 || features.ph > 8.5 {
        points += 1;
    }
    if volatile {
        points += 1;
    }
    points
}

fn from_points(points: u32) -> RiskLevel {
    match points {
        0 | 1 => RiskLevel::Low,
        2 => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_threshold_boundaries() {
        let policy = RiskPolicy::ScoreThreshold;
        let features = FeatureVector::default();
        assert_eq!(policy.classify("Rice", &features, 0.95), RiskLevel::Low);
        assert_eq!(policy.classify("Rice", &features, 0.8), RiskLevel::Medium);
        assert_eq!(policy.classify("Rice", &features, 0.61), RiskLevel::Medium);
        assert_eq!(policy.classify("Rice", &features, 0.6), RiskLevel::High);
    }

    #[test]
    fn point_accumulation_counts_stresses() {
        let policy = RiskPolicy::point_accumulation();
        let calm = FeatureVector::default();
        assert_eq!(policy.classify("Rice", &calm, 0.2), RiskLevel::Low);
        // Volatile crop alone is one point
        assert_eq!(policy.classify("Cotton", &calm, 0.9), RiskLevel::Low);

        let hot_and_dry = FeatureVector {
            temperature: 38.0,
            rainfall: 10.0,
            ..Default::default()
        };
        assert_eq!(policy.classify("Rice", &hot_and_dry, 0.9), RiskLevel::Medium);
        assert_eq!(policy.classify("Sugarcane", &hot_and_dry, 0.9), RiskLevel::High);
    }

    #[test]
    fn point_accumulation_extreme_ph() {
        let policy = RiskPolicy::point_accumulation();
        let features = FeatureVector {
            ph: 9.0,
            rainfall: 250.0,
            ..Default::default()
        };
        assert_eq!(policy.classify("Wheat", &features, 1.0), RiskLevel::Medium);
    }

    #[test]
    fn build_from_kind() {
        let volatile = vec!["Tobacco".to_string()];
        let policy = RiskPolicy::build(RiskPolicyKind::PointAccumulation, &volatile);
        assert_eq!(policy.referenced_crops(), vec!["Tobacco"]);
        assert_eq!(policy.id(), "point_accumulation");
        assert_eq!(
            RiskPolicy::build(RiskPolicyKind::ScoreThreshold, &volatile),
            RiskPolicy::ScoreThreshold
        );
    }

    #[test]
    fn kind_from_str() {
        assert_eq!(
            RiskPolicyKind::from_str("point-accumulation"),
            Some(RiskPolicyKind::PointAccumulation)
        );
        assert_eq!(RiskPolicyKind::from_str("bogus"), None);
    }
}
