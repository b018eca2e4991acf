use super::features::FeatureVector;
use super::recommendation::RecommendationRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted recommendation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub month: u32,
    pub scoring_policy: String,
    pub top_crop: String,
    pub features: FeatureVector,
    pub recommendations: Vec<RecommendationRecord>,
    pub narrative: String,
}

impl HistoryEntry {
    pub fn from_report(report: &super::RecommendationReport) -> Self {
        Self {
            id: None,
            created_at: report.generated_at,
            month: report.month,
            scoring_policy: report.scoring_policy.clone(),
            top_crop: report
                .top()
                .map(|r| r.crop.clone())
                .unwrap_or_default(),
            features: report.features.clone(),
            recommendations: report.recommendations.clone(),
            narrative: report.explanation.narrative.clone(),
        }
    }
}

/// A farmer's verdict on a saved run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Option<i64>,
    pub run_id: i64,
    pub helpful: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub fn new(run_id: i64, helpful: bool, notes: Option<String>) -> Self {
        Self {
            id: None,
            run_id,
            helpful,
            notes: notes.filter(|n| !n.trim().is_empty()),
            created_at: Utc::now(),
        }
    }
}
