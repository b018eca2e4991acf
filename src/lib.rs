//! Crop suitability scoring and ranking.
//!
//! Field conditions go in as a [`models::FeatureVector`]; the
//! [`logic::RecommendationEngine`] scores every crop in a
//! [`knowledge::KnowledgeBase`] and returns ranked records with yield,
//! profit, risk and a plain-language explanation.

pub mod config;
pub mod datasources;
pub mod db;
pub mod error;
pub mod knowledge;
pub mod logic;
pub mod models;

pub use error::{CropwiseError, Result};
