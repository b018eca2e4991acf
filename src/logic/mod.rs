pub mod calculations;
pub mod engine;
pub mod explanation;
pub mod risk;
pub mod scoring;
pub mod season;
pub mod soil_health;

pub use engine::{EngineSettings, RecommendationEngine};
pub use risk::{RiskPolicy, RiskPolicyKind};
pub use scoring::{ScoringPolicy, ScoringPolicyKind};
