use super::explanation;
use super::risk::RiskPolicy;
use super::scoring::{RequirementRatioPolicy, ScoringPolicy};
use super::{calculations, season, soil_health};
use crate::error::{CropwiseError, Result};
use crate::knowledge::KnowledgeBase;
use crate::models::{
    CropProfile, ExplanationBundle, FeatureImpact, FeatureVector, MarketSnapshot,
    RecommendationRecord, RecommendationReport,
};
use chrono::{Month, Utc};
use std::sync::Arc;

pub const DEFAULT_MIN_SUITABILITY: f64 = 0.1;
pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const DEFAULT_FALLBACK_CROP: &str = "Rice";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Crops must score strictly above this to be listed
    pub min_suitability: f64,
    pub max_results: usize,
    /// Recommended when nothing clears `min_suitability`
    pub fallback_crop: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            min_suitability: DEFAULT_MIN_SUITABILITY,
            max_results: DEFAULT_MAX_RESULTS,
            fallback_crop: DEFAULT_FALLBACK_CROP.to_string(),
        }
    }
}

/// Scores every crop in the knowledge base against a field and assembles
/// the ranked, explained result.
///
/// The engine holds no per-request state; a single instance can serve
/// concurrent callers.
pub struct RecommendationEngine {
    knowledge: Arc<KnowledgeBase>,
    policy: Box<dyn ScoringPolicy>,
    risk: RiskPolicy,
    settings: EngineSettings,
    market: Option<MarketSnapshot>,
}

impl RecommendationEngine {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Result<Self> {
        Self::with_policies(
            knowledge,
            Box::new(RequirementRatioPolicy),
            RiskPolicy::default(),
            EngineSettings::default(),
        )
    }

    pub fn with_policies(
        knowledge: Arc<KnowledgeBase>,
        policy: Box<dyn ScoringPolicy>,
        risk: RiskPolicy,
        settings: EngineSettings,
    ) -> Result<Self> {
        if settings.max_results == 0 {
            return Err(CropwiseError::Config(
                "max_results must be at least 1".into(),
            ));
        }
        if !(0.0..1.0).contains(&settings.min_suitability) {
            return Err(CropwiseError::Config(format!(
                "min_suitability must be in [0, 1), got {}",
                settings.min_suitability
            )));
        }

        knowledge.require_all(
            [settings.fallback_crop.as_str()],
            "fallback_crop",
        )?;
        knowledge.require_all(policy.referenced_crops(), policy.name())?;
        knowledge.require_all(risk.referenced_crops(), "volatile_crops")?;

        Ok(Self {
            knowledge,
            policy,
            risk,
            settings,
            market: None,
        })
    }

    /// Price profits and demand from current market quotes instead of
    /// the knowledge base reference values.
    pub fn with_market(mut self, market: MarketSnapshot) -> Result<Self> {
        if let Some((crop, price)) = market
            .prices
            .iter()
            .find(|(_, p)| !(p.is_finite() && **p >= 0.0))
        {
            return Err(CropwiseError::Config(format!(
                "market price for {} must be a non-negative number, got {}",
                crop, price
            )));
        }
        self.knowledge
            .require_all(market.prices.keys().map(String::as_str), "market prices")?;

        self.market = if market.is_empty() { None } else { Some(market) };
        Ok(self)
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn scoring_policy(&self) -> &dyn ScoringPolicy {
        self.policy.as_ref()
    }

    pub fn risk_policy(&self) -> &RiskPolicy {
        &self.risk
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn market(&self) -> Option<&MarketSnapshot> {
        self.market.as_ref()
    }

    /// Suitability of a single crop
    pub fn score(&self, crop: &str, features: &FeatureVector) -> Result<f64> {
        let profile = self.profile(crop)?;
        Ok(self.policy.score(profile, features))
    }

    /// Best crops for the field, strongest first.
    ///
    /// Never empty: when no crop clears the threshold a single conservative
    /// fallback record is returned instead.
    pub fn rank_crops(&self, features: &FeatureVector, month: Month) -> Vec<RecommendationRecord> {
        self.rank(features, month).0
    }

    fn rank(&self, features: &FeatureVector, month: Month) -> (Vec<RecommendationRecord>, bool) {
        let mut records: Vec<RecommendationRecord> = self
            .knowledge
            .iter()
            .filter_map(|profile| {
                let suitability = self.policy.score(profile, features);
                tracing::debug!(
                    crop = %profile.name,
                    suitability,
                    policy = self.policy.id(),
                    "Scored crop"
                );
                (suitability > self.settings.min_suitability)
                    .then(|| self.build_record(profile, features, suitability, month))
            })
            .collect();

        if records.is_empty() {
            tracing::warn!(
                crop = %self.settings.fallback_crop,
                threshold = self.settings.min_suitability,
                "No crop cleared the suitability threshold, using fallback"
            );
            return (vec![self.fallback_record()], true);
        }

        // Stable sort keeps knowledge base order among ties
        records.sort_by(|a, b| b.suitability_score.total_cmp(&a.suitability_score));
        records.truncate(self.settings.max_results);
        (records, false)
    }

    pub fn explain(&self, top: &RecommendationRecord, features: &FeatureVector) -> String {
        explanation::narrative(top, features)
    }

    pub fn feature_importance(
        &self,
        top: &RecommendationRecord,
        features: &FeatureVector,
    ) -> Result<Vec<FeatureImpact>> {
        let profile = self.profile(&top.crop)?;
        Ok(explanation::feature_importance(profile, features))
    }

    /// Full report for one request: validated features, ranking,
    /// explanation and soil health.
    pub fn recommend(&self, features: &FeatureVector, month: Month) -> Result<RecommendationReport> {
        features.validate()?;

        let (recommendations, used_fallback) = self.rank(features, month);

        let top = recommendations
            .first()
            .ok_or_else(|| CropwiseError::NotFound("no recommendation produced".into()))?;
        let explanation = ExplanationBundle {
            narrative: self.explain(top, features),
            top_features: self.feature_importance(top, features)?,
        };

        tracing::info!(
            crop = %top.crop,
            suitability = top.suitability_score,
            candidates = recommendations.len(),
            "Top recommendation"
        );

        Ok(RecommendationReport {
            generated_at: Utc::now(),
            month: month.number_from_month(),
            scoring_policy: self.policy.id().to_string(),
            risk_policy: self.risk.id().to_string(),
            features: features.clone(),
            soil_health: soil_health::assess(features),
            recommendations,
            explanation,
            used_fallback,
        })
    }

    fn profile(&self, crop: &str) -> Result<&CropProfile> {
        self.knowledge
            .get(crop)
            .ok_or_else(|| CropwiseError::UnknownCrop(crop.to_string()))
    }

    /// Fixed conservative figures, labelled with the fallback crop's own
    /// water class and demand.
    fn fallback_record(&self) -> RecommendationRecord {
        let mut record = RecommendationRecord::fallback(self.settings.fallback_crop.clone());
        if let Some(profile) = self.knowledge.get(&self.settings.fallback_crop) {
            record.water_requirement = profile.water_requirement;
            record.market_demand = self
                .market
                .as_ref()
                .and_then(|m| m.demand_for(&profile.name))
                .unwrap_or(profile.market_demand);
        }
        record
    }

    fn build_record(
        &self,
        profile: &CropProfile,
        features: &FeatureVector,
        suitability: f64,
        month: Month,
    ) -> RecommendationRecord {
        let price = self
            .market
            .as_ref()
            .and_then(|m| m.price_for(&profile.name))
            .unwrap_or(profile.reference_price_per_quintal);
        let market_demand = self
            .market
            .as_ref()
            .and_then(|m| m.demand_for(&profile.name))
            .unwrap_or(profile.market_demand);

        let predicted_yield = calculations::predict_yield(profile, features, suitability);
        let profit =
            calculations::estimate_profit(profile, predicted_yield, features.area_ha, price);

        RecommendationRecord {
            crop: profile.name.clone(),
            suitability_score: suitability,
            predicted_yield_kg_per_ha: predicted_yield,
            estimated_profit_inr: profit,
            sustainability_score: calculations::sustainability_score(
                profile.water_requirement,
                features.farming_method,
            ),
            confidence: calculations::confidence(suitability),
            risk_level: self.risk.classify(&profile.name, features, suitability),
            season_suitability: season::season_fit(profile, month),
            water_requirement: profile.water_requirement,
            market_demand,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::builtin_profiles;
    use crate::logic::scoring::PreferenceRangePolicy;
    use crate::models::{IrrigationType, MarketDemand, RiskLevel, SeasonFit, WaterRequirement};
    use std::collections::BTreeMap;

    fn engine() -> RecommendationEngine {
        RecommendationEngine::new(Arc::new(KnowledgeBase::builtin().unwrap())).unwrap()
    }

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
    fn scenario_ranks_rice_first() {
        let report = engine().recommend(&scenario(), Month::July).unwrap();
        let top = report.top().unwrap();

        assert_eq!(top.crop, "Rice");
        assert_eq!(top.risk_level, RiskLevel::Low);
        assert_eq!(top.season_suitability, SeasonFit::Excellent);
        assert!(top.predicted_yield_kg_per_ha > 3000.0);
        assert!(report.explanation.narrative.contains("Rice"));
        assert!(!report.used_fallback);
        assert_eq!(report.month, 7);
        assert_eq!(report.scoring_policy, "requirement_ratio");
    }

    #[test]
    fn scenario_runners_up() {
        let records = engine().rank_crops(&scenario(), Month::July);
        let names: Vec<&str> = records.iter().map(|r| r.crop.as_str()).collect();
        assert_eq!(&names[..3], &["Rice", "Pigeon Pea", "Soybean"]);
    }

    #[test]
    fn records_sorted_and_truncated() {
        let engine = engine();
        let inputs = [
            scenario(),
            FeatureVector::default(),
            FeatureVector {
                temperature: 18.0,
                rainfall: 40.0,
                soil_type: "Black".into(),
                ..Default::default()
            },
        ];
        for features in &inputs {
            let records = engine.rank_crops(features, Month::January);
            assert!(!records.is_empty());
            assert!(records.len() <= DEFAULT_MAX_RESULTS);
            assert!(records
                .windows(2)
                .all(|w| w[0].suitability_score >= w[1].suitability_score));
        }
    }

    #[test]
    fn record_values_stay_in_bounds() {
        let engine = engine();
        for temperature in [0.0, 15.0, 25.0, 35.0, 48.0] {
            for rainfall in [5.0, 60.0, 150.0, 400.0] {
                for ph in [4.0, 6.5, 9.0] {
                    let features = FeatureVector {
                        temperature,
                        rainfall,
                        ph,
                        ..scenario()
                    };
                    for record in engine.rank_crops(&features, Month::March) {
                        assert!((0.0..=1.0).contains(&record.suitability_score));
                        assert!((0.0..=1.0).contains(&record.sustainability_score));
                        assert!((0.0..=1.0).contains(&record.confidence));
                        assert!(record.predicted_yield_kg_per_ha >= 0.0);
                        assert!(record.estimated_profit_inr >= 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn ranking_is_idempotent() {
        let engine = engine();
        let first = engine.rank_crops(&scenario(), Month::August);
        let second = engine.rank_crops(&scenario(), Month::August);
        assert_eq!(first, second);
    }

    #[test]
    fn month_only_changes_season_fit() {
        let engine = engine();
        let july = engine.rank_crops(&scenario(), Month::July);
        let december = engine.rank_crops(&scenario(), Month::December);
        assert_eq!(july.len(), december.len());
        for (a, b) in july.iter().zip(&december) {
            assert_eq!(a.crop, b.crop);
            assert_eq!(a.suitability_score, b.suitability_score);
            assert_eq!(a.estimated_profit_inr, b.estimated_profit_inr);
        }
        assert_eq!(july[0].season_suitability, SeasonFit::Excellent);
        assert_eq!(december[0].season_suitability, SeasonFit::Poor);
    }

    #[test]
    fn zero_rainfall_falls_back() {
        let features = FeatureVector {
            rainfall: 0.0,
            ..scenario()
        };
        let report = engine().recommend(&features, Month::June).unwrap();
        assert!(report.used_fallback);
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(
            report.recommendations[0],
            RecommendationRecord::fallback("Rice")
        );
        let total: f64 = report
            .explanation
            .top_features
            .iter()
            .map(|f| f.impact)
            .sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn importance_sums_to_one() {
        let engine = engine();
        let records = engine.rank_crops(&scenario(), Month::July);
        for record in &records {
            let impacts = engine.feature_importance(record, &scenario()).unwrap();
            assert!(impacts.len() <= 5);
            let total: f64 = impacts.iter().map(|f| f.impact).sum();
            assert!((total - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn importance_for_unknown_crop_fails() {
        let record = RecommendationRecord::fallback("Coffee");
        let err = engine()
            .feature_importance(&record, &scenario())
            .unwrap_err();
        assert!(matches!(err, CropwiseError::UnknownCrop(_)));
    }

    #[test]
    fn preferred_soil_scores_higher_through_engine() {
        let engine = engine();
        let black = FeatureVector {
            soil_type: "Black".into(),
            ..scenario()
        };
        let peaty = FeatureVector {
            soil_type: "Peaty".into(),
            ..scenario()
        };
        assert!(engine.score("Cotton", &black).unwrap() > engine.score("Cotton", &peaty).unwrap());
    }

    #[test]
    fn rejects_invalid_features() {
        let features = FeatureVector {
            area_ha: -1.0,
            ..scenario()
        };
        assert!(matches!(
            engine().recommend(&features, Month::July),
            Err(CropwiseError::InvalidFeature(_))
        ));
    }

    #[test]
    fn market_snapshot_drives_price_and_demand() {
        let mut prices = BTreeMap::new();
        prices.insert("Rice".to_string(), 4200.0);
        prices.insert("Pigeon Pea".to_string(), 2000.0);
        prices.insert("Soybean".to_string(), 3000.0);

        let baseline = engine().rank_crops(&scenario(), Month::July);
        let priced = engine()
            .with_market(MarketSnapshot::new(prices))
            .unwrap()
            .rank_crops(&scenario(), Month::July);

        assert_eq!(priced[0].crop, "Rice");
        assert!((priced[0].estimated_profit_inr - 2.0 * baseline[0].estimated_profit_inr).abs() <= 1.0);
        assert_eq!(priced[0].market_demand, MarketDemand::VeryStrong);
        assert_eq!(priced[1].market_demand, MarketDemand::Weak);
        // Ranking does not depend on prices
        assert_eq!(
            priced.iter().map(|r| &r.crop).collect::<Vec<_>>(),
            baseline.iter().map(|r| &r.crop).collect::<Vec<_>>()
        );
    }

    #[test]
    fn market_snapshot_must_reference_known_crops() {
        let mut prices = BTreeMap::new();
        prices.insert("Coffee".to_string(), 9000.0);
        let err = engine().with_market(MarketSnapshot::new(prices)).err().unwrap();
        assert!(err.to_string().contains("Coffee"));
    }

    #[test]
    fn construction_checks_references() {
        let kb = Arc::new(KnowledgeBase::builtin().unwrap());

        let settings = EngineSettings {
            fallback_crop: "Coffee".into(),
            ..Default::default()
        };
        assert!(RecommendationEngine::with_policies(
            kb.clone(),
            Box::new(RequirementRatioPolicy),
            RiskPolicy::default(),
            settings,
        )
        .is_err());

        let risk = RiskPolicy::PointAccumulation {
            volatile_crops: vec!["Tobacco".into()],
        };
        assert!(RecommendationEngine::with_policies(
            kb.clone(),
            Box::new(RequirementRatioPolicy),
            risk,
            EngineSettings::default(),
        )
        .is_err());

        let settings = EngineSettings {
            max_results: 0,
            ..Default::default()
        };
        assert!(RecommendationEngine::with_policies(
            kb,
            Box::new(RequirementRatioPolicy),
            RiskPolicy::default(),
            settings,
        )
        .is_err());
    }

    #[test]
    fn preference_table_must_match_knowledge_base() {
        // A table without Barley cannot back the preference policy
        let crops = builtin_profiles()
            .into_iter()
            .filter(|c| c.name != "Barley")
            .collect();
        let kb = Arc::new(KnowledgeBase::new(crops).unwrap());
        assert!(RecommendationEngine::with_policies(
            kb,
            Box::new(PreferenceRangePolicy::builtin()),
            RiskPolicy::default(),
            EngineSettings::default(),
        )
        .is_err());
    }

    #[test]
    fn preference_policy_ranks_through_engine() {
        let kb = Arc::new(KnowledgeBase::builtin().unwrap());
        let engine = RecommendationEngine::with_policies(
            kb,
            Box::new(PreferenceRangePolicy::builtin()),
            RiskPolicy::point_accumulation(),
            EngineSettings::default(),
        )
        .unwrap();
        let report = engine.recommend(&scenario(), Month::July).unwrap();
        assert_eq!(report.scoring_policy, "preference_range");
        assert_eq!(report.risk_policy, "point_accumulation");
        assert_eq!(report.recommendations.len(), 5);
        assert!(report
            .recommendations
            .iter()
            .all(|r| r.risk_level == RiskLevel::Low));
    }

    #[test]
    fn synthetic_knowledge_base() {
        let mut millet = builtin_profiles().remove(0);
        millet.name = "Millet".into();
        millet.temperature_range = crate::models::ValueRange::new(25.0, 35.0);
        millet.rainfall_minimum = 30.0;
        let kb = Arc::new(KnowledgeBase::new(vec![millet]).unwrap());

        let settings = EngineSettings {
            fallback_crop: "Millet".into(),
            ..Default::default()
        };
        let engine = RecommendationEngine::with_policies(
            kb,
            Box::new(RequirementRatioPolicy),
            RiskPolicy::default(),
            settings,
        )
        .unwrap();

        let records = engine.rank_crops(&scenario(), Month::July);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].crop, "Millet");

        let dry = FeatureVector {
            rainfall: 0.0,
            ..scenario()
        };
        let fallback = engine.rank_crops(&dry, Month::July);
        assert_eq!(fallback[0].crop, "Millet");
        assert!((fallback[0].suitability_score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn fallback_carries_the_crops_own_labels() {
        let settings = EngineSettings {
            fallback_crop: "Chickpea".into(),
            ..Default::default()
        };
        let engine = RecommendationEngine::with_policies(
            Arc::new(KnowledgeBase::builtin().unwrap()),
            Box::new(RequirementRatioPolicy),
            RiskPolicy::default(),
            settings,
        )
        .unwrap();

        let dry = FeatureVector {
            rainfall: 0.0,
            ..scenario()
        };
        let records = engine.rank_crops(&dry, Month::July);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].crop, "Chickpea");
        assert_eq!(records[0].water_requirement, WaterRequirement::Low);
        assert_eq!(records[0].market_demand, MarketDemand::Medium);
        assert!((records[0].suitability_score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_knowledge_base_order() {
        let builtin = builtin_profiles();
        let mut twin = builtin[0].clone();
        assert_eq!(twin.name, "Rice");
        twin.name = "RiceTwin".into();

        let twin_first: Vec<CropProfile> =
            std::iter::once(twin.clone()).chain(builtin.clone()).collect();
        let engine = RecommendationEngine::new(Arc::new(KnowledgeBase::new(twin_first).unwrap()))
            .unwrap();
        let records = engine.rank_crops(&scenario(), Month::July);
        let names: Vec<&str> = records.iter().map(|r| r.crop.as_str()).collect();
        assert_eq!(&names[..3], &["RiceTwin", "Rice", "Pigeon Pea"]);
        assert_eq!(records[0].suitability_score, records[1].suitability_score);

        let mut twin_last = builtin;
        twin_last.push(twin);
        let engine = RecommendationEngine::new(Arc::new(KnowledgeBase::new(twin_last).unwrap()))
            .unwrap();
        let records = engine.rank_crops(&scenario(), Month::July);
        let names: Vec<&str> = records.iter().map(|r| r.crop.as_str()).collect();
        assert_eq!(&names[..2], &["Rice", "RiceTwin"]);
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RecommendationEngine>();

        let engine = Arc::new(engine());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || engine.rank_crops(&scenario(), Month::July))
            })
            .collect();
        for handle in handles {
            let records = handle.join().unwrap();
            assert_eq!(records[0].crop, "Rice");
        }
    }
}
