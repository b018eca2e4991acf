use crate::error::{CropwiseError, Result};
use crate::knowledge::KnowledgeBase;
use crate::logic::engine::{
    DEFAULT_FALLBACK_CROP, DEFAULT_MAX_RESULTS, DEFAULT_MIN_SUITABILITY,
};
use crate::logic::risk::DEFAULT_VOLATILE_CROPS;
use crate::logic::{
    EngineSettings, RecommendationEngine, RiskPolicy, RiskPolicyKind, ScoringPolicyKind,
};
use crate::models::{FarmingMethod, FeatureInput, IrrigationType, MarketSnapshot};
use dialoguer::{Input, Password, Select};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    /// Alternative crop table; the built-in table is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base: Option<PathBuf>,
    #[serde(default)]
    pub farm: FarmConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openweathermap: Option<OpenWeatherMapConfig>,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring_policy: ScoringPolicyKind,
    pub risk_policy: RiskPolicyKind,
    pub min_suitability: f64,
    pub max_results: usize,
    pub fallback_crop: String,
    /// Crops that earn an extra risk point under `point_accumulation`
    pub volatile_crops: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring_policy: ScoringPolicyKind::default(),
            risk_policy: RiskPolicyKind::default(),
            min_suitability: DEFAULT_MIN_SUITABILITY,
            max_results: DEFAULT_MAX_RESULTS,
            fallback_crop: DEFAULT_FALLBACK_CROP.into(),
            volatile_crops: DEFAULT_VOLATILE_CROPS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl EngineConfig {
    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            min_suitability: self.min_suitability,
            max_results: self.max_results,
            fallback_crop: self.fallback_crop.clone(),
        }
    }

    pub fn risk(&self) -> RiskPolicy {
        RiskPolicy::build(self.risk_policy, &self.volatile_crops)
    }
}

/// Farm details that rarely change between runs.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FarmConfig {
    pub soil_type: Option<String>,
    pub area_ha: Option<f64>,
    pub farming_method: Option<FarmingMethod>,
    pub irrigation_type: Option<IrrigationType>,
    pub experience_years: Option<u32>,
}

impl FarmConfig {
    pub fn as_feature_input(&self) -> FeatureInput {
        FeatureInput {
            soil_type: self.soil_type.clone(),
            area_ha: self.area_ha,
            farming_method: self.farming_method,
            irrigation_type: self.irrigation_type,
            experience_years: self.experience_years,
            ..Default::default()
        }
    }
}

/// Current mandi prices in INR per quintal.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketConfig {
    pub prices: BTreeMap<String, f64>,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OpenWeatherMapConfig {
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl std::fmt::Debug for OpenWeatherMapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMapConfig")
            .field("api_key", &"[REDACTED]")
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(CropwiseError::Config(format!(
                "Config file not found at {:?}. Run `cropwise init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| CropwiseError::Config(format!("Failed to read config: {}", e)))?;

        let config = Self::from_yaml_str(&config_str)?;
        tracing::debug!(path = %config_path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load the config if one exists, otherwise fall back to defaults.
    /// An explicit `--config` path must exist.
    pub fn load_or_default(config_override: Option<PathBuf>) -> Result<Self> {
        if config_override.is_some() || Self::exists(None) {
            Self::load(config_override)
        } else {
            tracing::debug!("No configuration found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // Substitute environment variables
        let yaml = Self::substitute_env_vars(yaml)?;

        serde_yaml::from_str(&yaml)
            .map_err(|e| CropwiseError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("cropwise").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/cropwise/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CropwiseError::Config("Cannot determine config directory".into()))?
            .join("cropwise");
        Ok(config_dir.join("config.yaml"))
    }

    /// Crop table named by the config, or the built-in one.
    pub fn knowledge_base(&self) -> Result<KnowledgeBase> {
        match &self.knowledge_base {
            Some(path) => KnowledgeBase::load(path),
            None => KnowledgeBase::builtin(),
        }
    }

    pub fn market_snapshot(&self) -> MarketSnapshot {
        MarketSnapshot::new(self.market.prices.clone())
    }

    /// Engine wired with the configured policies, thresholds and prices.
    pub fn build_engine(&self, knowledge: Arc<KnowledgeBase>) -> Result<RecommendationEngine> {
        RecommendationEngine::with_policies(
            knowledge,
            self.engine.scoring_policy.build(),
            self.engine.risk(),
            self.engine.settings(),
        )?
        .with_market(self.market_snapshot())
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up Cropwise!");
        println!();

        // --- Farm ---
        println!("Farm");
        let soil_type: String = Input::new()
            .with_prompt("  Soil type (Loamy, Clayey, Black, Red, Alluvial, ...)")
            .default("Loamy".into())
            .interact_text()
            .map_err(|e| CropwiseError::Config(format!("Input error: {}", e)))?;

        let area_ha: f64 = Input::new()
            .with_prompt("  Area (hectares)")
            .default(1.0)
            .interact_text()
            .map_err(|e| CropwiseError::Config(format!("Input error: {}", e)))?;

        let methods = [
            FarmingMethod::Conventional,
            FarmingMethod::Organic,
            FarmingMethod::Mixed,
        ];
        let method_labels: Vec<&str> = methods.iter().map(|m| m.as_str()).collect();
        let method_idx = Select::new()
            .with_prompt("  Farming method")
            .items(&method_labels)
            .default(0)
            .interact()
            .map_err(|e| CropwiseError::Config(format!("Input error: {}", e)))?;

        let irrigation = [
            IrrigationType::Rainfed,
            IrrigationType::Irrigated,
            IrrigationType::Drip,
            IrrigationType::Sprinkler,
        ];
        let irrigation_labels: Vec<&str> = irrigation.iter().map(|i| i.as_str()).collect();
        let irrigation_idx = Select::new()
            .with_prompt("  Irrigation")
            .items(&irrigation_labels)
            .default(0)
            .interact()
            .map_err(|e| CropwiseError::Config(format!("Input error: {}", e)))?;

        let experience_years: u32 = Input::new()
            .with_prompt("  Years of farming experience")
            .default(5)
            .interact_text()
            .map_err(|e| CropwiseError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- OpenWeatherMap (optional) ---
        println!("OpenWeatherMap (leave API key blank to skip)");
        let owm_api_key: String = Password::new()
            .with_prompt("  API key")
            .allow_empty_password(true)
            .interact()
            .map_err(|e| CropwiseError::Config(format!("Input error: {}", e)))?;

        let openweathermap = if owm_api_key.is_empty() {
            None
        } else {
            let latitude: f64 = Input::new()
                .with_prompt("  Latitude")
                .default(21.15)
                .interact_text()
                .map_err(|e| CropwiseError::Config(format!("Input error: {}", e)))?;

            let longitude: f64 = Input::new()
                .with_prompt("  Longitude")
                .default(79.09)
                .interact_text()
                .map_err(|e| CropwiseError::Config(format!("Input error: {}", e)))?;

            Some(OpenWeatherMapConfig {
                api_key: owm_api_key,
                latitude,
                longitude,
                enabled: true,
            })
        };

        println!();

        let config = Config {
            farm: FarmConfig {
                soil_type: Some(soil_type),
                area_ha: Some(area_ha),
                farming_method: Some(methods[method_idx]),
                irrigation_type: Some(irrigation[irrigation_idx]),
                experience_years: Some(experience_years),
            },
            openweathermap,
            ..Default::default()
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| CropwiseError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# Cropwise Configuration\n# Generated by `cropwise init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| CropwiseError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        // CLI override takes priority
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("CROPWISE_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| CropwiseError::Config("Cannot determine data directory".into()))?
            .join("cropwise");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("cropwise.db"))
    }
}
