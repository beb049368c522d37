use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub catalog: CatalogSettings,
    pub deep_dive: DeepDiveSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub verification: VerificationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_kind")]
    pub source: CatalogKind,
    #[serde(default = "default_seed_path")]
    pub seed_path: String,
    pub database_url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

fn default_catalog_kind() -> CatalogKind { CatalogKind::Memory }
fn default_seed_path() -> String { "config/catalog.toml".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DeepDiveSettings {
    #[serde(default = "default_deep_dive_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_deep_dive_model")]
    pub model: String,
    pub timeout_secs: Option<u64>,
    pub cache_ttl_secs: Option<u64>,
    pub cache_size: Option<u64>,
}

fn default_deep_dive_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_deep_dive_model() -> String { "gemini-1.5-pro".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub extended_factors: bool,
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            extended_factors: false,
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

fn default_parallel_threshold() -> usize { crate::core::engine::DEFAULT_PARALLEL_THRESHOLD }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_budget_weight")]
    pub budget: f64,
    #[serde(default = "default_goal_weight")]
    pub goal: f64,
    #[serde(default = "default_goal_per_match")]
    pub goal_per_match: f64,
    #[serde(default = "default_placement_weight")]
    pub placement: f64,
    #[serde(default = "default_country_weight")]
    pub country: f64,
    #[serde(default = "default_ranking_weight")]
    pub ranking: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            budget: default_budget_weight(),
            goal: default_goal_weight(),
            goal_per_match: default_goal_per_match(),
            placement: default_placement_weight(),
            country: default_country_weight(),
            ranking: default_ranking_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(value: &WeightsConfig) -> Self {
        Self {
            budget: value.budget,
            goal: value.goal,
            goal_per_match: value.goal_per_match,
            placement: value.placement,
            country: value.country,
            ranking: value.ranking,
        }
    }
}

fn default_budget_weight() -> f64 { 25.0 }
fn default_goal_weight() -> f64 { 30.0 }
fn default_goal_per_match() -> f64 { 10.0 }
fn default_placement_weight() -> f64 { 15.0 }
fn default_country_weight() -> f64 { 20.0 }
fn default_ranking_weight() -> f64 { 10.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationSettings {
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

fn default_upload_dir() -> String { "data/verification".to_string() }
fn default_max_document_bytes() -> usize { 10 * 1024 * 1024 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with UNISPHERE_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // e.g., UNISPHERE__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        // Well-known variables take precedence over the prefixed ones
        let settings = apply_env_overrides(settings)?;

        Self::from_config(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        Self::from_config(settings)
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.scoring.weights.validate()?;
        Ok(settings)
    }
}

impl WeightsConfig {
    /// Every weight must be a finite, non-negative number
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("budget", self.budget),
            ("goal", self.goal),
            ("goal_per_match", self.goal_per_match),
            ("placement", self.placement),
            ("country", self.country),
            ("ranking", self.ranking),
        ];

        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Message(format!(
                    "scoring.weights.{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("UNISPHERE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply `DATABASE_URL` and `GEMINI_API_KEY` when present
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("catalog.database_url", database_url)?;
    }
    if let Ok(api_key) = env::var("GEMINI_API_KEY") {
        builder = builder.set_override("deep_dive.api_key", api_key)?;
    }

    builder.build()
}
