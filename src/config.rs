use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::calibration::{KeywordCatalog, KeywordProfile};
use crate::error::{EngineError, Result};

/// Cross-dimension weights of the aggregate score. Risk is subtracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionWeights {
    pub hotness: f64,
    pub velocity: f64,
    pub density: f64,
    pub feasibility: f64,
    pub monetization: f64,
    pub risk: f64,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            hotness: 0.20,
            velocity: 0.30,
            density: 0.15,
            feasibility: 0.15,
            monetization: 0.20,
            risk: 0.25,
        }
    }
}

/// Per-metric share of the period-over-period growth signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityWeights {
    pub views: f64,
    pub likes: f64,
    pub comments: f64,
    pub shares: f64,
    pub saves: f64,
}

impl Default for VelocityWeights {
    fn default() -> Self {
        Self {
            views: 0.45,
            likes: 0.25,
            comments: 0.15,
            shares: 0.10,
            saves: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of (platform, keyword) keys retained.
    pub capacity: u64,
    /// Keys untouched for this long are evicted. Zero disables idle expiry.
    pub idle_ttl_secs: u64,
    pub snapshot_path: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: 100_000,
            idle_ttl_secs: 7 * 24 * 3600,
            snapshot_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker threads for batch scoring. Zero uses one per core.
    pub workers: usize,
    pub top_n: usize,
    pub min_score: u8,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            top_n: 10,
            min_score: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub keyword: String,
    #[serde(flatten)]
    pub profile: KeywordProfile,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: DimensionWeights,
    pub velocity: VelocityWeights,
    /// Externals used when neither the observation nor the catalog provides one.
    pub defaults: KeywordProfile,
    pub history: HistoryConfig,
    pub batch: BatchConfig,
    /// Extra catalog entries, matched before the built-in ones.
    pub keywords: Vec<CatalogEntry>,
}

impl EngineConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>)> {
        let config_path = path.or_else(default_config_path);
        let mut config = match config_path.as_ref() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(path)?;
                toml::from_str(&contents)
                    .map_err(|err| EngineError::Config(format!("failed to parse config: {}", err)))?
            }
            _ => EngineConfig::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| EngineError::Config(format!("failed to serialize config: {}", err)))?;
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let weights = &self.weights;
        let all = [
            weights.hotness,
            weights.velocity,
            weights.density,
            weights.feasibility,
            weights.monetization,
            weights.risk,
            self.velocity.views,
            self.velocity.likes,
            self.velocity.comments,
            self.velocity.shares,
            self.velocity.saves,
        ];
        if all.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
            return Err(EngineError::Config(
                "weights must be finite and non-negative".to_string(),
            ));
        }
        if self.history.capacity == 0 {
            return Err(EngineError::Config(
                "history capacity must be positive".to_string(),
            ));
        }
        let defaults = [self.defaults.monetization, self.defaults.ip_risk];
        if defaults.iter().any(|value| !(0.0..=1.0).contains(value)) {
            return Err(EngineError::Config(format!(
                "default monetization and ip risk must be within 0-1, got {} and {}",
                self.defaults.monetization, self.defaults.ip_risk
            )));
        }
        Ok(())
    }

    pub fn keyword_catalog(&self) -> KeywordCatalog {
        let builtin = KeywordCatalog::builtin(self.defaults.clone());
        if self.keywords.is_empty() {
            return builtin;
        }
        let mut entries: Vec<(String, KeywordProfile)> = self
            .keywords
            .iter()
            .map(|entry| (entry.keyword.clone(), entry.profile.clone()))
            .collect();
        entries.extend(builtin.entries());
        KeywordCatalog::new(entries, self.defaults.clone())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(capacity) = env::var("TREND_HISTORY_CAPACITY") {
            if let Ok(value) = capacity.parse::<u64>() {
                self.history.capacity = value;
            }
        }
        if let Ok(idle) = env::var("TREND_HISTORY_IDLE_SECS") {
            if let Ok(value) = idle.parse::<u64>() {
                self.history.idle_ttl_secs = value;
            }
        }
        if let Ok(path) = env::var("TREND_HISTORY_PATH") {
            if !path.trim().is_empty() {
                self.history.snapshot_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(workers) = env::var("TREND_BATCH_WORKERS") {
            if let Ok(value) = workers.parse::<usize>() {
                self.batch.workers = value;
            }
        }
        if let Ok(top_n) = env::var("TREND_TOP_N") {
            if let Ok(value) = top_n.parse::<usize>() {
                self.batch.top_n = value;
            }
        }
        if let Ok(min_score) = env::var("TREND_MIN_SCORE") {
            if let Ok(value) = min_score.parse::<u8>() {
                self.batch.min_score = value.min(100);
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("TREND_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/engine.toml")))
}
