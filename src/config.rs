//! Pipeline configuration management.
//!
//! One serializable struct holds every knob of a load: how the data is
//! partitioned, how it is scaled, and optional experiment metadata. Configs
//! round-trip through TOML or JSON so a run can be reproduced exactly.
//!
//! # Example
//!
//! ```ignore
//! use skillshot_loader::config::PipelineConfig;
//!
//! let config = PipelineConfig::default();
//! config.save_toml("experiment.toml")?;
//!
//! let loaded = PipelineConfig::load_toml("experiment.toml")?;
//! let pipeline = Pipeline::from_config(loaded)?;
//! ```
//!
//! # TOML Layout
//!
//! ```toml
//! [split]
//! test_fraction = 0.25
//! seed = 42
//! cv_folds = 5
//!
//! [normalization]
//! enabled = true
//! scaled_channels = 7
//! ```

use crate::error::{LoaderError, Result};
use crate::schema::DEFAULT_SCALED_CHANNELS;
use std::fs;
use std::path::Path;

/// Default held-out fraction.
pub const DEFAULT_TEST_FRACTION: f64 = 0.25;

/// Default split seed.
pub const DEFAULT_SEED: u64 = 42;

/// Unified pipeline configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PipelineConfig {
    /// Train/test partitioning
    #[serde(default)]
    pub split: SplitConfig,

    /// Channel scaling
    #[serde(default)]
    pub normalization: NormalizationConfig,

    /// Experiment metadata (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExperimentMetadata>,
}

/// Stratified partitioning parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Fraction of each class held out for testing, in (0, 1)
    pub test_fraction: f64,

    /// Seed for the shuffling RNG
    pub seed: u64,

    /// Number of stratified folds to generate over the train partition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_folds: Option<usize>,
}

/// Channel scaling parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Apply z-score scaling at all
    pub enabled: bool,

    /// Number of leading channels to scale; the rest pass through
    pub scaled_channels: usize,
}

/// Experiment metadata for tracking and reproducibility.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExperimentMetadata {
    /// Experiment name
    pub name: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Version or git commit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Custom tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            split: SplitConfig::default(),
            normalization: NormalizationConfig::default(),
            metadata: None,
        }
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            cv_folds: None,
        }
    }
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scaled_channels: DEFAULT_SCALED_CHANNELS,
        }
    }
}

impl PipelineConfig {
    /// Create a new pipeline configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set experiment metadata.
    pub fn with_metadata(mut self, metadata: ExperimentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Set split configuration.
    pub fn with_split(mut self, config: SplitConfig) -> Self {
        self.split = config;
        self
    }

    /// Set normalization configuration.
    pub fn with_normalization(mut self, config: NormalizationConfig) -> Self {
        self.normalization = config;
        self
    }

    /// Validate the complete configuration.
    ///
    /// Returns Ok(()) if valid, Err(msg) otherwise.
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.split.validate()?;
        self.normalization.validate()?;
        Ok(())
    }

    /// Save configuration to TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(self).map_err(|e| LoaderError::Config(e.to_string()))?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    /// Load and validate configuration from TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: PipelineConfig =
            toml::from_str(&contents).map_err(|e| LoaderError::Config(e.to_string()))?;
        config.validate().map_err(LoaderError::Config)?;
        Ok(config)
    }

    /// Save configuration to JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json_string =
            serde_json::to_string_pretty(self).map_err(|e| LoaderError::Config(e.to_string()))?;
        fs::write(path, json_string)?;
        Ok(())
    }

    /// Load and validate configuration from JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: PipelineConfig =
            serde_json::from_str(&contents).map_err(|e| LoaderError::Config(e.to_string()))?;
        config.validate().map_err(LoaderError::Config)?;
        Ok(config)
    }

    /// Load from `.toml` or `.json`, chosen by extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::load_toml(path),
            Some("json") => Self::load_json(path),
            _ => Err(LoaderError::Config(format!(
                "unsupported config extension: {}",
                path.display()
            ))),
        }
    }
}

impl SplitConfig {
    /// Validate split configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            ));
        }
        if let Some(folds) = self.cv_folds {
            if folds < 2 {
                return Err(format!("cv_folds must be >= 2, got {folds}"));
            }
        }
        Ok(())
    }
}

impl NormalizationConfig {
    /// Validate normalization configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.enabled && self.scaled_channels == 0 {
            return Err("scaled_channels must be > 0 when normalization is enabled".to_string());
        }
        Ok(())
    }
}
