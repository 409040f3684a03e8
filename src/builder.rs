//! Fluent builder for pipeline configuration.
//!
//! # Quick Start
//!
//! ```
//! use skillshot_loader::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new()
//!     .test_fraction(0.25)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let output = pipeline
//!     .process_str("a b\n1\n1.0 2.0\n3.0 4.0\n-1\n5.0 6.0\n7\n")
//!     .unwrap();
//! assert_eq!(output.dataset.len(), 3);
//! ```
//!
//! # Defaults
//!
//! | Setting | Default |
//! |---------|---------|
//! | `test_fraction` | 0.25 |
//! | `seed` | 42 |
//! | `scaled_channels` | 7 |
//! | `cv_folds` | none |

use crate::config::{ExperimentMetadata, NormalizationConfig, PipelineConfig, SplitConfig};
use crate::error::{LoaderError, Result};
use crate::pipeline::Pipeline;

/// Fluent builder for [`Pipeline`].
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    split: SplitConfig,
    normalization: NormalizationConfig,
    metadata: Option<ExperimentMetadata>,
}

impl PipelineBuilder {
    /// Start from default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: PipelineConfig) -> Self {
        Self {
            split: config.split,
            normalization: config.normalization,
            metadata: config.metadata,
        }
    }

    /// Fraction of each class held out for testing.
    pub fn test_fraction(mut self, fraction: f64) -> Self {
        self.split.test_fraction = fraction;
        self
    }

    /// Shuffle seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.split.seed = seed;
        self
    }

    /// Generate `k` stratified folds over the train partition.
    pub fn cv_folds(mut self, k: usize) -> Self {
        self.split.cv_folds = Some(k);
        self
    }

    /// Number of leading channels to scale.
    pub fn scaled_channels(mut self, channels: usize) -> Self {
        self.normalization.scaled_channels = channels;
        self
    }

    /// Skip channel scaling.
    pub fn without_normalization(mut self) -> Self {
        self.normalization.enabled = false;
        self
    }

    /// Attach experiment metadata.
    pub fn metadata(mut self, metadata: ExperimentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Build the configuration without creating a pipeline.
    pub fn build_config(self) -> Result<PipelineConfig> {
        let config = PipelineConfig {
            split: self.split,
            normalization: self.normalization,
            metadata: self.metadata,
        };
        config.validate().map_err(LoaderError::Config)?;
        Ok(config)
    }

    /// Validate and build the pipeline.
    pub fn build(self) -> Result<Pipeline> {
        Pipeline::from_config(self.build_config()?)
    }
}
