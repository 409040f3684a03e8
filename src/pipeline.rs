//! End-to-end loading pipeline.
//!
//! Connects the stages as pure steps with immutable hand-offs:
//!
//! ```text
//! file ──► parser::load_file ──► ParsedFile
//!                                   │
//!                     SkillshotDataset::from_parsed   (decode labels, then assemble)
//!                                   │
//!                      TensorValidator::validate_raw  (finite, trailing-zero padding)
//!                                   │
//!                     StratifiedSplitter::split       (seeded, per-class)
//!                                   │
//!                ChannelScaler::fit(train) ─► transform(train), transform(test)
//!                                   │
//!                            PipelineOutput
//! ```
//!
//! Any failure aborts the run; nothing is skipped.
//!
//! # Example
//!
//! ```ignore
//! use skillshot_loader::prelude::*;
//!
//! let pipeline = PipelineBuilder::new().test_fraction(0.25).seed(42).build()?;
//! let output = pipeline.process("skillshots.txt")?;
//!
//! println!("train {:?}", output.train.tensor.dim());
//! println!("test  {:?}", output.test.tensor.dim());
//! ```

use crate::config::PipelineConfig;
use crate::dataset::SkillshotDataset;
use crate::error::{LoaderError, Result};
use crate::labeling::LabelStats;
use crate::parser::{self, ParsedFile};
use crate::preprocessing::{
    ChannelScaler, ChannelStats, Partition, SplitIndices, StratifiedKFold, StratifiedSplitter,
};
use crate::validation::{TensorValidator, ValidationResult};
use std::path::Path;

/// Output from pipeline processing.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Unscaled dataset as loaded
    pub dataset: SkillshotDataset,

    /// Train partition, scaled with its own statistics
    pub train: Partition,

    /// Test partition, scaled with the train statistics
    pub test: Partition,

    /// Fitted scaling statistics (None when normalization is disabled)
    pub stats: Option<ChannelStats>,

    /// Stratified folds over the train partition, indices relative to `train`
    pub cv_folds: Option<Vec<SplitIndices>>,

    /// Checks run during processing (warnings only; errors abort)
    pub validation: ValidationResult,
}

impl PipelineOutput {
    /// Label counts of the full dataset.
    pub fn label_stats(&self) -> LabelStats {
        self.dataset.label_stats()
    }

    /// Label counts of the train partition.
    pub fn train_label_stats(&self) -> LabelStats {
        LabelStats::from_indices(&self.train.class_indices())
    }

    /// Label counts of the test partition.
    pub fn test_label_stats(&self) -> LabelStats {
        LabelStats::from_indices(&self.test.class_indices())
    }
}

/// Configured loading pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    splitter: StratifiedSplitter,
    validator: TensorValidator,
}

impl Pipeline {
    /// Create a pipeline from a validated configuration.
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        config.validate().map_err(LoaderError::Config)?;
        let splitter = StratifiedSplitter::new(config.split.test_fraction, config.split.seed)?;

        Ok(Self {
            config,
            splitter,
            validator: TensorValidator::new(),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load and process a recording file.
    pub fn process<P: AsRef<Path>>(&self, path: P) -> Result<PipelineOutput> {
        let parsed = parser::load_file(path)?;
        self.process_parsed(&parsed)
    }

    /// Process a recording held in memory.
    pub fn process_str(&self, text: &str) -> Result<PipelineOutput> {
        let parsed = parser::parse_str(text)?;
        self.process_parsed(&parsed)
    }

    /// Process an already parsed file.
    pub fn process_parsed(&self, parsed: &ParsedFile) -> Result<PipelineOutput> {
        let dataset = SkillshotDataset::from_parsed(parsed)?;

        let mut validation = self.validator.validate_raw(dataset.tensor(), dataset.lengths());
        validation.merge(self.validator.validate_labels(dataset.tensor(), dataset.labels()));
        Self::fail_on_errors(&validation)?;
        for warning in validation.warnings() {
            log::warn!("{warning}");
        }

        log::info!("Label distribution: {}", dataset.label_stats().summary());

        let (mut train, mut test) = self.splitter.split(&dataset)?;
        log::info!(
            "Split {} samples: {} train / {} test (fraction {}, seed {})",
            dataset.len(),
            train.len(),
            test.len(),
            self.splitter.test_fraction(),
            self.splitter.seed()
        );

        let stats = if self.config.normalization.enabled {
            let channels = self.config.normalization.scaled_channels;
            if channels > dataset.feature_count() {
                log::warn!(
                    "scaled_channels {} exceeds feature count {}; scaling all channels",
                    channels,
                    dataset.feature_count()
                );
            }
            let scaler = ChannelScaler::fit(&train.tensor, channels);
            scaler.transform_inplace(&mut train.tensor);
            scaler.transform_inplace(&mut test.tensor);

            let mut scaled = self.validator.validate_finite(&train.tensor);
            scaled.merge(self.validator.validate_finite(&test.tensor));
            Self::fail_on_errors(&scaled)?;
            validation.merge(scaled);

            Some(scaler.stats().clone())
        } else {
            None
        };

        let cv_folds = match self.config.split.cv_folds {
            Some(k) => Some(StratifiedKFold::new(k, self.config.split.seed)?.folds(&train.labels)?),
            None => None,
        };

        Ok(PipelineOutput {
            dataset,
            train,
            test,
            stats,
            cv_folds,
            validation,
        })
    }

    fn fail_on_errors(result: &ValidationResult) -> Result<()> {
        if result.has_errors() {
            return Err(LoaderError::DataIntegrity(result.errors().join("; ")));
        }
        Ok(())
    }
}
