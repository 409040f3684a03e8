//! Prelude module for convenient imports.
//!
//! ```ignore
//! use skillshot_loader::prelude::*;
//!
//! let pipeline = PipelineBuilder::new().seed(42).build()?;
//! let output = pipeline.process("skillshots.txt")?;
//! ```

// ============================================================================
// Core Pipeline
// ============================================================================

pub use crate::builder::PipelineBuilder;
pub use crate::config::{ExperimentMetadata, NormalizationConfig, PipelineConfig, SplitConfig};
pub use crate::pipeline::{Pipeline, PipelineOutput};

// ============================================================================
// Parsing & Assembly
// ============================================================================

pub use crate::dataset::{SkillshotDataset, TensorAssembler};
pub use crate::parser::{load_file, parse_str, BlockParser, ParsedFile, RawBlock};
pub use crate::schema::{Header, DEFAULT_SCALED_CHANNELS};

// ============================================================================
// Labels
// ============================================================================

pub use crate::labeling::{decode_labels, one_hot, LabelStats, SkillshotLabel, NUM_CLASSES};

// ============================================================================
// Preprocessing
// ============================================================================

pub use crate::preprocessing::{
    ChannelScaler, ChannelStats, Partition, SplitIndices, StratifiedKFold,
    StratifiedSplitter, ZScoreNormalizer,
};

// ============================================================================
// Validation & Errors
// ============================================================================

pub use crate::error::{LoaderError, Result};
pub use crate::validation::{TensorValidator, ValidationLevel, ValidationResult};

// ============================================================================
// Type Aliases for Convenience
// ============================================================================

/// Design tensor type `[N, T_max, F]`
pub type DesignTensor = ndarray::Array3<f64>;

/// Label vector type (class indices)
pub type LabelVector = ndarray::Array1<usize>;
