//! Skillshot Loader
//!
//! Parses block-format skillshot recordings into padded sequence tensors for
//! sequence classifiers.
//!
//! # Overview
//!
//! A recording is a header line naming `F` feature channels, followed by
//! blocks: one label line (a single integer token) and zero or more
//! measurement rows of `F` numbers. This crate turns such a file into:
//!
//! - a label vector over 7 contiguous classes (class 3 is noise), and
//! - a design tensor `[N, T_max, F]`, right-padded with zeros,
//!
//! then splits it into label-stratified train/test partitions and z-scores the
//! leading channels using train-only statistics.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Skillshot Loader                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  schema/        - Header and channel constants                  │
//! │  parser         - Two-state block parser                        │
//! │  labeling/      - Raw code → class decoding                     │
//! │  dataset        - Padded tensor assembly                        │
//! │  preprocessing/ - Stratified split and channel scaling          │
//! │  validation     - Finite/padding/alignment checks               │
//! │  pipeline       - End-to-end driver                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use skillshot_loader::{parser, SkillshotDataset};
//!
//! let parsed = parser::parse_str("a b\n1\n1.0 2.0\n3.0 4.0\n-1\n5.0 6.0\n7\n").unwrap();
//! let dataset = SkillshotDataset::from_parsed(&parsed).unwrap();
//!
//! assert_eq!(dataset.tensor().dim(), (3, 2, 2));
//! assert_eq!(dataset.class_indices().to_vec(), vec![0, 3, 6]);
//! ```

pub mod builder;
pub mod config;
pub mod dataset;
pub mod error;
pub mod labeling;
pub mod parser;
pub mod pipeline;
pub mod prelude;
pub mod preprocessing;
pub mod schema;
pub mod validation;

// Re-exports - Errors
pub use error::{LoaderError, Result};

// Re-exports - Schema & Parsing
pub use parser::{load_file, parse_str, BlockParser, ParsedFile, RawBlock};
pub use schema::{Header, DEFAULT_SCALED_CHANNELS};

// Re-exports - Labels & Dataset
pub use dataset::{SkillshotDataset, TensorAssembler};
pub use labeling::{decode_labels, LabelStats, SkillshotLabel, NUM_CLASSES};

// Re-exports - Preprocessing
pub use preprocessing::{
    ChannelScaler, ChannelStats, Partition, SplitIndices, StratifiedKFold, StratifiedSplitter,
};

// Re-exports - Config & Pipeline
pub use builder::PipelineBuilder;
pub use config::{ExperimentMetadata, NormalizationConfig, PipelineConfig, SplitConfig};
pub use pipeline::{Pipeline, PipelineOutput};

// Re-exports - Validation
pub use validation::{TensorValidator, ValidationLevel, ValidationResult};
