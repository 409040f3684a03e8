//! Partitioning and scaling applied after the design tensor is built.
//!
//! - **Split**: seeded, label-stratified train/test and k-fold index sets
//! - **Normalization**: per-channel z-score over the leading channels, fitted
//!   on the train partition only
//!
//! # Example
//!
//! ```ignore
//! use skillshot_loader::preprocessing::{ChannelScaler, StratifiedSplitter};
//!
//! let (train, test) = StratifiedSplitter::new(0.25, 42)?.split(&dataset)?;
//! let scaler = ChannelScaler::fit(&train.tensor, 7);
//! let train_x = scaler.transform(&train.tensor);
//! let test_x = scaler.transform(&test.tensor);
//! ```

pub mod normalization;
pub mod split;

pub use normalization::{ChannelScaler, ChannelStats, ZScoreNormalizer};
pub use split::{Partition, SplitIndices, StratifiedKFold, StratifiedSplitter};
