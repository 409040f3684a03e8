//! Per-channel z-score scaling for design tensors.
//!
//! Statistics are fitted on the train partition only and then applied, unchanged,
//! to every partition:
//!
//! ```text
//! normalized[i, t, c] = (x[i, t, c] - mean[c]) / std[c]     for c < channels
//! normalized[i, t, c] = x[i, t, c]                          for c >= channels
//! ```
//!
//! Only the leading channels are scaled (7 in the reference setup). Trailing
//! channels hold bounded, flag-like inputs and pass through untouched.
//!
//! # Statistics
//!
//! - Mean and population standard deviation (divide by `n`) per channel
//! - Computed over every `(sample, timestep)` cell of the fitted tensor,
//!   padding rows included
//! - A standard deviation of exactly `0.0` becomes `1.0`, so constant channels
//!   are centred but never divided by zero
//!
//! # Usage
//!
//! ```
//! use ndarray::Array3;
//! use skillshot_loader::preprocessing::ChannelScaler;
//!
//! let train = Array3::from_shape_vec((2, 1, 2), vec![1.0, 5.0, 3.0, 5.0]).unwrap();
//! let scaler = ChannelScaler::fit(&train, 7);
//!
//! assert_eq!(scaler.stats().means, vec![2.0, 5.0]);
//! assert_eq!(scaler.stats().stds, vec![1.0, 1.0]); // channel 1 is constant
//!
//! let scaled = scaler.transform(&train);
//! assert_eq!(scaled[[0, 0, 0]], -1.0);
//! assert_eq!(scaled[[1, 0, 1]], 0.0);
//! ```

use ndarray::{s, Array3, Axis};
use serde::{Deserialize, Serialize};

/// Running mean and standard deviation for one channel.
///
/// Uses Welford's online algorithm. The standard deviation is the population
/// value; an exact zero (constant input, or a single sample) reads as `1.0`.
/// Before any update the statistics are the identity (mean 0, std 1).
///
/// # Example
///
/// ```
/// use skillshot_loader::preprocessing::ZScoreNormalizer;
///
/// let mut normalizer = ZScoreNormalizer::new();
/// for value in &[10.0, 20.0, 30.0, 40.0, 50.0] {
///     normalizer.update(*value);
/// }
///
/// assert_eq!(normalizer.mean(), 30.0);
/// assert!((normalizer.std() - 14.142).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ZScoreNormalizer {
    /// Running mean (Welford's algorithm)
    mean: f64,

    /// Running M2 for variance calculation (Welford's algorithm)
    m2: f64,

    /// Number of samples seen
    count: u64,
}

impl ZScoreNormalizer {
    /// Create an empty normalizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    /// Get the current mean (0 before any update).
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Get the population standard deviation, with zero mapped to one.
    pub fn std(&self) -> f64 {
        if self.count == 0 {
            return 1.0;
        }
        let std = (self.m2 / self.count as f64).sqrt();
        if std == 0.0 {
            1.0
        } else {
            std
        }
    }

    /// Get the number of samples seen.
    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Fitted per-channel statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    /// Per-channel means
    pub means: Vec<f64>,
    /// Per-channel standard deviations (never zero)
    pub stds: Vec<f64>,
    /// Number of cells each statistic was computed from
    pub cell_count: u64,
}

impl ChannelStats {
    /// Number of scaled channels.
    pub fn channels(&self) -> usize {
        self.means.len()
    }
}

/// Z-score scaler over the leading channels of `[N, T, F]` tensors.
#[derive(Debug, Clone)]
pub struct ChannelScaler {
    stats: ChannelStats,
}

impl ChannelScaler {
    /// Fit on a (train) tensor, scaling channels `0..min(channels, F)`.
    ///
    /// An empty tensor yields identity statistics (mean 0, std 1).
    pub fn fit(tensor: &Array3<f64>, channels: usize) -> Self {
        let channels = channels.min(tensor.dim().2);
        let mut normalizers = vec![ZScoreNormalizer::new(); channels];

        for sample in tensor.axis_iter(Axis(0)) {
            for row in sample.axis_iter(Axis(0)) {
                for (c, normalizer) in normalizers.iter_mut().enumerate() {
                    normalizer.update(row[c]);
                }
            }
        }

        let cell_count = normalizers.first().map(ZScoreNormalizer::count).unwrap_or(0);
        if cell_count == 0 && channels > 0 {
            log::warn!("Fitting scaler on an empty tensor; using identity statistics");
        }

        let stats = ChannelStats {
            means: normalizers.iter().map(ZScoreNormalizer::mean).collect(),
            stds: normalizers.iter().map(ZScoreNormalizer::std).collect(),
            cell_count,
        };

        log::debug!("Fitted channel stats: means={:?} stds={:?}", stats.means, stats.stds);

        Self { stats }
    }

    /// Rebuild a scaler from previously fitted statistics.
    ///
    /// Zero standard deviations are mapped to one, as in [`ChannelScaler::fit`].
    pub fn from_stats(mut stats: ChannelStats) -> Self {
        for std in stats.stds.iter_mut() {
            if *std == 0.0 {
                *std = 1.0;
            }
        }
        Self { stats }
    }

    /// Fitted statistics.
    pub fn stats(&self) -> &ChannelStats {
        &self.stats
    }

    /// Return a scaled copy of `tensor`.
    pub fn transform(&self, tensor: &Array3<f64>) -> Array3<f64> {
        let mut out = tensor.clone();
        self.transform_inplace(&mut out);
        out
    }

    /// Scale `tensor` in place.
    ///
    /// Channels beyond the fitted count, or beyond the tensor's width, are left alone.
    pub fn transform_inplace(&self, tensor: &mut Array3<f64>) {
        let channels = self.stats.channels().min(tensor.dim().2);
        for c in 0..channels {
            let mean = self.stats.means[c];
            let std = self.stats.stds[c];
            tensor
                .slice_mut(s![.., .., c])
                .mapv_inplace(|x| (x - mean) / std);
        }
    }
}
