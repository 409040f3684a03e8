//! Label-stratified partitioning.
//!
//! Both splitters group sample indices by class, shuffle each group with a
//! seeded [`ChaCha8Rng`], and deal the group out. Given the same seed and the same
//! labels they always produce the same index sets.
//!
//! # Hold-out split
//!
//! The test partition holds `ceil(N × test_fraction)` samples. Each class gets
//! `floor(n_c × test_fraction)` of them, and the remaining slots go to the
//! classes with the largest fractional remainders (ties to the lower class
//! index). A class never gives up all of its members: at most `n_c - 1` go to
//! test, so every class present in the data is present in train. When those
//! caps make the target unreachable the test set is smaller and a warning is
//! logged. Index sets are returned in ascending order.
//!
//! # K-fold
//!
//! [`StratifiedKFold`] hands each class's shuffled members to folds in
//! round-robin order, continuing the rotation across classes so fold sizes
//! differ by at most one. Every sample lands in exactly one validation fold.

use crate::dataset::SkillshotDataset;
use crate::error::{LoaderError, Result};
use crate::labeling::SkillshotLabel;
use ndarray::{Array3, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Train/test index sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    /// Indices of training samples, ascending
    pub train: Vec<usize>,
    /// Indices of held-out samples, ascending
    pub test: Vec<usize>,
}

/// A subset of a dataset, gathered into its own arrays.
#[derive(Debug, Clone)]
pub struct Partition {
    /// Positions of these samples in the source dataset
    pub indices: Vec<usize>,
    /// Labels, aligned with `tensor`
    pub labels: Vec<SkillshotLabel>,
    /// `[n, T_max, F]` tensor
    pub tensor: Array3<f64>,
    /// True lengths `T_i`
    pub lengths: Vec<usize>,
}

impl Partition {
    /// Gather the given samples out of `dataset`.
    pub fn from_indices(dataset: &SkillshotDataset, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= dataset.len()) {
            return Err(LoaderError::DataIntegrity(format!(
                "partition index {bad} out of range for {} samples",
                dataset.len()
            )));
        }

        let (_, max_timesteps, features) = dataset.tensor().dim();
        let mut tensor = Array3::<f64>::zeros((indices.len(), max_timesteps, features));
        for (slot, mut target) in tensor.axis_iter_mut(Axis(0)).enumerate() {
            target.assign(&dataset.tensor().index_axis(Axis(0), indices[slot]));
        }

        Ok(Self {
            indices: indices.to_vec(),
            labels: indices.iter().map(|&i| dataset.labels()[i]).collect(),
            tensor,
            lengths: indices.iter().map(|&i| dataset.lengths()[i]).collect(),
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check whether the partition has no samples.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Class indices `0..7`.
    pub fn class_indices(&self) -> Vec<usize> {
        crate::labeling::class_indices(&self.labels)
    }
}

fn group_by_class(labels: &[SkillshotLabel]) -> BTreeMap<SkillshotLabel, Vec<usize>> {
    let mut groups: BTreeMap<SkillshotLabel, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        groups.entry(label).or_default().push(i);
    }
    groups
}

/// Seeded, label-stratified train/test splitter.
///
/// # Example
///
/// ```
/// use skillshot_loader::labeling::SkillshotLabel;
/// use skillshot_loader::preprocessing::StratifiedSplitter;
///
/// let labels = vec![SkillshotLabel::Noise; 8];
/// let splitter = StratifiedSplitter::new(0.25, 42).unwrap();
/// let split = splitter.split_indices(&labels);
/// assert_eq!(split.test.len(), 2);
/// assert_eq!(split.train.len(), 6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StratifiedSplitter {
    test_fraction: f64,
    seed: u64,
}

impl StratifiedSplitter {
    /// Create a splitter. `test_fraction` must lie strictly between 0 and 1.
    pub fn new(test_fraction: f64, seed: u64) -> Result<Self> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(LoaderError::Config(format!(
                "test_fraction must be in (0, 1), got {test_fraction}"
            )));
        }
        Ok(Self {
            test_fraction,
            seed,
        })
    }

    /// Held-out fraction.
    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    /// Seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of test samples per class, in class order.
    ///
    /// `class_sizes` must be in the same order as the groups being split.
    pub fn test_quotas(&self, class_sizes: &[usize]) -> Vec<usize> {
        let total: usize = class_sizes.iter().sum();
        let target = (total as f64 * self.test_fraction).ceil() as usize;

        let caps: Vec<usize> = class_sizes.iter().map(|&n| n.saturating_sub(1)).collect();
        let exact: Vec<f64> = class_sizes
            .iter()
            .map(|&n| n as f64 * self.test_fraction)
            .collect();
        let mut quotas: Vec<usize> = exact
            .iter()
            .zip(&caps)
            .map(|(&q, &cap)| (q.floor() as usize).min(cap))
            .collect();

        let mut order: Vec<usize> = (0..class_sizes.len()).collect();
        order.sort_by(|&a, &b| {
            let ra = exact[a] - quotas[a] as f64;
            let rb = exact[b] - quotas[b] as f64;
            rb.total_cmp(&ra).then(a.cmp(&b))
        });

        let mut remaining = target.saturating_sub(quotas.iter().sum());
        while remaining > 0 {
            let mut granted = false;
            for &c in &order {
                if remaining == 0 {
                    break;
                }
                if quotas[c] < caps[c] {
                    quotas[c] += 1;
                    remaining -= 1;
                    granted = true;
                }
            }
            if !granted {
                break;
            }
        }

        if remaining > 0 {
            log::warn!(
                "Test partition short by {remaining}: every class keeps at least one train sample"
            );
        }

        quotas
    }

    /// Compute train/test indices for `labels`.
    pub fn split_indices(&self, labels: &[SkillshotLabel]) -> SplitIndices {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let groups = group_by_class(labels);
        let sizes: Vec<usize> = groups.values().map(Vec::len).collect();
        let quotas = self.test_quotas(&sizes);

        let mut train = Vec::with_capacity(labels.len());
        let mut test = Vec::new();

        for ((_, mut members), n_test) in groups.into_iter().zip(quotas) {
            members.shuffle(&mut rng);
            let (held_out, kept) = members.split_at(n_test);
            test.extend_from_slice(held_out);
            train.extend_from_slice(kept);
        }

        train.sort_unstable();
        test.sort_unstable();

        log::debug!(
            "Stratified split (seed {}): {} train, {} test",
            self.seed,
            train.len(),
            test.len()
        );

        SplitIndices { train, test }
    }

    /// Split a dataset into `(train, test)` partitions.
    pub fn split(&self, dataset: &SkillshotDataset) -> Result<(Partition, Partition)> {
        let indices = self.split_indices(dataset.labels());
        let train = Partition::from_indices(dataset, &indices.train)?;
        let test = Partition::from_indices(dataset, &indices.test)?;
        Ok((train, test))
    }
}

/// Seeded, label-stratified k-fold index generator.
#[derive(Debug, Clone, Copy)]
pub struct StratifiedKFold {
    n_folds: usize,
    seed: u64,
}

impl StratifiedKFold {
    /// Create a generator with at least two folds.
    pub fn new(n_folds: usize, seed: u64) -> Result<Self> {
        if n_folds < 2 {
            return Err(LoaderError::Config(format!(
                "n_folds must be >= 2, got {n_folds}"
            )));
        }
        Ok(Self { n_folds, seed })
    }

    /// Number of folds.
    pub fn n_folds(&self) -> usize {
        self.n_folds
    }

    /// Compute one `(train, validation)` index pair per fold.
    ///
    /// Fails if there are fewer samples than folds.
    pub fn folds(&self, labels: &[SkillshotLabel]) -> Result<Vec<SplitIndices>> {
        if labels.len() < self.n_folds {
            return Err(LoaderError::Config(format!(
                "cannot make {} folds from {} samples",
                self.n_folds,
                labels.len()
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut assignment = vec![0usize; labels.len()];
        let mut next_fold = 0;

        for (_, mut members) in group_by_class(labels) {
            members.shuffle(&mut rng);
            for index in members {
                assignment[index] = next_fold;
                next_fold = (next_fold + 1) % self.n_folds;
            }
        }

        Ok((0..self.n_folds)
            .map(|fold| {
                let (test, train): (Vec<usize>, Vec<usize>) =
                    (0..labels.len()).partition(|&i| assignment[i] == fold);
                SplitIndices { train, test }
            })
            .collect())
    }
}
