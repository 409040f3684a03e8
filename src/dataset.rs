//! Tensor assembly: parsed blocks to a padded design tensor.
//!
//! Every sample becomes one slot of an `[N, T_max, F]` array. Sample `i`
//! occupies rows `0..T_i` of its slot; rows `T_i..T_max` stay zero, so padding
//! is always trailing and never leading.
//!
//! ```text
//! block 0 (T=2)   ──►  slot 0: [x00 x01] [x10 x11]
//! block 1 (T=1)   ──►  slot 1: [x00 x01] [ 0   0 ]
//! block 2 (T=0)   ──►  slot 2: [ 0   0 ] [ 0   0 ]
//! ```
//!
//! Labels are decoded before the tensor is allocated, so an unknown category
//! stops the load before any assembly work happens.

use crate::error::{LoaderError, Result};
use crate::labeling::{self, LabelStats, SkillshotLabel};
use crate::parser::ParsedFile;
use crate::schema::Header;
use ndarray::{s, Array1, Array3, ArrayView2};

/// Builds zero-padded `[N, T_max, F]` tensors from variable-length matrices.
#[derive(Debug, Clone, Copy)]
pub struct TensorAssembler {
    feature_count: usize,
}

impl TensorAssembler {
    /// Create an assembler for `feature_count` columns.
    pub fn new(feature_count: usize) -> Self {
        Self { feature_count }
    }

    /// Assemble matrices in order.
    ///
    /// Returns the tensor and the true length `T_i` of each slot. Fails with
    /// [`LoaderError::DataIntegrity`] if any row is not `feature_count` wide.
    pub fn assemble<'a, I>(&self, matrices: I) -> Result<(Array3<f64>, Vec<usize>)>
    where
        I: IntoIterator<Item = &'a [Vec<f64>]>,
    {
        let matrices: Vec<&[Vec<f64>]> = matrices.into_iter().collect();
        let lengths: Vec<usize> = matrices.iter().map(|m| m.len()).collect();
        let max_timesteps = lengths.iter().copied().max().unwrap_or(0);

        let mut tensor =
            Array3::<f64>::zeros((matrices.len(), max_timesteps, self.feature_count));

        for (i, rows) in matrices.iter().enumerate() {
            for (t, row) in rows.iter().enumerate() {
                if row.len() != self.feature_count {
                    return Err(LoaderError::DataIntegrity(format!(
                        "sample {i}, timestep {t}: row has {} values, expected {}",
                        row.len(),
                        self.feature_count
                    )));
                }
                for (f, &value) in row.iter().enumerate() {
                    tensor[[i, t, f]] = value;
                }
            }
        }

        Ok((tensor, lengths))
    }
}

/// Decoded labels plus the padded design tensor, index-aligned.
///
/// Immutable once built; partitioning and scaling produce new arrays.
#[derive(Debug, Clone)]
pub struct SkillshotDataset {
    header: Header,
    labels: Vec<SkillshotLabel>,
    tensor: Array3<f64>,
    lengths: Vec<usize>,
}

impl SkillshotDataset {
    /// Create a dataset from already-built parts, checking alignment.
    pub fn new(
        header: Header,
        labels: Vec<SkillshotLabel>,
        tensor: Array3<f64>,
        lengths: Vec<usize>,
    ) -> Result<Self> {
        let (n, max_timesteps, features) = tensor.dim();

        if labels.len() != n || lengths.len() != n {
            return Err(LoaderError::DataIntegrity(format!(
                "label count {} / length count {} does not match tensor samples {}",
                labels.len(),
                lengths.len(),
                n
            )));
        }
        if features != header.feature_count() {
            return Err(LoaderError::DataIntegrity(format!(
                "tensor has {features} features, header names {}",
                header.feature_count()
            )));
        }
        if let Some(i) = lengths.iter().position(|&l| l > max_timesteps) {
            return Err(LoaderError::DataIntegrity(format!(
                "sample {i} has length {} beyond T_max {max_timesteps}",
                lengths[i]
            )));
        }

        Ok(Self {
            header,
            labels,
            tensor,
            lengths,
        })
    }

    /// Decode labels and assemble the tensor from a parsed file.
    pub fn from_parsed(parsed: &ParsedFile) -> Result<Self> {
        let labels = labeling::decode_labels(&parsed.raw_labels())?;

        let assembler = TensorAssembler::new(parsed.header.feature_count());
        let (tensor, lengths) =
            assembler.assemble(parsed.blocks.iter().map(|b| b.rows.as_slice()))?;

        if labels.len() != tensor.dim().0 {
            return Err(LoaderError::DataIntegrity(format!(
                "{} labels for {} matrix groups",
                labels.len(),
                tensor.dim().0
            )));
        }

        let dataset = Self::new(parsed.header.clone(), labels, tensor, lengths)?;
        log::info!(
            "Assembled design tensor [{} × {} × {}]",
            dataset.len(),
            dataset.max_timesteps(),
            dataset.feature_count()
        );
        Ok(dataset)
    }

    /// Number of samples `N`.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check whether the dataset has no samples.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Feature dimension `F`.
    pub fn feature_count(&self) -> usize {
        self.tensor.dim().2
    }

    /// `T_max`.
    pub fn max_timesteps(&self) -> usize {
        self.tensor.dim().1
    }

    /// Header the data was read with.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Decoded labels in file order.
    pub fn labels(&self) -> &[SkillshotLabel] {
        &self.labels
    }

    /// Class indices `0..7` in file order.
    pub fn class_indices(&self) -> Array1<usize> {
        Array1::from_vec(labeling::class_indices(&self.labels))
    }

    /// The `[N, T_max, F]` design tensor.
    pub fn tensor(&self) -> &Array3<f64> {
        &self.tensor
    }

    /// True lengths `T_i`.
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Length `T_i` of one sample.
    pub fn sample_length(&self, index: usize) -> Option<usize> {
        self.lengths.get(index).copied()
    }

    /// Full padded slot `[T_max, F]` of one sample.
    pub fn sample(&self, index: usize) -> Option<ArrayView2<'_, f64>> {
        (index < self.len()).then(|| self.tensor.slice(s![index, .., ..]))
    }

    /// Unpadded `[T_i, F]` region of one sample.
    pub fn sequence(&self, index: usize) -> Option<ArrayView2<'_, f64>> {
        let len = self.sample_length(index)?;
        Some(self.tensor.slice(s![index, ..len, ..]))
    }

    /// Per-class counts.
    pub fn label_stats(&self) -> LabelStats {
        LabelStats::from_indices(&labeling::class_indices(&self.labels))
    }

    /// Split into parts.
    pub fn into_parts(self) -> (Header, Vec<SkillshotLabel>, Array3<f64>, Vec<usize>) {
        (self.header, self.labels, self.tensor, self.lengths)
    }
}
