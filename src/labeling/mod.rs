//! Skillshot label decoding.
//!
//! Recordings carry raw integer codes. Six of them name a skillshot category and
//! `-1` marks a window in which no skillshot happened (noise). Codes `0` and `4`
//! never occur in the raw data.
//!
//! # Decoding Rule
//!
//! ```text
//! raw == -1  →  4        // noise takes the unused slot 4
//! final      =  raw - 1  // shift to a 0-indexed range
//! ```
//!
//! | raw | final | class |
//! |-----|-------|-------|
//! | 1   | 0     | Skillshot1 |
//! | 2   | 1     | Skillshot2 |
//! | 3   | 2     | Skillshot3 |
//! | -1  | 3     | Noise |
//! | 5   | 4     | Skillshot5 |
//! | 6   | 5     | Skillshot6 |
//! | 7   | 6     | Skillshot7 |
//!
//! Any other raw value is rejected; unknown categories are never coerced.
//!
//! # Example
//!
//! ```
//! use skillshot_loader::labeling::{decode_labels, SkillshotLabel};
//!
//! let labels = decode_labels(&[1, -1, 7]).unwrap();
//! assert_eq!(labels, vec![
//!     SkillshotLabel::Skillshot1,
//!     SkillshotLabel::Noise,
//!     SkillshotLabel::Skillshot7,
//! ]);
//! assert_eq!(labels[1].as_class_index(), 3);
//! ```

use crate::error::{LoaderError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of classes after decoding.
pub const NUM_CLASSES: usize = 7;

/// Raw code marking a window without a skillshot.
pub const RAW_NOISE_CODE: i64 = -1;

/// Decoded skillshot class.
///
/// Discriminants are the final 0-indexed class codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillshotLabel {
    /// Raw code 1
    Skillshot1 = 0,
    /// Raw code 2
    Skillshot2 = 1,
    /// Raw code 3
    Skillshot3 = 2,
    /// Raw code -1: no skillshot detected
    Noise = 3,
    /// Raw code 5
    Skillshot5 = 4,
    /// Raw code 6
    Skillshot6 = 5,
    /// Raw code 7
    Skillshot7 = 6,
}

impl SkillshotLabel {
    /// All classes in class-index order.
    pub const ALL: [SkillshotLabel; NUM_CLASSES] = [
        SkillshotLabel::Skillshot1,
        SkillshotLabel::Skillshot2,
        SkillshotLabel::Skillshot3,
        SkillshotLabel::Noise,
        SkillshotLabel::Skillshot5,
        SkillshotLabel::Skillshot6,
        SkillshotLabel::Skillshot7,
    ];

    /// Decode a raw file code.
    ///
    /// Returns `None` for codes outside {-1, 1, 2, 3, 5, 6, 7}.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            RAW_NOISE_CODE => Some(SkillshotLabel::Noise),
            1 => Some(SkillshotLabel::Skillshot1),
            2 => Some(SkillshotLabel::Skillshot2),
            3 => Some(SkillshotLabel::Skillshot3),
            5 => Some(SkillshotLabel::Skillshot5),
            6 => Some(SkillshotLabel::Skillshot6),
            7 => Some(SkillshotLabel::Skillshot7),
            _ => None,
        }
    }

    /// Raw code as it appears in recordings.
    pub fn as_raw(&self) -> i64 {
        match self {
            SkillshotLabel::Noise => RAW_NOISE_CODE,
            other => other.as_class_index() as i64 + 1,
        }
    }

    /// 0-indexed class code for cross-entropy style targets.
    #[inline]
    pub fn as_class_index(&self) -> usize {
        *self as usize
    }

    /// Create from a 0-indexed class code.
    pub fn from_class_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether this is the noise class.
    #[inline]
    pub fn is_noise(&self) -> bool {
        matches!(self, SkillshotLabel::Noise)
    }

    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            SkillshotLabel::Skillshot1 => "skillshot_1",
            SkillshotLabel::Skillshot2 => "skillshot_2",
            SkillshotLabel::Skillshot3 => "skillshot_3",
            SkillshotLabel::Noise => "noise",
            SkillshotLabel::Skillshot5 => "skillshot_5",
            SkillshotLabel::Skillshot6 => "skillshot_6",
            SkillshotLabel::Skillshot7 => "skillshot_7",
        }
    }
}

impl std::fmt::Display for SkillshotLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Decode a full vector of raw codes.
///
/// Fails with [`LoaderError::DataIntegrity`] on the first unknown code,
/// naming the sample index.
pub fn decode_labels(raw: &[i64]) -> Result<Vec<SkillshotLabel>> {
    raw.iter()
        .enumerate()
        .map(|(i, &code)| {
            SkillshotLabel::from_raw(code).ok_or_else(|| {
                LoaderError::DataIntegrity(format!(
                    "sample {i}: unexpected label category {code} (expected one of -1, 1, 2, 3, 5, 6, 7)"
                ))
            })
        })
        .collect()
}

/// Class indices for a label slice.
pub fn class_indices(labels: &[SkillshotLabel]) -> Vec<usize> {
    labels.iter().map(SkillshotLabel::as_class_index).collect()
}

/// One-hot encode class indices into an `[N, num_classes]` matrix.
///
/// Indices `>= num_classes` are an integrity error.
pub fn one_hot(indices: &[usize], num_classes: usize) -> Result<Array2<f32>> {
    let mut out = Array2::<f32>::zeros((indices.len(), num_classes));
    for (row, &class) in indices.iter().enumerate() {
        if class >= num_classes {
            return Err(LoaderError::DataIntegrity(format!(
                "sample {row}: class index {class} out of range for {num_classes} classes"
            )));
        }
        out[[row, class]] = 1.0;
    }
    Ok(out)
}

/// Per-class counts for a set of labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelStats {
    /// Total number of labels
    pub total: usize,
    /// Count per class index
    pub counts: BTreeMap<usize, usize>,
}

impl LabelStats {
    /// Count class indices.
    pub fn from_indices(indices: &[usize]) -> Self {
        let mut counts = BTreeMap::new();
        for &class in indices {
            *counts.entry(class).or_insert(0) += 1;
        }
        Self {
            total: indices.len(),
            counts,
        }
    }

    /// Count of one class.
    pub fn count(&self, label: SkillshotLabel) -> usize {
        self.counts
            .get(&label.as_class_index())
            .copied()
            .unwrap_or(0)
    }

    /// Share of one class in `[0, 1]`; 0 for an empty set.
    pub fn proportion(&self, label: SkillshotLabel) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(label) as f64 / self.total as f64
    }

    /// Share of the noise class.
    pub fn noise_ratio(&self) -> f64 {
        self.proportion(SkillshotLabel::Noise)
    }

    /// Compact `name=count` summary for logging.
    pub fn summary(&self) -> String {
        SkillshotLabel::ALL
            .iter()
            .map(|l| format!("{}={}", l.name(), self.count(*l)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_table() {
        let table = [(-1, 3), (1, 0), (2, 1), (3, 2), (5, 4), (6, 5), (7, 6)];
        for (raw, expected) in table {
            let label = SkillshotLabel::from_raw(raw).unwrap();
            assert_eq!(label.as_class_index(), expected, "raw {raw}");
            assert_eq!(label.as_raw(), raw);
        }
    }

    #[test]
    fn test_unknown_codes_rejected() {
        for raw in [0, 4, 8, -2, i64::MIN, i64::MAX] {
            assert_eq!(SkillshotLabel::from_raw(raw), None, "raw {raw}");
        }
    }

    #[test]
    fn test_final_codes_distinct_and_contiguous() {
        let mut codes: Vec<usize> = [-1, 1, 2, 3, 5, 6, 7]
            .iter()
            .map(|&r| SkillshotLabel::from_raw(r).unwrap().as_class_index())
            .collect();
        codes.sort_unstable();
        assert_eq!(codes, (0..NUM_CLASSES).collect::<Vec<_>>());
    }

    #[test]
    fn test_noise_class() {
        let noise = SkillshotLabel::from_raw(-1).unwrap();
        assert!(noise.is_noise());
        assert_eq!(noise.as_class_index(), 3);
        assert!(!SkillshotLabel::Skillshot1.is_noise());
    }

    #[test]
    fn test_decode_labels_reports_index() {
        let err = decode_labels(&[1, 2, 4, 5]).unwrap_err();
        assert!(err.is_data_integrity());
        let msg = err.to_string();
        assert!(msg.contains("sample 2"));
        assert!(msg.contains("4"));
    }

    #[test]
    fn test_one_hot() {
        let encoded = one_hot(&[0, 3, 6], NUM_CLASSES).unwrap();
        assert_eq!(encoded.shape(), &[3, 7]);
        assert_eq!(encoded[[1, 3]], 1.0);
        assert_eq!(encoded.row(2).sum(), 1.0);
        assert!(one_hot(&[7], NUM_CLASSES).is_err());
    }

    #[test]
    fn test_label_stats() {
        let stats = LabelStats::from_indices(&[3, 3, 0, 6]);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.count(SkillshotLabel::Noise), 2);
        assert!((stats.noise_ratio() - 0.5).abs() < 1e-12);
        assert_eq!(stats.count(SkillshotLabel::Skillshot5), 0);
        assert!(stats.summary().contains("noise=2"));
        assert_eq!(LabelStats::default().proportion(SkillshotLabel::Noise), 0.0);
    }
}
