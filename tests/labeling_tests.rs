//! Labeling Integration Tests
//!
//! Raw category codes as they appear in recordings, decoded through the
//! dataset path and the standalone helpers.

use skillshot_loader::labeling::{class_indices, one_hot};
use skillshot_loader::{
    decode_labels, parse_str, LabelStats, SkillshotDataset, SkillshotLabel, NUM_CLASSES,
};

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn test_decode_is_bijective_on_known_codes() {
    let raw = [-1, 1, 2, 3, 5, 6, 7];
    let labels = decode_labels(&raw).unwrap();

    let mut indices = class_indices(&labels);
    assert_eq!(indices, vec![3, 0, 1, 2, 4, 5, 6]);

    indices.sort_unstable();
    assert_eq!(indices, (0..NUM_CLASSES).collect::<Vec<_>>());

    for (label, code) in labels.iter().zip(raw) {
        assert_eq!(label.as_raw(), code);
    }
}

#[test]
fn test_only_raw_noise_maps_to_noise_class() {
    for label in SkillshotLabel::ALL {
        assert_eq!(label.is_noise(), label.as_raw() == -1, "{label}");
        assert_eq!(label.is_noise(), label.as_class_index() == 3, "{label}");
    }
}

#[test]
fn test_decode_error_names_sample() {
    let err = decode_labels(&[1, 2, 4, 5]).unwrap_err();
    assert!(err.is_data_integrity());
    let message = err.to_string();
    assert!(message.contains("sample 2"), "{message}");
    assert!(message.contains('4'), "{message}");
}

#[test]
fn test_dataset_labels_match_decode() {
    let text = "p q\n5\n0.1 0.2\n-1\n6\n0.3 0.4\n0.5 0.6\n2\n";
    let parsed = parse_str(text).unwrap();
    let dataset = SkillshotDataset::from_parsed(&parsed).unwrap();

    let expected = decode_labels(&parsed.raw_labels()).unwrap();
    assert_eq!(dataset.labels(), expected.as_slice());
    assert_eq!(dataset.class_indices().to_vec(), vec![4, 3, 5, 1]);
}

// ============================================================================
// One-hot & Statistics
// ============================================================================

#[test]
fn test_one_hot_matches_class_indices() {
    let labels = decode_labels(&[7, -1, 1, -1]).unwrap();
    let encoded = one_hot(&class_indices(&labels), NUM_CLASSES).unwrap();

    assert_eq!(encoded.dim(), (4, NUM_CLASSES));
    for (row, label) in encoded.rows().into_iter().zip(&labels) {
        assert_eq!(row.sum(), 1.0);
        assert_eq!(row[label.as_class_index()], 1.0);
    }
}

#[test]
fn test_one_hot_rejects_out_of_range() {
    assert!(one_hot(&[0, 7], NUM_CLASSES).unwrap_err().is_data_integrity());
}

#[test]
fn test_label_stats_from_dataset() {
    let text = "p q\n-1\n-1\n-1\n1\n7\n7\n";
    let dataset = SkillshotDataset::from_parsed(&parse_str(text).unwrap()).unwrap();
    let stats: LabelStats = dataset.label_stats();

    assert_eq!(stats.total, 6);
    assert_eq!(stats.count(SkillshotLabel::Noise), 3);
    assert_eq!(stats.count(SkillshotLabel::Skillshot7), 2);
    assert_eq!(stats.count(SkillshotLabel::Skillshot3), 0);
    assert!((stats.noise_ratio() - 0.5).abs() < 1e-12);
    assert!(stats.summary().contains("noise=3"), "{}", stats.summary());
}
