//! Pipeline Integration Tests
//!
//! Split and scaling hygiene: determinism under a fixed seed, per-class
//! proportions, train-only statistics, and the leading-channel-only scaling
//! rule.

use skillshot_loader::{
    parse_str, ChannelScaler, LabelStats, Pipeline, PipelineBuilder, PipelineConfig,
    SkillshotDataset, SkillshotLabel, StratifiedSplitter,
};

const RAW_CODES: [i64; 7] = [-1, 1, 2, 3, 5, 6, 7];

/// Recording with 9 channels: 7 continuous, 1 constant, 1 binary flag.
///
/// `per_class[k]` blocks are written for `RAW_CODES[k]`, interleaved so that
/// classes are not contiguous in the file.
fn recording(per_class: [usize; 7]) -> String {
    let mut text = String::from("x y z vx vy vz speed flag_const flag_bin\n");
    let max = per_class.iter().copied().max().unwrap_or(0);
    let mut sample = 0usize;
    for round in 0..max {
        for (k, &count) in per_class.iter().enumerate() {
            if round >= count {
                continue;
            }
            text.push_str(&format!("{}\n", RAW_CODES[k]));
            for t in 0..(1 + sample % 4) {
                let base = (sample * 13 + t * 3) as f64 / 7.0;
                let mut row: Vec<String> = (0..7)
                    .map(|c| format!("{:.6}", base * (c + 1) as f64))
                    .collect();
                row.push("1".to_string());
                row.push(if (sample + t) % 2 == 0 { "1" } else { "0" }.to_string());
                text.push_str(&row.join(" "));
                text.push('\n');
            }
            sample += 1;
        }
    }
    text
}

fn dataset(per_class: [usize; 7]) -> SkillshotDataset {
    SkillshotDataset::from_parsed(&parse_str(&recording(per_class)).unwrap()).unwrap()
}

// ============================================================================
// Split Determinism & Stratification
// ============================================================================

#[test]
fn test_same_seed_same_partition() {
    let text = recording([20, 12, 12, 12, 8, 8, 4]);
    let config = PipelineConfig::default();

    let a = Pipeline::from_config(config.clone()).unwrap().process_str(&text).unwrap();
    let b = Pipeline::from_config(config).unwrap().process_str(&text).unwrap();

    assert_eq!(a.train.indices, b.train.indices);
    assert_eq!(a.test.indices, b.test.indices);
    assert_eq!(a.stats, b.stats);
    assert_eq!(a.train.tensor, b.train.tensor);
}

#[test]
fn test_different_seed_changes_partition() {
    let data = dataset([40, 40, 40, 40, 40, 40, 40]);
    let a = StratifiedSplitter::new(0.25, 1).unwrap().split_indices(data.labels());
    let b = StratifiedSplitter::new(0.25, 2).unwrap().split_indices(data.labels());
    assert_ne!(a.test, b.test);
    assert_eq!(a.test.len(), b.test.len());
}

#[test]
fn test_class_proportions_preserved() {
    let output = PipelineBuilder::new()
        .seed(11)
        .build()
        .unwrap()
        .process_str(&recording([80, 40, 20, 20, 12, 8, 4]))
        .unwrap();

    let train = output.train_label_stats();
    let test = output.test_label_stats();
    let expected_test = [
        (SkillshotLabel::Noise, 20),
        (SkillshotLabel::Skillshot1, 10),
        (SkillshotLabel::Skillshot2, 5),
        (SkillshotLabel::Skillshot7, 1),
    ];
    for (label, n) in expected_test {
        assert_eq!(test.count(label), n, "{label}");
    }
    assert_eq!(test.total, 46);
    assert_eq!(train.count(SkillshotLabel::Noise), 60);
    assert!((train.noise_ratio() - test.noise_ratio()).abs() < 0.05);
}

#[test]
fn test_tiny_classes_split() {
    let output = Pipeline::from_config(PipelineConfig::default())
        .unwrap()
        .process_str(&recording([1, 2, 2, 2, 2, 1, 2]))
        .unwrap();

    // ceil(12 × 0.25) = 3, singletons stay in train
    assert_eq!(output.test.len(), 3);
    let train = output.train_label_stats();
    for label in SkillshotLabel::ALL {
        assert!(train.count(label) >= 1, "{label} missing from train");
    }
}

#[test]
fn test_partitions_are_aligned_copies() {
    let data = dataset([8, 8, 8, 8, 8, 8, 8]);
    let (train, test) = StratifiedSplitter::new(0.25, 5).unwrap().split(&data).unwrap();

    for part in [&train, &test] {
        assert_eq!(part.labels.len(), part.tensor.dim().0);
        assert_eq!(part.lengths.len(), part.len());
        for (slot, &i) in part.indices.iter().enumerate() {
            assert_eq!(part.labels[slot], data.labels()[i]);
            assert_eq!(part.lengths[slot], data.lengths()[i]);
            assert_eq!(
                part.tensor.index_axis(ndarray::Axis(0), slot),
                data.sample(i).unwrap()
            );
        }
    }
}

// ============================================================================
// Scaling Hygiene
// ============================================================================

#[test]
fn test_statistics_come_from_train_only() {
    let text = recording([12, 12, 12, 12, 12, 12, 12]);
    let output = Pipeline::from_config(PipelineConfig::default())
        .unwrap()
        .process_str(&text)
        .unwrap();

    let data = &output.dataset;
    let train_raw = skillshot_loader::Partition::from_indices(data, &output.train.indices).unwrap();
    let all_raw = skillshot_loader::Partition::from_indices(data, &(0..data.len()).collect::<Vec<_>>()).unwrap();

    let from_train = ChannelScaler::fit(&train_raw.tensor, 7);
    let from_all = ChannelScaler::fit(&all_raw.tensor, 7);

    assert_eq!(output.stats.as_ref(), Some(from_train.stats()));
    assert_ne!(output.stats.as_ref(), Some(from_all.stats()));

    let test_raw = skillshot_loader::Partition::from_indices(data, &output.test.indices).unwrap();
    assert_eq!(output.test.tensor, from_train.transform(&test_raw.tensor));
}

#[test]
fn test_trailing_channels_unscaled() {
    let output = Pipeline::from_config(PipelineConfig::default())
        .unwrap()
        .process_str(&recording([6, 6, 6, 6, 6, 6, 6]))
        .unwrap();

    let stats = output.stats.as_ref().unwrap();
    assert_eq!(stats.channels(), 7);

    for (slot, &i) in output.train.indices.iter().enumerate() {
        for t in 0..output.dataset.max_timesteps() {
            for c in 7..9 {
                assert_eq!(
                    output.train.tensor[[slot, t, c]],
                    output.dataset.tensor()[[i, t, c]]
                );
            }
        }
    }
}

#[test]
fn test_constant_channel_has_unit_sd() {
    // equal-length blocks, so no padding cells disturb the constant channel
    let mut text = String::from("a b c\n");
    for s in 0..8 {
        text.push_str(if s % 2 == 0 { "1\n" } else { "-1\n" });
        text.push_str(&format!("2.0 {}.0 0\n2.0 {}.5 1\n", s, s));
    }
    let output = PipelineBuilder::new()
        .test_fraction(0.25)
        .build()
        .unwrap()
        .process_str(&text)
        .unwrap();

    assert_eq!(output.train.len(), 6);
    let stats = output.stats.unwrap();
    assert_eq!(stats.channels(), 3);
    assert_eq!(stats.means[0], 2.0);
    assert_eq!(stats.stds[0], 1.0);
    assert!(output.train.tensor.iter().all(|v| v.is_finite()));
    assert!(output.test.tensor.iter().all(|v| v.is_finite()));
    assert!(output
        .train
        .tensor
        .slice(ndarray::s![.., .., 0])
        .iter()
        .all(|&v| v == 0.0));
}

#[test]
fn test_normalization_disabled() {
    let output = PipelineBuilder::new()
        .without_normalization()
        .build()
        .unwrap()
        .process_str(&recording([4, 4, 4, 4, 4, 4, 4]))
        .unwrap();

    assert!(output.stats.is_none());
    let raw = skillshot_loader::Partition::from_indices(&output.dataset, &output.train.indices).unwrap();
    assert_eq!(output.train.tensor, raw.tensor);
}

#[test]
fn test_cv_folds_cover_train() {
    let output = PipelineBuilder::new()
        .cv_folds(4)
        .build()
        .unwrap()
        .process_str(&recording([12, 12, 12, 12, 12, 12, 12]))
        .unwrap();

    let folds = output.cv_folds.as_ref().unwrap();
    assert_eq!(folds.len(), 4);

    let mut seen: Vec<usize> = folds.iter().flat_map(|f| f.test.iter().copied()).collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..output.train.len()).collect::<Vec<_>>());
    for fold in folds {
        assert_eq!(fold.train.len() + fold.test.len(), output.train.len());
    }
}

#[test]
fn test_config_file_drives_pipeline() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("run.toml");
    std::fs::write(
        &path,
        "[split]\ntest_fraction = 0.5\nseed = 3\n\n[normalization]\nscaled_channels = 2\n",
    )
    .unwrap();

    let config = PipelineConfig::load(&path).unwrap();
    let output = Pipeline::from_config(config)
        .unwrap()
        .process_str(&recording([4, 4, 4, 4, 4, 4, 4]))
        .unwrap();

    assert_eq!(output.test.len(), 14);
    assert_eq!(output.stats.unwrap().channels(), 2);
}

#[test]
fn test_label_stats_sum() {
    let output = Pipeline::from_config(PipelineConfig::default())
        .unwrap()
        .process_str(&recording([5, 4, 3, 10, 3, 2, 1]))
        .unwrap();
    let total: LabelStats = output.label_stats();
    assert_eq!(total.total, 28);
    assert_eq!(
        output.train_label_stats().total + output.test_label_stats().total,
        total.total
    );
}
