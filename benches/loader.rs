//! Benchmark suite for loading.
//!
//! Run with: `cargo bench`
//!
//! Measures:
//! - Block parsing throughput
//! - Tensor assembly
//! - Split + scaling

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use skillshot_loader::{
    parse_str, ChannelScaler, SkillshotDataset, StratifiedSplitter, DEFAULT_SCALED_CHANNELS,
};

const RAW_CODES: [i64; 7] = [-1, 1, 2, 3, 5, 6, 7];

/// Synthetic recording: `samples` blocks of 20-60 rows with 12 channels.
fn synthetic_recording(samples: usize) -> String {
    let mut text = String::from("x y z vx vy vz boost jump dodge throttle steer handbrake\n");
    for s in 0..samples {
        text.push_str(&format!("{}\n", RAW_CODES[s % RAW_CODES.len()]));
        for t in 0..(20 + (s * 7) % 41) {
            let base = (s * 31 + t) as f64 * 0.01;
            for c in 0..12 {
                if c > 0 {
                    text.push(' ');
                }
                if c < 7 {
                    text.push_str(&format!("{:.4}", base + c as f64));
                } else {
                    text.push_str(if (s + t + c) % 2 == 0 { "1" } else { "0" });
                }
            }
            text.push('\n');
        }
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for samples in [100, 1000] {
        let text = synthetic_recording(samples);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(samples), &text, |b, text| {
            b.iter(|| parse_str(black_box(text)).unwrap())
        });
    }
    group.finish();
}

fn bench_assemble(c: &mut Criterion) {
    let parsed = parse_str(&synthetic_recording(1000)).unwrap();
    c.bench_function("assemble_1000", |b| {
        b.iter(|| SkillshotDataset::from_parsed(black_box(&parsed)).unwrap())
    });
}

fn bench_split_and_scale(c: &mut Criterion) {
    let parsed = parse_str(&synthetic_recording(1000)).unwrap();
    let dataset = SkillshotDataset::from_parsed(&parsed).unwrap();
    let splitter = StratifiedSplitter::new(0.25, 42).unwrap();

    c.bench_function("split_and_scale_1000", |b| {
        b.iter(|| {
            let (train, test) = splitter.split(black_box(&dataset)).unwrap();
            let scaler = ChannelScaler::fit(&train.tensor, DEFAULT_SCALED_CHANNELS);
            (scaler.transform(&train.tensor), scaler.transform(&test.tensor))
        })
    });
}

criterion_group!(benches, bench_parse, bench_assemble, bench_split_and_scale);
criterion_main!(benches);
