//! Skillshot Dataset Preparation Tool
//!
//! Loads a skillshot recording, builds the padded design tensor, performs the
//! stratified train/test split and channel scaling, and logs a summary of
//! everything a downstream classifier will receive.
//!
//! # Usage
//!
//! ```bash
//! # Default settings (25% held out, seed 42, first 7 channels scaled)
//! RUST_LOG=info cargo run --release --bin prepare_dataset -- data/skillshots.txt
//!
//! # With a config file
//! cargo run --release --bin prepare_dataset -- data/skillshots.txt --config run.toml
//!
//! # Write a sample config
//! cargo run --release --bin prepare_dataset -- --generate-config run.toml
//! ```

use skillshot_loader::{
    ExperimentMetadata, LoaderError, Pipeline, PipelineConfig, PipelineOutput, SkillshotLabel,
};
use std::path::Path;

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program = program_name(&args);

    if args.len() < 2 {
        print_usage(program);
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "--help" | "-h" => {
            print_usage(program);
            Ok(())
        }
        "--generate-config" => match args.get(2) {
            Some(path) => generate_sample_config(path),
            None => {
                eprintln!("Error: --generate-config requires a path argument");
                std::process::exit(1);
            }
        },
        data_path => {
            let config = match (args.get(2).map(String::as_str), args.get(3)) {
                (None, _) => Ok(PipelineConfig::default()),
                (Some("--config"), Some(path)) => PipelineConfig::load(path),
                _ => {
                    print_usage(program);
                    std::process::exit(1);
                }
            };
            config.and_then(|config| run(data_path, config))
        }
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn program_name(args: &[String]) -> &str {
    args.first().map_or("prepare_dataset", String::as_str)
}

fn print_usage(program: &str) {
    eprintln!(
        r#"
Skillshot Dataset Preparation Tool

Usage:
    {program} <data-file>                        Prepare with default settings
    {program} <data-file> --config <cfg>         Prepare with a .toml/.json config
    {program} --generate-config <path>           Write a sample config file
    {program} --help                             Show this help
"#
    );
}

fn generate_sample_config(path: &str) -> Result<(), LoaderError> {
    let config = PipelineConfig::default().with_metadata(ExperimentMetadata {
        name: "skillshot-baseline".to_string(),
        description: Some("Stratified 75/25 split, first 7 channels scaled".to_string()),
        created_at: None,
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        tags: Some(vec!["lstm".to_string()]),
    });

    if path.ends_with(".json") {
        config.save_json(path)?;
    } else {
        config.save_toml(path)?;
    }
    log::info!("Wrote sample config to {path}");
    Ok(())
}

fn run(data_path: &str, config: PipelineConfig) -> Result<(), LoaderError> {
    if let Some(meta) = &config.metadata {
        log::info!("Experiment: {}", meta.name);
    }

    let pipeline = Pipeline::from_config(config)?;
    let output = pipeline.process(Path::new(data_path))?;
    report(&output);
    Ok(())
}

fn report(output: &PipelineOutput) {
    let dataset = &output.dataset;
    log::info!(
        "Design tensor: [{} × {} × {}]",
        dataset.len(),
        dataset.max_timesteps(),
        dataset.feature_count()
    );
    log::info!("Features: {}", dataset.header().names().join(", "));

    let all = output.label_stats();
    let train = output.train_label_stats();
    let test = output.test_label_stats();
    for label in SkillshotLabel::ALL {
        log::info!(
            "  class {} {:<12} total {:>5}  train {:>5}  test {:>5}",
            label.as_class_index(),
            label.name(),
            all.count(label),
            train.count(label),
            test.count(label)
        );
    }

    if let Some(stats) = &output.stats {
        let names = dataset.header().scaled_names(stats.channels());
        for (c, name) in names.iter().enumerate() {
            log::info!(
                "  scale {:<16} mean {:>12.6}  sd {:>12.6}",
                name,
                stats.means[c],
                stats.stds[c]
            );
        }
    }

    if let Some(folds) = &output.cv_folds {
        let sizes: Vec<usize> = folds.iter().map(|f| f.test.len()).collect();
        log::info!("CV folds over train partition: {sizes:?}");
    }

    for warning in output.validation.warnings() {
        log::warn!("{warning}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name_without_argv() {
        assert_eq!(program_name(&[]), "prepare_dataset");
        assert_eq!(program_name(&["bin/prep".to_string()]), "bin/prep");
    }
}
