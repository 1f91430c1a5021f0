//! axolotl-measure CLI: measure axolotls from pose-model keypoints.
//!
//! stdout carries exactly one JSON array; everything else goes to stderr.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use axolotl_measure::config::config::MeasureConfig;
use axolotl_measure::error::InvocationError;
use axolotl_measure::modules::command_detector::CommandDetector;
use axolotl_measure::modules::detector::Detector;
use axolotl_measure::modules::precomputed_detector::PrecomputedDetector;
use axolotl_measure::pipeline::pipeline::MeasurementPipeline;
use axolotl_measure::pipeline::result::emit;
use axolotl_measure::utils::image::collect_images;
use axolotl_measure::utils::model::{list_models, resolve_model};

#[derive(Parser)]
#[command(name = "axolotl-measure")]
#[command(about = "Turn pose-model keypoints into axolotl body measurements")]
#[command(version)]
struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding model weight files (overrides the config).
    #[arg(long, global = true)]
    models_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect and measure every image, printing one JSON array on stdout.
    Process(ProcessArgs),

    /// List the available models as a JSON array.
    Models,
}

#[derive(Debug, Clone, Args)]
struct ProcessArgs {
    /// Image files to process, in output order.
    images: Vec<PathBuf>,

    /// Folder whose image files are processed after the explicit ones.
    #[arg(long)]
    folder: Vec<PathBuf>,

    /// Model file name inside the models directory.
    #[arg(long)]
    model: Option<String>,

    /// Replay detections from a JSON file instead of running the detector.
    #[arg(long, conflicts_with = "model")]
    detections: Option<PathBuf>,

    /// Detector confidence threshold in [0, 1].
    #[arg(long, value_parser = parse_confidence)]
    conf: Option<f32>,

    /// Maximum number of images processed at once.
    #[arg(long)]
    concurrency: Option<usize>,
}

fn parse_confidence(raw: &str) -> Result<f32, String> {
    let value: f32 = raw.parse().map_err(|e| format!("{e}"))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("{value} is outside [0, 1]"));
    }
    Ok(value)
}

fn load_config(cli: &Cli) -> Result<MeasureConfig> {
    let mut config = match &cli.config {
        Some(path) => MeasureConfig::from_file(path)?,
        None => MeasureConfig::new(),
    };
    if let Some(dir) = &cli.models_dir {
        config.models_dir = dir.clone();
    }
    Ok(config)
}

fn build_detector(args: &ProcessArgs, config: &MeasureConfig) -> Result<Arc<dyn Detector>> {
    if let Some(path) = &args.detections {
        return Ok(Arc::new(PrecomputedDetector::from_file(path)?));
    }

    let name = args
        .model
        .clone()
        .or_else(|| config.default_model.clone())
        .ok_or(InvocationError::NoModelSelected)?;
    let model_path = resolve_model(&config.models_dir, &name)?;
    tracing::info!("using model {}", model_path.display());

    let mut detector_config = config.detector.clone();
    if let Some(conf) = args.conf {
        detector_config.confidence = conf;
    }
    Ok(Arc::new(CommandDetector::new(detector_config, model_path)))
}

fn write_stdout(payload: &[u8]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    lock.write_all(payload)?;
    lock.flush()?;
    Ok(())
}

async fn run_process(args: &ProcessArgs, config: &MeasureConfig) -> Result<()> {
    let images = collect_images(&args.images, &args.folder, &config.image_extensions)?;
    let detector = build_detector(args, config)?;
    let workers = args.concurrency.unwrap_or_else(|| config.workers());

    let pipeline = MeasurementPipeline::new(detector, workers);
    let outcome = pipeline.run(&images).await;

    let mut payload: Vec<u8> = Vec::new();
    emit(&outcome.results, &mut payload).context("failed to serialize results")?;
    write_stdout(&payload)
}

fn run_models(models_dir: &Path, config: &MeasureConfig) -> Result<()> {
    let models = list_models(models_dir, &config.model_extensions)?;
    tracing::info!("{} models in {}", models.len(), models_dir.display());
    let mut payload = serde_json::to_string(&models)?;
    payload.push('\n');
    write_stdout(payload.as_bytes())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Process(args) => run_process(args, &config).await,
        Commands::Models => run_models(&config.models_dir, &config),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use crate::{Cli, Commands};

    fn parse_conf(conf: &str) -> Result<Option<f32>, clap::Error> {
        let cli = Cli::try_parse_from(["axolotl-measure", "process", "--conf", conf, "a.jpg"])?;
        match cli.command {
            Commands::Process(args) => Ok(args.conf),
            Commands::Models => unreachable!(),
        }
    }

    #[test]
    fn test_conf_accepts_unit_range() {
        assert_eq!(parse_conf("0.25").unwrap(), Some(0.25));
        assert_eq!(parse_conf("0").unwrap(), Some(0.0));
        assert_eq!(parse_conf("1").unwrap(), Some(1.0));
    }

    #[test]
    fn test_conf_rejects_out_of_range() {
        for bad in ["1.5", "-0.1", "NaN", "abc"] {
            assert!(parse_conf(bad).is_err(), "{bad} should be rejected");
        }
    }
}
