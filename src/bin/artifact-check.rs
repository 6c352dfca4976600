//! # Artifact Check
//!
//! Offline tool for checking a model artifact before it is deployed:
//! the artifact must load, its feature order must match the request schema,
//! and it must score the reference record. Optionally scores a JSON-lines
//! file of records through the same validation the server applies.
//!
//! ```bash
//! artifact-check validate --artifact models/model.json
//! artifact-check score --artifact models/model.json records.jsonl
//! artifact-check config --environment production
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use heart_risk::config::ConfigManager;
use heart_risk::constants::FEATURE_ORDER;
use heart_risk::inference::{
    load_model, reference_record, InferenceService, LoadedModel, ModelArtifact,
};
use heart_risk::validation::RequestValidator;

#[derive(Parser)]
#[command(name = "artifact-check")]
#[command(about = "Validate heart-risk model artifacts and score sample records")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Model artifact path (default: models/model.json)
    #[arg(short, long, global = true, default_value = "models/model.json")]
    artifact: PathBuf,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the artifact and score the reference record
    Validate,

    /// Score every record of a JSON-lines file
    Score {
        /// File with one JSON object per line
        records: PathBuf,

        /// Reject values outside the documented clinical ranges
        #[arg(long)]
        enforce_domain_ranges: bool,
    },

    /// Load and validate the service configuration
    Config {
        /// Environment to validate (development, test, production)
        #[arg(short, long, default_value = "development")]
        environment: String,

        /// Configuration directory path (default: config)
        #[arg(short, long)]
        config_dir: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let _ = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .try_init();

    let result = match &cli.command {
        Some(Commands::Validate) | None => validate_artifact(&cli.artifact),
        Some(Commands::Score {
            records,
            enforce_domain_ranges,
        }) => score_records(&cli.artifact, records, *enforce_domain_ranges),
        Some(Commands::Config {
            environment,
            config_dir,
        }) => validate_config(environment, config_dir.clone()),
    };

    if let Err(e) = result {
        error!("Artifact check failed: {:#}", e);
        eprintln!("❌ {e:#}");
        process::exit(1);
    }
}

fn load(artifact: &Path) -> anyhow::Result<LoadedModel> {
    load_model(artifact)
        .with_context(|| format!("Failed to load artifact {}", artifact.display()))
}

fn validate_artifact(artifact: &Path) -> anyhow::Result<()> {
    println!("🔧 Validating model artifact: {}", artifact.display());

    let parsed = ModelArtifact::from_path(artifact)
        .with_context(|| format!("Failed to read artifact {}", artifact.display()))?;
    println!(
        "✅ Artifact parsed: {} version {}",
        parsed.model_type, parsed.version
    );
    if let Some(trained_at) = &parsed.trained_at {
        println!("   Trained at: {trained_at}");
    }

    parsed.verify_feature_order()?;
    println!("✅ Feature order matches the request schema");

    let classifier = parsed.build_classifier()?;
    println!("   Intercept: {:+.4}", classifier.intercept());
    for (name, weight) in FEATURE_ORDER.iter().zip(classifier.coefficients()) {
        println!("   {name:<10} {weight:+.4}");
    }

    let service = InferenceService::new(Arc::new(classifier));
    let result = service
        .predict(&reference_record())
        .context("Reference record could not be scored")?;
    println!(
        "✅ Reference record scored: {} (p = {:.4})",
        result.predicted_class, result.probability
    );

    println!("\n🎉 Artifact is ready to serve");
    Ok(())
}

fn score_records(
    artifact: &Path,
    records: &Path,
    enforce_domain_ranges: bool,
) -> anyhow::Result<()> {
    let model = load(artifact)?;
    let service = InferenceService::new(model.classifier);
    let validator = RequestValidator::new(enforce_domain_ranges);

    let file = File::open(records)
        .with_context(|| format!("Failed to open records file {}", records.display()))?;

    let mut scored = 0usize;
    let mut rejected = 0usize;

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let record = match validator.validate_bytes(line.as_bytes()) {
            Ok(record) => record,
            Err(e) => {
                rejected += 1;
                println!("line {}: rejected ({e})", index + 1);
                continue;
            }
        };

        let result = service
            .predict(&record)
            .with_context(|| format!("Model failed on line {}", index + 1))?;
        scored += 1;
        println!(
            "line {}: {} (p = {:.4})",
            index + 1,
            result.predicted_class,
            result.probability
        );
    }

    println!("\nScored {scored} record(s), rejected {rejected}");
    if rejected > 0 {
        bail!("{rejected} record(s) failed validation");
    }
    Ok(())
}

fn validate_config(environment: &str, config_dir: Option<PathBuf>) -> anyhow::Result<()> {
    println!("🔧 Validating configuration for environment: {environment}");

    let manager = ConfigManager::load_from_directory_with_env(config_dir, environment)
        .context("Configuration is invalid")?;

    match manager.config_file() {
        Some(path) => println!("✅ Loaded {}", path.display()),
        None => println!("⚠️  No configuration file found, built-in defaults apply"),
    }

    let rendered = serde_yaml::to_string(manager.config())
        .context("Failed to render configuration")?;
    println!("{rendered}");
    Ok(())
}
