//! CLI entry: wires the full pipeline end to end.
//!
//! load → split → train → evaluate → publish, with sequential status
//! messages. Store degradation never fails the run; only data errors
//! (splitter/trainer/evaluator) produce a non-zero exit.

mod logging;

pub use logging::{log, LogLevel};

use crate::config::PublishConfig;
use crate::data::{train_test_split, Dataset};
use crate::eval::evaluate;
use crate::publish::{PublishOutcome, Publisher};
use crate::storage::{LocalStore, ObjectStore};
use crate::train::{ForestParams, RandomForestClassifier};
use crate::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// Train a classifier on the built-in dataset and publish it as a
/// versioned artifact.
#[derive(Parser, Debug)]
#[command(name = "publicar", version, about)]
pub struct Cli {
    /// Target bucket name; overrides PUBLICAR_BUCKET. Absent = local-only.
    #[arg(long)]
    pub bucket: Option<String>,

    /// Directory backing the object store; buckets live beneath it.
    #[arg(long, default_value = ".publicar_store")]
    pub store_dir: PathBuf,

    /// Local fallback model file.
    #[arg(long, default_value = "model.json")]
    pub output: PathBuf,

    /// Ensemble size.
    #[arg(long, default_value_t = 100)]
    pub trees: usize,

    /// Random seed for splitting and training.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fraction of samples held out for evaluation.
    #[arg(long, default_value_t = 0.2)]
    pub ratio: f64,

    /// Suppress status output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Print additional detail (confusion matrix).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the train-evaluate-publish pipeline.
pub fn run_command(cli: Cli) -> Result<()> {
    let level = LogLevel::from_flags(cli.quiet, cli.verbose);
    log(level, LogLevel::Normal, "Starting pipeline...");

    log(level, LogLevel::Normal, "Loading Iris data...");
    let dataset = Dataset::iris();

    log(level, LogLevel::Normal, "Preprocessing data...");
    let split = train_test_split(&dataset, cli.ratio, cli.seed)?;

    log(level, LogLevel::Normal, "Training model...");
    let params = ForestParams::default()
        .with_n_trees(cli.trees)
        .with_seed(cli.seed);
    let model = RandomForestClassifier::fit(&split.train, &params)?;

    log(level, LogLevel::Normal, "Evaluating model...");
    let evaluation = evaluate(&model, &split.eval)?;
    log(
        level,
        LogLevel::Normal,
        &format!("Accuracy: {}", evaluation.accuracy),
    );
    log(
        level,
        LogLevel::Verbose,
        &evaluation.confusion.to_string(),
    );

    let mut config = PublishConfig::from_env().with_local_model_path(cli.output.clone());
    if let Some(bucket) = &cli.bucket {
        config = config.with_bucket(bucket);
    }

    let publisher = match &config.bucket {
        Some(bucket) => {
            let store = LocalStore::new_and_init(cli.store_dir.join(bucket))?;
            Publisher::new(config)
                .with_store(Arc::new(store) as Arc<dyn ObjectStore>)
                .with_log_level(level)
        }
        None => Publisher::new(config).with_log_level(level),
    };

    match publisher.run_publish_cycle(&model)? {
        PublishOutcome::Published { record } => {
            log(
                level,
                LogLevel::Normal,
                &format!("Published version {} at {}", record.version, record.key),
            );
        }
        PublishOutcome::LocalOnly { path } => {
            log(
                level,
                LogLevel::Normal,
                &format!("Model saved to {}", path.display()),
            );
        }
        PublishOutcome::Degraded { version, reason } => {
            log(
                level,
                LogLevel::Normal,
                &format!("Publish degraded at version {version}: {reason}"),
            );
        }
    }
    Ok(())
}
