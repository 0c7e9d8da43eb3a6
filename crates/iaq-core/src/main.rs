//! iaq-core: train and inspect IAQ forecast models.

use std::path::{Path, PathBuf};
use std::process::ExitCode as ProcessExitCode;

use clap::{Args, Parser, Subcommand};
use iaq_bundle::{artifact_json_schema, read_artifact, ModelArtifact};
use iaq_common::{OutputFormat, Result};
use iaq_config::{resolve_config, ConfigOverrides};
use iaq_core::exit_codes::ExitCode;
use iaq_core::logging::{init_logging, LogFormat};
use iaq_core::pipeline::{self, TrainOutcome};
use iaq_telemetry::{write_dump, BlockLog};
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "iaq-core", version, about = "Train IAQ forecast and hazard models from telemetry")]
struct Cli {
    /// Log line format (stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Default log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load telemetry, fit both models, and write the artifact
    Train(TrainArgs),
    /// Verify an artifact and print its metadata and metrics
    Inspect(InspectArgs),
    /// Print the artifact JSON Schema
    Schema,
    /// Convert a free-text block log into a JSON dump
    ImportLog(ImportLogArgs),
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Config file (TOML, or JSON by extension)
    #[arg(long, env = "IAQ_CONFIG")]
    config: Option<PathBuf>,

    /// Forecast horizon in samples
    #[arg(long, env = "AI_HORIZON_STEPS")]
    horizon_steps: Option<usize>,

    /// Rolling window in samples
    #[arg(long, env = "AI_ROLL")]
    rolling_window: Option<usize>,

    /// IAQ level at or above which a sample is hazardous
    #[arg(long, env = "AI_HAZARD_THRESHOLD")]
    hazard_threshold: Option<f64>,

    /// Nominal sampling interval in seconds (metadata only)
    #[arg(long, env = "AI_SAMPLE_INTERVAL_SEC")]
    sample_interval_sec: Option<u32>,

    /// Fraction of the newest supervised rows held out for evaluation
    #[arg(long)]
    test_fraction: Option<f64>,

    /// CSV or JSON dump to train from instead of the live store
    #[arg(long, env = "AI_CSV_PATH")]
    dump: Option<String>,

    /// Free-text block log to train from
    #[arg(long, env = "AI_LOG_PATH")]
    block_log: Option<String>,

    /// SQLite telemetry database
    #[arg(long, env = "TELEMETRY_DB")]
    store: Option<String>,

    /// Telemetry table name
    #[arg(long, env = "TELEMETRY_TABLE")]
    table: Option<String>,

    /// Artifact destination
    #[arg(long, short = 'o', env = "AI_MODEL_PATH")]
    out: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Artifact to verify
    path: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct ImportLogArgs {
    /// Block log to parse
    log: PathBuf,

    /// JSON dump to write
    #[arg(long, short = 'o')]
    out: PathBuf,
}

/// Machine-readable result of `train`.
#[derive(Serialize)]
struct TrainReport<'a> {
    run_id: &'a str,
    model_path: &'a str,
    counts: &'a pipeline::StageCounts,
    metrics: &'a iaq_bundle::ArtifactMetrics,
}

fn main() -> ProcessExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = ExitCode::for_parse_error(err.kind());
            // help and version go to stdout, rejections to stderr
            let _ = err.print();
            return code.into();
        }
    };
    init_logging(cli.log_format, &cli.log_level);

    let result = match cli.command {
        Command::Train(args) => cmd_train(&args),
        Command::Inspect(args) => cmd_inspect(&args),
        Command::Schema => print_json(&artifact_json_schema()),
        Command::ImportLog(args) => cmd_import_log(&args),
    };

    match result {
        Ok(()) => ExitCode::Ok.into(),
        Err(err) => {
            eprintln!("iaq-core: error[{}]: {err}", err.code());
            ExitCode::for_error(&err).into()
        }
    }
}

fn cmd_train(args: &TrainArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        horizon_steps: args.horizon_steps,
        rolling_window: args.rolling_window,
        hazard_threshold: args.hazard_threshold,
        sample_interval_sec: args.sample_interval_sec,
        test_fraction: args.test_fraction,
        dump_path: args.dump.clone(),
        log_path: args.block_log.clone(),
        store_path: args.store.clone(),
        store_table: args.table.clone(),
        model_path: args.out.clone(),
    };
    let config = resolve_config(args.config.as_deref(), &overrides)?;
    info!(target: "core.cli", source = config.source.kind(), path = config.source.path(), "Starting training run");

    let outcome = pipeline::run(&config)?;
    match args.format {
        OutputFormat::Json => print_json(&TrainReport {
            run_id: &outcome.artifact.meta.run_id.0,
            model_path: &config.model_path,
            counts: &outcome.counts,
            metrics: &outcome.artifact.metrics,
        }),
        OutputFormat::Summary => {
            print_train_summary(&outcome, &config.model_path);
            Ok(())
        }
    }
}

fn cmd_inspect(args: &InspectArgs) -> Result<()> {
    let artifact = read_artifact(&args.path)?;
    match args.format {
        OutputFormat::Json => print_json(&artifact),
        OutputFormat::Summary => {
            print_artifact_summary(&artifact, &args.path);
            Ok(())
        }
    }
}

fn cmd_import_log(args: &ImportLogArgs) -> Result<()> {
    let entries = BlockLog::new(&args.log).entries()?;
    write_dump(&entries, &args.out)?;
    println!("Imported {} entries -> {}", entries.len(), args.out.display());
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn fmt_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "undefined".to_string(), |v| format!("{v:.4}"))
}

fn print_train_summary(outcome: &TrainOutcome, model_path: &str) {
    let c = &outcome.counts;
    let m = &outcome.artifact.metrics;
    println!("Saved model -> {model_path}");
    println!(
        "Rows: {} telemetry, {} features, {} supervised ({} train / {} test)",
        c.telemetry_rows, c.feature_rows, c.supervised_rows, c.train_rows, c.test_rows
    );
    println!(
        "Hazard rows: {} train / {} test",
        c.train_positives, c.test_positives
    );
    println!("IAQ MAE: {}", fmt_metric(m.iaq_mae));
    println!("Hazard AUC: {}", fmt_metric(m.hazard_auc));
    if !m.classifier_converged {
        println!(
            "Warning: classifier stopped after {} iterations without converging",
            m.classifier_iterations
        );
    }
}

fn print_artifact_summary(artifact: &ModelArtifact, path: &Path) {
    let meta = &artifact.meta;
    let m = &artifact.metrics;
    println!("Artifact: {}", path.display());
    println!("Schema version: {}", artifact.schema_version);
    println!("Run: {} (trained {})", meta.run_id, meta.trained_at.to_rfc3339());
    println!(
        "Horizon: {} steps x {}s, window {}, hazard threshold {}",
        meta.horizon_steps, meta.sample_interval_sec, meta.rolling_window, meta.hazard_threshold
    );
    println!("Features: {}", meta.features.join(", "));
    println!("Samples: {} train / {} test", m.train_samples, m.test_samples);
    println!("IAQ MAE: {}", fmt_metric(m.iaq_mae));
    println!("Hazard AUC: {}", fmt_metric(m.hazard_auc));
    println!(
        "Integrity: {} {}",
        artifact.integrity.algorithm, artifact.integrity.digest
    );
}

