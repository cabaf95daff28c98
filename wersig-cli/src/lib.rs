#![warn(missing_docs)]
//! WerSig CLI Library
//!
//! Command-line front end for the bootstrap significance test: reads the
//! evaluation files, layers `wersig.toml` and flags into a test
//! configuration, runs the engine and renders the report.
//!
//! # Example
//!
//! ```text
//! wersig --total-batch 10000 --samples-per-batch 40 annotated wer_file.txt
//! wersig --sep ',' --sep-b '|' paired model_a.txt model_b.txt
//! ```

mod config;
mod formatting;
mod input;

pub use config::*;
pub use formatting::format_human_output;
pub use input::{
    DEFAULT_DELIMITER, InputError, PAIRED_DELIMITER, parse_annotated, parse_model_counts,
    read_annotated, read_paired,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::ThreadPoolBuilder;
use std::io::Write;
use std::path::PathBuf;
use wersig_report::{
    OutputFormat, Report, ReportMeta, generate_csv_report, generate_json_report,
};
use wersig_stats::{
    Dataset, IntervalMethod, SamplingMode, SignificanceConfig, SignificanceTest, alpha,
};

/// WerSig CLI arguments
#[derive(Parser, Debug)]
#[command(name = "wersig")]
#[command(
    author,
    version,
    about = "WerSig - bootstrap significance test for error-rate differences between two models"
)]
pub struct Cli {
    /// What to read
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: discover wersig.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Field delimiter of annotated files and of model A's file
    #[arg(long, global = true)]
    pub sep: Option<char>,

    /// Field delimiter of model B's file in paired mode
    #[arg(long, global = true)]
    pub sep_b: Option<char>,

    /// Number of bootstrap batches
    #[arg(long, global = true)]
    pub total_batch: Option<usize>,

    /// Items drawn with replacement per batch
    #[arg(long, global = true)]
    pub samples_per_batch: Option<usize>,

    /// Confidence level, e.g. 0.95
    #[arg(long, global = true)]
    pub confidence: Option<f64>,

    /// Interval method: percentile or gaussian
    #[arg(long, global = true)]
    pub method: Option<String>,

    /// Resample within each block instead of the pooled dataset
    #[arg(long, global = true, overrides_with = "no_stratify")]
    pub stratify: bool,

    /// Resample the pooled dataset even if wersig.toml sets `stratify`
    #[arg(long, global = true, overrides_with = "stratify")]
    pub no_stratify: bool,

    /// Seed for reproducible runs (random if not given)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Run bootstrap batches on the current thread only
    #[arg(long, global = true, overrides_with = "parallel")]
    pub serial: bool,

    /// Run bootstrap batches on the thread pool even if wersig.toml disables it
    #[arg(long, global = true, overrides_with = "serial")]
    pub parallel: bool,

    /// Number of threads for parallel resampling
    /// 0 = use all available cores
    #[arg(long, short = 'j', global = true)]
    pub threads: Option<usize>,

    /// Output format: human, json, csv
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Exit with status 1 unless model B is significantly better
    #[arg(long, global = true, overrides_with = "no_fail_on_insignificant")]
    pub fail_on_insignificant: bool,

    /// Exit with status 0 whatever the verdict
    #[arg(long, global = true, overrides_with = "fail_on_insignificant")]
    pub no_fail_on_insignificant: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// One file of `errors_a,errors_b,reference_count[,block_id]` lines
    Annotated {
        /// Input file
        file: PathBuf,
    },
    /// Legacy layout: one `edit_distance,reference_count` file per model
    Paired {
        /// Model A's file
        file_a: PathBuf,
        /// Model B's file
        file_b: PathBuf,
    },
    /// Print a default wersig.toml
    Init,
}

/// Run the WerSig CLI with the process arguments.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the WerSig CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => WersigConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => WersigConfig::discover().unwrap_or_default(),
    };

    match &cli.command {
        Commands::Init => {
            print!("{}", WersigConfig::default_toml());
            Ok(())
        }
        Commands::Annotated { file } => {
            let delimiter = cli.sep.unwrap_or(config.input.delimiter);
            let dataset = read_annotated(file, delimiter)?;
            run_significance(&cli, &config, &dataset, vec![file.display().to_string()])
        }
        Commands::Paired { file_a, file_b } => {
            let delimiter_a = cli.sep.unwrap_or(config.input.delimiter);
            let delimiter_b = cli.sep_b.unwrap_or(config.input.paired_delimiter);
            let dataset = read_paired(file_a, file_b, delimiter_a, delimiter_b)?;
            run_significance(
                &cli,
                &config,
                &dataset,
                vec![file_a.display().to_string(), file_b.display().to_string()],
            )
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "wersig=debug" } else { "wersig=info" };
    // A second initialisation (e.g. in-process tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolve an on/off flag pair against the wersig.toml value.
///
/// With `overrides_with`, at most one of `on` and `off` is set (the last given).
fn flag_or(on: bool, off: bool, config_value: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        config_value
    }
}

/// Whether an insignificant result should fail the run
pub fn fail_on_insignificant(cli: &Cli, config: &WersigConfig) -> bool {
    flag_or(
        cli.fail_on_insignificant,
        cli.no_fail_on_insignificant,
        config.output.fail_on_insignificant,
    )
}

/// Build the test configuration by layering: wersig.toml → CLI overrides.
pub fn build_significance_config(
    cli: &Cli,
    config: &WersigConfig,
) -> anyhow::Result<SignificanceConfig> {
    let bootstrap = &config.bootstrap;
    let method_str = cli.method.as_deref().unwrap_or(&bootstrap.method);
    let method: IntervalMethod = method_str.parse().map_err(anyhow::Error::msg)?;

    let sampling = if flag_or(cli.stratify, cli.no_stratify, bootstrap.stratify) {
        SamplingMode::BlockStratified
    } else {
        SamplingMode::Pooled
    };

    Ok(SignificanceConfig {
        total_batch: cli.total_batch.unwrap_or(bootstrap.total_batch),
        num_samples_per_batch: cli.samples_per_batch.unwrap_or(bootstrap.samples_per_batch),
        confidence_level: cli.confidence.unwrap_or(bootstrap.confidence_level),
        method,
        sampling,
        parallel: flag_or(cli.parallel, cli.serial, bootstrap.parallel),
    })
}

fn run_significance(
    cli: &Cli,
    config: &WersigConfig,
    dataset: &Dataset,
    inputs: Vec<String>,
) -> anyhow::Result<()> {
    let summary = dataset.summary();
    tracing::info!(
        "Loaded {} items in {} block(s) from {}",
        summary.items,
        summary.blocks,
        inputs.join(", ")
    );

    let format_str = cli.format.as_deref().unwrap_or(&config.output.format);
    let format: OutputFormat = format_str.parse().map_err(anyhow::Error::msg)?;

    let sig_config = build_significance_config(cli, config)?;
    let test = SignificanceTest::new(sig_config.clone())?;
    warn_on_weak_settings(&sig_config);

    // Configure Rayon thread pool for resampling
    let threads = cli.threads.unwrap_or(config.bootstrap.threads);
    if sig_config.parallel && threads > 0 {
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .ok();
    }

    let seed = cli
        .seed
        .or(config.bootstrap.seed)
        .unwrap_or_else(|| rand::thread_rng().next_u64());
    tracing::info!(
        "Running {} bootstrap batches ({} sampling, {} interval, seed {})",
        sig_config.total_batch,
        sig_config.sampling,
        sig_config.method,
        seed
    );
    tracing::debug!("Effective configuration: {:?}", sig_config);

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let result = test.run(dataset, &mut rng)?;

    let report = Report::new(ReportMeta::new(inputs, seed, &sig_config), &summary, &result);

    let output = match format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Csv => generate_csv_report(&report),
        OutputFormat::Human => format_human_output(&report),
    };

    // Write output
    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        tracing::info!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    if fail_on_insignificant(cli, config) && !result.is_significant() {
        eprintln!("\nModel B is not significantly better than model A ({})", result.verdict());
        std::process::exit(1);
    }

    Ok(())
}

/// Log usage constraints that are not errors but make the interval unreliable
fn warn_on_weak_settings(config: &SignificanceConfig) {
    if config.total_batch < 100 {
        tracing::warn!(
            "total_batch={} is very low; the standard error will be unreliable. \
             Use >= 1000 for meaningful results.",
            config.total_batch
        );
    }

    if config.method == IntervalMethod::Percentile {
        let needed = (1.0 / alpha(config.confidence_level)).ceil() as usize;
        if config.total_batch < needed {
            tracing::warn!(
                "total_batch={} cannot resolve the {:.1}th percentile; use at least {} batches",
                config.total_batch,
                alpha(config.confidence_level) * 100.0,
                needed
            );
        }
    }
}
