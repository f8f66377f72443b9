//! `knn-classify`: runs a classification scenario and prints one record per (query, k) pair.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use knn_classifier::{ScenarioConfig, TieBreak, classify_batch};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "knn-classify", about = "Classify 2-D points by k-nearest-neighbor majority vote")]
struct Cli {
    /// TOML scenario file. The built-in demo scenario is used when omitted.
    #[arg(long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// k-value to evaluate; repeat to evaluate several. Replaces the scenario's list.
    #[arg(long = "k", value_name = "K")]
    ks: Vec<usize>,

    /// Overrides the scenario's vote tie policy.
    #[arg(long, value_enum)]
    tie_break: Option<TieBreakArg>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TieBreakArg {
    LastLabel,
    FirstLabel,
}

impl From<TieBreakArg> for TieBreak {
    fn from(val: TieBreakArg) -> Self {
        match val {
            TieBreakArg::LastLabel => TieBreak::LastLabel,
            TieBreakArg::FirstLabel => TieBreak::FirstLabel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `<point> is <label> when using <k> neighbors`
    Text,
    /// A JSON array of records.
    Json,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut scenario = match &cli.scenario {
        Some(path) => ScenarioConfig::load_from_file(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?,
        None => ScenarioConfig::demo(),
    };
    if !cli.ks.is_empty() {
        scenario.ks = cli.ks.clone();
    }
    if let Some(tie_break) = cli.tie_break {
        scenario.tie_break = tie_break.into();
    }
    debug!(tie_break = ?scenario.tie_break, ks = ?scenario.ks, queries = scenario.queries.len(), "scenario ready");

    let classifier = scenario.build_classifier().context("invalid training data")?;
    let records = classify_batch(&classifier, &scenario.queries, &scenario.ks).context("classification failed")?;

    match cli.format {
        OutputFormat::Text => {
            for record in &records {
                println!("{record}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
    }
    Ok(())
}

fn init_logging() {
    let default_level = "warn";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
