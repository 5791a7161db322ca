//! `subreport` — write the subscription report as CSV.
//!
//! # Usage
//!
//! ```
//! subreport --input subscriptions.json --output report.csv
//! subreport --config ~/.config/subreport.toml
//! ```
//!
//! Settings are read from the TOML file given with `--config` (optional),
//! then `SUBREPORT_*` environment variables, then command-line flags; later
//! sources win.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use clap::Parser;
use serde::Deserialize;
use subreport_core::subscription;
use subreport_csv::{DEFAULT_UNTIL_FORMAT, WriterOptions, generate};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about = "Write the subscription report as CSV")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "subreport.toml")]
  config: PathBuf,

  /// JSON file holding the subscription records.
  #[arg(short, long, value_name = "FILE")]
  input: Option<PathBuf>,

  /// CSV file to create or overwrite.
  #[arg(short, long, value_name = "FILE")]
  output: Option<PathBuf>,

  /// Field delimiter (a single ASCII character).
  #[arg(short, long)]
  delimiter: Option<char>,

  /// strftime-style format for the `Until` column.
  #[arg(long, value_name = "FORMAT")]
  until_format: Option<String>,
}

// ─── Settings ─────────────────────────────────────────────────────────────────

/// Merged settings from file, environment and flags.
#[derive(Deserialize, Debug, Clone, PartialEq)]
struct Settings {
  input:        Option<PathBuf>,
  #[serde(default = "default_output")]
  output:       PathBuf,
  #[serde(default = "default_delimiter")]
  delimiter:    String,
  #[serde(default = "default_until_format")]
  until_format: String,
}

fn default_output() -> PathBuf { PathBuf::from("report.csv") }

fn default_delimiter() -> String { ",".to_string() }

fn default_until_format() -> String { DEFAULT_UNTIL_FORMAT.to_string() }

impl Settings {
  fn writer_options(&self) -> anyhow::Result<WriterOptions> {
    let mut chars = self.delimiter.chars();
    let delimiter = match (chars.next(), chars.next()) {
      (Some(c), None) => c,
      _ => bail!("delimiter must be a single character, got {:?}", self.delimiter),
    };
    Ok(WriterOptions {
      delimiter,
      until_format: self.until_format.clone(),
    })
  }
}

fn path_value(path: Option<&Path>) -> Option<String> {
  path.map(|p| p.to_string_lossy().into_owned())
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.as_path()).required(false))
    .add_source(config::Environment::with_prefix("SUBREPORT"))
    .set_override_option("input", path_value(cli.input.as_deref()))?
    .set_override_option("output", path_value(cli.output.as_deref()))?
    .set_override_option("delimiter", cli.delimiter.map(String::from))?
    .set_override_option("until_format", cli.until_format.clone())?
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise settings")
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = load_settings(&cli)?;
  let options = settings.writer_options()?;

  let Some(input) = settings.input.as_deref() else {
    bail!("no input file: pass --input or set `input` in the config file");
  };

  run(input, &settings.output, &options)
}

fn run(input: &Path, output: &Path, options: &WriterOptions) -> anyhow::Result<()> {
  let records = subscription::from_path(input)
    .with_context(|| format!("failed to read subscriptions from {}", input.display()))?;
  tracing::info!(count = records.len(), "loaded subscriptions");

  generate(&records, output, options)
    .with_context(|| format!("failed to write report to {}", output.display()))?;
  Ok(())
}
