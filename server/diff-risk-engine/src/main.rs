//! Binary entrypoint: read diff text from a file or stdin, write one JSON
//! report to stdout. Logs go to stderr so stdout stays machine-readable.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use diff_risk_engine::{Config, Engine};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "diff-risk-engine")]
#[command(about = "Classify a unified diff and score its review risk", long_about = None)]
struct Cli {
  /// Diff file to analyze (reads stdin when omitted)
  diff_file: Option<PathBuf>,

  /// JSON configuration overriding the built-in rule tables
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Pretty-print the JSON report
  #[arg(short, long, default_value_t = false)]
  pretty: bool,

  /// Enable debug logging on stderr
  #[arg(short, long, default_value_t = false)]
  verbose: bool,
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  if let Err(e) = run_binary(&cli) {
    let _ = writeln!(io::stderr(), "diff-risk-engine error: {:#}", e);
    std::process::exit(1);
  }
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .init();
}

fn run_binary(cli: &Cli) -> anyhow::Result<()> {
  let config = match &cli.config {
    Some(path) => Config::from_json_file(path)
      .with_context(|| format!("loading config {}", path.display()))?,
    None => Config::default(),
  };
  let engine = Engine::new(config).context("building engine")?;

  let raw = match &cli.diff_file {
    Some(path) => {
      std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    }
    None => {
      let mut raw = String::new();
      io::stdin().lock().read_to_string(&mut raw).context("reading stdin")?;
      raw
    }
  };
  info!(bytes = raw.len(), "analyzing diff");

  let report = engine.analyze(&raw);
  let json = if cli.pretty {
    serde_json::to_vec_pretty(&report)?
  } else {
    serde_json::to_vec(&report)?
  };
  let mut out = io::stdout().lock();
  out.write_all(&json)?;
  writeln!(out)?;
  Ok(())
}
