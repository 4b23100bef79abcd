//! hhstat CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod run;

#[derive(Parser)]
#[command(name = "hhstat")]
#[command(about = "hhstat - HH to bb gamma gamma event selection")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the selection over an event file and write the filled histograms
    Run {
        /// Events, one JSON object per line
        #[arg(short, long)]
        events: PathBuf,

        /// Selection config (YAML, or JSON by `.json` extension)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file for histograms (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write per-photon and per-event detail rows here (JSON lines).
        #[arg(long)]
        records: Option<PathBuf>,

        /// Threads (0 = auto). Use 1 for deterministic parity.
        #[arg(long, default_value = "1")]
        threads: usize,
    },

    /// Print the histogram and profile catalogue
    Catalogue {
        /// Output file (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Run { events, config, output, records, threads } => {
            let value = run::cmd_run(&events, config.as_deref(), records.as_deref(), threads)?;
            write_json(output.as_ref(), value)
        }
        Commands::Catalogue { output } => cmd_catalogue(output.as_ref()),
    }
}

fn cmd_catalogue(output: Option<&PathBuf>) -> Result<()> {
    let value = serde_json::json!({
        "histograms": hh_select::catalogue::histogram_specs(),
        "profiles": hh_select::catalogue::profile_specs(),
    });
    write_json(output, value)
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
