//! marcbin CLI — stream a MARC binary file and emit extracted editions.
//!
//! One JSON object per accepted edition on stdout; rejection and
//! corruption counts go to the log on stderr.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marcbin::{read_edition, MarcError, RecordFramer};

/// Extract bibliographic editions from a MARC binary file.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the MARC binary (.mrc) file
    file: PathBuf,

    /// Accept electronic resources instead of rejecting them
    #[arg(long)]
    accept_electronic: bool,

    /// Log debug-level detail, including per-record rejection reasons
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "marcbin=debug"
    } else {
        "marcbin=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    let file = File::open(&cli.file)
        .with_context(|| format!("opening {}", cli.file.display()))?;

    let mut accepted = 0usize;
    let mut rejected = 0usize;
    let mut corrupt = 0usize;

    for framed in RecordFramer::new(BufReader::new(file)) {
        let (record, _consumed) = framed?;
        match read_edition(&record, cli.accept_electronic) {
            Ok(Some(edition)) => {
                accepted += 1;
                println!("{}", serde_json::to_string(&edition)?);
            }
            Ok(None) => rejected += 1,
            // framing errors are fatal; per-record corruption is not
            Err(err @ (MarcError::InvalidMarcFile | MarcError::Io(_))) => {
                return Err(err.into());
            }
            Err(err) => {
                corrupt += 1;
                tracing::warn!("skipping corrupt record: {err}");
            }
        }
    }

    tracing::info!(accepted, rejected, corrupt, "finished");
    Ok(())
}
