mod convert;
mod info;

use std::io::stderr;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert survey logs to one snapshot row per second of recording time.
    ///
    /// Inputs are processed in the order given. Channel values carry over from one input
    /// to the next, however, snapshots are only written when the recording time within
    /// an input moves into a later second.
    Convert {
        /// Output file path.
        #[arg(short, long, default_value = "tmp.csv", value_name = "path")]
        output: PathBuf,

        /// Output format.
        ///
        /// csv writes the fixed survey column layout without spectra. json writes one
        /// JSON object per line, including spectra.
        #[arg(short, long, default_value = "csv")]
        format: convert::Format,

        /// Delete output file if it already exists
        #[arg(long, action)]
        clobber: bool,

        /// Input survey log files.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Show record and channel statistics for survey log files.
    Info {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: info::Format,

        /// Input survey log files.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(stderr)
        .with_ansi(false)
        .without_time()
        .with_env_filter(
            EnvFilter::try_from_env("AIRSURVEY_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    debug!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Commands::Convert {
            output,
            format,
            clobber,
            inputs,
        } => {
            if !clobber && output.exists() {
                bail!("{output:?} exists; use --clobber");
            }
            info!("converting {inputs:?} to {output:?}");
            convert::convert(inputs, output, format)
        }
        Commands::Info { format, inputs } => info::info(inputs, format),
    }
}
