//! Longbox CLI - organise comic archives from the command line

mod commands;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "longbox")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Organize comic archives under the destination tree
    Organize {
        /// Archive files to process
        #[arg(required = true)]
        archives: Vec<PathBuf>,

        /// Destination root, overriding the settings file
        #[arg(short, long)]
        destination: Option<PathBuf>,
    },

    /// Display the metadata stored in an archive
    Info {
        /// Archive file
        archive: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the metadata sidecar of an archive
    Validate {
        /// Archive file
        archive: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "longbox=debug,longbox_core=debug"
    } else {
        "longbox=info,longbox_core=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = settings::Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Organize {
            archives,
            destination,
        } => commands::organize(&archives, destination, &settings),

        Commands::Info { archive, json } => commands::info(&archive, json),

        Commands::Validate { archive } => commands::validate(&archive),
    }
}
