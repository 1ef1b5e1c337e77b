//! Shipyard CLI tool.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "shipyard")]
#[command(about = "Shipyard deployment CLI", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse artifact coordinates and print their fields
    Coords {
        /// Coordinates as <groupId>:<artifactId>[:<extension>[:<classifier>]]:<version>
        coordinates: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve an artifact against a local repository
    Resolve {
        /// Coordinates of the artifact
        coordinates: String,
        /// Local repository root (defaults to ~/.m2/repository)
        #[arg(long, env = "SHIPYARD_LOCAL_REPOSITORY")]
        local_repo: Option<PathBuf>,
    },
    /// Validate a deployment manifest
    Validate {
        /// Path to the manifest
        #[arg(default_value = "shipyard.kdl")]
        path: PathBuf,
        /// Print the parsed manifest as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Coords { coordinates, json } => {
            commands::coords(&coordinates, json)?;
        }
        Commands::Resolve {
            coordinates,
            local_repo,
        } => {
            commands::resolve(&coordinates, local_repo).await?;
        }
        Commands::Validate { path, json } => {
            commands::validate(&path, json)?;
        }
    }

    Ok(())
}
