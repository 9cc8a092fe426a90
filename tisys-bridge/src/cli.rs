///
/// This module implements the CLI interface for tisys-bridge: command parsing,
/// config loading and dispatch into the core pipeline.
///
/// All mapping and staging logic lives in the [`tisys-bridge-core`] crate.
/// This module is strictly CLI glue.
///
/// ## Commands
/// - `run`: fetch-and-purge, then transform (the scheduled job)
/// - `fetch` / `transform`: one stage only
/// - `map`: map a single document to stdout, nothing is deleted
///
/// [`tisys-bridge-core`]: ../../tisys-bridge-core/
use crate::load_config::{load_config, load_remote_config};
use crate::sftp::SftpConnector;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tisys_bridge_core::config::RemoteConfig;
use tisys_bridge_core::mapper::DocumentMapper;
use tisys_bridge_core::staging::FsStager;
use tisys_bridge_core::synchronise::{
    run_fetch, run_transform, synchronise, SynchroniseReport,
};

/// CLI for tisys-bridge: pull carrier tour files and convert them to transportbooking imports.
#[derive(Parser)]
#[clap(
    name = "tisys-bridge",
    version,
    about = "Fetch EDI tour files over SFTP and convert them into transportbooking imports"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download and purge remote files, then transform everything staged
    Run {
        /// Path to the YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
    },
    /// Only download and purge remote files into the staging directory
    Fetch {
        /// Path to the YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
    },
    /// Only transform files already in the staging directory
    Transform {
        /// Path to the YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
    },
    /// Map one source document and print the import XML to stdout
    Map {
        /// Source document to map
        #[clap(long)]
        input: PathBuf,
        /// Path to the YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
    },
}

/// Remote settings are optional here: a missing or invalid environment is
/// logged and behaves like a failed connection.
fn remote_or_skip() -> Option<RemoteConfig> {
    match load_remote_config() {
        Ok(remote) => Some(remote),
        Err(e) => {
            tracing::error!(error = %e, "Remote configuration unavailable, download will be skipped");
            None
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run { config } => {
            let config = load_config(config.as_deref())?;
            tracing::info!(command = "run", "Starting run");
            let sync_config = config.into_synchronise_config(remote_or_skip());
            let report = synchronise(&sync_config, &SftpConnector, &FsStager).await;
            finish("run", &report);
            Ok(())
        }
        Commands::Fetch { config } => {
            let config = load_config(config.as_deref())?;
            let sync_config = config.into_synchronise_config(remote_or_skip());
            let report = SynchroniseReport {
                fetch: run_fetch(&sync_config, &SftpConnector, &FsStager).await,
                transform: None,
            };
            finish("fetch", &report);
            Ok(())
        }
        Commands::Transform { config } => {
            let config = load_config(config.as_deref())?;
            let sync_config = config.into_synchronise_config(None);
            let report = SynchroniseReport {
                fetch: None,
                transform: run_transform(&sync_config, &FsStager),
            };
            finish("transform", &report);
            Ok(())
        }
        Commands::Map { input, config } => {
            let config = load_config(config.as_deref())?;
            let mapper = DocumentMapper::new(config.customer_table());
            let xml = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let mapped = mapper
                .map_str(&xml)
                .with_context(|| format!("Failed to map {}", input.display()))?;
            print!("{mapped}");
            Ok(())
        }
    }
}

fn finish(command: &str, report: &SynchroniseReport) {
    report.trace();
    if report.failure_count() > 0 {
        tracing::warn!(command, failures = report.failure_count(), "Completed with per-file failures");
    } else {
        tracing::info!(command, "Completed");
    }
}
