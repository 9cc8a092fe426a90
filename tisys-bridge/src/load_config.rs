/// `load_config` module: loads the optional YAML layout file and the remote
/// connection secrets from the environment.
///
/// # Responsibilities
/// - Parse the user-supplied YAML (staging layout, extra customer codes) into typed structs
/// - Read `FTP_HOST`, `FTP_USER`, `FTP_PASSWORD`, `FTP_PORT` and `FTP_REMOTE_PATH`
/// - Produce clear diagnostics: every failure names the file or variable involved
///
/// # Errors
/// All errors use `anyhow::Error` and surface at the CLI boundary.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tisys_bridge_core::config::{RemoteConfig, StagingConfig, DEFAULT_SFTP_PORT};
use tisys_bridge_core::lookup::CustomerTable;
use tisys_bridge_core::synchronise::SynchroniseConfig;
use tracing::{error, info};

pub const ENV_HOST: &str = "FTP_HOST";
pub const ENV_USER: &str = "FTP_USER";
pub const ENV_PASSWORD: &str = "FTP_PASSWORD";
pub const ENV_PORT: &str = "FTP_PORT";
pub const ENV_REMOTE_PATH: &str = "FTP_REMOTE_PATH";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub staging: StagingConfig,
    /// Extra company id → customer code entries, layered over the built-in table.
    pub customers: BTreeMap<i64, String>,
}

impl CliConfig {
    pub fn customer_table(&self) -> CustomerTable {
        CustomerTable::with_overrides(self.customers.clone())
    }

    pub fn into_synchronise_config(self, remote: Option<RemoteConfig>) -> SynchroniseConfig {
        SynchroniseConfig {
            remote,
            customers: self.customer_table(),
            staging: self.staging,
        }
    }
}

/// Loads the YAML config at `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<CliConfig> {
    let Some(path) = path else {
        info!("No config file given, using default staging layout");
        return Ok(CliConfig::default());
    };
    info!(config_path = ?path, "Loading configuration from file");

    let content = fs::read_to_string(path).map_err(|e| {
        error!(error = ?e, config_path = ?path, "Failed to read config file");
        anyhow::anyhow!("Failed to read config file {:?}: {}", path, e)
    })?;

    if content.trim().is_empty() {
        info!(config_path = ?path, "Config file is empty, using defaults");
        return Ok(CliConfig::default());
    }

    let config: CliConfig = serde_yaml::from_str(&content).map_err(|e| {
        error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
        anyhow::anyhow!("Failed to parse config YAML: {e}")
    })?;

    config.staging.trace_loaded();
    info!(
        extra_customers = config.customers.len(),
        "Parsed config YAML successfully"
    );
    Ok(config)
}

/// Reads the remote connection settings from the environment.
pub fn load_remote_config() -> Result<RemoteConfig> {
    let port = match std::env::var(ENV_PORT) {
        Ok(raw) => raw
            .trim()
            .parse::<u16>()
            .with_context(|| format!("{ENV_PORT} must be a valid port number, got {raw:?}"))?,
        Err(_) => DEFAULT_SFTP_PORT,
    };

    let remote = RemoteConfig {
        host: required_var(ENV_HOST)?,
        user: required_var(ENV_USER)?,
        password: required_var(ENV_PASSWORD)?,
        port,
        remote_path: required_var(ENV_REMOTE_PATH)?,
    };
    remote.trace_loaded();
    Ok(remote)
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name).map_err(|e| {
        error!(error = ?e, var = name, "Required environment variable not set");
        anyhow::anyhow!("{name} environment variable not set: {e}")
    })
}
