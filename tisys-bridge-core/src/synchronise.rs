//! High-level pipeline: fetch-and-purge, then transform.
//!
//! # Responsibilities
//! - Runs the two stages strictly in order, one file at a time.
//! - Never fails as a whole: stage-level failures are logged and recorded as a
//!   missing stage report. A failed connection skips stage 1, but stage 2 still
//!   picks up whatever earlier runs left in the staging directory.
//! - Collects a [`SynchroniseReport`] for the caller to log.
//!
//! # Navigation
//! - Main entrypoint: [`synchronise`]
//! - Stages: [`crate::fetch::fetch_and_purge`], [`crate::transform::transform_staged`]

use std::fmt::Display;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::{RemoteConfig, StagingConfig};
use crate::contract::{LocalStager, RemoteConnector};
use crate::fetch::{fetch_and_purge, FetchReport};
use crate::lookup::CustomerTable;
use crate::mapper::DocumentMapper;
use crate::transform::{transform_staged, TransformReport};

/// Everything one run needs.
#[derive(Debug, Clone, Default)]
pub struct SynchroniseConfig {
    /// `None` when the remote settings could not be loaded; stage 1 is skipped.
    pub remote: Option<RemoteConfig>,
    pub staging: StagingConfig,
    pub customers: CustomerTable,
}

/// Step of the pipeline in which a single file failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Fetch,
    DeleteRemote,
    Read,
    Map,
    Write,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub operation: Operation,
    pub error: String,
}

impl FileFailure {
    pub fn new(file: &str, operation: Operation, error: &impl Display) -> Self {
        Self {
            file: file.to_string(),
            operation,
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct SynchroniseReport {
    /// `None` when stage 1 was skipped or aborted.
    pub fetch: Option<FetchReport>,
    /// `None` when the staging directory could not be listed.
    pub transform: Option<TransformReport>,
}

impl SynchroniseReport {
    pub fn failure_count(&self) -> usize {
        self.fetch.as_ref().map_or(0, |f| f.failures.len())
            + self.transform.as_ref().map_or(0, |t| t.failures.len())
    }

    pub fn trace(&self) {
        info!(
            downloaded = self.fetch.as_ref().map_or(0, |f| f.downloaded.len()),
            transformed = self.transform.as_ref().map_or(0, |t| t.transformed.len()),
            failures = self.failure_count(),
            "[SYNC] Run report"
        );
        match serde_json::to_string_pretty(self) {
            Ok(json) => debug!(json = %json, "[SYNC][DEBUG] Run report as JSON"),
            Err(e) => error!(error = ?e, "[SYNC][DEBUG] Failed to serialize run report"),
        }
    }
}

/// Fetch stage only; `None` when it was skipped or aborted.
pub async fn run_fetch<C, S>(
    config: &SynchroniseConfig,
    connector: &C,
    stager: &S,
) -> Option<FetchReport>
where
    C: RemoteConnector + ?Sized,
    S: LocalStager + ?Sized,
{
    let Some(remote) = config.remote.as_ref() else {
        warn!("[SYNC] No remote configuration, skipping download");
        return None;
    };

    info!("[SYNC] Starting download");
    match fetch_and_purge(connector, stager, remote, &config.staging).await {
        Ok(report) => {
            info!("[SYNC] Download completed");
            Some(report)
        }
        Err(e) => {
            error!(error = %e, "[SYNC][ERROR] Download stage aborted");
            None
        }
    }
}

/// Transform stage only; `None` when the staging directory could not be listed.
pub fn run_transform<S>(config: &SynchroniseConfig, stager: &S) -> Option<TransformReport>
where
    S: LocalStager + ?Sized,
{
    info!("[SYNC] Starting to process downloaded files");
    let mapper = DocumentMapper::new(config.customers.clone());
    match transform_staged(stager, &mapper, &config.staging) {
        Ok(report) => {
            info!("[SYNC] Files processed");
            Some(report)
        }
        Err(e) => {
            error!(error = %e, "[SYNC][ERROR] Transform stage aborted");
            None
        }
    }
}

/// Runs stage 1 then stage 2.
pub async fn synchronise<C, S>(
    config: &SynchroniseConfig,
    connector: &C,
    stager: &S,
) -> SynchroniseReport
where
    C: RemoteConnector + ?Sized,
    S: LocalStager + ?Sized,
{
    info!("[SYNC] Starting run");
    let fetch = run_fetch(config, connector, stager).await;
    let transform = run_transform(config, stager);
    let report = SynchroniseReport { fetch, transform };
    report.trace();
    report
}
