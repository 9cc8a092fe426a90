//! Fetch-and-purge stage: copy every regular file from the remote directory
//! into local staging, then delete the remote copy.
//!
//! One failing file never stops the others. A file is only deleted remotely
//! after it was fetched; there is no durability guarantee beyond that (a crash
//! between remote delete and a complete local write loses the file).

use serde::Serialize;
use tracing::{error, info};

use crate::config::{RemoteConfig, StagingConfig};
use crate::contract::{LocalStager, RemoteConnector, RemoteSession};
use crate::error::FetchError;
use crate::synchronise::{FileFailure, Operation};

#[derive(Debug, Default, Clone, Serialize)]
pub struct FetchReport {
    /// Number of entries in the remote listing.
    pub listed: usize,
    /// Non-regular entries that were not fetched.
    pub skipped: Vec<String>,
    pub downloaded: Vec<String>,
    /// Files deleted from the server after download.
    pub purged: Vec<String>,
    pub failures: Vec<FileFailure>,
}

/// Owns a remote session for the duration of the stage and disconnects it on drop.
struct SessionGuard {
    session: Box<dyn RemoteSession>,
    host: String,
}

impl SessionGuard {
    fn session(&mut self) -> &mut dyn RemoteSession {
        self.session.as_mut()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.session.disconnect();
        info!(host = %self.host, "[FETCH] Disconnected from remote server");
    }
}

/// Runs the fetch stage. Returns `Err` only when nothing could be attempted:
/// the connection, the listing or the staging directory failed.
pub async fn fetch_and_purge<C, S>(
    connector: &C,
    stager: &S,
    remote: &RemoteConfig,
    staging: &StagingConfig,
) -> Result<FetchReport, FetchError>
where
    C: RemoteConnector + ?Sized,
    S: LocalStager + ?Sized,
{
    let session = match connector.connect(remote).await {
        Ok(session) => {
            info!(host = %remote.host, port = remote.port, "[FETCH] Connected to remote server");
            session
        }
        Err(e) => {
            error!(error = %e, host = %remote.host, "[FETCH][ERROR] Could not connect");
            return Err(e.into());
        }
    };
    let mut guard = SessionGuard {
        session,
        host: remote.host.clone(),
    };

    let entries = guard.session().list(&remote.remote_path).await.map_err(|e| {
        error!(error = %e, remote_path = %remote.remote_path, "[FETCH][ERROR] Listing failed");
        e
    })?;

    let mut report = FetchReport {
        listed: entries.len(),
        ..FetchReport::default()
    };

    let (files, others): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(|entry| entry.is_regular_file());
    for entry in others {
        info!(file = %entry.name, kind = ?entry.kind, "[FETCH] Skipping non-regular entry");
        report.skipped.push(entry.name);
    }

    if files.is_empty() {
        info!(remote_path = %remote.remote_path, "[FETCH] No files to download");
        return Ok(report);
    }

    stager.ensure_dir(&staging.download_dir).map_err(|e| {
        error!(error = %e, "[FETCH][ERROR] Could not create staging directory");
        e
    })?;

    for entry in files {
        let remote_path = remote_join(&remote.remote_path, &entry.name);
        let local_path = staging.staged_path(&entry.name);

        if let Err(e) = guard.session().fetch(&remote_path, &local_path).await {
            error!(file = %entry.name, error = %e, "[FETCH][ERROR] Download failed");
            report
                .failures
                .push(FileFailure::new(&entry.name, Operation::Fetch, &e));
            continue;
        }
        info!(file = %entry.name, local_path = %local_path.display(), "[FETCH] Downloaded");
        report.downloaded.push(entry.name.clone());

        match guard.session().delete(&remote_path).await {
            Ok(()) => {
                info!(file = %entry.name, "[FETCH] Deleted from server");
                report.purged.push(entry.name);
            }
            Err(e) => {
                error!(file = %entry.name, error = %e, "[FETCH][ERROR] Remote delete failed, file stays on server");
                report
                    .failures
                    .push(FileFailure::new(&entry.name, Operation::DeleteRemote, &e));
            }
        }
    }

    info!(
        downloaded = report.downloaded.len(),
        purged = report.purged.len(),
        failures = report.failures.len(),
        "[FETCH] Stage complete"
    );
    Ok(report)
}

/// POSIX join for remote paths.
pub fn remote_join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::remote_join;

    #[test]
    fn joins_without_doubling_slashes() {
        assert_eq!(remote_join("/out", "a.xml"), "/out/a.xml");
        assert_eq!(remote_join("/out/", "a.xml"), "/out/a.xml");
        assert_eq!(remote_join("", "a.xml"), "a.xml");
        assert_eq!(remote_join("/", "a.xml"), "/a.xml");
    }
}
