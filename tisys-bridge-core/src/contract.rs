//! # contract: interfaces for the remote file server and local staging storage
//!
//! The pipeline stages only talk to the outside world through these traits.
//! Production implementations live in the CLI crate (SFTP) and in
//! [`crate::staging`] (local filesystem); tests use the `mockall` mocks.
//!
//! ## Remote
//! A [`RemoteConnector`] opens a [`RemoteSession`]. The session is owned by
//! the fetch stage for exactly one run and released through
//! [`RemoteSession::disconnect`] on every exit path.
//!
//! ## Local
//! [`LocalStager`] covers listing, reading, writing and deleting staged files.
//! Deletion is best effort: it logs and never reports failure to the caller.

use std::path::Path;

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;

use crate::config::RemoteConfig;
use crate::error::{IoError, TransferError};

/// File type of a remote directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl RemoteEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn is_regular_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Opens sessions to the remote file server.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RemoteConnector: Send + Sync {
    async fn connect(&self, config: &RemoteConfig)
        -> Result<Box<dyn RemoteSession>, TransferError>;
}

/// An open session on the remote file server.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RemoteSession: Send {
    /// Lists the entries of `remote_dir` (without `.` and `..`).
    async fn list(&mut self, remote_dir: &str) -> Result<Vec<RemoteEntry>, TransferError>;

    /// Copies `remote_path` to `local_path`, creating or truncating the local file.
    async fn fetch(&mut self, remote_path: &str, local_path: &Path) -> Result<(), TransferError>;

    async fn delete(&mut self, remote_path: &str) -> Result<(), TransferError>;

    /// Closes the session. Must be safe to call on a session whose transport already failed.
    fn disconnect(&mut self);
}

/// Local staging storage.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait LocalStager: Send + Sync {
    /// Names of the regular files in `dir`, sorted. A missing directory lists as empty.
    fn list_files(&self, dir: &Path) -> Result<Vec<String>, IoError>;

    fn ensure_dir(&self, dir: &Path) -> Result<(), IoError>;

    fn read_text(&self, path: &Path) -> Result<String, IoError>;

    /// Writes `content` to `path`, creating parent directories as needed.
    fn write_text(&self, path: &Path, content: &str) -> Result<(), IoError>;

    /// Removes `path`, logging any failure. Returns whether the file is gone.
    fn delete_file(&self, path: &Path) -> bool;
}
