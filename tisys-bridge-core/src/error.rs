//! Error types shared across the staging pipeline and the document mapper.
//!
//! Every kind is caught at the smallest per-file or per-document scope by the
//! stage that produced it, logged, and recorded in the run report. Only a
//! failed remote connection aborts a whole stage.

use std::path::PathBuf;
use thiserror::Error;

use crate::source::StationKind;

/// Remote file-transfer failure (connect, list, fetch, delete).
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("failed to connect to {host}:{port}: {message}")]
    Connect {
        host: String,
        port: u16,
        message: String,
    },

    #[error("failed to list remote directory {path}: {message}")]
    List { path: String, message: String },

    #[error("failed to fetch {remote_path} to {local_path:?}: {message}")]
    Fetch {
        remote_path: String,
        local_path: PathBuf,
        message: String,
    },

    #[error("failed to delete remote file {path}: {message}")]
    Delete { path: String, message: String },
}

/// Local filesystem failure.
#[derive(Error, Debug)]
pub enum IoError {
    #[error("failed to list directory {path:?}: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to delete {path:?}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The source document does not have the tour/shipment/station shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("missing element <{element}> under <{parent}>")]
    MissingElement {
        parent: &'static str,
        element: &'static str,
    },

    #[error("unexpected root element <{found}>, expected <{expected}>")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },

    #[error("no station with type=\"{0}\"")]
    MissingStation(StationKind),
}

/// Failure while turning one source document into a target document.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("source document is not valid XML: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("source document has an unexpected shape: {0}")]
    Structure(#[from] StructureError),

    #[error("failed to serialise target document: {0}")]
    Serialize(#[from] std::io::Error),
}

/// Failure while transforming one staged file end to end.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Map(#[from] MapError),
}

/// Failure that aborts the whole fetch stage.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Io(#[from] IoError),
}
