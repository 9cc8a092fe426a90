//! Transform stage: map every staged source document into the output directory.
//!
//! Each staged file is deleted after its transform attempt, whether or not the
//! attempt succeeded. A document that fails to map is therefore not retried on
//! the next run and is only recoverable from the logs.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::StagingConfig;
use crate::contract::LocalStager;
use crate::error::{IoError, TransformError};
use crate::mapper::DocumentMapper;
use crate::synchronise::{FileFailure, Operation};

#[derive(Debug, Default, Clone, Serialize)]
pub struct TransformReport {
    /// Output paths of the documents written.
    pub transformed: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
    /// Staged inputs removed after their attempt.
    pub deleted: Vec<String>,
}

impl TransformError {
    pub fn operation(&self) -> Operation {
        match self {
            TransformError::Io(IoError::Read { .. }) => Operation::Read,
            TransformError::Io(_) => Operation::Write,
            TransformError::Map(_) => Operation::Map,
        }
    }
}

/// Runs the transform stage over everything in the staging directory.
/// Returns `Err` only when the staging directory cannot be listed.
pub fn transform_staged<S>(
    stager: &S,
    mapper: &DocumentMapper,
    staging: &StagingConfig,
) -> Result<TransformReport, IoError>
where
    S: LocalStager + ?Sized,
{
    let files: Vec<String> = stager
        .list_files(&staging.download_dir)?
        .into_iter()
        .filter(|name| staging.accepts(name))
        .collect();
    info!(
        count = files.len(),
        download_dir = %staging.download_dir.display(),
        "[TRANSFORM] Staged documents found"
    );

    let mut report = TransformReport::default();
    for file in files {
        let input = staging.staged_path(&file);
        let output = staging.output_path(&file);

        match transform_file(stager, mapper, &input, &output) {
            Ok(()) => {
                info!(file = %file, output = %output.display(), "[TRANSFORM] Transformed document saved");
                report.transformed.push(output);
            }
            Err(e) => {
                error!(file = %file, error = %e, "[TRANSFORM][ERROR] Transformation failed");
                report
                    .failures
                    .push(FileFailure::new(&file, e.operation(), &e));
            }
        }

        if stager.delete_file(&input) {
            report.deleted.push(file);
        } else {
            warn!(file = %file, "[TRANSFORM] Staged input could not be removed");
        }
    }

    info!(
        transformed = report.transformed.len(),
        failures = report.failures.len(),
        "[TRANSFORM] Stage complete"
    );
    Ok(report)
}

/// Reads `input`, maps it and writes the result to `output`.
/// Nothing is written unless mapping succeeded.
pub fn transform_file<S>(
    stager: &S,
    mapper: &DocumentMapper,
    input: &Path,
    output: &Path,
) -> Result<(), TransformError>
where
    S: LocalStager + ?Sized,
{
    let xml = stager.read_text(input)?;
    let mapped = mapper.map_str(&xml)?;
    stager.write_text(output, &mapped)?;
    Ok(())
}
