use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, error, warn};

use crate::contract::LocalStager;
use crate::error::IoError;

/// [`LocalStager`] on top of `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStager;

impl LocalStager for FsStager {
    fn list_files(&self, dir: &Path) -> Result<Vec<String>, IoError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %dir.display(), "Staging directory does not exist, nothing to list");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(IoError::List {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| IoError::List {
                path: dir.to_path_buf(),
                source,
            })?;
            let is_file = entry
                .file_type()
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file {
                debug!(path = %entry.path().display(), "Skipping non-file entry");
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!(name = ?raw, "Skipping file with non UTF-8 name"),
            }
        }
        names.sort();
        Ok(names)
    }

    fn ensure_dir(&self, dir: &Path) -> Result<(), IoError> {
        fs::create_dir_all(dir).map_err(|source| IoError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
    }

    fn read_text(&self, path: &Path) -> Result<String, IoError> {
        fs::read_to_string(path).map_err(|source| IoError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<(), IoError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.ensure_dir(parent)?;
        }
        fs::write(path, content).map_err(|source| IoError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn delete_file(&self, path: &Path) -> bool {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "Deleted file");
                true
            }
            Err(source) => {
                let e = IoError::Delete {
                    path: path.to_path_buf(),
                    source,
                };
                error!(error = %e, path = %path.display(), "Failed to delete file");
                false
            }
        }
    }
}
