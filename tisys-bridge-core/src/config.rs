use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

pub const DEFAULT_SFTP_PORT: u16 = 22;

/// Connection settings for the remote file server.
#[derive(Clone)]
pub struct RemoteConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub port: u16,
    pub remote_path: String,
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .field("remote_path", &self.remote_path)
            .finish()
    }
}

impl RemoteConfig {
    pub fn trace_loaded(&self) {
        info!(
            host = %self.host,
            user = %self.user,
            port = self.port,
            remote_path = %self.remote_path,
            "Loaded remote config"
        );
    }
}

/// Local layout: where downloads are staged and where mapped documents go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    pub download_dir: PathBuf,
    pub output_dir: PathBuf,
    pub output_prefix: String,
    /// Source extension without the leading dot.
    pub extension: String,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("downloads"),
            output_dir: PathBuf::from("parsed"),
            output_prefix: "transformed_".to_string(),
            extension: "xml".to_string(),
        }
    }
}

impl StagingConfig {
    pub fn trace_loaded(&self) {
        info!(
            download_dir = %self.download_dir.display(),
            output_dir = %self.output_dir.display(),
            output_prefix = %self.output_prefix,
            extension = %self.extension,
            "Loaded staging config"
        );
        debug!(?self, "Staging config loaded (full debug)");
    }

    /// True when `file_name` carries the recognised source extension.
    pub fn accepts(&self, file_name: &str) -> bool {
        file_name.ends_with(&format!(".{}", self.extension))
    }

    pub fn staged_path(&self, file_name: &str) -> PathBuf {
        self.download_dir.join(file_name)
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{}", self.output_prefix, file_name))
    }
}
