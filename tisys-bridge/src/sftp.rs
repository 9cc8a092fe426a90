#![doc = "SFTP transport: implements the core remote contract on top of libssh2."]
//
//! # SFTP client (CLI <-> Core)
//!
//! [`SftpConnector`] opens a password-authenticated SSH session and the SFTP
//! subsystem; the returned [`SftpSession`] implements
//! [`tisys_bridge_core::contract::RemoteSession`].
//!
//! libssh2 calls are blocking. The pipeline processes one file at a time, so
//! they run inline on the calling task; no timeout is set beyond the transport defaults.

use async_trait::async_trait;
use ssh2::{FileStat, Session, Sftp};
use std::fs::File;
use std::io;
use std::net::TcpStream;
use std::path::Path;

use tisys_bridge_core::config::RemoteConfig;
use tisys_bridge_core::contract::{EntryKind, RemoteConnector, RemoteEntry, RemoteSession};
use tisys_bridge_core::error::TransferError;

#[derive(Debug, Default, Clone, Copy)]
pub struct SftpConnector;

#[async_trait]
impl RemoteConnector for SftpConnector {
    async fn connect(
        &self,
        config: &RemoteConfig,
    ) -> Result<Box<dyn RemoteSession>, TransferError> {
        let connect_error = |message: String| TransferError::Connect {
            host: config.host.clone(),
            port: config.port,
            message,
        };

        tracing::info!(host = %config.host, port = config.port, user = %config.user, "Opening SFTP connection");
        let tcp = TcpStream::connect((config.host.as_str(), config.port))
            .map_err(|e| connect_error(e.to_string()))?;

        let mut session = Session::new().map_err(|e| connect_error(e.to_string()))?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| connect_error(format!("handshake failed: {e}")))?;
        session
            .userauth_password(&config.user, &config.password)
            .map_err(|e| connect_error(format!("authentication failed: {e}")))?;
        if !session.authenticated() {
            return Err(connect_error("authentication rejected".to_string()));
        }

        let sftp = session
            .sftp()
            .map_err(|e| connect_error(format!("sftp subsystem unavailable: {e}")))?;
        let session: Box<dyn RemoteSession> = Box::new(SftpSession { session, sftp });
        Ok(session)
    }
}

pub struct SftpSession {
    session: Session,
    sftp: Sftp,
}

fn entry_kind(stat: &FileStat) -> EntryKind {
    let file_type = stat.file_type();
    if file_type.is_file() {
        EntryKind::File
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_symlink() {
        EntryKind::Symlink
    } else {
        EntryKind::Other
    }
}

#[async_trait]
impl RemoteSession for SftpSession {
    async fn list(&mut self, remote_dir: &str) -> Result<Vec<RemoteEntry>, TransferError> {
        let entries = self
            .sftp
            .readdir(Path::new(remote_dir))
            .map_err(|e| TransferError::List {
                path: remote_dir.to_string(),
                message: e.to_string(),
            })?;

        Ok(entries
            .into_iter()
            .filter_map(|(path, stat)| {
                let name = path.file_name()?.to_str()?.to_string();
                Some(RemoteEntry::new(name, entry_kind(&stat)))
            })
            .collect())
    }

    async fn fetch(&mut self, remote_path: &str, local_path: &Path) -> Result<(), TransferError> {
        let fetch_error = |message: String| TransferError::Fetch {
            remote_path: remote_path.to_string(),
            local_path: local_path.to_path_buf(),
            message,
        };

        let mut remote = self
            .sftp
            .open(Path::new(remote_path))
            .map_err(|e| fetch_error(e.to_string()))?;
        let mut local = File::create(local_path).map_err(|e| fetch_error(e.to_string()))?;
        let bytes = io::copy(&mut remote, &mut local).map_err(|e| fetch_error(e.to_string()))?;
        tracing::debug!(remote_path, bytes, "Fetched remote file");
        Ok(())
    }

    async fn delete(&mut self, remote_path: &str) -> Result<(), TransferError> {
        self.sftp
            .unlink(Path::new(remote_path))
            .map_err(|e| TransferError::Delete {
                path: remote_path.to_string(),
                message: e.to_string(),
            })
    }

    fn disconnect(&mut self) {
        if let Err(e) = self.session.disconnect(None, "tisys-bridge run finished", None) {
            tracing::warn!(error = %e, "SFTP disconnect did not complete cleanly");
        }
    }
}
