use std::fs;
use std::path::Path;
use tempfile::tempdir;

use tisys_bridge_core::config::{RemoteConfig, StagingConfig};
use tisys_bridge_core::contract::{
    EntryKind, MockRemoteConnector, MockRemoteSession, RemoteEntry, RemoteSession,
};
use tisys_bridge_core::error::TransferError;
use tisys_bridge_core::lookup::CustomerTable;
use tisys_bridge_core::staging::FsStager;
use tisys_bridge_core::synchronise::{synchronise, SynchroniseConfig};

const TOUR: &str = include_str!("fixtures/tour.xml");

fn config_in(dir: &Path, remote: Option<RemoteConfig>) -> SynchroniseConfig {
    SynchroniseConfig {
        remote,
        staging: StagingConfig {
            download_dir: dir.join("downloads"),
            output_dir: dir.join("parsed"),
            ..StagingConfig::default()
        },
        customers: CustomerTable::default(),
    }
}

fn remote() -> RemoteConfig {
    RemoteConfig {
        host: "localhost".to_string(),
        user: "edi".to_string(),
        password: "pw".to_string(),
        port: 2222,
        remote_path: "/outbox/".to_string(),
    }
}

#[tokio::test]
async fn full_run_fetches_purges_and_transforms() {
    let tmp = tempdir().unwrap();
    let config = config_in(tmp.path(), Some(remote()));

    let mut session = MockRemoteSession::new();
    session.expect_list().returning(|_| {
        Ok(vec![
            RemoteEntry::new("tour-1.xml", EntryKind::File),
            RemoteEntry::new("tour-2.xml", EntryKind::File),
        ])
    });
    session.expect_fetch().times(2).returning(|_, local| {
        fs::write(local, TOUR).unwrap();
        Ok(())
    });
    session.expect_delete().times(2).returning(|_| Ok(()));
    session.expect_disconnect().times(1).return_const(());

    let mut connector = MockRemoteConnector::new();
    connector
        .expect_connect()
        .times(1)
        .return_once(move |_| Ok(Box::new(session) as Box<dyn RemoteSession>));

    let report = synchronise(&config, &connector, &FsStager).await;

    let fetch = report.fetch.as_ref().expect("fetch stage should run");
    assert_eq!(fetch.purged, vec!["tour-1.xml", "tour-2.xml"]);
    let transform = report.transform.as_ref().expect("transform stage should run");
    assert_eq!(transform.transformed.len(), 2);
    assert_eq!(report.failure_count(), 0);

    let out_dir = &config.staging.output_dir;
    let first = fs::read_to_string(out_dir.join("transformed_tour-1.xml")).unwrap();
    let second = fs::read_to_string(out_dir.join("transformed_tour-2.xml")).unwrap();
    assert!(first.contains("<reference>T100</reference>"));
    // Same input, different documents: each gets its own reference.
    assert_ne!(first, second);
    assert!(fs::read_dir(&config.staging.download_dir)
        .unwrap()
        .next()
        .is_none());
}

#[tokio::test]
async fn connection_failure_still_processes_previously_staged_files() {
    let tmp = tempdir().unwrap();
    let config = config_in(tmp.path(), Some(remote()));
    fs::create_dir_all(&config.staging.download_dir).unwrap();
    fs::write(config.staging.download_dir.join("left-over.xml"), TOUR).unwrap();

    let mut connector = MockRemoteConnector::new();
    connector.expect_connect().times(1).returning(|cfg| {
        Err(TransferError::Connect {
            host: cfg.host.clone(),
            port: cfg.port,
            message: "connection refused".to_string(),
        })
    });

    let report = synchronise(&config, &connector, &FsStager).await;

    assert!(report.fetch.is_none());
    let transform = report.transform.expect("transform stage should run");
    assert_eq!(
        transform.transformed,
        vec![config.staging.output_dir.join("transformed_left-over.xml")]
    );
}

#[tokio::test]
async fn missing_remote_config_skips_fetch_without_connecting() {
    let tmp = tempdir().unwrap();
    let config = config_in(tmp.path(), None);

    let mut connector = MockRemoteConnector::new();
    connector.expect_connect().never();

    let report = synchronise(&config, &connector, &FsStager).await;
    assert!(report.fetch.is_none());
    let transform = report.transform.expect("transform stage should run");
    assert!(transform.transformed.is_empty());
}
