use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const TOUR: &str = include_str!("fixtures/tour.xml");

const FTP_VARS: [&str; 5] = [
    "FTP_HOST",
    "FTP_USER",
    "FTP_PASSWORD",
    "FTP_PORT",
    "FTP_REMOTE_PATH",
];

/// Creates a workspace with a config file pointing at its own staging dirs.
fn workspace() -> (TempDir, std::path::PathBuf) {
    let tmp = tempdir().expect("tempdir");
    let config = tmp.path().join("tisys-bridge.yaml");
    fs::write(
        &config,
        format!(
            "staging:\n  download_dir: {}\n  output_dir: {}\n",
            tmp.path().join("downloads").display(),
            tmp.path().join("parsed").display()
        ),
    )
    .expect("Writing temp config failed");
    fs::create_dir_all(tmp.path().join("downloads")).unwrap();
    (tmp, config)
}

fn bridge(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tisys-bridge").expect("Binary exists");
    cmd.current_dir(cwd);
    for var in FTP_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_lists_commands() {
    let tmp = tempdir().unwrap();
    bridge(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("run")
                .and(predicate::str::contains("fetch"))
                .and(predicate::str::contains("transform"))
                .and(predicate::str::contains("map")),
        );
}

#[test]
fn map_prints_import_document() {
    let (tmp, _config) = workspace();
    let input = tmp.path().join("tour.xml");
    fs::write(&input, TOUR).unwrap();

    bridge(tmp.path())
        .arg("map")
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with("<?xml")
                .and(predicate::str::contains(
                    "<customer_id matchmode=\"1\">KR</customer_id>",
                ))
                .and(predicate::str::contains("<reference>T100</reference>")),
        );

    // map never deletes its input
    assert!(input.exists());
}

#[test]
fn map_fails_on_malformed_structure() {
    let (tmp, _config) = workspace();
    let input = tmp.path().join("bad.xml");
    fs::write(&input, "<tisys><tour/></tisys>").unwrap();

    bridge(tmp.path())
        .arg("map")
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to map"));
}

#[test]
fn transform_processes_staged_files() {
    let (tmp, config) = workspace();
    fs::write(tmp.path().join("downloads").join("t1.xml"), TOUR).unwrap();

    bridge(tmp.path())
        .arg("transform")
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let output = tmp.path().join("parsed").join("transformed_t1.xml");
    let written = fs::read_to_string(output).expect("transformed file should exist");
    assert!(written.contains("<pickupaddress>"));
    assert!(!tmp.path().join("downloads").join("t1.xml").exists());
}

#[test]
fn run_without_remote_env_still_transforms_and_exits_zero() {
    let (tmp, config) = workspace();
    fs::write(tmp.path().join("downloads").join("left.xml"), TOUR).unwrap();
    fs::write(tmp.path().join("downloads").join("broken.xml"), "<tisys>").unwrap();

    bridge(tmp.path())
        .arg("run")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("FTP_HOST"));

    assert!(tmp
        .path()
        .join("parsed")
        .join("transformed_left.xml")
        .exists());
    assert!(!tmp
        .path()
        .join("parsed")
        .join("transformed_broken.xml")
        .exists());
}

#[test]
fn invalid_config_file_fails() {
    let tmp = tempdir().unwrap();
    let config = tmp.path().join("broken.yaml");
    fs::write(&config, "staging: 42\n").unwrap();

    bridge(tmp.path())
        .arg("transform")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure();
}
