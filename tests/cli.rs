//! Command-line tests running the binary against the fixtures in `tests/data`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

mod common;

use common::data_path;

const ENV_VARS: [&str; 13] = [
    "METADATA_LOCATIONS",
    "CREATORS_LOCATIONS",
    "CONTRIBUTORS_LOCATIONS",
    "VERSION",
    "ISSUED",
    "LOG_LEVEL",
    "LOG_FILE",
    "CODEMETA_PATH",
    "DATACITE_PATH",
    "CFF_PATH",
    "RADAR_EMAIL",
    "RADAR_BACKLINK",
    "RADAR_PATH",
];

/// The binary with a clean environment, run from a scratch directory so no
/// `.env` file is picked up.
fn command(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("codemeta-crosswalk").expect("Binary exists");
    cmd.current_dir(dir.path());
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn cli_codemeta_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    command(&dir)
        .args(["--metadata-location", data_path("codemeta_test.json").as_str()])
        .args(["--creators-location", data_path("authors_test.json").as_str()])
        .args(["--issued", "2024-07-01", "--version", "2.0"])
        .arg("codemeta")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"dateModified\": \"2024-07-01\"")
                .and(predicate::str::contains("\"version\": \"2.0\""))
                .and(predicate::str::contains("\"name\": \"Alan Turing\"")),
        );
}

#[test]
fn cli_cff_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("CITATION.cff");

    command(&dir)
        .args(["--metadata-location", data_path("codemeta_test.json").as_str()])
        .args(["--issued", "2024-07-01"])
        .arg("cff")
        .arg("--cff-path")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let text = fs::read_to_string(&target).expect("CFF file was not written");
    assert!(text.starts_with("cff-version: 1.2.0\n"));
    assert!(text.contains("title: Simulation Toolkit"));
    assert!(text.contains("date-released: 2024-07-01"));
}

#[test]
fn cli_datacite_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let locations = format!(
        "{} {}",
        data_path("codemeta_test.json"),
        data_path("codemeta_overlay.yml")
    );

    command(&dir)
        .env("METADATA_LOCATIONS", locations)
        .env("ISSUED", "2023-12-24")
        .arg("datacite")
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>")
                .and(predicate::str::contains("<publicationYear>2023</publicationYear>"))
                .and(predicate::str::contains("<version>1.1</version>")),
        );
}

#[test]
fn cli_radar_requires_email() {
    let dir = tempfile::tempdir().unwrap();
    command(&dir)
        .args(["--metadata-location", data_path("codemeta_test.json").as_str()])
        .args(["radar", "--radar-backlink", "https://example.org/toolkit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--radar-email"));
}

#[test]
fn cli_radar_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    command(&dir)
        .args(["--metadata-location", data_path("codemeta_test.json").as_str()])
        .args(["--issued", "2024-05-01"])
        .args(["radar", "--radar-email", "data@example.org"])
        .args(["--radar-backlink", "https://example.org/toolkit"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"responsibleEmail\": \"data@example.org\"")
                .and(predicate::str::contains("\"publishDate\": 1714521600")),
        );
}

#[test]
fn cli_missing_metadata_location() {
    let dir = tempfile::tempdir().unwrap();
    command(&dir)
        .arg("cff")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--metadata-location"));
}

#[test]
fn cli_invalid_issued_date() {
    let dir = tempfile::tempdir().unwrap();
    command(&dir)
        .args(["--metadata-location", data_path("codemeta_test.json").as_str()])
        .args(["--issued", "01.05.2024"])
        .arg("cff")
        .assert()
        .failure()
        .stderr(predicate::str::contains("01.05.2024"));
}

#[test]
fn cli_unreadable_source_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("datacite.xml");

    command(&dir)
        .args(["--metadata-location", data_path("missing.json").as_str()])
        .arg("datacite")
        .arg("--datacite-path")
        .arg(&target)
        .assert()
        .failure();

    assert!(!target.exists());
}

#[test]
fn cli_log_file_receives_records() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("crosswalk.log");

    command(&dir)
        .args(["--metadata-location", data_path("codemeta_test.json").as_str()])
        .args(["--log-level", "info", "--log-file"])
        .arg(&log)
        .arg("codemeta")
        .assert()
        .success();

    let text = fs::read_to_string(&log).expect("Log file was not written");
    assert!(text.contains("merging codemeta source"));
}
