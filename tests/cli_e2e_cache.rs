//! End-to-end tests for the cache command.
//!
//! These tests invoke the CLI binary and validate cache inspection and
//! cleanup from a user's perspective.

mod common;

use std::time::Duration;

use common::prelude::*;

const CENTOS: &[(&str, &[(&str, &str)])] = &[("released", &[("8.5", "http://h/8.5")])];
const RHEL: &[(&str, &[(&str, &str)])] = &[("latest", &[("8.6", "http://h/8.6")])];

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_cache_help() {
    let mut cmd = cargo_bin_cmd!("repo-roots");

    cmd.arg("cache")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage the on-disk catalog cache"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_cache_list_empty() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["cache", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cached records found"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_cache_list_table() {
    let fixture = TestFixture::new().with_records("CentOS", CENTOS);

    fixture
        .command()
        .args(["cache", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("released-x86_64"))
        .stdout(predicate::str::contains("fresh"))
        .stdout(predicate::str::contains("Total: 2 cached records"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_cache_list_json() {
    let fixture = TestFixture::new()
        .with_records("CentOS", CENTOS)
        .with_records("RHEL", RHEL);

    let output = fixture.command().args(["cache", "list", "--json"]).output().unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0]["provider"], "CentOS");
    assert_eq!(records[0]["name"], "released");
    assert_eq!(records[0]["entries"], 1);
    assert_eq!(records[0]["fresh"], true);
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_cache_clean_requires_filter() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["cache", "clean"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("At least one filter must be specified"))
        .stderr(predicate::str::contains("--stale"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_cache_clean_dry_run_keeps_records() {
    let fixture = TestFixture::new().with_records("CentOS", CENTOS);

    fixture
        .command()
        .args(["cache", "clean", "--all", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CentOS/released"))
        .stdout(predicate::str::contains("Dry run mode"));

    assert!(fixture.cache_root().join("CentOS/released.json").exists());
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_cache_clean_stale_only() {
    let fixture = TestFixture::new().with_records("CentOS", CENTOS);
    let expired = fixture.cache_root().join("CentOS/released.json");
    age_record(&expired, Duration::from_secs(30 * 3600));

    fixture
        .command()
        .args(["cache", "clean", "--stale"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 records"));

    assert!(!expired.exists());
    assert!(fixture.cache_root().join("CentOS/released-x86_64.json").exists());
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_cache_clean_by_provider() {
    let fixture = TestFixture::new()
        .with_records("CentOS", CENTOS)
        .with_records("RHEL", RHEL);

    fixture
        .command()
        .args(["cache", "clean", "--all", "--provider", "rhel"])
        .assert()
        .success();

    assert!(!fixture.cache_root().join("RHEL/latest.json").exists());
    assert!(!fixture.cache_root().join("RHEL/latest-x86_64.json").exists());
    assert!(fixture.cache_root().join("CentOS/released.json").exists());
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_cache_clean_unknown_provider() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["cache", "clean", "--all", "--provider", "gentoo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown provider: gentoo"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_cache_root_from_environment() {
    let fixture = TestFixture::new().with_records("CentOS", CENTOS);
    let mut cmd = cargo_bin_cmd!("repo-roots");

    cmd.env("REPO_ROOTS_CACHE", fixture.cache_root())
        .env("REPO_ROOTS_CONFIG", fixture.config_path())
        .args(["cache", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CentOS"));
}
