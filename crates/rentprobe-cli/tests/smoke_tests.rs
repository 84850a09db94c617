//! Smoke tests for the rentprobe CLI
//!
//! Each test spawns the binary and checks its exit status and output.

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn rentprobe() -> Command {
    let mut cmd = Command::cargo_bin("rentprobe").expect("rentprobe binary should exist");
    cmd.env_remove("RENTPROBE_CONFIG")
        .env_remove("RENTPROBE_BASE_URL")
        .env_remove("RENTPROBE_API_URL")
        .env_remove("RENTPROBE_HEADLESS")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    rentprobe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_commands() {
    rentprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("normalize"))
        .stdout(predicate::str::contains("parse-date"))
        .stdout(predicate::str::contains("demo"));
}

#[test]
fn test_no_args_fails() {
    rentprobe().assert().failure();
}

// ============================================================================
// normalize / parse-date
// ============================================================================

#[test]
fn test_normalize_location() {
    rentprobe()
        .args(["normalize", "  queenstown "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Queenstown (ZQN)"));
}

#[test]
fn test_normalize_unsupported_lists_values() {
    rentprobe()
        .args(["normalize", "Wellington"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Auckland, Christchurch, Queenstown"));
}

#[test]
fn test_normalize_rejects_prefix() {
    rentprobe().args(["normalize", "auck"]).assert().failure();
}

#[test]
fn test_list_countries() {
    rentprobe()
        .args(["normalize", "--kind", "country", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New Zealand (NZ)"))
        .stdout(predicate::str::contains("United Kingdom (GB)"));
}

#[test]
fn test_parse_date() {
    rentprobe()
        .args(["parse-date", "2026-11-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("November 2026"));
}

#[test]
fn test_parse_date_rejects_impossible_day() {
    rentprobe()
        .args(["parse-date", "2026-02-30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("2026-02-30"));
}

// ============================================================================
// search
// ============================================================================

#[test]
fn test_search_url() {
    rentprobe()
        .args([
            "search", "--pickup", "auckland", "--dropoff", "QueensTown", "--from", "2026-11-12", "--to", "2026-11-20",
            "--api-url", "https://api.rentals.test",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "https://api.rentals.test/search?pickUpLocation=AKL&dropOffLocation=ZQN",
        ));
}

#[test]
fn test_search_json() {
    rentprobe()
        .args([
            "search", "--pickup", "chch", "--from", "2026-11-12", "--to", "2026-11-20", "--licence", "uk", "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dropOffLocation\": \"CHC\""))
        .stdout(predicate::str::contains("\"driversLicenceCountry\": \"GB\""));
}

#[test]
fn test_search_rejects_backwards_range() {
    rentprobe()
        .args(["search", "--pickup", "Auckland", "--from", "2026-11-20", "--to", "2026-11-12"])
        .assert()
        .failure();
}

// ============================================================================
// demo
// ============================================================================

#[test]
fn test_demo_on_simulated_site() {
    rentprobe()
        .args([
            "demo", "--calendar-start", "2026-10", "--from", "2026-11-12", "--to", "2026-11-20", "--licence", "nz",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Auckland"))
        .stdout(predicate::str::contains("12 Nov 2026 - 20 Nov 2026"))
        .stdout(predicate::str::contains("New Zealand"))
        .stdout(predicate::str::contains("pickUpLocation=AKL"));
}

#[test]
fn test_demo_json_and_screenshot() {
    let dir = TempDir::new().unwrap();
    let shot = dir.path().join("form.txt");
    rentprobe()
        .args(["demo", "--calendar-start", "2026-10", "--from", "2027-03-01", "--to", "2027-03-02", "--json"])
        .arg("--screenshot")
        .arg(&shot)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"month_advances\": 4"));
    assert!(fs::read_to_string(&shot).unwrap().contains("Auckland"));
}

#[test]
fn test_demo_past_month_fails() {
    rentprobe()
        .args(["demo", "--calendar-start", "2026-10", "--from", "2026-08-01", "--to", "2026-08-03"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only moves forward"));
}

#[cfg(not(feature = "browser"))]
#[test]
fn test_demo_live_needs_browser_feature() {
    rentprobe()
        .args(["demo", "--live"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--features browser"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_defaults() {
    rentprobe()
        .args(["config", "--defaults"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url"))
        .stdout(predicate::str::contains("http://localhost:3000"))
        .stdout(predicate::str::contains("max_month_advances: 24"));
}

#[test]
fn test_config_file_and_env_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rentprobe.yaml");
    fs::write(&path, "base_url: https://staging.rentals.test\ncalendar:\n  max_month_advances: 6\n").unwrap();

    rentprobe()
        .args(["config", "--show", "--config"])
        .arg(&path)
        .env("RENTPROBE_API_URL", "https://api.staging.rentals.test")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://staging.rentals.test"))
        .stdout(predicate::str::contains("https://api.staging.rentals.test"))
        .stdout(predicate::str::contains("max_month_advances: 6"));
}

#[test]
fn test_config_validate_rejects_bad_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rentprobe.yaml");
    fs::write(&path, "base_url: localhost\n").unwrap();

    rentprobe()
        .args(["config", "--validate", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url"));
}

// ============================================================================
// load
// ============================================================================

#[test]
fn test_load_rejects_bad_duration() {
    rentprobe()
        .args(["load", "--duration", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid duration"));
}

#[test]
fn test_load_rejects_huge_duration() {
    rentprobe()
        .args(["load", "--duration", "6000000000000000h"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid duration"));
}

#[test]
fn test_load_rejects_unsupported_pickup() {
    rentprobe()
        .args(["load", "--duration", "1s", "--pickup", "Wellington"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wellington"));
}
