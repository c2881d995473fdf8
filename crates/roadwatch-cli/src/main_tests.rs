// crates/roadwatch-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Argument Tests
// Description: Unit tests for argument parsing and config overrides.
// Purpose: Ensure command-line overrides land on the right config fields.
// Dependencies: roadwatch-cli main helpers
// ============================================================================

//! ## Overview
//! Validates that the flags accepted by the monitor map onto the loaded
//! configuration and that state recovery degrades cleanly.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use roadwatch_config::RoadwatchConfig;
use roadwatch_core::PendingQueue;
use roadwatch_core::StateStore;
use roadwatch_core::StoreError;

use super::Cli;
use super::apply_overrides;
use super::recover_state;
use super::report_checkpoint_failure;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn parses_all_flags() {
    let cli = Cli::parse_from([
        "roadwatch",
        "--config",
        "custom.toml",
        "--roads-dir",
        "inventory",
        "--output",
        "artifacts",
        "--days",
        "30",
    ]);
    assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    assert_eq!(cli.roads_dir, Some(PathBuf::from("inventory")));
    assert_eq!(cli.output, Some(PathBuf::from("artifacts")));
    assert_eq!(cli.days, Some(30));
}

#[test]
fn flags_default_to_absent() {
    let cli = Cli::parse_from(["roadwatch"]);
    assert!(cli.config.is_none());
    assert!(cli.roads_dir.is_none());
    assert!(cli.output.is_none());
    assert!(cli.days.is_none());
}

#[test]
fn overrides_land_on_config_fields() {
    let cli = Cli::parse_from([
        "roadwatch",
        "--roads-dir",
        "inventory",
        "--output",
        "artifacts",
        "--days",
        "7",
    ]);
    let mut config = RoadwatchConfig::default();

    apply_overrides(&mut config, &cli);

    assert_eq!(config.state.roads_dir, PathBuf::from("inventory"));
    assert_eq!(config.state.output_dir, PathBuf::from("artifacts"));
    assert_eq!(config.state.matches_path(), PathBuf::from("artifacts/matches.json"));
    assert_eq!(config.permits.lookback_days, 7);
}

#[test]
fn absent_flags_leave_config_untouched() {
    let cli = Cli::parse_from(["roadwatch"]);
    let mut config = RoadwatchConfig::default();
    let before_days = config.permits.lookback_days;

    apply_overrides(&mut config, &cli);

    assert_eq!(config.state.roads_dir, PathBuf::from("roads"));
    assert_eq!(config.permits.lookback_days, before_days);
}

#[test]
fn recover_state_passes_loaded_state_through() {
    let queue = PendingQueue::new();
    let recovered = recover_state(Ok(queue.clone()), "pending queue").unwrap();
    assert_eq!(recovered, queue);
}

#[test]
fn recover_state_degrades_corrupt_state_to_empty() {
    let failure: Result<PendingQueue, StoreError> = Err(StoreError::Malformed {
        path: PathBuf::from("pending_intersections.json"),
        message: "truncated".to_string(),
    });
    let recovered = recover_state(failure, "pending queue").unwrap();
    assert!(recovered.is_empty());
}

#[test]
fn checkpoint_failure_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();
    let store =
        StateStore::new(blocker.join("pending.json"), dir.path().join("matches.json"));

    let failed = store.save_pending(&PendingQueue::new());
    assert!(failed.is_err());
    assert!(report_checkpoint_failure(failed, "pending queue").is_ok());
}

#[test]
fn checkpoint_success_passes_through() {
    assert!(report_checkpoint_failure(Ok(()), "pending queue").is_ok());
}
