// crates/roadwatch-cli/src/main.rs
// ============================================================================
// Module: Roadwatch CLI Entry Point
// Description: Single-run orchestrator for the intersection monitor.
// Purpose: Wire configuration, providers, and pipeline stages into one run.
// Dependencies: clap, roadwatch-config, roadwatch-core, roadwatch-providers, roadwatch-render
// ============================================================================

//! ## Overview
//! One invocation is one monitoring run: load persisted state, load the road
//! inventory, fetch recent permits, discover new overlaps, validate pending
//! entries against the publication register, persist state, and print a run
//! summary. Setup failures exit non-zero before any persisted state is
//! touched; a run that completes with zero matches exits zero.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use roadwatch_config::RoadwatchConfig;
use roadwatch_core::DiscoveryReport;
use roadwatch_core::DiscoveryStage;
use roadwatch_core::IntersectionEngine;
use roadwatch_core::PermitSource;
use roadwatch_core::RoadSource;
use roadwatch_core::RunSummary;
use roadwatch_core::SkipReason;
use roadwatch_core::StateStore;
use roadwatch_core::StoreError;
use roadwatch_core::ValidationStage;
use roadwatch_providers::GeoJsonRoadSource;
use roadwatch_providers::HeaderPublicationChecker;
use roadwatch_providers::JurisdictionLookupConfig;
use roadwatch_providers::PublicationCheckConfig;
use roadwatch_providers::WfsJurisdictionResolver;
use roadwatch_providers::WfsPermitConfig;
use roadwatch_providers::WfsPermitSource;
use roadwatch_render::LeafletMapRenderer;
use thiserror::Error;
use time::Duration;
use time::OffsetDateTime;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "roadwatch", version, about = "Permit/protected-road intersection monitor")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Directory holding the protected-road inventory files.
    #[arg(long = "roads-dir", value_name = "DIR")]
    roads_dir: Option<PathBuf>,
    /// Directory receiving match artifacts and the matches store.
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,
    /// Days of permit decisions to fetch.
    #[arg(long, value_name = "DAYS")]
    days: Option<u16>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying one operator-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Parses arguments, loads configuration, and executes one run.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let mut config = RoadwatchConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    apply_overrides(&mut config, &cli);
    config.validate().map_err(|err| CliError::new(err.to_string()))?;
    execute(&config)
}

/// Applies command-line overrides onto the loaded configuration.
fn apply_overrides(config: &mut RoadwatchConfig, cli: &Cli) {
    if let Some(roads_dir) = &cli.roads_dir {
        config.state.roads_dir.clone_from(roads_dir);
    }
    if let Some(output) = &cli.output {
        config.state.output_dir.clone_from(output);
    }
    if let Some(days) = cli.days {
        config.permits.lookback_days = days;
    }
}

// ============================================================================
// SECTION: Run Orchestration
// ============================================================================

/// Executes one full monitoring run against the given configuration.
fn execute(config: &RoadwatchConfig) -> CliResult<ExitCode> {
    let store =
        StateStore::new(config.state.pending_file.clone(), config.state.matches_path());
    let mut matches = recover_state(store.load_matches(), "matches store")?;
    let pending_loaded = recover_state(store.load_pending(), "pending queue")?;
    let loaded_matches = matches.len();
    let loaded_pending = pending_loaded.len();

    let inventory = GeoJsonRoadSource::new(config.state.roads_dir.clone())
        .load(&config.region.bounds())
        .map_err(|err| CliError::new(err.to_string()))?;
    for note in &inventory.skipped_files {
        write_stderr_line(&format!("warning: road inventory file skipped ({note})"))
            .map_err(|err| CliError::new(format!("stderr write failed: {err}")))?;
    }
    let roads = inventory.records;

    let permit_source = WfsPermitSource::new(WfsPermitConfig {
        endpoint: config.permits.wfs_url.clone(),
        layers: config.permits.layers.clone(),
        timeout_ms: config.permits.fetch_timeout_ms,
        ..WfsPermitConfig::default()
    })
    .map_err(|err| CliError::new(err.to_string()))?;
    let now = OffsetDateTime::now_utc();
    let since = now
        .date()
        .checked_sub(Duration::days(i64::from(config.permits.lookback_days)))
        .unwrap_or_else(|| now.date());
    let permits = permit_source
        .fetch(&config.region.bounds(), since)
        .map_err(|err| CliError::new(err.to_string()))?;

    let resolver = WfsJurisdictionResolver::new(JurisdictionLookupConfig {
        endpoint: config.jurisdiction.wfs_url.clone(),
        layer: config.jurisdiction.layer.clone(),
        name_property: config.jurisdiction.name_property.clone(),
        timeout_ms: config.jurisdiction.lookup_timeout_ms,
        ..JurisdictionLookupConfig::default()
    })
    .map_err(|err| CliError::new(err.to_string()))?;
    let checker = HeaderPublicationChecker::new(PublicationCheckConfig {
        header_url: config.publication.header_url.clone(),
        link_base: config.publication.link_base.clone(),
        timeout_ms: config.publication.lookup_timeout_ms,
        ..PublicationCheckConfig::default()
    })
    .map_err(|err| CliError::new(err.to_string()))?;
    let renderer = LeafletMapRenderer::default();

    let engine = IntersectionEngine::new(config.pipeline.erosion_tolerance);
    let outcome = engine.pairs(&permits, &roads);

    let allowed: BTreeSet<String> = config.jurisdiction.allowed.iter().cloned().collect();
    let mut pending = pending_loaded;
    let discovery_report = DiscoveryStage::new(&resolver, &allowed).run(
        &permits,
        &roads,
        &outcome,
        &mut pending,
        &matches,
        now,
    );
    if discovery_report.added > 0 {
        report_checkpoint_failure(store.save_pending(&pending), "pending queue")?;
    }

    let stage = ValidationStage::new(
        &checker,
        &renderer,
        &config.publication.link_base,
        &config.state.output_dir,
    );
    let (still_pending, validation_report) = stage.run(pending, &mut matches, now);
    let pending_saved = store.save_pending(&still_pending);
    let matches_saved = store.save_matches(&matches);
    pending_saved.map_err(|err| CliError::new(err.to_string()))?;
    matches_saved.map_err(|err| CliError::new(err.to_string()))?;

    let summary = RunSummary {
        loaded_matches,
        loaded_pending,
        roads_loaded: roads.len(),
        road_files_skipped: inventory.skipped_files.len(),
        permits_fetched: permits.len(),
        new_pending: discovery_report.added,
        newly_validated: validation_report.validated,
        remaining_pending: still_pending.len(),
        total_matches: matches.len(),
    };
    print_summary(&summary, &discovery_report, &validation_report.validated_projects)?;
    Ok(ExitCode::SUCCESS)
}

/// Recovers loadable state, degrading corrupt or unreadable state to empty.
fn recover_state<T: Default>(result: Result<T, StoreError>, label: &str) -> CliResult<T> {
    match result {
        Ok(state) => Ok(state),
        Err(err) => {
            write_stderr_line(&format!("warning: {label} unusable ({err}); starting empty"))
                .map_err(|err| CliError::new(format!("stderr write failed: {err}")))?;
            Ok(T::default())
        }
    }
}

/// Reports a mid-run checkpoint write failure and lets the run continue.
///
/// The in-memory state remains authoritative; the end-of-run saves retry the
/// write and are the ones that fail the run.
fn report_checkpoint_failure(result: Result<(), StoreError>, label: &str) -> CliResult<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err) => write_stderr_line(&format!(
            "warning: {label} checkpoint not written ({err}); continuing with in-memory state"
        ))
        .map_err(|err| CliError::new(format!("stderr write failed: {err}"))),
    }
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Prints the operator-facing run summary.
fn print_summary(
    summary: &RunSummary,
    discovery: &DiscoveryReport,
    validated_projects: &[String],
) -> CliResult<()> {
    let mut lines = vec![
        format!("roads loaded: {}", summary.roads_loaded),
        format!("permits fetched: {}", summary.permits_fetched),
    ];
    if summary.road_files_skipped > 0 {
        lines.push(format!("road files skipped: {}", summary.road_files_skipped));
    }
    lines.extend([
        format!("candidate pairs: {}", discovery.pairs_seen),
        format!(
            "pending: {} loaded, {} new, {} remaining",
            summary.loaded_pending, summary.new_pending, summary.remaining_pending
        ),
        format!(
            "matches: {} loaded, {} new, {} total",
            summary.loaded_matches, summary.newly_validated, summary.total_matches
        ),
    ]);
    for reason in [
        SkipReason::MissingProjectNumber,
        SkipReason::AlreadyKnown,
        SkipReason::DegenerateGeometry,
        SkipReason::JurisdictionNotAllowed,
    ] {
        let count = discovery.skipped(reason);
        if count > 0 {
            lines.push(format!("skipped ({}): {count}", reason.as_str()));
        }
    }
    if !validated_projects.is_empty() {
        lines.push(format!("validated projects: {}", validated_projects.join(", ")));
    }
    for line in lines {
        write_stdout_line(&line)
            .map_err(|err| CliError::new(format!("stdout write failed: {err}")))?;
    }
    Ok(())
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
