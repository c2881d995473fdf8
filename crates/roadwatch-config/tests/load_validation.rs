//! Config load validation tests for roadwatch-config.
// crates/roadwatch-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (size, encoding, values).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use roadwatch_config::ConfigError;
use roadwatch_config::RoadwatchConfig;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<RoadwatchConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(content: &str) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content.as_bytes()).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_missing_explicit_file() -> TestResult {
    let path = Path::new("does-not-exist.toml");
    assert_invalid(RoadwatchConfig::load(Some(path)), "config file not found")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(RoadwatchConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(RoadwatchConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let file = write_config("region = {")?;
    assert_invalid(RoadwatchConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_rejects_inverted_region() -> TestResult {
    let file = write_config("[region]\nmin_x = 100.0\nmax_x = 50.0\n")?;
    assert_invalid(RoadwatchConfig::load(Some(file.path())), "region bounds")?;
    Ok(())
}

#[test]
fn load_rejects_zero_area_region() -> TestResult {
    let file = write_config("[region]\nmin_y = 160000.0\nmax_y = 160000.0\n")?;
    assert_invalid(RoadwatchConfig::load(Some(file.path())), "region bounds")?;
    Ok(())
}

#[test]
fn load_rejects_empty_allow_list() -> TestResult {
    let file = write_config("[jurisdiction]\nallowed = []\n")?;
    assert_invalid(RoadwatchConfig::load(Some(file.path())), "jurisdiction.allowed")?;
    Ok(())
}

#[test]
fn load_rejects_non_http_endpoint() -> TestResult {
    let file = write_config("[permits]\nwfs_url = \"ftp://example.test/wfs\"\n")?;
    assert_invalid(RoadwatchConfig::load(Some(file.path())), "permits.wfs_url")?;
    Ok(())
}

#[test]
fn load_rejects_zero_lookback() -> TestResult {
    let file = write_config("[permits]\nlookback_days = 0\n")?;
    assert_invalid(RoadwatchConfig::load(Some(file.path())), "permits.lookback_days")?;
    Ok(())
}

#[test]
fn load_rejects_timeout_out_of_range() -> TestResult {
    let file = write_config("[jurisdiction]\nlookup_timeout_ms = 1\n")?;
    assert_invalid(
        RoadwatchConfig::load(Some(file.path())),
        "jurisdiction.lookup_timeout_ms",
    )?;
    Ok(())
}

#[test]
fn load_rejects_link_base_without_trailing_slash() -> TestResult {
    let file = write_config("[publication]\nlink_base = \"https://permits.example.test\"\n")?;
    assert_invalid(RoadwatchConfig::load(Some(file.path())), "publication.link_base")?;
    Ok(())
}

#[test]
fn load_rejects_negative_erosion_tolerance() -> TestResult {
    let file = write_config("[pipeline]\nerosion_tolerance = -1.0\n")?;
    assert_invalid(RoadwatchConfig::load(Some(file.path())), "pipeline.erosion_tolerance")?;
    Ok(())
}

#[test]
fn load_accepts_partial_override() -> TestResult {
    let file = write_config("[permits]\nlookback_days = 30\n")?;
    let config = RoadwatchConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.permits.lookback_days != 30 {
        return Err("lookback_days override not applied".to_string());
    }
    if config.permits.layers.len() != 2 {
        return Err("unrelated defaults must survive a partial override".to_string());
    }
    Ok(())
}
