//! End-to-end tests for the check runner: overrides file on disk, samples
//! as JSON lines, verdicts on the output writer.

use std::io::Write;

use sapcc_check::config::{CheckConfig, OutputFormat};
use sapcc_check::{load_overrides, run};
use sapcc_core::verdict::Verdict;

fn overrides_file(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file should be created");
    file.write_all(json.as_bytes()).expect("write should succeed");
    file
}

fn run_to_string(config: &CheckConfig, input: &str) -> (anyhow::Result<sapcc_check::RunSummary>, String) {
    let mut out = Vec::new();
    let result = run(config, input.as_bytes(), &mut out);
    (result, String::from_utf8(out).expect("output should be UTF-8"))
}

const SAMPLES: &str = r#"{"entity_id":"SA2","metric":"tunnel-connection-age","value":5000}
{"entity_id":"SA3","metric":"tunnel-connection-age","value":5000}
{"entity_id":"SA1","metric":"tunnel-connections","value":35}
"#;

// ---------------------------------------------------------------------------
// Test: defaults only
// ---------------------------------------------------------------------------

/// Without an overrides file every subaccount uses the built-in thresholds.
#[test]
fn defaults_only_run() {
    let (result, out) = run_to_string(&CheckConfig::default(), SAMPLES);
    let summary = result.expect("run should succeed");

    assert_eq!(summary.samples, 3);
    assert_eq!(summary.entities, 3);
    assert_eq!(summary.worst, Verdict::Warn);

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("1 \"Subaccount SA1\""));
    assert!(lines[1].starts_with("0 \"Subaccount SA2\""));
    assert!(lines[2].starts_with("0 \"Subaccount SA3\""));
}

// ---------------------------------------------------------------------------
// Test: per-subaccount overrides
// ---------------------------------------------------------------------------

/// An override for SA2 changes its verdict but leaves SA3 on the defaults.
#[test]
fn override_file_applies_per_subaccount() {
    let file = overrides_file(
        r#"{ "entities": { "SA2": { "tunnel-connection-age": { "warn_high": 3600, "crit_high": 7200 } } } }"#,
    );
    let config = CheckConfig {
        overrides_file: Some(file.path().to_path_buf()),
        output: OutputFormat::Json,
    };

    let (result, out) = run_to_string(&config, SAMPLES);
    result.expect("run should succeed");

    let reports: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line should be JSON"))
        .collect();
    assert_eq!(reports.len(), 3);

    let verdict_of = |entity: &str| {
        reports
            .iter()
            .find(|r| r["entity_id"] == entity)
            .map(|r| r["verdict"].clone())
            .expect("entity should be reported")
    };
    assert_eq!(verdict_of("SA1"), "warn");
    assert_eq!(verdict_of("SA2"), "warn");
    assert_eq!(verdict_of("SA3"), "ok");
}

/// Legacy Check_MK parameter keys and tuples are accepted in the file.
#[test]
fn legacy_override_keys_are_accepted() {
    let file = overrides_file(r#"{ "entities": { "SA1": { "conn_num_levels": [50, 60, 1, 0] } } }"#);
    let overrides = load_overrides(file.path()).expect("legacy document should load");
    let set = &overrides["SA1"];
    assert!(set.contains("tunnel-connections"));
}

// ---------------------------------------------------------------------------
// Test: configuration errors surface to the operator
// ---------------------------------------------------------------------------

/// A misordered tuple in the overrides file fails the run before any output.
#[test]
fn invalid_overrides_fail_the_run() {
    let file = overrides_file(r#"{ "entities": { "SA1": { "tunnel-connections": [40, 30, 0, 0] } } }"#);
    let config = CheckConfig {
        overrides_file: Some(file.path().to_path_buf()),
        output: OutputFormat::Text,
    };

    let (result, out) = run_to_string(&config, SAMPLES);
    let err = result.expect_err("misordered bounds should be rejected");
    assert!(format!("{err:#}").contains("Invalid bound order"));
    assert!(out.is_empty());
}

/// A missing overrides file is reported with its path.
#[test]
fn missing_overrides_file_is_reported() {
    let config = CheckConfig {
        overrides_file: Some("/nonexistent/sapcc-overrides.json".into()),
        output: OutputFormat::Text,
    };
    let (result, _) = run_to_string(&config, SAMPLES);
    let err = result.expect_err("missing file should fail");
    assert!(format!("{err:#}").contains("/nonexistent/sapcc-overrides.json"));
}

/// A metric without any rule aborts the run instead of reporting OK.
#[test]
fn unknown_metric_fails_the_run() {
    let input = r#"{"entity_id":"SA1","metric":"cpu-load","value":1}"#;
    let (result, out) = run_to_string(&CheckConfig::default(), input);
    let err = result.expect_err("unknown metric should fail");
    assert!(format!("{err:#}").contains("Unknown metric 'cpu-load'"));
    assert!(out.is_empty());
}

// ---------------------------------------------------------------------------
// Test: malformed samples are skipped at the boundary
// ---------------------------------------------------------------------------

/// Non-numeric values are counted and skipped; the rest is still evaluated.
#[test]
fn malformed_samples_are_skipped() {
    let input = r#"{"entity_id":"SA1","metric":"tunnel-connections","value":"many"}
{"entity_id":"SA1","metric":"tunnel-connections","value":45}
"#;
    let (result, out) = run_to_string(&CheckConfig::default(), input);
    let summary = result.expect("run should succeed");
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.samples, 1);
    assert_eq!(summary.worst, Verdict::Crit);
    assert!(out.starts_with("2 \"Subaccount SA1\""));
}

/// An entity id that would split the service line is rejected, so no extra
/// service can be injected into the output.
#[test]
fn entity_id_cannot_inject_service_lines() {
    let input = r#"{"entity_id":"SA1\" x\n2 \"Subaccount FORGED","metric":"tunnel-connections","value":10}
{"entity_id":"SA2","metric":"tunnel-connections","value":10}
"#;
    let (result, out) = run_to_string(&CheckConfig::default(), input);
    let summary = result.expect("run should succeed");
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.entities, 1);
    assert_eq!(out.lines().count(), 1);
    assert!(out.starts_with("0 \"Subaccount SA2\""));
    assert!(!out.contains("FORGED"));
}
