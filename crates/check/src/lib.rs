//! `sapcc-check` library crate.
//!
//! Wires the threshold model to a command-line runner: configuration from
//! the environment, overrides from a JSON file, samples from JSON lines,
//! verdicts to stdout. The binary entrypoint lives in `main.rs`.

pub mod config;
pub mod input;
pub mod output;

use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Context;
use chrono::Utc;

use sapcc_core::config::parse_overrides;
use sapcc_core::defaults::default_set;
use sapcc_core::evaluator::Evaluator;
use sapcc_core::set::ThresholdSet;
use sapcc_core::types::EntityId;
use sapcc_core::verdict::Verdict;

use config::CheckConfig;

/// Counters from one run, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub samples: usize,
    pub rejected: usize,
    pub entities: usize,
    pub worst: Verdict,
}

/// Read and validate an override document from disk.
pub fn load_overrides(path: &Path) -> anyhow::Result<HashMap<EntityId, ThresholdSet>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read overrides file {}", path.display()))?;
    let overrides = parse_overrides(&json)
        .with_context(|| format!("Invalid overrides file {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        entity_count = overrides.len(),
        "Loaded threshold overrides",
    );
    Ok(overrides)
}

/// Evaluate every sample in `input` and write the verdicts to `out`.
///
/// A metric with no rule anywhere aborts the run: silently reporting it as
/// healthy would hide a coverage gap.
pub fn run<R, W>(config: &CheckConfig, input: R, out: &mut W) -> anyhow::Result<RunSummary>
where
    R: BufRead,
    W: Write,
{
    let evaluator = Evaluator::new(default_set());
    if let Some(path) = &config.overrides_file {
        evaluator.reload(load_overrides(path)?);
    }

    let batch = input::read_samples(input, Utc::now()).context("Failed to read samples")?;
    let reports = evaluator
        .report_batch(&batch.samples)
        .context("Threshold configuration is incomplete")?;

    output::render(config.output, &reports, out).context("Failed to write verdicts")?;

    let summary = RunSummary {
        samples: batch.samples.len(),
        rejected: batch.rejected,
        entities: reports.len(),
        worst: Verdict::worst(reports.iter().map(|r| r.state())),
    };
    tracing::info!(
        samples = summary.samples,
        rejected = summary.rejected,
        entities = summary.entities,
        worst = %summary.worst,
        "Check run complete",
    );
    Ok(summary)
}
