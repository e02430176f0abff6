//! Sample ingestion from JSON lines.
//!
//! Each non-empty line is one sample:
//!
//! ```json
//! {"entity_id": "SA1", "metric": "tunnel-connections", "value": 35, "timestamp": "2024-05-01T12:00:00Z"}
//! ```
//!
//! `timestamp` is optional and defaults to the time of reading. Lines that
//! are not valid samples are logged and skipped so one bad record does not
//! hide the rest of a collection run.

use std::io::BufRead;

use serde::Deserialize;

use sapcc_core::evaluator::Sample;
use sapcc_core::metric_names::canonical_metric_name;
use sapcc_core::types::{check_entity_id, Timestamp};

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Invalid sample record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed value for {entity_id}/{metric}: {reason}")]
    MalformedValue {
        entity_id: String,
        metric: String,
        reason: String,
    },

    #[error("Invalid entity id {entity_id:?}: {reason}")]
    InvalidEntityId { entity_id: String, reason: String },

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct RawSample {
    entity_id: String,
    #[serde(alias = "metric_name")]
    metric: String,
    #[serde(default)]
    value: serde_json::Value,
    timestamp: Option<Timestamp>,
}

/// Parse one sample record. Metric names are canonicalized so legacy
/// parameter keys work here too.
pub fn parse_sample_line(line: &str, now: Timestamp) -> Result<Sample, InputError> {
    let raw: RawSample = serde_json::from_str(line)?;
    check_entity_id(&raw.entity_id).map_err(|reason| InputError::InvalidEntityId {
        entity_id: raw.entity_id.clone(),
        reason: reason.to_string(),
    })?;
    let malformed = |reason: &str| InputError::MalformedValue {
        entity_id: raw.entity_id.clone(),
        metric: raw.metric.clone(),
        reason: reason.to_string(),
    };

    let value = match &raw.value {
        serde_json::Value::Null => return Err(malformed("value is missing")),
        serde_json::Value::Number(n) => n.as_f64().ok_or_else(|| malformed("value is not representable"))?,
        _ => return Err(malformed("value is not a number")),
    };
    if value < 0.0 {
        return Err(malformed("value must not be negative"));
    }

    Ok(Sample {
        metric: canonical_metric_name(&raw.metric).to_string(),
        entity_id: raw.entity_id,
        value,
        timestamp: raw.timestamp.unwrap_or(now),
    })
}

/// Samples read from an input stream, plus how many lines were rejected.
#[derive(Debug, Default)]
pub struct SampleBatch {
    pub samples: Vec<Sample>,
    pub rejected: usize,
}

/// Read every sample from `reader`, skipping (and logging) malformed lines.
///
/// Only I/O failures abort the read.
pub fn read_samples<R: BufRead>(reader: R, now: Timestamp) -> Result<SampleBatch, InputError> {
    let mut batch = SampleBatch::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_sample_line(&line, now) {
            Ok(sample) => batch.samples.push(sample),
            Err(e) => {
                tracing::warn!(line = idx + 1, error = %e, "Skipping malformed sample");
                batch.rejected += 1;
            }
        }
    }
    Ok(batch)
}
