//! Sample evaluation against resolved thresholds.
//!
//! Pure logic over in-memory snapshots. The caller collects samples and
//! forwards the resulting reports; the evaluator never mutates configuration
//! beyond delegating whole-set reloads to its [`ThresholdStore`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::report::{EntityReport, VerdictReport};
use crate::rule::{Breach, RuleMode, ThresholdRule};
use crate::set::ThresholdSet;
use crate::store::{Snapshot, ThresholdStore};
use crate::types::{EntityId, Timestamp};
use crate::verdict::Verdict;

/// One metric observation supplied by an external collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub entity_id: EntityId,
    #[serde(alias = "metric_name")]
    pub metric: String,
    pub value: f64,
    /// Only carried through to reports; classification ignores it.
    pub timestamp: Timestamp,
}

/// Result of evaluating one sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub verdict: Verdict,
    /// The rule that was applied, for diagnostics.
    pub rule: ThresholdRule,
    /// The bound that produced a non-OK verdict.
    pub breach: Option<Breach>,
}

/// Stateless evaluator over a shared [`ThresholdStore`].
#[derive(Debug, Clone)]
pub struct Evaluator {
    store: Arc<ThresholdStore>,
}

impl Evaluator {
    /// Create an evaluator whose store starts with `defaults` and no overrides.
    pub fn new(defaults: ThresholdSet) -> Self {
        Self::with_store(Arc::new(ThresholdStore::new(defaults)))
    }

    /// Share an existing store, e.g. with a configuration reloader.
    pub fn with_store(store: Arc<ThresholdStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<ThresholdStore> {
        &self.store
    }

    /// Publish a new set of per-entity overrides.
    pub fn reload(&self, overrides: HashMap<EntityId, ThresholdSet>) -> u64 {
        self.store.reload(overrides)
    }

    /// Resolve the applicable rule and classify `value`.
    ///
    /// An unknown metric is a configuration-completeness error and is
    /// returned as such rather than treated as healthy.
    pub fn evaluate(
        &self,
        entity_id: &str,
        metric: &str,
        value: f64,
    ) -> Result<Evaluation, ConfigError> {
        evaluate_in(&self.store.snapshot(), entity_id, metric, value)
    }

    /// Evaluate a collected sample into a report.
    ///
    /// Returns `Ok(None)` when the metric's rule is in [`RuleMode::Skip`].
    pub fn report(&self, sample: &Sample) -> Result<Option<VerdictReport>, ConfigError> {
        report_in(&self.store.snapshot(), sample)
    }

    /// Evaluate a batch of samples against a single snapshot and group the
    /// results per entity, in entity id order.
    pub fn report_batch(&self, samples: &[Sample]) -> Result<Vec<EntityReport>, ConfigError> {
        let snapshot = self.store.snapshot();
        let mut grouped: BTreeMap<&str, Vec<VerdictReport>> = BTreeMap::new();

        for sample in samples {
            let entry = grouped.entry(sample.entity_id.as_str()).or_default();
            if let Some(report) = report_in(&snapshot, sample)? {
                entry.push(report);
            }
        }

        Ok(grouped
            .into_iter()
            .map(|(entity_id, reports)| EntityReport::new(entity_id, reports))
            .collect())
    }
}

fn evaluate_in(
    snapshot: &Snapshot,
    entity_id: &str,
    metric: &str,
    value: f64,
) -> Result<Evaluation, ConfigError> {
    let rule = snapshot.resolve(entity_id, metric).inspect_err(|e| {
        tracing::warn!(entity_id, metric, error = %e, "No threshold rule for metric");
    })?;

    let breach = rule.breach(value);
    let verdict = breach.map_or(Verdict::Ok, |b| b.verdict);

    tracing::debug!(
        entity_id,
        metric,
        value,
        verdict = %verdict,
        generation = snapshot.generation(),
        "Evaluated sample",
    );

    Ok(Evaluation {
        verdict,
        rule: rule.clone(),
        breach,
    })
}

fn report_in(snapshot: &Snapshot, sample: &Sample) -> Result<Option<VerdictReport>, ConfigError> {
    let evaluation = evaluate_in(snapshot, &sample.entity_id, &sample.metric, sample.value)?;
    if evaluation.rule.mode() == RuleMode::Skip {
        tracing::debug!(
            entity_id = %sample.entity_id,
            metric = %sample.metric,
            "Metric skipped by configuration",
        );
        return Ok(None);
    }
    Ok(Some(VerdictReport {
        entity_id: sample.entity_id.clone(),
        metric: sample.metric.clone(),
        verdict: evaluation.verdict,
        rule: evaluation.rule,
        breach: evaluation.breach,
        sample_value: sample.value,
        timestamp: sample.timestamp,
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
