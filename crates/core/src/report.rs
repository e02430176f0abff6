//! Verdict reports handed to the alerting/reporting layer, and their
//! Check_MK-style text rendering.

use serde::Serialize;

use crate::rule::{Breach, RuleMode, ThresholdRule, Unit};
use crate::types::{EntityId, Timestamp};
use crate::verdict::Verdict;

/// Outcome for one sample: entity, metric, verdict, the rule used and the
/// sampled value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerdictReport {
    pub entity_id: EntityId,
    pub metric: String,
    pub verdict: Verdict,
    pub rule: ThresholdRule,
    pub breach: Option<Breach>,
    pub sample_value: f64,
    pub timestamp: Timestamp,
}

impl VerdictReport {
    /// e.g. `tunnel-connections: 35 (warn at or above 30)(!)`.
    pub fn summary(&self) -> String {
        let unit = self.rule.unit();
        let mut text = format!("{}: {}", self.metric, unit.format(self.sample_value));
        if let Some(breach) = &self.breach {
            text.push_str(&format!(" ({})", breach.describe(unit)));
        }
        text.push_str(state_marker(self.verdict));
        text
    }

    /// Performance data in `name=value;warn;crit` form, using the upper pair.
    /// Levels are left empty when the rule is not active.
    pub fn perfdata(&self) -> String {
        let bounds = self.rule.bounds();
        let (warn, crit) = if self.rule.mode() == RuleMode::Active {
            (bounds.warn_high, bounds.crit_high)
        } else {
            (None, None)
        };
        format!(
            "{}={};{};{}",
            self.metric,
            perf_value(self.sample_value),
            warn.map(perf_value).unwrap_or_default(),
            crit.map(perf_value).unwrap_or_default(),
        )
    }
}

/// All reports for one entity, folded into a single service state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityReport {
    pub entity_id: EntityId,
    pub reports: Vec<VerdictReport>,
}

impl EntityReport {
    pub fn new(entity_id: impl Into<EntityId>, reports: Vec<VerdictReport>) -> Self {
        Self {
            entity_id: entity_id.into(),
            reports,
        }
    }

    /// Worst verdict across all metrics of the entity.
    pub fn state(&self) -> Verdict {
        Verdict::worst(self.reports.iter().map(|r| r.verdict))
    }

    /// Local-check line: `<state> "Subaccount <id>" <perfdata> <summary>`.
    pub fn check_line(&self) -> String {
        let perfdata = if self.reports.is_empty() {
            "-".to_string()
        } else {
            self.reports
                .iter()
                .map(VerdictReport::perfdata)
                .collect::<Vec<_>>()
                .join("|")
        };
        let summary = if self.reports.is_empty() {
            "no monitored metrics".to_string()
        } else {
            self.reports
                .iter()
                .map(VerdictReport::summary)
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "{} \"Subaccount {}\" {} {}",
            self.state().state_code(),
            self.entity_id,
            perfdata,
            summary
        )
    }
}

fn state_marker(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Ok => "",
        Verdict::Warn => "(!)",
        Verdict::Crit => "(!!)",
    }
}

fn perf_value(value: f64) -> String {
    // Perfdata is always the raw number, durations included.
    Unit::Count.format(value)
}
