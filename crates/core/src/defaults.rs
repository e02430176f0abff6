//! Built-in default thresholds for subaccount monitoring.
//!
//! These mirror the default values of the original parameter schema and form
//! the process-wide default [`ThresholdSet`]. Build it once at start-up with
//! [`default_set`] and hand it to the evaluator.

use crate::metric_names::{
    METRIC_APP_CONNECTIONS, METRIC_TUNNEL_CONNECTIONS, METRIC_TUNNEL_CONNECTION_AGE,
};
use crate::rule::{Bounds, Direction, RuleMode, ThresholdRule, Unit};
use crate::set::ThresholdSet;

/// A default threshold definition.
pub struct DefaultThreshold {
    pub metric: &'static str,
    pub unit: Unit,
    pub mode: RuleMode,
    pub warn_high: f64,
    pub crit_high: f64,
    pub warn_low: f64,
    pub crit_low: f64,
}

/// Default per-metric thresholds (units: connections, connections, seconds).
///
/// The application-connection rule is marked as not used upstream; it keeps
/// its bounds but always reports OK.
pub const DEFAULT_THRESHOLDS: &[DefaultThreshold] = &[
    DefaultThreshold {
        metric: METRIC_APP_CONNECTIONS,
        unit: Unit::Count,
        mode: RuleMode::AlwaysOk,
        warn_high: 30.0,
        crit_high: 40.0,
        warn_low: 0.0,
        crit_low: 0.0,
    },
    DefaultThreshold {
        metric: METRIC_TUNNEL_CONNECTIONS,
        unit: Unit::Count,
        mode: RuleMode::Active,
        warn_high: 30.0,
        crit_high: 40.0,
        warn_low: 0.0,
        crit_low: 0.0,
    },
    DefaultThreshold {
        metric: METRIC_TUNNEL_CONNECTION_AGE,
        unit: Unit::Seconds,
        mode: RuleMode::Active,
        warn_high: 284_012_568.0,
        crit_high: 315_569_520.0,
        warn_low: 0.0,
        crit_low: 0.0,
    },
];

impl DefaultThreshold {
    fn to_rule(&self) -> ThresholdRule {
        let bounds = Bounds::band(self.warn_high, self.crit_high, self.warn_low, self.crit_low);
        // The constants above satisfy every construction invariant.
        ThresholdRule::build(Direction::Band, self.unit, self.mode, bounds)
            .unwrap_or_else(|e| panic!("built-in threshold for {} is invalid: {e}", self.metric))
    }
}

/// Build the default threshold set from [`DEFAULT_THRESHOLDS`].
pub fn default_set() -> ThresholdSet {
    DEFAULT_THRESHOLDS
        .iter()
        .fold(ThresholdSet::new(), |set, d| set.with_rule(d.metric, d.to_rule()))
}

/// Unit of a known metric, if it has a built-in default.
pub fn default_unit(metric: &str) -> Option<Unit> {
    DEFAULT_THRESHOLDS
        .iter()
        .find(|d| d.metric == metric)
        .map(|d| d.unit)
}

/// Mode of a known metric's built-in rule.
pub fn default_mode(metric: &str) -> Option<RuleMode> {
    DEFAULT_THRESHOLDS
        .iter()
        .find(|d| d.metric == metric)
        .map(|d| d.mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::Verdict;

    #[test]
    fn default_set_covers_all_known_metrics() {
        let set = default_set();
        for metric in crate::metric_names::KNOWN_METRICS {
            assert!(set.contains(metric), "missing default for {metric}");
        }
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn tunnel_connection_defaults() {
        let set = default_set();
        let rule = set.get(METRIC_TUNNEL_CONNECTIONS).unwrap();
        assert_eq!(rule.bounds(), &Bounds::band(30.0, 40.0, 0.0, 0.0));
        assert_eq!(rule.unit(), Unit::Count);
        assert_eq!(rule.classify(35.0), Verdict::Warn);
    }

    #[test]
    fn connection_age_defaults_in_seconds() {
        let set = default_set();
        let rule = set.get(METRIC_TUNNEL_CONNECTION_AGE).unwrap();
        assert_eq!(rule.unit(), Unit::Seconds);
        assert_eq!(rule.bounds().warn_high, Some(284_012_568.0));
        assert_eq!(rule.bounds().crit_high, Some(315_569_520.0));
        assert_eq!(rule.classify(315_569_520.0), Verdict::Crit);
    }

    #[test]
    fn application_connections_never_fire_by_default() {
        let set = default_set();
        let rule = set.get(METRIC_APP_CONNECTIONS).unwrap();
        assert_eq!(rule.mode(), RuleMode::AlwaysOk);
        assert_eq!(rule.classify(100.0), Verdict::Ok);
        assert_eq!(rule.bounds().warn_high, Some(30.0));
    }

    #[test]
    fn default_units() {
        assert_eq!(default_unit(METRIC_TUNNEL_CONNECTION_AGE), Some(Unit::Seconds));
        assert_eq!(default_unit(METRIC_TUNNEL_CONNECTIONS), Some(Unit::Count));
        assert_eq!(default_unit("unknown"), None);
    }
}
