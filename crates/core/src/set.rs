//! Metric name to rule mappings and their merge semantics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::rule::ThresholdRule;

/// A set of threshold rules keyed by metric name.
///
/// Ordered so iteration, reports and perfdata are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ThresholdSet {
    rules: BTreeMap<String, ThresholdRule>,
}

impl ThresholdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_rule(mut self, metric: impl Into<String>, rule: ThresholdRule) -> Self {
        self.insert(metric, rule);
        self
    }

    /// Insert or replace the rule for `metric`, returning the previous one.
    pub fn insert(&mut self, metric: impl Into<String>, rule: ThresholdRule) -> Option<ThresholdRule> {
        self.rules.insert(metric.into(), rule)
    }

    pub fn get(&self, metric: &str) -> Option<&ThresholdRule> {
        self.rules.get(metric)
    }

    pub fn contains(&self, metric: &str) -> bool {
        self.rules.contains_key(metric)
    }

    /// Metric names in order.
    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ThresholdRule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve `overrides` over `defaults`.
    ///
    /// A metric present in `overrides` replaces the default rule wholesale;
    /// bound fields are never mixed between the two rules.
    pub fn merge(defaults: &ThresholdSet, overrides: &ThresholdSet) -> ThresholdSet {
        let mut merged = defaults.clone();
        for (metric, rule) in &overrides.rules {
            merged.rules.insert(metric.clone(), rule.clone());
        }
        merged
    }
}

impl FromIterator<(String, ThresholdRule)> for ThresholdSet {
    fn from_iter<T: IntoIterator<Item = (String, ThresholdRule)>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
