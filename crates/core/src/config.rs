//! Ingestion of per-entity threshold overrides.
//!
//! Overrides arrive as a JSON document keyed by entity id, then by metric
//! name. Each metric entry is either an object with named bounds or a legacy
//! four-element list in the element order of the original Check_MK rule
//! parameters:
//!
//! ```json
//! {
//!   "entities": {
//!     "SA2": {
//!       "tunnel-connection-age": { "warn_high": 3600, "crit_high": 7200 },
//!       "conn_num_levels": [50, 60, 1, 0]
//!     }
//!   }
//! }
//! ```
//!
//! Every tuple is validated into a [`ThresholdRule`]; the first malformed
//! tuple rejects the whole document.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use validator::Validate;

use crate::defaults::{default_mode, default_unit};
use crate::error::ConfigError;
use crate::metric_names::{canonical_metric_name, METRIC_APP_CONNECTIONS};
use crate::rule::{Bounds, Direction, RuleMode, ThresholdRule, Unit};
use crate::set::ThresholdSet;
use crate::types::{check_entity_id, EntityId};

// ---------------------------------------------------------------------------
// Bound tuples
// ---------------------------------------------------------------------------

/// Named-field form of a metric's bounds.
///
/// `direction` is inferred from the sides that carry bounds when absent.
/// `unit` and `mode` default to the metric's built-in rule; metrics without
/// one are counts evaluated actively.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BoundTuple {
    #[validate(range(min = 0.0))]
    pub warn_high: Option<f64>,
    #[validate(range(min = 0.0))]
    pub crit_high: Option<f64>,
    #[validate(range(min = 0.0))]
    pub warn_low: Option<f64>,
    #[validate(range(min = 0.0))]
    pub crit_low: Option<f64>,
    pub direction: Option<Direction>,
    pub unit: Option<Unit>,
    pub mode: Option<RuleMode>,
}

impl BoundTuple {
    pub fn bounds(&self) -> Bounds {
        Bounds {
            warn_high: self.warn_high,
            crit_high: self.crit_high,
            warn_low: self.warn_low,
            crit_low: self.crit_low,
        }
    }

    /// Validate and build the rule for `metric` (a canonical name).
    pub fn to_rule(&self, metric: &str) -> Result<ThresholdRule, ConfigError> {
        if let Err(errors) = self.validate() {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|k| k.to_string())
                .collect();
            fields.sort();
            return Err(ConfigError::malformed(fields.join(", "), "must not be negative"));
        }

        let unit = self
            .unit
            .or_else(|| default_unit(metric))
            .unwrap_or(Unit::Count);
        let mode = self
            .mode
            .or_else(|| default_mode(metric))
            .unwrap_or_default();
        let bounds = self.bounds();

        match self.direction.or_else(|| Direction::infer(&bounds)) {
            Some(direction) => ThresholdRule::build(direction, unit, mode, bounds),
            None if mode != RuleMode::Active => ThresholdRule::disabled(unit).with_mode(mode),
            None => Err(ConfigError::malformed(
                "bounds",
                "no bound given; set at least one or mark the rule always_ok/skip",
            )),
        }
    }
}

/// The original four-element levels tuple.
///
/// `app_conn_levels` lists the lower pair first; the connection count and
/// connection time parameters list the upper pair first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegacyLevels(pub [f64; 4]);

impl LegacyLevels {
    pub fn bounds(&self, metric: &str) -> Bounds {
        let [a, b, c, d] = self.0;
        if canonical_metric_name(metric) == METRIC_APP_CONNECTIONS {
            Bounds::band(c, d, a, b)
        } else {
            Bounds::band(a, b, c, d)
        }
    }

    /// Build a band rule. Mode and unit follow the metric's built-in
    /// default, so a legacy tuple for an unused parameter stays unused.
    pub fn to_rule(&self, metric: &str) -> Result<ThresholdRule, ConfigError> {
        let metric = canonical_metric_name(metric);
        let unit = default_unit(metric).unwrap_or(Unit::Count);
        let mode = default_mode(metric).unwrap_or_default();
        ThresholdRule::build(Direction::Band, unit, mode, self.bounds(metric))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LevelsValue {
    Legacy([f64; 4]),
    Named(BoundTuple),
}

impl LevelsValue {
    fn into_rule(self, metric: &str) -> Result<ThresholdRule, ConfigError> {
        match self {
            LevelsValue::Legacy(levels) => LegacyLevels(levels).to_rule(metric),
            LevelsValue::Named(tuple) => tuple.to_rule(metric),
        }
    }
}

// ---------------------------------------------------------------------------
// Override documents
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OverrideDocument {
    #[serde(default)]
    entities: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

/// Parse an override document into per-entity threshold sets.
pub fn parse_overrides(json: &str) -> Result<HashMap<EntityId, ThresholdSet>, ConfigError> {
    let document: OverrideDocument =
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;

    let mut entities = HashMap::with_capacity(document.entities.len());
    for (entity_id, metrics) in document.entities {
        let set = parse_entity(&entity_id, metrics)?;
        entities.insert(entity_id, set);
    }
    Ok(entities)
}

fn parse_entity(
    entity_id: &str,
    metrics: BTreeMap<String, serde_json::Value>,
) -> Result<ThresholdSet, ConfigError> {
    check_entity_id(entity_id)
        .map_err(|reason| ConfigError::malformed(format!("entity_id {entity_id:?}"), reason))?;

    let mut set = ThresholdSet::new();
    for (raw_name, value) in metrics {
        let metric = canonical_metric_name(&raw_name).to_string();
        let levels: LevelsValue = serde_json::from_value(value).map_err(|_| {
            ConfigError::malformed(
                "levels",
                "expected an object of non-negative bounds or a list of four numbers",
            )
            .in_context(entity_id, &raw_name)
        })?;
        let rule = levels
            .into_rule(&metric)
            .map_err(|e| e.in_context(entity_id, &raw_name))?;
        if set.insert(metric.clone(), rule).is_some() {
            return Err(ConfigError::malformed(
                format!("{entity_id}/{metric}"),
                "given more than once (legacy and canonical names both present)",
            ));
        }
    }
    Ok(set)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
