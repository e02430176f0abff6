//! Four-point threshold rules for a single metric.
//!
//! A rule carries up to two bound pairs (high and low) and a direction that
//! says which of the pairs may fire. Rules are validated once at
//! construction and are immutable afterwards; classification is a pure
//! function of the rule and the sample.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::verdict::Verdict;

// ---------------------------------------------------------------------------
// Rule parameters
// ---------------------------------------------------------------------------

/// Which side(s) of a rule can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Alert when the value is large.
    High,
    /// Alert when the value is small.
    Low,
    /// Both pairs apply independently.
    Band,
}

impl Direction {
    pub fn includes_high(self) -> bool {
        matches!(self, Direction::High | Direction::Band)
    }

    pub fn includes_low(self) -> bool {
        matches!(self, Direction::Low | Direction::Band)
    }

    /// Direction implied by the sides that actually carry bounds.
    ///
    /// Returns `None` when no bound is set at all.
    pub fn infer(bounds: &Bounds) -> Option<Direction> {
        match (bounds.has_high(), bounds.has_low()) {
            (true, true) => Some(Direction::Band),
            (true, false) => Some(Direction::High),
            (false, true) => Some(Direction::Low),
            (false, false) => None,
        }
    }
}

/// How bound and sample values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Plain non-negative count (connections).
    Count,
    /// Non-negative time span stored as seconds.
    Seconds,
}

impl Unit {
    /// Render a value in this unit for operator-facing text.
    pub fn format(self, value: f64) -> String {
        match self {
            Unit::Count => format_number(value),
            Unit::Seconds => format_age(value),
        }
    }
}

/// Whether a rule takes part in evaluation.
///
/// `AlwaysOk` and `Skip` are the two readings of a parameter that is present
/// in the schema but "currently not used": the former keeps reporting the
/// metric as healthy, the latter drops it from reports altogether.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMode {
    #[default]
    Active,
    AlwaysOk,
    Skip,
}

/// The four optional bound points of a rule. An absent bound never triggers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub warn_high: Option<f64>,
    pub crit_high: Option<f64>,
    pub warn_low: Option<f64>,
    pub crit_low: Option<f64>,
}

impl Bounds {
    /// Upper pair only.
    pub fn high(warn: f64, crit: f64) -> Self {
        Self {
            warn_high: Some(warn),
            crit_high: Some(crit),
            ..Self::default()
        }
    }

    /// Lower pair only.
    pub fn low(warn: f64, crit: f64) -> Self {
        Self {
            warn_low: Some(warn),
            crit_low: Some(crit),
            ..Self::default()
        }
    }

    /// Both pairs.
    pub fn band(warn_high: f64, crit_high: f64, warn_low: f64, crit_low: f64) -> Self {
        Self {
            warn_high: Some(warn_high),
            crit_high: Some(crit_high),
            warn_low: Some(warn_low),
            crit_low: Some(crit_low),
        }
    }

    pub fn has_high(&self) -> bool {
        self.warn_high.is_some() || self.crit_high.is_some()
    }

    pub fn has_low(&self) -> bool {
        self.warn_low.is_some() || self.crit_low.is_some()
    }

    fn named(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("warn_high", self.warn_high),
            ("crit_high", self.crit_high),
            ("warn_low", self.warn_low),
            ("crit_low", self.crit_low),
        ]
    }
}

// ---------------------------------------------------------------------------
// Breach diagnostics
// ---------------------------------------------------------------------------

/// Side of a rule that produced a non-OK verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    High,
    Low,
}

/// The bound responsible for a WARN or CRIT verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Breach {
    pub side: Side,
    pub verdict: Verdict,
    pub bound: f64,
}

impl Breach {
    /// e.g. `warn at or above 30`, `crit at or below 0`.
    pub fn describe(&self, unit: Unit) -> String {
        let level = match self.verdict {
            Verdict::Crit => "crit",
            _ => "warn",
        };
        let relation = match self.side {
            Side::High => "at or above",
            Side::Low => "at or below",
        };
        format!("{level} {relation} {}", unit.format(self.bound))
    }
}

// ---------------------------------------------------------------------------
// ThresholdRule
// ---------------------------------------------------------------------------

/// A validated threshold rule for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdRule {
    direction: Direction,
    unit: Unit,
    mode: RuleMode,
    bounds: Bounds,
}

impl ThresholdRule {
    /// Build an active rule, rejecting misordered or malformed bounds.
    pub fn new(direction: Direction, unit: Unit, bounds: Bounds) -> Result<Self, ConfigError> {
        Self::build(direction, unit, RuleMode::Active, bounds)
    }

    /// A rule with no bounds that always classifies as OK.
    pub fn disabled(unit: Unit) -> Self {
        Self {
            direction: Direction::Band,
            unit,
            mode: RuleMode::AlwaysOk,
            bounds: Bounds::default(),
        }
    }

    /// Same bounds, different mode. Switching to `Active` requires bounds on
    /// a side the direction includes.
    pub fn with_mode(self, mode: RuleMode) -> Result<Self, ConfigError> {
        Self::build(self.direction, self.unit, mode, self.bounds)
    }

    pub(crate) fn build(
        direction: Direction,
        unit: Unit,
        mode: RuleMode,
        bounds: Bounds,
    ) -> Result<Self, ConfigError> {
        for (field, value) in bounds.named() {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(ConfigError::malformed(
                        field,
                        format!("must be a finite non-negative number, got {v}"),
                    ));
                }
            }
        }

        if let (Some(warn), Some(crit)) = (bounds.warn_high, bounds.crit_high) {
            if crit < warn {
                return Err(ConfigError::InvalidBoundOrder {
                    warn_field: "warn_high",
                    warn,
                    crit_field: "crit_high",
                    crit,
                });
            }
        }
        if let (Some(warn), Some(crit)) = (bounds.warn_low, bounds.crit_low) {
            if crit > warn {
                return Err(ConfigError::InvalidBoundOrder {
                    warn_field: "warn_low",
                    warn,
                    crit_field: "crit_low",
                    crit,
                });
            }
        }

        let armed = (direction.includes_high() && bounds.has_high())
            || (direction.includes_low() && bounds.has_low());
        if mode == RuleMode::Active && !armed {
            return Err(ConfigError::malformed(
                "bounds",
                format!(
                    "an active {} rule needs at least one bound on that side",
                    direction_name(direction)
                ),
            ));
        }

        Ok(Self {
            direction,
            unit,
            mode,
            bounds,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn mode(&self) -> RuleMode {
        self.mode
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Classify a sample. Boundaries are inclusive and the most severe
    /// triggered side wins.
    pub fn classify(&self, value: f64) -> Verdict {
        self.breach(value).map_or(Verdict::Ok, |b| b.verdict)
    }

    /// The bound that decides the verdict for `value`, if any.
    pub fn breach(&self, value: f64) -> Option<Breach> {
        if self.mode != RuleMode::Active {
            return None;
        }

        let high = if self.direction.includes_high() {
            self.high_breach(value)
        } else {
            None
        };
        if matches!(high, Some(b) if b.verdict == Verdict::Crit) {
            return high;
        }

        let low = if self.direction.includes_low() {
            self.low_breach(value)
        } else {
            None
        };

        match (high, low) {
            (_, Some(low)) if low.verdict == Verdict::Crit => Some(low),
            (Some(high), _) => Some(high),
            (None, low) => low,
        }
    }

    fn high_breach(&self, value: f64) -> Option<Breach> {
        let hit = |bound: Option<f64>| bound.filter(|b| value >= *b);
        if let Some(bound) = hit(self.bounds.crit_high) {
            return Some(Breach {
                side: Side::High,
                verdict: Verdict::Crit,
                bound,
            });
        }
        hit(self.bounds.warn_high).map(|bound| Breach {
            side: Side::High,
            verdict: Verdict::Warn,
            bound,
        })
    }

    fn low_breach(&self, value: f64) -> Option<Breach> {
        let hit = |bound: Option<f64>| bound.filter(|b| value <= *b);
        if let Some(bound) = hit(self.bounds.crit_low) {
            return Some(Breach {
                side: Side::Low,
                verdict: Verdict::Crit,
                bound,
            });
        }
        hit(self.bounds.warn_low).map(|bound| Breach {
            side: Side::Low,
            verdict: Verdict::Warn,
            bound,
        })
    }
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::High => "high",
        Direction::Low => "low",
        Direction::Band => "band",
    }
}

// ---------------------------------------------------------------------------
// Value formatting
// ---------------------------------------------------------------------------

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

/// Render seconds the way Check_MK renders ages: the two most significant
/// units, e.g. `3287 d 4 h`, `1 h 0 m`, `50 s`.
fn format_age(seconds: f64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;

    if !seconds.is_finite() || seconds < 0.0 {
        return format_number(seconds);
    }
    let secs = seconds.round() as u64;
    if secs >= DAY {
        format!("{} d {} h", secs / DAY, (secs % DAY) / HOUR)
    } else if secs >= HOUR {
        format!("{} h {} m", secs / HOUR, (secs % HOUR) / MINUTE)
    } else if secs >= MINUTE {
        format!("{} m {} s", secs / MINUTE, secs % MINUTE)
    } else {
        format!("{secs} s")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
