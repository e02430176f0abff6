use crate::types::EntityId;

/// Configuration-time failures raised while building, merging or resolving
/// threshold rules.
///
/// None of these are retryable: the only recovery is reloading corrected
/// configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bound order: {crit_field} ({crit}) must not be less severe than {warn_field} ({warn})")]
    InvalidBoundOrder {
        warn_field: &'static str,
        warn: f64,
        crit_field: &'static str,
        crit: f64,
    },

    #[error("Unknown metric '{metric}' for entity '{entity_id}'")]
    UnknownMetric { entity_id: EntityId, metric: String },

    #[error("Malformed bound value for {field}: {reason}")]
    MalformedBoundValue { field: String, reason: String },

    #[error("Configuration parse error: {0}")]
    Parse(String),
}

/// Coarse classification of a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    InvalidBoundOrder,
    UnknownMetric,
    MalformedBoundValue,
}

impl ConfigError {
    /// The error's kind. Document-level parse failures count as malformed values.
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            ConfigError::InvalidBoundOrder { .. } => ConfigErrorKind::InvalidBoundOrder,
            ConfigError::UnknownMetric { .. } => ConfigErrorKind::UnknownMetric,
            ConfigError::MalformedBoundValue { .. } | ConfigError::Parse(_) => {
                ConfigErrorKind::MalformedBoundValue
            }
        }
    }

    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::MalformedBoundValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Prefix the offending field with its entity and metric so the operator
    /// can locate it in the override document.
    pub(crate) fn in_context(self, entity_id: &str, metric: &str) -> Self {
        match self {
            ConfigError::MalformedBoundValue { field, reason } => ConfigError::MalformedBoundValue {
                field: format!("{entity_id}/{metric}/{field}"),
                reason,
            },
            other => other,
        }
    }
}
