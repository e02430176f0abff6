//! Two-tier threshold storage: immutable defaults plus per-entity overrides
//! published as atomic copy-on-write snapshots.
//!
//! Readers call [`ThresholdStore::snapshot`] and resolve against that view for
//! the whole of one evaluation. Writers never touch a published snapshot;
//! they build a new one and swap the pointer, so readers never block and
//! never observe a half-applied reload.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::ConfigError;
use crate::rule::ThresholdRule;
use crate::set::ThresholdSet;
use crate::types::EntityId;

/// One published generation of per-entity override sets.
#[derive(Debug, Default)]
pub struct OverrideSnapshot {
    generation: u64,
    entities: HashMap<EntityId, ThresholdSet>,
}

impl OverrideSnapshot {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, entity_id: &str) -> Option<&ThresholdSet> {
        self.entities.get(entity_id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Default set plus the current override snapshot.
#[derive(Debug)]
pub struct ThresholdStore {
    defaults: Arc<ThresholdSet>,
    overrides: ArcSwap<OverrideSnapshot>,
}

impl ThresholdStore {
    /// Create a store with no overrides. `defaults` is fixed for the store's
    /// lifetime.
    pub fn new(defaults: ThresholdSet) -> Self {
        Self {
            defaults: Arc::new(defaults),
            overrides: ArcSwap::from_pointee(OverrideSnapshot::default()),
        }
    }

    pub fn defaults(&self) -> &ThresholdSet {
        &self.defaults
    }

    /// A consistent view of defaults and overrides.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            defaults: Arc::clone(&self.defaults),
            overrides: self.overrides.load_full(),
        }
    }

    /// Replace every entity's overrides at once. Returns the new generation.
    pub fn reload(&self, entities: HashMap<EntityId, ThresholdSet>) -> u64 {
        let previous = self.overrides.rcu(|current| {
            Arc::new(OverrideSnapshot {
                generation: current.generation + 1,
                entities: entities.clone(),
            })
        });
        let generation = previous.generation + 1;
        tracing::info!(
            generation,
            entity_count = entities.len(),
            "Published threshold overrides"
        );
        generation
    }

    /// Replace one entity's override set in whole. Returns the new generation.
    pub fn replace_entity(&self, entity_id: &str, set: ThresholdSet) -> u64 {
        let previous = self.overrides.rcu(|current| {
            let mut entities = current.entities.clone();
            entities.insert(entity_id.to_string(), set.clone());
            Arc::new(OverrideSnapshot {
                generation: current.generation + 1,
                entities,
            })
        });
        let generation = previous.generation + 1;
        tracing::debug!(generation, entity_id, metrics = set.len(), "Replaced entity overrides");
        generation
    }

    /// Drop one entity's overrides so it falls back to the defaults.
    ///
    /// Returns `None` without publishing when the entity had no overrides.
    pub fn remove_entity(&self, entity_id: &str) -> Option<u64> {
        let previous = self.overrides.rcu(|current| {
            if current.get(entity_id).is_none() {
                return Arc::clone(current);
            }
            let mut entities = current.entities.clone();
            entities.remove(entity_id);
            Arc::new(OverrideSnapshot {
                generation: current.generation + 1,
                entities,
            })
        });
        // The snapshot that was actually replaced decides whether this call
        // removed anything; a concurrent removal may have won the race.
        previous.get(entity_id)?;
        let generation = previous.generation + 1;
        tracing::debug!(generation, entity_id, "Removed entity overrides");
        Some(generation)
    }
}

/// Read-only view used for the duration of one evaluation.
#[derive(Debug, Clone)]
pub struct Snapshot {
    defaults: Arc<ThresholdSet>,
    overrides: Arc<OverrideSnapshot>,
}

impl Snapshot {
    pub fn generation(&self) -> u64 {
        self.overrides.generation
    }

    pub fn overrides(&self) -> &OverrideSnapshot {
        &self.overrides
    }

    /// The rule that applies to `metric` for `entity_id`: the entity's
    /// override if it has one for that metric, else the default.
    pub fn resolve(&self, entity_id: &str, metric: &str) -> Result<&ThresholdRule, ConfigError> {
        self.overrides
            .get(entity_id)
            .and_then(|set| set.get(metric))
            .or_else(|| self.defaults.get(metric))
            .ok_or_else(|| ConfigError::UnknownMetric {
                entity_id: entity_id.to_string(),
                metric: metric.to_string(),
            })
    }

    /// Every rule that applies to `entity_id`, overrides merged over defaults.
    pub fn resolved_set(&self, entity_id: &str) -> ThresholdSet {
        match self.overrides.get(entity_id) {
            Some(set) => ThresholdSet::merge(&self.defaults, set),
            None => (*self.defaults).clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
