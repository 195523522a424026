//! Per-evaluation value tracking.

use std::collections::HashMap;

use crate::eval::value::Value;

/// Records the value computed for each expression node during one evaluation.
///
/// Used by tracing evaluators and by unknown resolution to inspect partial
/// results after the fact.
#[derive(Debug, Clone, Default)]
pub struct EvalState {
    values: HashMap<i64, Value>,
}

impl EvalState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The ids with recorded values, in no particular order.
    pub fn ids(&self) -> Vec<i64> {
        self.values.keys().copied().collect()
    }

    /// The recorded value for a node, if any.
    pub fn value(&self, id: i64) -> Option<&Value> {
        self.values.get(&id)
    }

    /// Record the value for a node, replacing any previous one.
    pub fn set_value(&mut self, id: i64, value: Value) {
        self.values.insert(id, value);
    }

    /// Remove the recorded value for a node.
    pub fn remove(&mut self, id: i64) -> Option<Value> {
        self.values.remove(&id)
    }

    /// Clear all recorded values, keeping capacity for reuse.
    pub fn reset(&mut self) {
        self.values.clear();
    }
}
