//! Dispatch context for rule evaluation.

use std::collections::HashMap;

use crate::models::{CustomerId, Tick};

/// Runtime state passed to dispatching rules.
///
/// Carries the current tick (also used to stamp lifecycle transitions made
/// during the pass) and optional per-customer priorities.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    /// Tick being simulated.
    pub tick: Tick,
    /// Customer priority (customer_id → priority, higher = served first).
    pub customer_priority: HashMap<CustomerId, i32>,
}

impl DispatchContext {
    /// Creates a context at the given tick.
    pub fn at_tick(tick: Tick) -> Self {
        Self {
            tick,
            ..Default::default()
        }
    }

    /// Sets the priority of a customer.
    pub fn with_customer_priority(mut self, customer_id: CustomerId, priority: i32) -> Self {
        self.customer_priority.insert(customer_id, priority);
        self
    }

    /// Priority of a customer (0 when unset).
    pub fn priority_of(&self, customer_id: CustomerId) -> i32 {
        self.customer_priority
            .get(&customer_id)
            .copied()
            .unwrap_or(0)
    }
}
