//! Built-in dispatching rules.
//!
//! # Categories
//!
//! - **Arrival**: FIFO, LWT
//! - **Distance**: SDF, LDF
//! - **Priority**: CPRIO
//!
//! # Score Convention
//! All rules return lower scores for orders that should be visited first.

use super::{DispatchContext, DispatchingRule, RuleScore};
use crate::models::Order;

// ======================== Arrival rules ========================

/// First In, First Out.
///
/// Visits orders in ascending id, which is creation order. This is the
/// default scan of the assignment engine.
#[derive(Debug, Clone, Copy)]
pub struct Fifo;

impl DispatchingRule for Fifo {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn evaluate(&self, order: &Order, _context: &DispatchContext) -> RuleScore {
        order.id as f64
    }

    fn description(&self) -> &'static str {
        "First In, First Out"
    }
}

/// Longest Waiting Time.
///
/// Visits first the order that has waited longest in its current stage.
/// Differs from FIFO in the delivery pass, where orders become available in
/// collection-completion order rather than creation order.
#[derive(Debug, Clone, Copy)]
pub struct LongestWaiting;

impl DispatchingRule for LongestWaiting {
    fn name(&self) -> &'static str {
        "LWT"
    }

    fn evaluate(&self, order: &Order, context: &DispatchContext) -> RuleScore {
        let waited = context.tick.saturating_sub(order.stage_entered_at());
        -(waited as f64)
    }

    fn description(&self) -> &'static str {
        "Longest Waiting Time"
    }
}

// ======================== Distance rules ========================

/// Shortest Distance First.
///
/// Short trips free drivers sooner and fit more driver ranges.
#[derive(Debug, Clone, Copy)]
pub struct ShortestDistance;

impl DispatchingRule for ShortestDistance {
    fn name(&self) -> &'static str {
        "SDF"
    }

    fn evaluate(&self, order: &Order, _context: &DispatchContext) -> RuleScore {
        order.distance as f64
    }

    fn description(&self) -> &'static str {
        "Shortest Distance First"
    }
}

/// Longest Distance First.
#[derive(Debug, Clone, Copy)]
pub struct LongestDistance;

impl DispatchingRule for LongestDistance {
    fn name(&self) -> &'static str {
        "LDF"
    }

    fn evaluate(&self, order: &Order, _context: &DispatchContext) -> RuleScore {
        -(order.distance as f64)
    }

    fn description(&self) -> &'static str {
        "Longest Distance First"
    }
}

// ======================== Priority rule ========================

/// Customer priority.
///
/// Uses `context.customer_priority`; customers without an entry count as 0.
#[derive(Debug, Clone, Copy)]
pub struct CustomerPriority;

impl DispatchingRule for CustomerPriority {
    fn name(&self) -> &'static str {
        "CPRIO"
    }

    fn evaluate(&self, order: &Order, context: &DispatchContext) -> RuleScore {
        -(context.priority_of(order.customer_id) as f64)
    }

    fn description(&self) -> &'static str {
        "Customer Priority"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_order(id: u32, customer_id: u32, distance: u32) -> Order {
        Order::new(id, customer_id, distance, 0)
    }

    #[test]
    fn test_fifo() {
        let ctx = DispatchContext::at_tick(0);
        assert!(
            Fifo.evaluate(&make_order(1, 0, 9), &ctx) < Fifo.evaluate(&make_order(2, 0, 1), &ctx)
        );
    }

    #[test]
    fn test_longest_waiting() {
        let ctx = DispatchContext::at_tick(10);
        let old = Order::new(5, 0, 3, 2);
        let fresh = Order::new(1, 0, 3, 8);
        assert!(LongestWaiting.evaluate(&old, &ctx) < LongestWaiting.evaluate(&fresh, &ctx));
    }

    #[test]
    fn test_longest_waiting_uses_stage_entry() {
        let ctx = DispatchContext::at_tick(10);
        let mut recently_collected = Order::new(0, 0, 3, 0);
        recently_collected.begin_collection(0, 1).unwrap();
        recently_collected.finish_collection(9).unwrap();
        let mut long_collected = Order::new(1, 0, 3, 0);
        long_collected.begin_collection(1, 1).unwrap();
        long_collected.finish_collection(4).unwrap();

        assert!(
            LongestWaiting.evaluate(&long_collected, &ctx)
                < LongestWaiting.evaluate(&recently_collected, &ctx)
        );
    }

    #[test]
    fn test_distance_rules() {
        let ctx = DispatchContext::at_tick(0);
        let near = make_order(0, 0, 2);
        let far = make_order(1, 0, 12);
        assert!(ShortestDistance.evaluate(&near, &ctx) < ShortestDistance.evaluate(&far, &ctx));
        assert!(LongestDistance.evaluate(&far, &ctx) < LongestDistance.evaluate(&near, &ctx));
    }

    #[test]
    fn test_customer_priority() {
        let ctx = DispatchContext::at_tick(0).with_customer_priority(7, 5);
        let vip = make_order(3, 7, 1);
        let regular = make_order(1, 2, 1);
        assert!(CustomerPriority.evaluate(&vip, &ctx) < CustomerPriority.evaluate(&regular, &ctx));
        assert_eq!(ctx.priority_of(2), 0);
    }
}
