//! Order dispatching: scan-order rules and the first-fit assignment engine.
//!
//! Each tick the [`AssignmentEngine`] runs two passes. The collection pass
//! offers `Pending` orders to idle collectors, the delivery pass offers
//! `AwaitingDelivery` orders to idle drivers. Within a pass, orders are
//! visited in the order produced by a [`RuleEngine`] and each order goes to
//! the first volunteer (ascending id) whose `can_accept` holds.
//!
//! # Usage
//!
//! ```
//! use u_warehouse::dispatching::{AssignmentEngine, RuleEngine};
//! use u_warehouse::dispatching::rules;
//!
//! // Nearest customers first, oldest order on ties.
//! let engine = AssignmentEngine::new().with_rules(
//!     RuleEngine::new()
//!         .with_rule(rules::ShortestDistance)
//!         .with_rule(rules::Fifo),
//! );
//! ```
//!
//! # Complexity
//! O(orders × volunteers) per pass. The matching is greedy: it never holds
//! a volunteer back for a harder-to-place order later in the scan.

mod assignment;
mod context;
mod engine;
pub mod rules;

pub use assignment::{AssignmentEngine, Match, Pass};
pub use context::DispatchContext;
pub use engine::{EvaluationMode, RuleEngine};

use crate::models::Order;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = visited first.
pub type RuleScore = f64;

/// A rule that ranks waiting orders within an assignment pass.
///
/// # Score Convention
/// **Lower score = earlier in the scan.**
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "FIFO", "SDF").
    fn name(&self) -> &'static str;

    /// Scores an order given the current dispatch context.
    fn evaluate(&self, order: &Order, context: &DispatchContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
