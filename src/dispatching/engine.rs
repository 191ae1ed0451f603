//! Rule engine for multi-criteria order ranking.
//!
//! Composes dispatching rules with a configurable evaluation mode. Ties left
//! after every rule are always broken by ascending order id, so any rule
//! configuration yields one reproducible scan order.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{rules, DispatchContext, DispatchingRule, RuleScore};
use crate::models::Order;

/// How multiple rules are combined.
#[derive(Debug, Clone, Default)]
pub enum EvaluationMode {
    /// Apply rules in sequence; use next rule only on ties.
    #[default]
    Sequential,
    /// Compute weighted sum of all rule scores.
    Weighted,
}

#[derive(Clone)]
struct WeightedRule {
    rule: Arc<dyn DispatchingRule>,
    weight: f64,
}

/// A composable rule engine for order ranking.
///
/// An engine without rules ranks by ascending order id.
///
/// # Example
/// ```
/// use u_warehouse::dispatching::{DispatchContext, RuleEngine};
/// use u_warehouse::dispatching::rules;
/// use u_warehouse::models::Order;
///
/// let orders = vec![Order::new(0, 0, 9, 0), Order::new(1, 0, 2, 0)];
/// let refs: Vec<&Order> = orders.iter().collect();
///
/// let engine = RuleEngine::new().with_rule(rules::ShortestDistance);
/// let ranked = engine.sort_indices(&refs, &DispatchContext::at_tick(1));
/// assert_eq!(ranked, vec![1, 0]);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<WeightedRule>,
    mode: EvaluationMode,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            mode: EvaluationMode::Sequential,
            epsilon: 1e-9,
        }
    }

    /// Engine that scans in creation order.
    pub fn fifo() -> Self {
        Self::new().with_rule(rules::Fifo)
    }

    /// Adds a rule (weight 1.0).
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight: 1.0,
        });
        self
    }

    /// Adds a weighted rule.
    pub fn with_weighted_rule<R: DispatchingRule + 'static>(
        mut self,
        rule: R,
        weight: f64,
    ) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight,
        });
        self
    }

    /// Sets the evaluation mode.
    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Names of the configured rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|wr| wr.rule.name()).collect()
    }

    /// Ranks orders (first = visited first).
    ///
    /// Returns indices into the given slice.
    pub fn sort_indices(&self, orders: &[&Order], context: &DispatchContext) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..orders.len()).collect();

        match &self.mode {
            EvaluationMode::Sequential => {
                indices.sort_by(|&a, &b| self.compare_sequential(orders[a], orders[b], context));
            }
            EvaluationMode::Weighted => {
                let scores: Vec<f64> = orders
                    .iter()
                    .map(|o| self.weighted_score(o, context))
                    .collect();
                indices.sort_by(|&a, &b| {
                    scores[a]
                        .partial_cmp(&scores[b])
                        .unwrap_or(Ordering::Equal)
                        .then_with(|| orders[a].id.cmp(&orders[b].id))
                });
            }
        }

        indices
    }

    /// Evaluates a single order and returns the weighted score of each rule.
    pub fn evaluate(&self, order: &Order, context: &DispatchContext) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(order, context) * wr.weight)
            .collect()
    }

    fn compare_sequential(&self, a: &Order, b: &Order, context: &DispatchContext) -> Ordering {
        for wr in &self.rules {
            let score_a = wr.rule.evaluate(a, context);
            let score_b = wr.rule.evaluate(b, context);

            if (score_a - score_b).abs() > self.epsilon {
                return score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal);
            }
        }

        a.id.cmp(&b.id)
    }

    fn weighted_score(&self, order: &Order, context: &DispatchContext) -> f64 {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(order, context) * wr.weight)
            .sum()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::fifo()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| format!("{}(w={})", r.rule.name(), r.weight))
                    .collect::<Vec<_>>(),
            )
            .field("mode", &self.mode)
            .finish()
    }
}
