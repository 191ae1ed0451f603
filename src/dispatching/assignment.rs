//! First-fit assignment of waiting orders to idle volunteers.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{DispatchContext, RuleEngine};
use crate::error::Result;
use crate::models::{Order, OrderId, OrderLedger, OrderStage, Volunteer, VolunteerId};

/// One of the two matching passes run each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pass {
    /// `Pending` orders to collectors.
    Collection,
    /// `AwaitingDelivery` orders to drivers.
    Delivery,
}

impl Pass {
    /// Stage the pass takes orders from.
    pub fn source_stage(&self) -> OrderStage {
        match self {
            Pass::Collection => OrderStage::Pending,
            Pass::Delivery => OrderStage::AwaitingDelivery,
        }
    }

    fn serves(&self, volunteer: &Volunteer) -> bool {
        match self {
            Pass::Collection => volunteer.is_collector(),
            Pass::Delivery => volunteer.is_driver(),
        }
    }
}

/// An order handed to a volunteer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub order_id: OrderId,
    pub volunteer_id: VolunteerId,
    pub pass: Pass,
}

/// Greedy first-fit matcher.
///
/// Orders are visited in the rule engine's ranking (ascending id by
/// default); volunteers always in ascending id. Each order goes to the first
/// volunteer whose `can_accept` holds; unmatched orders keep waiting.
#[derive(Debug, Clone, Default)]
pub struct AssignmentEngine {
    rules: RuleEngine,
}

impl AssignmentEngine {
    /// Creates an engine that scans orders in creation order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the order ranking.
    pub fn with_rules(mut self, rules: RuleEngine) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    /// Runs the collection pass, then the delivery pass.
    pub fn run(
        &self,
        ledger: &mut OrderLedger,
        roster: &mut [Volunteer],
        context: &DispatchContext,
    ) -> Result<Vec<Match>> {
        let mut matches = self.collection_pass(ledger, roster, context)?;
        matches.extend(self.delivery_pass(ledger, roster, context)?);
        Ok(matches)
    }

    /// Offers `Pending` orders to idle collectors.
    pub fn collection_pass(
        &self,
        ledger: &mut OrderLedger,
        roster: &mut [Volunteer],
        context: &DispatchContext,
    ) -> Result<Vec<Match>> {
        self.pass(Pass::Collection, ledger, roster, context)
    }

    /// Offers `AwaitingDelivery` orders to idle drivers.
    pub fn delivery_pass(
        &self,
        ledger: &mut OrderLedger,
        roster: &mut [Volunteer],
        context: &DispatchContext,
    ) -> Result<Vec<Match>> {
        self.pass(Pass::Delivery, ledger, roster, context)
    }

    fn pass(
        &self,
        pass: Pass,
        ledger: &mut OrderLedger,
        roster: &mut [Volunteer],
        context: &DispatchContext,
    ) -> Result<Vec<Match>> {
        let order_ids: Vec<OrderId> = {
            let waiting: Vec<&Order> = ledger.waiting_in(pass.source_stage());
            self.rules
                .sort_indices(&waiting, context)
                .into_iter()
                .map(|i| waiting[i].id)
                .collect()
        };

        let mut scan: Vec<usize> = (0..roster.len())
            .filter(|&i| pass.serves(&roster[i]))
            .collect();
        scan.sort_by_key(|&i| roster[i].id);

        let mut matches = Vec::new();
        for order_id in order_ids {
            let order = ledger.get(order_id)?;
            let Some(&slot) = scan.iter().find(|&&i| roster[i].can_accept(order)) else {
                trace!(order_id, ?pass, "no eligible volunteer");
                continue;
            };

            let volunteer = &mut roster[slot];
            volunteer.accept(order)?;
            let volunteer_id = volunteer.id;

            match pass {
                Pass::Collection => ledger.begin_collection(order_id, volunteer_id, context.tick)?,
                Pass::Delivery => ledger.begin_delivery(order_id, volunteer_id, context.tick)?,
            }
            debug!(tick = context.tick, order_id, volunteer_id, ?pass, "order assigned");

            matches.push(Match {
                order_id,
                volunteer_id,
                pass,
            });
        }

        Ok(matches)
    }
}
