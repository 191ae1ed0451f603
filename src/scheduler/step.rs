//! Tick-driven step scheduler.
//!
//! # Algorithm
//!
//! 1. Advance every busy volunteer (ascending id) by one tick.
//! 2. For each volunteer that finished, move its order to the next stage:
//!    collectors finish collection, drivers finish delivery.
//! 3. Run the assignment engine: collection pass, then delivery pass.
//! 4. Publish a [`StepReport`] of the resulting state.
//!
//! A volunteer freed in step 2 and an order collected in step 2 are both
//! eligible again in step 3 of the same tick.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dispatching::{AssignmentEngine, DispatchContext, Match, Pass};
use crate::error::{Result, WarehouseError};
use crate::models::{
    LedgerCounts, OrderId, OrderLedger, Tick, Volunteer, VolunteerId, VolunteerStatus,
};

/// An order a volunteer finished during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub order_id: OrderId,
    pub volunteer_id: VolunteerId,
    /// Pass whose work finished: collection or delivery.
    pub pass: Pass,
}

/// State published after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub tick: Tick,
    pub counts: LedgerCounts,
    /// Work finished during capacity decay, in ascending volunteer id.
    pub completions: Vec<Completion>,
    /// Assignments made this tick, collection pass first.
    pub matches: Vec<Match>,
    /// Every volunteer after the tick, in roster order.
    pub volunteers: Vec<VolunteerStatus>,
}

impl StepReport {
    /// Orders fully delivered this tick.
    pub fn deliveries(&self) -> impl Iterator<Item = &Completion> {
        self.completions
            .iter()
            .filter(|c| c.pass == Pass::Delivery)
    }

    /// One-line summary for console output.
    pub fn summary(&self) -> String {
        format!(
            "tick {}: {} pending, {} in process, {} completed ({} finished, {} assigned)",
            self.tick,
            self.counts.pending,
            self.counts.in_process,
            self.counts.completed,
            self.completions.len(),
            self.matches.len()
        )
    }
}

/// Runs one tick over a borrowed ledger and roster.
#[derive(Debug, Clone, Default)]
pub struct StepScheduler {
    engine: AssignmentEngine,
    context: DispatchContext,
}

impl StepScheduler {
    /// Creates a scheduler with the default (FIFO) assignment engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the assignment engine.
    pub fn with_engine(mut self, engine: AssignmentEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Sets the dispatch context template (e.g. customer priorities).
    ///
    /// Its `tick` is overwritten on every step.
    pub fn with_context(mut self, context: DispatchContext) -> Self {
        self.context = context;
        self
    }

    pub fn engine(&self) -> &AssignmentEngine {
        &self.engine
    }

    /// Simulates tick `tick`.
    pub fn step(
        &self,
        tick: Tick,
        ledger: &mut OrderLedger,
        roster: &mut [Volunteer],
    ) -> Result<StepReport> {
        let completions = Self::advance_all(tick, ledger, roster)?;

        let context = DispatchContext {
            tick,
            ..self.context.clone()
        };
        let matches = self.engine.run(ledger, roster, &context)?;

        let counts = ledger.counts();
        info!(
            tick,
            pending = counts.pending,
            in_process = counts.in_process,
            completed = counts.completed,
            finished = completions.len(),
            assigned = matches.len(),
            "step finished"
        );

        Ok(StepReport {
            tick,
            counts,
            completions,
            matches,
            volunteers: roster.iter().map(Volunteer::status).collect(),
        })
    }

    fn advance_all(
        tick: Tick,
        ledger: &mut OrderLedger,
        roster: &mut [Volunteer],
    ) -> Result<Vec<Completion>> {
        let mut order: Vec<usize> = (0..roster.len()).filter(|&i| roster[i].is_busy()).collect();
        order.sort_by_key(|&i| roster[i].id);

        let mut completions = Vec::new();
        for i in order {
            let volunteer = &mut roster[i];
            if !volunteer.advance()? {
                continue;
            }
            let order_id = volunteer.completed_order().ok_or_else(|| {
                WarehouseError::InvalidState(format!(
                    "volunteer {} finished without a completed order",
                    volunteer.id
                ))
            })?;

            let pass = if volunteer.is_collector() {
                ledger.finish_collection(order_id, tick)?;
                Pass::Collection
            } else {
                ledger.finish_delivery(order_id, tick)?;
                Pass::Delivery
            };
            debug!(tick, order_id, volunteer_id = volunteer.id, ?pass, "work finished");

            completions.push(Completion {
                order_id,
                volunteer_id: volunteer.id,
                pass,
            });
        }
        Ok(completions)
    }
}
