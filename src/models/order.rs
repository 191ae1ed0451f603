//! Order model and its lifecycle state machine.
//!
//! An order moves through a fixed five-stage chain:
//!
//! ```text
//! Pending → CollectionInProgress → AwaitingDelivery → DeliveryInProgress → Completed
//! ```
//!
//! Each transition is a method that checks its source stage and fails with
//! [`WarehouseError::InvalidState`] otherwise, so a stage can never be skipped
//! or revisited.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CustomerId, OrderId, Tick, VolunteerId};
use crate::error::{Result, WarehouseError};

/// Pipeline stage of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStage {
    /// Waiting for a collector.
    Pending,
    /// A collector is picking the order up.
    CollectionInProgress,
    /// Collected, waiting for a driver.
    AwaitingDelivery,
    /// A driver is on the way.
    DeliveryInProgress,
    /// Delivered. Terminal.
    Completed,
}

impl OrderStage {
    /// All stages in lifecycle order.
    pub const CHAIN: [OrderStage; 5] = [
        OrderStage::Pending,
        OrderStage::CollectionInProgress,
        OrderStage::AwaitingDelivery,
        OrderStage::DeliveryInProgress,
        OrderStage::Completed,
    ];
}

impl fmt::Display for OrderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStage::Pending => "PENDING",
            OrderStage::CollectionInProgress => "COLLECTING",
            OrderStage::AwaitingDelivery => "AWAITING_DELIVERY",
            OrderStage::DeliveryInProgress => "DELIVERING",
            OrderStage::Completed => "COMPLETED",
        };
        f.write_str(name)
    }
}

/// A delivery order placed by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Customer that placed the order.
    pub customer_id: CustomerId,
    /// Travel distance a driver must cover.
    pub distance: u32,
    stage: OrderStage,
    collector_id: Option<VolunteerId>,
    driver_id: Option<VolunteerId>,
    created_at: Tick,
    stage_entered_at: Tick,
    completed_at: Option<Tick>,
}

impl Order {
    /// Creates a pending order at the given tick.
    pub fn new(id: OrderId, customer_id: CustomerId, distance: u32, tick: Tick) -> Self {
        Self {
            id,
            customer_id,
            distance,
            stage: OrderStage::Pending,
            collector_id: None,
            driver_id: None,
            created_at: tick,
            stage_entered_at: tick,
            completed_at: None,
        }
    }

    pub fn stage(&self) -> OrderStage {
        self.stage
    }

    pub fn collector_id(&self) -> Option<VolunteerId> {
        self.collector_id
    }

    pub fn driver_id(&self) -> Option<VolunteerId> {
        self.driver_id
    }

    /// Tick at which the order was placed.
    pub fn created_at(&self) -> Tick {
        self.created_at
    }

    /// Tick at which the order entered its current stage.
    pub fn stage_entered_at(&self) -> Tick {
        self.stage_entered_at
    }

    /// Tick at which the order was delivered, if it has been.
    pub fn completed_at(&self) -> Option<Tick> {
        self.completed_at
    }

    /// Ticks from placement to delivery. `None` until completed.
    pub fn lead_time(&self) -> Option<Tick> {
        self.completed_at.map(|done| done - self.created_at)
    }

    pub fn is_completed(&self) -> bool {
        self.stage == OrderStage::Completed
    }

    /// `Pending → CollectionInProgress`.
    pub fn begin_collection(&mut self, collector_id: VolunteerId, tick: Tick) -> Result<()> {
        self.transition(OrderStage::Pending, OrderStage::CollectionInProgress, tick)?;
        self.collector_id = Some(collector_id);
        Ok(())
    }

    /// `CollectionInProgress → AwaitingDelivery`.
    pub fn finish_collection(&mut self, tick: Tick) -> Result<()> {
        self.transition(
            OrderStage::CollectionInProgress,
            OrderStage::AwaitingDelivery,
            tick,
        )
    }

    /// `AwaitingDelivery → DeliveryInProgress`.
    pub fn begin_delivery(&mut self, driver_id: VolunteerId, tick: Tick) -> Result<()> {
        if self.collector_id.is_none() {
            return Err(WarehouseError::InvalidState(format!(
                "order {} has no collector and cannot be delivered",
                self.id
            )));
        }
        self.transition(
            OrderStage::AwaitingDelivery,
            OrderStage::DeliveryInProgress,
            tick,
        )?;
        self.driver_id = Some(driver_id);
        Ok(())
    }

    /// `DeliveryInProgress → Completed`.
    pub fn finish_delivery(&mut self, tick: Tick) -> Result<()> {
        self.transition(OrderStage::DeliveryInProgress, OrderStage::Completed, tick)?;
        self.completed_at = Some(tick);
        Ok(())
    }

    fn transition(&mut self, from: OrderStage, to: OrderStage, tick: Tick) -> Result<()> {
        if self.stage == OrderStage::Completed {
            return Err(WarehouseError::InvalidState(format!(
                "order {} is completed and cannot change",
                self.id
            )));
        }
        if self.stage != from {
            return Err(WarehouseError::InvalidState(format!(
                "order {} cannot move to {to}: expected {from}, found {}",
                self.id, self.stage
            )));
        }
        self.stage = to;
        self.stage_entered_at = tick;
        Ok(())
    }
}

fn id_or_none(id: Option<u32>) -> String {
    id.map_or_else(|| "None".to_string(), |v| v.to_string())
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OrderId: {}", self.id)?;
        writeln!(f, "OrderStatus: {}", self.stage)?;
        writeln!(f, "CustomerID: {}", self.customer_id)?;
        writeln!(f, "Collector: {}", id_or_none(self.collector_id))?;
        write!(f, "Driver: {}", id_or_none(self.driver_id))
    }
}
