//! Order sets: pending, in-process, completed.
//!
//! The ledger owns every order and keeps each one in the set that matches
//! its stage. All three sets stay sorted by ascending order id.

use serde::{Deserialize, Serialize};

use super::{Order, OrderId, OrderStage, Tick, VolunteerId};
use crate::error::{Entity, Result, WarehouseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Set {
    Pending,
    InProcess,
    Completed,
}

impl Set {
    fn for_stage(stage: OrderStage) -> Self {
        match stage {
            OrderStage::Pending => Set::Pending,
            OrderStage::Completed => Set::Completed,
            _ => Set::InProcess,
        }
    }
}

/// Number of orders in each set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerCounts {
    pub pending: usize,
    pub in_process: usize,
    pub completed: usize,
}

impl LedgerCounts {
    pub fn total(&self) -> usize {
        self.pending + self.in_process + self.completed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLedger {
    pending: Vec<Order>,
    in_process: Vec<Order>,
    completed: Vec<Order>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a freshly created order to the pending set.
    pub fn insert(&mut self, order: Order) -> Result<()> {
        if order.stage() != OrderStage::Pending {
            return Err(WarehouseError::InvalidState(format!(
                "order {} must be pending to enter the ledger, found {}",
                order.id,
                order.stage()
            )));
        }
        if self.locate(order.id).is_some() {
            return Err(WarehouseError::InvalidState(format!(
                "order {} is already in the ledger",
                order.id
            )));
        }
        insert_sorted(&mut self.pending, order);
        Ok(())
    }

    /// Orders waiting for a collector.
    pub fn pending(&self) -> &[Order] {
        &self.pending
    }

    /// Orders being collected, waiting for a driver, or being delivered.
    pub fn in_process(&self) -> &[Order] {
        &self.in_process
    }

    pub fn completed(&self) -> &[Order] {
        &self.completed
    }

    /// Orders waiting in `stage`, in ascending id order.
    pub fn waiting_in(&self, stage: OrderStage) -> Vec<&Order> {
        self.set(Set::for_stage(stage))
            .iter()
            .filter(|o| o.stage() == stage)
            .collect()
    }

    /// All orders across the three sets, in ascending id order.
    pub fn all_orders(&self) -> Vec<&Order> {
        let mut all: Vec<&Order> = self
            .pending
            .iter()
            .chain(&self.in_process)
            .chain(&self.completed)
            .collect();
        all.sort_by_key(|o| o.id);
        all
    }

    pub fn counts(&self) -> LedgerCounts {
        LedgerCounts {
            pending: self.pending.len(),
            in_process: self.in_process.len(),
            completed: self.completed.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.counts().total()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks an order up in any set.
    pub fn get(&self, id: OrderId) -> Result<&Order> {
        let (set, idx) = self
            .locate(id)
            .ok_or_else(|| WarehouseError::not_found(Entity::Order, id))?;
        Ok(&self.set(set)[idx])
    }

    /// `Pending → CollectionInProgress`; moves the order to the in-process set.
    pub fn begin_collection(
        &mut self,
        id: OrderId,
        collector_id: VolunteerId,
        tick: Tick,
    ) -> Result<()> {
        self.get_mut(id)?.begin_collection(collector_id, tick)?;
        self.relocate(id);
        Ok(())
    }

    /// `CollectionInProgress → AwaitingDelivery`.
    pub fn finish_collection(&mut self, id: OrderId, tick: Tick) -> Result<()> {
        self.get_mut(id)?.finish_collection(tick)
    }

    /// `AwaitingDelivery → DeliveryInProgress`.
    pub fn begin_delivery(
        &mut self,
        id: OrderId,
        driver_id: VolunteerId,
        tick: Tick,
    ) -> Result<()> {
        self.get_mut(id)?.begin_delivery(driver_id, tick)
    }

    /// `DeliveryInProgress → Completed`; moves the order to the completed set.
    pub fn finish_delivery(&mut self, id: OrderId, tick: Tick) -> Result<()> {
        self.get_mut(id)?.finish_delivery(tick)?;
        self.relocate(id);
        Ok(())
    }

    /// Takes the completed set out of the ledger.
    ///
    /// Completed orders never change, so a tick only needs the pending and
    /// in-process sets. Pair with [`Self::merge_completed`].
    pub(crate) fn split_completed(&mut self) -> Vec<Order> {
        std::mem::take(&mut self.completed)
    }

    /// Puts a set taken by [`Self::split_completed`] back, keeping any orders
    /// completed in the meantime.
    pub(crate) fn merge_completed(&mut self, earlier: Vec<Order>) {
        let recent = std::mem::replace(&mut self.completed, earlier);
        for order in recent {
            insert_sorted(&mut self.completed, order);
        }
    }

    fn get_mut(&mut self, id: OrderId) -> Result<&mut Order> {
        let (set, idx) = self
            .locate(id)
            .ok_or_else(|| WarehouseError::not_found(Entity::Order, id))?;
        Ok(&mut self.set_mut(set)[idx])
    }

    fn locate(&self, id: OrderId) -> Option<(Set, usize)> {
        [Set::Pending, Set::InProcess, Set::Completed]
            .into_iter()
            .find_map(|set| {
                self.set(set)
                    .binary_search_by_key(&id, |o| o.id)
                    .ok()
                    .map(|idx| (set, idx))
            })
    }

    /// Moves an order into the set matching its stage.
    fn relocate(&mut self, id: OrderId) {
        let Some((current, idx)) = self.locate(id) else {
            return;
        };
        let target = Set::for_stage(self.set(current)[idx].stage());
        if target != current {
            let order = self.set_mut(current).remove(idx);
            insert_sorted(self.set_mut(target), order);
        }
    }

    fn set(&self, set: Set) -> &Vec<Order> {
        match set {
            Set::Pending => &self.pending,
            Set::InProcess => &self.in_process,
            Set::Completed => &self.completed,
        }
    }

    fn set_mut(&mut self, set: Set) -> &mut Vec<Order> {
        match set {
            Set::Pending => &mut self.pending,
            Set::InProcess => &mut self.in_process,
            Set::Completed => &mut self.completed,
        }
    }
}

fn insert_sorted(set: &mut Vec<Order>, order: Order) {
    let pos = set.partition_point(|o| o.id < order.id);
    set.insert(pos, order);
}
