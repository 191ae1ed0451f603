//! Seeded order workload.
//!
//! Produces the per-tick batches of new orders that feed a simulation run.
//! The generator only reads customers; the warehouse validates and places
//! the orders.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::Result;
use crate::models::{Customer, CustomerId};
use crate::scheduler::StepReport;
use crate::warehouse::Warehouse;

/// An order to be placed this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub distance: u32,
}

impl NewOrder {
    pub fn new(customer_id: CustomerId, distance: u32) -> Self {
        Self {
            customer_id,
            distance,
        }
    }
}

/// Emits orders for customers at random, reproducibly from a seed.
#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    rng: StdRng,
    order_probability: f64,
}

impl WorkloadGenerator {
    /// `order_probability` is the chance that a customer with quota left
    /// orders on a given tick. Clamped to `0.0..=1.0`.
    pub fn new(seed: u64, order_probability: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            order_probability: order_probability.clamp(0.0, 1.0),
        }
    }

    pub fn order_probability(&self) -> f64 {
        self.order_probability
    }

    /// Draws the next batch, visiting customers in ascending id.
    ///
    /// Customers without quota left are skipped without consuming a draw.
    pub fn next_batch(&mut self, customers: &[Customer]) -> Vec<NewOrder> {
        let mut visit: Vec<&Customer> = customers.iter().filter(|c| c.can_make_order()).collect();
        visit.sort_by_key(|c| c.id);

        let mut batch = Vec::new();
        for customer in visit {
            if self.rng.random_bool(self.order_probability) {
                batch.push(NewOrder::new(customer.id, customer.distance));
            }
        }
        trace!(orders = batch.len(), "workload batch drawn");
        batch
    }
}

/// Runs `ticks` ticks, submitting a fresh batch before each one.
pub fn drive(
    warehouse: &mut Warehouse,
    generator: &mut WorkloadGenerator,
    ticks: u64,
) -> Result<Vec<StepReport>> {
    let mut reports = Vec::new();
    for _ in 0..ticks {
        let batch = generator.next_batch(warehouse.customers());
        warehouse.submit_orders(&batch)?;
        reports.push(warehouse.step()?);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WarehouseError;
    use crate::models::{CustomerKind, Role};

    fn warehouse() -> Warehouse {
        let mut w = Warehouse::new();
        for (name, distance) in [("Maya", 4), ("David", 9), ("Ron", 2)] {
            w.add_customer(name, CustomerKind::Civilian, distance, 3)
                .unwrap();
        }
        w.add_volunteer("Noya", Role::Collector { cooldown: 2 }, None)
            .unwrap();
        w.add_volunteer(
            "Limor",
            Role::Driver {
                max_distance: 10,
                distance_per_step: 3,
            },
            Some(4),
        )
        .unwrap();
        w
    }

    #[test]
    fn test_same_seed_same_batches() {
        let customers = warehouse().customers().to_vec();
        let mut a = WorkloadGenerator::new(7, 0.5);
        let mut b = WorkloadGenerator::new(7, 0.5);
        for _ in 0..20 {
            assert_eq!(a.next_batch(&customers), b.next_batch(&customers));
        }
    }

    #[test]
    fn test_probability_bounds() {
        let customers = warehouse().customers().to_vec();

        let batch = WorkloadGenerator::new(1, 1.0).next_batch(&customers);
        assert_eq!(
            batch,
            vec![NewOrder::new(0, 4), NewOrder::new(1, 9), NewOrder::new(2, 2)]
        );
        assert!(WorkloadGenerator::new(1, 0.0)
            .next_batch(&customers)
            .is_empty());
        assert_eq!(WorkloadGenerator::new(1, 3.5).order_probability(), 1.0);
    }

    #[test]
    fn test_drive_respects_quota() {
        let mut w = warehouse();
        let mut generator = WorkloadGenerator::new(11, 1.0);
        let reports = drive(&mut w, &mut generator, 5).unwrap();

        assert_eq!(reports.len(), 5);
        assert_eq!(w.tick(), 5);
        // Three customers, three orders each; nobody exceeds the limit.
        assert_eq!(w.ledger().len(), 9);
        assert!(w.customers().iter().all(|c| !c.can_make_order()));
    }

    #[test]
    fn test_drive_closed_warehouse() {
        let mut w = warehouse();
        w.close().unwrap();
        let mut generator = WorkloadGenerator::new(5, 0.5);
        assert!(matches!(
            drive(&mut w, &mut generator, u64::MAX),
            Err(WarehouseError::InvalidState(_))
        ));
    }

    #[test]
    fn test_drive_deterministic() {
        let run = |seed| {
            let mut w = warehouse();
            let mut generator = WorkloadGenerator::new(seed, 0.4);
            drive(&mut w, &mut generator, 30).unwrap();
            w
        };
        let a = run(3);
        let b = run(3);
        assert_eq!(a.ledger(), b.ledger());
        assert_eq!(a.volunteers(), b.volunteers());
        assert_eq!(a.kpi(), b.kpi());
    }
}
