//! Run-level performance indicators.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Throughput | Completed orders per elapsed tick |
//! | Avg Lead Time | Mean ticks from placement to delivery |
//! | Max Lead Time | Largest single lead time |
//! | Avg Utilization | Mean of busy ticks / elapsed ticks per volunteer |
//! | Exhausted Volunteers | Limited volunteers with no quota left |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{OrderLedger, Tick, Volunteer, VolunteerId};

/// Warehouse performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseKpi {
    /// Ticks simulated so far.
    pub elapsed_ticks: Tick,
    /// Orders placed.
    pub orders_created: usize,
    /// Orders delivered.
    pub orders_completed: usize,
    /// Orders delivered per tick.
    pub throughput: f64,
    /// Mean lead time of delivered orders (ticks).
    pub avg_lead_time: f64,
    /// Largest lead time of any delivered order (ticks).
    pub max_lead_time: Tick,
    /// Per-volunteer utilization (0.0..1.0).
    pub utilization_by_volunteer: BTreeMap<VolunteerId, f64>,
    /// Mean volunteer utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Volunteers whose quota is used up.
    pub exhausted_volunteers: usize,
}

impl WarehouseKpi {
    /// Computes KPIs from the order ledger and roster after `elapsed_ticks`.
    pub fn calculate(ledger: &OrderLedger, roster: &[Volunteer], elapsed_ticks: Tick) -> Self {
        let lead_times: Vec<Tick> = ledger
            .completed()
            .iter()
            .filter_map(|o| o.lead_time())
            .collect();

        let orders_completed = ledger.completed().len();
        let avg_lead_time = if lead_times.is_empty() {
            0.0
        } else {
            lead_times.iter().sum::<Tick>() as f64 / lead_times.len() as f64
        };
        let max_lead_time = lead_times.iter().copied().max().unwrap_or(0);

        let throughput = if elapsed_ticks == 0 {
            0.0
        } else {
            orders_completed as f64 / elapsed_ticks as f64
        };

        let utilization_by_volunteer: BTreeMap<VolunteerId, f64> = if elapsed_ticks == 0 {
            BTreeMap::new()
        } else {
            roster
                .iter()
                .map(|v| (v.id, v.busy_ticks() as f64 / elapsed_ticks as f64))
                .collect()
        };
        let avg_utilization = if utilization_by_volunteer.is_empty() {
            0.0
        } else {
            utilization_by_volunteer.values().sum::<f64>() / utilization_by_volunteer.len() as f64
        };

        let exhausted_volunteers = roster.iter().filter(|v| !v.has_capacity_left()).count();

        Self {
            elapsed_ticks,
            orders_created: ledger.len(),
            orders_completed,
            throughput,
            avg_lead_time,
            max_lead_time,
            utilization_by_volunteer,
            avg_utilization,
            exhausted_volunteers,
        }
    }

    /// Whether the run meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_lead_time: Tick, min_utilization: f64) -> bool {
        self.max_lead_time <= max_lead_time && self.avg_utilization >= min_utilization
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Order;
    use crate::scheduler::StepScheduler;

    fn run(ticks: Tick) -> (OrderLedger, Vec<Volunteer>) {
        let mut ledger = OrderLedger::new();
        ledger.insert(Order::new(0, 0, 4, 0)).unwrap();
        ledger.insert(Order::new(1, 0, 8, 0)).unwrap();
        let mut roster = vec![
            Volunteer::collector(0, "C", 1),
            Volunteer::driver(1, "D", 10, 4).with_quota(1),
        ];
        let scheduler = StepScheduler::new();
        for tick in 1..=ticks {
            scheduler.step(tick, &mut ledger, &mut roster).unwrap();
        }
        (ledger, roster)
    }

    #[test]
    fn test_kpi_basic() {
        // t1: C takes 0. t2: 0 collected, D takes 0, C takes 1.
        // t3: D delivers 0, 1 collected but D's quota is spent.
        let (ledger, roster) = run(4);
        let kpi = WarehouseKpi::calculate(&ledger, &roster, 4);

        assert_eq!(kpi.orders_created, 2);
        assert_eq!(kpi.orders_completed, 1);
        assert_eq!(kpi.max_lead_time, 3);
        assert!((kpi.avg_lead_time - 3.0).abs() < 1e-10);
        assert!((kpi.throughput - 0.25).abs() < 1e-10);
        assert_eq!(kpi.exhausted_volunteers, 1);
        // C busy on t2, t3; D busy on t3.
        assert!((kpi.utilization_by_volunteer[&0] - 0.5).abs() < 1e-10);
        assert!((kpi.utilization_by_volunteer[&1] - 0.25).abs() < 1e-10);
        assert!((kpi.avg_utilization - 0.375).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = WarehouseKpi::calculate(&OrderLedger::new(), &[], 0);
        assert_eq!(kpi.orders_created, 0);
        assert_eq!(kpi.max_lead_time, 0);
        assert!((kpi.throughput - 0.0).abs() < 1e-10);
        assert!((kpi.avg_utilization - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_meets_thresholds() {
        let (ledger, roster) = run(4);
        let kpi = WarehouseKpi::calculate(&ledger, &roster, 4);
        assert!(kpi.meets_thresholds(3, 0.3));
        assert!(!kpi.meets_thresholds(2, 0.0));
        assert!(!kpi.meets_thresholds(10, 0.5));
    }
}
