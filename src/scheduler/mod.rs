//! Step scheduler and run KPIs.
//!
//! `StepScheduler` advances the simulation by one tick: capacity decay,
//! lifecycle transitions, then both assignment passes. Ticks are strictly
//! sequential and triggered from outside; nothing runs between them.
//!
//! `WarehouseKpi` summarizes a run: throughput, lead time, utilization.

mod kpi;
mod step;

pub use kpi::WarehouseKpi;
pub use step::{Completion, StepReport, StepScheduler};
