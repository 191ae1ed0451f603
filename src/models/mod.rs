//! Warehouse domain models.
//!
//! Provides the data types the simulation operates on: orders and their
//! lifecycle, the order ledger, volunteers with their capacity rules, and
//! customers.
//!
//! # Domain Mappings
//!
//! | u-warehouse | Scheduling | Ride hailing |
//! |-------------|-----------|--------------|
//! | Order | Job | Trip request |
//! | Volunteer | Resource | Driver |
//! | Collector / Driver | Machine stage 1 / 2 | Pickup / Drop-off |
//! | Tick | Time bucket | Simulation step |

mod customer;
mod ledger;
mod order;
mod volunteer;

pub use customer::{Customer, CustomerKind};
pub use ledger::{LedgerCounts, OrderLedger};
pub use order::{Order, OrderStage};
pub use volunteer::{Quota, Role, Volunteer, VolunteerKind, VolunteerStatus};

/// Unique order identifier, assigned in creation order.
pub type OrderId = u32;
/// Unique volunteer identifier.
pub type VolunteerId = u32;
/// Unique customer identifier.
pub type CustomerId = u32;
/// Discrete simulation time. Tick 0 is the state before the first step.
pub type Tick = u64;
