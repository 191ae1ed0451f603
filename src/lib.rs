//! Tick-driven warehouse simulation.
//!
//! Customers place orders; volunteers carry them through a fixed pipeline:
//! a collector picks the order up, a driver delivers it. Time advances in
//! discrete ticks, and each tick decays volunteer capacity, applies the
//! resulting lifecycle transitions and matches waiting orders to idle
//! volunteers.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Order`, `OrderStage`, `OrderLedger`,
//!   `Volunteer`, `Role`, `Quota`, `Customer`
//! - **`dispatching`**: First-fit `AssignmentEngine` and the order ranking
//!   rules it scans with
//! - **`scheduler`**: `StepScheduler` (one tick) and `WarehouseKpi`
//! - **`warehouse`**: `Warehouse`, the owner of all simulation state
//! - **`actions`**: Console commands and the interactive `Session`
//! - **`config`**: Text and JSON configuration loading
//! - **`validation`**: Configuration checks (zero rates, missing roles)
//! - **`workload`**: Seeded random order generation
//!
//! # Order Lifecycle
//!
//! ```text
//! PENDING → COLLECTING → AWAITING_DELIVERY → DELIVERING → COMPLETED
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", ch. 7 (flow shops)
//! - Law (2015), "Simulation Modeling and Analysis", ch. 1 (discrete-time simulation)

pub mod actions;
pub mod config;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;
pub mod warehouse;
pub mod workload;

pub use error::{Result, WarehouseError};
pub use warehouse::Warehouse;
