//! Console actions and the interactive session.
//!
//! Every console line parses into an [`Action`]. A [`Session`] executes
//! actions against its [`Warehouse`], keeps the action log and an optional
//! backup, and returns the lines to print.
//!
//! | Line | Action |
//! |------|--------|
//! | `step <n>` | [`Action::SimulateStep`] |
//! | `order <customer_id>` | [`Action::AddOrder`] |
//! | `customer <name> <soldier\|civilian> <distance> <max_orders>` | [`Action::AddCustomer`] |
//! | `orderStatus <id>` | [`Action::PrintOrderStatus`] |
//! | `customerStatus <id>` | [`Action::PrintCustomerStatus`] |
//! | `volunteerStatus <id>` | [`Action::PrintVolunteerStatus`] |
//! | `log` | [`Action::PrintActionsLog`] |
//! | `close` | [`Action::Close`] |
//! | `backup` | [`Action::BackupWarehouse`] |
//! | `restore` | [`Action::RestoreWarehouse`] |
//!
//! # Example
//!
//! ```
//! use u_warehouse::actions::Session;
//! use u_warehouse::warehouse::Warehouse;
//!
//! let mut session = Session::new(Warehouse::new());
//! assert_eq!(session.execute_line("restore"), vec!["Error: No backup available"]);
//! assert_eq!(session.execute_line("log"), vec!["restore ERROR"]);
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::WarehouseError;
use crate::models::{CustomerId, CustomerKind, OrderId, VolunteerId};
use crate::warehouse::Warehouse;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected} argument(s), got {found}")]
    Arity {
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("'{command}': invalid {argument} '{value}'")]
    InvalidArgument {
        command: &'static str,
        argument: &'static str,
        value: String,
    },
}

/// A user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SimulateStep {
        steps: u64,
    },
    AddOrder {
        customer_id: CustomerId,
    },
    AddCustomer {
        name: String,
        kind: CustomerKind,
        distance: u32,
        max_orders: u32,
    },
    PrintOrderStatus {
        order_id: OrderId,
    },
    PrintCustomerStatus {
        customer_id: CustomerId,
    },
    PrintVolunteerStatus {
        volunteer_id: VolunteerId,
    },
    PrintActionsLog,
    Close,
    BackupWarehouse,
    RestoreWarehouse,
}

impl Action {
    fn keyword(&self) -> &'static str {
        match self {
            Action::SimulateStep { .. } => "step",
            Action::AddOrder { .. } => "order",
            Action::AddCustomer { .. } => "customer",
            Action::PrintOrderStatus { .. } => "orderStatus",
            Action::PrintCustomerStatus { .. } => "customerStatus",
            Action::PrintVolunteerStatus { .. } => "volunteerStatus",
            Action::PrintActionsLog => "log",
            Action::Close => "close",
            Action::BackupWarehouse => "backup",
            Action::RestoreWarehouse => "restore",
        }
    }
}

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (&command, args) = tokens.split_first().ok_or(ActionParseError::Empty)?;

        let action = match command {
            "step" => {
                let [steps] = arity::<1>("step", args)?;
                Action::SimulateStep {
                    steps: parse_arg("step", "step count", steps)?,
                }
            }
            "order" => {
                let [customer_id] = arity::<1>("order", args)?;
                Action::AddOrder {
                    customer_id: parse_arg("order", "customer id", customer_id)?,
                }
            }
            "customer" => {
                let [name, kind, distance, max_orders] = arity::<4>("customer", args)?;
                Action::AddCustomer {
                    name: name.to_string(),
                    kind: parse_arg("customer", "customer type", kind)?,
                    distance: parse_arg("customer", "distance", distance)?,
                    max_orders: parse_arg("customer", "max orders", max_orders)?,
                }
            }
            "orderStatus" => {
                let [order_id] = arity::<1>("orderStatus", args)?;
                Action::PrintOrderStatus {
                    order_id: parse_arg("orderStatus", "order id", order_id)?,
                }
            }
            "customerStatus" => {
                let [customer_id] = arity::<1>("customerStatus", args)?;
                Action::PrintCustomerStatus {
                    customer_id: parse_arg("customerStatus", "customer id", customer_id)?,
                }
            }
            "volunteerStatus" => {
                let [volunteer_id] = arity::<1>("volunteerStatus", args)?;
                Action::PrintVolunteerStatus {
                    volunteer_id: parse_arg("volunteerStatus", "volunteer id", volunteer_id)?,
                }
            }
            "log" => {
                arity::<0>("log", args)?;
                Action::PrintActionsLog
            }
            "close" => {
                arity::<0>("close", args)?;
                Action::Close
            }
            "backup" => {
                arity::<0>("backup", args)?;
                Action::BackupWarehouse
            }
            "restore" => {
                arity::<0>("restore", args)?;
                Action::RestoreWarehouse
            }
            other => return Err(ActionParseError::UnknownCommand(other.to_string())),
        };
        Ok(action)
    }
}

fn arity<'a, const N: usize>(
    command: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], ActionParseError> {
    <[&str; N]>::try_from(args).map_err(|_| ActionParseError::Arity {
        command,
        expected: N,
        found: args.len(),
    })
}

fn parse_arg<T: FromStr>(
    command: &'static str,
    argument: &'static str,
    value: &str,
) -> Result<T, ActionParseError> {
    value.parse().map_err(|_| ActionParseError::InvalidArgument {
        command,
        argument,
        value: value.to_string(),
    })
}

/// Renders the action back as the line that produces it.
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())?;
        match self {
            Action::SimulateStep { steps } => write!(f, " {steps}"),
            Action::AddOrder { customer_id } | Action::PrintCustomerStatus { customer_id } => {
                write!(f, " {customer_id}")
            }
            Action::AddCustomer {
                name,
                kind,
                distance,
                max_orders,
            } => write!(f, " {name} {kind} {distance} {max_orders}"),
            Action::PrintOrderStatus { order_id } => write!(f, " {order_id}"),
            Action::PrintVolunteerStatus { volunteer_id } => write!(f, " {volunteer_id}"),
            Action::PrintActionsLog
            | Action::Close
            | Action::BackupWarehouse
            | Action::RestoreWarehouse => Ok(()),
        }
    }
}

/// Outcome of an executed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    Completed,
    Error(String),
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStatus::Completed => f.write_str("COMPLETED"),
            ActionStatus::Error(_) => f.write_str("ERROR"),
        }
    }
}

/// One entry of the action log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    pub action: Action,
    pub status: ActionStatus,
}

impl fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.status)
    }
}

/// Warehouse state and the action log as of a `backup`.
#[derive(Debug, Clone)]
struct Snapshot {
    warehouse: Warehouse,
    log: Vec<ActionRecord>,
}

/// A console session over one warehouse.
///
/// The action log belongs to the warehouse state: `backup` captures it and
/// `restore` brings it back along with the orders and roster.
#[derive(Debug, Clone)]
pub struct Session {
    warehouse: Warehouse,
    backup: Option<Snapshot>,
    log: Vec<ActionRecord>,
    closed: bool,
}

impl Session {
    pub fn new(warehouse: Warehouse) -> Self {
        Self {
            warehouse,
            backup: None,
            log: Vec::new(),
            closed: false,
        }
    }

    pub fn warehouse(&self) -> &Warehouse {
        &self.warehouse
    }

    pub fn log(&self) -> &[ActionRecord] {
        &self.log
    }

    pub fn has_backup(&self) -> bool {
        self.backup.is_some()
    }

    /// True once a `close` action succeeded.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Parses and executes one console line.
    ///
    /// Unparseable lines print an error and are not logged.
    pub fn execute_line(&mut self, line: &str) -> Vec<String> {
        match line.parse::<Action>() {
            Ok(action) => self.execute(action),
            Err(e) => {
                warn!(line, error = %e, "rejected console line");
                vec![format!("Error: {e}")]
            }
        }
    }

    /// Executes an action, records it in the log and returns its output.
    pub fn execute(&mut self, action: Action) -> Vec<String> {
        debug!(%action, "executing action");
        let (output, status) = match self.apply(&action) {
            Ok(lines) => (lines, ActionStatus::Completed),
            Err(message) => (
                vec![format!("Error: {message}")],
                ActionStatus::Error(message),
            ),
        };
        self.log.push(ActionRecord { action, status });
        output
    }

    fn apply(&mut self, action: &Action) -> Result<Vec<String>, String> {
        let lines = match action {
            Action::SimulateStep { steps } => {
                self.warehouse.advance(*steps).map_err(message)?;
                Vec::new()
            }
            Action::AddOrder { customer_id } => {
                self.warehouse
                    .add_order(*customer_id)
                    .map_err(|e| match e {
                        WarehouseError::InvalidState(_) => e.to_string(),
                        _ => "Cannot place this order".to_string(),
                    })?;
                Vec::new()
            }
            Action::AddCustomer {
                name,
                kind,
                distance,
                max_orders,
            } => {
                self.warehouse
                    .add_customer(name.clone(), *kind, *distance, *max_orders)
                    .map_err(message)?;
                Vec::new()
            }
            Action::PrintOrderStatus { order_id } => {
                let order = self
                    .warehouse
                    .order(*order_id)
                    .map_err(|_| "Order doesn't exist".to_string())?;
                lines_of(order)
            }
            Action::PrintCustomerStatus { customer_id } => self.customer_status(*customer_id)?,
            Action::PrintVolunteerStatus { volunteer_id } => {
                let volunteer = self
                    .warehouse
                    .volunteer(*volunteer_id)
                    .map_err(|_| "Volunteer doesn't exist".to_string())?;
                lines_of(volunteer)
            }
            Action::PrintActionsLog => self.log.iter().map(ToString::to_string).collect(),
            Action::Close => {
                let lines = self.warehouse.close().map_err(message)?;
                self.closed = true;
                lines
            }
            Action::BackupWarehouse => {
                self.ensure_open()?;
                self.backup = Some(Snapshot {
                    warehouse: self.warehouse.clone(),
                    log: self.log.clone(),
                });
                Vec::new()
            }
            Action::RestoreWarehouse => {
                self.ensure_open()?;
                let backup = self
                    .backup
                    .as_ref()
                    .ok_or_else(|| "No backup available".to_string())?;
                self.warehouse = backup.warehouse.clone();
                self.log = backup.log.clone();
                Vec::new()
            }
        };
        Ok(lines)
    }

    fn ensure_open(&self) -> Result<(), String> {
        if self.closed {
            Err("warehouse is closed".to_string())
        } else {
            Ok(())
        }
    }

    fn customer_status(&self, customer_id: CustomerId) -> Result<Vec<String>, String> {
        let customer = self
            .warehouse
            .customer(customer_id)
            .map_err(|_| "Customer doesn't exist".to_string())?;

        let mut lines = vec![format!("CustomerID: {}", customer.id)];
        for &order_id in customer.orders() {
            let order = self.warehouse.order(order_id).map_err(message)?;
            lines.push(format!("OrderID: {order_id}"));
            lines.push(format!("OrderStatus: {}", order.stage()));
        }
        lines.push(format!("numOrdersLeft: {}", customer.orders_left()));
        Ok(lines)
    }
}

fn message(e: WarehouseError) -> String {
    e.to_string()
}

fn lines_of(item: &impl fmt::Display) -> Vec<String> {
    item.to_string().lines().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CustomerConfig, VolunteerConfig, WarehouseConfig};

    fn session() -> Session {
        let config = WarehouseConfig {
            customers: vec![CustomerConfig::new("Maya", CustomerKind::Soldier, 3, 2)],
            volunteers: vec![
                VolunteerConfig::collector("Noya", 1),
                VolunteerConfig::driver("Limor", 5, 3).with_max_orders(2),
            ],
        };
        Session::new(Warehouse::from_config(&config).unwrap())
    }

    fn run(session: &mut Session, lines: &[&str]) -> Vec<String> {
        lines
            .iter()
            .flat_map(|line| session.execute_line(line))
            .collect()
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(
            "step 3".parse::<Action>(),
            Ok(Action::SimulateStep { steps: 3 })
        );
        assert_eq!(
            "  customer Ron civilian 4 2 ".parse::<Action>(),
            Ok(Action::AddCustomer {
                name: "Ron".to_string(),
                kind: CustomerKind::Civilian,
                distance: 4,
                max_orders: 2,
            })
        );
        assert_eq!(
            "volunteerStatus 1".parse::<Action>(),
            Ok(Action::PrintVolunteerStatus { volunteer_id: 1 })
        );
        assert_eq!("backup".parse::<Action>(), Ok(Action::BackupWarehouse));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Action>(), Err(ActionParseError::Empty));
        assert_eq!(
            "fly 3".parse::<Action>(),
            Err(ActionParseError::UnknownCommand("fly".to_string()))
        );
        assert_eq!(
            "step".parse::<Action>(),
            Err(ActionParseError::Arity {
                command: "step",
                expected: 1,
                found: 0
            })
        );
        assert!(matches!(
            "order -1".parse::<Action>(),
            Err(ActionParseError::InvalidArgument { .. })
        ));
        assert!("close now".parse::<Action>().is_err());
    }

    #[test]
    fn test_display_round_trips_line() {
        for line in ["step 2", "customer Ron soldier 4 1", "orderStatus 0", "log"] {
            assert_eq!(line.parse::<Action>().unwrap().to_string(), line);
        }
    }

    #[test]
    fn test_order_lifecycle_output() {
        let mut s = session();
        assert!(run(&mut s, &["order 0", "step 1"]).is_empty());

        assert_eq!(
            s.execute_line("orderStatus 0"),
            vec![
                "OrderId: 0",
                "OrderStatus: COLLECTING",
                "CustomerID: 0",
                "Collector: 0",
                "Driver: None",
            ]
        );
        assert_eq!(
            s.execute_line("volunteerStatus 1"),
            vec![
                "VolunteerID: 1",
                "isBusy: False",
                "OrderID: None",
                "DistanceLeft: None",
                "OrdersLeft: 2",
            ]
        );

        run(&mut s, &["step 2"]);
        assert_eq!(
            s.execute_line("customerStatus 0"),
            vec![
                "CustomerID: 0",
                "OrderID: 0",
                "OrderStatus: COMPLETED",
                "numOrdersLeft: 1",
            ]
        );
    }

    #[test]
    fn test_errors_are_logged() {
        let mut s = session();
        let out = run(
            &mut s,
            &["order 0", "order 0", "order 0", "orderStatus 9", "bogus"],
        );
        assert_eq!(
            out,
            vec![
                "Error: Cannot place this order",
                "Error: Order doesn't exist",
                "Error: unknown command 'bogus'",
            ]
        );

        assert_eq!(
            s.execute_line("log"),
            vec![
                "order 0 COMPLETED",
                "order 0 COMPLETED",
                "order 0 ERROR",
                "orderStatus 9 ERROR",
            ]
        );
        assert_eq!(s.log().len(), 5);
        assert_eq!(
            s.log()[2].status,
            ActionStatus::Error("Cannot place this order".to_string())
        );
    }

    #[test]
    fn test_backup_restore() {
        let mut s = session();
        assert_eq!(
            s.execute_line("restore"),
            vec!["Error: No backup available"]
        );

        run(&mut s, &["order 0", "backup", "step 5", "order 0"]);
        assert!(s.has_backup());
        assert_eq!(s.warehouse().ledger().len(), 2);

        run(&mut s, &["restore"]);
        assert_eq!(s.warehouse().tick(), 0);
        assert_eq!(s.warehouse().ledger().len(), 1);
        // The log rolls back with the warehouse, then records the restore.
        let log: Vec<String> = s.log().iter().map(ToString::to_string).collect();
        assert_eq!(
            log,
            vec!["restore ERROR", "order 0 COMPLETED", "restore COMPLETED"]
        );
    }

    #[test]
    fn test_restore_rejected_after_close() {
        let mut s = session();
        run(&mut s, &["order 0", "backup", "close"]);
        assert!(s.is_closed());

        assert_eq!(
            s.execute_line("restore"),
            vec!["Error: warehouse is closed"]
        );
        assert_eq!(s.execute_line("backup"), vec!["Error: warehouse is closed"]);
        assert!(s.is_closed());
        assert!(!s.warehouse().is_open());
        assert_eq!(
            s.execute_line("order 0"),
            vec!["Error: warehouse is closed"]
        );
        assert_eq!(s.warehouse().ledger().len(), 1);
    }

    #[test]
    fn test_close() {
        let mut s = session();
        run(&mut s, &["order 0", "step 1", "order 0"]);

        let out = s.execute_line("close");
        assert_eq!(
            out,
            vec![
                "OrderID: 0, CustomerID: 0, OrderStatus: COLLECTING",
                "OrderID: 1, CustomerID: 0, OrderStatus: PENDING",
            ]
        );
        assert!(s.is_closed());
        assert_eq!(
            s.execute_line("step 1"),
            vec!["Error: warehouse is closed"]
        );
    }
}
