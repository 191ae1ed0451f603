//! The warehouse: sole owner of customers, roster and order ledger.
//!
//! All mutation goes through [`Warehouse`]. A step runs the
//! [`StepScheduler`] on copies of the pending and in-process orders and the
//! roster, and only commits them when the whole tick succeeded, so
//! observers never see half a tick.
//!
//! # Example
//!
//! ```
//! use u_warehouse::models::{CustomerKind, OrderStage, Role};
//! use u_warehouse::warehouse::Warehouse;
//!
//! let mut warehouse = Warehouse::new();
//! let maya = warehouse
//!     .add_customer("Maya", CustomerKind::Soldier, 3, 1)
//!     .unwrap();
//! warehouse
//!     .add_volunteer("Noya", Role::Collector { cooldown: 1 }, None)
//!     .unwrap();
//! warehouse
//!     .add_volunteer(
//!         "Limor",
//!         Role::Driver { max_distance: 5, distance_per_step: 3 },
//!         None,
//!     )
//!     .unwrap();
//!
//! let order = warehouse.add_order(maya).unwrap();
//! warehouse.run(3).unwrap();
//! assert_eq!(warehouse.order(order).unwrap().stage(), OrderStage::Completed);
//! ```

use tracing::{debug, info};

use crate::config::{ConfigError, WarehouseConfig};
use crate::error::{Entity, Result, WarehouseError};
use crate::models::{
    Customer, CustomerId, CustomerKind, Order, OrderId, OrderLedger, Role, Tick, Volunteer,
    VolunteerId,
};
use crate::scheduler::{StepReport, StepScheduler, WarehouseKpi};
use crate::workload::NewOrder;

#[derive(Debug, Clone, Default)]
pub struct Warehouse {
    tick: Tick,
    open: bool,
    ledger: OrderLedger,
    /// Sorted by ascending id.
    roster: Vec<Volunteer>,
    /// Indexed by customer id.
    customers: Vec<Customer>,
    scheduler: StepScheduler,
    next_order_id: OrderId,
    next_volunteer_id: VolunteerId,
}

impl Warehouse {
    /// Creates an empty, open warehouse with the default scheduler.
    pub fn new() -> Self {
        Self {
            open: true,
            ..Self::default()
        }
    }

    /// Builds a warehouse from a validated configuration.
    ///
    /// Customers and volunteers get ids in file order, starting at 0.
    pub fn from_config(config: &WarehouseConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let mut warehouse = Self::new();
        for (id, customer) in config.customers.iter().enumerate() {
            warehouse.push_customer(Customer::new(
                id as CustomerId,
                customer.name.clone(),
                customer.kind,
                customer.distance,
                customer.max_orders,
            ));
        }
        for volunteer in &config.volunteers {
            let id = warehouse.next_volunteer_id;
            warehouse.push_volunteer(volunteer.build(id));
        }

        info!(
            customers = warehouse.customers.len(),
            volunteers = warehouse.roster.len(),
            "warehouse opened"
        );
        Ok(warehouse)
    }

    /// Replaces the step scheduler (e.g. to change the order ranking).
    pub fn with_scheduler(mut self, scheduler: StepScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Last simulated tick. 0 before the first step.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn ledger(&self) -> &OrderLedger {
        &self.ledger
    }

    pub fn add_customer(
        &mut self,
        name: impl Into<String>,
        kind: CustomerKind,
        distance: u32,
        max_orders: u32,
    ) -> Result<CustomerId> {
        self.ensure_open()?;
        Ok(self.push_customer(Customer::new(
            self.customers.len() as CustomerId,
            name,
            kind,
            distance,
            max_orders,
        )))
    }

    /// Adds a volunteer; `quota` makes it a limited one.
    pub fn add_volunteer(
        &mut self,
        name: impl Into<String>,
        role: Role,
        quota: Option<u32>,
    ) -> Result<VolunteerId> {
        self.ensure_open()?;
        let volunteer = Volunteer::new(self.next_volunteer_id, name, role);
        let volunteer = match quota {
            Some(max_orders) => volunteer.with_quota(max_orders),
            None => volunteer,
        };
        Ok(self.push_volunteer(volunteer))
    }

    fn push_customer(&mut self, customer: Customer) -> CustomerId {
        let id = customer.id;
        debug!(customer_id = id, name = %customer.name, kind = %customer.kind, "customer added");
        self.customers.push(customer);
        id
    }

    fn push_volunteer(&mut self, volunteer: Volunteer) -> VolunteerId {
        let id = volunteer.id;
        self.next_volunteer_id = id + 1;
        debug!(volunteer_id = id, kind = %volunteer.kind(), "volunteer added");
        self.roster.push(volunteer);
        id
    }

    /// Removes an idle volunteer from the roster.
    pub fn remove_volunteer(&mut self, id: VolunteerId) -> Result<Volunteer> {
        self.ensure_open()?;
        let idx = self
            .roster
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| WarehouseError::not_found(Entity::Volunteer, id))?;
        if self.roster[idx].is_busy() {
            return Err(WarehouseError::Precondition(format!(
                "volunteer {id} is busy and cannot be removed"
            )));
        }
        debug!(volunteer_id = id, "volunteer removed");
        Ok(self.roster.remove(idx))
    }

    /// Places an order for `customer_id` at the customer's distance.
    pub fn add_order(&mut self, customer_id: CustomerId) -> Result<OrderId> {
        self.ensure_open()?;
        let distance = self.customer(customer_id)?.distance;
        self.place_order(customer_id, distance)
    }

    /// Places a batch of orders. Either every order is placed or none is.
    pub fn submit_orders(&mut self, orders: &[NewOrder]) -> Result<Vec<OrderId>> {
        self.ensure_open()?;

        let saved = (
            self.ledger.clone(),
            self.customers.clone(),
            self.next_order_id,
        );
        let mut ids = Vec::with_capacity(orders.len());
        for order in orders {
            match self.place_order(order.customer_id, order.distance) {
                Ok(id) => ids.push(id),
                Err(e) => {
                    (self.ledger, self.customers, self.next_order_id) = saved;
                    return Err(e);
                }
            }
        }
        Ok(ids)
    }

    fn place_order(&mut self, customer_id: CustomerId, distance: u32) -> Result<OrderId> {
        let id = self.next_order_id;
        let customer = self
            .customers
            .get_mut(customer_id as usize)
            .ok_or_else(|| WarehouseError::not_found(Entity::Customer, customer_id))?;
        if !customer.record_order(id) {
            return Err(WarehouseError::Precondition(format!(
                "customer {customer_id} has reached its order limit of {}",
                customer.max_orders
            )));
        }

        self.ledger.insert(Order::new(id, customer_id, distance, self.tick))?;
        self.next_order_id += 1;
        debug!(order_id = id, customer_id, distance, tick = self.tick, "order placed");
        Ok(id)
    }

    /// Simulates the next tick.
    ///
    /// The tick runs on copies of the pending and in-process sets and the
    /// roster. The completed set is moved aside instead of copied.
    pub fn step(&mut self) -> Result<StepReport> {
        self.ensure_open()?;
        let tick = self.tick + 1;

        let completed = self.ledger.split_completed();
        let mut ledger = self.ledger.clone();
        let mut roster = self.roster.clone();
        let mut report = match self.scheduler.step(tick, &mut ledger, &mut roster) {
            Ok(report) => report,
            Err(e) => {
                self.ledger.merge_completed(completed);
                return Err(e);
            }
        };

        ledger.merge_completed(completed);
        // The scheduler only saw this tick's completions.
        report.counts = ledger.counts();
        self.ledger = ledger;
        self.roster = roster;
        self.tick = tick;
        Ok(report)
    }

    /// Simulates `ticks` ticks, stopping at the first failure.
    pub fn run(&mut self, ticks: u64) -> Result<Vec<StepReport>> {
        (0..ticks).map(|_| self.step()).collect()
    }

    /// Simulates `ticks` ticks without keeping the reports.
    pub fn advance(&mut self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(())
    }

    pub fn order(&self, id: OrderId) -> Result<&Order> {
        self.ledger.get(id)
    }

    pub fn volunteer(&self, id: VolunteerId) -> Result<&Volunteer> {
        self.roster
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| WarehouseError::not_found(Entity::Volunteer, id))
    }

    pub fn customer(&self, id: CustomerId) -> Result<&Customer> {
        self.customers
            .get(id as usize)
            .ok_or_else(|| WarehouseError::not_found(Entity::Customer, id))
    }

    pub fn pending_orders(&self) -> &[Order] {
        self.ledger.pending()
    }

    pub fn in_process_orders(&self) -> &[Order] {
        self.ledger.in_process()
    }

    pub fn completed_orders(&self) -> &[Order] {
        self.ledger.completed()
    }

    pub fn volunteers(&self) -> &[Volunteer] {
        &self.roster
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn kpi(&self) -> WarehouseKpi {
        WarehouseKpi::calculate(&self.ledger, &self.roster, self.tick)
    }

    /// Closes the warehouse and returns one summary line per order.
    pub fn close(&mut self) -> Result<Vec<String>> {
        self.ensure_open()?;
        self.open = false;

        let lines: Vec<String> = self
            .ledger
            .all_orders()
            .into_iter()
            .map(|o| {
                format!(
                    "OrderID: {}, CustomerID: {}, OrderStatus: {}",
                    o.id,
                    o.customer_id,
                    o.stage()
                )
            })
            .collect();
        info!(tick = self.tick, orders = lines.len(), "warehouse closed");
        Ok(lines)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(WarehouseError::InvalidState("warehouse is closed".to_string()))
        }
    }
}
