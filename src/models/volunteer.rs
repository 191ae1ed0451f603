//! Volunteer model and capacity rules.
//!
//! Volunteers are the workers that carry orders through the pipeline.
//! Each one has a [`Role`] that decides which stage it serves and how its
//! per-order countdown decays, plus an optional [`Quota`] limiting how many
//! orders it may accept over its lifetime.
//!
//! | Kind | Serves | Countdown | Quota |
//! |------|--------|-----------|-------|
//! | Collector | `Pending` | `cooldown` ticks | none |
//! | LimitedCollector | `Pending` | `cooldown` ticks | `max_orders` |
//! | Driver | `AwaitingDelivery` | order distance, `distance_per_step` per tick | none |
//! | LimitedDriver | `AwaitingDelivery` | order distance, `distance_per_step` per tick | `max_orders` |

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Order, OrderId, OrderStage, VolunteerId};
use crate::error::{Result, WarehouseError};

/// What a volunteer does and how fast it does it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Role {
    /// Picks orders up; each pickup takes `cooldown` ticks.
    Collector { cooldown: u32 },
    /// Delivers collected orders no farther than `max_distance`, covering
    /// `distance_per_step` each tick.
    Driver {
        max_distance: u32,
        distance_per_step: u32,
    },
}

impl Role {
    /// The order stage this role picks orders from.
    pub fn source_stage(&self) -> OrderStage {
        match self {
            Role::Collector { .. } => OrderStage::Pending,
            Role::Driver { .. } => OrderStage::AwaitingDelivery,
        }
    }
}

/// Lifetime limit on accepted orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    pub max_orders: u32,
    pub orders_left: u32,
}

impl Quota {
    pub fn new(max_orders: u32) -> Self {
        Self {
            max_orders,
            orders_left: max_orders,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.orders_left == 0
    }
}

/// Role and quota flattened into the four volunteer kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolunteerKind {
    Collector,
    LimitedCollector,
    Driver,
    LimitedDriver,
}

impl VolunteerKind {
    /// Keyword used by the text configuration format.
    pub fn keyword(&self) -> &'static str {
        match self {
            VolunteerKind::Collector => "collector",
            VolunteerKind::LimitedCollector => "limited_collector",
            VolunteerKind::Driver => "driver",
            VolunteerKind::LimitedDriver => "limited_driver",
        }
    }

    /// Parses a configuration keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "collector" => Some(VolunteerKind::Collector),
            "limited_collector" => Some(VolunteerKind::LimitedCollector),
            "driver" => Some(VolunteerKind::Driver),
            "limited_driver" => Some(VolunteerKind::LimitedDriver),
            _ => None,
        }
    }

    pub fn is_limited(&self) -> bool {
        matches!(
            self,
            VolunteerKind::LimitedCollector | VolunteerKind::LimitedDriver
        )
    }
}

impl fmt::Display for VolunteerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VolunteerKind::Collector => "Collector",
            VolunteerKind::LimitedCollector => "LimitedCollector",
            VolunteerKind::Driver => "Driver",
            VolunteerKind::LimitedDriver => "LimitedDriver",
        };
        f.write_str(name)
    }
}

/// A volunteer worker.
///
/// `Clone` produces an independent deep copy of all capacity state.
///
/// # Example
/// ```
/// use u_warehouse::models::{Order, Volunteer};
///
/// let mut collector = Volunteer::collector(0, "Noya", 2);
/// let order = Order::new(0, 0, 5, 0);
///
/// assert!(collector.can_accept(&order));
/// collector.accept(&order).unwrap();
/// assert!(collector.is_busy());
///
/// assert!(!collector.advance().unwrap());
/// assert!(collector.advance().unwrap());
/// assert_eq!(collector.completed_order(), Some(0));
/// assert!(!collector.is_busy());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volunteer {
    /// Unique volunteer identifier.
    pub id: VolunteerId,
    /// Display name.
    pub name: String,
    role: Role,
    quota: Option<Quota>,
    active_order: Option<OrderId>,
    completed_order: Option<OrderId>,
    /// Ticks (collectors) or distance (drivers) left on the active order.
    remaining: u32,
    busy_ticks: u64,
    orders_accepted: u32,
}

impl Volunteer {
    /// Creates an idle volunteer with no quota.
    pub fn new(id: VolunteerId, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            quota: None,
            active_order: None,
            completed_order: None,
            remaining: 0,
            busy_ticks: 0,
            orders_accepted: 0,
        }
    }

    /// Creates an unlimited collector.
    pub fn collector(id: VolunteerId, name: impl Into<String>, cooldown: u32) -> Self {
        Self::new(id, name, Role::Collector { cooldown })
    }

    /// Creates an unlimited driver.
    pub fn driver(
        id: VolunteerId,
        name: impl Into<String>,
        max_distance: u32,
        distance_per_step: u32,
    ) -> Self {
        Self::new(
            id,
            name,
            Role::Driver {
                max_distance,
                distance_per_step,
            },
        )
    }

    /// Limits the volunteer to `max_orders` accepted orders.
    pub fn with_quota(mut self, max_orders: u32) -> Self {
        self.quota = Some(Quota::new(max_orders));
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn quota(&self) -> Option<Quota> {
        self.quota
    }

    pub fn kind(&self) -> VolunteerKind {
        match (&self.role, self.quota.is_some()) {
            (Role::Collector { .. }, false) => VolunteerKind::Collector,
            (Role::Collector { .. }, true) => VolunteerKind::LimitedCollector,
            (Role::Driver { .. }, false) => VolunteerKind::Driver,
            (Role::Driver { .. }, true) => VolunteerKind::LimitedDriver,
        }
    }

    pub fn is_collector(&self) -> bool {
        matches!(self.role, Role::Collector { .. })
    }

    pub fn is_driver(&self) -> bool {
        matches!(self.role, Role::Driver { .. })
    }

    pub fn active_order(&self) -> Option<OrderId> {
        self.active_order
    }

    pub fn completed_order(&self) -> Option<OrderId> {
        self.completed_order
    }

    /// Countdown left on the active order, in role units.
    pub fn remaining(&self) -> Option<u32> {
        self.active_order.map(|_| self.remaining)
    }

    /// Orders the volunteer may still accept. `None` means unlimited.
    pub fn orders_left(&self) -> Option<u32> {
        self.quota.map(|q| q.orders_left)
    }

    /// Number of ticks spent working on orders.
    pub fn busy_ticks(&self) -> u64 {
        self.busy_ticks
    }

    /// Number of orders accepted so far.
    pub fn orders_accepted(&self) -> u32 {
        self.orders_accepted
    }

    pub fn is_busy(&self) -> bool {
        self.active_order.is_some()
    }

    /// Always true for unlimited volunteers.
    pub fn has_capacity_left(&self) -> bool {
        self.quota.map_or(true, |q| !q.is_exhausted())
    }

    /// Whether this volunteer may take `order` right now.
    ///
    /// Requires an idle volunteer with quota left and an order waiting in the
    /// stage this role serves. Drivers additionally reject orders farther
    /// than their `max_distance`.
    pub fn can_accept(&self, order: &Order) -> bool {
        if self.is_busy() || !self.has_capacity_left() {
            return false;
        }
        if order.stage() != self.role.source_stage() {
            return false;
        }
        match self.role {
            Role::Collector { .. } => true,
            Role::Driver { max_distance, .. } => order.distance <= max_distance,
        }
    }

    /// Takes `order` and starts its countdown.
    ///
    /// Fails with [`WarehouseError::Precondition`] if [`Self::can_accept`]
    /// rejects the order; the volunteer is left untouched in that case.
    pub fn accept(&mut self, order: &Order) -> Result<()> {
        if !self.can_accept(order) {
            return Err(WarehouseError::Precondition(format!(
                "volunteer {} ({}) cannot accept order {}",
                self.id,
                self.kind(),
                order.id
            )));
        }
        self.active_order = Some(order.id);
        self.remaining = match self.role {
            Role::Collector { cooldown } => cooldown,
            Role::Driver { .. } => order.distance,
        };
        if let Some(quota) = self.quota.as_mut() {
            quota.orders_left -= 1;
        }
        self.orders_accepted += 1;
        Ok(())
    }

    /// Performs one tick of work on the active order.
    ///
    /// Returns `true` when the countdown reaches zero on this call; the
    /// order then moves to [`Self::completed_order`] and the volunteer is
    /// idle again.
    pub fn advance(&mut self) -> Result<bool> {
        let Some(order_id) = self.active_order else {
            return Err(WarehouseError::Precondition(format!(
                "volunteer {} has no active order to advance",
                self.id
            )));
        };

        self.busy_ticks += 1;
        let decay = match self.role {
            Role::Collector { .. } => 1,
            Role::Driver {
                distance_per_step, ..
            } => distance_per_step,
        };
        self.remaining = self.remaining.saturating_sub(decay);

        if self.remaining > 0 {
            return Ok(false);
        }
        self.completed_order = Some(order_id);
        self.active_order = None;
        Ok(true)
    }

    /// Snapshot of the current state for reporting.
    pub fn status(&self) -> VolunteerStatus {
        VolunteerStatus {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind(),
            busy: self.is_busy(),
            active_order: self.active_order,
            remaining: self.remaining(),
            orders_left: self.orders_left(),
        }
    }
}

/// Point-in-time view of a volunteer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerStatus {
    pub id: VolunteerId,
    pub name: String,
    pub kind: VolunteerKind,
    pub busy: bool,
    pub active_order: Option<OrderId>,
    /// Ticks (collectors) or distance (drivers) left. `None` when idle.
    pub remaining: Option<u32>,
    /// `None` for unlimited volunteers.
    pub orders_left: Option<u32>,
}

impl fmt::Display for Volunteer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let remaining_label = if self.is_collector() {
            "TimeLeft"
        } else {
            "DistanceLeft"
        };
        writeln!(f, "VolunteerID: {}", self.id)?;
        match self.active_order {
            Some(order_id) => {
                writeln!(f, "isBusy: True")?;
                writeln!(f, "OrderID: {order_id}")?;
                writeln!(f, "{remaining_label}: {}", self.remaining)?;
            }
            None => {
                writeln!(f, "isBusy: False")?;
                writeln!(f, "OrderID: None")?;
                writeln!(f, "{remaining_label}: None")?;
            }
        }
        match self.orders_left() {
            Some(left) => write!(f, "OrdersLeft: {left}"),
            None => write!(f, "OrdersLeft: No Limit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn awaiting_delivery(id: OrderId, distance: u32) -> Order {
        let mut order = Order::new(id, 0, distance, 0);
        order.begin_collection(99, 0).unwrap();
        order.finish_collection(1).unwrap();
        order
    }

    #[test]
    fn test_collector_cooldown_scenario() {
        let mut v = Volunteer::collector(0, "Noya", 2);
        let order = Order::new(1, 0, 4, 0);
        v.accept(&order).unwrap();
        assert_eq!(v.remaining(), Some(2));

        assert!(!v.advance().unwrap());
        assert_eq!(v.remaining(), Some(1));
        assert!(v.is_busy());

        assert!(v.advance().unwrap());
        assert!(!v.is_busy());
        assert_eq!(v.active_order(), None);
        assert_eq!(v.completed_order(), Some(1));
        assert_eq!(v.busy_ticks(), 2);
    }

    #[test]
    fn test_driver_clamps_at_zero() {
        let mut v = Volunteer::driver(0, "Limor", 10, 4);
        let order = awaiting_delivery(1, 9);
        assert!(v.can_accept(&order));
        v.accept(&order).unwrap();

        assert!(!v.advance().unwrap());
        assert_eq!(v.remaining(), Some(5));
        assert!(!v.advance().unwrap());
        assert_eq!(v.remaining(), Some(1));
        assert!(v.advance().unwrap());
        assert_eq!(v.completed_order(), Some(1));
        assert_eq!(v.remaining(), None);
    }

    #[test]
    fn test_driver_rejects_far_order() {
        let mut v = Volunteer::driver(0, "Limor", 10, 4);
        let far = awaiting_delivery(1, 11);
        assert!(!v.can_accept(&far));
        assert!(matches!(
            v.accept(&far),
            Err(WarehouseError::Precondition(_))
        ));
        assert!(!v.is_busy());

        let edge = awaiting_delivery(2, 10);
        assert!(v.can_accept(&edge));
    }

    #[test]
    fn test_roles_only_serve_their_stage() {
        let collector = Volunteer::collector(0, "C", 1);
        let driver = Volunteer::driver(1, "D", 10, 1);
        let pending = Order::new(0, 0, 3, 0);
        let collected = awaiting_delivery(1, 3);

        assert!(collector.can_accept(&pending));
        assert!(!collector.can_accept(&collected));
        assert!(!driver.can_accept(&pending));
        assert!(driver.can_accept(&collected));
    }

    #[test]
    fn test_limited_driver_quota() {
        let mut v = Volunteer::driver(0, "Din", 13, 4).with_quota(1);
        assert_eq!(v.kind(), VolunteerKind::LimitedDriver);

        let first = awaiting_delivery(1, 4);
        v.accept(&first).unwrap();
        assert_eq!(v.orders_left(), Some(0));
        assert!(v.advance().unwrap());

        let second = awaiting_delivery(2, 4);
        assert!(!v.is_busy());
        assert!(!v.has_capacity_left());
        assert!(!v.can_accept(&second));
    }

    #[test]
    fn test_quota_monotonic() {
        let mut v = Volunteer::collector(0, "Ibrahim", 1).with_quota(3);
        let mut seen = vec![v.orders_left().unwrap()];
        for id in 0..5 {
            let order = Order::new(id, 0, 1, 0);
            if v.can_accept(&order) {
                v.accept(&order).unwrap();
                assert!(v.advance().unwrap());
            }
            seen.push(v.orders_left().unwrap());
        }
        assert!(seen.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(v.orders_accepted(), 3);
        assert_eq!(v.orders_left(), Some(0));
    }

    #[test]
    fn test_busy_invariant() {
        let mut v = Volunteer::collector(0, "C", 3);
        let check = |v: &Volunteer| assert_eq!(v.is_busy(), v.active_order().is_some());

        check(&v);
        v.accept(&Order::new(0, 0, 1, 0)).unwrap();
        check(&v);
        while !v.advance().unwrap() {
            check(&v);
        }
        check(&v);
    }

    #[test]
    fn test_advance_idle_fails() {
        let mut v = Volunteer::collector(0, "C", 3);
        assert!(matches!(
            v.advance(),
            Err(WarehouseError::Precondition(_))
        ));
        assert_eq!(v.busy_ticks(), 0);
    }

    #[test]
    fn test_busy_rejects_second_order() {
        let mut v = Volunteer::collector(0, "C", 3);
        v.accept(&Order::new(0, 0, 1, 0)).unwrap();
        assert!(v.accept(&Order::new(1, 0, 1, 0)).is_err());
        assert_eq!(v.active_order(), Some(0));
    }

    #[test]
    fn test_zero_distance_completes_next_tick() {
        let mut v = Volunteer::driver(0, "D", 5, 2);
        v.accept(&awaiting_delivery(0, 0)).unwrap();
        assert!(v.advance().unwrap());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = Volunteer::collector(0, "C", 2).with_quota(2);
        original.accept(&Order::new(0, 0, 1, 0)).unwrap();

        let mut copy = original.clone();
        copy.advance().unwrap();
        copy.advance().unwrap();

        assert!(original.is_busy());
        assert_eq!(original.remaining(), Some(2));
        assert!(!copy.is_busy());
        assert_eq!(copy.orders_left(), original.orders_left());
    }

    #[test]
    fn test_kinds_and_keywords() {
        let kinds = [
            Volunteer::collector(0, "a", 1).kind(),
            Volunteer::collector(1, "b", 1).with_quota(1).kind(),
            Volunteer::driver(2, "c", 1, 1).kind(),
            Volunteer::driver(3, "d", 1, 1).with_quota(1).kind(),
        ];
        for kind in kinds {
            assert_eq!(VolunteerKind::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(VolunteerKind::from_keyword("pilot"), None);
        assert!(kinds[1].is_limited());
        assert!(!kinds[2].is_limited());
    }

    #[test]
    fn test_status_text() {
        let mut v = Volunteer::driver(3, "D", 10, 4);
        assert_eq!(
            v.to_string(),
            "VolunteerID: 3\nisBusy: False\nOrderID: None\nDistanceLeft: None\nOrdersLeft: No Limit"
        );
        v.accept(&awaiting_delivery(8, 7)).unwrap();
        let text = v.to_string();
        assert!(text.contains("isBusy: True"));
        assert!(text.contains("OrderID: 8"));
        assert!(text.contains("DistanceLeft: 7"));

        let status = v.status();
        assert!(status.busy);
        assert_eq!(status.remaining, Some(7));
        assert_eq!(status.orders_left, None);
    }
}
