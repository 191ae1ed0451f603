//! Customer model.
//!
//! Customers place orders. Each one sits at a fixed distance from the
//! warehouse and may place at most `max_orders` orders.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{CustomerId, OrderId};

/// Customer category. Both kinds follow the same ordering rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerKind {
    Soldier,
    Civilian,
}

impl FromStr for CustomerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soldier" => Ok(CustomerKind::Soldier),
            "civilian" => Ok(CustomerKind::Civilian),
            other => Err(format!("unknown customer type '{other}'")),
        }
    }
}

impl fmt::Display for CustomerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerKind::Soldier => f.write_str("soldier"),
            CustomerKind::Civilian => f.write_str("civilian"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub kind: CustomerKind,
    /// Distance from the warehouse; every order of this customer carries it.
    pub distance: u32,
    /// Lifetime order limit.
    pub max_orders: u32,
    orders: Vec<OrderId>,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        kind: CustomerKind,
        distance: u32,
        max_orders: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            distance,
            max_orders,
            orders: Vec::new(),
        }
    }

    /// Ids of the orders placed so far, oldest first.
    pub fn orders(&self) -> &[OrderId] {
        &self.orders
    }

    pub fn orders_left(&self) -> u32 {
        self.max_orders.saturating_sub(self.orders.len() as u32)
    }

    pub fn can_make_order(&self) -> bool {
        self.orders_left() > 0
    }

    /// Records a placed order. Returns `false` when the quota is used up.
    pub(crate) fn record_order(&mut self, order_id: OrderId) -> bool {
        if !self.can_make_order() {
            return false;
        }
        self.orders.push(order_id);
        true
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CustomerID: {}", self.id)?;
        writeln!(f, "Name: {} ({})", self.name, self.kind)?;
        writeln!(f, "Distance: {}", self.distance)?;
        write!(f, "numOrdersLeft: {}", self.orders_left())
    }
}
