//! Error taxonomy for the simulation core.
//!
//! Every core error is a local precondition violation. Nothing here is
//! transient: the caller decides whether to skip, report, or abort.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WarehouseError>;

/// Kind of entity referenced by a [`WarehouseError::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Order,
    Volunteer,
    Customer,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Order => write!(f, "order"),
            Self::Volunteer => write!(f, "volunteer"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WarehouseError {
    /// An operation was called while its precondition did not hold.
    #[error("{0}")]
    Precondition(String),

    /// A transition was attempted from the wrong lifecycle state.
    #[error("{0}")]
    InvalidState(String),

    #[error("{entity} {id} does not exist")]
    NotFound { entity: Entity, id: u32 },
}

impl WarehouseError {
    pub(crate) fn not_found(entity: Entity, id: u32) -> Self {
        Self::NotFound { entity, id }
    }

    /// Whether this is a [`WarehouseError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
