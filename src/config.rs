//! Warehouse configuration: customers and volunteer roster.
//!
//! Two formats are accepted. JSON maps directly onto [`WarehouseConfig`].
//! The line-oriented text format lists one entity per line; `#` starts a
//! comment and blank lines are ignored:
//!
//! ```text
//! # Customers
//! customer Maya soldier 7 2
//! customer David civilian 3 1
//!
//! # Volunteers
//! volunteer Noya collector 2
//! volunteer Ibrahim limited_collector 3 2
//! volunteer Limor driver 5 2
//! volunteer Din limited_driver 13 4 2
//! ```
//!
//! Customer fields: name, type, distance, max orders. Volunteer fields:
//! name, kind, then `cooldown` for collectors or `max_distance
//! distance_per_step` for drivers, then `max_orders` for limited kinds.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{CustomerKind, Role, Volunteer, VolunteerId, VolunteerKind};
use crate::validation::{validate_config, ValidationError};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config failed validation with {} issue(s)", .0.len())]
    Invalid(Vec<ValidationError>),
}

/// A customer entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerConfig {
    pub name: String,
    pub kind: CustomerKind,
    pub distance: u32,
    pub max_orders: u32,
}

impl CustomerConfig {
    pub fn new(
        name: impl Into<String>,
        kind: CustomerKind,
        distance: u32,
        max_orders: u32,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            distance,
            max_orders,
        }
    }
}

/// A volunteer entry. `max_orders` makes the volunteer a limited one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerConfig {
    pub name: String,
    #[serde(flatten)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_orders: Option<u32>,
}

impl VolunteerConfig {
    pub fn collector(name: impl Into<String>, cooldown: u32) -> Self {
        Self {
            name: name.into(),
            role: Role::Collector { cooldown },
            max_orders: None,
        }
    }

    pub fn driver(name: impl Into<String>, max_distance: u32, distance_per_step: u32) -> Self {
        Self {
            name: name.into(),
            role: Role::Driver {
                max_distance,
                distance_per_step,
            },
            max_orders: None,
        }
    }

    /// Makes the volunteer limited.
    pub fn with_max_orders(mut self, max_orders: u32) -> Self {
        self.max_orders = Some(max_orders);
        self
    }

    /// Builds the volunteer with the given id.
    pub fn build(&self, id: VolunteerId) -> Volunteer {
        let volunteer = Volunteer::new(id, self.name.clone(), self.role);
        match self.max_orders {
            Some(max_orders) => volunteer.with_quota(max_orders),
            None => volunteer,
        }
    }
}

/// Customers and roster, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseConfig {
    #[serde(default)]
    pub customers: Vec<CustomerConfig>,
    #[serde(default)]
    pub volunteers: Vec<VolunteerConfig>,
}

impl WarehouseConfig {
    /// Loads and validates a configuration file.
    ///
    /// `.json` files are parsed as JSON, anything else as the text format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading configuration from {:?}", path);

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Self::from_json(&contents)?,
            _ => Self::from_text(&contents)?,
        };

        config.validate()?;
        debug!(
            customers = config.customers.len(),
            volunteers = config.volunteers.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parses JSON.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Parses the line-oriented text format.
    pub fn from_text(contents: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (idx, raw) in contents.lines().enumerate() {
            let line = idx + 1;
            let content = raw.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }

            let tokens: Vec<&str> = content.split_whitespace().collect();
            match tokens[0] {
                "customer" => config.customers.push(parse_customer(&tokens, line)?),
                "volunteer" => config.volunteers.push(parse_volunteer(&tokens, line)?),
                other => {
                    return Err(ConfigError::Parse {
                        line,
                        message: format!("unknown entry '{other}'"),
                    })
                }
            }
        }

        Ok(config)
    }

    /// Runs [`validate_config`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_config(self).map_err(ConfigError::Invalid)
    }
}

fn parse_customer(tokens: &[&str], line: usize) -> Result<CustomerConfig, ConfigError> {
    if tokens.len() != 5 {
        return Err(ConfigError::Parse {
            line,
            message: format!(
                "expected 'customer <name> <type> <distance> <max_orders>', got {} field(s)",
                tokens.len()
            ),
        });
    }
    let kind = tokens[2]
        .parse::<CustomerKind>()
        .map_err(|message| ConfigError::Parse { line, message })?;

    Ok(CustomerConfig::new(
        tokens[1],
        kind,
        number(tokens[3], "distance", line)?,
        number(tokens[4], "max_orders", line)?,
    ))
}

fn parse_volunteer(tokens: &[&str], line: usize) -> Result<VolunteerConfig, ConfigError> {
    let kind = tokens
        .get(2)
        .and_then(|k| VolunteerKind::from_keyword(k))
        .ok_or_else(|| ConfigError::Parse {
            line,
            message: format!(
                "expected a volunteer kind (collector, limited_collector, driver, limited_driver), got '{}'",
                tokens.get(2).copied().unwrap_or("")
            ),
        })?;

    let expected = match kind {
        VolunteerKind::Collector => 4,
        VolunteerKind::LimitedCollector | VolunteerKind::Driver => 5,
        VolunteerKind::LimitedDriver => 6,
    };
    if tokens.len() != expected {
        return Err(ConfigError::Parse {
            line,
            message: format!(
                "{} entry needs {expected} field(s), got {}",
                kind.keyword(),
                tokens.len()
            ),
        });
    }

    let name = tokens[1];
    let volunteer = match kind {
        VolunteerKind::Collector | VolunteerKind::LimitedCollector => {
            VolunteerConfig::collector(name, number(tokens[3], "cooldown", line)?)
        }
        VolunteerKind::Driver | VolunteerKind::LimitedDriver => VolunteerConfig::driver(
            name,
            number(tokens[3], "max_distance", line)?,
            number(tokens[4], "distance_per_step", line)?,
        ),
    };

    if kind.is_limited() {
        let max_orders = number(tokens[expected - 1], "max_orders", line)?;
        Ok(volunteer.with_max_orders(max_orders))
    } else {
        Ok(volunteer)
    }
}

fn number(token: &str, field: &str, line: usize) -> Result<u32, ConfigError> {
    token.parse::<u32>().map_err(|_| ConfigError::Parse {
        line,
        message: format!("{field} must be a non-negative integer, got '{token}'"),
    })
}
