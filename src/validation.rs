//! Input validation for warehouse configurations.
//!
//! Checks a roster and customer list before the simulation starts.
//! Detects:
//! - Collectors that would never take time (zero cooldown)
//! - Drivers that could never move or never serve anyone
//! - Zero quotas on limited volunteers and customers
//! - Empty names
//! - A pipeline stage with no volunteer to serve it

use std::fmt;

use crate::config::{VolunteerConfig, WarehouseConfig};
use crate::models::Role;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A collector has a zero cooldown.
    InvalidCooldown,
    /// A driver has a zero per-step distance or a zero maximum distance.
    InvalidDistanceRate,
    /// A limited volunteer or a customer may never take or place an order.
    EmptyQuota,
    /// A customer or volunteer has an empty name.
    EmptyName,
    /// Customers exist but no collector or no driver does.
    MissingRole,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a warehouse configuration.
///
/// Checks:
/// 1. Every name is non-empty
/// 2. Customers may place at least one order
/// 3. Collectors have a positive cooldown
/// 4. Drivers have a positive distance per step and maximum distance
/// 5. Limited volunteers have a positive quota
/// 6. With customers present, both a collector and a driver exist
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &WarehouseConfig) -> ValidationResult {
    let mut errors = Vec::new();

    for (i, customer) in config.customers.iter().enumerate() {
        if customer.name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                format!("Customer #{i} has an empty name"),
            ));
        }
        if customer.max_orders == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyQuota,
                format!("Customer '{}' may never place an order", customer.name),
            ));
        }
    }

    for (i, volunteer) in config.volunteers.iter().enumerate() {
        if volunteer.name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                format!("Volunteer #{i} has an empty name"),
            ));
        }
        errors.extend(check_volunteer(volunteer));
    }

    if !config.customers.is_empty() {
        let has_collector = config
            .volunteers
            .iter()
            .any(|v| matches!(v.role, Role::Collector { .. }));
        let has_driver = config
            .volunteers
            .iter()
            .any(|v| matches!(v.role, Role::Driver { .. }));
        if !has_collector {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingRole,
                "No collector configured: orders would never leave the pending set",
            ));
        }
        if !has_driver {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingRole,
                "No driver configured: collected orders would never be delivered",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_volunteer(volunteer: &VolunteerConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    match volunteer.role {
        Role::Collector { cooldown } if cooldown == 0 => {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCooldown,
                format!("Collector '{}' has a zero cooldown", volunteer.name),
            ));
        }
        Role::Driver {
            max_distance,
            distance_per_step,
        } => {
            if distance_per_step == 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDistanceRate,
                    format!("Driver '{}' covers no distance per step", volunteer.name),
                ));
            }
            if max_distance == 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDistanceRate,
                    format!("Driver '{}' has a zero maximum distance", volunteer.name),
                ));
            }
        }
        Role::Collector { .. } => {}
    }

    if volunteer.max_orders == Some(0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyQuota,
            format!("Volunteer '{}' may never accept an order", volunteer.name),
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomerConfig;
    use crate::models::CustomerKind;

    fn sample_config() -> WarehouseConfig {
        WarehouseConfig {
            customers: vec![
                CustomerConfig::new("Maya", CustomerKind::Soldier, 7, 2),
                CustomerConfig::new("David", CustomerKind::Civilian, 3, 1),
            ],
            volunteers: vec![
                VolunteerConfig::collector("Noya", 2),
                VolunteerConfig::collector("Ibrahim", 3).with_max_orders(2),
                VolunteerConfig::driver("Limor", 5, 2),
                VolunteerConfig::driver("Din", 13, 4).with_max_orders(2),
            ],
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_config(&sample_config()).is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        assert!(validate_config(&WarehouseConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_cooldown() {
        let mut config = sample_config();
        config.volunteers.push(VolunteerConfig::collector("Idle", 0));

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidCooldown && e.message.contains("Idle")));
    }

    #[test]
    fn test_driver_rates() {
        let mut config = sample_config();
        config.volunteers.push(VolunteerConfig::driver("Parked", 0, 0));

        let errors = validate_config(&config).unwrap_err();
        let rate_errors = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::InvalidDistanceRate)
            .count();
        assert_eq!(rate_errors, 2);
    }

    #[test]
    fn test_empty_quota() {
        let mut config = sample_config();
        config
            .volunteers
            .push(VolunteerConfig::driver("Retired", 5, 1).with_max_orders(0));
        config
            .customers
            .push(CustomerConfig::new("Ghost", CustomerKind::Civilian, 1, 0));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::EmptyQuota)
                .count(),
            2
        );
    }

    #[test]
    fn test_empty_name() {
        let mut config = sample_config();
        config.customers.push(CustomerConfig::new(" ", CustomerKind::Soldier, 1, 1));

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::EmptyName));
    }

    #[test]
    fn test_missing_driver() {
        let mut config = sample_config();
        config.volunteers.retain(|v| matches!(v.role, Role::Collector { .. }));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::MissingRole);
        assert!(errors[0].to_string().contains("driver"));
    }

    #[test]
    fn test_multiple_errors() {
        let config = WarehouseConfig {
            customers: vec![CustomerConfig::new("", CustomerKind::Soldier, 1, 0)],
            volunteers: vec![],
        };

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 4);
    }
}
