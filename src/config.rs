//! # Workflow Configuration
//!
//! Layered configuration for the order workflow: built-in defaults, an
//! optional TOML/YAML/JSON file, then `ORDER_WORKFLOW__*` environment
//! variables (e.g. `ORDER_WORKFLOW__CASH_TOLERANCE=0.05`).

use crate::constants::{CASH_CHANGE_TOLERANCE, ORDER_NUMBER_PREFIX};
use crate::error::{Result, WorkflowError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "ORDER_WORKFLOW";

/// Largest UTC offset accepted for the order-number calendar day
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub order_number_prefix: String,
    /// Offset of the storefront's local calendar from UTC
    pub utc_offset_minutes: i32,
    pub cash_tolerance: f64,
    pub max_allocation_attempts: u32,
    pub notifications_enabled: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            order_number_prefix: ORDER_NUMBER_PREFIX.to_string(),
            utc_offset_minutes: -300,
            cash_tolerance: CASH_CHANGE_TOLERANCE,
            max_allocation_attempts: 5,
            notifications_enabled: true,
        }
    }
}

impl WorkflowConfig {
    /// Load defaults overlaid with environment variables
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load defaults, then `path` if given, then environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("order_number_prefix", defaults.order_number_prefix)
            .and_then(|b| b.set_default("utc_offset_minutes", i64::from(defaults.utc_offset_minutes)))
            .and_then(|b| b.set_default("cash_tolerance", defaults.cash_tolerance))
            .and_then(|b| {
                b.set_default(
                    "max_allocation_attempts",
                    i64::from(defaults.max_allocation_attempts),
                )
            })
            .and_then(|b| b.set_default("notifications_enabled", defaults.notifications_enabled))
            .map_err(config_error)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(config_error)?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.order_number_prefix.is_empty()
            || !self
                .order_number_prefix
                .chars()
                .all(|c| c.is_ascii_alphabetic())
        {
            return Err(WorkflowError::Configuration(format!(
                "order_number_prefix must be non-empty ASCII letters, got '{}'",
                self.order_number_prefix
            )));
        }
        if !self.cash_tolerance.is_finite() || self.cash_tolerance < 0.0 {
            return Err(WorkflowError::Configuration(format!(
                "cash_tolerance must be a non-negative number, got {}",
                self.cash_tolerance
            )));
        }
        if self.max_allocation_attempts == 0 {
            return Err(WorkflowError::Configuration(
                "max_allocation_attempts must be at least 1".to_string(),
            ));
        }
        if self.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(WorkflowError::Configuration(format!(
                "utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            )));
        }
        Ok(())
    }
}

fn config_error(err: config::ConfigError) -> WorkflowError {
    WorkflowError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = WorkflowConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.order_number_prefix, "DS");
        assert_eq!(config.cash_tolerance, 0.01);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "order_number_prefix = \"SB\"").unwrap();
        writeln!(file, "max_allocation_attempts = 3").unwrap();

        let config = WorkflowConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.order_number_prefix, "SB");
        assert_eq!(config.max_allocation_attempts, 3);
        assert_eq!(config.utc_offset_minutes, -300);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = WorkflowConfig::default();
        config.order_number_prefix = "D5".to_string();
        assert!(config.validate().is_err());

        let mut config = WorkflowConfig::default();
        config.cash_tolerance = -0.5;
        assert!(config.validate().is_err());

        let mut config = WorkflowConfig::default();
        config.max_allocation_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = WorkflowConfig::default();
        config.utc_offset_minutes = 15 * 60;
        assert!(matches!(
            config.validate(),
            Err(WorkflowError::Configuration(_))
        ));
    }
}
