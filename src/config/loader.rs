//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading statutory
//! tables from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{EmployeeInssConfig, IncomeTaxTable, StatutoryConfig, StatutoryRates};

/// Loads and provides access to the statutory configuration.
///
/// # Directory Structure
///
/// ```text
/// config/br2025/
/// ├── statutory.yaml      # Ceiling, FGTS, transit and charge-rate bounds
/// ├── inss_employee.yaml  # Employee INSS progressive table
/// └── income_tax.yaml     # IRRF progressive table and dependent deduction
/// ```
///
/// # Example
///
/// ```no_run
/// use employer_cost_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/br2025").unwrap();
/// println!("INSS ceiling: {}", loader.config().rates.inss_ceiling);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: StatutoryConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any file is missing, contains invalid YAML, or
    /// describes an inconsistent table (descending limits, negative rates).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let rates = Self::load_yaml::<StatutoryRates>(&path.join("statutory.yaml"))?;
        let employee_inss = Self::load_yaml::<EmployeeInssConfig>(&path.join("inss_employee.yaml"))?;
        let income_tax = Self::load_yaml::<IncomeTaxTable>(&path.join("income_tax.yaml"))?;

        let config = StatutoryConfig {
            rates,
            employee_inss: employee_inss.brackets,
            income_tax,
        };
        config.validate()?;

        debug!(
            path = %path.display(),
            reference_year = config.rates.reference_year,
            "Loaded statutory configuration"
        );

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &StatutoryConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> StatutoryConfig {
        self.config
    }
}
