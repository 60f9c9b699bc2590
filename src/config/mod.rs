//! Configuration loading and management for the Employer Cost Engine.
//!
//! This module provides the statutory tables the calculator runs against
//! (INSS ceiling, FGTS and transit rates, employee INSS and income-tax
//! brackets), either from the built-in reference year or from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use employer_cost_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/br2025").unwrap();
//! println!("Reference year: {}", config.config().rates.reference_year);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BracketTable, ChargeRateBounds, IncomeTaxTable, RateBounds, StatutoryConfig, StatutoryRates,
    TaxBracket,
};
