//! Request types for the Employer Cost Engine API.
//!
//! This module defines the JSON request structures for the `/calculate`,
//! `/compare` and `/batch` endpoints.

use serde::{Deserialize, Serialize};

use crate::models::{CompensationProfile, InputTable, Record};

/// Request body for the `/calculate` and `/compare` endpoints.
///
/// The profile itself fills any missing field with its default, so
/// `{"profile": {}}` calculates the default profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The compensation inputs.
    pub profile: CompensationProfile,
}

/// Request body for the `/batch` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// One record per employee.
    pub rows: Vec<Record>,
    /// Row schema; the union of the record keys when omitted.
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    /// Column holding each employee's salary.
    pub salary_column: String,
    /// Column the summary groups by.
    pub group_column: String,
    /// Column the summary sums; `total_annual` when omitted.
    #[serde(default)]
    pub value_column: Option<String>,
    /// Settings shared by every row; only the salary varies.
    #[serde(default)]
    pub profile: CompensationProfile,
    /// Whether to compute rows in parallel.
    #[serde(default)]
    pub parallel: bool,
}

impl BatchRequest {
    /// Builds the input table from the request rows.
    pub fn table(&self) -> InputTable {
        match &self.columns {
            Some(columns) => InputTable::new(columns.clone(), self.rows.clone()),
            None => InputTable::from_records(self.rows.clone()),
        }
    }
}
