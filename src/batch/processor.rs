//! Batch processing: one cost calculation per input row, then aggregation.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::calculation::CostCalculator;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    BatchOutcome, CompensationProfile, DetailRow, DetailTable, InputTable, Record, RowError,
    TOTAL_ANNUAL_COLUMN,
};

use super::aggregate::aggregate;
use super::coerce::coerce_salary;

/// Applies a [`CostCalculator`] to every row of an [`InputTable`].
///
/// Every row shares the benefit and regime settings of a profile template;
/// only the salary changes per row.
///
/// # Example
///
/// ```
/// use employer_cost_engine::batch::BatchProcessor;
/// use employer_cost_engine::calculation::CostCalculator;
/// use employer_cost_engine::models::{CompensationProfile, InputTable};
/// use serde_json::json;
///
/// let rows = vec![
///     json!({"salario": 3000, "depto": "Eng"}).as_object().unwrap().clone(),
///     json!({"salario": "abc", "depto": "Eng"}).as_object().unwrap().clone(),
/// ];
/// let outcome = BatchProcessor::new(CostCalculator::default())
///     .run_batch(
///         &InputTable::from_records(rows),
///         "salario",
///         "depto",
///         &CompensationProfile::default(),
///     )
///     .unwrap();
/// assert_eq!(outcome.detail.len(), 1);
/// assert_eq!(outcome.errors.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    calculator: CostCalculator,
    value_column: String,
    parallel: bool,
}

impl BatchProcessor {
    /// Creates a sequential processor summing `total_annual` per group.
    pub fn new(calculator: CostCalculator) -> Self {
        Self {
            calculator,
            value_column: TOTAL_ANNUAL_COLUMN.to_string(),
            parallel: false,
        }
    }

    /// Sums `column` instead of `total_annual` in the group summary.
    pub fn with_value_column(mut self, column: impl Into<String>) -> Self {
        self.value_column = column.into();
        self
    }

    /// Computes rows on the rayon thread pool when `parallel` is true.
    ///
    /// Detail rows come back in input order either way.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns the calculator rows are computed with.
    pub fn calculator(&self) -> &CostCalculator {
        &self.calculator
    }

    /// Runs the batch.
    ///
    /// Rows whose salary cannot be coerced, or that the calculator rejects,
    /// are skipped and reported in [`BatchOutcome::errors`].
    ///
    /// # Errors
    ///
    /// - [`EngineError::MissingColumn`] if `salary_column` or `group_column`
    ///   is not in the table schema, checked before any row is computed
    /// - [`EngineError::Aggregation`] if the value column cannot be summed
    pub fn run_batch(
        &self,
        table: &InputTable,
        salary_column: &str,
        group_column: &str,
        template: &CompensationProfile,
    ) -> EngineResult<BatchOutcome> {
        for column in [salary_column, group_column] {
            if !table.has_column(column) {
                return Err(EngineError::MissingColumn {
                    column: column.to_string(),
                });
            }
        }

        info!(
            rows = table.len(),
            regime = %template.regime,
            parallel = self.parallel,
            "Running batch"
        );

        let results: Vec<Result<DetailRow, RowError>> = if self.parallel {
            table
                .rows
                .par_iter()
                .enumerate()
                .map(|(row_index, record)| self.compute_row(row_index, record, salary_column, template))
                .collect()
        } else {
            table
                .rows
                .iter()
                .enumerate()
                .map(|(row_index, record)| self.compute_row(row_index, record, salary_column, template))
                .collect()
        };

        let mut rows = Vec::with_capacity(results.len());
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(row) => rows.push(row),
                Err(error) => {
                    warn!(row_index = error.row_index, reason = %error.reason, "Skipping row");
                    errors.push(error);
                }
            }
        }

        let detail = DetailTable {
            regime: template.regime,
            source_columns: table.columns.clone(),
            rows,
        };
        let summary = aggregate(&detail, group_column, &self.value_column)?;

        info!(
            detail_rows = detail.len(),
            errors = errors.len(),
            groups = summary.groups.len(),
            grand_total = %summary.grand_total,
            "Batch completed"
        );

        Ok(BatchOutcome {
            detail,
            summary,
            errors,
        })
    }

    fn compute_row(
        &self,
        row_index: usize,
        record: &Record,
        salary_column: &str,
        template: &CompensationProfile,
    ) -> Result<DetailRow, RowError> {
        let salary = coerce_salary(record.get(salary_column))
            .map_err(|reason| RowError { row_index, reason })?;

        let breakdown = self
            .calculator
            .compute(&template.with_salary(salary))
            .map_err(|err| RowError {
                row_index,
                reason: err.to_string(),
            })?;

        debug!(row_index, total_monthly = %breakdown.total_monthly, "Row computed");

        Ok(DetailRow {
            row_index,
            fields: record.clone(),
            breakdown,
        })
    }
}
