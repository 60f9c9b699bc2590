//! Consolidation of a detail table into per-group totals.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{DetailRow, DetailTable, GroupKey, GroupSummary, GroupTotal};

use super::coerce::{group_key, numeric_value};

/// Sums `value_column` over the detail rows, grouped by `group_column`.
///
/// Both columns are looked up among the breakdown columns first and then
/// among the source fields. Groups are sorted by descending total; ties
/// keep the order in which their key first appeared.
///
/// # Errors
///
/// Returns [`EngineError::Aggregation`] if the value column does not exist,
/// holds a non-numeric cell in any row, or sums past the decimal range.
///
/// # Examples
///
/// ```
/// use employer_cost_engine::batch::aggregate;
/// use employer_cost_engine::models::{DetailTable, Regime};
/// use rust_decimal::Decimal;
///
/// let empty = DetailTable { regime: Regime::CltSimples, source_columns: vec![], rows: vec![] };
/// let summary = aggregate(&empty, "dept", "total_annual").unwrap();
/// assert!(summary.groups.is_empty());
/// assert_eq!(summary.grand_total, Decimal::ZERO);
/// ```
pub fn aggregate(
    detail: &DetailTable,
    group_column: &str,
    value_column: &str,
) -> EngineResult<GroupSummary> {
    let currency_columns = detail.currency_columns();
    let value_in_breakdown = currency_columns.iter().any(|c| *c == value_column);
    let group_in_breakdown = currency_columns.iter().any(|c| *c == group_column);

    if !value_in_breakdown && !detail.source_columns.iter().any(|c| c == value_column) {
        return Err(EngineError::Aggregation {
            column: value_column.to_string(),
            message: "column is not in the detail table".to_string(),
        });
    }

    let mut groups: Vec<GroupTotal> = Vec::new();
    let mut positions: HashMap<GroupKey, usize> = HashMap::new();

    for row in &detail.rows {
        let value = row_value(row, value_column, value_in_breakdown)?;
        let key = if group_in_breakdown {
            row.breakdown
                .column_value(group_column)
                .map(|v| GroupKey::Named(v.normalize().to_string()))
                .unwrap_or(GroupKey::Ungrouped)
        } else {
            group_key(row.fields.get(group_column))
        };

        match positions.get(&key) {
            Some(&index) => {
                let group = &mut groups[index];
                group.total = checked_sum(group.total, value, value_column)?;
                group.row_count += 1;
            }
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(GroupTotal {
                    key,
                    row_count: 1,
                    total: value,
                });
            }
        }
    }

    // sort_by is stable, so equal totals keep first-seen order
    groups.sort_by(|a, b| b.total.cmp(&a.total));
    let grand_total = groups
        .iter()
        .try_fold(Decimal::ZERO, |acc, g| checked_sum(acc, g.total, value_column))?;

    Ok(GroupSummary {
        group_column: group_column.to_string(),
        value_column: value_column.to_string(),
        groups,
        grand_total,
    })
}

fn checked_sum(total: Decimal, value: Decimal, column: &str) -> EngineResult<Decimal> {
    total.checked_add(value).ok_or_else(|| EngineError::Aggregation {
        column: column.to_string(),
        message: "sum exceeds the decimal range".to_string(),
    })
}

fn row_value(row: &DetailRow, column: &str, in_breakdown: bool) -> EngineResult<Decimal> {
    let value = if in_breakdown {
        row.breakdown.column_value(column)
    } else {
        numeric_value(row.fields.get(column))
    };

    value.ok_or_else(|| EngineError::Aggregation {
        column: column.to_string(),
        message: format!("row {} has no numeric value", row.row_index),
    })
}
