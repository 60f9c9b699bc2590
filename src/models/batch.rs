//! Batch models: input rows, the per-employee detail table and the
//! consolidated group summary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CostBreakdown, Regime};

/// One input row: column name to cell value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Label of the grand-total row when a summary is written out.
pub const GRAND_TOTAL_LABEL: &str = "TOTAL";

/// Label of the [`GroupKey::Ungrouped`] group when a summary is written out.
pub const UNGROUPED_LABEL: &str = "(sem grupo)";

/// An ordered set of rows with a known schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputTable {
    /// Column names, in source order.
    pub columns: Vec<String>,
    /// Rows, in source order.
    pub rows: Vec<Record>,
}

impl InputTable {
    /// Creates a table with an explicit schema.
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self { columns, rows }
    }

    /// Creates a table whose schema is every key seen, in first-seen order.
    pub fn from_records(rows: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    /// Returns true if `column` is part of the schema.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One successfully computed row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    /// Zero-based position of the row in the input.
    pub row_index: usize,
    /// The original row fields, untouched.
    pub fields: Record,
    /// The computed breakdown for this row's salary.
    pub breakdown: CostBreakdown,
}

/// Original row fields merged with their breakdowns, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailTable {
    /// The regime every row was computed under.
    pub regime: Regime,
    /// Columns carried over from the input.
    pub source_columns: Vec<String>,
    /// Computed rows; skipped rows are absent.
    pub rows: Vec<DetailRow>,
}

impl DetailTable {
    /// Returns the breakdown columns (component codes and totals).
    ///
    /// These are the currency-formatted columns when the table is exported.
    pub fn currency_columns(&self) -> Vec<&'static str> {
        CostBreakdown::columns_for(self.regime)
    }

    /// Returns every column: source columns first, then breakdown columns.
    ///
    /// A source column sharing a name with a breakdown column is shadowed
    /// and listed once, in the breakdown position.
    pub fn columns(&self) -> Vec<String> {
        let currency = self.currency_columns();
        let mut columns: Vec<String> = self
            .source_columns
            .iter()
            .filter(|c| !currency.iter().any(|k| *k == c.as_str()))
            .cloned()
            .collect();
        columns.extend(currency.into_iter().map(str::to_string));
        columns
    }

    /// Number of computed rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no row was computed.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The key rows are grouped under.
///
/// Serializes as the group text, or `null` for the ungrouped rows, so a
/// real group can never be confused with the ungrouped one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupKey {
    /// The exact text of the group cell.
    Named(String),
    /// Rows whose group cell is null, blank or absent.
    Ungrouped,
}

impl GroupKey {
    /// Creates a named key.
    pub fn named(name: impl Into<String>) -> Self {
        GroupKey::Named(name.into())
    }

    /// Returns the group text, or `None` for the ungrouped rows.
    pub fn name(&self) -> Option<&str> {
        match self {
            GroupKey::Named(name) => Some(name),
            GroupKey::Ungrouped => None,
        }
    }
}

/// Aggregated value for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTotal {
    /// The group key.
    pub key: GroupKey,
    /// Number of detail rows in the group.
    pub row_count: usize,
    /// Sum of the value column over the group.
    pub total: Decimal,
}

/// Consolidated report: one total per group plus a grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// The column rows were grouped by.
    pub group_column: String,
    /// The column that was summed.
    pub value_column: String,
    /// Groups sorted by descending total, ties in first-seen order.
    pub groups: Vec<GroupTotal>,
    /// Sum across all groups.
    pub grand_total: Decimal,
}

/// What a row of the consolidated report stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryLabel {
    /// One group.
    Group(GroupKey),
    /// The sum across every group.
    GrandTotal,
}

/// One row of the consolidated report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    /// The group or the grand total.
    pub label: SummaryLabel,
    /// Number of detail rows covered.
    pub row_count: usize,
    /// Summed value.
    pub total: Decimal,
}

impl GroupSummary {
    /// Returns the groups followed by the grand-total row.
    pub fn rows(&self) -> Vec<SummaryRow> {
        let row_count = self.groups.iter().map(|g| g.row_count).sum();
        self.groups
            .iter()
            .map(|g| SummaryRow {
                label: SummaryLabel::Group(g.key.clone()),
                row_count: g.row_count,
                total: g.total,
            })
            .chain(std::iter::once(SummaryRow {
                label: SummaryLabel::GrandTotal,
                row_count,
                total: self.grand_total,
            }))
            .collect()
    }

    /// Returns the total for `key`, if such a group exists.
    pub fn total_for(&self, key: &GroupKey) -> Option<Decimal> {
        self.groups.iter().find(|g| &g.key == key).map(|g| g.total)
    }
}

/// A row skipped by the batch, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Zero-based position of the row in the input.
    pub row_index: usize,
    /// Why the row was skipped.
    pub reason: String,
}

/// Everything a batch run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Per-employee detail, in input order.
    pub detail: DetailTable,
    /// Consolidated totals by group.
    pub summary: GroupSummary,
    /// Rows skipped, in input order.
    pub errors: Vec<RowError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_from_records_collects_union_of_keys() {
        let table = InputTable::from_records(vec![
            record(json!({"salario": 3000, "depto": "Eng"})),
            record(json!({"salario": 5000, "cargo": "Dev"})),
        ]);

        assert!(table.has_column("salario"));
        assert!(table.has_column("depto"));
        assert!(table.has_column("cargo"));
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_table() {
        let table = InputTable::default();
        assert!(table.is_empty());
        assert!(!table.has_column("salario"));
    }

    #[test]
    fn test_detail_columns_put_breakdown_after_source() {
        let detail = DetailTable {
            regime: Regime::Pj,
            source_columns: vec!["nome".to_string(), "benefits".to_string()],
            rows: vec![],
        };

        assert_eq!(
            detail.columns(),
            vec![
                "nome",
                "invoice_value",
                "benefits",
                "health_and_insurance",
                "infrastructure",
                "total_monthly",
                "total_annual"
            ]
        );
    }

    #[test]
    fn test_summary_rows_end_with_grand_total() {
        let summary = GroupSummary {
            group_column: "depto".to_string(),
            value_column: "total_annual".to_string(),
            groups: vec![
                GroupTotal {
                    key: GroupKey::named("Eng"),
                    row_count: 2,
                    total: Decimal::from(300),
                },
                GroupTotal {
                    key: GroupKey::Ungrouped,
                    row_count: 1,
                    total: Decimal::from(100),
                },
            ],
            grand_total: Decimal::from(400),
        };

        let rows = summary.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].label, SummaryLabel::Group(GroupKey::named("Eng")));
        assert_eq!(rows[2].label, SummaryLabel::GrandTotal);
        assert_eq!(rows[2].row_count, 3);
        assert_eq!(rows[2].total, Decimal::from(400));
        assert_eq!(summary.total_for(&GroupKey::Ungrouped), Some(Decimal::from(100)));
        assert_eq!(summary.total_for(&GroupKey::named("RH")), None);
    }

    #[test]
    fn test_group_key_serializes_as_text_or_null() {
        assert_eq!(serde_json::to_value(GroupKey::named("Eng")).unwrap(), json!("Eng"));
        assert_eq!(serde_json::to_value(GroupKey::Ungrouped).unwrap(), json!(null));
        assert_eq!(
            serde_json::from_value::<GroupKey>(json!("(sem grupo)")).unwrap(),
            GroupKey::named("(sem grupo)")
        );
        assert_eq!(serde_json::from_value::<GroupKey>(json!(null)).unwrap(), GroupKey::Ungrouped);
    }

    #[test]
    fn test_detail_columns_shadow_once() {
        let detail = DetailTable {
            regime: Regime::Pj,
            source_columns: vec!["total_annual".to_string(), "depto".to_string()],
            rows: vec![],
        };

        let columns = detail.columns();
        assert_eq!(columns.first().map(String::as_str), Some("depto"));
        assert_eq!(columns.iter().filter(|c| *c == "total_annual").count(), 1);
    }
}
