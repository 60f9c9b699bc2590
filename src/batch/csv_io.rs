//! CSV adapter for batch input and report output.
//!
//! Input cells are read as strings and left for the batch to coerce.
//! Output currency columns are rounded half away from zero to cents.

use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Writer};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    DetailTable, GRAND_TOTAL_LABEL, GroupKey, GroupSummary, InputTable, Record, SummaryLabel,
    SummaryRow, UNGROUPED_LABEL,
};

/// Header of the row-count column in the summary sheet.
const ROW_COUNT_HEADER: &str = "row_count";

/// Formats an amount with exactly two decimal places.
///
/// # Examples
///
/// ```
/// use employer_cost_engine::batch::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::from(3000)), "3000.00");
/// assert_eq!(format_currency(Decimal::new(1234565, 3)), "1234.57");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

fn io_error(path: &str, err: impl std::fmt::Display) -> EngineError {
    EngineError::Io {
        path: path.to_string(),
        message: err.to_string(),
    }
}

/// Reads a CSV file with a header row into an [`InputTable`].
///
/// # Errors
///
/// Returns [`EngineError::Io`] if the file cannot be opened or parsed.
pub fn read_table(path: &Path) -> EngineResult<InputTable> {
    let source = path.display().to_string();
    let file = File::open(path).map_err(|e| io_error(&source, e))?;
    let table = read_table_from(file, &source)?;
    debug!(path = %source, rows = table.len(), columns = table.columns.len(), "Read input table");
    Ok(table)
}

/// Reads CSV data with a header row from any reader.
///
/// `source` names the data in error messages.
pub fn read_table_from<R: Read>(reader: R, source: &str) -> EngineResult<InputTable> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| io_error(source, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| io_error(source, e))?;
        let row: Record = columns
            .iter()
            .zip(record.iter())
            .map(|(column, cell)| (column.clone(), Value::String(cell.to_string())))
            .collect();
        rows.push(row);
    }

    Ok(InputTable::new(columns, rows))
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Writes the detail table: source columns as given, breakdown columns
/// formatted as currency.
pub fn write_detail_to<W: Write>(writer: W, detail: &DetailTable, sink: &str) -> EngineResult<()> {
    let mut writer = Writer::from_writer(writer);
    let columns = detail.columns();
    let currency = detail.currency_columns();

    writer.write_record(&columns).map_err(|e| io_error(sink, e))?;
    for row in &detail.rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| {
                if currency.iter().any(|c| *c == column.as_str()) {
                    row.breakdown
                        .column_value(column)
                        .map(format_currency)
                        .unwrap_or_default()
                } else {
                    cell_text(row.fields.get(column))
                }
            })
            .collect();
        writer.write_record(&cells).map_err(|e| io_error(sink, e))?;
    }
    writer.flush().map_err(|e| io_error(sink, e))
}

/// Pairs each summary row with the text written in its group cell.
///
/// Named groups keep their exact text. The ungrouped and grand-total rows
/// get `(sem grupo)` and `TOTAL`, wrapped in brackets until they match no
/// group name, so every label in the sheet is distinct.
///
/// # Examples
///
/// ```
/// use employer_cost_engine::batch::labelled_summary_rows;
/// use employer_cost_engine::models::{GroupKey, GroupSummary, GroupTotal};
/// use rust_decimal::Decimal;
///
/// let summary = GroupSummary {
///     group_column: "depto".to_string(),
///     value_column: "total_annual".to_string(),
///     groups: vec![GroupTotal { key: GroupKey::named("TOTAL"), row_count: 1, total: Decimal::ONE }],
///     grand_total: Decimal::ONE,
/// };
/// let labels: Vec<String> = labelled_summary_rows(&summary).into_iter().map(|(l, _)| l).collect();
/// assert_eq!(labels, vec!["TOTAL", "[TOTAL]"]);
/// ```
pub fn labelled_summary_rows(summary: &GroupSummary) -> Vec<(String, SummaryRow)> {
    let names: HashSet<&str> = summary.groups.iter().filter_map(|g| g.key.name()).collect();
    let reserved = |base: &str| {
        let mut label = base.to_string();
        while names.contains(label.as_str()) {
            label = format!("[{}]", label);
        }
        label
    };
    let ungrouped = reserved(UNGROUPED_LABEL);
    let grand_total = reserved(GRAND_TOTAL_LABEL);

    summary
        .rows()
        .into_iter()
        .map(|row| {
            let label = match &row.label {
                SummaryLabel::Group(GroupKey::Named(name)) => name.clone(),
                SummaryLabel::Group(GroupKey::Ungrouped) => ungrouped.clone(),
                SummaryLabel::GrandTotal => grand_total.clone(),
            };
            (label, row)
        })
        .collect()
}

/// Writes the group summary with its trailing `TOTAL` row.
pub fn write_summary_to<W: Write>(writer: W, summary: &GroupSummary, sink: &str) -> EngineResult<()> {
    let mut writer = Writer::from_writer(writer);

    writer
        .write_record([
            summary.group_column.as_str(),
            ROW_COUNT_HEADER,
            summary.value_column.as_str(),
        ])
        .map_err(|e| io_error(sink, e))?;
    for (label, row) in labelled_summary_rows(summary) {
        writer
            .write_record([label, row.row_count.to_string(), format_currency(row.total)])
            .map_err(|e| io_error(sink, e))?;
    }
    writer.flush().map_err(|e| io_error(sink, e))
}

/// Writes the detail table to a file.
///
/// # Errors
///
/// Returns [`EngineError::Io`] if the file cannot be created or written.
pub fn write_detail(path: &Path, detail: &DetailTable) -> EngineResult<()> {
    let sink = path.display().to_string();
    let file = File::create(path).map_err(|e| io_error(&sink, e))?;
    write_detail_to(file, detail, &sink)?;
    debug!(path = %sink, rows = detail.len(), "Wrote detail table");
    Ok(())
}

/// Writes the group summary to a file.
///
/// # Errors
///
/// Returns [`EngineError::Io`] if the file cannot be created or written.
pub fn write_summary(path: &Path, summary: &GroupSummary) -> EngineResult<()> {
    let sink = path.display().to_string();
    let file = File::create(path).map_err(|e| io_error(&sink, e))?;
    write_summary_to(file, summary, &sink)?;
    debug!(path = %sink, groups = summary.groups.len(), "Wrote summary table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchProcessor;
    use crate::calculation::CostCalculator;
    use crate::models::{CompensationProfile, Regime};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const SAMPLE: &str = "nome,salario,depto\nAna,\"3.000,00\",Eng\nBruno,5000,Eng\nCarla,abc,Vendas\n";

    #[test]
    fn test_format_currency_pads_and_rounds() {
        assert_eq!(format_currency(dec("62")), "62.00");
        assert_eq!(format_currency(dec("333.3333333")), "333.33");
        assert_eq!(format_currency(dec("0.125")), "0.13");
        assert_eq!(format_currency(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_read_table_keeps_header_order_and_strings() {
        let table = read_table_from(SAMPLE.as_bytes(), "sample").unwrap();

        assert_eq!(table.columns, vec!["nome", "salario", "depto"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0]["salario"], Value::String("3.000,00".to_string()));
    }

    #[test]
    fn test_read_table_reports_ragged_rows() {
        let err = read_table_from("a,b\n1,2,3\n".as_bytes(), "ragged.csv").unwrap_err();
        match err {
            EngineError::Io { path, .. } => assert_eq!(path, "ragged.csv"),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_table_missing_file() {
        let result = read_table(Path::new("./does/not/exist.csv"));
        assert!(matches!(result, Err(EngineError::Io { .. })));
    }

    #[test]
    fn test_detail_and_summary_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.csv");
        std::fs::write(&input, SAMPLE).unwrap();

        let table = read_table(&input).unwrap();
        let template = CompensationProfile::default().with_regime(Regime::Pj);
        let outcome = BatchProcessor::new(CostCalculator::default())
            .run_batch(&table, "salario", "depto", &template)
            .unwrap();
        assert_eq!(outcome.errors.len(), 1);

        let detail_path = dir.path().join("detail.csv");
        let summary_path = dir.path().join("summary.csv");
        write_detail(&detail_path, &outcome.detail).unwrap();
        write_summary(&summary_path, &outcome.summary).unwrap();

        let detail = std::fs::read_to_string(&detail_path).unwrap();
        let mut lines = detail.lines();
        assert_eq!(
            lines.next().unwrap(),
            "nome,salario,depto,invoice_value,benefits,health_and_insurance,infrastructure,total_monthly,total_annual"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Ana,\"3.000,00\",Eng,3000.00,800.00,0.00,0.00,800.00,9600.00"
        );
        assert_eq!(lines.count(), 1);

        let summary = std::fs::read_to_string(&summary_path).unwrap();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "depto,row_count,total_annual");
        assert_eq!(lines[1], "Eng,2,19200.00");
        assert_eq!(lines[2], "TOTAL,2,19200.00");
    }

    #[test]
    fn test_summary_labels_never_collide_with_group_names() {
        let data = "nome,salario,depto\nAna,3000,TOTAL\nBia,3000,(sem grupo)\nCaio,3000,\n";
        let table = read_table_from(data.as_bytes(), "labels").unwrap();
        let outcome = BatchProcessor::new(CostCalculator::default())
            .with_value_column("total_monthly")
            .run_batch(&table, "salario", "depto", &CompensationProfile::default().with_regime(Regime::Pj))
            .unwrap();
        assert_eq!(outcome.summary.groups.len(), 3);

        let mut buffer = Vec::new();
        write_summary_to(&mut buffer, &outcome.summary, "buffer").unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let labels: Vec<&str> = text
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap())
            .collect();

        assert_eq!(labels, vec!["TOTAL", "(sem grupo)", "[(sem grupo)]", "[TOTAL]"]);
        assert!(text.ends_with("[TOTAL],3,2400.00\n"));
    }
}
