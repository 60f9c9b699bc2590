//! Batch pipeline for the Employer Cost Engine.
//!
//! [`BatchProcessor`] runs the calculator over spreadsheet rows and hands
//! the detail table to [`aggregate`], which consolidates one column by a
//! grouping key. The `csv_io` functions move tables in and out of CSV files.

mod aggregate;
mod coerce;
mod csv_io;
mod processor;

pub use aggregate::aggregate;
pub use coerce::{coerce_salary, group_key, numeric_value, parse_decimal};
pub use csv_io::{
    format_currency, labelled_summary_rows, read_table, read_table_from, write_detail,
    write_detail_to, write_summary, write_summary_to,
};
pub use processor::BatchProcessor;
