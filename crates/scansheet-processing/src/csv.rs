//! CSV materialization
//!
//! A flattened table becomes a two-line CSV blob: one header line and one
//! value line, comma-joined in the same left-to-right order. Values are
//! written verbatim; embedded commas or quotes are not escaped, matching
//! the server-side consumer's expectations.

use chrono::{DateTime, Local};

use crate::table::FlattenedTable;

pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Two-line CSV record built from a flattened table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvRecord {
    pub header: String,
    pub values: String,
}

impl CsvRecord {
    pub fn from_table(table: &FlattenedTable) -> Self {
        let header = table
            .fields
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let values = table
            .fields
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");

        CsvRecord { header, values }
    }

    /// Render as file content.
    pub fn to_csv_string(&self) -> String {
        format!("{}\n{}", self.header, self.values)
    }
}

/// Export filename for a given timestamp: `scansheet_data_<yyyyMMdd_HHmmss>.csv`.
pub fn export_filename(now: DateTime<Local>) -> String {
    format!("scansheet_data_{}.csv", now.format("%Y%m%d_%H%M%S"))
}
