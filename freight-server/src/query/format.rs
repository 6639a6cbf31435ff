//! Caller-facing tabular output.

use serde::Serialize;

use crate::dataset::columns::*;

use super::executor::QueryResult;
use super::join::JoinedRecord;

/// Output columns, postings first then stops.
pub const OUTPUT_COLUMNS: &[&str] = &[
    LOAD_ID,
    TRANSPORT_MODE,
    IS_HAZARDOUS,
    IS_HIGH_VALUE,
    POSTING_STATUS,
    STOP_SEQUENCE,
    STOP_TYPE,
    CITY,
    STATE,
    APPOINTMENT_FROM,
    APPOINTMENT_TO,
];

/// A formatted query result.
///
/// An empty result is an explicit marker rather than a table with no rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TabularOutput {
    NoResults,
    Table {
        columns: Vec<&'static str>,
        rows: Vec<Vec<String>>,
    },
}

impl TabularOutput {
    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        match self {
            TabularOutput::NoResults => 0,
            TabularOutput::Table { rows, .. } => rows.len(),
        }
    }
}

/// Format a query result. Rows keep their order; nothing is truncated.
pub fn format(result: &QueryResult) -> TabularOutput {
    if result.is_empty() {
        return TabularOutput::NoResults;
    }

    TabularOutput::Table {
        columns: OUTPUT_COLUMNS.to_vec(),
        rows: result.rows.iter().map(format_row).collect(),
    }
}

fn format_row(record: &JoinedRecord) -> Vec<String> {
    let posting = &record.posting;
    let stop = &record.stop;

    vec![
        posting.load_id.to_string(),
        posting.transport_mode.clone(),
        posting.is_hazardous.to_string(),
        posting.is_high_value.to_string(),
        posting.status.clone(),
        stop.sequence.to_string(),
        stop.stop_type.code().to_string(),
        stop.city.clone(),
        stop.state.clone(),
        stop.appointment_from
            .as_ref()
            .map(|a| a.to_string())
            .unwrap_or_default(),
        stop.appointment_to
            .as_ref()
            .map(|a| a.to_string())
            .unwrap_or_default(),
    ]
}
