//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::query::{QueryResult, SearchFilters, TabularOutput, format};

/// Search parameters, shared by the HTML form and the JSON API.
///
/// Every field is optional. Blank text means "no constraint".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub trailer_type: Option<String>,
    pub origin_city: Option<String>,
    pub origin_state: Option<String>,
    pub destination_city: Option<String>,
    pub destination_state: Option<String>,
    pub pickup_date: Option<String>,
    pub delivery_date: Option<String>,

    /// `any`, `yes` or `no`. A bare checkbox value of `on` means `yes`.
    pub is_hazardous: Option<String>,

    /// Same choices as `is_hazardous`.
    pub is_high_value: Option<String>,

    pub posting_status: Option<String>,
}

/// A yes/no/any choice that did not parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field} {value:?}: expected any, yes or no")]
pub struct InvalidChoice {
    pub field: &'static str,
    pub value: String,
}

impl SearchParams {
    /// Convert to query filters.
    ///
    /// Text fields pass through unchanged; the executor treats blanks as
    /// absent and validates dates itself.
    pub fn to_filters(&self) -> Result<SearchFilters, InvalidChoice> {
        Ok(SearchFilters {
            trailer_type: self.trailer_type.clone(),
            origin_city: self.origin_city.clone(),
            origin_state: self.origin_state.clone(),
            destination_city: self.destination_city.clone(),
            destination_state: self.destination_state.clone(),
            pickup_date: self.pickup_date.clone(),
            delivery_date: self.delivery_date.clone(),
            is_hazardous: parse_choice("is_hazardous", self.is_hazardous.as_deref())?,
            is_high_value: parse_choice("is_high_value", self.is_high_value.as_deref())?,
            posting_status: self.posting_status.clone(),
        })
    }
}

/// Parse a tri-state choice. Absent, blank and `any` leave the field
/// unconstrained.
pub fn parse_choice(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<bool>, InvalidChoice> {
    let Some(raw) = value else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "any" => Ok(None),
        "on" | "yes" | "true" => Ok(Some(true)),
        "no" | "false" => Ok(Some(false)),
        _ => Err(InvalidChoice {
            field,
            value: raw.to_string(),
        }),
    }
}

/// JSON search response.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Matching rows, or the no-results marker.
    pub rows: TabularOutput,

    /// Number of matching rows.
    pub row_count: usize,

    /// Time spent in the query pipeline.
    pub elapsed_seconds: f64,

    /// Filters ignored because their value was invalid.
    pub skipped_filters: Vec<String>,
}

impl SearchResponse {
    pub fn from_result(result: &QueryResult) -> Self {
        let rows = format(result);
        Self {
            row_count: rows.row_count(),
            rows,
            elapsed_seconds: result.elapsed_seconds(),
            skipped_filters: result.skipped.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
