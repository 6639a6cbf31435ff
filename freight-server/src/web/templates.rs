//! Askama templates for the web frontend.

use askama::Template;

use crate::query::{QueryResult, TabularOutput, format};

use super::dto::SearchParams;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Search page: the form, plus results once a search has run.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub form: FormView,
    pub results: Option<ResultsView>,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Form values echoed back into the search form.
#[derive(Debug, Clone, Default)]
pub struct FormView {
    pub trailer_type: String,
    pub origin_city: String,
    pub origin_state: String,
    pub destination_city: String,
    pub destination_state: String,
    pub pickup_date: String,
    pub delivery_date: String,
    pub posting_status: String,

    /// Selected choice: `any`, `yes` or `no`.
    pub is_hazardous: &'static str,
    pub is_high_value: &'static str,
}

impl FormView {
    pub fn blank() -> Self {
        Self {
            is_hazardous: "any",
            is_high_value: "any",
            ..Default::default()
        }
    }

    /// Echo submitted parameters. Choices that did not parse show as `any`.
    pub fn from_params(params: &SearchParams) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            trailer_type: text(&params.trailer_type),
            origin_city: text(&params.origin_city),
            origin_state: text(&params.origin_state),
            destination_city: text(&params.destination_city),
            destination_state: text(&params.destination_state),
            pickup_date: text(&params.pickup_date),
            delivery_date: text(&params.delivery_date),
            posting_status: text(&params.posting_status),
            is_hazardous: choice_label("is_hazardous", params.is_hazardous.as_deref()),
            is_high_value: choice_label("is_high_value", params.is_high_value.as_deref()),
        }
    }
}

fn choice_label(field: &'static str, value: Option<&str>) -> &'static str {
    match super::dto::parse_choice(field, value) {
        Ok(Some(true)) => "yes",
        Ok(Some(false)) => "no",
        _ => "any",
    }
}

/// Search results view model.
#[derive(Debug, Clone)]
pub struct ResultsView {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,

    /// Elapsed time, formatted to milliseconds.
    pub elapsed: String,

    /// Notes for filters that were skipped.
    pub skipped: Vec<String>,
}

impl ResultsView {
    pub fn from_result(result: &QueryResult) -> Self {
        let (columns, rows) = match format(result) {
            TabularOutput::NoResults => (Vec::new(), Vec::new()),
            TabularOutput::Table { columns, rows } => (columns, rows),
        };
        Self {
            columns,
            rows,
            elapsed: format!("{:.3}", result.elapsed_seconds()),
            skipped: result.skipped.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
