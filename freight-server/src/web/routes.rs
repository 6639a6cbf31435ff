//! HTTP route handlers.

use std::path::Path;

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::query::{CancelFlag, QueryError, QueryResult, SearchFilters};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Message shown in place of internal failure details.
const GENERIC_FAILURE: &str = "The search could not be completed. Please try again.";

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index_page).post(search_page))
        .route("/api/search", get(search_api))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with an empty search form.
async fn index_page() -> Response {
    let template = IndexTemplate {
        form: FormView::blank(),
        results: None,
    };
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => error_page(AppError::Internal {
            message: format!("Template error: {e}"),
        }),
    }
}

/// Form submission: run the search and render results under the form.
async fn search_page(State(state): State<AppState>, Form(params): Form<SearchParams>) -> Response {
    match render_search(&state, &params).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => error_page(e),
    }
}

async fn render_search(state: &AppState, params: &SearchParams) -> Result<String, AppError> {
    let filters = params.to_filters()?;
    let result = run_search(state, filters).await?;

    let template = IndexTemplate {
        form: FormView::from_params(params),
        results: Some(ResultsView::from_result(&result)),
    };
    template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {e}"),
    })
}

/// JSON search endpoint.
async fn search_api(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let filters = params.to_filters()?;
    let result = run_search(&state, filters).await?;
    Ok(Json(SearchResponse::from_result(&result)))
}

/// Run a search off the async runtime.
///
/// If the request is dropped mid-query the guard cancels the flag and the
/// executor stops at its next stage boundary.
async fn run_search(state: &AppState, filters: SearchFilters) -> Result<QueryResult, AppError> {
    let cancel = CancelFlag::new();
    let _guard = cancel.cancel_on_drop();
    let executor = state.executor.clone();

    let result = tokio::task::spawn_blocking(move || executor.execute(&filters, &cancel))
        .await
        .map_err(|e| QueryError::Task(e.to_string()))??;
    Ok(result)
}

/// Render an error as an HTML page.
fn error_page(err: AppError) -> Response {
    err.report();
    let status = err.status();
    let template = ErrorTemplate {
        title: err.title().to_string(),
        message: err.public_message(),
    };
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render error page");
            (status, err.public_message()).into_response()
        }
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            AppError::BadRequest { .. } => "Invalid search",
            AppError::Internal { .. } => "Search failed",
        }
    }

    /// Message safe to show to the caller. Internal details stay in the log.
    fn public_message(&self) -> String {
        match self {
            AppError::BadRequest { message } => message.clone(),
            AppError::Internal { .. } => GENERIC_FAILURE.to_string(),
        }
    }

    fn report(&self) {
        match self {
            AppError::BadRequest { message } => warn!(%message, "Rejected search request"),
            AppError::Internal { message } => error!(%message, "Search request failed"),
        }
    }
}

impl From<InvalidChoice> for AppError {
    fn from(e: InvalidChoice) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report();
        let body = Json(ErrorResponse {
            error: self.public_message(),
        });
        (self.status(), body).into_response()
    }
}
