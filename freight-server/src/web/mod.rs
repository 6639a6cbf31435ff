//! Web layer for the freight load search.
//!
//! Serves the search form, HTML results and a JSON search API.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
