//! Freight search query pipeline.
//!
//! Joins postings with their stops, resolves each load's origin and
//! destination stops, and applies the caller's optional filters in a fixed
//! stage order. The result is a plain relation of joined rows plus the time
//! the query took.

mod cancel;
mod executor;
mod filter;
mod format;
mod join;
mod roles;

pub use cancel::{CancelFlag, CancelOnDrop};
pub use executor::{QueryConfig, QueryError, QueryExecutor, QueryResult, Stage};
pub use filter::{
    FilterPlan, Predicate, SearchFilters, ValidationError, matches_all, retain_matching,
    validate_date,
};
pub use format::{OUTPUT_COLUMNS, TabularOutput, format};
pub use join::{JoinError, JoinedRecord, JoinedRelation, inner_join};
pub use roles::{DestinationRule, InvalidDestinationRule, Role, RouteRoles};
