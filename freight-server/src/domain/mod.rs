//! Domain types for the freight search service.
//!
//! This module contains the validated record types for the two loaded
//! datasets. Every type enforces its invariants at construction time, so
//! the query pipeline can trust the values it sees.

mod appointment;
mod error;
mod load_id;
mod posting;
mod stop;

pub use appointment::Appointment;
pub use error::DomainError;
pub use load_id::LoadId;
pub use posting::{LoadPosting, parse_flag};
pub use stop::{LoadStop, StopType, parse_sequence};
