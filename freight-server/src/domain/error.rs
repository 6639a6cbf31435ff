//! Domain error types.
//!
//! These errors represent malformed cell values in the loaded datasets.
//! They are distinct from I/O and query errors.

/// Domain-level errors for value parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Load identifier is blank
    #[error("load identifier must not be blank")]
    EmptyLoadId,

    /// Stop type is not a pickup or drop-off code
    #[error("unknown stop type: {0:?}")]
    InvalidStopType(String),

    /// Stop sequence is not a positive integer
    #[error("stop sequence must be a positive integer, got {0:?}")]
    InvalidSequence(String),

    /// Flag is not a recognised boolean spelling
    #[error("invalid boolean flag: {0:?}")]
    InvalidFlag(String),

    /// Appointment is not in a supported date/time format
    #[error("invalid appointment time: {0:?}")]
    InvalidAppointment(String),
}
