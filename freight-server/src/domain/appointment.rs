//! Appointment window timestamps.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use super::DomainError;

/// Formats accepted for timestamps with a time component.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Canonical rendering used for display and text matching.
const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A stop appointment timestamp.
///
/// Keeps the canonical `YYYY-MM-DD HH:MM:SS` rendering alongside the parsed
/// value, since date filters match against the text form.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Appointment {
    at: NaiveDateTime,
    text: String,
}

impl Appointment {
    /// Create from a parsed timestamp.
    pub fn new(at: NaiveDateTime) -> Self {
        Self {
            at,
            text: at.format(CANONICAL_FORMAT).to_string(),
        }
    }

    /// Parse an appointment timestamp.
    ///
    /// A bare `YYYY-MM-DD` date is taken as midnight.
    ///
    /// ```
    /// use freight_server::domain::Appointment;
    ///
    /// let a = Appointment::parse("2024-03-01T08:30:00").unwrap();
    /// assert_eq!(a.as_str(), "2024-03-01 08:30:00");
    ///
    /// let b = Appointment::parse("03/01/2024 08:30").unwrap();
    /// assert_eq!(a, b);
    /// ```
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();

        for format in DATETIME_FORMATS {
            if let Ok(at) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self::new(at));
            }
        }

        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Self::new)
            .ok_or_else(|| DomainError::InvalidAppointment(s.to_string()))
    }

    /// Parse an optional cell; blank means no appointment.
    pub fn parse_optional(s: &str) -> Result<Option<Self>, DomainError> {
        if s.trim().is_empty() {
            Ok(None)
        } else {
            Self::parse(s).map(Some)
        }
    }

    /// The canonical text rendering.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Debug for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Appointment({})", self.text)
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
