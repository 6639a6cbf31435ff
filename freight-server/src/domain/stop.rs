//! Load stop records.

use std::fmt;

use super::{Appointment, DomainError, LoadId};

/// Whether a stop picks freight up or drops it off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopType {
    Pickup,
    Dropoff,
}

impl StopType {
    /// Parse a stop type code.
    ///
    /// Accepts the dataset codes `P` and `D` as well as the long forms,
    /// case-insensitively.
    ///
    /// ```
    /// use freight_server::domain::StopType;
    ///
    /// assert_eq!(StopType::parse("P").unwrap(), StopType::Pickup);
    /// assert_eq!(StopType::parse("drop-off").unwrap(), StopType::Dropoff);
    /// assert!(StopType::parse("X").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "P" | "PICKUP" | "PICK-UP" | "PICK_UP" => Ok(StopType::Pickup),
            "D" | "DROPOFF" | "DROP-OFF" | "DROP_OFF" => Ok(StopType::Dropoff),
            _ => Err(DomainError::InvalidStopType(s.to_string())),
        }
    }

    /// The single-letter dataset code.
    pub fn code(&self) -> &'static str {
        match self {
            StopType::Pickup => "P",
            StopType::Dropoff => "D",
        }
    }
}

impl fmt::Display for StopType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Parse a stop sequence number. Sequences start at 1.
pub fn parse_sequence(s: &str) -> Result<u32, DomainError> {
    match s.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(DomainError::InvalidSequence(s.to_string())),
    }
}

/// One stop on a load's route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStop {
    pub load_id: LoadId,

    /// Position on the route, 1-based.
    pub sequence: u32,

    pub stop_type: StopType,
    pub city: String,
    pub state: String,

    /// Start of the appointment window.
    pub appointment_from: Option<Appointment>,

    /// End of the appointment window.
    pub appointment_to: Option<Appointment>,
}

impl LoadStop {
    /// Create a stop with no appointment window.
    pub fn new(
        load_id: LoadId,
        sequence: u32,
        stop_type: StopType,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            load_id,
            sequence,
            stop_type,
            city: city.into(),
            state: state.into(),
            appointment_from: None,
            appointment_to: None,
        }
    }

    /// Set the appointment window.
    pub fn with_window(mut self, from: Option<Appointment>, to: Option<Appointment>) -> Self {
        self.appointment_from = from;
        self.appointment_to = to;
        self
    }
}
