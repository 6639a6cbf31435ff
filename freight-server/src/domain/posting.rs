//! Load posting records.

use super::{DomainError, LoadId};

/// One shipment load offered on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPosting {
    pub load_id: LoadId,

    /// Transport mode / trailer type, e.g. "Van" or "Reefer".
    pub transport_mode: String,

    pub is_hazardous: bool,
    pub is_high_value: bool,

    /// Posting status, e.g. "NEW".
    pub status: String,
}

impl LoadPosting {
    /// Create a posting.
    pub fn new(
        load_id: LoadId,
        transport_mode: impl Into<String>,
        is_hazardous: bool,
        is_high_value: bool,
        status: impl Into<String>,
    ) -> Self {
        Self {
            load_id,
            transport_mode: transport_mode.into(),
            is_hazardous,
            is_high_value,
            status: status.into(),
        }
    }
}

/// Parse a boolean flag cell.
///
/// ```
/// use freight_server::domain::parse_flag;
///
/// assert!(parse_flag("True").unwrap());
/// assert!(!parse_flag("0").unwrap());
/// assert!(parse_flag("sometimes").is_err());
/// ```
pub fn parse_flag(s: &str) -> Result<bool, DomainError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Ok(true),
        "false" | "f" | "no" | "n" | "0" => Ok(false),
        _ => Err(DomainError::InvalidFlag(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_spellings() {
        for s in ["true", "TRUE", "t", "Yes", "y", "1", " true "] {
            assert!(parse_flag(s).unwrap(), "{s}");
        }
        for s in ["false", "False", "f", "no", "N", "0"] {
            assert!(!parse_flag(s).unwrap(), "{s}");
        }
    }

    #[test]
    fn flag_rejects_blank_and_noise() {
        assert!(parse_flag("").is_err());
        assert!(parse_flag("2").is_err());
        assert!(parse_flag("on").is_err());
    }
}
