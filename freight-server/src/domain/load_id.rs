//! Load identifier type.

use std::fmt;

use super::DomainError;

/// A validated load identifier.
///
/// Load identifiers key the postings table and are the foreign key of the
/// stops table. Surrounding whitespace is trimmed; a blank identifier is
/// rejected.
///
/// # Examples
///
/// ```
/// use freight_server::domain::LoadId;
///
/// let id = LoadId::parse(" L1001 ").unwrap();
/// assert_eq!(id.as_str(), "L1001");
///
/// assert!(LoadId::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(String);

impl LoadId {
    /// Parse a load identifier from a string.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyLoadId);
        }
        Ok(LoadId(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoadId({})", self.0)
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let id = LoadId::parse("  12345\t").unwrap();
        assert_eq!(id.as_str(), "12345");
    }

    #[test]
    fn reject_blank() {
        assert_eq!(LoadId::parse(""), Err(DomainError::EmptyLoadId));
        assert_eq!(LoadId::parse("  "), Err(DomainError::EmptyLoadId));
    }

    #[test]
    fn display_and_debug() {
        let id = LoadId::parse("L7").unwrap();
        assert_eq!(format!("{}", id), "L7");
        assert_eq!(format!("{:?}", id), "LoadId(L7)");
    }

    #[test]
    fn equality_ignores_padding() {
        let a = LoadId::parse("L7").unwrap();
        let b = LoadId::parse(" L7").unwrap();
        let c = LoadId::parse("L8").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
