//! Search filters and the predicates they compose into.
//!
//! Every filter is optional; an absent (or blank) filter means "no
//! constraint". Text filters use case-sensitive substring containment.
//! Date filters also use containment, against the canonical
//! `YYYY-MM-DD HH:MM:SS` rendering of the appointment, which is the loose
//! matching the search form has always had.

use chrono::NaiveDate;

use super::join::JoinedRecord;
use super::roles::Role;

/// The caller's filter values. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Transport mode / trailer type substring.
    pub trailer_type: Option<String>,
    pub origin_city: Option<String>,
    pub origin_state: Option<String>,
    pub destination_city: Option<String>,
    pub destination_state: Option<String>,

    /// Pickup date, `YYYY-MM-DD`.
    pub pickup_date: Option<String>,

    /// Delivery date, `YYYY-MM-DD`.
    pub delivery_date: Option<String>,

    pub is_hazardous: Option<bool>,
    pub is_high_value: Option<bool>,

    /// Exact posting status, e.g. "NEW".
    pub posting_status: Option<String>,
}

/// A filter value that failed validation and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field} {value:?}: expected YYYY-MM-DD")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
}

/// A single row predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    TransportModeContains(String),
    Hazardous(bool),
    HighValue(bool),
    PostingStatus(String),
    CityContains(String),
    StateContains(String),

    /// Appointment-from rendering contains the `YYYY-MM-DD` text.
    PickupOn(String),

    /// Appointment-to rendering contains the `YYYY-MM-DD` text.
    DeliveryOn(String),
}

impl Predicate {
    /// Whether a joined row satisfies this predicate.
    pub fn matches(&self, record: &JoinedRecord) -> bool {
        let posting = &record.posting;
        let stop = &record.stop;

        match self {
            Predicate::TransportModeContains(s) => posting.transport_mode.contains(s.as_str()),
            Predicate::Hazardous(flag) => posting.is_hazardous == *flag,
            Predicate::HighValue(flag) => posting.is_high_value == *flag,
            Predicate::PostingStatus(s) => posting.status == *s,
            Predicate::CityContains(s) => stop.city.contains(s.as_str()),
            Predicate::StateContains(s) => stop.state.contains(s.as_str()),
            Predicate::PickupOn(date) => stop
                .appointment_from
                .as_ref()
                .is_some_and(|a| a.as_str().contains(date.as_str())),
            Predicate::DeliveryOn(date) => stop
                .appointment_to
                .as_ref()
                .is_some_and(|a| a.as_str().contains(date.as_str())),
        }
    }

    /// The stop role a date predicate is checked against.
    pub fn anchor(&self) -> Option<Role> {
        match self {
            Predicate::PickupOn(_) => Some(Role::Origin),
            Predicate::DeliveryOn(_) => Some(Role::Destination),
            _ => None,
        }
    }

    /// Short description for logs.
    pub fn label(&self) -> String {
        match self {
            Predicate::TransportModeContains(s) => format!("trailer type contains {s:?}"),
            Predicate::Hazardous(flag) => format!("hazardous = {flag}"),
            Predicate::HighValue(flag) => format!("high value = {flag}"),
            Predicate::PostingStatus(s) => format!("posting status = {s:?}"),
            Predicate::CityContains(s) => format!("city contains {s:?}"),
            Predicate::StateContains(s) => format!("state contains {s:?}"),
            Predicate::PickupOn(date) => format!("pickup on {date}"),
            Predicate::DeliveryOn(date) => format!("delivery on {date}"),
        }
    }
}

/// Normalised `YYYY-MM-DD` text of a date.
fn date_text(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Predicates grouped by the pipeline stage that applies them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPlan {
    /// Applied to the joined relation.
    pub base: Vec<Predicate>,

    /// Applied to origin-role rows.
    pub origin: Vec<Predicate>,

    /// Applied to destination-role rows.
    pub destination: Vec<Predicate>,

    /// Applied to the re-joined result.
    pub dates: Vec<Predicate>,

    /// Filters dropped because their value was invalid.
    pub skipped: Vec<ValidationError>,
}

impl FilterPlan {
    /// Whether any predicate is active.
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
            && self.origin.is_empty()
            && self.destination.is_empty()
            && self.dates.is_empty()
    }
}

/// Validate a `YYYY-MM-DD` date.
///
/// ```
/// use freight_server::query::validate_date;
///
/// assert!(validate_date("pickup_date", "2024-03-01").is_ok());
/// assert!(validate_date("pickup_date", "2024-13-40").is_err());
/// ```
pub fn validate_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError {
        field,
        value: value.to_string(),
    })
}

/// Treat blank strings as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl SearchFilters {
    /// Compose the filters into per-stage predicates.
    ///
    /// Invalid dates do not fail composition; they are recorded in
    /// [`FilterPlan::skipped`] and the filter is left out.
    pub fn compose(&self) -> FilterPlan {
        let mut plan = FilterPlan::default();

        if let Some(s) = present(&self.trailer_type) {
            plan.base.push(Predicate::TransportModeContains(s.to_string()));
        }
        if let Some(flag) = self.is_hazardous {
            plan.base.push(Predicate::Hazardous(flag));
        }
        if let Some(flag) = self.is_high_value {
            plan.base.push(Predicate::HighValue(flag));
        }
        if let Some(s) = present(&self.posting_status) {
            plan.base.push(Predicate::PostingStatus(s.to_string()));
        }

        if let Some(s) = present(&self.origin_city) {
            plan.origin.push(Predicate::CityContains(s.to_string()));
        }
        if let Some(s) = present(&self.origin_state) {
            plan.origin.push(Predicate::StateContains(s.to_string()));
        }

        if let Some(s) = present(&self.destination_city) {
            plan.destination.push(Predicate::CityContains(s.to_string()));
        }
        if let Some(s) = present(&self.destination_state) {
            plan.destination.push(Predicate::StateContains(s.to_string()));
        }

        if let Some(s) = present(&self.pickup_date) {
            match validate_date("pickup_date", s) {
                Ok(date) => plan.dates.push(Predicate::PickupOn(date_text(date))),
                Err(e) => plan.skipped.push(e),
            }
        }
        if let Some(s) = present(&self.delivery_date) {
            match validate_date("delivery_date", s) {
                Ok(date) => plan.dates.push(Predicate::DeliveryOn(date_text(date))),
                Err(e) => plan.skipped.push(e),
            }
        }

        plan
    }
}

/// Whether a row satisfies every predicate (true for none).
pub fn matches_all(predicates: &[Predicate], record: &JoinedRecord) -> bool {
    predicates.iter().all(|p| p.matches(record))
}

/// Keep the rows satisfying every predicate, preserving order.
pub fn retain_matching(relation: Vec<JoinedRecord>, predicates: &[Predicate]) -> Vec<JoinedRecord> {
    if predicates.is_empty() {
        return relation;
    }
    relation
        .into_iter()
        .filter(|r| matches_all(predicates, r))
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{LoadId, LoadPosting, LoadStop, StopType};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn rows() -> impl Strategy<Value = Vec<JoinedRecord>> {
        proptest::collection::vec(
            (
                prop::sample::select(vec!["Van", "Reefer", "Flatbed"]),
                any::<bool>(),
                prop::sample::select(vec!["Atlanta", "Dallas", "Austin"]),
            ),
            0..20,
        )
        .prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (mode, hazardous, city))| {
                    let id = LoadId::parse(&format!("L{i}")).unwrap();
                    JoinedRecord::new(
                        Arc::new(LoadPosting::new(id.clone(), mode, hazardous, false, "NEW")),
                        Arc::new(LoadStop::new(id, 1, StopType::Pickup, city, "TX")),
                    )
                })
                .collect()
        })
    }

    fn predicates() -> impl Strategy<Value = Vec<Predicate>> {
        proptest::collection::vec(
            prop_oneof![
                "[A-Za-z]{0,3}".prop_map(Predicate::TransportModeContains),
                any::<bool>().prop_map(Predicate::Hazardous),
                "[A-Za-z]{0,3}".prop_map(Predicate::CityContains),
            ],
            0..3,
        )
    }

    proptest! {
        /// Filtering twice gives the same rows as filtering once.
        #[test]
        fn filtering_is_idempotent(rows in rows(), preds in predicates()) {
            let once = retain_matching(rows, &preds);
            let twice = retain_matching(once.clone(), &preds);
            prop_assert_eq!(once, twice);
        }

        /// No predicates keeps every row.
        #[test]
        fn no_predicates_is_identity(rows in rows()) {
            let kept = retain_matching(rows.clone(), &[]);
            prop_assert_eq!(kept, rows);
        }

        /// Every kept row matches; every dropped row fails some predicate.
        #[test]
        fn filter_partitions_rows(rows in rows(), preds in predicates()) {
            let kept = retain_matching(rows.clone(), &preds);
            let expected: Vec<_> = rows.into_iter().filter(|r| matches_all(&preds, r)).collect();
            prop_assert_eq!(kept, expected);
        }
    }
}
