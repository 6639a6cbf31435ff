//! Origin and destination role resolution.
//!
//! A load's origin is its pickup at stop sequence 1. Which stop counts as the
//! destination depends on [`DestinationRule`]. Roles are resolved in a single
//! pass over a joined relation and exposed as views (row positions) into it.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::{LoadId, StopType};

use super::join::JoinedRecord;

/// How the destination stop of a load is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DestinationRule {
    /// The drop-off with the highest sequence among the load's drop-offs.
    #[default]
    LastDropoff,

    /// The load's highest-sequence stop, only if that stop is a drop-off.
    LastStop,
}

impl DestinationRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationRule::LastDropoff => "last-dropoff",
            DestinationRule::LastStop => "last-stop",
        }
    }
}

impl fmt::Display for DestinationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown destination rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown destination rule {0:?} (expected last-dropoff or last-stop)")]
pub struct InvalidDestinationRule(String);

impl FromStr for DestinationRule {
    type Err = InvalidDestinationRule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-dropoff" | "last_dropoff" => Ok(DestinationRule::LastDropoff),
            "last-stop" | "last_stop" => Ok(DestinationRule::LastStop),
            _ => Err(InvalidDestinationRule(s.to_string())),
        }
    }
}

/// A stop role within a load's route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Origin,
    Destination,
}

/// Per-load bookkeeping while scanning.
#[derive(Debug, Default)]
struct Slot {
    origin: Option<usize>,
    last_dropoff: Option<(u32, usize)>,
    last_stop: Option<(u32, usize)>,
}

/// Keep the first row seen at the highest sequence.
fn keep_max(current: &mut Option<(u32, usize)>, sequence: u32, idx: usize) {
    let replace = match *current {
        Some((best, _)) => sequence > best,
        None => true,
    };
    if replace {
        *current = Some((sequence, idx));
    }
}

/// Resolved origin and destination rows for every load in a relation.
///
/// Duplicate candidates (e.g. two sequence-1 pickups) resolve to the first
/// in relation order.
#[derive(Debug)]
pub struct RouteRoles<'a> {
    origins: HashMap<&'a LoadId, usize>,
    destinations: HashMap<&'a LoadId, usize>,
}

impl<'a> RouteRoles<'a> {
    /// Resolve roles over a joined relation.
    pub fn resolve(relation: &'a [JoinedRecord], rule: DestinationRule) -> Self {
        let mut slots: HashMap<&'a LoadId, Slot> = HashMap::new();

        for (idx, record) in relation.iter().enumerate() {
            let stop = &record.stop;
            let slot = slots.entry(record.load_id()).or_default();

            if stop.stop_type == StopType::Pickup && stop.sequence == 1 && slot.origin.is_none() {
                slot.origin = Some(idx);
            }
            if stop.stop_type == StopType::Dropoff {
                keep_max(&mut slot.last_dropoff, stop.sequence, idx);
            }
            keep_max(&mut slot.last_stop, stop.sequence, idx);
        }

        let mut origins = HashMap::new();
        let mut destinations = HashMap::new();

        for (load, slot) in slots {
            if let Some(idx) = slot.origin {
                origins.insert(load, idx);
            }

            let destination = match rule {
                DestinationRule::LastDropoff => slot.last_dropoff.map(|(_, idx)| idx),
                DestinationRule::LastStop => slot
                    .last_stop
                    .map(|(_, idx)| idx)
                    .filter(|&idx| relation[idx].stop.stop_type == StopType::Dropoff),
            };
            if let Some(idx) = destination {
                destinations.insert(load, idx);
            }
        }

        Self {
            origins,
            destinations,
        }
    }

    /// Row position of a load's origin stop.
    pub fn origin_of(&self, load: &LoadId) -> Option<usize> {
        self.origins.get(load).copied()
    }

    /// Row position of a load's destination stop.
    pub fn destination_of(&self, load: &LoadId) -> Option<usize> {
        self.destinations.get(load).copied()
    }

    /// Row positions holding the given role, in relation order.
    pub fn view(&self, role: Role) -> Vec<usize> {
        let map = match role {
            Role::Origin => &self.origins,
            Role::Destination => &self.destinations,
        };
        let mut rows: Vec<usize> = map.values().copied().collect();
        rows.sort_unstable();
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LoadPosting, LoadStop};
    use std::sync::Arc;

    fn id(s: &str) -> LoadId {
        LoadId::parse(s).unwrap()
    }

    fn relation(stops: &[(&str, u32, StopType, &str)]) -> Vec<JoinedRecord> {
        stops
            .iter()
            .map(|(load, seq, stop_type, city)| {
                JoinedRecord::new(
                    Arc::new(LoadPosting::new(id(load), "Van", false, false, "NEW")),
                    Arc::new(LoadStop::new(id(load), *seq, *stop_type, *city, "ST")),
                )
            })
            .collect()
    }

    #[test]
    fn simple_route() {
        let rel = relation(&[
            ("L1", 1, StopType::Pickup, "Atlanta"),
            ("L1", 2, StopType::Dropoff, "Birmingham"),
            ("L1", 3, StopType::Dropoff, "Dallas"),
        ]);

        let roles = RouteRoles::resolve(&rel, DestinationRule::LastDropoff);

        assert_eq!(roles.origin_of(&id("L1")), Some(0));
        assert_eq!(roles.destination_of(&id("L1")), Some(2));
        assert_eq!(roles.view(Role::Origin), vec![0]);
        assert_eq!(roles.view(Role::Destination), vec![2]);
    }

    #[test]
    fn stop_order_in_relation_does_not_matter() {
        let rel = relation(&[
            ("L1", 3, StopType::Dropoff, "Dallas"),
            ("L1", 1, StopType::Pickup, "Atlanta"),
            ("L1", 2, StopType::Dropoff, "Birmingham"),
        ]);

        let roles = RouteRoles::resolve(&rel, DestinationRule::LastDropoff);

        assert_eq!(roles.origin_of(&id("L1")), Some(1));
        assert_eq!(roles.destination_of(&id("L1")), Some(0));
    }

    #[test]
    fn no_origin_without_sequence_one_pickup() {
        let rel = relation(&[
            ("L1", 1, StopType::Dropoff, "Atlanta"),
            ("L1", 2, StopType::Pickup, "Macon"),
            ("L1", 3, StopType::Dropoff, "Dallas"),
        ]);

        let roles = RouteRoles::resolve(&rel, DestinationRule::LastDropoff);

        assert_eq!(roles.origin_of(&id("L1")), None);
        assert!(roles.view(Role::Origin).is_empty());
        assert_eq!(roles.destination_of(&id("L1")), Some(2));
    }

    #[test]
    fn no_destination_without_dropoff() {
        let rel = relation(&[
            ("L1", 1, StopType::Pickup, "Atlanta"),
            ("L1", 2, StopType::Pickup, "Macon"),
        ]);

        for rule in [DestinationRule::LastDropoff, DestinationRule::LastStop] {
            let roles = RouteRoles::resolve(&rel, rule);
            assert_eq!(roles.destination_of(&id("L1")), None);
            assert_eq!(roles.origin_of(&id("L1")), Some(0));
        }
    }

    #[test]
    fn rules_diverge_when_last_stop_is_pickup() {
        let rel = relation(&[
            ("L1", 1, StopType::Pickup, "Atlanta"),
            ("L1", 2, StopType::Dropoff, "Dallas"),
            ("L1", 3, StopType::Pickup, "Houston"),
        ]);

        let last_dropoff = RouteRoles::resolve(&rel, DestinationRule::LastDropoff);
        assert_eq!(last_dropoff.destination_of(&id("L1")), Some(1));

        let last_stop = RouteRoles::resolve(&rel, DestinationRule::LastStop);
        assert_eq!(last_stop.destination_of(&id("L1")), None);
    }

    #[test]
    fn duplicate_origins_pick_first() {
        let rel = relation(&[
            ("L1", 1, StopType::Pickup, "Atlanta"),
            ("L1", 1, StopType::Pickup, "Athens"),
            ("L1", 2, StopType::Dropoff, "Dallas"),
            ("L2", 1, StopType::Pickup, "Boston"),
            ("L2", 1, StopType::Pickup, "Bangor"),
            ("L2", 2, StopType::Dropoff, "Denver"),
            ("L2", 2, StopType::Dropoff, "Durango"),
        ]);

        let roles = RouteRoles::resolve(&rel, DestinationRule::LastDropoff);

        assert_eq!(roles.origin_of(&id("L1")), Some(0));
        assert_eq!(roles.origin_of(&id("L2")), Some(3));
        assert_eq!(roles.destination_of(&id("L2")), Some(5));

        // Resolving again gives the same answer
        let again = RouteRoles::resolve(&rel, DestinationRule::LastDropoff);
        assert_eq!(again.view(Role::Origin), roles.view(Role::Origin));
        assert_eq!(again.view(Role::Destination), roles.view(Role::Destination));
    }

    #[test]
    fn views_span_loads_in_relation_order() {
        let rel = relation(&[
            ("L2", 1, StopType::Pickup, "Boston"),
            ("L1", 1, StopType::Pickup, "Atlanta"),
            ("L2", 2, StopType::Dropoff, "Denver"),
            ("L1", 2, StopType::Dropoff, "Dallas"),
        ]);

        let roles = RouteRoles::resolve(&rel, DestinationRule::default());

        assert_eq!(roles.view(Role::Origin), vec![0, 1]);
        assert_eq!(roles.view(Role::Destination), vec![2, 3]);
    }

    #[test]
    fn parse_rule() {
        assert_eq!(
            "last-dropoff".parse::<DestinationRule>().unwrap(),
            DestinationRule::LastDropoff
        );
        assert_eq!(
            "LAST_STOP".parse::<DestinationRule>().unwrap(),
            DestinationRule::LastStop
        );
        assert!("first".parse::<DestinationRule>().is_err());
        assert_eq!(DestinationRule::default().to_string(), "last-dropoff");
    }
}
