//! Hash join of postings and stops.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use crate::domain::{LoadId, LoadPosting, LoadStop};

/// One posting paired with one of its stops.
///
/// Both halves are shared handles into the dataset store; cloning a record
/// never copies row data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRecord {
    pub posting: Arc<LoadPosting>,
    pub stop: Arc<LoadStop>,
}

impl JoinedRecord {
    /// Create a joined record.
    pub fn new(posting: Arc<LoadPosting>, stop: Arc<LoadStop>) -> Self {
        Self { posting, stop }
    }

    /// The shared load identifier.
    pub fn load_id(&self) -> &LoadId {
        &self.stop.load_id
    }
}

/// A relation of joined rows, one per (load, stop) pair.
pub type JoinedRelation = Vec<JoinedRecord>;

/// Structural failure inside the join.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JoinError {
    /// The build side holds the same key twice
    #[error("duplicate posting for load {0} on join build side")]
    DuplicateKey(LoadId),
}

/// Inner join postings and stops on load identifier.
///
/// Builds a hash table over postings and probes it once per stop, so the
/// output follows stop order. Stops without a posting and postings without
/// stops are dropped.
pub fn inner_join(
    postings: &[Arc<LoadPosting>],
    stops: &[Arc<LoadStop>],
) -> Result<JoinedRelation, JoinError> {
    let mut by_load: HashMap<&LoadId, &Arc<LoadPosting>> = HashMap::with_capacity(postings.len());
    for posting in postings {
        match by_load.entry(&posting.load_id) {
            Entry::Occupied(_) => return Err(JoinError::DuplicateKey(posting.load_id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(posting);
            }
        }
    }

    let joined = stops
        .iter()
        .filter_map(|stop| {
            by_load
                .get(&stop.load_id)
                .map(|posting| JoinedRecord::new(Arc::clone(posting), Arc::clone(stop)))
        })
        .collect();

    Ok(joined)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::StopType;
    use proptest::prelude::*;
    use std::collections::HashSet;

    /// Posting ids drawn from a small pool so stops hit and miss.
    fn dataset() -> impl Strategy<Value = (Vec<Arc<LoadPosting>>, Vec<Arc<LoadStop>>)> {
        (
            proptest::collection::hash_set(0u8..12, 0..8),
            proptest::collection::vec((0u8..12, 1u32..6), 0..30),
        )
            .prop_map(|(posting_ids, stop_keys)| {
                let postings: Vec<Arc<LoadPosting>> = posting_ids
                    .into_iter()
                    .map(|n| {
                        Arc::new(LoadPosting::new(
                            LoadId::parse(&format!("L{n}")).unwrap(),
                            "Van",
                            false,
                            false,
                            "NEW",
                        ))
                    })
                    .collect();
                let stops: Vec<Arc<LoadStop>> = stop_keys
                    .into_iter()
                    .map(|(n, seq)| {
                        Arc::new(LoadStop::new(
                            LoadId::parse(&format!("L{n}")).unwrap(),
                            seq,
                            StopType::Pickup,
                            "City",
                            "ST",
                        ))
                    })
                    .collect();
                (postings, stops)
            })
    }

    proptest! {
        /// Every stop with a posting appears exactly once; no others appear.
        #[test]
        fn join_matches_nested_loop((postings, stops) in dataset()) {
            let joined = inner_join(&postings, &stops).unwrap();

            let expected: Vec<(String, u32)> = stops
                .iter()
                .filter(|s| postings.iter().any(|p| p.load_id == s.load_id))
                .map(|s| (s.load_id.to_string(), s.sequence))
                .collect();
            let actual: Vec<(String, u32)> = joined
                .iter()
                .map(|r| (r.load_id().to_string(), r.stop.sequence))
                .collect();

            prop_assert_eq!(actual, expected);
        }

        /// Loads missing from either side never appear in the output.
        #[test]
        fn join_keys_are_in_both_inputs((postings, stops) in dataset()) {
            let joined = inner_join(&postings, &stops).unwrap();

            let posting_ids: HashSet<_> = postings.iter().map(|p| &p.load_id).collect();
            let stop_ids: HashSet<_> = stops.iter().map(|s| &s.load_id).collect();

            for row in &joined {
                prop_assert!(posting_ids.contains(row.load_id()));
                prop_assert!(stop_ids.contains(row.load_id()));
            }
        }
    }
}
