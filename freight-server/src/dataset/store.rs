//! Immutable in-memory dataset store.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::domain::{
    Appointment, LoadId, LoadPosting, LoadStop, StopType, parse_flag, parse_sequence,
};

use super::LoadError;
use super::columns::*;
use super::source::{CsvSource, Row, TabularSource, read_rows};

/// The two loaded relations.
///
/// Rows are held behind `Arc` so query stages can build fresh relations
/// that share row data with the store. Nothing mutates a store after
/// construction.
#[derive(Debug, Default)]
pub struct DatasetStore {
    postings: Vec<Arc<LoadPosting>>,
    stops: Vec<Arc<LoadStop>>,
}

impl DatasetStore {
    /// Load both datasets from tabular sources.
    pub fn load<P, S>(postings: &mut P, stops: &mut S) -> Result<Self, LoadError>
    where
        P: TabularSource + ?Sized,
        S: TabularSource + ?Sized,
    {
        let posting_rows = read_rows(postings, POSTING_COLUMNS, parse_posting)?;
        let stop_rows = read_rows(stops, STOP_COLUMNS, parse_stop)?;

        let store = Self::build(postings.name(), posting_rows, stop_rows)?;
        info!(
            postings = store.posting_count(),
            stops = store.stop_count(),
            "Datasets loaded"
        );
        Ok(store)
    }

    /// Load both datasets from CSV files.
    pub fn open_csv(
        postings_path: impl AsRef<Path>,
        stops_path: impl AsRef<Path>,
    ) -> Result<Self, LoadError> {
        let mut postings = CsvSource::open(postings_path)?;
        let mut stops = CsvSource::open(stops_path)?;
        Self::load(&mut postings, &mut stops)
    }

    /// Build a store from records already in memory.
    pub fn from_records(
        postings: Vec<LoadPosting>,
        stops: Vec<LoadStop>,
    ) -> Result<Self, LoadError> {
        Self::build("postings", postings, stops)
    }

    fn build(
        postings_name: &str,
        postings: Vec<LoadPosting>,
        stops: Vec<LoadStop>,
    ) -> Result<Self, LoadError> {
        let mut seen: HashSet<&LoadId> = HashSet::with_capacity(postings.len());
        for posting in &postings {
            if !seen.insert(&posting.load_id) {
                return Err(LoadError::DuplicateLoad {
                    name: postings_name.to_string(),
                    load_id: posting.load_id.clone(),
                });
            }
        }

        Ok(Self {
            postings: postings.into_iter().map(Arc::new).collect(),
            stops: stops.into_iter().map(Arc::new).collect(),
        })
    }

    /// All postings, in source order.
    pub fn postings(&self) -> &[Arc<LoadPosting>] {
        &self.postings
    }

    /// All stops, in source order.
    pub fn stops(&self) -> &[Arc<LoadStop>] {
        &self.stops
    }

    pub fn posting_count(&self) -> usize {
        self.postings.len()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }
}

fn parse_posting(row: &Row<'_>) -> Result<LoadPosting, LoadError> {
    Ok(LoadPosting {
        load_id: row.parse_with(LOAD_ID, LoadId::parse)?,
        transport_mode: row.text(TRANSPORT_MODE).to_string(),
        is_hazardous: row.parse_with(IS_HAZARDOUS, parse_flag)?,
        is_high_value: row.parse_with(IS_HIGH_VALUE, parse_flag)?,
        status: row.text(POSTING_STATUS).to_string(),
    })
}

fn parse_stop(row: &Row<'_>) -> Result<LoadStop, LoadError> {
    Ok(LoadStop {
        load_id: row.parse_with(LOAD_ID, LoadId::parse)?,
        sequence: row.parse_with(STOP_SEQUENCE, parse_sequence)?,
        stop_type: row.parse_with(STOP_TYPE, StopType::parse)?,
        city: row.text(CITY).to_string(),
        state: row.text(STATE).to_string(),
        appointment_from: row.parse_with(APPOINTMENT_FROM, Appointment::parse_optional)?,
        appointment_to: row.parse_with(APPOINTMENT_TO, Appointment::parse_optional)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    const POSTINGS: &str = "\
LOAD_ID,TRANSPORT_MODE,IS_HAZARDOUS,IS_HIGH_VALUE,POSTING_STATUS
L1,Van,false,false,NEW
L2,Reefer,true,false,NEW
";

    const STOPS: &str = "\
LOAD_ID,STOP_SEQUENCE,STOP_TYPE,CITY,STATE,APPOINTMENT_FROM,APPOINTMENT_TO
L1,1,P,Atlanta,GA,2024-03-01 08:00:00,2024-03-01 10:00:00
L1,2,D,Dallas,TX,2024-03-02 08:00:00,2024-03-02 12:00:00
L2,1,P,Chicago,IL,,
";

    fn csv(name: &str, data: &'static str) -> CsvSource {
        CsvSource::from_reader(name, data.as_bytes())
    }

    #[test]
    fn load_from_sources() {
        let store =
            DatasetStore::load(&mut csv("postings", POSTINGS), &mut csv("stops", STOPS)).unwrap();

        assert_eq!(store.posting_count(), 2);
        assert_eq!(store.stop_count(), 3);

        let l2 = &store.postings()[1];
        assert_eq!(l2.load_id.as_str(), "L2");
        assert_eq!(l2.transport_mode, "Reefer");
        assert!(l2.is_hazardous);
        assert!(!l2.is_high_value);

        let dallas = &store.stops()[1];
        assert_eq!(dallas.sequence, 2);
        assert_eq!(dallas.stop_type, StopType::Dropoff);
        assert_eq!(
            dallas.appointment_to.as_ref().map(|a| a.as_str()),
            Some("2024-03-02 12:00:00")
        );

        let chicago = &store.stops()[2];
        assert!(chicago.appointment_from.is_none());
    }

    #[test]
    fn load_from_files() {
        let dir = tempdir().unwrap();
        let postings_path = dir.path().join("load_posting.csv");
        let stops_path = dir.path().join("load_stop.csv");
        std::fs::File::create(&postings_path)
            .unwrap()
            .write_all(POSTINGS.as_bytes())
            .unwrap();
        std::fs::File::create(&stops_path)
            .unwrap()
            .write_all(STOPS.as_bytes())
            .unwrap();

        let store = DatasetStore::open_csv(&postings_path, &stops_path).unwrap();
        assert_eq!(store.posting_count(), 2);
        assert_eq!(store.stop_count(), 3);
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempdir().unwrap();
        let err =
            DatasetStore::open_csv(dir.path().join("a.csv"), dir.path().join("b.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Unreadable { .. }));
    }

    #[test]
    fn missing_stop_column_fails() {
        let stops = "LOAD_ID,STOP_SEQUENCE,STOP_TYPE,CITY,STATE,APPOINTMENT_FROM\n";
        let err = DatasetStore::load(&mut csv("postings", POSTINGS), &mut csv("stops", stops))
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn {
                column: "APPOINTMENT_TO",
                ..
            }
        ));
    }

    #[test]
    fn untyped_flag_fails() {
        let postings = "\
LOAD_ID,TRANSPORT_MODE,IS_HAZARDOUS,IS_HIGH_VALUE,POSTING_STATUS
L1,Van,perhaps,false,NEW
";
        let err = DatasetStore::load(&mut csv("postings", postings), &mut csv("stops", STOPS))
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidCell {
                row: 2,
                column: "IS_HAZARDOUS",
                ..
            }
        ));
    }

    #[test]
    fn bad_sequence_fails() {
        let stops = "\
LOAD_ID,STOP_SEQUENCE,STOP_TYPE,CITY,STATE,APPOINTMENT_FROM,APPOINTMENT_TO
L1,zero,P,Atlanta,GA,,
";
        let err = DatasetStore::load(&mut csv("postings", POSTINGS), &mut csv("stops", stops))
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidCell {
                column: "STOP_SEQUENCE",
                ..
            }
        ));
    }

    #[test]
    fn duplicate_posting_fails() {
        let postings = vec![
            LoadPosting::new(LoadId::parse("L1").unwrap(), "Van", false, false, "NEW"),
            LoadPosting::new(LoadId::parse("L1").unwrap(), "Flatbed", false, false, "NEW"),
        ];
        let err = DatasetStore::from_records(postings, vec![]).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateLoad { .. }));
    }

    #[test]
    fn orphan_stops_are_kept() {
        let stops = vec![LoadStop::new(
            LoadId::parse("L9").unwrap(),
            1,
            StopType::Pickup,
            "Nowhere",
            "NV",
        )];
        let store = DatasetStore::from_records(vec![], stops).unwrap();
        assert_eq!(store.stop_count(), 1);
    }
}
