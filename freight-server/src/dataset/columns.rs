//! Column names of the two datasets.

pub const LOAD_ID: &str = "LOAD_ID";
pub const TRANSPORT_MODE: &str = "TRANSPORT_MODE";
pub const IS_HAZARDOUS: &str = "IS_HAZARDOUS";
pub const IS_HIGH_VALUE: &str = "IS_HIGH_VALUE";
pub const POSTING_STATUS: &str = "POSTING_STATUS";

pub const STOP_SEQUENCE: &str = "STOP_SEQUENCE";
pub const STOP_TYPE: &str = "STOP_TYPE";
pub const CITY: &str = "CITY";
pub const STATE: &str = "STATE";
pub const APPOINTMENT_FROM: &str = "APPOINTMENT_FROM";
pub const APPOINTMENT_TO: &str = "APPOINTMENT_TO";

/// Required columns of the postings dataset.
pub const POSTING_COLUMNS: &[&str] = &[
    LOAD_ID,
    TRANSPORT_MODE,
    IS_HAZARDOUS,
    IS_HIGH_VALUE,
    POSTING_STATUS,
];

/// Required columns of the stops dataset.
pub const STOP_COLUMNS: &[&str] = &[
    LOAD_ID,
    STOP_SEQUENCE,
    STOP_TYPE,
    CITY,
    STATE,
    APPOINTMENT_FROM,
    APPOINTMENT_TO,
];
