//! Freight load search server.
//!
//! Loads posting and stop datasets at startup and answers searches over
//! them: "which loads leave from here, go there, and fit my trailer?"

pub mod config;
pub mod dataset;
pub mod domain;
pub mod query;
pub mod telemetry;
pub mod web;
