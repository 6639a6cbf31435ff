//! Server configuration.
//!
//! Read from environment variables at startup:
//!
//! | Variable | Default |
//! |---|---|
//! | `FREIGHT_POSTINGS_CSV` | `data/load_posting.csv` |
//! | `FREIGHT_STOPS_CSV` | `data/load_stop.csv` |
//! | `FREIGHT_BIND` | `127.0.0.1:3000` |
//! | `FREIGHT_STATIC_DIR` | the crate's `static/` directory |
//! | `FREIGHT_LOG_FILE` | unset (log to stderr) |
//! | `FREIGHT_DESTINATION_RULE` | `last-dropoff` |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::query::{DestinationRule, InvalidDestinationRule, QueryConfig};

/// Configuration errors. All are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Bind address does not parse
    #[error("invalid FREIGHT_BIND {value:?}: {message}")]
    InvalidBind { value: String, message: String },

    /// Destination rule is unknown
    #[error("invalid FREIGHT_DESTINATION_RULE: {0}")]
    InvalidDestinationRule(#[from] InvalidDestinationRule),
}

/// Configuration for the search server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path to the load postings CSV.
    pub postings_path: PathBuf,

    /// Path to the load stops CSV.
    pub stops_path: PathBuf,

    /// Address to listen on.
    pub bind: SocketAddr,

    /// Directory of static assets served under `/static`.
    pub static_dir: PathBuf,

    /// Append logs to this file instead of stderr.
    pub log_file: Option<PathBuf>,

    /// Query pipeline settings.
    pub query: QueryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            postings_path: PathBuf::from("data/load_posting.csv"),
            stops_path: PathBuf::from("data/load_stop.csv"),
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
            log_file: None,
            query: QueryConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from a key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get("FREIGHT_POSTINGS_CSV") {
            config.postings_path = PathBuf::from(path);
        }
        if let Some(path) = get("FREIGHT_STOPS_CSV") {
            config.stops_path = PathBuf::from(path);
        }
        if let Some(value) = get("FREIGHT_BIND") {
            let parsed: Result<SocketAddr, _> = value.trim().parse();
            config.bind = parsed.map_err(|e| ConfigError::InvalidBind {
                message: e.to_string(),
                value,
            })?;
        }
        if let Some(dir) = get("FREIGHT_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        config.log_file = get("FREIGHT_LOG_FILE").map(PathBuf::from);
        if let Some(rule) = get("FREIGHT_DESTINATION_RULE") {
            config.query.destination_rule = rule.parse::<DestinationRule>()?;
        }

        Ok(config)
    }
}
