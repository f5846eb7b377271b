//! # Node Configuration
//!
//! Runtime parameters layered over defaults from `MM_*` environment
//! variables.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MM_STORE_BACKEND` | `memory` | `memory`, `file` or `rocksdb` |
//! | `MM_DATA_DIR` | `./data` | Directory for persistent backends |
//! | `MM_QUEUE_DEPTH` | `1024` | Bounded command queue capacity |
//! | `MM_MATCHING` | `disabled` | Offer matching mode |
//! | `MM_MAX_QUERY_IDS` | `100` | Max ids per `getProperties` call |

use mm_ledger::domain::config::{LedgerConfig, MatchingMode};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Name of the snapshot file used by the `file` backend.
pub const SNAPSHOT_FILE: &str = "ledger.snapshot";

/// Subdirectory used by the `rocksdb` backend.
pub const ROCKSDB_DIR: &str = "rocksdb";

/// Upper bound on the command queue.
pub const MAX_QUEUE_DEPTH: usize = 1 << 16;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {variable}: {reason}")]
    InvalidValue {
        variable: &'static str,
        value: String,
        reason: String,
    },

    #[error("queue depth must be between 1 and {max}, got {actual}")]
    QueueDepth { actual: usize, max: usize },

    #[error("storage backend {0} is not compiled in (enable the `{0}` feature)")]
    BackendUnavailable(StoreBackend),

    #[error("ledger configuration rejected: {0}")]
    Ledger(String),
}

/// Where ledger records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
    RocksDb,
}

impl StoreBackend {
    /// Whether this build can open the backend.
    #[must_use]
    pub fn is_available(&self) -> bool {
        match self {
            StoreBackend::Memory | StoreBackend::File => true,
            StoreBackend::RocksDb => cfg!(feature = "rocksdb"),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::File => write!(f, "file"),
            StoreBackend::RocksDb => write!(f, "rocksdb"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(StoreBackend::Memory),
            "file" => Ok(StoreBackend::File),
            "rocksdb" => Ok(StoreBackend::RocksDb),
            other => Err(format!("unknown store backend {other:?}")),
        }
    }
}

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub backend: StoreBackend,
    pub data_dir: PathBuf,
    pub queue_depth: usize,
    pub ledger: LedgerConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            data_dir: PathBuf::from("./data"),
            queue_depth: 1024,
            ledger: LedgerConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable source, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("MM_STORE_BACKEND") {
            config.backend = parse_var("MM_STORE_BACKEND", &raw)?;
        }
        if let Some(raw) = lookup("MM_DATA_DIR") {
            config.data_dir = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("MM_QUEUE_DEPTH") {
            config.queue_depth = parse_var("MM_QUEUE_DEPTH", &raw)?;
        }
        if let Some(raw) = lookup("MM_MATCHING") {
            let mode: MatchingMode = parse_var("MM_MATCHING", &raw)?;
            config.ledger = config.ledger.with_matching(mode);
        }
        if let Some(raw) = lookup("MM_MAX_QUERY_IDS") {
            let limit: usize = parse_var("MM_MAX_QUERY_IDS", &raw)?;
            config.ledger = config.ledger.with_max_query_ids(limit);
        }

        Ok(config)
    }

    /// Check the configuration can be started.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_depth == 0 || self.queue_depth > MAX_QUEUE_DEPTH {
            return Err(ConfigError::QueueDepth {
                actual: self.queue_depth,
                max: MAX_QUEUE_DEPTH,
            });
        }
        if !self.backend.is_available() {
            return Err(ConfigError::BackendUnavailable(self.backend));
        }
        self.ledger
            .validate()
            .map_err(|e| ConfigError::Ledger(e.to_string()))
    }

    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }

    #[must_use]
    pub fn rocksdb_path(&self) -> PathBuf {
        self.data_dir.join(ROCKSDB_DIR)
    }
}

fn parse_var<T>(variable: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            variable,
            value: raw.to_string(),
            reason: e.to_string(),
        })
}
