//! # Micromarket Telemetry
//!
//! Logging and metrics for the ledger runtime.
//!
//! - **Logs**: `tracing-subscriber`, pretty or JSON lines on stderr
//! - **Metrics**: Prometheus collectors in a dedicated registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mm_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MM_SERVICE_NAME` | `micromarket` | Service name in logs |
//! | `MM_LOG_LEVEL` | `info` | Log filter, falls back to `RUST_LOG` |
//! | `MM_JSON_LOGS` | `false` | JSON lines (defaults on in containers) |
//! | `MM_CONSOLE_OUTPUT` | `true` | Write logs at all |
//! | `MM_METRICS` | `true` | Register Prometheus collectors |

mod config;
mod logging;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, record_operation, register_metrics, OperationTimer, LEDGER_OPERATIONS,
    LEDGER_OPERATION_DURATION, PROPERTIES_ISSUED, QUEUE_DEPTH,
};
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("failed to initialize tracing: {0}")]
    TracingInit(String),

    #[error("failed to initialize metrics: {0}")]
    MetricsInit(String),

    #[error("invalid telemetry configuration: {0}")]
    Config(String),
}

/// Initialize metrics (when enabled) and the global tracing subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    if config.metrics_enabled {
        register_metrics()?;
    }
    init_tracing(config)
}
