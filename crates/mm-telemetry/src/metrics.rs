//! Prometheus metrics for the ledger.
//!
//! All metrics follow the naming convention: `mm_<component>_<metric>_<unit>`
//! and live in [`REGISTRY`], not the prometheus default registry.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts,
    Registry, TextEncoder,
};
use std::time::Instant;

use crate::TelemetryError;

lazy_static! {
    /// Metrics registry for this process
    pub static ref REGISTRY: Registry = Registry::new();

    /// Operations handled, by operation name and outcome (`ok` or an error kind)
    pub static ref LEDGER_OPERATIONS: CounterVec = CounterVec::new(
        Opts::new("mm_ledger_operations_total", "Ledger operations by name and outcome"),
        &["operation", "outcome"]
    ).expect("metric creation failed");

    /// Operation latency
    pub static ref LEDGER_OPERATION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "mm_ledger_operation_duration_seconds",
            "Time spent executing ledger operations"
        ).buckets(exponential_buckets(0.0001, 2.0, 14).expect("valid buckets")),
        &["operation"]
    ).expect("metric creation failed");

    /// Properties issued
    pub static ref PROPERTIES_ISSUED: Counter = Counter::new(
        "mm_ledger_properties_issued_total",
        "Total number of properties issued"
    ).expect("metric creation failed");

    /// Commands waiting in the worker queue
    pub static ref QUEUE_DEPTH: Gauge = Gauge::new(
        "mm_ledger_queue_depth",
        "Commands waiting for the ledger worker"
    ).expect("metric creation failed");
}

/// Register all collectors with [`REGISTRY`].
///
/// Calling it again is harmless.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(LEDGER_OPERATIONS.clone()),
        Box::new(LEDGER_OPERATION_DURATION.clone()),
        Box::new(PROPERTIES_ISSUED.clone()),
        Box::new(QUEUE_DEPTH.clone()),
    ];

    for collector in collectors {
        match REGISTRY.register(collector) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&REGISTRY.gather(), &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Count one finished operation.
pub fn record_operation(operation: &str, outcome: &str) {
    LEDGER_OPERATIONS
        .with_label_values(&[operation, outcome])
        .inc();
}

/// Observes the elapsed time for an operation on drop.
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn start(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        LEDGER_OPERATION_DURATION
            .with_label_values(&[&self.operation])
            .observe(self.start.elapsed().as_secs_f64());
    }
}
