//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log filter directive (trace, debug, info, warn, error, or an env-filter string)
    pub log_level: String,

    /// Whether to write logs to stderr at all
    pub console_output: bool,

    /// Whether to emit JSON lines instead of pretty output
    pub json_logs: bool,

    /// Whether to register the Prometheus collectors
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "micromarket".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            metrics_enabled: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MM_SERVICE_NAME`: Service name (default: micromarket)
    /// - `MM_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `MM_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `MM_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `MM_METRICS`: Register metrics (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();
        let defaults = Self::default();

        Self {
            service_name: lookup("MM_SERVICE_NAME").unwrap_or(defaults.service_name),
            log_level: lookup("MM_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            console_output: lookup("MM_CONSOLE_OUTPUT")
                .map(|v| is_enabled(&v, true))
                .unwrap_or(defaults.console_output),
            json_logs: lookup("MM_JSON_LOGS")
                .map(|v| is_enabled(&v, false))
                .unwrap_or(is_container),
            metrics_enabled: lookup("MM_METRICS")
                .map(|v| is_enabled(&v, true))
                .unwrap_or(defaults.metrics_enabled),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }
}

fn is_enabled(raw: &str, default: bool) -> bool {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => default,
    }
}
