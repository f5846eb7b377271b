//! `tracing-subscriber` setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(format!("log filter {:?}: {e}", config.log_level)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if !config.console_output {
        registry.try_init()
    } else if config.json_logs {
        // JSON lines go to stderr so stdout stays free for responses
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        registry.with(json_layer).try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_ansi(true);
        registry.with(fmt_layer).try_init()
    };
    result.map_err(|e| TelemetryError::TracingInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "tracing initialized"
    );
    Ok(())
}
