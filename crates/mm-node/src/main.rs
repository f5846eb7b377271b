//! # Micromarket Node Runtime
//!
//! Reads one JSON request per line from stdin and writes one JSON response
//! per line to stdout. Logs go to stderr. Exits on EOF or Ctrl+C.

use anyhow::{Context, Result};
use mm_node::{build_handler, handle_line, open_store, LedgerWorker, NodeConfig};
use mm_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let node_config = NodeConfig::from_env().context("failed to load node configuration")?;
    node_config
        .validate()
        .context("invalid node configuration")?;

    let telemetry = TelemetryConfig::from_env();
    init_telemetry(&telemetry).context("failed to initialize telemetry")?;

    info!("===========================================");
    info!("  Micromarket Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    info!(
        backend = %node_config.backend,
        data_dir = %node_config.data_dir.display(),
        queue_depth = node_config.queue_depth,
        matching = %node_config.ledger.matching,
        "starting"
    );

    let store = open_store(&node_config).context("failed to open ledger store")?;
    let handler = build_handler(&node_config, store).context("failed to build ledger engine")?;
    let (client, worker) = LedgerWorker::spawn(handler, node_config.queue_depth);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    info!("stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let response = handle_line(&client, &line).await;
                let mut out = response.to_line();
                out.push('\n');
                stdout.write_all(out.as_bytes()).await.context("failed to write response")?;
                stdout.flush().await.context("failed to flush stdout")?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C");
                break;
            }
        }
    }

    info!("initiating shutdown");
    drop(client);
    if let Err(e) = worker.await {
        warn!(error = %e, "ledger worker ended abnormally");
    }

    if telemetry.metrics_enabled {
        match encode_metrics() {
            Ok(text) => debug!(metrics = %text, "final metrics"),
            Err(e) => warn!(error = %e, "failed to encode metrics"),
        }
    }

    info!("shutdown complete");
    Ok(())
}
