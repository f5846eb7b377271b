//! # Micromarket Node
//!
//! Runtime around the ledger engine:
//!
//! - `config/` - `NodeConfig` from `MM_*` environment variables
//! - `storage/` - backend selection (memory, snapshot file, RocksDB)
//! - `worker/` - single-owner command queue in front of the engine
//! - `protocol/` - newline-delimited JSON requests and responses
//!
//! ## Startup Sequence
//!
//! 1. Load and validate configuration
//! 2. Initialize telemetry
//! 3. Open the configured store
//! 4. Start the ledger worker
//! 5. Serve requests until EOF or Ctrl+C

pub mod config;
pub mod protocol;
pub mod storage;
pub mod worker;

pub use config::{ConfigError, NodeConfig, StoreBackend};
pub use protocol::{Request, Response};
pub use storage::{open_store, DynStore};
pub use worker::{Command, LedgerClient, LedgerWorker, WorkerError};

use mm_ledger::adapters::StaticIdentityResolver;
use mm_ledger::dispatch::LedgerHandler;
use mm_ledger::domain::entities::Role;
use mm_ledger::domain::errors::LedgerError;
use mm_ledger::service::{LedgerDependencies, LedgerService};

/// Engine type run by the node.
pub type NodeLedger = LedgerService<DynStore>;

/// Wire the engine and dispatcher over an opened store.
pub fn build_handler(
    config: &NodeConfig,
    store: DynStore,
) -> Result<LedgerHandler<NodeLedger>, LedgerError> {
    let deps = LedgerDependencies::with_store(store, &config.ledger);
    let ledger = LedgerService::try_new(deps, config.ledger.clone())?;
    let identity = StaticIdentityResolver::with_default(Role::PrivateEntity);
    Ok(LedgerHandler::new(ledger, Box::new(identity)))
}

/// Run one request line through the worker.
pub async fn handle_line(client: &LedgerClient, line: &str) -> Response {
    let request = match Request::parse(line) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match client
        .call(request.kind, request.function, request.args)
        .await
    {
        Ok(bytes) => Response::from_result(Ok(bytes)),
        Err(WorkerError::Ledger(e)) => Response::from_result(Err(e)),
        Err(e @ WorkerError::Stopped) => Response::error(e.kind(), e.to_string()),
    }
}
