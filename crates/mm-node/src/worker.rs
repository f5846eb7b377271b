//! # Ledger Worker
//!
//! The engine has no locking of its own, so every invocation goes through
//! one worker that owns it. Callers hold a cloneable [`LedgerClient`] and
//! push [`Command`]s into a bounded queue; the worker runs them one at a
//! time on a blocking thread and answers over a oneshot channel.
//!
//! The worker stops once every client has been dropped and the queue is
//! drained.

use mm_ledger::dispatch::{InvocationKind, LedgerHandler, Operation};
use mm_ledger::domain::errors::LedgerError;
use mm_ledger::ports::inbound::LedgerApi;
use mm_telemetry::{log_ledger_event, record_operation, OperationTimer, PROPERTIES_ISSUED, QUEUE_DEPTH};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

const COMPONENT: &str = "worker";

/// Metrics label for names the dispatcher does not know.
const UNKNOWN_OPERATION: &str = "unknown";

/// One queued invocation.
#[derive(Debug)]
pub struct Command {
    pub kind: InvocationKind,
    pub function: String,
    pub args: Vec<String>,
    pub reply: oneshot::Sender<Result<Vec<u8>, LedgerError>>,
}

#[derive(Debug, Error, PartialEq)]
pub enum WorkerError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("ledger worker has stopped")]
    Stopped,
}

impl WorkerError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            WorkerError::Ledger(e) => e.kind(),
            WorkerError::Stopped => "Unavailable",
        }
    }
}

/// Handle for submitting commands to a running worker.
#[derive(Debug, Clone)]
pub struct LedgerClient {
    tx: mpsc::Sender<Command>,
}

impl LedgerClient {
    /// Queue an invocation and wait for its result.
    pub async fn call(
        &self,
        kind: InvocationKind,
        function: impl Into<String>,
        args: Vec<String>,
    ) -> Result<Vec<u8>, WorkerError> {
        let (reply, response) = oneshot::channel();
        let command = Command {
            kind,
            function: function.into(),
            args,
            reply,
        };

        // The gauge only moves once a slot is held; a caller dropped while
        // waiting for capacity leaves it untouched.
        let permit = self.tx.reserve().await.map_err(|_| WorkerError::Stopped)?;
        QUEUE_DEPTH.inc();
        permit.send(command);

        Ok(response.await.map_err(|_| WorkerError::Stopped)??)
    }

    pub async fn invoke(&self, function: &str, args: Vec<String>) -> Result<Vec<u8>, WorkerError> {
        self.call(InvocationKind::Invoke, function, args).await
    }

    pub async fn query(&self, function: &str, args: Vec<String>) -> Result<Vec<u8>, WorkerError> {
        self.call(InvocationKind::Query, function, args).await
    }
}

/// Owner of the ledger engine.
pub struct LedgerWorker<L: LedgerApi> {
    handler: LedgerHandler<L>,
    rx: mpsc::Receiver<Command>,
}

impl<L> LedgerWorker<L>
where
    L: LedgerApi + Send + 'static,
{
    /// Start a worker with a queue of `queue_depth` commands.
    ///
    /// # Panics
    ///
    /// Panics if `queue_depth` is zero.
    pub fn spawn(handler: LedgerHandler<L>, queue_depth: usize) -> (LedgerClient, JoinHandle<L>) {
        let (tx, rx) = mpsc::channel(queue_depth);
        let worker = Self { handler, rx };
        let handle = tokio::task::spawn_blocking(move || worker.run());
        (LedgerClient { tx }, handle)
    }

    /// Drain the queue until every client is gone, then hand back the engine.
    fn run(mut self) -> L {
        log_ledger_event!(info, COMPONENT, "ledger worker started");

        while let Some(command) = self.rx.blocking_recv() {
            QUEUE_DEPTH.dec();
            let result = self.execute(command.kind, &command.function, &command.args);
            if command.reply.send(result).is_err() {
                debug!(function = %command.function, "caller went away before the reply");
            }
        }

        log_ledger_event!(info, COMPONENT, "ledger worker stopped");
        self.handler.into_ledger()
    }

    fn execute(
        &mut self,
        kind: InvocationKind,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, LedgerError> {
        let operation = Operation::parse(kind, function).ok();
        let label = operation.map_or(UNKNOWN_OPERATION, |op| op.name());
        let _timer = OperationTimer::start(label);

        let result = self.handler.handle(kind, function, args);

        match &result {
            Ok(_) => {
                record_operation(label, "ok");
                if operation == Some(Operation::IssueProperty) {
                    PROPERTIES_ISSUED.inc();
                }
                log_ledger_event!(debug, COMPONENT, "command handled", operation = label, %kind);
            }
            Err(e) => {
                record_operation(label, e.kind());
                log_ledger_event!(
                    warn,
                    COMPONENT,
                    "command rejected",
                    operation = label,
                    %kind,
                    error_kind = e.kind(),
                    error = %e
                );
            }
        }
        result
    }
}
