//! Structured logging helpers.
//!
//! Every event carries a fixed `component` field so JSON logs can be
//! filtered per crate.

/// Emit a tracing event with a `component` field.
///
/// ```rust,ignore
/// log_ledger_event!(info, "worker", "command handled", operation = %op);
/// ```
#[macro_export]
macro_rules! log_ledger_event {
    ($level:ident, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macro_expands_for_each_level() {
        let operation = "getAccount";
        log_ledger_event!(info, "worker", "handled", operation = %operation);
        log_ledger_event!(warn, "worker", "rejected", kind = "NotFound");
        log_ledger_event!(debug, "worker", "no fields");
        log_ledger_event!(error, "node", "failed", code = 1);
    }
}
