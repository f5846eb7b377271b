//! # Line Protocol
//!
//! One JSON request per input line, one JSON response per output line.
//!
//! ```text
//! -> {"kind":"invoke","function":"depositCash","args":["alice","1000"]}
//! <- {"ok":true,"payload":{"id":"alice","cash":"1000",...}}
//! -> {"kind":"invoke","function":"withdrawCash","args":["alice","1500"]}
//! <- {"ok":false,"error":{"kind":"InsufficientFunds","message":"..."}}
//! ```

use mm_ledger::dispatch::InvocationKind;
use mm_ledger::domain::errors::LedgerError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error kind reported for lines that are not valid requests.
pub const BAD_REQUEST: &str = "BadRequest";

/// Incoming request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub kind: InvocationKind,
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Request {
    pub fn parse(line: &str) -> Result<Self, Response> {
        serde_json::from_str(line)
            .map_err(|e| Response::error(BAD_REQUEST, format!("malformed request: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

/// Outgoing response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    pub fn success(payload: Value) -> Self {
        Self {
            ok: true,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            payload: None,
            error: Some(ErrorBody {
                kind: kind.into(),
                message: message.into(),
            }),
        }
    }

    /// Wrap a dispatcher result. Successful payloads are the JSON bytes the
    /// dispatcher produced.
    pub fn from_result(result: Result<Vec<u8>, LedgerError>) -> Self {
        match result {
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
                Ok(payload) => Self::success(payload),
                Err(e) => Self::error("SerializationError", e.to_string()),
            },
            Err(e) => Self::error(e.kind(), e.to_string()),
        }
    }

    /// Single-line JSON encoding.
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"ok":false,"error":{"kind":"SerializationError","message":"response encoding failed"}}"#
                .to_string()
        })
    }
}
