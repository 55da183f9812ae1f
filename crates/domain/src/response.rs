//! Response type
//!
//! The captured result of an HTTP call under test: a status code and a
//! JSON-like body.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::PropertyPath;

/// HTTP response under test.
///
/// Immutable once built. The body is any JSON value; non-JSON payloads are
/// kept as a JSON string (see [`Response::from_bytes`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    status: u16,
    #[serde(default)]
    body: Value,
}

impl Response {
    /// Creates a response from a status code and an already-parsed body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Value>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Creates a response from raw body bytes.
    ///
    /// An empty body becomes `null`, valid JSON is parsed, anything else is
    /// kept as a (lossily decoded) string.
    #[must_use]
    pub fn from_bytes(status: u16, bytes: &[u8]) -> Self {
        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
        };
        Self { status, body }
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns the body.
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Returns the body value at `path`, or `None` when it is absent.
    #[must_use]
    pub fn get(&self, path: &PropertyPath) -> Option<&Value> {
        path.resolve(&self.body)
    }

    /// Pretty-printed body for logs.
    ///
    /// Falls back to the compact form if pretty printing fails.
    #[must_use]
    pub fn pretty_body(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.body.to_string())
    }
}
