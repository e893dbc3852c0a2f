//! Error types for Stratus.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{model}: field `{native}` supplied as both `{native}` and `{wire}`")]
    DuplicateField {
        model: &'static str,
        native: &'static str,
        wire: &'static str,
    },

    #[error("{model}: missing required field `{field}`")]
    MissingField {
        model: &'static str,
        field: &'static str,
    },

    #[error("{model}: field `{field}` must be {expected}")]
    InvalidField {
        model: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    #[error("{model}: expected a JSON object")]
    NotAnObject { model: &'static str },

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("service error {status} ({code}): {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
        opc_request_id: Option<String>,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("missing response header: {0}")]
    MissingHeader(&'static str),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(
        "timed out after {attempts} attempts ({elapsed:?}) waiting for {target}, last state: {}",
        last_state.as_deref().unwrap_or("none")
    )]
    WaitTimeout {
        target: String,
        attempts: u32,
        elapsed: Duration,
        last_state: Option<String>,
    },
}

impl Error {
    /// True when the service reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Service { status: 404, .. } | Error::NotFound(_)
        )
    }

    /// The `opc-request-id` of a failed service call, if any.
    pub fn opc_request_id(&self) -> Option<&str> {
        match self {
            Error::Service { opc_request_id, .. } => opc_request_id.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
