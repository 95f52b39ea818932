use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::any::Any;
use std::net::AddrParseError;
use thiserror::Error;
use tracing::warn;

/// Prefix of every 500 body
pub const FAILURE_PREFIX: &str = "We ran into an error: ";

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no address in request path '{path}'")]
    Extraction { path: String },

    #[error("'{token}' is not an IP string literal.")]
    Parse {
        token: String,
        #[source]
        source: AddrParseError,
    },

    #[error("{0:#}")]
    Index(anyhow::Error),

    #[error("{0}")]
    Unexpected(String),
}

/// Map a failure to the status and plain-text body sent to the client
pub fn translate_failure(error: &LookupError) -> (StatusCode, String) {
    let status = match error {
        LookupError::Extraction { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        LookupError::Parse { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        LookupError::Index(_) => StatusCode::INTERNAL_SERVER_ERROR,
        LookupError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, format!("{FAILURE_PREFIX}{error}"))
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        warn!(error = %self, "lookup request failed");

        let (status, body) = translate_failure(&self);
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

/// Render a handler panic through the same failure boundary
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    LookupError::Unexpected(message).into_response()
}
