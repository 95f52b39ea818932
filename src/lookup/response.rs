use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::net::IpAddr;

use super::error::LookupError;
use crate::models::{GeoIpEntry, GeoLocation};

/// Result of resolving one address
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(GeoIpEntry),
    NotFound,
}

impl LookupOutcome {
    pub fn new(ip: IpAddr, record: Option<GeoLocation>) -> Self {
        match record {
            Some(location) => Self::Found(GeoIpEntry::new(ip, location)),
            None => Self::NotFound,
        }
    }

    /// Build the HTTP response: 200 with a JSON document, or an empty 404
    ///
    /// Serialization faults are returned as errors so they pass through the
    /// same failure boundary as every other error.
    pub fn into_http(self) -> Result<Response, LookupError> {
        match self {
            Self::Found(entry) => {
                let body = serde_json::to_vec(&entry).map_err(|e| {
                    LookupError::Unexpected(format!("failed to serialize {}: {}", entry.ip, e))
                })?;

                Ok((
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, "application/json")],
                    Body::from(body),
                )
                    .into_response())
            }
            Self::NotFound => Ok(StatusCode::NOT_FOUND.into_response()),
        }
    }
}
