use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use super::address::{extract_token, parse_address};
use super::error::LookupError;
use super::response::LookupOutcome;
use crate::index::GeolocationIndex;

/// Paths requested by browsers and crawlers that never carry an address
pub const NOISE_PATHS: [&str; 3] = ["/", "/favicon.ico", "/robots.txt"];

pub fn is_known_noise(path: &str) -> bool {
    NOISE_PATHS.contains(&path)
}

/// Resolves request paths against a fixed geolocation index
#[derive(Clone)]
pub struct LookupService {
    index: Arc<dyn GeolocationIndex>,
}

impl LookupService {
    pub fn new(index: Arc<dyn GeolocationIndex>) -> Self {
        Self { index }
    }

    /// Extract, parse and look up the address a request path is about
    pub fn resolve(&self, path: &str) -> Result<LookupOutcome, LookupError> {
        let token = extract_token(path)?;
        let ip = parse_address(token)?;
        let record = self.index.lookup(ip).map_err(LookupError::Index)?;

        if record.is_none() {
            debug!(%ip, "no location record");
        }

        Ok(LookupOutcome::new(ip, record))
    }
}

/// Entry point for every request reaching the lookup router
pub async fn dispatch(
    State(service): State<Arc<LookupService>>,
    method: Method,
    uri: Uri,
) -> Result<Response, LookupError> {
    let path = uri.path();

    if is_known_noise(path) {
        debug!(path, "known noise path");
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    if method != Method::GET && method != Method::HEAD {
        return Ok((StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "GET,HEAD")]).into_response());
    }

    service.resolve(path)?.into_http()
}
