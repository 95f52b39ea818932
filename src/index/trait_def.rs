use anyhow::Result;
use std::net::IpAddr;
use thiserror::Error;

use crate::models::GeoLocation;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("invalid ranges file: {0}")]
    InvalidRanges(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type IndexResult<T> = std::result::Result<T, IndexError>;

/// Read-only geolocation index shared by every request.
///
/// Implementations must tolerate unsynchronized concurrent calls.
pub trait GeolocationIndex: Send + Sync {
    /// Resolve an address to its location record.
    ///
    /// `Ok(None)` means the index holds no record for the address. An `Err`
    /// is reserved for faults of the index itself (corrupt data, decode
    /// failures).
    fn lookup(&self, ip: IpAddr) -> Result<Option<GeoLocation>>;
}
