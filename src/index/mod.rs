//! Geolocation indexes consumed by the lookup service
//!
//! The lookup pipeline only depends on [`GeolocationIndex`]; the concrete
//! backends here are selected at startup from [`crate::config::IndexConfig`].

pub mod maxmind;
pub mod ranges;
pub mod trait_def;

pub use maxmind::MaxMindIndex;
pub use ranges::{RangeEntry, RangeIndex};
pub use trait_def::{GeolocationIndex, IndexError, IndexResult};

use anyhow::{bail, Result};
use std::sync::Arc;

use crate::config::{IndexBackend, IndexConfig};

/// Open the index described by the configuration
pub fn open_index(config: &IndexConfig) -> Result<Arc<dyn GeolocationIndex>> {
    match config.backend {
        IndexBackend::MaxMind => {
            if config.city_db_path.is_none() && config.asn_db_path.is_none() {
                bail!("GEOIP_CITY_DB_PATH or GEOIP_ASN_DB_PATH must be set when GEOIP_INDEX_BACKEND=maxmind");
            }
            let index = MaxMindIndex::new(
                config.city_db_path.as_deref(),
                config.asn_db_path.as_deref(),
            )?;
            Ok(Arc::new(index))
        }
        IndexBackend::Ranges => {
            let Some(path) = config.ranges_path.as_deref() else {
                bail!("GEOIP_RANGES_PATH must be set when GEOIP_INDEX_BACKEND=ranges");
            };
            Ok(Arc::new(RangeIndex::from_file(path)?))
        }
    }
}
