//! In-memory index over a table of CIDR networks
//!
//! The table is a JSON array where each entry names a network and carries
//! its location fields inline:
//!
//! ```json
//! [
//!   { "network": "8.8.8.0/24", "country_code": "US", "city": "Mountain View" },
//!   { "network": "2001:db8::/32", "country_code": "DE" }
//! ]
//! ```

use anyhow::Context;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;
use tracing::info;

use super::trait_def::{GeolocationIndex, IndexError, IndexResult};
use crate::models::GeoLocation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeEntry {
    pub network: IpNet,
    #[serde(flatten)]
    pub location: GeoLocation,
}

/// Networks sharing one prefix length, keyed by their truncated network
#[derive(Debug, Clone)]
struct PrefixTable {
    prefix_len: u8,
    networks: HashMap<IpNet, GeoLocation>,
}

/// Longest-prefix-match index over IPv4 and IPv6 networks
///
/// A lookup probes one hash table per distinct prefix length, longest first,
/// so its cost does not grow with the number of networks.
#[derive(Debug, Clone)]
pub struct RangeIndex {
    // Sorted by descending prefix length.
    v4_tables: Vec<PrefixTable>,
    v6_tables: Vec<PrefixTable>,
    len: usize,
}

impl RangeIndex {
    pub fn new(entries: Vec<RangeEntry>) -> IndexResult<Self> {
        let len = entries.len();
        let mut v4: HashMap<u8, HashMap<IpNet, GeoLocation>> = HashMap::new();
        let mut v6: HashMap<u8, HashMap<IpNet, GeoLocation>> = HashMap::new();

        for entry in entries {
            let network = entry.network.trunc();
            if entry.location.is_empty() {
                return Err(IndexError::InvalidRanges(format!(
                    "network {} has no location fields",
                    network
                )));
            }

            let tables = match network {
                IpNet::V4(_) => &mut v4,
                IpNet::V6(_) => &mut v6,
            };
            let previous = tables
                .entry(network.prefix_len())
                .or_default()
                .insert(network, entry.location);
            if previous.is_some() {
                return Err(IndexError::InvalidRanges(format!(
                    "network {} is listed more than once",
                    network
                )));
            }
        }

        Ok(Self {
            v4_tables: Self::into_tables(v4),
            v6_tables: Self::into_tables(v6),
            len,
        })
    }

    fn into_tables(by_len: HashMap<u8, HashMap<IpNet, GeoLocation>>) -> Vec<PrefixTable> {
        let mut tables: Vec<PrefixTable> = by_len
            .into_iter()
            .map(|(prefix_len, networks)| PrefixTable {
                prefix_len,
                networks,
            })
            .collect();
        tables.sort_by(|a, b| b.prefix_len.cmp(&a.prefix_len));
        tables
    }

    pub fn from_json(json: &str) -> IndexResult<Self> {
        let entries: Vec<RangeEntry> =
            serde_json::from_str(json).map_err(|e| IndexError::InvalidRanges(e.to_string()))?;
        Self::new(entries)
    }

    pub fn from_file(path: impl AsRef<Path>) -> IndexResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ranges file at {}", path.display()))?;
        let index = Self::from_json(&json)?;
        info!(
            "Loaded {} networks from {}",
            index.len(),
            path.display()
        );
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl GeolocationIndex for RangeIndex {
    fn lookup(&self, ip: IpAddr) -> anyhow::Result<Option<GeoLocation>> {
        let tables = match ip {
            IpAddr::V4(_) => &self.v4_tables,
            IpAddr::V6(_) => &self.v6_tables,
        };

        Ok(tables.iter().find_map(|table| {
            let network = IpNet::new(ip, table.prefix_len).ok()?.trunc();
            table.networks.get(&network).cloned()
        }))
    }
}
