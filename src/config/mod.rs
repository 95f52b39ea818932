use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub index: IndexConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexBackend {
    MaxMind,
    Ranges,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    pub backend: IndexBackend,
    /// Path to a GeoLite2-City/GeoIP2-City .mmdb file
    #[serde(default)]
    pub city_db_path: Option<String>,
    /// Path to a GeoLite2-ASN .mmdb file
    #[serde(default)]
    pub asn_db_path: Option<String>,
    /// Path to a JSON ranges file (see [`crate::index::RangeIndex`])
    #[serde(default)]
    pub ranges_path: Option<String>,
}

impl IndexBackend {
    fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "maxmind" | "mmdb" => IndexBackend::MaxMind,
            "ranges" => IndexBackend::Ranges,
            other => {
                tracing::warn!(
                    "Unknown GEOIP_INDEX_BACKEND '{other}', falling back to 'maxmind'. Supported values: maxmind, ranges"
                );
                IndexBackend::MaxMind
            }
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("GEOIP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match var("GEOIP_PORT") {
            Some(port) => port
                .parse::<u16>()
                .with_context(|| format!("GEOIP_PORT must be a port number, got '{port}'"))?,
            None => 8080,
        };

        let backend = var("GEOIP_INDEX_BACKEND")
            .map(|name| IndexBackend::from_name(&name))
            .unwrap_or(IndexBackend::MaxMind);

        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            server: ServerConfig { host, port },
            index: IndexConfig {
                backend,
                city_db_path: non_empty("GEOIP_CITY_DB_PATH"),
                asn_db_path: non_empty("GEOIP_ASN_DB_PATH"),
                ranges_path: non_empty("GEOIP_RANGES_PATH"),
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
