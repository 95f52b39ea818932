//! Data models for geolocation lookups

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Geographic location information resolved for an IP address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// ISO country code (e.g., "US", "GB")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    /// Country name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,

    /// Region/state/province
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// City name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// IANA time zone (e.g., "Europe/Berlin")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,

    /// Autonomous System Number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<u32>,

    /// ASN organization name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn_org: Option<String>,
}

impl GeoLocation {
    /// True when no field carries any information
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Response document pairing the queried address with its location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoIpEntry {
    /// Serialized in canonical textual form
    pub ip: IpAddr,

    #[serde(flatten)]
    pub location: GeoLocation,
}

impl GeoIpEntry {
    pub fn new(ip: IpAddr, location: GeoLocation) -> Self {
        Self { ip, location }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_default_location_is_empty() {
        assert!(GeoLocation::default().is_empty());

        let location = GeoLocation {
            country_code: Some("US".to_string()),
            ..Default::default()
        };
        assert!(!location.is_empty());
    }

    #[test]
    fn test_entry_flattens_location_fields() {
        let entry = GeoIpEntry::new(
            "8.8.8.8".parse().unwrap(),
            GeoLocation {
                country_code: Some("US".to_string()),
                latitude: Some(37.751),
                longitude: Some(-97.822),
                ..Default::default()
            },
        );

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({
                "ip": "8.8.8.8",
                "country_code": "US",
                "latitude": 37.751,
                "longitude": -97.822,
            })
        );
    }

    #[test]
    fn test_ipv6_entry_uses_compressed_form() {
        let entry = GeoIpEntry::new(
            "2001:0db8:0000:0000:0000:0000:0000:0001".parse().unwrap(),
            GeoLocation::default(),
        );

        let value: Value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["ip"], "2001:db8::1");
    }
}
