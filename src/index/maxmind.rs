//! GeoIP index backed by MaxMind GeoLite2/GeoIP2 MMDB files
//!
//! Databases are memory-mapped once at startup and shared read-only between
//! all requests.

use anyhow::{Context, Result};
use maxminddb::{geoip2, Mmap, Reader};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::trace;

use super::trait_def::GeolocationIndex;
use crate::models::GeoLocation;

/// Index over a City database, an ASN database, or both
#[derive(Clone)]
pub struct MaxMindIndex {
    city_reader: Option<Arc<Reader<Mmap>>>,
    asn_reader: Option<Arc<Reader<Mmap>>>,
}

impl MaxMindIndex {
    /// Open the index from MMDB file paths
    ///
    /// # Arguments
    /// * `city_path` - Optional path to a GeoLite2-City or GeoIP2-City .mmdb file
    /// * `asn_path` - Optional path to a GeoLite2-ASN .mmdb file
    pub fn new(city_path: Option<&str>, asn_path: Option<&str>) -> Result<Self> {
        let city_reader = city_path
            .map(|path| {
                unsafe { Reader::open_mmap(path) }
                    .with_context(|| format!("Failed to open GeoIP City database at {}", path))
            })
            .transpose()?
            .map(Arc::new);

        let asn_reader = asn_path
            .map(|path| {
                unsafe { Reader::open_mmap(path) }
                    .with_context(|| format!("Failed to open GeoIP ASN database at {}", path))
            })
            .transpose()?
            .map(Arc::new);

        Ok(Self {
            city_reader,
            asn_reader,
        })
    }

    fn lookup_city(&self, ip: IpAddr, location: &mut GeoLocation) -> Result<()> {
        let Some(reader) = self.city_reader.as_ref() else {
            return Ok(());
        };
        if !covers_address(reader.metadata.ip_version, ip) {
            trace!(%ip, "city database is IPv4-only, skipping");
            return Ok(());
        }

        let result = reader
            .lookup(ip)
            .with_context(|| format!("City lookup failed for {}", ip))?;

        // The City database is a superset of Country, so fall back to the
        // country fields when the City record cannot be decoded.
        match result.decode::<geoip2::City>() {
            Ok(Some(city)) => Self::extract_from_city(&city, location),
            Ok(None) => {}
            Err(_) => {
                if let Some(country) = result
                    .decode::<geoip2::Country>()
                    .with_context(|| format!("Failed to decode country record for {}", ip))?
                {
                    Self::extract_from_country(&country, location);
                }
            }
        }

        Ok(())
    }

    fn lookup_asn(&self, ip: IpAddr, location: &mut GeoLocation) -> Result<()> {
        let Some(reader) = self.asn_reader.as_ref() else {
            return Ok(());
        };
        if !covers_address(reader.metadata.ip_version, ip) {
            trace!(%ip, "asn database is IPv4-only, skipping");
            return Ok(());
        }

        let result = reader
            .lookup(ip)
            .with_context(|| format!("ASN lookup failed for {}", ip))?;

        if let Some(asn) = result
            .decode::<geoip2::Asn>()
            .with_context(|| format!("Failed to decode ASN record for {}", ip))?
        {
            location.asn = asn.autonomous_system_number;
            location.asn_org = asn.autonomous_system_organization.map(|s| s.to_string());
        }

        Ok(())
    }

    fn extract_from_city(city: &geoip2::City, location: &mut GeoLocation) {
        location.country_code = city.country.iso_code.map(|s| s.to_string());
        location.country_name = city.country.names.english.map(|s| s.to_string());

        if let Some(subdivision) = city.subdivisions.first() {
            location.region = subdivision.names.english.map(|s| s.to_string());
        }

        location.city = city.city.names.english.map(|s| s.to_string());
        location.postal_code = city.postal.code.map(|s| s.to_string());
        location.latitude = city.location.latitude;
        location.longitude = city.location.longitude;
        location.time_zone = city.location.time_zone.map(|s| s.to_string());
    }

    fn extract_from_country(country: &geoip2::Country, location: &mut GeoLocation) {
        location.country_code = country.country.iso_code.map(|s| s.to_string());
        location.country_name = country.country.names.english.map(|s| s.to_string());
    }
}

/// Whether a database built for `ip_version` can hold a record for `ip`
///
/// IPv4-only databases reject IPv6 queries outright; such an address simply
/// has no record there.
fn covers_address(ip_version: u16, ip: IpAddr) -> bool {
    ip.is_ipv4() || ip_version == 6
}

impl GeolocationIndex for MaxMindIndex {
    fn lookup(&self, ip: IpAddr) -> Result<Option<GeoLocation>> {
        let mut location = GeoLocation::default();

        self.lookup_city(ip, &mut location)?;
        self.lookup_asn(ip, &mut location)?;

        trace!(%ip, country = ?location.country_code, asn = ?location.asn, "maxmind lookup");

        if location.is_empty() {
            Ok(None)
        } else {
            Ok(Some(location))
        }
    }
}
