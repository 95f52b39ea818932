pub mod location;

pub use location::{GeoIpEntry, GeoLocation};
