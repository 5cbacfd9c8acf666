//! Location resolution from the caller's public network address

mod sources;

pub use sources::{parse_address, CommandAddressSource, GeoIpCommand};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, WeatherError};

/// Marker of the city record in `geoiplookup` output
const CITY_RECORD: &str = "GeoIP City Edition";

/// Field positions inside the city record:
/// country, region, region name, city, postal code, latitude, longitude, metro, area
const LATITUDE_FIELD: usize = 5;
const LONGITUDE_FIELD: usize = 6;

/// Latitude/longitude in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Probe returning the caller's public address
pub trait AddressSource {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Public address, or `None` when this source has nothing usable
    fn public_address(&self) -> Option<String>;
}

/// Address-to-location lookup returning a textual record
pub trait GeoLookup {
    fn lookup(&self, address: &str) -> Result<String>;
}

/// Resolves the caller's coordinates on every call; nothing is cached
pub struct LocationResolver {
    primary: Box<dyn AddressSource>,
    secondary: Box<dyn AddressSource>,
    geo: Box<dyn GeoLookup>,
}

impl LocationResolver {
    pub fn new(
        primary: Box<dyn AddressSource>,
        secondary: Box<dyn AddressSource>,
        geo: Box<dyn GeoLookup>,
    ) -> Self {
        Self {
            primary,
            secondary,
            geo,
        }
    }

    /// `dig` against OpenDNS, then Google, then `geoiplookup`
    pub fn system() -> Self {
        Self::new(
            Box::new(CommandAddressSource::opendns()),
            Box::new(CommandAddressSource::google_txt()),
            Box::new(GeoIpCommand::default()),
        )
    }

    /// Public address from the primary source, falling back to the secondary
    pub fn public_address(&self) -> Result<String> {
        for source in [&self.primary, &self.secondary] {
            match source.public_address() {
                Some(address) => {
                    info!(source = source.name(), %address, "Resolved public address");
                    return Ok(address);
                }
                None => debug!(source = source.name(), "Address source returned nothing"),
            }
        }
        Err(WeatherError::location(format!(
            "no public address from {} or {}",
            self.primary.name(),
            self.secondary.name()
        )))
    }

    /// Current coordinates of the caller
    pub fn resolve(&self) -> Result<Coordinates> {
        let address = self.public_address()?;
        let record = self.geo.lookup(&address)?;
        debug!(record = record.trim(), "Geo lookup record");

        let coordinates = parse_geoip_record(&record)?;
        info!(
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "Resolved location"
        );
        Ok(coordinates)
    }
}

/// Extract coordinates from `geoiplookup` output by field position
///
/// ```text
/// GeoIP Country Edition: US, United States
/// GeoIP City Edition, Rev 1: US, CA, California, Mountain View, 94043, 37.419201, -122.057404, 807, 650
/// ```
pub fn parse_geoip_record(output: &str) -> Result<Coordinates> {
    let line = output
        .lines()
        .find(|l| l.trim_start().starts_with(CITY_RECORD))
        .ok_or_else(|| WeatherError::location("geo lookup returned no city record"))?;

    let (_, record) = line
        .split_once(": ")
        .ok_or_else(|| WeatherError::location(format!("unexpected city record: {}", line.trim())))?;

    let fields: Vec<&str> = record.split(',').map(str::trim).collect();
    let latitude = parse_degrees(&fields, LATITUDE_FIELD, "latitude", 90.0)?;
    let longitude = parse_degrees(&fields, LONGITUDE_FIELD, "longitude", 180.0)?;

    Ok(Coordinates {
        latitude,
        longitude,
    })
}

fn parse_degrees(fields: &[&str], index: usize, name: &str, limit: f64) -> Result<f64> {
    let raw = fields
        .get(index)
        .ok_or_else(|| WeatherError::location(format!("city record has no {name} field")))?;

    let value: f64 = raw
        .parse()
        .map_err(|_| WeatherError::location(format!("{name} is not a number: '{raw}'")))?;

    if !value.is_finite() || value.abs() > limit {
        return Err(WeatherError::location(format!("{name} out of range: {value}")));
    }
    Ok(value)
}
