mod client;
pub mod types;

pub use client::OpenWeatherClient;
pub use types::RawPayload;

use crate::error::Result;
use crate::location::Coordinates;

/// Source of raw forecast documents
pub trait ForecastSource {
    /// Fetch the forecast for `coordinates` with a single request
    fn fetch(&self, coordinates: &Coordinates) -> Result<RawPayload>;
}
