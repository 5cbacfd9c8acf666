use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::types::RawPayload;
use super::ForecastSource;
use crate::config::{Config, ProviderConfig};
use crate::error::{Result, WeatherError};
use crate::location::Coordinates;

const USER_AGENT: &str = concat!("weatherbar/", env!("CARGO_PKG_VERSION"));

/// OpenWeather One Call client
///
/// Issues exactly one request per [`fetch`](OpenWeatherClient::fetch) and never
/// retries on its own.
pub struct OpenWeatherClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    units: String,
    exclude: String,
}

impl OpenWeatherClient {
    /// Create a client from configuration and an already-resolved API key
    pub fn new(config: &Config, api_key: Option<&str>) -> Result<Self> {
        Self::with_settings(
            &config.provider,
            api_key.map(str::to_string),
            config.network.timeout(),
        )
    }

    /// Create a client with explicit provider settings
    pub fn with_settings(
        provider: &ProviderConfig,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(&provider.base_url).map_err(|e| {
            WeatherError::Config(format!("Invalid provider.base_url '{}': {}", provider.base_url, e))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            units: provider.units.clone(),
            exclude: provider.exclude.clone(),
        })
    }

    /// Full request URL for `coordinates`
    fn request_url(&self, coordinates: &Coordinates, api_key: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("lat", &coordinates.latitude.to_string())
            .append_pair("lon", &coordinates.longitude.to_string())
            .append_pair("exclude", &self.exclude)
            .append_pair("units", &self.units)
            .append_pair("appid", api_key);
        url
    }

    /// Fetch the raw forecast document for `coordinates`
    pub fn fetch(&self, coordinates: &Coordinates) -> Result<RawPayload> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            WeatherError::RemoteAuthFailed(
                "No API key configured. Set OPENWEATHER or run 'weatherbar config init'.".to_string(),
            )
        })?;

        info!(
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "Requesting forecast"
        );

        let response = self
            .client
            .get(self.request_url(coordinates, api_key))
            .send()
            .map_err(describe_transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let message = response.text().unwrap_or_default();
            return Err(WeatherError::RemoteAuthFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate_body(&message)
            )));
        }
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(WeatherError::fetch(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate_body(&message)
            )));
        }

        let body = response.text().map_err(describe_transport_error)?;
        if body.trim().is_empty() {
            return Err(WeatherError::fetch("empty response body"));
        }
        debug!(bytes = body.len(), "Forecast received");

        let payload = RawPayload::from_json(body)
            .map_err(|e| WeatherError::fetch(format!("response is not JSON: {e}")))?;
        payload
            .parse()
            .map_err(|e| WeatherError::fetch(format!("response is not a forecast: {e}")))?;
        Ok(payload)
    }
}

impl ForecastSource for OpenWeatherClient {
    fn fetch(&self, coordinates: &Coordinates) -> Result<RawPayload> {
        OpenWeatherClient::fetch(self, coordinates)
    }
}

/// Transport error without the request URL, which carries the API key
fn describe_transport_error(err: reqwest::Error) -> WeatherError {
    if err.is_timeout() {
        WeatherError::fetch("request timed out")
    } else {
        WeatherError::fetch(err.without_url().to_string())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
