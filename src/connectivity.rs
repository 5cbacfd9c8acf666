//! Outbound reachability check with fixed backoff

use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::NetworkConfig;
use crate::error::{Result, WeatherError};

/// Single reachability probe
pub trait Probe {
    fn probe(&self) -> bool;
}

/// Probe that succeeds when the endpoint answers with any HTTP response
pub struct HttpProbe {
    client: Client,
    url: String,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl Probe for HttpProbe {
    fn probe(&self) -> bool {
        match self.client.get(&self.url).send() {
            Ok(response) => {
                debug!(url = %self.url, status = %response.status(), "Probe answered");
                true
            }
            Err(e) => {
                debug!(url = %self.url, error = %e, "Probe failed");
                false
            }
        }
    }
}

/// Verifies reachability before any location lookup or fetch
pub struct ConnectivityGate {
    probe: Box<dyn Probe>,
    max_attempts: u32,
    backoff: Duration,
    sleep: Box<dyn Fn(Duration)>,
}

impl ConnectivityGate {
    /// Gate trying `probe` up to `max_attempts` times (at least once),
    /// waiting `backoff` between failures
    pub fn new(probe: Box<dyn Probe>, max_attempts: u32, backoff: Duration) -> Self {
        Self {
            probe,
            max_attempts: max_attempts.max(1),
            backoff,
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Gate probing the configured endpoint over HTTP
    pub fn from_config(network: &NetworkConfig) -> Result<Self> {
        let probe = HttpProbe::new(network.probe_url.clone(), network.timeout())?;
        Ok(Self::new(
            Box::new(probe),
            network.max_attempts,
            network.backoff(),
        ))
    }

    /// Replace the function used to wait between attempts
    pub fn with_sleeper(mut self, sleep: impl Fn(Duration) + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    /// Ok once a probe succeeds; `Unreachable` after `max_attempts` consecutive failures
    pub fn check_reachable(&self) -> Result<()> {
        for attempt in 1..=self.max_attempts {
            if self.probe.probe() {
                debug!(attempt, "Network reachable");
                return Ok(());
            }

            info!(attempt, max_attempts = self.max_attempts, "Connectivity probe failed");
            if attempt < self.max_attempts {
                (self.sleep)(self.backoff);
            }
        }

        Err(WeatherError::Unreachable {
            attempts: self.max_attempts,
        })
    }
}
