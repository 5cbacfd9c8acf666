//! Forecast acquisition: connectivity, cache, location, fetch

use serde::Serialize;
use tracing::{info, warn};

use crate::cache::{CacheRecord, CacheStore, FreshnessPolicy};
use crate::config::{Config, Paths};
use crate::connectivity::ConnectivityGate;
use crate::error::Result;
use crate::location::LocationResolver;
use crate::openweather::{ForecastSource, OpenWeatherClient, RawPayload};

/// Where an acquired payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Cache,
    Remote,
}

/// Result of one acquisition
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub payload: RawPayload,
    pub origin: Origin,
    /// Cache file metadata after the acquisition
    pub record: CacheRecord,
}

/// Composes the pipeline into a single call
pub struct Acquirer {
    gate: ConnectivityGate,
    store: CacheStore,
    policy: FreshnessPolicy,
    resolver: LocationResolver,
    source: Box<dyn ForecastSource>,
}

impl Acquirer {
    pub fn new(
        gate: ConnectivityGate,
        store: CacheStore,
        policy: FreshnessPolicy,
        resolver: LocationResolver,
        source: Box<dyn ForecastSource>,
    ) -> Self {
        Self {
            gate,
            store,
            policy,
            resolver,
            source,
        }
    }

    /// Pipeline wired to the system collaborators
    pub fn from_config(
        config: &Config,
        paths: &Paths,
        api_key: Option<&str>,
        force_poll: bool,
    ) -> Result<Self> {
        Ok(Self::new(
            ConnectivityGate::from_config(&config.network)?,
            CacheStore::new(config.cache.dir_or(paths), config.cache.filename.clone()),
            FreshnessPolicy::new(config.cache.ttl(), force_poll),
            LocationResolver::system(),
            Box::new(OpenWeatherClient::new(config, api_key)?),
        ))
    }

    /// Acquire a forecast payload
    ///
    /// Unreachable networks end the acquisition before the cache is touched.
    /// A fresh cache is served as is; a cache that cannot be read is treated as
    /// stale. Otherwise the location is resolved, the provider polled once and
    /// the result committed. Fetch failures are returned, never papered over
    /// with older cached data.
    pub fn acquire(&self) -> Result<Acquisition> {
        self.gate.check_reachable()?;

        let record = self.store.open()?;
        if self.policy.is_fresh(&record) {
            match self.store.read(&record) {
                Ok(payload) => {
                    info!(path = %record.path.display(), "Serving cached forecast");
                    return Ok(Acquisition {
                        payload,
                        origin: Origin::Cache,
                        record,
                    });
                }
                Err(e) => warn!(error = %e, "Cached forecast unreadable, polling provider"),
            }
        } else {
            info!(
                force_poll = self.policy.force_poll,
                created = record.created,
                size = record.size,
                "Cache stale, polling provider"
            );
        }

        let coordinates = self.resolver.resolve()?;
        let payload = self.source.fetch(&coordinates)?;
        let record = self.store.commit(&record, &payload)?;

        Ok(Acquisition {
            payload,
            origin: Origin::Remote,
            record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::Probe;
    use crate::error::WeatherError;
    use crate::forecast::ForecastSnapshot;
    use crate::location::{AddressSource, Coordinates, GeoLookup};
    use crate::test_support::{one_call_json, sample_payload};
    use std::cell::Cell;
    use std::fs;
    use std::rc::Rc;
    use std::time::Duration;
    use tempfile::TempDir;

    const RECORD: &str = "GeoIP City Edition, Rev 1: DE, 16, Berlin, Berlin, 10117, 52.5200, 13.4050, 0, 0";

    /// Call counters shared with the stub collaborators
    #[derive(Default, Clone)]
    struct Calls {
        probes: Rc<Cell<u32>>,
        addresses: Rc<Cell<u32>>,
        fetches: Rc<Cell<u32>>,
    }

    struct StubProbe {
        up: bool,
        calls: Rc<Cell<u32>>,
    }

    impl Probe for StubProbe {
        fn probe(&self) -> bool {
            self.calls.set(self.calls.get() + 1);
            self.up
        }
    }

    struct StubAddress {
        address: Option<&'static str>,
        calls: Rc<Cell<u32>>,
    }

    impl AddressSource for StubAddress {
        fn name(&self) -> &str {
            "stub"
        }

        fn public_address(&self) -> Option<String> {
            self.calls.set(self.calls.get() + 1);
            self.address.map(str::to_string)
        }
    }

    struct StubGeo;

    impl GeoLookup for StubGeo {
        fn lookup(&self, _address: &str) -> Result<String> {
            Ok(RECORD.to_string())
        }
    }

    struct StubSource {
        response: std::result::Result<String, &'static str>,
        calls: Rc<Cell<u32>>,
    }

    impl ForecastSource for StubSource {
        fn fetch(&self, coordinates: &Coordinates) -> Result<RawPayload> {
            assert_eq!(coordinates.latitude, 52.52);
            self.calls.set(self.calls.get() + 1);
            match &self.response {
                Ok(body) => Ok(RawPayload::from_json(body.clone()).unwrap()),
                Err(message) => Err(WeatherError::fetch(*message)),
            }
        }
    }

    struct Harness {
        temp_dir: TempDir,
        calls: Calls,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                temp_dir: TempDir::new().unwrap(),
                calls: Calls::default(),
            }
        }

        fn store(&self) -> CacheStore {
            CacheStore::new(self.temp_dir.path().join("weather"), "weather.json")
        }

        fn acquirer(
            &self,
            network_up: bool,
            ttl: Duration,
            force_poll: bool,
            address: Option<&'static str>,
            response: std::result::Result<String, &'static str>,
        ) -> Acquirer {
            let gate = ConnectivityGate::new(
                Box::new(StubProbe {
                    up: network_up,
                    calls: self.calls.probes.clone(),
                }),
                3,
                Duration::ZERO,
            );
            let resolver = LocationResolver::new(
                Box::new(StubAddress {
                    address,
                    calls: self.calls.addresses.clone(),
                }),
                Box::new(StubAddress {
                    address: None,
                    calls: self.calls.addresses.clone(),
                }),
                Box::new(StubGeo),
            );
            let source = StubSource {
                response,
                calls: self.calls.fetches.clone(),
            };
            Acquirer::new(
                gate,
                self.store(),
                FreshnessPolicy::new(ttl, force_poll),
                resolver,
                Box::new(source),
            )
        }

        fn default_acquirer(&self, ttl: Duration, force_poll: bool) -> Acquirer {
            self.acquirer(true, ttl, force_poll, Some("203.0.113.7"), Ok(one_call_json(30, 5)))
        }

        /// Commit `payload` directly, bypassing the pipeline
        fn seed(&self, payload: &RawPayload) {
            let store = self.store();
            let record = store.open().unwrap();
            store.commit(&record, payload).unwrap();
        }
    }

    const TTL: Duration = Duration::from_secs(1800);

    #[test]
    fn test_first_run_fetches_and_commits() {
        let h = Harness::new();

        let acquisition = h.default_acquirer(TTL, false).acquire().unwrap();

        assert_eq!(acquisition.origin, Origin::Remote);
        assert_eq!(h.calls.fetches.get(), 1);
        assert_eq!(acquisition.payload.as_str(), one_call_json(30, 5));
        assert_eq!(fs::read_to_string(h.store().path()).unwrap(), acquisition.payload.as_str());
        assert!(FreshnessPolicy::new(TTL, false).is_fresh(&acquisition.record));
    }

    #[test]
    fn test_fresh_cache_is_served_without_fetch() {
        let h = Harness::new();
        let cached = sample_payload();
        h.seed(&cached);

        let acquisition = h.default_acquirer(TTL, false).acquire().unwrap();

        assert_eq!(acquisition.origin, Origin::Cache);
        assert_eq!(acquisition.payload, cached);
        assert_eq!(h.calls.fetches.get(), 0);
        assert_eq!(h.calls.addresses.get(), 0, "location must not be resolved");
    }

    #[test]
    fn test_force_poll_fetches_exactly_once() {
        let h = Harness::new();
        h.seed(&sample_payload());

        let acquisition = h.default_acquirer(TTL, true).acquire().unwrap();

        assert_eq!(acquisition.origin, Origin::Remote);
        assert_eq!(h.calls.fetches.get(), 1);
    }

    #[test]
    fn test_stale_cache_is_refreshed() {
        let h = Harness::new();
        let old = RawPayload::from_json(one_call_json(48, 10)).unwrap();
        h.seed(&old);
        std::thread::sleep(Duration::from_millis(20));

        // zero TTL: anything written before now is stale
        let acquisition = h.default_acquirer(Duration::ZERO, false).acquire().unwrap();

        assert_eq!(acquisition.origin, Origin::Remote);
        assert_eq!(h.calls.fetches.get(), 1);
        assert_ne!(acquisition.payload, old);
        assert_eq!(h.store().read(&acquisition.record).unwrap(), acquisition.payload);
        assert!(FreshnessPolicy::new(TTL, false).is_fresh(&acquisition.record));
    }

    #[test]
    fn test_corrupt_cache_triggers_fetch() {
        let h = Harness::new();
        let store = h.store();
        let record = store.open().unwrap();
        fs::write(&record.path, format!("{{\"truncated\": \"{}", "x".repeat(200))).unwrap();

        let acquisition = h.default_acquirer(TTL, false).acquire().unwrap();

        assert_eq!(acquisition.origin, Origin::Remote);
        assert_eq!(h.calls.fetches.get(), 1);
        assert!(store.read(&acquisition.record).is_ok());
    }

    #[test]
    fn test_cached_error_document_triggers_fetch() {
        let h = Harness::new();
        let error_body = RawPayload::from_json(format!(
            "{{\"cod\":\"429\",\"message\":\"{}\"}}",
            "x".repeat(200)
        ))
        .unwrap();
        h.seed(&error_body);

        let acquisition = h.default_acquirer(TTL, false).acquire().unwrap();

        assert_eq!(acquisition.origin, Origin::Remote);
        assert_eq!(h.calls.fetches.get(), 1);
        assert_eq!(acquisition.payload.as_str(), one_call_json(30, 5));
        assert!(ForecastSnapshot::decode(&h.store().read(&acquisition.record).unwrap()).is_ok());
    }

    #[test]
    fn test_unreachable_touches_nothing() {
        let h = Harness::new();
        let acquirer = h.acquirer(false, TTL, false, Some("203.0.113.7"), Ok(one_call_json(30, 5)));

        let err = acquirer.acquire().unwrap_err();

        assert!(matches!(err, WeatherError::Unreachable { attempts: 3 }));
        assert_eq!(h.calls.probes.get(), 3);
        assert_eq!(h.calls.addresses.get(), 0);
        assert_eq!(h.calls.fetches.get(), 0);
        assert!(!h.temp_dir.path().join("weather").exists(), "cache must not be opened");
    }

    #[test]
    fn test_location_failure_skips_fetch() {
        let h = Harness::new();
        let acquirer = h.acquirer(true, TTL, false, None, Ok(one_call_json(30, 5)));

        let err = acquirer.acquire().unwrap_err();

        assert!(matches!(err, WeatherError::LocationUnavailable(_)));
        assert_eq!(h.calls.addresses.get(), 2);
        assert_eq!(h.calls.fetches.get(), 0);
    }

    #[test]
    fn test_fetch_failure_keeps_previous_cache() {
        let h = Harness::new();
        let old = sample_payload();
        h.seed(&old);

        let acquirer = h.acquirer(true, TTL, true, Some("203.0.113.7"), Err("HTTP 503"));
        let err = acquirer.acquire().unwrap_err();

        assert!(matches!(err, WeatherError::RemoteFetchFailed(_)));
        assert_eq!(h.calls.fetches.get(), 1);
        assert_eq!(fs::read_to_string(h.store().path()).unwrap(), old.as_str());
    }
}
