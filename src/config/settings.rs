use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use super::paths::Paths;
use crate::error::{Result, WeatherError};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Provider credentials
    #[serde(default)]
    pub api: ApiConfig,

    /// Forecast cache location and TTL
    #[serde(default)]
    pub cache: CacheConfig,

    /// Connectivity probe and transport timeouts
    #[serde(default)]
    pub network: NetworkConfig,

    /// Remote provider request shape
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Log destination
    #[serde(default)]
    pub log: LogConfig,
}

/// API-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// OpenWeather API key
    pub key: Option<String>,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache directory, defaults to ~/.weatherbar/cache
    pub dir: Option<PathBuf>,
    /// Cache file name inside the directory
    #[serde(default = "default_cache_filename")]
    pub filename: String,
    /// Seconds a cached forecast stays fresh
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Endpoint used to check outbound reachability
    #[serde(default = "default_probe_url")]
    pub probe_url: String,
    /// Probe attempts before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Seconds to wait between probe attempts
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
    /// Timeout for the probe and the forecast request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Provider request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// One Call endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Unit system passed to the provider
    #[serde(default = "default_units")]
    pub units: String,
    /// Comma-separated sections the provider should leave out
    #[serde(default = "default_exclude")]
    pub exclude: String,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Append log events to this file instead of stderr
    pub file: Option<PathBuf>,
}

fn default_cache_filename() -> String {
    "weather.json".to_string()
}

fn default_ttl_secs() -> u64 {
    1800
}

fn default_probe_url() -> String {
    "http://google.com".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_secs() -> u64 {
    300
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5/onecall".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_exclude() -> String {
    "minutely".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            filename: default_cache_filename(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            probe_url: default_probe_url(),
            max_attempts: default_max_attempts(),
            backoff_secs: default_backoff_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            units: default_units(),
            exclude: default_exclude(),
        }
    }
}

impl NetworkConfig {
    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Configured cache directory, or the default under `paths`
    pub fn dir_or(&self, paths: &Paths) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| paths.cache_dir.clone())
    }
}

impl Config {
    /// Load configuration from a specific paths instance
    pub fn load_from(paths: &Paths) -> Result<Self> {
        if !paths.config_exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&paths.config_file)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values `set_value` would refuse, for hand-edited files
    fn validate(&self) -> Result<()> {
        if self.network.timeout_secs == 0 {
            return Err(WeatherError::Config(
                "network.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if !matches!(self.provider.units.as_str(), "metric" | "imperial" | "standard") {
            return Err(WeatherError::Config(format!(
                "provider.units must be 'metric', 'imperial' or 'standard', got '{}'",
                self.provider.units
            )));
        }
        Ok(())
    }

    /// Save configuration to a specific paths instance
    pub fn save_to(&self, paths: &Paths) -> Result<()> {
        paths.ensure_dirs()?;
        let contents = toml::to_string_pretty(self)?;
        fs::write(&paths.config_file, &contents)?;

        #[cfg(unix)]
        {
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&paths.config_file, perms)?;
        }

        Ok(())
    }

    /// API key from the command line/environment, falling back to the config file.
    /// Blank keys count as absent.
    pub fn api_key<'a>(&'a self, override_key: Option<&'a str>) -> Option<&'a str> {
        override_key
            .or(self.api.key.as_deref())
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Set the API key
    pub fn set_api_key(&mut self, key: String) {
        self.api.key = Some(key);
    }

    /// Apply a `section.field = value` assignment
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.key" => self.set_api_key(value.to_string()),
            "cache.dir" => self.cache.dir = Some(PathBuf::from(value)),
            "cache.filename" => {
                if value.is_empty() || value.contains(std::path::MAIN_SEPARATOR) {
                    return Err(WeatherError::InvalidArgument(
                        "cache.filename must be a bare file name".to_string(),
                    ));
                }
                self.cache.filename = value.to_string();
            }
            "cache.ttl_secs" => self.cache.ttl_secs = parse_number(key, value)?,
            "network.probe_url" => self.network.probe_url = value.to_string(),
            "network.max_attempts" => self.network.max_attempts = parse_number(key, value)?,
            "network.backoff_secs" => self.network.backoff_secs = parse_number(key, value)?,
            "network.timeout_secs" => {
                let secs: u64 = parse_number(key, value)?;
                if secs == 0 {
                    return Err(WeatherError::InvalidArgument(
                        "network.timeout_secs must be greater than zero".to_string(),
                    ));
                }
                self.network.timeout_secs = secs;
            }
            "provider.base_url" => self.provider.base_url = value.to_string(),
            "provider.units" => {
                if !matches!(value, "metric" | "imperial" | "standard") {
                    return Err(WeatherError::InvalidArgument(
                        "provider.units must be 'metric', 'imperial' or 'standard'".to_string(),
                    ));
                }
                self.provider.units = value.to_string();
            }
            "provider.exclude" => self.provider.exclude = value.to_string(),
            "log.file" => self.log.file = Some(PathBuf::from(value)),
            _ => {
                return Err(WeatherError::InvalidArgument(format!(
                    "Unknown config key: {}. Valid keys: {}",
                    key,
                    Self::KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Keys accepted by [`Config::set_value`]
    pub const KEYS: &'static [&'static str] = &[
        "api.key",
        "cache.dir",
        "cache.filename",
        "cache.ttl_secs",
        "network.probe_url",
        "network.max_attempts",
        "network.backoff_secs",
        "network.timeout_secs",
        "provider.base_url",
        "provider.units",
        "provider.exclude",
        "log.file",
    ];

    /// Temperature unit symbol matching the configured unit system
    pub fn temperature_unit(&self) -> &'static str {
        match self.provider.units.as_str() {
            "imperial" => "°F",
            "standard" => "K",
            _ => "°C",
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| WeatherError::InvalidArgument(format!("{key} expects a number, got '{value}'")))
}
