use thiserror::Error;

/// Result type alias for weatherbar operations
pub type Result<T> = std::result::Result<T, WeatherError>;

/// Errors that can occur while acquiring or presenting weather data
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Connectivity probe failed on every attempt
    #[error("Network unreachable after {attempts} attempt(s)")]
    Unreachable { attempts: u32 },

    /// Address probe or geo lookup did not yield usable coordinates
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// Transport failure, non-success status or empty body from the provider
    #[error("Weather fetch failed: {0}")]
    RemoteFetchFailed(String),

    /// API key absent or rejected by the provider
    #[error("Weather provider rejected credentials: {0}")]
    RemoteAuthFailed(String),

    /// Cache file content is not a readable forecast document
    #[error("Cache file is corrupt: {0}")]
    CacheCorrupt(String),

    /// Forecast document is missing fields or out of order
    #[error("Malformed forecast payload: {0}")]
    MalformedPayload(String),

    /// Forecast does not reach far enough to fill the requested window
    #[error("Forecast horizon too short: {0}")]
    InsufficientHorizon(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing error
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Failed to write config file: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Environment variable error
    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),
}

impl WeatherError {
    /// Create a fetch failure from any displayable cause
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::RemoteFetchFailed(message.into())
    }

    /// Create a location failure from any displayable cause
    pub fn location(message: impl Into<String>) -> Self {
        Self::LocationUnavailable(message.into())
    }

    /// Create a malformed payload error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload(message.into())
    }

    /// Whether the invocation should end without printing anything
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unreachable { .. } => 2,
            Self::LocationUnavailable(_) => 3,
            Self::RemoteFetchFailed(_) => 4,
            Self::RemoteAuthFailed(_) => 5,
            Self::CacheCorrupt(_) | Self::MalformedPayload(_) | Self::InsufficientHorizon(_) => 6,
            Self::Config(_) | Self::Toml(_) | Self::TomlSerialize(_) | Self::Env(_) => 7,
            Self::InvalidArgument(_) => 64,
            Self::Json(_) | Self::Io(_) => 1,
        }
    }
}
