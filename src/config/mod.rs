mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{ApiConfig, CacheConfig, Config, LogConfig, NetworkConfig, ProviderConfig};
