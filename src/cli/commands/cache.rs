//! Cache management commands

use crate::cache::CacheStore;
use crate::cli::args::{CacheArgs, CacheCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::Result;
use crate::output::{self, json, pretty};

/// Handle cache commands
pub fn handle(config: &Config, paths: &Paths, args: &CacheArgs, format: OutputFormat) -> Result<String> {
    let store = CacheStore::new(config.cache.dir_or(paths), config.cache.filename.clone());

    match &args.command {
        CacheCommands::Status => status(&store, config, format),
        CacheCommands::Clear => clear(&store, format),
    }
}

fn status(store: &CacheStore, config: &Config, format: OutputFormat) -> Result<String> {
    let status = store.status(config.cache.ttl());

    match format {
        OutputFormat::Pretty => Ok(pretty::format_cache_status(&status, config.cache.ttl_secs)),
        OutputFormat::Json => json::format_json(&status),
    }
}

fn clear(store: &CacheStore, format: OutputFormat) -> Result<String> {
    let removed = store.clear()?;
    let message = if removed {
        "Cache cleared"
    } else {
        "Cache already empty"
    };

    output::format_ack(
        message,
        &serde_json::json!({
            "status": "cleared",
            "removed": removed,
        }),
        format,
    )
}
