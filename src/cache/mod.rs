//! Cache module for avoiding provider calls
//!
//! Keeps the last forecast document on disk and decides whether it is still
//! fresh enough to serve.

mod store;

pub use store::{CacheRecord, CacheStore, FreshnessPolicy, MIN_PAYLOAD_BYTES};

use serde::Serialize;
use std::path::PathBuf;

/// Status of the cache file
#[derive(Debug, Serialize)]
pub struct CacheStatus {
    pub path: PathBuf,
    pub exists: bool,
    pub age_secs: Option<u64>,
    pub size_bytes: Option<u64>,
    pub fresh: bool,
}
