//! Forecast payload cache
//!
//! The cache file holds the provider document verbatim. Freshness comes from
//! the file's modification time, so there is no envelope to keep in sync.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, info};

use super::CacheStatus;
use crate::error::{Result, WeatherError};
use crate::openweather::RawPayload;

/// Files smaller than this are placeholders, not forecasts
pub const MIN_PAYLOAD_BYTES: u64 = 110;

/// Snapshot of the cache file's metadata, taken when it was opened or committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    pub path: PathBuf,
    /// Last modification time
    pub modified: SystemTime,
    /// Size in bytes
    pub size: u64,
    /// The file did not exist before this invocation
    pub created: bool,
}

impl CacheRecord {
    fn from_path(path: &Path, created: bool) -> Result<Self> {
        let metadata = fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            modified: metadata.modified()?,
            size: metadata.len(),
            created,
        })
    }

    /// True when the file is too small to hold a forecast
    pub fn is_empty(&self) -> bool {
        self.size < MIN_PAYLOAD_BYTES
    }

    /// Time since the last write, zero if the clock is behind the file
    pub fn age_at(&self, now: SystemTime) -> Duration {
        now.duration_since(self.modified).unwrap_or_default()
    }
}

/// When a cached payload may be used instead of polling the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub ttl: Duration,
    pub force_poll: bool,
}

impl FreshnessPolicy {
    pub fn new(ttl: Duration, force_poll: bool) -> Self {
        Self { ttl, force_poll }
    }

    pub fn is_fresh(&self, record: &CacheRecord) -> bool {
        self.is_fresh_at(record, SystemTime::now())
    }

    /// Stale when polling is forced, the file was just created, the content is
    /// undersized, or `modified + ttl` lies before `now`
    pub fn is_fresh_at(&self, record: &CacheRecord, now: SystemTime) -> bool {
        if self.force_poll || record.created || record.is_empty() {
            return false;
        }
        match record.modified.checked_add(self.ttl) {
            Some(expires) => expires >= now,
            None => true,
        }
    }
}

/// Owner of the single cache file at `dir/filename`
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
    filename: String,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            filename: filename.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }

    fn temp_path(&self) -> PathBuf {
        self.dir
            .join(format!(".{}.tmp.{}", self.filename, std::process::id()))
    }

    /// Open the cache file, creating the directory and an empty file if absent
    pub fn open(&self) -> Result<CacheRecord> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path();

        let created = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {
                info!(path = %path.display(), "Created cache file");
                true
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => false,
            Err(e) => return Err(e.into()),
        };

        let record = CacheRecord::from_path(&path, created)?;
        debug!(
            path = %record.path.display(),
            size = record.size,
            created = record.created,
            "Opened cache file"
        );
        Ok(record)
    }

    /// Replace the cached payload in one step
    ///
    /// The payload is written and synced to a sibling temp file which is then
    /// renamed over the cache file, so readers see either the old or the new
    /// document and never a fragment.
    pub fn commit(&self, record: &CacheRecord, payload: &RawPayload) -> Result<CacheRecord> {
        let tmp = self.temp_path();

        let written = (|| -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(payload.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp, &record.path)
        })();

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        // Persist the rename itself
        if let Ok(dir) = fs::File::open(&self.dir) {
            let _ = dir.sync_all();
        }

        info!(path = %record.path.display(), bytes = payload.len(), "Committed forecast to cache");
        CacheRecord::from_path(&record.path, false)
    }

    /// Previously committed payload
    ///
    /// Content that is not a One Call document is `CacheCorrupt`, even when it
    /// is valid JSON.
    pub fn read(&self, record: &CacheRecord) -> Result<RawPayload> {
        let bytes = fs::read(&record.path)
            .map_err(|e| WeatherError::CacheCorrupt(format!("{}: {}", record.path.display(), e)))?;

        let text = String::from_utf8(bytes)
            .map_err(|_| WeatherError::CacheCorrupt("content is not UTF-8".to_string()))?;

        let payload =
            RawPayload::from_json(text).map_err(|e| WeatherError::CacheCorrupt(e.to_string()))?;
        payload
            .parse()
            .map_err(|e| WeatherError::CacheCorrupt(format!("not a forecast document: {e}")))?;
        Ok(payload)
    }

    /// Cache status under `ttl`, without creating anything
    pub fn status(&self, ttl: Duration) -> CacheStatus {
        let path = self.path();
        let record = match CacheRecord::from_path(&path, false) {
            Ok(record) => record,
            Err(_) => {
                return CacheStatus {
                    path,
                    exists: false,
                    age_secs: None,
                    size_bytes: None,
                    fresh: false,
                }
            }
        };

        let now = SystemTime::now();
        CacheStatus {
            exists: true,
            age_secs: Some(record.age_at(now).as_secs()),
            size_bytes: Some(record.size),
            fresh: FreshnessPolicy::new(ttl, false).is_fresh_at(&record, now),
            path,
        }
    }

    /// Remove the cache file; returns whether one existed
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
