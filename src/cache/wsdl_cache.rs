//! Local WSDL cache.
//!
//! # Responsibilities
//! - Map a WSDL source to a file in the cache directory
//! - Reuse the file while its mtime is inside the freshness window
//! - Refetch when stale, missing or forced, within the fetch retry budget
//!
//! # Design Decisions
//! - Writes go to a temp file in the same directory and are renamed into
//!   place, so readers never see a partial document
//! - Refreshes of one entry are serialized by an in-process mutex and an
//!   advisory file lock; the freshness check is repeated under the lock
//! - An entry's mutex leaves the process-wide map with its last user
//! - Content is not validated here; an empty body is cached like any other

use dashmap::DashMap;
use file_guard::Lock;
use lazy_static::lazy_static;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use crate::cache::key::{cache_file_name, lock_file_name};
use crate::config::schema::{CacheConfig, RetryConfig};
use crate::error::FetchError;
use crate::resilience::retries::retry_blocking;
use crate::transport::http::WsdlFetcher;

lazy_static! {
    static ref ENTRY_LOCKS: DashMap<PathBuf, Arc<Mutex<()>>> = DashMap::new();
}

/// Resolves WSDL sources to fresh local copies.
#[derive(Clone)]
pub struct WsdlCache {
    dir: PathBuf,
    freshness: Duration,
    fetch_retry: RetryConfig,
    fetcher: Arc<dyn WsdlFetcher>,
}

impl WsdlCache {
    /// Cache in `dir` with the default freshness window and fetch budget.
    pub fn new(dir: impl Into<PathBuf>, fetcher: Arc<dyn WsdlFetcher>) -> Self {
        let defaults = CacheConfig::default();
        Self {
            dir: dir.into(),
            freshness: Duration::from_secs(defaults.freshness_secs),
            fetch_retry: defaults.fetch_retry,
            fetcher,
        }
    }

    pub fn from_config(config: &CacheConfig, fetcher: Arc<dyn WsdlFetcher>) -> Self {
        Self {
            dir: config.dir.clone(),
            freshness: Duration::from_secs(config.freshness_secs),
            fetch_retry: config.fetch_retry.clone(),
            fetcher,
        }
    }

    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn with_fetch_retry(mut self, fetch_retry: RetryConfig) -> Self {
        self.fetch_retry = fetch_retry;
        self
    }

    /// Path the cached copy of `source` lives at, whether or not it exists.
    pub fn entry_path(&self, source: &str) -> PathBuf {
        self.dir.join(cache_file_name(source))
    }

    /// True when `path` exists and was modified within the freshness window.
    pub fn is_fresh(&self, path: &Path) -> bool {
        let modified = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => return false,
        };

        // A modification time in the future counts as age zero.
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or_default();
        age <= self.freshness
    }

    /// Return a path to a local copy of `source`, fetching it first when the
    /// copy is missing, stale, or `force_refresh` is set.
    pub fn resolve(&self, source: &str, force_refresh: bool) -> Result<PathBuf, FetchError> {
        let path = self.entry_path(source);

        if !force_refresh && self.is_fresh(&path) {
            tracing::debug!(source, path = %path.display(), "WSDL cache hit");
            return Ok(path);
        }

        let entry_lock = ENTRY_LOCKS.entry(path.clone()).or_default().clone();
        let result = {
            let _entry_guard = entry_lock.lock().unwrap_or_else(|e| e.into_inner());
            self.refresh_locked(source, &path, force_refresh)
        };

        // Drop the entry once no other caller holds or waits on it.
        drop(entry_lock);
        ENTRY_LOCKS.remove_if(&path, |_, lock| Arc::strong_count(lock) == 1);

        result.map(|()| path)
    }

    /// Fetch under the advisory file lock. Caller holds the entry mutex.
    fn refresh_locked(&self, source: &str, path: &Path, force_refresh: bool) -> Result<(), FetchError> {
        let lock_path = self.dir.join(lock_file_name(source));
        let mut lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&lock_path)
            .map_err(|e| FetchError::Lock {
                path: lock_path.clone(),
                source: e,
            })?;
        let _file_guard = file_guard::lock(&mut lock_file, Lock::Exclusive, 0, 1).map_err(|e| {
            FetchError::Lock {
                path: lock_path.clone(),
                source: e,
            }
        })?;

        if !force_refresh && self.is_fresh(path) {
            tracing::debug!(source, "WSDL refreshed by a concurrent caller");
            return Ok(());
        }

        tracing::info!(source, path = %path.display(), force_refresh, "Fetching WSDL");

        retry_blocking(&self.fetch_retry, "wsdl_fetch", |_| {
            let body = self.fetcher.fetch(source)?;
            write_atomic(&self.dir, path, &body)
        })
        .map_err(|exhausted| FetchError::Exhausted {
            url: source.to_string(),
            attempts: exhausted.attempts,
            last: Box::new(exhausted.last),
        })?;

        tracing::info!(source, path = %path.display(), "WSDL cached");
        Ok(())
    }
}

impl std::fmt::Debug for WsdlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsdlCache")
            .field("dir", &self.dir)
            .field("freshness_secs", &self.freshness.as_secs())
            .field("fetch_attempts", &self.fetch_retry.max_attempts)
            .finish()
    }
}

fn write_atomic(dir: &Path, path: &Path, body: &[u8]) -> Result<(), FetchError> {
    let write_err = |source| FetchError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".wsdl-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_err)?;
    tmp.write_all(body).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
