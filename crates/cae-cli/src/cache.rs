//! File-backed result cache for the CLI.
//!
//! Each entry is a JSON file named by the SHA-256 of the operation name and
//! its arguments. Entries older than the TTL are treated as misses and
//! removed; once more than `max_entries` files exist the oldest are evicted.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    operation: String,
    stored_at: DateTime<Utc>,
    value: serde_json::Value,
}

/// Counts reported by [`ResultCache::prune`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct PruneSummary {
    pub expired: usize,
    pub evicted: usize,
    pub remaining: usize,
}

pub(crate) struct ResultCache {
    dir: PathBuf,
    ttl: Duration,
    max_entries: usize,
}

/// Cache key for `operation` called with `args`.
///
/// `serde_json` object keys serialize in sorted order, so argument maps that
/// differ only in insertion order hash identically.
pub(crate) fn cache_key(operation: &str, args: &serde_json::Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(operation.as_bytes());
    hasher.update([0u8]);
    hasher.update(args.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

impl ResultCache {
    pub(crate) fn new(dir: impl Into<PathBuf>, ttl_secs: u64, max_entries: usize) -> Self {
        Self {
            dir: dir.into(),
            ttl: i64::try_from(ttl_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
            max_entries: max_entries.max(1),
        }
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn is_expired(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.stored_at) > self.ttl
    }

    /// Fresh cached value for `operation(args)`, if any.
    ///
    /// Expired and unreadable entries are removed and reported as misses.
    pub(crate) fn get<T: DeserializeOwned>(
        &self,
        operation: &str,
        args: &serde_json::Value,
        now: DateTime<Utc>,
    ) -> Option<T> {
        let path = self.path_for(&cache_key(operation, args));
        let bytes = fs::read(&path).ok()?;

        let entry = match serde_json::from_slice::<CacheEntry>(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "dropping unreadable cache entry");
                let _ = fs::remove_file(&path);
                return None;
            }
        };
        if entry.operation != operation {
            return None;
        }
        if self.is_expired(&entry, now) {
            tracing::debug!(operation, "cache entry expired");
            let _ = fs::remove_file(&path);
            return None;
        }

        match serde_json::from_value(entry.value) {
            Ok(value) => {
                tracing::debug!(operation, "cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(operation, error = %e, "cached value has the wrong shape");
                let _ = fs::remove_file(&path);
                None
            }
        }
    }

    /// Store `value` for `operation(args)`, then evict down to `max_entries`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory or entry cannot be written.
    pub(crate) fn put<T: Serialize>(
        &self,
        operation: &str,
        args: &serde_json::Value,
        value: &T,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating cache dir {}", self.dir.display()))?;

        let entry = CacheEntry {
            operation: operation.to_string(),
            stored_at: now,
            value: serde_json::to_value(value)?,
        };
        let path = self.path_for(&cache_key(operation, args));
        fs::write(&path, serde_json::to_vec(&entry)?)
            .with_context(|| format!("writing cache entry {}", path.display()))?;

        self.evict_overflow()?;
        Ok(())
    }

    /// Remove expired or unreadable entries, then evict down to `max_entries`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be listed.
    pub(crate) fn prune(&self, now: DateTime<Utc>) -> anyhow::Result<PruneSummary> {
        let mut expired = 0;
        for (path, entry) in self.entries()? {
            let stale = entry.as_ref().is_none_or(|e| self.is_expired(e, now));
            if stale && fs::remove_file(&path).is_ok() {
                expired += 1;
            }
        }
        let evicted = self.evict_overflow()?;
        let remaining = self.entries()?.len();
        tracing::info!(expired, evicted, remaining, "cache pruned");
        Ok(PruneSummary {
            expired,
            evicted,
            remaining,
        })
    }

    /// Delete every entry. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be listed.
    pub(crate) fn clear(&self) -> anyhow::Result<usize> {
        let mut removed = 0;
        for (path, _) in self.entries()? {
            if fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }
        tracing::info!(removed, dir = %self.dir.display(), "cache cleared");
        Ok(removed)
    }

    /// Evict the oldest entries beyond `max_entries`. Unreadable entries
    /// count as oldest.
    fn evict_overflow(&self) -> anyhow::Result<usize> {
        let mut entries = self.entries()?;
        if entries.len() <= self.max_entries {
            return Ok(0);
        }
        entries.sort_by_key(|(_, entry)| entry.as_ref().map(|e| e.stored_at));

        let excess = entries.len() - self.max_entries;
        let mut evicted = 0;
        for (path, _) in entries.into_iter().take(excess) {
            if fs::remove_file(&path).is_ok() {
                evicted += 1;
            }
        }
        tracing::debug!(evicted, "evicted oldest cache entries");
        Ok(evicted)
    }

    /// All `*.json` files in the cache dir with their parsed entry, if readable.
    fn entries(&self) -> anyhow::Result<Vec<(PathBuf, Option<CacheEntry>)>> {
        let listing = match fs::read_dir(&self.dir) {
            Ok(listing) => listing,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("listing cache dir {}", self.dir.display()))
            }
        };

        let mut entries = Vec::new();
        for item in listing {
            let path = item?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let entry = fs::read(&path)
                    .ok()
                    .and_then(|bytes| serde_json::from_slice(&bytes).ok());
                entries.push((path, entry));
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_750_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn key_ignores_argument_order() {
        let a = json!({ "channel": "@mkbhd", "months": 6 });
        let b = json!({ "months": 6, "channel": "@mkbhd" });
        assert_eq!(cache_key("stats", &a), cache_key("stats", &b));
        assert_ne!(cache_key("stats", &a), cache_key("comments", &a));
        assert_eq!(cache_key("stats", &a).len(), 64);
    }

    #[test]
    fn stores_and_returns_fresh_values() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path(), 60, 10);
        let args = json!({ "url": "https://i.ytimg.com/vi/x/hq.jpg" });

        cache.put("thumbnail", &args, &0.73_f32, at(0)).unwrap();

        assert_eq!(cache.get::<f32>("thumbnail", &args, at(30)), Some(0.73));
        assert_eq!(cache.get::<f32>("thumbnail", &json!({ "url": "other" }), at(30)), None);
    }

    #[test]
    fn expired_entries_are_removed_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path(), 60, 10);
        let args = json!({ "video": "abc" });

        cache.put("comments", &args, &vec!["hi"], at(0)).unwrap();

        assert_eq!(cache.get::<Vec<String>>("comments", &args, at(61)), None);
        assert!(!cache.path_for(&cache_key("comments", &args)).exists());
    }

    #[test]
    fn overflow_evicts_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path(), 3_600, 2);

        for i in 0..3 {
            cache.put("op", &json!({ "i": i }), &i, at(i64::from(i))).unwrap();
        }

        assert_eq!(cache.get::<i32>("op", &json!({ "i": 0 }), at(10)), None);
        assert_eq!(cache.get::<i32>("op", &json!({ "i": 1 }), at(10)), Some(1));
        assert_eq!(cache.get::<i32>("op", &json!({ "i": 2 }), at(10)), Some(2));
    }

    #[test]
    fn prune_drops_expired_and_corrupt_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path(), 100, 10);

        cache.put("op", &json!({ "i": 1 }), &1, at(0)).unwrap();
        cache.put("op", &json!({ "i": 2 }), &2, at(150)).unwrap();
        fs::write(dir.path().join("garbage.json"), b"{not json").unwrap();
        fs::write(dir.path().join("notes.txt"), b"kept").unwrap();

        let summary = cache.prune(at(160)).unwrap();

        assert_eq!(
            summary,
            PruneSummary {
                expired: 2,
                evicted: 0,
                remaining: 1
            }
        );
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn clear_removes_everything_and_tolerates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path().join("nested"), 60, 10);
        assert_eq!(cache.clear().unwrap(), 0);

        cache.put("a", &json!(null), &"x", at(0)).unwrap();
        cache.put("b", &json!(null), &"y", at(0)).unwrap();

        assert_eq!(cache.clear().unwrap(), 2);
        assert_eq!(cache.get::<String>("a", &json!(null), at(1)), None);
    }
}
