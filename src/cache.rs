//! @ai:module:intent Explicit cache of raw season payloads keyed by player and season
//! @ai:module:layer infrastructure
//! @ai:module:public_api SeasonCache, CacheKey, CacheEntry
//! @ai:module:stateless false

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey {
    pub player_id: String,
    pub season_id: String,
}

impl CacheKey {
    pub fn new(player_id: impl Into<String>, season_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            season_id: season_id.into(),
        }
    }
}

/// @ai:intent A cached raw payload and when it was fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub payload: Value,
    pub fetched_at: DateTime<Utc>,
}

/// On-disk shape; JSON objects cannot have composite keys.
#[derive(Serialize, Deserialize)]
struct StoredEntry {
    player_id: String,
    season_id: String,
    fetched_at: DateTime<Utc>,
    payload: Value,
}

/// @ai:intent Caller-owned payload cache with caller-controlled invalidation
/// @ai:invariant at most one entry per (player_id, season_id)
#[derive(Debug, Clone, Default)]
pub struct SeasonCache {
    entries: BTreeMap<CacheKey, CacheEntry>,
}

impl SeasonCache {
    /// @ai:intent Create an empty cache
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player_id: &str, season_id: &str) -> Option<&CacheEntry> {
        self.entries.get(&CacheKey::new(player_id, season_id))
    }

    /// @ai:intent Store a payload, replacing any previous entry for the key
    /// @ai:effects state:write
    pub fn insert(
        &mut self,
        player_id: &str,
        season_id: &str,
        payload: Value,
        fetched_at: DateTime<Utc>,
    ) -> Option<CacheEntry> {
        self.entries.insert(
            CacheKey::new(player_id, season_id),
            CacheEntry {
                payload,
                fetched_at,
            },
        )
    }

    /// @ai:effects state:write
    pub fn invalidate(&mut self, player_id: &str, season_id: &str) -> bool {
        self.entries
            .remove(&CacheKey::new(player_id, season_id))
            .is_some()
    }

    /// @ai:intent Drop every season cached for a player
    /// @ai:effects state:write
    pub fn invalidate_player(&mut self, player_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.player_id != player_id);
        before - self.entries.len()
    }

    /// @ai:intent Drop entries fetched more than `max_age` before `now`
    /// @ai:effects state:write
    pub fn invalidate_older_than(&mut self, max_age: Duration, now: DateTime<Utc>) -> usize {
        let cutoff = now - max_age;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.fetched_at >= cutoff);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &CacheKey> {
        self.entries.keys()
    }

    /// @ai:intent Cached entries of one player in season order
    /// @ai:effects pure
    pub fn entries_for_player<'a>(
        &'a self,
        player_id: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a CacheEntry)> + 'a {
        self.entries
            .iter()
            .filter(move |(key, _)| key.player_id == player_id)
            .map(|(key, entry)| (key.season_id.as_str(), entry))
    }

    /// @ai:intent Load a cache file; a missing file yields an empty cache
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No cache file at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let stored: Vec<StoredEntry> = serde_json::from_str(&content)?;

        let entries = stored
            .into_iter()
            .map(|s| {
                (
                    CacheKey::new(s.player_id, s.season_id),
                    CacheEntry {
                        payload: s.payload,
                        fetched_at: s.fetched_at,
                    },
                )
            })
            .collect();

        Ok(Self { entries })
    }

    /// @ai:intent Persist the cache as pretty JSON, creating parent directories
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let stored: Vec<StoredEntry> = self
            .entries
            .iter()
            .map(|(key, entry)| StoredEntry {
                player_id: key.player_id.clone(),
                season_id: key.season_id.clone(),
                fetched_at: entry.fetched_at,
                payload: entry.payload.clone(),
            })
            .collect();

        std::fs::write(path, serde_json::to_string_pretty(&stored)?)?;
        tracing::debug!("Saved {} cache entries to {}", stored.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use tempfile::TempDir;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    fn sample() -> SeasonCache {
        let mut cache = SeasonCache::new();
        cache.insert("237", "2022", json!({"pts": 28.9}), at(1));
        cache.insert("237", "2023", json!({"pts": 25.7}), at(10));
        cache.insert("115", "2023", json!({"pts": 26.4}), at(10));
        cache
    }

    #[test]
    fn test_insert_replaces_same_key() {
        let mut cache = sample();
        let previous = cache.insert("237", "2023", json!({"pts": 26.0}), at(12));

        assert_eq!(previous.unwrap().payload, json!({"pts": 25.7}));
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("237", "2023").unwrap().fetched_at, at(12));
    }

    #[test]
    fn test_invalidate_single_key() {
        let mut cache = sample();
        assert!(cache.invalidate("237", "2022"));
        assert!(!cache.invalidate("237", "2022"));
        assert!(cache.get("237", "2022").is_none());
        assert!(cache.get("237", "2023").is_some());
    }

    #[test]
    fn test_invalidate_player() {
        let mut cache = sample();
        assert_eq!(cache.invalidate_player("237"), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("115", "2023").is_some());
    }

    #[test]
    fn test_invalidate_older_than() {
        let mut cache = sample();
        let removed = cache.invalidate_older_than(Duration::hours(6), at(12));

        assert_eq!(removed, 1);
        assert!(cache.get("237", "2022").is_none());
    }

    #[test]
    fn test_entries_for_player_in_season_order() {
        let cache = sample();
        let seasons: Vec<_> = cache.entries_for_player("237").map(|(s, _)| s).collect();
        assert_eq!(seasons, vec!["2022", "2023"]);
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("cache.json");

        let cache = sample();
        cache.save(&path).unwrap();
        let loaded = SeasonCache::load(&path).unwrap();

        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.get("115", "2023"), cache.get("115", "2023"));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let cache = SeasonCache::load(&temp.path().join("absent.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cache.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(SeasonCache::load(&path).is_err());
    }
}
