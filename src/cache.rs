use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::error::{AppError, UpstreamError};
use crate::stats::{
    Hero, HeroCompatibility, HeroCounters, HeroDetails, HeroId, RankedHero, StatsProvider,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CacheKey {
    HeroList,
    Rankings {
        days: u32,
        bracket: String,
        limit: usize,
    },
    Counters {
        hero_id: HeroId,
    },
    Compatibility {
        hero_id: HeroId,
    },
    Details {
        hero_id: HeroId,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CachedPayload {
    Heroes(Vec<Hero>),
    Rankings(Vec<RankedHero>),
    Counters(HeroCounters),
    Compatibility(HeroCompatibility),
    Details(Option<HeroDetails>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub payload: CachedPayload,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_stale(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.fetched_at) >= ttl
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheSnapshot {
    saved_at: DateTime<Utc>,
    entries: Vec<SnapshotEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEntry {
    key: CacheKey,
    entry: CacheEntry,
}

type Slot = Arc<Mutex<Option<CacheEntry>>>;

/// Per-key freshness cache in front of a [`StatsProvider`].
///
/// Each key owns a slot whose lock is held across the upstream fetch, so concurrent callers
/// asking for the same key wait for one fetch instead of issuing their own. Failed fetches are
/// never stored; if an older entry exists it is served instead.
pub struct CachedStats<P> {
    inner: P,
    ttl: Duration,
    slots: Mutex<HashMap<CacheKey, Slot>>,
}

impl<P: StatsProvider> CachedStats<P> {
    pub fn new(inner: P, ttl: std::time::Duration) -> Self {
        let ttl = Duration::from_std(ttl).unwrap_or_else(|_| Duration::seconds(300));
        CachedStats {
            inner,
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    fn slot(&self, key: &CacheKey) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    fn cached(
        &self,
        key: CacheKey,
        fetch: impl FnOnce(&P) -> Result<CachedPayload, UpstreamError>,
    ) -> Result<CachedPayload, UpstreamError> {
        let slot = self.slot(&key);
        let mut entry = slot.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(cached) = entry.as_ref() {
            if !cached.is_stale(self.ttl, Utc::now()) {
                tracing::debug!(?key, "stats cache hit");
                return Ok(cached.payload.clone());
            }
        }

        tracing::debug!(?key, "stats cache miss");
        match fetch(&self.inner) {
            Ok(payload) => {
                *entry = Some(CacheEntry {
                    payload: payload.clone(),
                    fetched_at: Utc::now(),
                });
                Ok(payload)
            }
            Err(err) => match entry.as_ref() {
                Some(stale) => {
                    tracing::warn!(?key, error = %err, "upstream failed, serving stale entry");
                    Ok(stale.payload.clone())
                }
                None => Err(err),
            },
        }
    }

    /// Merge entries from a snapshot file. A missing file counts as an empty snapshot.
    pub fn load_snapshot(&self, path: &Path) -> Result<usize, AppError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(AppError::StorageError(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let snapshot: CacheSnapshot = serde_json::from_str(&content)
            .map_err(|e| AppError::JsonError(format!("Failed to parse stats cache: {}", e)))?;

        let count = snapshot.entries.len();
        for SnapshotEntry { key, entry } in snapshot.entries {
            let slot = self.slot(&key);
            let mut current = slot.lock().unwrap_or_else(|e| e.into_inner());
            let newer = current
                .as_ref()
                .map_or(true, |existing| existing.fetched_at < entry.fetched_at);
            if newer {
                *current = Some(entry);
            }
        }
        tracing::debug!(count, path = %path.display(), "stats cache snapshot loaded");
        Ok(count)
    }

    /// Write every fresh entry to `path`; stale entries are dropped.
    pub fn save_snapshot(&self, path: &Path) -> Result<(), AppError> {
        let now = Utc::now();
        let slots: Vec<(CacheKey, Slot)> = {
            let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.iter().map(|(k, s)| (k.clone(), Arc::clone(s))).collect()
        };

        let entries = slots
            .into_iter()
            .filter_map(|(key, slot)| {
                let entry = slot.lock().unwrap_or_else(|e| e.into_inner());
                entry
                    .as_ref()
                    .filter(|e| !e.is_stale(self.ttl, now))
                    .map(|e| SnapshotEntry {
                        key,
                        entry: e.clone(),
                    })
            })
            .collect();

        let snapshot = CacheSnapshot {
            saved_at: now,
            entries,
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| AppError::JsonError(format!("Failed to serialize stats cache: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::StorageError(format!("Failed to create cache dir: {}", e)))?;
        }
        fs::write(path, json)
            .map_err(|e| AppError::StorageError(format!("Failed to write stats cache: {}", e)))?;

        Ok(())
    }
}

fn mismatch(key: &str) -> UpstreamError {
    UpstreamError::Malformed(format!("cached payload for {} has the wrong shape", key))
}

impl<P: StatsProvider> StatsProvider for CachedStats<P> {
    fn hero_list(&self) -> Result<Vec<Hero>, UpstreamError> {
        match self.cached(CacheKey::HeroList, |p| p.hero_list().map(CachedPayload::Heroes))? {
            CachedPayload::Heroes(heroes) => Ok(heroes),
            _ => Err(mismatch("hero list")),
        }
    }

    fn hero_rankings(
        &self,
        window_days: u32,
        rank_bracket: &str,
        limit: usize,
    ) -> Result<Vec<RankedHero>, UpstreamError> {
        let key = CacheKey::Rankings {
            days: window_days,
            bracket: rank_bracket.to_string(),
            limit,
        };
        let payload = self.cached(key, |p| {
            p.hero_rankings(window_days, rank_bracket, limit)
                .map(CachedPayload::Rankings)
        })?;
        match payload {
            CachedPayload::Rankings(rankings) => Ok(rankings),
            _ => Err(mismatch("rankings")),
        }
    }

    fn hero_counters(&self, hero_id: HeroId) -> Result<HeroCounters, UpstreamError> {
        let payload = self.cached(CacheKey::Counters { hero_id }, |p| {
            p.hero_counters(hero_id).map(CachedPayload::Counters)
        })?;
        match payload {
            CachedPayload::Counters(counters) => Ok(counters),
            _ => Err(mismatch("counters")),
        }
    }

    fn hero_compatibility(&self, hero_id: HeroId) -> Result<HeroCompatibility, UpstreamError> {
        let payload = self.cached(CacheKey::Compatibility { hero_id }, |p| {
            p.hero_compatibility(hero_id)
                .map(CachedPayload::Compatibility)
        })?;
        match payload {
            CachedPayload::Compatibility(compatibility) => Ok(compatibility),
            _ => Err(mismatch("compatibility")),
        }
    }

    fn hero_details(&self, hero_id: HeroId) -> Result<Option<HeroDetails>, UpstreamError> {
        let payload = self.cached(CacheKey::Details { hero_id }, |p| {
            p.hero_details(hero_id).map(CachedPayload::Details)
        })?;
        match payload {
            CachedPayload::Details(details) => Ok(details),
            _ => Err(mismatch("details")),
        }
    }
}
