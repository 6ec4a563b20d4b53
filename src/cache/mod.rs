mod firestore;
mod local;
mod memory;

use std::{collections::HashMap, future::Future};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use futures_locks::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::CacheLocation;

use firestore::Firestore;
use local::FileStore;
use memory::MemoryStore;

/// How often a source publishes a new menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    #[default]
    Daily,
    Weekly,
}

/// Identifies the period a cached menu belongs to: `2026-10-13` for daily
/// sources, `2026-W42` for weekly ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_date(cadence: Cadence, date: NaiveDate) -> Self {
        match cadence {
            Cadence::Daily => Self(date.format("%Y-%m-%d").to_string()),
            Cadence::Weekly => {
                let week = date.iso_week();
                Self(format!("{}-W{:02}", week.year(), week.week()))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The single stored record of a source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub cache_key: String,
    #[serde(rename = "storedContent")]
    pub content: String,
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug)]
#[non_exhaustive]
pub enum Store {
    Cloud(Firestore),
    Local(FileStore),
    AdHoc(MemoryStore),
}

impl Store {
    pub async fn open(location: &CacheLocation) -> crate::Result<Self> {
        match location {
            CacheLocation::Firestore { project } => Firestore::open(project).await.map(Self::Cloud),
            CacheLocation::Directory(dir) => FileStore::open(dir).await.map(Self::Local),
            CacheLocation::Memory => Ok(Self::AdHoc(MemoryStore::default())),
        }
    }

    pub async fn load(&self, id: &str) -> crate::Result<Option<CacheEntry>> {
        match self {
            Self::Cloud(fs) => fs.load(id).await,
            Self::Local(f) => f.load(id).await,
            Self::AdHoc(m) => Ok(m.load(id).await),
        }
    }

    pub async fn save(&self, id: &str, entry: &CacheEntry) -> crate::Result<()> {
        match self {
            Self::Cloud(fs) => fs.save(id, entry).await,
            Self::Local(f) => f.save(id, entry).await,
            Self::AdHoc(m) => {
                m.save(id, entry).await;
                Ok(())
            }
        }
    }

    pub async fn clear(&self, id: &str) -> crate::Result<()> {
        match self {
            Self::Cloud(fs) => fs.clear(id).await,
            Self::Local(f) => f.clear(id).await,
            Self::AdHoc(m) => {
                m.clear(id).await;
                Ok(())
            }
        }
    }
}

/// One cache slot per source, holding the content of the current period.
///
/// Lookups for the same source are serialized, so concurrent callers that
/// miss trigger a single extraction and the others read its result.
#[derive(Debug)]
pub struct DayCache {
    store: Store,
    slots: Mutex<HashMap<String, Mutex<()>>>,
}

impl DayCache {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            slots: Mutex::new(HashMap::new()),
        }
    }

    async fn slot(&self, id: &str) -> Mutex<()> {
        let mut slots = self.slots.lock().await;
        slots
            .entry(id.to_owned())
            .or_insert_with(|| Mutex::new(()))
            .clone()
    }

    /// Returns the stored content of `id` when it was stored under `key`,
    /// otherwise runs `refresh` and stores its output under `key`.
    ///
    /// A failing `refresh` leaves the slot untouched. Unreadable entries count
    /// as a miss and a failed write still returns the fresh content.
    pub async fn get_or_refresh<F, Fut>(
        &self,
        id: &str,
        key: &CacheKey,
        refresh: F,
    ) -> crate::Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = crate::Result<String>>,
    {
        let slot = self.slot(id).await;
        let _guard = slot.lock().await;

        match self.store.load(id).await {
            Ok(Some(entry)) if entry.cache_key == key.as_str() && !entry.content.is_empty() => {
                log::debug!("cache hit for {id} ({})", key.as_str());
                return Ok(entry.content);
            }
            Ok(Some(entry)) => {
                log::info!("cache entry for {id} is from {}, refreshing", entry.cache_key);
            }
            Ok(None) => log::info!("cache miss for {id}"),
            Err(e) => log::warn!("unreadable cache entry for {id}, refreshing: {e}"),
        }

        let content = refresh().await?;
        let entry = CacheEntry {
            cache_key: key.as_str().to_owned(),
            content,
            cached_at: Utc::now(),
        };
        match self.store.save(id, &entry).await {
            Ok(()) => log::info!("cached {id} under {}", entry.cache_key),
            Err(e) => log::warn!("could not store menu of {id}: {e}"),
        }
        Ok(entry.content)
    }

    /// Drops the stored entry of `id`, waiting for an extraction in progress.
    pub async fn clear(&self, id: &str) -> crate::Result<()> {
        let slot = self.slot(id).await;
        let _guard = slot.lock().await;
        self.store.clear(id).await
    }
}
