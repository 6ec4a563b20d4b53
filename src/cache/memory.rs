use std::collections::HashMap;

use futures_locks::RwLock;

use super::CacheEntry;

/// Entries kept for the life of the process only.
#[derive(Debug)]
pub struct MemoryStore(RwLock<HashMap<String, CacheEntry>>);

impl Default for MemoryStore {
    fn default() -> Self {
        Self(RwLock::new(HashMap::new()))
    }
}

impl MemoryStore {
    pub async fn load(&self, id: &str) -> Option<CacheEntry> {
        self.0.read().await.get(id).cloned()
    }

    pub async fn save(&self, id: &str, entry: &CacheEntry) {
        self.0.write().await.insert(id.to_owned(), entry.clone());
    }

    pub async fn clear(&self, id: &str) {
        self.0.write().await.remove(id);
    }
}
