use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};

use super::CacheEntry;

/// One pretty printed JSON file per source under a directory.
#[derive(Debug)]
pub struct FileStore(PathBuf);

impl FileStore {
    pub async fn open(p: impl AsRef<Path>) -> crate::Result<Self> {
        let p = p.as_ref();
        fs::create_dir_all(p).await?;
        Ok(Self(p.to_owned()))
    }

    fn path(&self, id: &str) -> PathBuf {
        self.0.join(format!("{id}.json"))
    }

    pub async fn load(&self, id: &str) -> crate::Result<Option<CacheEntry>> {
        match fs::read(self.path(id)).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(From::from),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the record atomically through a temporary file.
    pub async fn save(&self, id: &str, value: &CacheEntry) -> crate::Result<()> {
        let json = serde_json::to_vec_pretty(value)?;
        let tmp = self.0.join(format!("{id}.json.tmp"));
        let mut f = fs::File::create(&tmp).await?;
        f.write_all(&json).await?;
        f.sync_all().await?;
        drop(f);
        fs::rename(&tmp, self.path(id)).await?;
        Ok(())
    }

    pub async fn clear(&self, id: &str) -> crate::Result<()> {
        match fs::remove_file(self.path(id)).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[tokio::test]
    async fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested")).await.unwrap();
        assert!(store.load("factory-pasila").await.unwrap().is_none());

        let entry = CacheEntry {
            cache_key: "2026-10-13".into(),
            content: "<ul><li><strong>Kalakeitto</strong></li></ul>".into(),
            cached_at: Utc::now(),
        };
        store.save("factory-pasila", &entry).await.unwrap();
        assert!(dir.path().join("nested/factory-pasila.json").exists());
        assert!(!dir.path().join("nested/factory-pasila.json.tmp").exists());
        assert_eq!(store.load("factory-pasila").await.unwrap(), Some(entry));

        store.clear("factory-pasila").await.unwrap();
        store.clear("factory-pasila").await.unwrap();
        assert!(store.load("factory-pasila").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        fs::write(dir.path().join("tokumaru.json"), "{\"cacheKey\": 4").await.unwrap();
        assert!(matches!(
            store.load("tokumaru").await,
            Err(crate::Error::Json(_))
        ));
    }
}
