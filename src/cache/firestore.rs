use firestore::FirestoreDb;

use super::CacheEntry;

const MENUS_COLLECTION: &str = "menus";

/// One document per source in the `menus` collection, keyed by source id.
#[derive(Debug)]
pub struct Firestore {
    db: FirestoreDb,
}

impl Firestore {
    pub async fn open(project: &str) -> crate::Result<Self> {
        let db = FirestoreDb::new(project).await?;
        log::info!("connected to firestore project {project}");
        Ok(Self { db })
    }

    pub async fn load(&self, id: &str) -> crate::Result<Option<CacheEntry>> {
        let entry = self
            .db
            .fluent()
            .select()
            .by_id_in(MENUS_COLLECTION)
            .obj::<CacheEntry>()
            .one(id)
            .await?;
        Ok(entry)
    }

    pub async fn save(&self, id: &str, entry: &CacheEntry) -> crate::Result<()> {
        self.db
            .fluent()
            .update()
            .in_col(MENUS_COLLECTION)
            .document_id(id)
            .object(entry)
            // need to specify type because of dependency_on_unit_never_type_fallback
            .execute::<()>()
            .await?;
        Ok(())
    }

    pub async fn clear(&self, id: &str) -> crate::Result<()> {
        self.db
            .fluent()
            .delete()
            .from(MENUS_COLLECTION)
            .document_id(id)
            .execute()
            .await?;
        Ok(())
    }
}
