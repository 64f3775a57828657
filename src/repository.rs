use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::db::BlobStore;
use crate::error::AppError;
use crate::models::Enrollment;

/// Key under which the whole enrollment list is stored.
pub const ENROLLMENTS_KEY: &str = "enrollments";

/// Sole owner of the enrollment list. Every mutation rewrites the whole blob.
pub struct ScheduleStore {
    blob: Arc<dyn BlobStore>,
    records: Vec<Enrollment>,
}

impl ScheduleStore {
    pub async fn open(blob: Arc<dyn BlobStore>) -> Self {
        let records = load(blob.as_ref()).await;
        info!("loaded {} enrollments", records.len());
        Self { blob, records }
    }

    /// Records in insertion order.
    pub fn list(&self) -> &[Enrollment] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&Enrollment> {
        self.records.iter().find(|r| r.id == id)
    }

    pub async fn save(&self) -> Result<(), AppError> {
        save(self.blob.as_ref(), &self.records).await
    }

    pub async fn add(&mut self, record: Enrollment) -> Result<(), AppError> {
        if self.get(&record.id).is_some() {
            return Err(AppError::Conflict(format!("duplicate enrollment id {}", record.id)));
        }
        let id = record.id.clone();
        self.commit(|records| records.push(record)).await?;
        debug!("added enrollment {}", id);
        Ok(())
    }

    /// Swaps in new field values for `id`, keeping its id and creation time.
    pub async fn replace(
        &mut self,
        id: &str,
        mut record: Enrollment,
    ) -> Result<Option<Enrollment>, AppError> {
        let Some(index) = self.records.iter().position(|r| r.id == id) else {
            return Ok(None);
        };

        record.id = id.to_string();
        record.created_at = self.records[index].created_at;
        let updated = record.clone();
        self.commit(|records| records[index] = record).await?;
        debug!("replaced enrollment {}", id);
        Ok(Some(updated))
    }

    pub async fn remove(&mut self, id: &str) -> Result<bool, AppError> {
        let Some(index) = self.records.iter().position(|r| r.id == id) else {
            return Ok(false);
        };
        self.commit(|records| {
            records.remove(index);
        })
        .await?;
        debug!("removed enrollment {}", id);
        Ok(true)
    }

    // Applies the edit, then persists; a failed write puts the old list back.
    async fn commit(&mut self, edit: impl FnOnce(&mut Vec<Enrollment>)) -> Result<(), AppError> {
        let previous = self.records.clone();
        edit(&mut self.records);
        if let Err(e) = self.save().await {
            warn!("save failed, rolling back: {}", e);
            self.records = previous;
            return Err(e);
        }
        Ok(())
    }
}

/// Reads the stored list. Missing or unreadable data yields an empty list.
pub async fn load(blob: &dyn BlobStore) -> Vec<Enrollment> {
    let raw = match blob.get(ENROLLMENTS_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("could not read stored enrollments: {}", e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Enrollment>>(&raw) {
        Ok(records) => records,
        Err(e) => {
            warn!("discarding unreadable enrollment data: {}", e);
            Vec::new()
        }
    }
}

pub async fn save(blob: &dyn BlobStore, records: &[Enrollment]) -> Result<(), AppError> {
    let raw = serde_json::to_string(records)?;
    blob.put(ENROLLMENTS_KEY, &raw).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryBlobStore;
    use crate::models::EnrollmentDraft;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    fn record(id: &str, name: &str) -> Enrollment {
        let draft = EnrollmentDraft {
            name: name.to_string(),
            email: format!("{}@university.edu", name.to_lowercase()),
            major: "Physics".to_string(),
            year: "1".to_string(),
            ..Default::default()
        };
        Enrollment::from_draft(id.to_string(), &draft, Utc::now())
    }

    struct FailingBlobStore;

    #[async_trait]
    impl BlobStore for FailingBlobStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, AppError> {
            Err(AppError::Database(sqlx::Error::PoolClosed))
        }

        async fn put(&self, _key: &str, _value: &str) -> Result<(), AppError> {
            Err(AppError::Database(sqlx::Error::PoolClosed))
        }
    }

    #[tokio::test]
    async fn test_corrupted_blob_loads_empty() {
        for raw in ["not json", "{\"id\":1}", "[{\"name\":\"no id\"}]", ""] {
            let blob = MemoryBlobStore::with_entry(ENROLLMENTS_KEY, raw);
            assert!(load(&blob).await.is_empty(), "{raw:?}");
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_loads_empty() {
        assert!(load(&FailingBlobStore).await.is_empty());
    }

    #[tokio::test]
    async fn test_mutations_persist_in_order() {
        let blob = Arc::new(MemoryBlobStore::new());
        let mut store = ScheduleStore::open(blob.clone()).await;

        store.add(record("a", "Ann")).await.expect("add a");
        store.add(record("b", "Ben")).await.expect("add b");
        store.add(record("c", "Cai")).await.expect("add c");
        assert!(store.remove("b").await.expect("remove"));

        let reloaded = ScheduleStore::open(blob).await;
        let ids: Vec<&str> = reloaded.list().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_replace_keeps_id_and_created_at() {
        let mut store = ScheduleStore::open(Arc::new(MemoryBlobStore::new())).await;
        let original = record("a", "Ann");
        store.add(original.clone()).await.expect("add");

        let mut edited = record("other", "Anna");
        edited.created_at = original.created_at + Duration::days(3);
        let updated = store
            .replace("a", edited)
            .await
            .expect("replace")
            .expect("found");

        assert_eq!(updated.id, "a");
        assert_eq!(updated.name, "Anna");
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(store.list().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let mut store = ScheduleStore::open(Arc::new(MemoryBlobStore::new())).await;
        assert!(store.replace("nope", record("x", "X")).await.expect("replace").is_none());
        assert!(!store.remove("nope").await.expect("remove"));
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let mut store = ScheduleStore::open(Arc::new(MemoryBlobStore::new())).await;
        store.add(record("a", "Ann")).await.expect("add");
        let err = store.add(record("a", "Ann")).await.expect_err("duplicate");
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_failed_save_rolls_back() {
        let mut store = ScheduleStore::open(Arc::new(FailingBlobStore)).await;
        assert!(store.list().is_empty());
        assert!(store.add(record("a", "Ann")).await.is_err());
        assert!(store.list().is_empty());
    }
}
