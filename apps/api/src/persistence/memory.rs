//! In-memory store used by handler and editor tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::document::ResumeDocument;
use crate::models::resume::ResumeSummary;
use crate::persistence::{PersistenceError, PhotoStore, ResumeStore, StorageError};

struct StoredResume {
    owner_id: Uuid,
    document: ResumeDocument,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct MemoryResumeStore {
    records: Mutex<HashMap<Uuid, StoredResume>>,
    offline: AtomicBool,
}

impl MemoryResumeStore {
    /// Makes every subsequent call fail as if the backend were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn check_online(&self) -> Result<(), PersistenceError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable(
                "connection refused".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn create(
        &self,
        document: &ResumeDocument,
        owner_id: Uuid,
    ) -> Result<Uuid, PersistenceError> {
        self.check_online()?;
        let id = Uuid::new_v4();
        self.records.lock().unwrap().insert(
            id,
            StoredResume {
                owner_id,
                document: document.clone(),
                updated_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn update(
        &self,
        record_id: Uuid,
        document: &ResumeDocument,
        owner_id: Uuid,
    ) -> Result<(), PersistenceError> {
        self.check_online()?;
        let mut records = self.records.lock().unwrap();
        match records.get_mut(&record_id) {
            Some(stored) if stored.owner_id == owner_id => {
                stored.document = document.clone();
                stored.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(PersistenceError::RecordUnavailable(record_id)),
        }
    }

    async fn fetch_by_id(
        &self,
        record_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<ResumeDocument>, PersistenceError> {
        self.check_online()?;
        let records = self.records.lock().unwrap();
        Ok(records
            .get(&record_id)
            .filter(|stored| stored.owner_id == owner_id)
            .map(|stored| stored.document.clone().normalized()))
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<ResumeSummary>, PersistenceError> {
        self.check_online()?;
        let records = self.records.lock().unwrap();
        let mut summaries: Vec<ResumeSummary> = records
            .iter()
            .filter(|(_, stored)| stored.owner_id == owner_id)
            .map(|(id, stored)| ResumeSummary {
                id: *id,
                title: stored.document.title.clone(),
                template: stored.document.template_name.clone(),
                is_public: stored.document.visibility,
                updated_at: stored.updated_at,
            })
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn delete(&self, record_id: Uuid, owner_id: Uuid) -> Result<bool, PersistenceError> {
        self.check_online()?;
        let mut records = self.records.lock().unwrap();
        let owned = records
            .get(&record_id)
            .is_some_and(|stored| stored.owner_id == owner_id);
        if owned {
            records.remove(&record_id);
        }
        Ok(owned)
    }

    async fn fetch_public(
        &self,
        record_id: Uuid,
    ) -> Result<Option<ResumeDocument>, PersistenceError> {
        self.check_online()?;
        let records = self.records.lock().unwrap();
        Ok(records
            .get(&record_id)
            .filter(|stored| stored.document.visibility)
            .map(|stored| stored.document.clone().normalized()))
    }
}

#[derive(Default)]
pub struct MemoryPhotoStore {
    pub objects: Mutex<HashMap<String, Bytes>>,
}

#[async_trait]
impl PhotoStore for MemoryPhotoStore {
    async fn upload(
        &self,
        key: &str,
        _content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError> {
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
        Ok(format!("https://cdn.test/{key}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_fetch_round_trip() {
        let store = MemoryResumeStore::default();
        let owner = Uuid::new_v4();
        let mut doc = ResumeDocument::new_blank("modern");
        doc.personal.name = "Anna Muster".to_string();

        let id = store.create(&doc, owner).await.unwrap();
        let fetched = store.fetch_by_id(id, owner).await.unwrap();
        assert_eq!(fetched, Some(doc));
    }

    #[tokio::test]
    async fn test_foreign_owner_cannot_read_or_update() {
        let store = MemoryResumeStore::default();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let doc = ResumeDocument::new_blank("modern");
        let id = store.create(&doc, owner).await.unwrap();

        assert_eq!(store.fetch_by_id(id, intruder).await.unwrap(), None);
        let err = store.update(id, &doc, intruder).await.unwrap_err();
        assert!(matches!(err, PersistenceError::RecordUnavailable(r) if r == id));
        assert!(!store.delete(id, intruder).await.unwrap());
    }

    #[tokio::test]
    async fn test_offline_store_rejects_create() {
        let store = MemoryResumeStore::default();
        store.set_offline(true);
        let err = store
            .create(&ResumeDocument::default(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Unavailable(_)));
        assert_eq!(store.len(), 0);
    }
}
