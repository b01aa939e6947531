//! Persistence adapter: the record store for resumes and the object store for photos.
//!
//! Both are trait seams carried in `AppState` as `Arc<dyn …>`. Ownership is
//! enforced by filtering every statement on the owner id; a record that
//! exists but belongs to someone else is indistinguishable from a missing one.
//! Nothing here retries: a failed call is reported to the caller once.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

use crate::document::ResumeDocument;
use crate::models::resume::ResumeSummary;

pub mod handlers;
pub mod photos;
pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use photos::S3PhotoStore;
pub use postgres::PgResumeStore;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    #[error("Resume {0} does not exist or is not owned by the caller")]
    RecordUnavailable(Uuid),

    #[error("Malformed resume content: {0}")]
    Content(#[from] serde_json::Error),
}

impl From<sqlx::Error> for PersistenceError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Tls(_) => PersistenceError::Unavailable(e.to_string()),
            other => PersistenceError::Database(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload of {key} failed: {message}")]
    Upload { key: String, message: String },
}

/// Create/read/update access to stored resumes, scoped to an owner.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Inserts a new record; the returned id is retrievable afterwards.
    async fn create(&self, document: &ResumeDocument, owner_id: Uuid)
        -> Result<Uuid, PersistenceError>;

    /// Overwrites an existing record. Fails with `RecordUnavailable` when the
    /// record is missing or owned by someone else.
    async fn update(
        &self,
        record_id: Uuid,
        document: &ResumeDocument,
        owner_id: Uuid,
    ) -> Result<(), PersistenceError>;

    /// `Ok(None)` when the record is missing or not owned by `owner_id`.
    async fn fetch_by_id(
        &self,
        record_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<ResumeDocument>, PersistenceError>;

    /// Dashboard listing, most recently updated first.
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<ResumeSummary>, PersistenceError>;

    /// Returns whether a record was deleted.
    async fn delete(&self, record_id: Uuid, owner_id: Uuid) -> Result<bool, PersistenceError>;

    /// Reads a record regardless of owner, but only when it is link-shareable.
    async fn fetch_public(&self, record_id: Uuid)
        -> Result<Option<ResumeDocument>, PersistenceError>;
}

/// Object storage for uploaded profile photos.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Uploads `bytes` under `key` and returns the public URL of the object.
    async fn upload(&self, key: &str, content_type: &str, bytes: Bytes)
        -> Result<String, StorageError>;
}

/// Object key for a user's photo. The extension follows the content type.
pub fn photo_key(owner_id: Uuid, content_type: &str) -> Option<String> {
    let ext = match content_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        _ => return None,
    };
    Some(format!("photos/{owner_id}/{}.{ext}", Uuid::new_v4()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_key_layout() {
        let owner = Uuid::new_v4();
        let key = photo_key(owner, "image/png").unwrap();
        assert!(key.starts_with(&format!("photos/{owner}/")));
        assert!(key.ends_with(".png"));
        assert!(photo_key(owner, "application/pdf").is_none());
    }

    #[test]
    fn test_connection_failures_map_to_unavailable() {
        let err = PersistenceError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, PersistenceError::Unavailable(_)));
        let err = PersistenceError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, PersistenceError::Database(_)));
    }
}
