use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::document::ResumeDocument;
use crate::models::resume::{ResumeRow, ResumeSummary};
use crate::persistence::{PersistenceError, ResumeStore};

/// `ResumeStore` backed by the `resumes` table.
///
/// The document is stored whole as JSON under `content`; `title`, `template`
/// and `is_public` are denormalized copies used by the dashboard listing.
#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn decode(row: ResumeRow) -> Result<ResumeDocument, PersistenceError> {
    let document: ResumeDocument = serde_json::from_value(row.content)?;
    Ok(document.normalized())
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn create(
        &self,
        document: &ResumeDocument,
        owner_id: Uuid,
    ) -> Result<Uuid, PersistenceError> {
        let content = serde_json::to_value(document)?;
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO resumes (user_id, title, template, content, is_public)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(owner_id)
        .bind(&document.title)
        .bind(&document.template_name)
        .bind(&content)
        .bind(document.visibility)
        .fetch_one(&self.pool)
        .await?;

        info!("Created resume {id} for user {owner_id}");
        Ok(id)
    }

    async fn update(
        &self,
        record_id: Uuid,
        document: &ResumeDocument,
        owner_id: Uuid,
    ) -> Result<(), PersistenceError> {
        let content = serde_json::to_value(document)?;
        let result = sqlx::query(
            r#"
            UPDATE resumes
            SET title = $1, template = $2, content = $3, is_public = $4, updated_at = now()
            WHERE id = $5 AND user_id = $6
            "#,
        )
        .bind(&document.title)
        .bind(&document.template_name)
        .bind(&content)
        .bind(document.visibility)
        .bind(record_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::RecordUnavailable(record_id));
        }
        info!("Updated resume {record_id} for user {owner_id}");
        Ok(())
    }

    async fn fetch_by_id(
        &self,
        record_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<ResumeDocument>, PersistenceError> {
        let row: Option<ResumeRow> =
            sqlx::query_as("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
                .bind(record_id)
                .bind(owner_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(decode).transpose()
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<ResumeSummary>, PersistenceError> {
        Ok(sqlx::query_as::<_, ResumeSummary>(
            r#"
            SELECT id, title, template, is_public, updated_at
            FROM resumes
            WHERE user_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete(&self, record_id: Uuid, owner_id: Uuid) -> Result<bool, PersistenceError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(record_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch_public(
        &self,
        record_id: Uuid,
    ) -> Result<Option<ResumeDocument>, PersistenceError> {
        let row: Option<ResumeRow> =
            sqlx::query_as("SELECT * FROM resumes WHERE id = $1 AND is_public")
                .bind(record_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(decode).transpose()
    }
}
