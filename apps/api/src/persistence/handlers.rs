//! Dashboard, public sharing and photo upload routes.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentSession;
use crate::document::ResumeDocument;
use crate::errors::AppError;
use crate::models::resume::ResumeSummary;
use crate::persistence::photo_key;
use crate::render::{render_document_html, DisplayOptions};
use crate::state::AppState;

pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    let session = session.require()?;
    Ok(Json(state.store.list_for_owner(session.user_id).await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    session: CurrentSession,
) -> Result<Json<ResumeDocument>, AppError> {
    let session = session.require()?;
    let document = state
        .store
        .fetch_by_id(id, session.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(document))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    session: CurrentSession,
) -> Result<StatusCode, AppError> {
    let session = session.require()?;
    if !state.store.delete(id, session.user_id).await? {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    info!("User {} deleted resume {id}", session.user_id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/public/resumes/:id/preview
pub async fn handle_public_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let document = state
        .store
        .fetch_public(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Html(render_document_html(&document, DisplayOptions::default())))
}

#[derive(Debug, Serialize)]
pub struct PhotoUploadResponse {
    pub url: String,
}

/// POST /api/v1/photos (multipart, field `photo`)
pub async fn handle_upload_photo(
    State(state): State<AppState>,
    session: CurrentSession,
    mut multipart: Multipart,
) -> Result<Json<PhotoUploadResponse>, AppError> {
    let session = session.require()?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some("photo") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let key = photo_key(session.user_id, &content_type).ok_or_else(|| {
            AppError::Validation(format!("Unsupported image type '{content_type}'"))
        })?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::Validation("Photo is empty".to_string()));
        }
        if bytes.len() > MAX_PHOTO_BYTES {
            return Err(AppError::Validation("Photo must be 5 MB or smaller".to_string()));
        }

        let url = state.photos.upload(&key, &content_type, bytes).await?;
        info!("User {} uploaded photo {key}", session.user_id);
        return Ok(Json(PhotoUploadResponse { url }));
    }

    Err(AppError::Validation("Missing 'photo' field".to_string()))
}
