use axum::{
    extract::{Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{Html, IntoResponse},
    Json,
};
use uuid::Uuid;

use crate::auth::CurrentSession;
use crate::document::EditCommand;
use crate::editor::fields::{section_form, FieldInput, SectionForm, SectionKey};
use crate::editor::registry::OpenRequest;
use crate::editor::session::{ApplyResult, EditorSnapshot, SaveReceipt};
use crate::errors::AppError;
use crate::export::content_disposition;
use crate::render::{render_document_html, DisplayOptions};
use crate::state::AppState;

/// POST /api/v1/editors
pub async fn handle_open_editor(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(req): Json<OpenRequest>,
) -> Result<(StatusCode, Json<EditorSnapshot>), AppError> {
    let editor = state
        .editors
        .open(req, session.0.clone(), &*state.store, &*state.templates)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(editor.snapshot(session.0.as_ref()).await?),
    ))
}

/// GET /api/v1/editors/:id
pub async fn handle_get_editor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    session: CurrentSession,
) -> Result<Json<EditorSnapshot>, AppError> {
    let editor = state.editors.get(id).await?;
    Ok(Json(editor.snapshot(session.0.as_ref()).await?))
}

/// DELETE /api/v1/editors/:id
pub async fn handle_close_editor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    session: CurrentSession,
) -> Result<StatusCode, AppError> {
    state.editors.close(id, session.0.as_ref()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/editors/:id/commands
pub async fn handle_apply_command(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    session: CurrentSession,
    Json(command): Json<EditCommand>,
) -> Result<Json<ApplyResult>, AppError> {
    let editor = state.editors.get(id).await?;
    Ok(Json(
        editor
            .apply(command, session.0.as_ref(), &*state.templates)
            .await?,
    ))
}

/// POST /api/v1/editors/:id/input
pub async fn handle_field_input(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    session: CurrentSession,
    Json(input): Json<FieldInput>,
) -> Result<Json<ApplyResult>, AppError> {
    let command = input.into_command()?;
    let editor = state.editors.get(id).await?;
    Ok(Json(
        editor
            .apply(command, session.0.as_ref(), &*state.templates)
            .await?,
    ))
}

/// GET /api/v1/editors/:id/forms/:section
pub async fn handle_section_form(
    State(state): State<AppState>,
    Path((id, section)): Path<(Uuid, SectionKey)>,
    session: CurrentSession,
) -> Result<Json<SectionForm>, AppError> {
    let editor = state.editors.get(id).await?;
    let (document, _) = editor.document(session.0.as_ref()).await?;
    Ok(Json(section_form(&document, section)))
}

/// GET /api/v1/editors/:id/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    session: CurrentSession,
) -> Result<Html<String>, AppError> {
    let editor = state.editors.get(id).await?;
    let (document, display) = editor.document(session.0.as_ref()).await?;
    Ok(Html(render_document_html(&document, display)))
}

/// PUT /api/v1/editors/:id/display
pub async fn handle_set_display(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    session: CurrentSession,
    Json(display): Json<DisplayOptions>,
) -> Result<Json<EditorSnapshot>, AppError> {
    let editor = state.editors.get(id).await?;
    Ok(Json(editor.set_display(display, session.0.as_ref()).await?))
}

/// POST /api/v1/editors/:id/save
pub async fn handle_save(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    session: CurrentSession,
) -> Result<Json<SaveReceipt>, AppError> {
    let editor = state.editors.get(id).await?;
    Ok(Json(editor.save(&*state.store, session.0.as_ref()).await?))
}

/// POST /api/v1/editors/:id/export
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    session: CurrentSession,
) -> Result<impl IntoResponse, AppError> {
    let editor = state.editors.get(id).await?;
    let artifact = editor.export(&state.export, session.0.as_ref()).await?;
    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (CONTENT_DISPOSITION, content_disposition(&artifact.filename)),
        ],
        artifact.bytes,
    ))
}
