use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::template::TemplateDescriptor;
use crate::state::AppState;

/// GET /api/v1/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<TemplateDescriptor>>, AppError> {
    Ok(Json(state.templates.list().await?))
}
