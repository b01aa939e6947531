pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::auth::handlers as auth;
use crate::editor::handlers as editor;
use crate::persistence::handlers as resumes;
use crate::state::AppState;
use crate::templates::handlers as templates;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/templates", get(templates::handle_list_templates))
        // Auth proxy
        .route("/api/v1/auth/signup", post(auth::handle_sign_up))
        .route("/api/v1/auth/signin", post(auth::handle_sign_in))
        .route("/api/v1/auth/signout", post(auth::handle_sign_out))
        .route("/api/v1/auth/session", get(auth::handle_get_session))
        // Editors
        .route("/api/v1/editors", post(editor::handle_open_editor))
        .route(
            "/api/v1/editors/:id",
            get(editor::handle_get_editor).delete(editor::handle_close_editor),
        )
        .route(
            "/api/v1/editors/:id/commands",
            post(editor::handle_apply_command),
        )
        .route("/api/v1/editors/:id/input", post(editor::handle_field_input))
        .route(
            "/api/v1/editors/:id/forms/:section",
            get(editor::handle_section_form),
        )
        .route("/api/v1/editors/:id/preview", get(editor::handle_preview))
        .route(
            "/api/v1/editors/:id/display",
            put(editor::handle_set_display),
        )
        .route("/api/v1/editors/:id/save", post(editor::handle_save))
        .route("/api/v1/editors/:id/export", post(editor::handle_export))
        // Dashboard
        .route("/api/v1/resumes", get(resumes::handle_list_resumes))
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume).delete(resumes::handle_delete_resume),
        )
        .route(
            "/api/v1/public/resumes/:id/preview",
            get(resumes::handle_public_preview),
        )
        .route(
            "/api/v1/photos",
            post(resumes::handle_upload_photo)
                .layer(DefaultBodyLimit::max(resumes::MAX_PHOTO_BYTES + 64 * 1024)),
        )
        .with_state(state)
}
