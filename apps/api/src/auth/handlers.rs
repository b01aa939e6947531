//! Thin proxy routes over the hosted auth provider.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::{CurrentSession, Session, SignUpOutcome};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub access_token: String,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        SessionResponse {
            user_id: session.user_id,
            email: session.email,
            access_token: session.access_token,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SignUpResponse {
    SignedIn { session: SessionResponse },
    ConfirmationRequired { user_id: Uuid },
}

fn validate_credentials(req: &CredentialsRequest) -> Result<(), AppError> {
    if !req.email.contains('@') {
        return Err(AppError::Validation("A valid email address is required".to_string()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("Password cannot be empty".to_string()));
    }
    Ok(())
}

/// POST /api/v1/auth/signup
pub async fn handle_sign_up(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<SignUpResponse>, AppError> {
    validate_credentials(&req)?;
    let outcome = state.auth.sign_up(&req.email, &req.password).await?;
    info!("Sign-up completed for {}", req.email);
    Ok(Json(match outcome {
        SignUpOutcome::SignedIn(session) => SignUpResponse::SignedIn {
            session: session.into(),
        },
        SignUpOutcome::ConfirmationRequired { user_id } => {
            SignUpResponse::ConfirmationRequired { user_id }
        }
    }))
}

/// POST /api/v1/auth/signin
pub async fn handle_sign_in(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    validate_credentials(&req)?;
    let session = state.auth.sign_in(&req.email, &req.password).await?;
    info!("User {} signed in", session.user_id);
    Ok(Json(session.into()))
}

/// POST /api/v1/auth/signout
pub async fn handle_sign_out(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<StatusCode, AppError> {
    if let Some(session) = session.0 {
        state.auth.sign_out(&session.access_token).await?;
        info!("User {} signed out", session.user_id);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/session
pub async fn handle_get_session(session: CurrentSession) -> Result<Json<Session>, AppError> {
    Ok(Json(session.require()?))
}
