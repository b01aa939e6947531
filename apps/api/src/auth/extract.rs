use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::auth::Session;
use crate::errors::AppError;
use crate::state::AppState;

/// The caller's session, resolved from an `Authorization: Bearer` header.
///
/// Missing, malformed or rejected tokens yield an anonymous caller (`None`);
/// only an unreachable auth provider rejects the request.
pub struct CurrentSession(pub Option<Session>);

impl CurrentSession {
    pub fn require(self) -> Result<Session, AppError> {
        self.0.ok_or(AppError::AuthRequired)
    }
}

pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(CurrentSession(None));
        };
        let session = state.auth.get_user(token).await?;
        Ok(CurrentSession(session))
    }
}
