//! Authentication: the hosted provider contract, the per-request session
//! extractor, and the session context injected into editors.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub mod client;
pub mod extract;
pub mod handlers;
pub mod session;

pub use client::GoTrueClient;
pub use extract::CurrentSession;
pub use session::{AuthSubscription, SessionContext};

/// An authenticated user session as issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    SignedIn(Session),
    /// The account exists but must be confirmed by email before signing in.
    ConfirmationRequired { user_id: Uuid },
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Provider error (status {status}): {message}")]
    Provider { status: u16, message: String },
}

/// The hosted authentication service.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    /// Resolves an access token. `Ok(None)` for expired or unknown tokens.
    async fn get_user(&self, access_token: &str) -> Result<Option<Session>, AuthError>;
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;

    use super::*;

    /// Provider fake: a fixed token → session table.
    #[derive(Default)]
    pub struct StaticAuthProvider {
        pub sessions: HashMap<String, Session>,
    }

    impl StaticAuthProvider {
        pub fn with_user(token: &str) -> (Self, Session) {
            let session = Session {
                user_id: Uuid::new_v4(),
                email: Some("anna@example.ch".to_string()),
                access_token: token.to_string(),
            };
            let mut sessions = HashMap::new();
            sessions.insert(token.to_string(), session.clone());
            (Self { sessions }, session)
        }

        /// Registers another user under `token`.
        pub fn add_user(&mut self, token: &str, email: &str) -> Session {
            let session = Session {
                user_id: Uuid::new_v4(),
                email: Some(email.to_string()),
                access_token: token.to_string(),
            };
            self.sessions.insert(token.to_string(), session.clone());
            session
        }
    }

    #[async_trait]
    impl AuthProvider for StaticAuthProvider {
        async fn sign_up(&self, _email: &str, _password: &str) -> Result<SignUpOutcome, AuthError> {
            Ok(SignUpOutcome::ConfirmationRequired {
                user_id: Uuid::new_v4(),
            })
        }

        async fn sign_in(&self, email: &str, _password: &str) -> Result<Session, AuthError> {
            self.sessions
                .values()
                .find(|s| s.email.as_deref() == Some(email))
                .cloned()
                .ok_or_else(|| AuthError::InvalidCredentials("Invalid login credentials".to_string()))
        }

        async fn sign_out(&self, _access_token: &str) -> Result<(), AuthError> {
            Ok(())
        }

        async fn get_user(&self, access_token: &str) -> Result<Option<Session>, AuthError> {
            Ok(self.sessions.get(access_token).cloned())
        }
    }
}
