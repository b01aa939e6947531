//! Client for the hosted authentication service (GoTrue-compatible REST API).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{AuthError, AuthProvider, Session, SignUpOutcome};

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: Uuid,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: ProviderUser,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(ProviderUser),
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(alias = "error_description", alias = "msg")]
    message: Option<String>,
}

#[derive(Clone)]
pub struct GoTrueClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoTrueClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self, AuthError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn error_from(response: reqwest::Response) -> AuthError {
        let status = response.status();
        let message = response
            .json::<ProviderErrorBody>()
            .await
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| status.to_string());

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            AuthError::InvalidCredentials(message)
        } else {
            AuthError::Provider {
                status: status.as_u16(),
                message,
            }
        }
    }
}

impl From<TokenResponse> for Session {
    fn from(token: TokenResponse) -> Self {
        Session {
            user_id: token.user.id,
            email: token.user.email,
            access_token: token.access_token,
        }
    }
}

#[async_trait]
impl AuthProvider for GoTrueClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        let response = self
            .client
            .post(self.url("signup"))
            .header("apikey", &self.api_key)
            .json(&Credentials { email, password })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        match response.json::<SignUpResponse>().await? {
            SignUpResponse::Session(token) => Ok(SignUpOutcome::SignedIn(token.into())),
            SignUpResponse::User(user) => {
                debug!("Sign-up for {} awaits email confirmation", user.id);
                Ok(SignUpOutcome::ConfirmationRequired { user_id: user.id })
            }
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(self.url("token?grant_type=password"))
            .header("apikey", &self.api_key)
            .json(&Credentials { email, password })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json::<TokenResponse>().await?.into())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.url("logout"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        if response.status().is_success() || response.status() == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        Err(Self::error_from(response).await)
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<Session>, AuthError> {
        let response = self
            .client
            .get(self.url("user"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!("Rejected access token presented to auth provider");
                Ok(None)
            }
            status if status.is_success() => {
                let user = response.json::<ProviderUser>().await?;
                Ok(Some(Session {
                    user_id: user.id,
                    email: user.email,
                    access_token: access_token.to_string(),
                }))
            }
            _ => Err(Self::error_from(response).await),
        }
    }
}
