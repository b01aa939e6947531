use std::time::Duration;

use anyhow::{ensure, Context, Result};

use crate::export::DEFAULT_SCALE;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    /// Base of public photo URLs; defaults to the S3 endpoint.
    pub s3_public_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub auth_url: String,
    pub auth_api_key: String,
    pub rasterizer_url: String,
    pub editor_idle_timeout: Duration,
    pub export_scale: f32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3_endpoint = require_env("S3_ENDPOINT")?;
        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_public_url: std::env::var("S3_PUBLIC_URL").unwrap_or_else(|_| s3_endpoint.clone()),
            s3_endpoint,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            auth_url: require_env("AUTH_URL")?,
            auth_api_key: require_env("AUTH_API_KEY")?,
            rasterizer_url: require_env("RASTERIZER_URL")?,
            editor_idle_timeout: Duration::from_secs(
                optional_env("EDITOR_IDLE_TIMEOUT_SECS", 1800)
                    .context("EDITOR_IDLE_TIMEOUT_SECS must be a number of seconds")?,
            ),
            export_scale: positive_scale(
                optional_env("EXPORT_SCALE", DEFAULT_SCALE).context("EXPORT_SCALE must be a number")?,
            )
            .context("Invalid EXPORT_SCALE")?,
            port: optional_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => Ok(raw.trim().parse::<T>()?),
        Err(_) => Ok(default),
    }
}

/// Capture scale must be a finite multiplier above zero.
fn positive_scale(scale: f32) -> Result<f32> {
    ensure!(
        scale.is_finite() && scale > 0.0,
        "scale must be a positive number, got {scale}"
    );
    Ok(scale)
}
