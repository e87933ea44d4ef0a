//! OAuth2 authorization code flow for Google APIs

use std::time::Duration;

use anyhow::{Result, anyhow};
use serde::Deserialize;

use crate::core::AppConfig;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub token_url: String,
    pub timeout: Duration,
}

impl From<&AppConfig> for OAuthConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.google_redirect_uri.clone(),
            token_url: config.google_token_url.clone(),
            timeout: config.calendar_timeout,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Only returned on the first exchange (with `prompt=consent`)
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Consent page URL. Offline access so a refresh token is issued.
pub fn authorization_url(config: &OAuthConfig) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
        AUTH_URL,
        urlencoding::encode(&config.client_id),
        urlencoding::encode(&config.redirect_uri),
        urlencoding::encode(CALENDAR_SCOPE)
    )
}

async fn token_request(config: &OAuthConfig, params: &[(&str, &str)]) -> Result<OAuthToken> {
    let resp = reqwest::Client::new()
        .post(&config.token_url)
        .timeout(config.timeout)
        .form(params)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow!("Token request failed with {}: {}", status, body));
    }

    Ok(resp.json::<OAuthToken>().await?)
}

pub async fn exchange_code_for_token(config: &OAuthConfig, code: &str) -> Result<OAuthToken> {
    token_request(
        config,
        &[
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ],
    )
    .await
}

pub async fn refresh_access_token(config: &OAuthConfig, refresh_token: &str) -> Result<OAuthToken> {
    token_request(
        config,
        &[
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ],
    )
    .await
}
