use std::sync::Arc;

use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use super::oauth::{OAuthConfig, OAuthToken, exchange_code_for_token, refresh_access_token};
use super::token_store::{StoredToken, TokenStore};

/// Access tokens for one Google account, refreshed when they expire and
/// written back to the store.
#[derive(Clone)]
pub struct GoogleAuth {
    store: Arc<dyn TokenStore>,
    oauth: OAuthConfig,
    account: String,
    refresh_lock: Arc<Mutex<()>>,
}

impl GoogleAuth {
    pub fn new(store: Arc<dyn TokenStore>, oauth: OAuthConfig, account: &str) -> Self {
        Self {
            store,
            oauth,
            account: account.to_string(),
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn oauth(&self) -> &OAuthConfig {
        &self.oauth
    }

    pub async fn has_credentials(&self) -> bool {
        match self.store.load(&self.account).await {
            Ok(token) => token.is_some(),
            Err(err) => {
                tracing::error!("Failed to load credentials for {}: {:#}", self.account, err);
                false
            }
        }
    }

    /// Exchange an authorization code and persist the resulting token
    pub async fn authorize(&self, code: &str) -> Result<()> {
        let token = exchange_code_for_token(&self.oauth, code).await?;
        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or(anyhow!("No refresh token in response"))?;
        self.persist(&token, refresh_token).await?;
        tracing::info!("Saved calendar credentials for {}", self.account);
        Ok(())
    }

    /// A valid access token, refreshing it first if needed
    pub async fn access_token(&self) -> Result<String> {
        // Serializes concurrent refreshes for the same account
        let _guard = self.refresh_lock.lock().await;

        let stored = self
            .store
            .load(&self.account)
            .await?
            .ok_or(anyhow!("No calendar credentials for {}", self.account))?;

        if !stored.is_expired(Utc::now()) {
            if let Some(access_token) = stored.access_token {
                return Ok(access_token);
            }
        }

        tracing::debug!("Refreshing access token for {}", self.account);
        let token = refresh_access_token(&self.oauth, &stored.refresh_token).await?;
        // Google only sometimes rotates the refresh token
        let refresh_token = token.refresh_token.clone().unwrap_or(stored.refresh_token);
        self.persist(&token, refresh_token).await?;

        Ok(token.access_token)
    }

    async fn persist(&self, token: &OAuthToken, refresh_token: String) -> Result<()> {
        let expires_at = Utc::now() + Duration::seconds(token.expires_in.unwrap_or(3600));
        self.store
            .save(&StoredToken {
                account: self.account.clone(),
                refresh_token,
                access_token: Some(token.access_token.clone()),
                expires_at: Some(expires_at),
            })
            .await
    }
}
