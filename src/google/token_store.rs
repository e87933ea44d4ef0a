//! Persisted Google credentials, one row per account in the `auth` table

use anyhow::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

pub const SERVICE: &str = "gcal";

#[derive(Debug, Clone, PartialEq)]
pub struct StoredToken {
    pub account: String,
    pub refresh_token: String,
    pub access_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredToken {
    /// Expired, about to expire within a minute, or never fetched
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match (&self.access_token, self.expires_at) {
            (Some(_), Some(expires_at)) => expires_at <= now + Duration::seconds(60),
            _ => true,
        }
    }
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self, account: &str) -> Result<Option<StoredToken>, Error>;
    async fn save(&self, token: &StoredToken) -> Result<(), Error>;
}

#[derive(Clone)]
pub struct SqliteTokenStore {
    db: Connection,
}

impl SqliteTokenStore {
    pub fn new(db: Connection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TokenStore for SqliteTokenStore {
    async fn load(&self, account: &str) -> Result<Option<StoredToken>, Error> {
        let account = account.to_string();
        let token = self
            .db
            .call(move |conn| {
                let row = conn
                    .query_row(
                        "SELECT id, refresh_token, access_token, expires_at FROM auth WHERE id = ?1 AND service = ?2",
                        (&account, SERVICE),
                        |row| {
                            Ok((
                                row.get::<_, String>(0)?,
                                row.get::<_, Option<String>>(1)?,
                                row.get::<_, Option<String>>(2)?,
                                row.get::<_, Option<String>>(3)?,
                            ))
                        },
                    )
                    .optional()?;
                Ok(row)
            })
            .await?;

        let Some((account, Some(refresh_token), access_token, expires_at)) = token else {
            return Ok(None);
        };

        // Unparseable expiry is treated as expired
        let expires_at = expires_at
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(Some(StoredToken {
            account,
            refresh_token,
            access_token,
            expires_at,
        }))
    }

    async fn save(&self, token: &StoredToken) -> Result<(), Error> {
        let token = token.clone();
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO auth (id, service, refresh_token, access_token, expires_at) VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(id) DO UPDATE SET
                       service = excluded.service,
                       refresh_token = excluded.refresh_token,
                       access_token = excluded.access_token,
                       expires_at = excluded.expires_at",
                    (
                        &token.account,
                        SERVICE,
                        &token.refresh_token,
                        &token.access_token,
                        token.expires_at.map(|dt| dt.to_rfc3339()),
                    ),
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}
