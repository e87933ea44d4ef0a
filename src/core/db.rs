//! SQLite storage for OAuth tokens and chat sessions

use std::fs;

use anyhow::{Error, Result};
use rusqlite::Connection as SyncConnection;
use tokio_rusqlite::Connection;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS auth (
    id TEXT PRIMARY KEY,
    service TEXT NOT NULL,
    refresh_token TEXT,
    access_token TEXT,
    expires_at TEXT
);

CREATE TABLE IF NOT EXISTS session (
    id TEXT PRIMARY KEY,
    title TEXT,
    user_name TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS chat_message (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL REFERENCES session(id),
    data TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS chat_message_session_idx ON chat_message(session_id);

CREATE TABLE IF NOT EXISTS demo_booking (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    start TEXT NOT NULL,
    end TEXT NOT NULL,
    link TEXT NOT NULL,
    description TEXT NOT NULL,
    invitees TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
";

/// Open the async db connection stored in directory `db_path`.
pub async fn async_db(db_path: &str) -> Result<Connection, Error> {
    fs::create_dir_all(db_path)?;
    let db = Connection::open(format!("{}/db.sqlite3", db_path.trim_end_matches('/'))).await?;
    Ok(db)
}

/// Open the db and make sure the schema exists
pub async fn initialized_db(db_path: &str) -> Result<Connection, Error> {
    let db = async_db(db_path).await?;
    db.call(|conn| {
        initialize_db(conn)?;
        Ok(())
    })
    .await?;
    Ok(db)
}

/// Create every table. Safe to run more than once.
pub fn initialize_db(conn: &SyncConnection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA)
}
