use anyhow::{Error, Result};
use serde::Serialize;
use serde_json::json;
use tokio_rusqlite::{Connection, params};

use crate::openai::Message;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatSession {
    pub id: String,
    pub title: Option<String>,
    pub user: Option<String>,
    pub created_at: String,
}

/// Create a session with a random id, titled after the user if given
pub async fn create_session(db: &Connection, user: Option<&str>) -> Result<String, Error> {
    let session_id = uuid::Uuid::new_v4().to_string();
    get_or_create_session(db, &session_id, user).await?;
    Ok(session_id)
}

pub async fn get_or_create_session(
    db: &Connection,
    session_id: &str,
    user: Option<&str>,
) -> Result<(), Error> {
    let session_id = session_id.to_owned();
    let user = user.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
    let title = user.as_ref().map(|u| format!("Booking by {}", u));

    db.call(move |conn| {
        conn.execute(
            "INSERT OR IGNORE INTO session (id, title, user_name) VALUES (?1, ?2, ?3)",
            params![session_id, title, user],
        )?;
        Ok(())
    })
    .await?;

    Ok(())
}

pub async fn insert_chat_message(
    db: &Connection,
    session_id: &str,
    msg: &Message,
) -> Result<usize, Error> {
    let s_id = session_id.to_owned();
    let data = json!(msg).to_string();
    let result = db
        .call(move |conn| {
            let mut stmt =
                conn.prepare("INSERT INTO chat_message (session_id, data) VALUES (?, ?)")?;
            let result = stmt.execute([s_id, data])?;
            Ok(result)
        })
        .await?;

    Ok(result)
}

/// Messages of a session in insertion order. Empty if the session
/// doesn't exist.
pub async fn find_chat_session_by_id(
    db: &Connection,
    session_id: &str,
) -> Result<Vec<Message>, Error> {
    let s_id = session_id.to_owned();
    let rows: Vec<String> = db
        .call(move |conn| {
            let mut stmt =
                conn.prepare("SELECT data FROM chat_message WHERE session_id = ? ORDER BY id")?;
            let rows = stmt
                .query_map([s_id], |row| row.get(0))?
                .filter_map(Result::ok)
                .collect::<Vec<String>>();
            Ok(rows)
        })
        .await?;

    let mut transcript = Vec::with_capacity(rows.len());
    for data in rows {
        transcript.push(serde_json::from_str::<Message>(&data)?);
    }
    Ok(transcript)
}

pub async fn chat_session_count(db: &Connection) -> Result<i64, Error> {
    let count = db
        .call(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM session", [], |row| row.get(0))?;
            Ok(count)
        })
        .await?;
    Ok(count)
}

pub async fn chat_session_list(
    db: &Connection,
    limit: usize,
    offset: usize,
) -> Result<Vec<ChatSession>, Error> {
    let sessions = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, title, user_name, created_at
                FROM session
                ORDER BY created_at DESC, rowid DESC
                LIMIT ?1 OFFSET ?2
                "#,
            )?;
            let session_list = stmt
                .query_map(params![limit, offset], |row| {
                    Ok(ChatSession {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        user: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })?
                .filter_map(Result::ok)
                .collect::<Vec<_>>();
            Ok(session_list)
        })
        .await?;
    Ok(sessions)
}
