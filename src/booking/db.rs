//! Local record of demo bookings. They never reached a calendar, so
//! this table is the only place they can be listed from.

use anyhow::{Error, Result};
use serde::Serialize;
use tokio_rusqlite::{Connection, params};

use super::{BookingResult, Outcome};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DemoBooking {
    pub id: i64,
    pub start: String,
    pub end: String,
    pub link: String,
    pub description: String,
    pub invitees: Vec<String>,
    pub created_at: String,
}

pub async fn save_demo_booking(
    db: &Connection,
    result: &BookingResult,
    description: &str,
) -> Result<i64, Error> {
    let start = result.start.to_rfc3339();
    let end = result.end.to_rfc3339();
    let link = result.link.clone();
    let description = description.to_owned();
    let invitees = serde_json::to_string(&result.invitees)?;

    let id = db
        .call(move |conn| {
            conn.execute(
                "INSERT INTO demo_booking (start, end, link, description, invitees) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![start, end, link, description, invitees],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await?;

    Ok(id)
}

/// Save `outcome` if it is a non-authoritative booking. Returns the new
/// row id when something was saved.
pub async fn record_demo_outcome(
    db: &Connection,
    outcome: &Outcome,
    description: &str,
) -> Result<Option<i64>, Error> {
    match outcome {
        Outcome::Confirmed(result) if !result.authoritative => {
            let id = save_demo_booking(db, result, description).await?;
            tracing::info!("Saved demo booking {} for {}", id, result.start);
            Ok(Some(id))
        }
        _ => Ok(None),
    }
}

/// Most recent demo bookings first
pub async fn demo_booking_list(db: &Connection, limit: usize) -> Result<Vec<DemoBooking>, Error> {
    let rows = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, start, end, link, description, invitees, created_at
                FROM demo_booking
                ORDER BY id DESC
                LIMIT ?1
                "#,
            )?;
            let rows = stmt
                .query_map(params![limit], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                })?
                .filter_map(Result::ok)
                .collect::<Vec<_>>();
            Ok(rows)
        })
        .await?;

    let mut bookings = Vec::with_capacity(rows.len());
    for (id, start, end, link, description, invitees, created_at) in rows {
        bookings.push(DemoBooking {
            id,
            start,
            end,
            link,
            description,
            invitees: serde_json::from_str(&invitees)?,
            created_at,
        });
    }
    Ok(bookings)
}
