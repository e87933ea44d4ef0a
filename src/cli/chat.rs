use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::api::AppState;
use crate::booking::db::record_demo_outcome;
use crate::booking::{AlternateSlotSet, Outcome};
use crate::chat::{create_session, insert_chat_message, reply};
use crate::core::AppConfig;
use crate::core::db::initialized_db;
use crate::openai::{Message, Role};

/// Alternates offered by the last conflict along with the request
/// they came from, so a reply of `1`, `2` or `3` can book one.
struct PendingConflict {
    alternates: AlternateSlotSet,
    description: String,
    invitees: Vec<String>,
}

fn picked_alternate(line: &str) -> Option<usize> {
    match line.trim() {
        "1" => Some(0),
        "2" => Some(1),
        "3" => Some(2),
        _ => None,
    }
}

pub async fn run(user: Option<&str>, config: AppConfig) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    let db = initialized_db(&config.db_path).await?;
    let state = AppState::from_config(db.clone(), config);
    let pipeline = state.pipeline.clone();
    let session_id = create_session(&db, user).await?;
    tracing::debug!("Started chat session {}", session_id);

    println!(
        "Describe the meeting you want to book, times are in {}. Ctrl-D to quit.",
        pipeline.timezone()
    );
    let mut pending: Option<PendingConflict> = None;

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                let picked = pending.as_ref().and_then(|conflict| {
                    picked_alternate(&line)
                        .and_then(|idx| conflict.alternates.get(idx))
                        .map(|slot| (slot.start.to_rfc3339(), conflict))
                });

                let outcome = match picked {
                    Some((start, conflict)) => {
                        pipeline
                            .attempt_slot(&start, &conflict.description, &conflict.invitees)
                            .await
                    }
                    None => pipeline.handle_request(&line).await,
                };

                pending = match &outcome {
                    Outcome::Conflict {
                        alternates,
                        invitees,
                        ..
                    } => Some(PendingConflict {
                        alternates: alternates.clone(),
                        // Rebooking an alternate keeps the request that caused the conflict
                        description: pending
                            .take()
                            .filter(|_| picked_alternate(&line).is_some())
                            .map(|p| p.description)
                            .unwrap_or_else(|| line.clone()),
                        invitees: invitees.clone(),
                    }),
                    _ => None,
                };

                let reply = reply::render(&outcome)?;
                println!("{}", reply);
                record_demo_outcome(&db, &outcome, &line).await?;

                insert_chat_message(&db, &session_id, &Message::new(Role::User, &line)).await?;
                insert_chat_message(&db, &session_id, &Message::new(Role::Assistant, &reply))
                    .await?;
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    println!("Session saved as {}", session_id);
    Ok(())
}
