use anyhow::{Result, bail};

use crate::api::AppState;
use crate::booking::Outcome;
use crate::booking::db::record_demo_outcome;
use crate::chat::reply;
use crate::core::AppConfig;
use crate::core::db::initialized_db;

pub async fn run(text: &str, config: AppConfig) -> Result<()> {
    let db = initialized_db(&config.db_path).await?;
    let state = AppState::from_config(db.clone(), config);

    let outcome = state.pipeline.handle_request(text).await;
    println!("{}", reply::render(&outcome)?);
    record_demo_outcome(&db, &outcome, text).await?;

    if let Outcome::Rejected { .. } | Outcome::Failed { .. } = outcome {
        bail!("Booking was not made ({})", outcome.status());
    }
    Ok(())
}
