use std::io::{self, Write};

use anyhow::{Result, bail};

use crate::api::google_auth;
use crate::core::AppConfig;
use crate::core::db::initialized_db;
use crate::google::oauth::authorization_url;

pub async fn run(config: &AppConfig) -> Result<()> {
    if config.google_client_id.is_empty() || config.google_client_secret.is_empty() {
        bail!("Set SLOTBOT_GOOGLE_CLIENT_ID and SLOTBOT_GOOGLE_CLIENT_SECRET in your environment");
    }

    let db = initialized_db(&config.db_path).await?;
    let auth = google_auth(db, config);
    if auth.has_credentials().await {
        println!(
            "Calendar {} is already connected, authorizing again replaces its credentials.",
            config.calendar_account
        );
    }

    println!(
        "\nPlease open the following URL in your browser and authorize access:\n\n{}\n",
        authorization_url(auth.oauth())
    );
    print!("Paste the authorization code shown by Google here: ");
    io::stdout().flush()?;
    let mut code = String::new();
    io::stdin().read_line(&mut code)?;
    let code = code.trim();
    if code.is_empty() {
        bail!("No authorization code entered");
    }

    // Store the refresh token in the DB and use that to fetch an access token from now on.
    auth.authorize(code).await?;
    println!("Calendar credentials for {} saved to DB.", config.calendar_account);

    Ok(())
}
