use anyhow::Result;

use crate::api;
use crate::core::AppConfig;

pub async fn run(host: String, port: String, config: AppConfig) -> Result<()> {
    if config.google_client_id.is_empty() {
        tracing::warn!("SLOTBOT_GOOGLE_CLIENT_ID is not set, calendar authorization will fail");
    }
    api::serve(host, port, config).await
}
