use anyhow::Result;
use slotbot::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
