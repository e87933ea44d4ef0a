pub mod prompt;

use anyhow::{Error, Result};
use async_trait::async_trait;

use crate::openai::Message;

/// A hosted language model: transcript in, free-form text out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, Error>;
}
