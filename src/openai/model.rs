use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;

use super::{CompletionOptions, Message, completion};
use crate::ai::LanguageModel;
use crate::core::AppConfig;

/// Language model backed by an OpenAI compatible chat completions API
#[derive(Clone, Debug)]
pub struct OpenAiModel {
    pub api_hostname: String,
    pub api_key: String,
    pub model: String,
    pub options: CompletionOptions,
}

impl OpenAiModel {
    pub fn new(api_hostname: &str, api_key: &str, model: &str, options: CompletionOptions) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            options,
        }
    }
}

impl From<&AppConfig> for OpenAiModel {
    fn from(config: &AppConfig) -> Self {
        let options = CompletionOptions {
            timeout: config.llm_timeout,
            ..Default::default()
        };
        Self::new(
            &config.openai_api_hostname,
            &config.openai_api_key,
            &config.openai_model,
            options,
        )
    }
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    async fn complete(&self, messages: &[Message]) -> Result<String, Error> {
        let resp = completion(
            messages,
            &self.api_hostname,
            &self.api_key,
            &self.model,
            &self.options,
        )
        .await?;

        tracing::debug!("Completion response: {}", resp);

        resp["choices"][0]["message"]["content"]
            .as_str()
            .map(String::from)
            .ok_or(anyhow!("No message received. Resp:\n\n {}", resp))
    }
}
