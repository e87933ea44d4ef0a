use std::env;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;

use crate::booking::{EndTimePolicy, PipelineConfig, ProviderUnavailablePolicy};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage_path: String,
    pub db_path: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_uri: String,
    pub google_token_url: String,
    pub google_api_url: String,
    pub calendar_id: String,
    pub calendar_account: String,
    pub calendar_timeout: Duration,
    pub openai_model: String,
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub llm_timeout: Duration,
    pub timezone: Tz,
    pub event_summary: String,
    pub on_provider_unavailable: ProviderUnavailablePolicy,
    pub end_time_policy: EndTimePolicy,
    pub demo_fallback: bool,
}

impl AppConfig {
    /// Policy knobs the booking pipeline needs, split out so the
    /// pipeline doesn't depend on the whole app config.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            timezone: self.timezone,
            event_summary: self.event_summary.clone(),
            on_provider_unavailable: self.on_provider_unavailable,
            end_time_policy: self.end_time_policy,
            demo_fallback: self.demo_fallback,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(val) => val.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value for {}: {}", key, val);
            default
        }),
        Err(_) => default,
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env_or("SLOTBOT_STORAGE_PATH", "./");
        let db_path = format!("{}/db", storage_path.trim_end_matches('/'));
        let google_client_id = env_or("SLOTBOT_GOOGLE_CLIENT_ID", "");
        let google_client_secret = env_or("SLOTBOT_GOOGLE_CLIENT_SECRET", "");
        let google_redirect_uri =
            env_or("SLOTBOT_GOOGLE_REDIRECT_URI", "urn:ietf:wg:oauth:2.0:oob");
        let google_token_url =
            env_or("SLOTBOT_GOOGLE_TOKEN_URL", "https://oauth2.googleapis.com/token");
        let google_api_url = env_or("SLOTBOT_GOOGLE_API_URL", "https://www.googleapis.com");
        let calendar_id = env_or("SLOTBOT_CALENDAR_ID", "primary");
        let calendar_account = env_or("SLOTBOT_CALENDAR_ACCOUNT", "default");
        let calendar_timeout =
            Duration::from_secs(env_parsed("SLOTBOT_CALENDAR_TIMEOUT_SECS", 20));
        let openai_api_hostname = env_or("SLOTBOT_LLM_HOST", "https://api.openai.com");
        let openai_api_key = env_or("OPENAI_API_KEY", "thiswontworkforopenai");
        let openai_model = env_or("SLOTBOT_LLM_MODEL", "gpt-4.1-mini");
        let llm_timeout = Duration::from_secs(env_parsed("SLOTBOT_LLM_TIMEOUT_SECS", 60));
        let timezone = env_parsed("SLOTBOT_TIMEZONE", chrono_tz::Asia::Kolkata);
        let event_summary = env_or("SLOTBOT_EVENT_SUMMARY", "Slotbot Meeting");
        let on_provider_unavailable = env_parsed(
            "SLOTBOT_ON_PROVIDER_UNAVAILABLE",
            ProviderUnavailablePolicy::AssumeFree,
        );
        let end_time_policy = env_parsed("SLOTBOT_END_TIME_POLICY", EndTimePolicy::Ignore);
        let demo_fallback = env_parsed("SLOTBOT_DEMO_FALLBACK", false);

        Self {
            storage_path,
            db_path,
            google_client_id,
            google_client_secret,
            google_redirect_uri,
            google_token_url,
            google_api_url,
            calendar_id,
            calendar_account,
            calendar_timeout,
            openai_model,
            openai_api_hostname,
            openai_api_key,
            llm_timeout,
            timezone,
            event_summary,
            on_provider_unavailable,
            end_time_policy,
            demo_fallback,
        }
    }
}
