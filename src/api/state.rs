use std::sync::Arc;

use tokio_rusqlite::Connection;

use crate::booking::BookingPipeline;
use crate::calendar::CalendarProvider;
use crate::core::AppConfig;
use crate::google::token_store::SqliteTokenStore;
use crate::google::{GoogleAuth, GoogleCalendar, oauth::OAuthConfig};
use crate::openai::OpenAiModel;

pub struct AppState {
    // Session the UI last picked, shared across clients
    pub selected_session: Option<String>,
    pub db: Connection,
    pub config: AppConfig,
    pub pipeline: Arc<BookingPipeline>,
    pub calendar: Arc<dyn CalendarProvider>,
    pub auth: GoogleAuth,
}

impl AppState {
    pub fn new(
        db: Connection,
        config: AppConfig,
        pipeline: Arc<BookingPipeline>,
        calendar: Arc<dyn CalendarProvider>,
        auth: GoogleAuth,
    ) -> Self {
        Self {
            selected_session: None,
            db,
            config,
            pipeline,
            calendar,
            auth,
        }
    }

    /// Wire up the OpenAI model and Google Calendar from `config`
    pub fn from_config(db: Connection, config: AppConfig) -> Self {
        let auth = google_auth(db.clone(), &config);
        let calendar: Arc<dyn CalendarProvider> =
            Arc::new(GoogleCalendar::new(auth.clone(), &config));
        let model = Arc::new(OpenAiModel::from(&config));
        let pipeline = Arc::new(BookingPipeline::new(
            model,
            calendar.clone(),
            config.pipeline_config(),
        ));
        Self::new(db, config, pipeline, calendar, auth)
    }
}

pub fn google_auth(db: Connection, config: &AppConfig) -> GoogleAuth {
    GoogleAuth::new(
        Arc::new(SqliteTokenStore::new(db)),
        OAuthConfig::from(config),
        &config.calendar_account,
    )
}
