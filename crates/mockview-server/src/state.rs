use mockview::interview::{InMemorySessionStore, Interviewer, SessionStore};
use mockview::providers::client::CompletionClient;
use std::sync::Arc;

use crate::configuration::Settings;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub interviewer: Arc<Interviewer>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(interviewer: Interviewer, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            interviewer: Arc::new(interviewer),
            sessions,
        }
    }

    /// OpenAI-backed interviewer with an in-memory session store
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let client = CompletionClient::openai(settings.provider.into_config())?;
        let interviewer = Interviewer::new(client, settings.interview.into_policy());
        Ok(Self::new(interviewer, Arc::new(InMemorySessionStore::new())))
    }
}
