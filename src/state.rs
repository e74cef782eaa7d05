use std::sync::Arc;

use crate::config::Config;
use crate::services::{ChatCompletion, OpenAiChatClient, ResumeAnalyzer};

/// Shared application state injected into route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub analyzer: Arc<ResumeAnalyzer>,
}

impl AppState {
    /// State backed by the given chat backend. Tests pass a scripted one.
    pub fn with_chat(config: Config, chat: Arc<dyn ChatCompletion>) -> Self {
        let analyzer = ResumeAnalyzer::new(chat, config.request_timeout());
        Self {
            config: Arc::new(config),
            analyzer: Arc::new(analyzer),
        }
    }

    /// State talking to the configured OpenAI-compatible endpoint.
    pub fn from_config(config: Config) -> Self {
        let chat = Arc::new(OpenAiChatClient::from_config(&config));
        Self::with_chat(config, chat)
    }
}
