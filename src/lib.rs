// src/lib.rs

use std::sync::Arc;

// Re-export modules
pub mod api;
pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod portfolio;
pub mod tools;
pub mod utils;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// Multi-chain portfolio aggregation workflow
    pub portfolio: portfolio::PortfolioService,
    /// Client for the chat-completions API
    pub llm: chat::llm::LlmClient,
    /// Conversation persistence seam
    pub chats: Arc<dyn chat::ChatStore>,
    /// Bearer-token session verification
    pub sessions: auth::SessionVerifier,
    /// Registry of model ids the chat endpoint accepts
    pub models: Arc<Vec<chat::models::ChatModel>>,
    /// Shared HTTP client for outbound tool calls
    pub http: reqwest::Client,
}

impl AppState {
    /// Wires the default state from configuration.
    pub fn from_config(config: config::Config) -> Self {
        let cache = portfolio::TtlCache::new();
        let portfolio = portfolio::PortfolioService::new(&config, cache);
        let llm = chat::llm::LlmClient::new(config.llm_api_url.clone(), config.llm_api_key.clone());
        let sessions = auth::SessionVerifier::new(config.auth_tokens.clone());

        AppState {
            config,
            portfolio,
            llm,
            chats: Arc::new(chat::InMemoryChatStore::new()),
            sessions,
            models: Arc::new(chat::models::default_models()),
            http: reqwest::Client::new(),
        }
    }
}
