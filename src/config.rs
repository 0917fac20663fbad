// src/config.rs

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::env;

/// A struct to hold all configuration, loaded once at startup from the .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// Ordered list of chain ids the portfolio workflow walks.
    /// Order is significant: results are concatenated in this order.
    pub chain_ids: Vec<String>,

    // Aggregation provider (balances, token metadata, prices, swap quotes)
    pub provider_api_url: String,
    pub provider_api_key: Option<String>,

    // External services
    pub name_resolver_url: String,
    pub exchange_api_url: String,

    // Language model
    pub llm_api_url: String,
    pub llm_api_key: Option<String>,

    // Cache / fan-out tuning
    pub cache_ttl_seconds: u64,
    pub enrich_concurrency: usize,

    /// Bearer token -> user id. Session issuance itself is out of scope;
    /// the server only verifies tokens it was handed at startup.
    pub auth_tokens: HashMap<String, String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        let chain_ids: Vec<String> = match env::var("PORTFOLIO_CHAIN_IDS") {
            Ok(raw) => serde_json::from_str(&raw)
                .context("Invalid PORTFOLIO_CHAIN_IDS JSON format (expected an array of chain ids)")?,
            Err(_) => vec!["1".to_string(), "56".to_string(), "137".to_string()],
        };

        let auth_tokens: HashMap<String, String> = match env::var("AUTH_TOKENS") {
            Ok(raw) => serde_json::from_str(&raw)
                .context("Invalid AUTH_TOKENS JSON format (expected a map of token -> user id)")?,
            Err(_) => HashMap::new(),
        };

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,

            chain_ids,

            provider_api_url: env::var("PROVIDER_API_URL")
                .unwrap_or_else(|_| "https://api.1inch.dev".to_string()),
            provider_api_key: env::var("PROVIDER_API_KEY").ok(),

            name_resolver_url: env::var("NAME_RESOLVER_URL")
                .unwrap_or_else(|_| "https://api.ensideas.com/ens/resolve".to_string()),
            exchange_api_url: env::var("EXCHANGE_API_URL")
                .unwrap_or_else(|_| "https://www.deribit.com".to_string()),

            llm_api_url: env::var("LLM_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            llm_api_key: env::var("LLM_API_KEY").ok(),

            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .context("CACHE_TTL_SECONDS must be a valid number")?,
            enrich_concurrency: env::var("ENRICH_CONCURRENCY")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .context("ENRICH_CONCURRENCY must be a valid number")?,

            auth_tokens,
        })
    }

    /// Checks if a chain id is part of the tracked set.
    pub fn is_chain_tracked(&self, chain_id: &str) -> bool {
        self.chain_ids.iter().any(|c| c == chain_id)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            chain_ids: vec!["1".to_string(), "56".to_string(), "137".to_string()],
            provider_api_url: "https://api.1inch.dev".to_string(),
            provider_api_key: None,
            name_resolver_url: "https://api.ensideas.com/ens/resolve".to_string(),
            exchange_api_url: "https://www.deribit.com".to_string(),
            llm_api_url: "https://api.openai.com/v1".to_string(),
            llm_api_key: None,
            cache_ttl_seconds: 3600,
            enrich_concurrency: 4,
            auth_tokens: HashMap::new(),
        }
    }
}
