// src/portfolio/metadata.rs

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::PortfolioError;
use crate::portfolio::cache::TtlCache;

/// Symbol/name/icon for one token, as returned by the token registry.
/// All fields are optional; a token the registry does not know keeps an
/// empty record (and is later excluded for lacking a symbol).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenInfo {
    pub symbol: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "logoURI")]
    pub icon: Option<String>,
}

/// Looks up token metadata, consulting the injected cache first.
pub async fn fetch_token_info(
    client: &Client,
    base_url: &str,
    api_key: Option<&str>,
    cache: &TtlCache,
    cache_ttl: u64,
    chain_id: &str,
    token: &str,
) -> Result<TokenInfo, PortfolioError> {
    let cache_key = format!("meta:{}:{}", chain_id, token);
    if let Some(cached) = cache.get(&cache_key).await {
        if let Ok(info) = serde_json::from_value::<TokenInfo>(cached) {
            return Ok(info);
        }
    }

    let err = |reason: String| PortfolioError::MetadataFetchFailed {
        chain: chain_id.to_string(),
        token: token.to_string(),
        reason,
    };

    let url = format!(
        "{}/token/v1.2/{}/custom/{}",
        base_url.trim_end_matches('/'),
        chain_id,
        token
    );

    let mut req = client.get(&url);
    if let Some(key) = api_key {
        req = req.bearer_auth(key);
    }

    let res = req.send().await.map_err(|e| err(e.to_string()))?;
    let status = res.status();
    if !status.is_success() {
        return Err(err(format!("token registry returned {}", status)));
    }

    let info: TokenInfo = res.json().await.map_err(|e| err(e.to_string()))?;

    cache
        .set(
            &cache_key,
            json!({
                "symbol": info.symbol,
                "name": info.name,
                "logoURI": info.icon,
            }),
            cache_ttl,
        )
        .await;

    Ok(info)
}
