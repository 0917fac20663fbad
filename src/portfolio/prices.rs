// src/portfolio/prices.rs

use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::PortfolioError;
use crate::portfolio::cache::TtlCache;

/// Fetches USD unit prices for a batch of tokens on one chain.
///
/// One POST for the whole batch; the response maps token address to a
/// string-encoded USD price. Tokens the provider does not price are simply
/// absent from the returned map, which downstream code must treat as
/// "no value", never as zero.
pub async fn fetch_prices(
    client: &Client,
    base_url: &str,
    api_key: Option<&str>,
    cache: &TtlCache,
    cache_ttl: u64,
    chain_id: &str,
    tokens: &[String],
) -> Result<HashMap<String, Decimal>, PortfolioError> {
    if tokens.is_empty() {
        return Ok(HashMap::new());
    }

    let mut sorted = tokens.to_vec();
    sorted.sort();
    let cache_key = format!("prices:{}:{}", chain_id, sorted.join(","));
    if let Some(cached) = cache.get(&cache_key).await {
        if let Ok(prices) = serde_json::from_value::<HashMap<String, Decimal>>(cached) {
            return Ok(prices);
        }
    }

    let err = |reason: String| PortfolioError::PriceFetchFailed {
        chain: chain_id.to_string(),
        reason,
    };

    let url = format!("{}/price/v1.1/{}", base_url.trim_end_matches('/'), chain_id);
    let payload = json!({ "tokens": tokens, "currency": "USD" });

    let mut req = client.post(&url).json(&payload);
    if let Some(key) = api_key {
        req = req.bearer_auth(key);
    }

    let res = req.send().await.map_err(|e| err(e.to_string()))?;
    let status = res.status();
    if !status.is_success() {
        return Err(err(format!("price API returned {}", status)));
    }

    let raw: HashMap<String, String> = res.json().await.map_err(|e| err(e.to_string()))?;

    // Unparseable price strings are dropped rather than poisoning the batch
    let prices: HashMap<String, Decimal> = raw
        .into_iter()
        .filter_map(|(token, price)| Decimal::from_str(&price).ok().map(|p| (token, p)))
        .collect();

    cache
        .set(&cache_key, serde_json::to_value(&prices).unwrap_or_default(), cache_ttl)
        .await;

    Ok(prices)
}
