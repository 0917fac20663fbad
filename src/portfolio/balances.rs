// src/portfolio/balances.rs

use reqwest::Client;
use std::collections::HashMap;
use tracing::debug;

use crate::error::PortfolioError;
use crate::portfolio::models::TokenBalance;

/// Fetches the non-zero token balances an address holds on one chain.
///
/// The balance index returns a map of token contract address to raw integer
/// balance (string-encoded to preserve precision). Raw values are converted
/// with the fixed 18-decimal assumption and zero/negative entries dropped.
/// Any transport, status, or payload problem is a `BalanceFetchFailed`
/// scoped to this chain; the caller decides whether other chains proceed.
pub async fn fetch_balances(
    client: &Client,
    base_url: &str,
    api_key: Option<&str>,
    chain_id: &str,
    address: &str,
) -> Result<Vec<TokenBalance>, PortfolioError> {
    let url = format!(
        "{}/balance/v1.2/{}/balances/{}",
        base_url.trim_end_matches('/'),
        chain_id,
        address
    );

    let err = |reason: String| PortfolioError::BalanceFetchFailed {
        chain: chain_id.to_string(),
        reason,
    };

    let mut req = client.get(&url);
    if let Some(key) = api_key {
        req = req.bearer_auth(key);
    }

    let res = req.send().await.map_err(|e| err(e.to_string()))?;
    let status = res.status();
    if !status.is_success() {
        return Err(err(format!("balance index returned {}", status)));
    }

    let raw: HashMap<String, String> = res.json().await.map_err(|e| err(e.to_string()))?;

    let balances: Vec<TokenBalance> = raw
        .iter()
        .filter_map(|(token, units)| TokenBalance::from_raw(chain_id, token, units))
        .collect();

    debug!(
        "chain {}: {} raw entries, {} non-zero",
        chain_id,
        raw.len(),
        balances.len()
    );
    Ok(balances)
}
