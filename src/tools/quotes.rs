// src/tools/quotes.rs
//
// Clients for the tool calls that are not the portfolio workflow: spot index
// price from the derivatives exchange, swap quotes from the aggregation
// provider's quoter, and transfer preparation with name resolution.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::error::PortfolioError;
use crate::portfolio::resolver::{resolve_address, NAME_SUFFIX};

/// Current USD index price for a 3/4-letter ticker (e.g. "btc", "eth").
pub async fn index_price(client: &Client, exchange_url: &str, asset: &str) -> Result<Decimal> {
    let url = format!(
        "{}/api/v2/public/get_index_price?index_name={}_usd",
        exchange_url.trim_end_matches('/'),
        asset.to_lowercase()
    );

    let body: Value = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .await
        .context("index price request failed")?
        .json()
        .await
        .context("index price payload was not JSON")?;

    let price = body["result"]["index_price"]
        .as_f64()
        .ok_or_else(|| anyhow!("no index price for asset '{}'", asset))?;

    Decimal::try_from(price).context("index price out of decimal range")
}

#[derive(Debug, Serialize)]
pub struct SwapQuote {
    pub from_token: String,
    pub to_token: String,
    pub from_amount: String,
    pub to_amount: String,
    /// USD unit prices of both legs, when the quoter reports them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_token_usd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_token_usd: Option<String>,
}

/// Requests a swap quote for a token pair on the primary chain.
pub async fn swap_quote(
    client: &Client,
    provider_url: &str,
    api_key: Option<&str>,
    from: &str,
    to: &str,
    amount: &str,
) -> Result<SwapQuote> {
    let url = format!(
        "{}/fusion/quoter/v2.0/1/quote/receive",
        provider_url.trim_end_matches('/')
    );

    let mut req = client.get(&url).query(&[
        ("fromTokenAddress", from),
        ("toTokenAddress", to),
        ("amount", amount),
    ]);
    if let Some(key) = api_key {
        req = req.bearer_auth(key);
    }

    let res = req.send().await.context("swap quote request failed")?;
    let status = res.status();
    if !status.is_success() {
        return Err(anyhow!("quoter returned {}", status));
    }
    let body: Value = res.json().await.context("swap quote payload was not JSON")?;

    let to_amount = body["toTokenAmount"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("quoter response missing 'toTokenAmount'"))?;

    Ok(SwapQuote {
        from_token: from.to_string(),
        to_token: to.to_string(),
        from_amount: amount.to_string(),
        to_amount,
        from_token_usd: body["prices"]["usd"]["fromToken"].as_str().map(str::to_string),
        to_token_usd: body["prices"]["usd"]["toToken"].as_str().map(str::to_string),
    })
}

#[derive(Debug, Serialize)]
pub struct TransferReceipt {
    pub ok: bool,
    pub from: String,
    /// Resolved recipient address (never the input name).
    pub to: String,
    pub amount: String,
}

/// Prepares a token transfer. A recipient carrying the name suffix is
/// resolved first; resolution failure propagates so the transfer is never
/// aimed at an empty address.
pub async fn prepare_transfer(
    client: &Client,
    resolver_url: &str,
    from: &str,
    to: &str,
    amount: &str,
) -> Result<TransferReceipt, PortfolioError> {
    let recipient = if to.ends_with(NAME_SUFFIX) {
        resolve_address(client, resolver_url, to).await?
    } else {
        to.to_string()
    };

    Ok(TransferReceipt {
        ok: true,
        from: from.to_string(),
        to: recipient,
        amount: amount.to_string(),
    })
}
