// src/portfolio/resolver.rs

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::PortfolioError;

/// Suffix convention that marks a human-readable name rather than an address.
pub const NAME_SUFFIX: &str = ".eth";

/// Turns user input into a canonical address. Raw addresses pass through
/// unchanged; names are resolved via the external name-resolution service.
/// An empty or failed resolution is an error: downstream balance lookups
/// must never run with an empty address.
pub async fn resolve_address(
    client: &Client,
    resolver_url: &str,
    input: &str,
) -> Result<String, PortfolioError> {
    if !input.ends_with(NAME_SUFFIX) {
        return Ok(input.to_string());
    }

    let url = format!("{}/{}", resolver_url.trim_end_matches('/'), input);
    let failed = || PortfolioError::ResolutionFailed {
        input: input.to_string(),
    };

    let res = client.get(&url).send().await.map_err(|_| failed())?;
    if !res.status().is_success() {
        return Err(failed());
    }
    let body: Value = res.json().await.map_err(|_| failed())?;

    match body.get("address").and_then(|v| v.as_str()) {
        Some(address) if !address.is_empty() => {
            debug!("resolved {} -> {}", input, address);
            Ok(address.to_string())
        }
        _ => Err(failed()),
    }
}
