// src/portfolio/aggregator.rs

use futures::stream::{self, StreamExt};
use futures::FutureExt;
use reqwest::Client;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::PortfolioError;
use crate::portfolio::{
    balances::fetch_balances,
    cache::TtlCache,
    metadata::fetch_token_info,
    models::{PortfolioFailure, PortfolioResult, TokenBalance},
    prices::fetch_prices,
    resolver::resolve_address,
};

/// Runs the multi-chain aggregation workflow: resolve the address, then for
/// each tracked chain fetch balances, enrich with metadata and batched USD
/// prices, and concatenate the per-chain rows in chain-list order.
///
/// A failed chain never aborts the request; its failure lands in
/// `PortfolioResult.errors` and the remaining chains still contribute.
/// Only name resolution is fatal.
#[derive(Clone)]
pub struct PortfolioService {
    client: Client,
    cache: TtlCache,
    provider_url: String,
    api_key: Option<String>,
    resolver_url: String,
    chain_ids: Vec<String>,
    cache_ttl: u64,
    concurrency: usize,
}

impl PortfolioService {
    pub fn new(config: &Config, cache: TtlCache) -> Self {
        Self {
            client: Client::new(),
            cache,
            provider_url: config.provider_api_url.clone(),
            api_key: config.provider_api_key.clone(),
            resolver_url: config.name_resolver_url.clone(),
            chain_ids: config.chain_ids.clone(),
            cache_ttl: config.cache_ttl_seconds,
            concurrency: config.enrich_concurrency.max(1),
        }
    }

    /// Aggregates the portfolio for `input`, which may be a raw address or a
    /// name. The result echoes `input` verbatim in its `address` field.
    pub async fn aggregate(&self, input: &str) -> Result<PortfolioResult, PortfolioError> {
        let resolved = resolve_address(&self.client, &self.resolver_url, input).await?;

        // Bounded fan-out over chains; `buffered` keeps chain-list order.
        let chain_futs: Vec<_> = self
            .chain_ids
            .iter()
            .map(|chain| self.collect_chain(&resolved, chain).boxed())
            .collect();
        let per_chain: Vec<(Vec<TokenBalance>, Vec<PortfolioFailure>)> =
            stream::iter(chain_futs)
                .buffered(self.concurrency)
                .collect()
                .await;

        let mut values = Vec::new();
        let mut errors = Vec::new();
        for (rows, failures) in per_chain {
            values.extend(rows);
            errors.extend(failures);
        }

        // Authoritative exclusion rule: a row without a resolved symbol is
        // not part of the portfolio, whatever its amount.
        values.retain(TokenBalance::has_symbol);

        info!(
            "portfolio for {}: {} rows, {} degraded calls",
            input,
            values.len(),
            errors.len()
        );

        Ok(PortfolioResult {
            address: input.to_string(),
            values,
            errors,
        })
    }

    /// Balances -> metadata -> prices for one chain. All failures are
    /// captured and returned alongside whatever rows survived.
    async fn collect_chain(
        &self,
        address: &str,
        chain_id: &str,
    ) -> (Vec<TokenBalance>, Vec<PortfolioFailure>) {
        let mut failures = Vec::new();

        let mut rows = match fetch_balances(
            &self.client,
            &self.provider_url,
            self.api_key.as_deref(),
            chain_id,
            address,
        )
        .await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!("{}", e);
                failures.push(PortfolioFailure::from(&e));
                return (Vec::new(), failures);
            }
        };

        // Per-token metadata, bounded and order-preserving so the zip below
        // lines results up with their rows.
        let info_futs: Vec<_> = rows
            .iter()
            .map(|row| {
                fetch_token_info(
                    &self.client,
                    &self.provider_url,
                    self.api_key.as_deref(),
                    &self.cache,
                    self.cache_ttl,
                    chain_id,
                    &row.address,
                )
                .boxed()
            })
            .collect();
        let infos: Vec<Result<_, PortfolioError>> = stream::iter(info_futs)
            .buffered(self.concurrency)
            .collect()
            .await;

        for (row, info) in rows.iter_mut().zip(infos) {
            match info {
                Ok(info) => {
                    row.symbol = info.symbol;
                    row.name = info.name;
                    row.icon = info.icon;
                }
                Err(e) => {
                    warn!("{}", e);
                    failures.push(PortfolioFailure::from(&e));
                }
            }
        }

        let tokens: Vec<String> = rows.iter().map(|r| r.address.clone()).collect();
        match fetch_prices(
            &self.client,
            &self.provider_url,
            self.api_key.as_deref(),
            &self.cache,
            self.cache_ttl,
            chain_id,
            &tokens,
        )
        .await
        {
            Ok(prices) => {
                for row in rows.iter_mut() {
                    if let Some(price) = prices.get(&row.address) {
                        row.apply_price(*price);
                    }
                }
            }
            Err(e) => {
                // Rows stay without value rather than losing the chain
                warn!("{}", e);
                failures.push(PortfolioFailure::from(&e));
            }
        }

        (rows, failures)
    }
}
