// src/portfolio/models.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PortfolioError;

/// Token decimal precision assumed for raw balance values.
/// The balance index returns raw integers without per-token decimals.
pub const ASSUMED_DECIMALS: u32 = 18;

/// One token position on one chain, enriched in place as metadata and
/// prices arrive. Rows with `amount <= 0` are never created; rows whose
/// symbol never resolves are dropped before the result is returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalance {
    pub chain_id: String,
    /// Token contract address.
    pub address: String,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// USD per unit. Absent when the price API returned no entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// amount * price. Absent (never zero) when price is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
}

impl TokenBalance {
    /// Builds a row from a raw string-encoded integer balance.
    /// Returns None for zero, negative, or unparseable values.
    pub fn from_raw(chain_id: &str, address: &str, raw: &str) -> Option<Self> {
        let units: i128 = raw.parse().ok()?;
        let amount = Decimal::try_from_i128_with_scale(units, ASSUMED_DECIMALS)
            .ok()?
            .normalize();
        if amount <= Decimal::ZERO {
            return None;
        }
        Some(TokenBalance {
            chain_id: chain_id.to_string(),
            address: address.to_string(),
            amount,
            symbol: None,
            name: None,
            icon: None,
            price: None,
            value: None,
        })
    }

    pub fn apply_price(&mut self, price: Decimal) {
        self.price = Some(price);
        self.value = Some(self.amount * price);
    }

    pub fn has_symbol(&self) -> bool {
        self.symbol.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// A per-chain or per-token failure that degraded the result instead of
/// aborting the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioFailure {
    pub chain_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub reason: String,
}

impl From<&PortfolioError> for PortfolioFailure {
    fn from(e: &PortfolioError) -> Self {
        match e {
            PortfolioError::ResolutionFailed { .. } => PortfolioFailure {
                chain_id: String::new(),
                token: None,
                reason: e.to_string(),
            },
            PortfolioError::BalanceFetchFailed { chain, .. }
            | PortfolioError::PriceFetchFailed { chain, .. } => PortfolioFailure {
                chain_id: chain.clone(),
                token: None,
                reason: e.to_string(),
            },
            PortfolioError::MetadataFetchFailed { chain, token, .. } => PortfolioFailure {
                chain_id: chain.clone(),
                token: Some(token.clone()),
                reason: e.to_string(),
            },
        }
    }
}

/// The aggregated portfolio for one request. `address` echoes the original
/// input (possibly a name), not the resolved address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioResult {
    pub address: String,
    pub values: Vec<TokenBalance>,
    /// Swallowed per-chain/per-token failures. A non-empty list means the
    /// portfolio is partial.
    pub errors: Vec<PortfolioFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn raw_conversion_applies_18_decimals() {
        let row = TokenBalance::from_raw("1", "0xTOKEN", "2000000000000000000").unwrap();
        assert_eq!(row.amount, dec!(2));
    }

    #[test]
    fn zero_and_garbage_raw_values_are_dropped() {
        assert!(TokenBalance::from_raw("1", "0xTOKEN", "0").is_none());
        assert!(TokenBalance::from_raw("1", "0xTOKEN", "not-a-number").is_none());
    }

    #[test]
    fn apply_price_sets_value() {
        let mut row = TokenBalance::from_raw("1", "0xTOKEN", "2000000000000000000").unwrap();
        row.apply_price(dec!(3.50));
        assert_eq!(row.price, Some(dec!(3.50)));
        assert_eq!(row.value, Some(dec!(7.00)));
    }

    #[test]
    fn value_stays_absent_without_price() {
        let row = TokenBalance::from_raw("1", "0xTOKEN", "1000000000000000000").unwrap();
        assert!(row.price.is_none());
        assert!(row.value.is_none());
    }
}
