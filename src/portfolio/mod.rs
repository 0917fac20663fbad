//! # Portfolio Module
//!
//! The multi-chain portfolio aggregation workflow: address resolution,
//! per-chain balance fetching, token metadata enrichment, batched USD
//! pricing, and the final ordered, symbol-filtered assembly.

pub mod aggregator;
pub mod balances;
pub mod cache;
pub mod metadata;
pub mod models;
pub mod prices;
pub mod resolver;

pub use aggregator::PortfolioService;
pub use cache::TtlCache;
pub use models::{PortfolioFailure, PortfolioResult, TokenBalance};
