//! # Chat Module
//!
//! Conversation types, the transcript store seam, the language-model client,
//! and the tool-executing agent loop.

pub mod agent;
pub mod llm;
pub mod models;
pub mod store;

pub use store::{ChatStore, InMemoryChatStore};

/// System prompt for the chat model.
pub const SYSTEM_PROMPT: &str = "You are a friendly crypto assistant. You can look up asset \
prices, quote token swaps, prepare token transfers, and show the multi-chain portfolio of an \
address or .eth name. Use the available tools for anything market-related instead of guessing. \
Keep your responses concise and helpful.";
