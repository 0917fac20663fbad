//! # API Module
//!
//! This module contains the HTTP API handlers for the DeFi chat server.
//!
//! ## Available Endpoints
//!
//! ### Chat
//! - `POST /chat` - Run one chat turn, streaming agent events as SSE
//! - `DELETE /chat?id=...` - Delete a conversation (owner only)
//!
//! ### Crypto Tools
//! - `GET /portfolio/:address` - Multi-chain portfolio for an address or .eth name
//! - `GET /price/:asset` - USD index price for a ticker
//! - `POST /swap/quote` - Swap quote for a token pair
//! - `POST /transfer` - Prepare a token transfer
//!
//! ### Meta
//! - `GET /health` - Liveness check
//! - `POST /rpc` - JSON-RPC tool calls (same tools the model uses)

pub mod chat;
pub mod health;
pub mod portfolio;
pub mod price;
pub mod swap;
pub mod transfer;
