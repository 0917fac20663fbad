//! # Tools Module
//!
//! The cryptocurrency tool surface offered to the language model and to
//! JSON-RPC clients (over HTTP at `/api/rpc` or stdin/stdout in `--mcp`
//! mode).

use thiserror::Error;

pub mod handler;
pub mod protocol;
pub mod quotes;

pub use handler::{execute_tool, handle_rpc_request, tool_definitions};

/// Failure of a single tool invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    InvalidParams(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("{0}")]
    Failed(String),
}
