//! # Tool Dispatcher
//!
//! The tool surface the language model (and the JSON-RPC endpoint) can call:
//!
//! - `asset_price` - current USD index price for a ticker
//! - `swap_tokens` - swap quote for a token pair
//! - `send_tokens` - prepare a transfer, resolving named recipients
//! - `portfolio` - multi-chain portfolio aggregation for an address or name
//!
//! `execute_tool` is the single entry point; the JSON-RPC methods
//! (`initialize`, `tools/list`, `tools/call` plus direct-call aliases) and
//! the chat agent loop both go through it.

use serde_json::{json, Value};
use tracing::info;

use crate::tools::protocol::{error_codes, RpcRequest, RpcResponse};
use crate::tools::{quotes, ToolError};
use crate::utils::get_required_arg;
use crate::AppState;

/// Tool descriptors advertised via `tools/list` and to the language model.
pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "asset_price",
            "description": "Get current price of a given asset using its 3 or 4 letter ticker",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "asset": { "type": "string", "description": "Asset ticker, e.g. btc or eth" }
                },
                "required": ["asset"]
            }
        }),
        json!({
            "name": "swap_tokens",
            "description": "Get a quote for swapping one token for another",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "from": { "type": "string", "description": "Source token contract address" },
                    "to": { "type": "string", "description": "Destination token contract address" },
                    "amount": { "type": "string", "description": "Raw amount of the source token" }
                },
                "required": ["from", "to", "amount"]
            }
        }),
        json!({
            "name": "send_tokens",
            "description": "Send tokens to another address or .eth name",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "from": { "type": "string" },
                    "to": { "type": "string", "description": "Recipient address or .eth name" },
                    "amount": { "type": "string" }
                },
                "required": ["from", "to", "amount"]
            }
        }),
        json!({
            "name": "portfolio",
            "description": "Get the multi-chain token portfolio of an address or .eth name, with USD values",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "address": { "type": "string", "description": "Wallet address or .eth name" }
                },
                "required": ["address"]
            }
        }),
    ]
}

/// Runs one tool call and returns its JSON payload.
pub async fn execute_tool(state: &AppState, name: &str, args: &Value) -> Result<Value, ToolError> {
    match name {
        "asset_price" => {
            let asset: String = get_required_arg(args, "asset")?;
            let price =
                quotes::index_price(&state.http, &state.config.exchange_api_url, &asset)
                    .await
                    .map_err(|e| ToolError::Failed(e.to_string()))?;
            Ok(json!({ "asset": asset, "price": price }))
        }
        "swap_tokens" => {
            let from: String = get_required_arg(args, "from")?;
            let to: String = get_required_arg(args, "to")?;
            let amount: String = get_required_arg(args, "amount")?;
            let quote = quotes::swap_quote(
                &state.http,
                &state.config.provider_api_url,
                state.config.provider_api_key.as_deref(),
                &from,
                &to,
                &amount,
            )
            .await
            .map_err(|e| ToolError::Failed(e.to_string()))?;
            serde_json::to_value(quote).map_err(|e| ToolError::Failed(e.to_string()))
        }
        "send_tokens" => {
            let from: String = get_required_arg(args, "from")?;
            let to: String = get_required_arg(args, "to")?;
            let amount: String = get_required_arg(args, "amount")?;
            let receipt = quotes::prepare_transfer(
                &state.http,
                &state.config.name_resolver_url,
                &from,
                &to,
                &amount,
            )
            .await
            .map_err(|e| ToolError::Failed(e.to_string()))?;
            serde_json::to_value(receipt).map_err(|e| ToolError::Failed(e.to_string()))
        }
        "portfolio" => {
            let address: String = get_required_arg(args, "address")?;
            let result = state
                .portfolio
                .aggregate(&address)
                .await
                .map_err(|e| ToolError::Failed(e.to_string()))?;
            serde_json::to_value(result).map_err(|e| ToolError::Failed(e.to_string()))
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

// Wraps a tool payload so every client gets a text content array alongside
// the structured data.
fn texty_result(text: String, payload: Value) -> Value {
    let content = json!([{ "type": "text", "text": text }]);
    match payload {
        Value::Object(mut map) => {
            if !map.contains_key("content") {
                map.insert("content".into(), content);
            }
            Value::Object(map)
        }
        other => json!({ "data": other, "content": content }),
    }
}

/// Main dispatcher for incoming JSON-RPC requests.
pub async fn handle_rpc_request(req: RpcRequest, state: AppState) -> Option<RpcResponse> {
    info!("Handling RPC request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => RpcResponse::success(
            req.id,
            json!({
                "protocolVersion": "2024-11-05",
                "serverInfo": { "name": "defichat-server", "version": env!("CARGO_PKG_VERSION") },
                "capabilities": { "tools": {} }
            }),
        ),
        "tools/list" => RpcResponse::success(req.id, json!({ "tools": tool_definitions() })),
        "tools/call" => handle_tool_call(req, state).await,
        // Convenience aliases so tools can be invoked as direct methods;
        // rewritten into tools/call to reuse the same logic.
        "asset_price" | "swap_tokens" | "send_tokens" | "portfolio" => {
            let name = req.method.clone();
            let wrapped = RpcRequest {
                jsonrpc: req.jsonrpc.clone(),
                id: req.id.clone(),
                method: "tools/call".to_string(),
                params: Some(json!({
                    "name": name,
                    "arguments": req.params.clone().unwrap_or_else(|| json!({}))
                })),
            };
            handle_tool_call(wrapped, state).await
        }
        _ => RpcResponse::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

async fn handle_tool_call(req: RpcRequest, state: AppState) -> RpcResponse {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return RpcResponse::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(|n| n.as_str()) {
        Some(name) => name.to_string(),
        None => {
            return RpcResponse::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'name' field in params".into(),
            )
        }
    };

    let empty_args = json!({});
    let args = params.get("arguments").unwrap_or(&empty_args);

    match execute_tool(&state, &tool_name, args).await {
        Ok(payload) => {
            let summary = format!("Tool '{}' completed", tool_name);
            RpcResponse::success(req.id, texty_result(summary, payload))
        }
        Err(e) => {
            let code = match &e {
                ToolError::InvalidParams(_) => error_codes::INVALID_PARAMS,
                ToolError::UnknownTool(_) => error_codes::METHOD_NOT_FOUND,
                ToolError::Failed(_) => error_codes::INTERNAL_ERROR,
            };
            RpcResponse::error(req.id, code, e.to_string())
        }
    }
}
