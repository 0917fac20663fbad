// src/chat/agent.rs
//
// The agent loop behind POST /api/chat: call the model with the tool set,
// execute any tool calls it returns, feed results back, and stop on the
// first plain-text reply or after MAX_STEPS rounds.

use futures::channel::mpsc::UnboundedSender;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::chat::llm::WireMessage;
use crate::chat::models::StoredMessage;
use crate::tools::{execute_tool, tool_definitions};
use crate::AppState;

/// Cap on model round trips per chat turn.
pub const MAX_STEPS: usize = 5;

/// Events streamed to the chat client while the turn runs.
#[derive(Serialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    Text { content: String },
    ToolCall { name: String, arguments: Value },
    ToolResult { name: String, result: Value },
    Error { message: String },
    Done,
}

/// The tool descriptors reshaped into the chat-completions `tools` format.
pub fn llm_tools() -> Vec<Value> {
    tool_definitions()
        .into_iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool["name"],
                    "description": tool["description"],
                    "parameters": tool["inputSchema"],
                }
            })
        })
        .collect()
}

/// Runs one chat turn. Streams events into `events` and returns the messages
/// to persist. Only completed tool calls are ever returned, so the stored
/// transcript needs no further sanitizing.
pub async fn run_agent(
    state: AppState,
    model: String,
    mut messages: Vec<WireMessage>,
    events: UnboundedSender<AgentEvent>,
) -> Vec<StoredMessage> {
    let tools = llm_tools();
    let mut produced: Vec<StoredMessage> = Vec::new();

    for _ in 0..MAX_STEPS {
        let reply = match state.llm.complete(&model, &messages, Some(&tools)).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("agent turn aborted: {}", e);
                let _ = events.unbounded_send(AgentEvent::Error {
                    message: e.to_string(),
                });
                break;
            }
        };

        match reply.tool_calls.clone() {
            Some(calls) if !calls.is_empty() => {
                messages.push(reply);
                for call in calls {
                    let args: Value =
                        serde_json::from_str(&call.function.arguments).unwrap_or_else(|_| json!({}));
                    let name = call.function.name.clone();

                    let _ = events.unbounded_send(AgentEvent::ToolCall {
                        name: name.clone(),
                        arguments: args.clone(),
                    });

                    let result = match execute_tool(&state, &name, &args).await {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!("tool '{}' failed: {}", name, e);
                            json!({ "error": e.to_string() })
                        }
                    };

                    let _ = events.unbounded_send(AgentEvent::ToolResult {
                        name: name.clone(),
                        result: result.clone(),
                    });

                    produced.push(StoredMessage::new(
                        "tool",
                        json!({ "tool": name, "result": result }),
                    ));
                    messages.push(WireMessage::tool_result(
                        call.id,
                        serde_json::to_string(&result).unwrap_or_else(|_| "{}".to_string()),
                    ));
                }
                // Loop for another model round with the tool results in context
            }
            _ => {
                let text = reply.content.unwrap_or_default();
                if !text.is_empty() {
                    let _ = events.unbounded_send(AgentEvent::Text {
                        content: text.clone(),
                    });
                    produced.push(StoredMessage::new("assistant", json!(text)));
                }
                break;
            }
        }
    }

    let _ = events.unbounded_send(AgentEvent::Done);
    produced
}
