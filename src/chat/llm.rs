// src/chat/llm.rs
//
// Client for an OpenAI-compatible chat-completions API with tool calling.
// The model itself is an opaque collaborator; this is the whole seam.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("invalid LLM response: {0}")]
    InvalidResponse(String),
}

/// One message on the chat-completions wire.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WireMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRequest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl WireMessage {
    pub fn text(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn tool_result(tool_call_id: String, content: String) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content),
            tool_calls: None,
            tool_call_id: Some(tool_call_id),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ToolCallRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded argument object, as the API ships it.
    pub arguments: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [WireMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [Value]>,
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    error: Option<CompletionError>,
}

#[derive(Deserialize, Debug)]
struct CompletionChoice {
    message: WireMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CompletionError {
    message: String,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Runs one completion turn and returns the assistant message, which may
    /// carry tool calls instead of (or alongside) text.
    pub async fn complete(
        &self,
        model: &str,
        messages: &[WireMessage],
        tools: Option<&[Value]>,
    ) -> Result<WireMessage, LlmError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let request = CompletionRequest {
            model,
            messages,
            tools,
            temperature: 0.7,
        };

        let mut req = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::RequestFailed(format!(
                "API request failed with status {}: {}",
                status, text
            )));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(LlmError::RequestFailed(error.message));
        }

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

        if choice.finish_reason.as_deref() == Some("length") {
            debug!("completion truncated by token limit");
        }

        Ok(choice.message)
    }
}
