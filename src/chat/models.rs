// src/chat/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// One message as submitted by the chat client.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ChatMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: Role,
    pub content: String,
}

/// Body of `POST /api/chat`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub id: String,
    pub messages: Vec<ChatMessage>,
    pub model_id: String,
}

/// An entry in the model registry the endpoint accepts ids from.
#[derive(Serialize, Clone, Debug)]
pub struct ChatModel {
    pub id: String,
    pub label: String,
    /// Identifier passed to the chat-completions API.
    pub api_identifier: String,
}

pub fn default_models() -> Vec<ChatModel> {
    vec![
        ChatModel {
            id: "gpt-4o".to_string(),
            label: "GPT 4o".to_string(),
            api_identifier: "gpt-4o".to_string(),
        },
        ChatModel {
            id: "gpt-4o-mini".to_string(),
            label: "GPT 4o mini".to_string(),
            api_identifier: "gpt-4o-mini".to_string(),
        },
    ]
}

/// A message as persisted in the chat store. `content` is JSON so tool
/// results survive round trips unchanged.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StoredMessage {
    pub id: String,
    pub role: String,
    pub content: Value,
    pub created_at: DateTime<Utc>,
}

impl StoredMessage {
    pub fn new(role: &str, content: Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: role.to_string(),
            content,
            created_at: Utc::now(),
        }
    }
}

/// A stored conversation, owned by the user who created it.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Chat {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<StoredMessage>,
}

impl Chat {
    pub fn new(id: String, user_id: String, title: String) -> Self {
        Self {
            id,
            user_id,
            title,
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }
}

/// The newest user-authored message, which seeds the title and drives the
/// agent turn.
pub fn most_recent_user_message(messages: &[ChatMessage]) -> Option<&ChatMessage> {
    messages.iter().rev().find(|m| m.role == Role::User)
}

const TITLE_MAX_CHARS: usize = 80;

/// Derives a conversation title from the first user message.
pub fn title_from_message(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= TITLE_MAX_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}…", cut.trim_end())
    }
}
