// src/api/chat.rs

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use tracing::debug;

use crate::chat::agent::run_agent;
use crate::chat::llm::WireMessage;
use crate::chat::models::{most_recent_user_message, title_from_message, Chat, ChatRequest, StoredMessage};
use crate::chat::SYSTEM_PROMPT;
use crate::error::ApiError;
use crate::AppState;

/// `POST /api/chat` - runs one agent turn and streams events back as SSE.
pub async fn post_chat_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.sessions.authenticate(&headers)?;

    let model = state
        .models
        .iter()
        .find(|m| m.id == body.model_id)
        .ok_or_else(|| ApiError::NotFound("Model not found".to_string()))?
        .clone();

    let user_message = most_recent_user_message(&body.messages)
        .ok_or_else(|| ApiError::BadRequest("No user message found".to_string()))?
        .clone();

    match state.chats.get(&body.id).await {
        Some(chat) if chat.user_id != session.user_id => return Err(ApiError::Unauthorized),
        Some(_) => {}
        None => {
            let title = title_from_message(&user_message.content);
            state
                .chats
                .save(Chat::new(body.id.clone(), session.user_id.clone(), title))
                .await;
        }
    }

    state
        .chats
        .append_messages(
            &body.id,
            vec![StoredMessage::new("user", json!(user_message.content))],
        )
        .await;

    // Conversation context for the model: system prompt plus the client's
    // message history as plain text turns.
    let mut wire = vec![WireMessage::text("system", SYSTEM_PROMPT)];
    wire.extend(
        body.messages
            .iter()
            .map(|m| WireMessage::text(m.role.as_str(), &m.content)),
    );

    let (tx, rx) = futures::channel::mpsc::unbounded();
    let chat_id = body.id.clone();
    let agent_state = state.clone();
    tokio::spawn(async move {
        let produced = run_agent(agent_state.clone(), model.api_identifier, wire, tx).await;
        debug!("agent turn for chat {} produced {} messages", chat_id, produced.len());
        if !produced.is_empty() {
            agent_state.chats.append_messages(&chat_id, produced).await;
        }
    });

    let stream = rx.map(|event| {
        Ok::<Event, Infallible>(
            Event::default()
                .json_data(&event)
                .unwrap_or_else(|_| Event::default().data("{}")),
        )
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[derive(Debug, Deserialize)]
pub struct DeleteChatParams {
    pub id: Option<String>,
}

/// `DELETE /api/chat?id=...` - removes a conversation, gated on ownership.
pub async fn delete_chat_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<DeleteChatParams>,
) -> Result<impl IntoResponse, ApiError> {
    let id = params
        .id
        .ok_or_else(|| ApiError::NotFound("chat id is required".to_string()))?;

    let session = state.sessions.authenticate(&headers)?;

    let chat = state
        .chats
        .get(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("no chat with id {}", id)))?;

    if chat.user_id != session.user_id {
        return Err(ApiError::Unauthorized);
    }

    state.chats.delete(&id).await;
    Ok((StatusCode::OK, "Chat deleted"))
}
