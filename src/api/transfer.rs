// src/api/transfer.rs

use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use serde::Deserialize;
use tracing::error;

use crate::error::ApiError;
use crate::tools::quotes;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TransferBody {
    pub from: String,
    /// Recipient address or .eth name.
    pub to: String,
    pub amount: String,
}

/// The handler function for the POST /transfer endpoint. Requires a session:
/// transfers act on behalf of a user.
pub async fn post_transfer_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<TransferBody>,
) -> Result<impl IntoResponse, ApiError> {
    state.sessions.authenticate(&headers)?;

    match quotes::prepare_transfer(
        &state.http,
        &state.config.name_resolver_url,
        &body.from,
        &body.to,
        &body.amount,
    )
    .await
    {
        Ok(receipt) => Ok(Json(receipt)),
        Err(e) => {
            error!("Failed to prepare transfer to {}: {:?}", body.to, e);
            Err(e.into())
        }
    }
}
