// src/api/swap.rs

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use tracing::error;

use crate::error::ApiError;
use crate::tools::quotes;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SwapQuoteBody {
    pub from: String,
    pub to: String,
    /// Raw amount of the source token.
    pub amount: String,
}

/// The handler function for the POST /swap/quote endpoint.
pub async fn post_swap_quote_handler(
    State(state): State<AppState>,
    Json(body): Json<SwapQuoteBody>,
) -> Result<impl IntoResponse, ApiError> {
    match quotes::swap_quote(
        &state.http,
        &state.config.provider_api_url,
        state.config.provider_api_key.as_deref(),
        &body.from,
        &body.to,
        &body.amount,
    )
    .await
    {
        Ok(quote) => Ok(Json(quote)),
        Err(e) => {
            error!(
                "Failed to quote swap {} -> {}: {:?}",
                body.from, body.to, e
            );
            Err(ApiError::Internal(e))
        }
    }
}
