// src/api/price.rs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::ApiError;
use crate::tools::quotes;
use crate::AppState;

/// The handler function for the GET /price/{asset} endpoint.
pub async fn get_price_handler(
    State(state): State<AppState>,
    Path(asset): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    match quotes::index_price(&state.http, &state.config.exchange_api_url, &asset).await {
        Ok(price) => Ok(Json(json!({ "asset": asset, "price": price }))),
        Err(e) => {
            error!("Failed to get price for {}: {:?}", asset, e);
            Err(ApiError::Internal(e))
        }
    }
}
