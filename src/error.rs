// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures inside the portfolio aggregation workflow.
///
/// `ResolutionFailed` aborts the whole request (there is no address to look
/// up). The fetch variants are scoped to one chain or one token and degrade
/// into `PortfolioResult.errors` instead of failing the request.
#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("name resolution returned no address for '{input}'")]
    ResolutionFailed { input: String },

    #[error("balance fetch failed for chain {chain}: {reason}")]
    BalanceFetchFailed { chain: String, reason: String },

    #[error("metadata fetch failed for token {token} on chain {chain}: {reason}")]
    MetadataFetchFailed {
        chain: String,
        token: String,
        reason: String,
    },

    #[error("price fetch failed for chain {chain}: {reason}")]
    PriceFetchFailed { chain: String, reason: String },
}

/// Endpoint-level errors with their HTTP status mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Internal(e) => {
                tracing::error!("internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while processing your request".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<PortfolioError> for ApiError {
    fn from(e: PortfolioError) -> Self {
        ApiError::Internal(e.into())
    }
}
