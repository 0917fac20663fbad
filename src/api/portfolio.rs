// src/api/portfolio.rs

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::error;

use crate::error::ApiError;
use crate::portfolio::PortfolioResult;
use crate::AppState;

/// The handler function for the GET /portfolio/{address} endpoint.
/// `address` may be a raw address or a .eth name.
pub async fn get_portfolio_handler(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<PortfolioResult>, ApiError> {
    match state.portfolio.aggregate(&address).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            error!("Failed to aggregate portfolio for {}: {:?}", address, e);
            Err(e.into())
        }
    }
}
