//! Health check endpoints.

use axum::extract::State;

use crate::error::AppError;
use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Answers 503 Service Unavailable if the remote data API is not reachable.
pub async fn readiness(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state.data().ping().await?;
    Ok("ready")
}
