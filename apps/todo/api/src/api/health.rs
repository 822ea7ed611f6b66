//! Database liveness probe.

use crate::state::AppState;
use axum::{Router, extract::State, routing::get};
use axum_helpers::{AppError, errors::responses::InternalServerErrorResponse};
use database::postgres::check_health_with_timeout;
use std::time::Duration;

/// How long `/ping` waits for `SELECT 1`
pub const PING_TIMEOUT: Duration = Duration::from_secs(2);

pub fn router(state: AppState) -> Router {
    Router::new().route("/ping", get(ping)).with_state(state)
}

/// Check that the database answers
#[utoipa::path(
    get,
    path = "/ping",
    tag = "health",
    responses(
        (status = 200, description = "Database reachable", body = String),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn ping(State(state): State<AppState>) -> Result<&'static str, AppError> {
    check_health_with_timeout(&state.db, PING_TIMEOUT)
        .await
        .map_err(|e| {
            tracing::warn!("Ping failed: {}", e);
            AppError::InternalServerError("Database ping error".to_string())
        })?;

    Ok("pong")
}
