use axum::Router;

pub mod health;
pub mod tasks;

/// All application routes, mounted at the root.
///
/// Every sub-router has its state applied, so the result is stateless and can
/// be handed to `create_router`.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .merge(tasks::router(state))
        .merge(health::router(state.clone()))
}
