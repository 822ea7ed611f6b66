//! Application state management.

/// Shared application state.
///
/// Cloned into handlers that need infrastructure directly; domain routers
/// receive their own services instead.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
}
