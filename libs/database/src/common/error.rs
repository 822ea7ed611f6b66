/// Unified database error type for connector-level operations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// PostgreSQL-specific errors (SeaORM)
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Health check did not answer in time
    #[error("Health check timed out after {0}ms")]
    HealthCheckTimeout(u128),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
