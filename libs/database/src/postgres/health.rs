use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::common::DatabaseError;

/// Check PostgreSQL database health
///
/// Executes `SELECT 1` to verify the pool can reach the server.
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    debug!("Running PostgreSQL health check");

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
    db.query_one_raw(stmt).await.map_err(|e| {
        DatabaseError::HealthCheckFailed(format!("PostgreSQL health check failed: {}", e))
    })?;

    debug!("PostgreSQL health check passed");
    Ok(())
}

/// [`check_health`] bounded by `deadline`
pub async fn check_health_with_timeout(
    db: &DatabaseConnection,
    deadline: Duration,
) -> Result<(), DatabaseError> {
    let start = Instant::now();

    match tokio::time::timeout(deadline, check_health(db)).await {
        Ok(result) => {
            debug!(elapsed_ms = start.elapsed().as_millis() as u64, "Health check finished");
            result
        }
        Err(_) => Err(DatabaseError::HealthCheckTimeout(deadline.as_millis())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{MockDatabase, Value};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_check_health_ok_on_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([("?column?", Value::from(1i32))])]])
            .into_connection();

        assert!(check_health(&db).await.is_ok());
    }

    #[tokio::test]
    async fn test_check_health_reports_failure() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([sea_orm::DbErr::Custom("connection reset".into())])
            .into_connection();

        let err = check_health_with_timeout(&db, Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::HealthCheckFailed(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_timeout_error_message() {
        let err = DatabaseError::HealthCheckTimeout(2000);
        assert_eq!(err.to_string(), "Health check timed out after 2000ms");
    }
}
