//! PostgreSQL connector and utilities
//!
//! Connection management, migration running and the health probe.

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_DATABASE_URL, PostgresConfig};
pub use connector::{connect_from_config_with_retry, connect_with_options, run_migrations};
pub use health::{check_health, check_health_with_timeout};

// Re-export SeaORM types for convenience
pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
pub use sea_orm_migration::MigratorTrait;
