//! Server infrastructure module.
//!
//! - Router assembly with Swagger UI, tracing and CORS
//! - Serving with graceful shutdown and a cleanup hook
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_app, create_router};
//!
//! let router = create_router::<ApiDoc>(routes)?;
//! create_app(router, &ServerConfig::default(), async move { db.close().await.ok(); }).await?;
//! ```

pub mod app;
pub mod shutdown;

pub use app::{DEFAULT_SHUTDOWN_TIMEOUT, create_app, create_router};
pub use shutdown::shutdown_signal;
