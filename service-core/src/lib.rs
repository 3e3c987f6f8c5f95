//! service-core: shared HTTP infrastructure for the poem service.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

pub use axum;
pub use tower_http;
pub use tracing;
