//! HTTP handlers for the poem service.

pub mod health;
pub mod metrics;
pub mod poems;
