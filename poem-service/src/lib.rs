//! poem-service: turns poem parameters into a Gemini prompt and returns the
//! generated poem over HTTP.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
