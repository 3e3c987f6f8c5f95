pub mod generator;
pub mod metrics;
pub mod prompt;
pub mod providers;

pub use generator::{PoemError, PoemGenerator};
