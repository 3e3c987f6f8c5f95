//! Request and response shapes for the poem API.

pub mod options;
pub mod poem;

pub use options::{LengthOption, PoemOptions};
pub use poem::{PoemRequest, PoemResponse};
