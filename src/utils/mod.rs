//! Rendering helpers and random sources

pub mod display;
pub mod random;

pub use display::{ColorOutput, GridFormatter};
pub use random::seeded_source;
