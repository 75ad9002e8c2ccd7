//! Error types for grid construction, generation and rule parsing

use crate::grid::{Axis, Coord};
use thiserror::Error;

/// Errors raised by the generation core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A rule string (or preset name) that does not match the rule grammar
    #[error("invalid rule {rule:?}: {reason}")]
    InvalidRule { rule: String, reason: String },

    /// A partition was requested on a span with no interior line
    #[error("cannot partition along {axis}: {reason}")]
    InvalidPartition { axis: Axis, reason: String },

    #[error("coordinate ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i32, y: i32 },

    /// Stored grid data whose cell list does not fit its extents
    #[error("malformed grid: {0}")]
    MalformedGrid(String),
}

impl GridError {
    pub(crate) fn invalid_rule(rule: &str, reason: impl Into<String>) -> Self {
        GridError::InvalidRule {
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_bounds((x, y): Coord) -> Self {
        GridError::OutOfBounds { x, y }
    }
}

pub type GridResult<T> = std::result::Result<T, GridError>;
