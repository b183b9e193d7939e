//! Position error types.

use super::models::PositionId;
use thiserror::Error;

/// Position errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    /// Position not found
    #[error("Position not found: {0}")]
    NotFound(PositionId),

    /// Position value must be positive
    #[error("Invalid position value: {0}")]
    InvalidValue(i64),

    /// Pool identifier is not a two-token pair
    #[error("Invalid pool identifier: {0}")]
    InvalidPool(String),
}

/// Result type for position operations
pub type PositionResult<T> = Result<T, PositionError>;
