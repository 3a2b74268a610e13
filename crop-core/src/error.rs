//! Error types for crop widget configuration.
//!
//! Geometry itself never fails: bad proposals are rolled back by the
//! solver. Only constructing a widget from options can be rejected.

use thiserror::Error;

/// Result type for crop operations.
pub type CropResult<T> = Result<T, CropError>;

/// Errors that can occur when configuring a crop widget.
#[derive(Debug, Error)]
pub enum CropError {
    /// Aspect ratio is zero, negative or not finite.
    #[error("Invalid aspect ratio: {0} (must be finite and greater than zero)")]
    InvalidAspect(f64),

    /// Handle count other than 0, 4 or 8.
    #[error("Invalid handle count: {0} (expected 0, 4 or 8)")]
    InvalidHandleCount(u8),

    /// Options failed validation for another reason.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Options JSON could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
