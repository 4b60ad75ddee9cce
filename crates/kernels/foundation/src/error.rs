//! Value model error types.

use thiserror::Error;

/// Errors raised while constructing graph values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Data length does not match the requested geometry.
    #[error("buffer data length {len} does not match dimensions {rows}×{cols}")]
    ShapeMismatch { rows: usize, cols: usize, len: usize },

    /// The element count or byte size of the geometry does not fit in memory.
    #[error("buffer dimensions {rows}×{cols} overflow addressable storage")]
    GeometryOverflow { rows: usize, cols: usize },
}
