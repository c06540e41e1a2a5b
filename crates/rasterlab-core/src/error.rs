//! Error types for engine operations.

use thiserror::Error;

/// Error types for raster engine operations.
///
/// All failures are synchronous and non-retryable. An operation that fails
/// never leaves the [`crate::BufferStore`](crate::store::BufferStore)
/// partially mutated: results are written only after full computation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An operand name is absent from the store.
    #[error("no buffer named `{0}`")]
    BufferNotFound(String),

    /// Multi-buffer operands differ in size.
    #[error("dimension mismatch: expected {expected_height}x{expected_width}, got {actual_height}x{actual_width}")]
    DimensionMismatch {
        expected_height: u32,
        expected_width: u32,
        actual_height: u32,
        actual_width: u32,
    },

    /// An out-of-range or inconsistent parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An unknown brightness/channel mode string.
    #[error("unsupported mode: {0}")]
    UnsupportedMode(String),
}

impl EngineError {
    /// Build a `DimensionMismatch` from two buffers' extents.
    pub(crate) fn mismatch(
        expected: &crate::RasterBuffer,
        actual: &crate::RasterBuffer,
    ) -> Self {
        EngineError::DimensionMismatch {
            expected_height: expected.height,
            expected_width: expected.width,
            actual_height: actual.height,
            actual_width: actual.width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::BufferNotFound("koala".to_string());
        assert_eq!(err.to_string(), "no buffer named `koala`");

        let err = EngineError::DimensionMismatch {
            expected_height: 2,
            expected_width: 3,
            actual_height: 4,
            actual_width: 5,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 2x3, got 4x5");

        let err = EngineError::UnsupportedMode("chroma".to_string());
        assert_eq!(err.to_string(), "unsupported mode: chroma");
    }
}
