//! Region compositing: split-preview, regain, and stencil masking.
//!
//! Split-preview crops the left fraction of an image so an operation can be
//! previewed on part of it; regain recombines the transformed region with the
//! untouched remainder. Masking selects per pixel between an original and a
//! transformed buffer based on a same-sized stencil.

use crate::{EngineError, RasterBuffer};

/// Crop a buffer to its left `floor(width * percentage / 100)` columns at
/// full height.
///
/// `percentage` must already be validated to lie in [0, 100]. At 0 the
/// result has zero width.
pub fn split_preview(buffer: &RasterBuffer, percentage: f64) -> RasterBuffer {
    let new_width = ((buffer.width as f64) * percentage / 100.0).floor() as u32;
    let mut out = RasterBuffer::zeroed(buffer.height, new_width);
    for row in 0..buffer.height {
        for col in 0..new_width {
            out.set(row, col, buffer.get(row, col));
        }
    }
    out
}

/// Recombine a preview with the original it was split from.
///
/// Columns below the preview's width come from the preview, the rest from
/// the original. The preview must have the original's height and must not be
/// wider than it.
pub fn regain(
    original: &RasterBuffer,
    preview: &RasterBuffer,
) -> Result<RasterBuffer, EngineError> {
    if preview.height != original.height || preview.width > original.width {
        return Err(EngineError::mismatch(original, preview));
    }

    let mut out = original.clone();
    for row in 0..preview.height {
        for col in 0..preview.width {
            out.set(row, col, preview.get(row, col));
        }
    }
    Ok(out)
}

/// Select per pixel between `original` and `transformed` using a stencil.
///
/// Where the stencil pixel is exactly (0, 0, 0) the transformed value is
/// taken; everywhere else the original is kept. The stencil and the
/// transformed buffer must both match the original's dimensions.
pub fn apply_mask(
    original: &RasterBuffer,
    transformed: &RasterBuffer,
    stencil: &RasterBuffer,
) -> Result<RasterBuffer, EngineError> {
    if !original.same_dimensions(stencil) {
        return Err(EngineError::mismatch(original, stencil));
    }
    if !original.same_dimensions(transformed) {
        return Err(EngineError::mismatch(original, transformed));
    }

    let mut out = original.clone();
    for row in 0..original.height {
        for col in 0..original.width {
            if stencil.get(row, col) == (0, 0, 0) {
                out.set(row, col, transformed.get(row, col));
            }
        }
    }
    Ok(out)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
