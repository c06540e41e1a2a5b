//! The operation dispatch surface.
//!
//! Every engine capability is a variant of [`Operation`], carrying its
//! operand names and parameters. The excluded dispatcher layer builds one
//! (directly or by deserializing a scripted edit) and hands it to
//! [`execute`]. Operands are read from the store, the result is computed in
//! full, and only then is the store mutated, so a failing operation never
//! leaves partial state behind.
//!
//! [`execute_partial`] is the preview mechanism: it runs a single-source
//! operation on the left fraction of the image and recombines with the
//! untouched remainder, without materializing any intermediate store entry.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    color, composite, compress, correct, filter, histogram, levels, scale, BrightnessMode,
    BufferStore, Channel, EngineError, LevelsParams, RasterBuffer,
};

/// A single engine operation over named buffers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Operation {
    Blur { src: String, dst: String },
    Sharpen { src: String, dst: String },
    Sepia { src: String, dst: String },
    Brighten { src: String, dst: String, delta: i32 },
    ExtractChannel { src: String, dst: String, channel: Channel },
    Brightness { src: String, dst: String, mode: BrightnessMode },
    SplitChannels { src: String, dst_red: String, dst_green: String, dst_blue: String },
    CombineChannels { src_red: String, src_green: String, src_blue: String, dst: String },
    Compress { src: String, dst: String, percentage: f64 },
    Histogram { src: String, dst: String },
    ColorCorrect { src: String, dst: String },
    LevelsAdjust { src: String, dst: String, params: LevelsParams },
    SplitPreview { src: String, dst: String, percentage: f64 },
    Regain { original: String, preview: String, dst: String },
    Mask { src: String, transformed: String, stencil: String, dst: String },
    Downscale { src: String, dst: String, target_height: u32, target_width: u32 },
}

fn check_percentage(percentage: f64) -> Result<(), EngineError> {
    if !(0.0..=100.0).contains(&percentage) {
        return Err(EngineError::InvalidParameter(format!(
            "percentage must lie in 0-100, got {percentage}"
        )));
    }
    Ok(())
}

/// Execute an operation against the store.
///
/// Reads the named operands, computes a new buffer, and writes it under the
/// target name. Validation and computation happen before any mutation.
#[instrument(skip(store))]
pub fn execute(store: &mut BufferStore, op: &Operation) -> Result<(), EngineError> {
    match op {
        Operation::Blur { src, dst } => {
            let out = filter::apply_kernel(store.get(src)?, &filter::Kernel::blur());
            store.insert(dst, out);
        }
        Operation::Sharpen { src, dst } => {
            let out = filter::apply_kernel(store.get(src)?, &filter::Kernel::sharpen());
            store.insert(dst, out);
        }
        Operation::Sepia { src, dst } => {
            let out = color::sepia(store.get(src)?);
            store.insert(dst, out);
        }
        Operation::Brighten { src, dst, delta } => {
            let out = color::brighten(store.get(src)?, *delta);
            store.insert(dst, out);
        }
        Operation::ExtractChannel { src, dst, channel } => {
            let out = color::extract_channel(store.get(src)?, *channel);
            store.insert(dst, out);
        }
        Operation::Brightness { src, dst, mode } => {
            let out = color::brightness(store.get(src)?, *mode);
            store.insert(dst, out);
        }
        Operation::SplitChannels {
            src,
            dst_red,
            dst_green,
            dst_blue,
        } => {
            let (r, g, b) = color::split_channels(store.get(src)?);
            store.insert(dst_red, r);
            store.insert(dst_green, g);
            store.insert(dst_blue, b);
        }
        Operation::CombineChannels {
            src_red,
            src_green,
            src_blue,
            dst,
        } => {
            let out =
                color::combine_channels(store.get(src_red)?, store.get(src_green)?, store.get(src_blue)?)?;
            store.insert(dst, out);
        }
        Operation::Compress {
            src,
            dst,
            percentage,
        } => {
            check_percentage(*percentage)?;
            let out = compress::compress(store.get(src)?, *percentage);
            store.insert(dst, out);
        }
        Operation::Histogram { src, dst } => {
            let out = histogram::render_histogram(store.get(src)?);
            store.insert(dst, out);
        }
        Operation::ColorCorrect { src, dst } => {
            let out = correct::color_correct(store.get(src)?);
            store.insert(dst, out);
        }
        Operation::LevelsAdjust { src, dst, params } => {
            params.validate()?;
            let out = levels::levels_adjust(store.get(src)?, *params);
            store.insert(dst, out);
        }
        Operation::SplitPreview {
            src,
            dst,
            percentage,
        } => {
            check_percentage(*percentage)?;
            let out = composite::split_preview(store.get(src)?, *percentage);
            store.insert(dst, out);
        }
        Operation::Regain {
            original,
            preview,
            dst,
        } => {
            let out = composite::regain(store.get(original)?, store.get(preview)?)?;
            store.insert(dst, out);
            // The preview was a synthetic intermediate; clean it up
            store.remove(preview);
        }
        Operation::Mask {
            src,
            transformed,
            stencil,
            dst,
        } => {
            let out =
                composite::apply_mask(store.get(src)?, store.get(transformed)?, store.get(stencil)?)?;
            store.insert(dst, out);
        }
        Operation::Downscale {
            src,
            dst,
            target_height,
            target_width,
        } => {
            let source = store.get(src)?;
            if *target_height == 0
                || *target_width == 0
                || *target_height > source.height
                || *target_width > source.width
            {
                return Err(EngineError::InvalidParameter(format!(
                    "downscale target {target_height}x{target_width} must be positive and within {}x{}",
                    source.height, source.width
                )));
            }
            let out = scale::downscale(source, *target_height, *target_width);
            store.insert(dst, out);
        }
    }
    Ok(())
}

/// Apply a single-source operation to a buffer directly, outside the store.
///
/// Only operations that read one buffer and write one buffer support this;
/// it is what partial application previews are built from.
fn transform_single(op: &Operation, buffer: &RasterBuffer) -> Result<RasterBuffer, EngineError> {
    match op {
        Operation::Blur { .. } => Ok(filter::apply_kernel(buffer, &filter::Kernel::blur())),
        Operation::Sharpen { .. } => Ok(filter::apply_kernel(buffer, &filter::Kernel::sharpen())),
        Operation::Sepia { .. } => Ok(color::sepia(buffer)),
        Operation::Brighten { delta, .. } => Ok(color::brighten(buffer, *delta)),
        Operation::ExtractChannel { channel, .. } => Ok(color::extract_channel(buffer, *channel)),
        Operation::Brightness { mode, .. } => Ok(color::brightness(buffer, *mode)),
        Operation::ColorCorrect { .. } => Ok(correct::color_correct(buffer)),
        Operation::LevelsAdjust { params, .. } => {
            params.validate()?;
            Ok(levels::levels_adjust(buffer, *params))
        }
        other => Err(EngineError::InvalidParameter(format!(
            "operation does not support partial application: {other:?}"
        ))),
    }
}

/// Execute an operation on only the left `percentage` of its source, merging
/// the result with the untouched remainder.
///
/// The split, transform, and regain all happen on in-memory buffers; no
/// temporary name ever reaches the store, so scripted previews cannot
/// collide with user-chosen buffer names.
#[instrument(skip(store))]
pub fn execute_partial(
    store: &mut BufferStore,
    op: &Operation,
    percentage: f64,
) -> Result<(), EngineError> {
    check_percentage(percentage)?;
    let (src, dst) = match op {
        Operation::Blur { src, dst }
        | Operation::Sharpen { src, dst }
        | Operation::Sepia { src, dst }
        | Operation::Brighten { src, dst, .. }
        | Operation::ExtractChannel { src, dst, .. }
        | Operation::Brightness { src, dst, .. }
        | Operation::ColorCorrect { src, dst }
        | Operation::LevelsAdjust { src, dst, .. } => (src, dst),
        other => {
            return Err(EngineError::InvalidParameter(format!(
                "operation does not support partial application: {other:?}"
            )))
        }
    };

    let source = store.get(src)?;
    let preview = composite::split_preview(source, percentage);
    let transformed = transform_single(op, &preview)?;
    let merged = composite::regain(source, &transformed)?;
    store.insert(dst, merged);
    Ok(())
}
