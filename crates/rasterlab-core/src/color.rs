//! Color transforms: channel extraction, brightness family, sepia, brighten.
//!
//! All transforms here are per-pixel and unclamped: intermediate f64 results
//! are truncated toward zero at the point of storage (`as i32`), never
//! rounded, and values outside 0-255 are stored as-is. Narrowing happens only
//! at the codec boundary.

use serde::{Deserialize, Serialize};

use crate::{Channel, EngineError, RasterBuffer};

/// ITU-R BT.709 coefficient for red channel in luma calculation.
pub const LUMA_R: f64 = 0.2126;

/// ITU-R BT.709 coefficient for green channel in luma calculation.
pub const LUMA_G: f64 = 0.7152;

/// ITU-R BT.709 coefficient for blue channel in luma calculation.
pub const LUMA_B: f64 = 0.0722;

/// The grayscale reductions of the brightness family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrightnessMode {
    /// Per-pixel maximum channel.
    Value,
    /// Per-pixel channel average (integer division).
    Intensity,
    /// ITU-R BT.709 weighted luma, floored.
    Luma,
}

impl std::str::FromStr for BrightnessMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "value" => Ok(BrightnessMode::Value),
            "intensity" => Ok(BrightnessMode::Intensity),
            "luma" => Ok(BrightnessMode::Luma),
            other => Err(EngineError::UnsupportedMode(other.to_string())),
        }
    }
}

/// Copy one channel into all three output channels.
pub fn extract_channel(buffer: &RasterBuffer, channel: Channel) -> RasterBuffer {
    let i = channel.index();
    buffer.map_pixels(|r, g, b| {
        let v = [r, g, b][i];
        (v, v, v)
    })
}

/// Reduce each pixel to a brightness scalar, copied into all three channels.
pub fn brightness(buffer: &RasterBuffer, mode: BrightnessMode) -> RasterBuffer {
    buffer.map_pixels(|r, g, b| {
        let v = match mode {
            BrightnessMode::Value => r.max(g).max(b),
            BrightnessMode::Intensity => (r + g + b) / 3,
            BrightnessMode::Luma => {
                (LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64) as i32
            }
        };
        (v, v, v)
    })
}

/// Apply the fixed sepia matrix, truncating without clamping.
pub fn sepia(buffer: &RasterBuffer) -> RasterBuffer {
    buffer.map_pixels(|r, g, b| {
        let (r, g, b) = (r as f64, g as f64, b as f64);
        (
            (0.393 * r + 0.769 * g + 0.189 * b) as i32,
            (0.349 * r + 0.686 * g + 0.168 * b) as i32,
            (0.272 * r + 0.534 * g + 0.131 * b) as i32,
        )
    })
}

/// Add `delta` to every channel of every pixel, without clamping.
///
/// A negative delta darkens.
pub fn brighten(buffer: &RasterBuffer, delta: i32) -> RasterBuffer {
    buffer.map_pixels(|r, g, b| (r + delta, g + delta, b + delta))
}

/// Split a buffer into three grayscale component buffers (red, green, blue).
pub fn split_channels(buffer: &RasterBuffer) -> (RasterBuffer, RasterBuffer, RasterBuffer) {
    (
        extract_channel(buffer, Channel::Red),
        extract_channel(buffer, Channel::Green),
        extract_channel(buffer, Channel::Blue),
    )
}

/// Recombine three component buffers into one, taking the red channel from
/// `red`, the green from `green`, and the blue from `blue`.
///
/// Fails with `DimensionMismatch` if the operands differ in size.
pub fn combine_channels(
    red: &RasterBuffer,
    green: &RasterBuffer,
    blue: &RasterBuffer,
) -> Result<RasterBuffer, EngineError> {
    if !red.same_dimensions(green) {
        return Err(EngineError::mismatch(red, green));
    }
    if !red.same_dimensions(blue) {
        return Err(EngineError::mismatch(red, blue));
    }

    let mut out = RasterBuffer::zeroed(red.height, red.width);
    for row in 0..red.height {
        for col in 0..red.width {
            out.set(
                row,
                col,
                (
                    red.channel(row, col, 0),
                    green.channel(row, col, 1),
                    blue.channel(row, col, 2),
                ),
            );
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_channel() {
        let buf = RasterBuffer::filled(1, 1, (10, 20, 30));
        assert_eq!(extract_channel(&buf, Channel::Red).get(0, 0), (10, 10, 10));
        assert_eq!(extract_channel(&buf, Channel::Green).get(0, 0), (20, 20, 20));
        assert_eq!(extract_channel(&buf, Channel::Blue).get(0, 0), (30, 30, 30));
    }

    #[test]
    fn test_brightness_value() {
        let buf = RasterBuffer::filled(1, 1, (10, 200, 30));
        let out = brightness(&buf, BrightnessMode::Value);
        assert_eq!(out.get(0, 0), (200, 200, 200));
    }

    #[test]
    fn test_brightness_intensity_truncates() {
        // (10 + 20 + 31) / 3 = 61 / 3 = 20 with integer division
        let buf = RasterBuffer::filled(1, 1, (10, 20, 31));
        let out = brightness(&buf, BrightnessMode::Intensity);
        assert_eq!(out.get(0, 0), (20, 20, 20));
    }

    #[test]
    fn test_brightness_luma() {
        // 0.2126*100 + 0.7152*150 + 0.0722*200 = 142.98 -> 142
        let buf = RasterBuffer::filled(1, 1, (100, 150, 200));
        let out = brightness(&buf, BrightnessMode::Luma);
        assert_eq!(out.get(0, 0), (142, 142, 142));
    }

    #[test]
    fn test_sepia_reference_pixel() {
        // 0.393*10 + 0.769*20 + 0.189*30 = 24.98 -> 24, and so on per row
        let buf = RasterBuffer::filled(1, 1, (10, 20, 30));
        let out = sepia(&buf);
        assert_eq!(out.get(0, 0), (24, 22, 17));
    }

    #[test]
    fn test_sepia_does_not_clamp() {
        // White pushes all channels past 255; values must be stored unclamped
        let buf = RasterBuffer::filled(1, 1, (255, 255, 255));
        let out = sepia(&buf);
        assert_eq!(out.get(0, 0), (344, 306, 238));
    }

    #[test]
    fn test_brighten_gray_scenario() {
        let buf = RasterBuffer::filled(2, 2, (128, 128, 128));
        let lighter = brighten(&buf, 50);
        for row in 0..2 {
            for col in 0..2 {
                assert_eq!(lighter.get(row, col), (178, 178, 178));
            }
        }
    }

    #[test]
    fn test_brighten_negative_goes_below_zero() {
        let buf = RasterBuffer::filled(2, 2, (128, 128, 128));
        let darker = brighten(&buf, -200);
        assert_eq!(darker.get(1, 1), (-72, -72, -72));
    }

    #[test]
    fn test_split_combine_roundtrip() {
        let mut buf = RasterBuffer::zeroed(3, 4);
        for row in 0..3 {
            for col in 0..4 {
                let v = (row * 4 + col) as i32;
                buf.set(row, col, (v, v + 1, v + 2));
            }
        }
        let (r, g, b) = split_channels(&buf);
        let back = combine_channels(&r, &g, &b).unwrap();
        assert_eq!(back, buf);
    }

    #[test]
    fn test_combine_dimension_mismatch() {
        let a = RasterBuffer::zeroed(2, 2);
        let b = RasterBuffer::zeroed(2, 3);
        let err = combine_channels(&a, &b, &a).unwrap_err();
        assert!(matches!(err, EngineError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_brightness_mode_parse() {
        assert_eq!("luma".parse::<BrightnessMode>().unwrap(), BrightnessMode::Luma);
        assert!("lightness".parse::<BrightnessMode>().is_err());
    }
}
