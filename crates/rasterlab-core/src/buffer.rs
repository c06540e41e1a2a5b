//! The raster buffer value type.
//!
//! A [`RasterBuffer`] is a fixed-size 3-channel pixel grid stored as a flat
//! row-major vector, 3 interleaved channels per pixel (0/1/2 = red/green/blue).
//!
//! Channels are `i32`, not `u8`: the engine's arithmetic (brighten, sepia,
//! color correction, levels adjust) is deliberately unclamped, so values can
//! leave the 0-255 range and must survive intact until they are narrowed at
//! the codec boundary ([`RasterBuffer::to_rgb_image`]).

use serde::{Deserialize, Serialize};

/// A color channel index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Offset of this channel within an interleaved RGB pixel.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = crate::EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Channel::Red),
            "green" => Ok(Channel::Green),
            "blue" => Ok(Channel::Blue),
            other => Err(crate::EngineError::UnsupportedMode(other.to_string())),
        }
    }
}

/// An in-memory 3-channel integer pixel grid with fixed dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    /// Height in pixels.
    pub height: u32,
    /// Width in pixels.
    pub width: u32,
    /// Channel data in row-major order (3 values per pixel).
    /// Length is always height * width * 3.
    pub pixels: Vec<i32>,
}

impl RasterBuffer {
    /// Create a buffer from existing channel data.
    pub fn new(height: u32, width: u32, pixels: Vec<i32>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (height * width * 3) as usize,
            "Pixel buffer size mismatch"
        );
        Self {
            height,
            width,
            pixels,
        }
    }

    /// Create a buffer filled with a single color.
    pub fn filled(height: u32, width: u32, color: (i32, i32, i32)) -> Self {
        let mut pixels = Vec::with_capacity((height * width * 3) as usize);
        for _ in 0..height * width {
            pixels.push(color.0);
            pixels.push(color.1);
            pixels.push(color.2);
        }
        Self {
            height,
            width,
            pixels,
        }
    }

    /// Create an all-zero buffer of the given dimensions.
    pub fn zeroed(height: u32, width: u32) -> Self {
        Self {
            height,
            width,
            pixels: vec![0; (height * width * 3) as usize],
        }
    }

    #[inline]
    fn offset(&self, row: u32, col: u32) -> usize {
        ((row * self.width + col) * 3) as usize
    }

    /// Get the pixel at (row, col).
    #[inline]
    pub fn get(&self, row: u32, col: u32) -> (i32, i32, i32) {
        let i = self.offset(row, col);
        (self.pixels[i], self.pixels[i + 1], self.pixels[i + 2])
    }

    /// Get a single channel value at (row, col).
    #[inline]
    pub fn channel(&self, row: u32, col: u32, channel: usize) -> i32 {
        self.pixels[self.offset(row, col) + channel]
    }

    /// Set the pixel at (row, col).
    #[inline]
    pub fn set(&mut self, row: u32, col: u32, color: (i32, i32, i32)) {
        let i = self.offset(row, col);
        self.pixels[i] = color.0;
        self.pixels[i + 1] = color.1;
        self.pixels[i + 2] = color.2;
    }

    /// Apply a per-pixel transform, producing a new buffer of the same size.
    pub fn map_pixels<F>(&self, mut f: F) -> RasterBuffer
    where
        F: FnMut(i32, i32, i32) -> (i32, i32, i32),
    {
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for chunk in self.pixels.chunks_exact(3) {
            let (r, g, b) = f(chunk[0], chunk[1], chunk[2]);
            pixels.push(r);
            pixels.push(g);
            pixels.push(b);
        }
        RasterBuffer {
            height: self.height,
            width: self.width,
            pixels,
        }
    }

    /// Whether another buffer has identical extents.
    #[inline]
    pub fn same_dimensions(&self, other: &RasterBuffer) -> bool {
        self.height == other.height && self.width == other.width
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> u32 {
        self.height * self.width
    }

    /// Check if this is an empty/degenerate buffer.
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0 || self.pixels.is_empty()
    }

    /// Import from an `image::RgbImage` (0-255 data at load time).
    pub fn from_rgb_image(img: &image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.as_raw().iter().map(|&v| v as i32).collect();
        Self {
            height,
            width,
            pixels,
        }
    }

    /// Export to an `image::RgbImage` for the codec layer.
    ///
    /// This is the one place where out-of-range channel values are narrowed:
    /// each value is clamped to 0-255. Returns `None` for degenerate buffers.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        let raw = self
            .pixels
            .iter()
            .map(|&v| v.clamp(0, 255) as u8)
            .collect();
        image::RgbImage::from_raw(self.width, self.height, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_buffer() {
        let buf = RasterBuffer::filled(2, 3, (10, 20, 30));
        assert_eq!(buf.height, 2);
        assert_eq!(buf.width, 3);
        assert_eq!(buf.pixels.len(), 18);
        assert_eq!(buf.get(1, 2), (10, 20, 30));
    }

    #[test]
    fn test_new_from_raw_data() {
        let buf = RasterBuffer::new(2, 2, vec![7; 12]);
        assert_eq!(buf.pixel_count(), 4);
        assert_eq!(buf.get(1, 1), (7, 7, 7));
    }

    #[test]
    fn test_get_set_roundtrip() {
        let mut buf = RasterBuffer::zeroed(4, 4);
        buf.set(2, 3, (1, -2, 300));
        assert_eq!(buf.get(2, 3), (1, -2, 300));
        assert_eq!(buf.get(0, 0), (0, 0, 0));
    }

    #[test]
    fn test_channel_accessor() {
        let buf = RasterBuffer::filled(1, 1, (5, 6, 7));
        assert_eq!(buf.channel(0, 0, 0), 5);
        assert_eq!(buf.channel(0, 0, 1), 6);
        assert_eq!(buf.channel(0, 0, 2), 7);
    }

    #[test]
    fn test_map_pixels_preserves_dimensions() {
        let buf = RasterBuffer::filled(3, 5, (1, 2, 3));
        let doubled = buf.map_pixels(|r, g, b| (r * 2, g * 2, b * 2));
        assert!(doubled.same_dimensions(&buf));
        assert_eq!(doubled.get(2, 4), (2, 4, 6));
    }

    #[test]
    fn test_same_dimensions() {
        let a = RasterBuffer::zeroed(2, 3);
        let b = RasterBuffer::zeroed(2, 3);
        let c = RasterBuffer::zeroed(3, 2);
        assert!(a.same_dimensions(&b));
        assert!(!a.same_dimensions(&c));
    }

    #[test]
    fn test_is_empty() {
        assert!(RasterBuffer::zeroed(0, 5).is_empty());
        assert!(!RasterBuffer::zeroed(1, 1).is_empty());
    }

    #[test]
    fn test_to_rgb_image_clamps() {
        let buf = RasterBuffer::filled(1, 2, (-40, 128, 400));
        let img = buf.to_rgb_image().unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [0, 128, 255]);
    }

    #[test]
    fn test_rgb_image_roundtrip() {
        let img = image::RgbImage::from_fn(3, 2, |x, y| {
            image::Rgb([(x * 10) as u8, (y * 10) as u8, 99])
        });
        let buf = RasterBuffer::from_rgb_image(&img);
        assert_eq!(buf.height, 2);
        assert_eq!(buf.width, 3);
        let back = buf.to_rgb_image().unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!("red".parse::<Channel>().unwrap(), Channel::Red);
        assert_eq!("blue".parse::<Channel>().unwrap(), Channel::Blue);
        assert!("cyan".parse::<Channel>().is_err());
    }
}
