//! Lossy compression via the 2D Haar wavelet transform.
//!
//! Each channel is lifted into an f64 square matrix zero-padded to the next
//! power of two, decomposed with the Haar averaging/differencing transform,
//! thresholded by a percentile over the distinct rounded coefficient
//! magnitudes, reconstructed, and cropped back to the original extents.
//!
//! Percentage 100 is special-cased as "drop nothing": the percentile index
//! formula would read one past the end of the distinct-value list, and the
//! round trip through the transform is numerically the identity within
//! truncation.

use std::f64::consts::SQRT_2;

use crate::RasterBuffer;

/// Square f64 scratch matrix for one channel.
struct ChannelMatrix {
    size: usize,
    data: Vec<f64>,
}

impl ChannelMatrix {
    /// Lift one channel of `buffer` into a zero-padded power-of-two square.
    fn from_channel(buffer: &RasterBuffer, channel: usize) -> Self {
        let size = padded_size(buffer.height, buffer.width);
        let mut data = vec![0.0; size * size];
        for row in 0..buffer.height {
            for col in 0..buffer.width {
                data[row as usize * size + col as usize] =
                    buffer.channel(row, col, channel) as f64;
            }
        }
        Self { size, data }
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size + col]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, v: f64) {
        self.data[row * self.size + col] = v;
    }

    /// Averaging/differencing pass over the first `len` entries of row `row`.
    fn transform_row(&mut self, row: usize, len: usize) {
        let half = len / 2;
        let mut tmp = vec![0.0; len];
        for k in 0..half {
            let x = self.get(row, 2 * k);
            let y = self.get(row, 2 * k + 1);
            tmp[k] = (x + y) / SQRT_2;
            tmp[half + k] = (x - y) / SQRT_2;
        }
        for (col, v) in tmp.into_iter().enumerate() {
            self.set(row, col, v);
        }
    }

    fn transform_col(&mut self, col: usize, len: usize) {
        let half = len / 2;
        let mut tmp = vec![0.0; len];
        for k in 0..half {
            let x = self.get(2 * k, col);
            let y = self.get(2 * k + 1, col);
            tmp[k] = (x + y) / SQRT_2;
            tmp[half + k] = (x - y) / SQRT_2;
        }
        for (row, v) in tmp.into_iter().enumerate() {
            self.set(row, col, v);
        }
    }

    /// Inverse pass: rebuild interleaved pairs from (avg, diff) halves.
    fn inverse_row(&mut self, row: usize, len: usize) {
        let half = len / 2;
        let mut tmp = vec![0.0; len];
        for k in 0..half {
            let avg = self.get(row, k);
            let diff = self.get(row, half + k);
            tmp[2 * k] = (avg + diff) / SQRT_2;
            tmp[2 * k + 1] = (avg - diff) / SQRT_2;
        }
        for (col, v) in tmp.into_iter().enumerate() {
            self.set(row, col, v);
        }
    }

    fn inverse_col(&mut self, col: usize, len: usize) {
        let half = len / 2;
        let mut tmp = vec![0.0; len];
        for k in 0..half {
            let avg = self.get(k, col);
            let diff = self.get(half + k, col);
            tmp[2 * k] = (avg + diff) / SQRT_2;
            tmp[2 * k + 1] = (avg - diff) / SQRT_2;
        }
        for (row, v) in tmp.into_iter().enumerate() {
            self.set(row, col, v);
        }
    }

    /// Full forward 2D Haar decomposition.
    fn forward(&mut self) {
        let mut c = self.size;
        while c > 1 {
            for row in 0..c {
                self.transform_row(row, c);
            }
            for col in 0..c {
                self.transform_col(col, c);
            }
            c /= 2;
        }
    }

    /// Full inverse 2D Haar reconstruction (columns before rows).
    fn inverse(&mut self) {
        let mut c = 2;
        while c <= self.size {
            for col in 0..c {
                self.inverse_col(col, c);
            }
            for row in 0..c {
                self.inverse_row(row, c);
            }
            c *= 2;
        }
    }

    /// Zero every coefficient whose magnitude is strictly below `threshold`.
    fn zero_below(&mut self, threshold: f64) {
        for v in &mut self.data {
            if v.abs() < threshold {
                *v = 0.0;
            }
        }
    }
}

/// Next power of two covering both extents.
fn padded_size(height: u32, width: u32) -> usize {
    (height.max(width).max(1).next_power_of_two()) as usize
}

/// Round a magnitude to 3 decimals, the granularity the percentile uses.
#[inline]
fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Percentile threshold over the distinct rounded coefficient magnitudes of
/// one channel's matrix.
///
/// The index is `round(distinct_count * percentage / 100)`; an index that
/// rounds one past the end selects the largest distinct magnitude.
fn percentile_threshold(matrix: &ChannelMatrix, percentage: f64) -> f64 {
    let mut magnitudes: Vec<f64> = matrix.data.iter().map(|v| round3(v.abs())).collect();
    magnitudes.sort_by(f64::total_cmp);
    magnitudes.dedup();

    if magnitudes.is_empty() {
        return 0.0;
    }
    let index = (magnitudes.len() as f64 * percentage / 100.0).round() as usize;
    magnitudes[index.min(magnitudes.len() - 1)]
}

/// Compress a buffer by zeroing, per channel, the smallest `percentage` of
/// that channel's distinct Haar coefficient magnitudes, then reconstructing.
///
/// Each channel is thresholded independently: one channel's content never
/// affects another channel's result.
///
/// `percentage` must already be validated to lie in [0, 100].
pub fn compress(buffer: &RasterBuffer, percentage: f64) -> RasterBuffer {
    let mut channels = [
        ChannelMatrix::from_channel(buffer, 0),
        ChannelMatrix::from_channel(buffer, 1),
        ChannelMatrix::from_channel(buffer, 2),
    ];

    for m in &mut channels {
        m.forward();
        // 100 drops nothing; see module docs
        if percentage < 100.0 {
            let threshold = percentile_threshold(m, percentage);
            m.zero_below(threshold);
        }
        m.inverse();
    }

    let mut out = RasterBuffer::zeroed(buffer.height, buffer.width);
    for row in 0..buffer.height {
        for col in 0..buffer.width {
            out.set(
                row,
                col,
                (
                    channels[0].get(row as usize, col as usize) as i32,
                    channels[1].get(row as usize, col as usize) as i32,
                    channels[2].get(row as usize, col as usize) as i32,
                ),
            );
        }
    }
    out
}
