//! Histogram computation and line-chart rendering.
//!
//! The frequency tables count displayable 0-255 intensities per channel;
//! values pushed outside that range by unclamped arithmetic are not counted.
//! The rendered chart is always 256x256 regardless of input size.

use crate::RasterBuffer;

/// Number of intensity bins and the fixed chart edge length.
pub const BINS: usize = 256;

/// Gridline spacing on the rendered chart.
const GRID_STEP: usize = 17;

const WHITE: (i32, i32, i32) = (255, 255, 255);
const LIGHT_GRAY: (i32, i32, i32) = (192, 192, 192);
const CHANNEL_COLORS: [(i32, i32, i32); 3] = [(255, 0, 0), (0, 255, 0), (0, 0, 255)];

/// Per-channel 256-bin frequency tables (red, green, blue).
pub fn frequency_tables(buffer: &RasterBuffer) -> [[u32; BINS]; 3] {
    let mut tables = [[0u32; BINS]; 3];
    for chunk in buffer.pixels.chunks_exact(3) {
        for (channel, &v) in chunk.iter().enumerate() {
            if (0..BINS as i32).contains(&v) {
                tables[channel][v as usize] += 1;
            }
        }
    }
    tables
}

/// Rescale each bin into 0-255 against the global min/max frequency across
/// all three channels. Flat tables (max == min) rescale to all zeros.
fn normalize(tables: &[[u32; BINS]; 3]) -> [[i32; BINS]; 3] {
    let min = tables.iter().flatten().copied().min().unwrap_or(0);
    let max = tables.iter().flatten().copied().max().unwrap_or(0);

    let mut scaled = [[0i32; BINS]; 3];
    if max == min {
        return scaled;
    }
    let range = (max - min) as f64;
    for (channel, table) in tables.iter().enumerate() {
        for (bin, &freq) in table.iter().enumerate() {
            scaled[channel][bin] = (((freq - min) as f64) * 255.0 / range).round() as i32;
        }
    }
    scaled
}

/// Render the three-channel histogram as a 256x256 line chart.
///
/// White background, light-gray gridlines every 17 pixels, then per channel
/// connected vertical segments between consecutive rescaled frequencies,
/// drawn red, green, blue (later channels draw over earlier ones). The
/// y-axis is inverted: frequency 255 lands on pixel row 0.
pub fn render_histogram(buffer: &RasterBuffer) -> RasterBuffer {
    let scaled = normalize(&frequency_tables(buffer));
    let edge = BINS as u32;
    let mut chart = RasterBuffer::filled(edge, edge, WHITE);

    for line in (0..BINS).step_by(GRID_STEP) {
        for i in 0..BINS {
            chart.set(line as u32, i as u32, LIGHT_GRAY);
            chart.set(i as u32, line as u32, LIGHT_GRAY);
        }
    }

    for (channel, color) in CHANNEL_COLORS.iter().enumerate() {
        for x in 0..BINS - 1 {
            let y0 = 255 - scaled[channel][x];
            let y1 = 255 - scaled[channel][x + 1];
            for y in y0.min(y1)..=y0.max(y1) {
                chart.set(y as u32, x as u32, *color);
            }
        }
    }
    chart
}
