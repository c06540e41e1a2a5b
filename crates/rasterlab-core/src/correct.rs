//! Peak-aligned color correction.
//!
//! Finds each channel's dominant intensity inside the meaningful [10, 245]
//! band (ignoring near-black and near-white spikes), then shifts every
//! channel so its peak lands on the average of the three peaks. Shifts are
//! unclamped.

use crate::histogram::{frequency_tables, BINS};
use crate::RasterBuffer;

/// Intensity band searched for peaks; extremes are excluded as noise.
const PEAK_LOW: usize = 10;
const PEAK_HIGH: usize = 245;

/// The most frequent intensity in [10, 245]; earlier intensity wins ties.
fn channel_peak(table: &[u32; BINS]) -> i32 {
    let mut peak = PEAK_LOW;
    let mut best = table[PEAK_LOW];
    for v in PEAK_LOW + 1..=PEAK_HIGH {
        if table[v] > best {
            best = table[v];
            peak = v;
        }
    }
    peak as i32
}

/// Shift each channel so its histogram peak aligns with the average peak.
pub fn color_correct(buffer: &RasterBuffer) -> RasterBuffer {
    let tables = frequency_tables(buffer);
    let peaks = [
        channel_peak(&tables[0]),
        channel_peak(&tables[1]),
        channel_peak(&tables[2]),
    ];
    let average = (peaks[0] + peaks[1] + peaks[2]) / 3;
    let offsets = [
        average - peaks[0],
        average - peaks[1],
        average - peaks[2],
    ];
    buffer.map_pixels(|r, g, b| (r + offsets[0], g + offsets[1], b + offsets[2]))
}
