//! Bilinear downscaling to arbitrary smaller dimensions.

use crate::RasterBuffer;

/// Downscale a buffer to `target_height` x `target_width` with bilinear
/// interpolation. Each channel is rounded to the nearest integer.
///
/// Targets must already be validated: positive and no larger than the
/// source extents.
pub fn downscale(buffer: &RasterBuffer, target_height: u32, target_width: u32) -> RasterBuffer {
    let scale_y = buffer.height as f64 / target_height as f64;
    let scale_x = buffer.width as f64 / target_width as f64;
    let mut out = RasterBuffer::zeroed(target_height, target_width);

    for row in 0..target_height {
        let sy = row as f64 * scale_y;
        let y0 = sy.floor() as u32;
        let y1 = (sy.ceil() as u32).min(buffer.height - 1);
        let fy = sy - y0 as f64;

        for col in 0..target_width {
            let sx = col as f64 * scale_x;
            let x0 = sx.floor() as u32;
            let x1 = (sx.ceil() as u32).min(buffer.width - 1);
            let fx = sx - x0 as f64;

            let mut color = [0i32; 3];
            for (channel, out_v) in color.iter_mut().enumerate() {
                let tl = buffer.channel(y0, x0, channel) as f64;
                let tr = buffer.channel(y0, x1, channel) as f64;
                let bl = buffer.channel(y1, x0, channel) as f64;
                let br = buffer.channel(y1, x1, channel) as f64;
                let top = tl + (tr - tl) * fx;
                let bottom = bl + (br - bl) * fx;
                *out_v = (top + (bottom - top) * fy).round() as i32;
            }
            out.set(row, col, (color[0], color[1], color[2]));
        }
    }
    out
}
