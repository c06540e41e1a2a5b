//! Convolution filters: blur and sharpen.
//!
//! Kernels are square, odd-sized matrices of real weights. At the image
//! border, taps whose source coordinate falls outside the buffer are skipped
//! (zero-padding by omission); the accumulated weight is not renormalized, so
//! border pixels darken slightly under the blur kernel. Sums are truncated
//! toward zero at the point of storage.

use crate::{EngineError, RasterBuffer};

/// A square odd-sized convolution kernel.
#[derive(Debug, Clone)]
pub struct Kernel {
    size: usize,
    weights: Vec<f64>,
}

impl Kernel {
    /// Create a kernel from row-major weights.
    ///
    /// `size` must be odd and `weights.len()` must equal `size * size`.
    pub fn new(size: usize, weights: Vec<f64>) -> Result<Self, EngineError> {
        if size == 0 || size % 2 == 0 {
            return Err(EngineError::InvalidParameter(format!(
                "kernel size must be odd, got {size}"
            )));
        }
        if weights.len() != size * size {
            return Err(EngineError::InvalidParameter(format!(
                "kernel weights length {} does not match size {size}",
                weights.len()
            )));
        }
        Ok(Self { size, weights })
    }

    /// The 3x3 Gaussian-like blur kernel (weights sum to 1).
    pub fn blur() -> Self {
        Self {
            size: 3,
            weights: vec![
                1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0,
                1.0 / 8.0,  1.0 / 4.0, 1.0 / 8.0,
                1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0,
            ],
        }
    }

    /// The 5x5 sharpen kernel (weights sum to 1, center weight 1).
    pub fn sharpen() -> Self {
        let e = -1.0 / 8.0;
        let q = 1.0 / 4.0;
        Self {
            size: 5,
            weights: vec![
                e, e, e, e, e,
                e, q, q, q, e,
                e, q, 1.0, q, e,
                e, q, q, q, e,
                e, e, e, e, e,
            ],
        }
    }

    /// Kernel radius (half the size, rounded down).
    pub fn radius(&self) -> i64 {
        (self.size / 2) as i64
    }

    #[inline]
    fn weight(&self, dy: i64, dx: i64) -> f64 {
        let r = self.radius();
        self.weights[((dy + r) as usize) * self.size + (dx + r) as usize]
    }
}

/// Convolve a buffer with a kernel, producing a new buffer of the same size.
pub fn apply_kernel(buffer: &RasterBuffer, kernel: &Kernel) -> RasterBuffer {
    let r = kernel.radius();
    let mut out = RasterBuffer::zeroed(buffer.height, buffer.width);

    for row in 0..buffer.height {
        for col in 0..buffer.width {
            let mut acc = [0.0f64; 3];
            for dy in -r..=r {
                let sy = row as i64 + dy;
                if sy < 0 || sy >= buffer.height as i64 {
                    continue;
                }
                for dx in -r..=r {
                    let sx = col as i64 + dx;
                    if sx < 0 || sx >= buffer.width as i64 {
                        continue;
                    }
                    let w = kernel.weight(dy, dx);
                    let (pr, pg, pb) = buffer.get(sy as u32, sx as u32);
                    acc[0] += w * pr as f64;
                    acc[1] += w * pg as f64;
                    acc[2] += w * pb as f64;
                }
            }
            out.set(row, col, (acc[0] as i32, acc[1] as i32, acc[2] as i32));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_validation() {
        assert!(Kernel::new(2, vec![0.0; 4]).is_err());
        assert!(Kernel::new(3, vec![0.0; 8]).is_err());
        assert!(Kernel::new(0, vec![]).is_err());
        assert!(Kernel::new(3, vec![0.0; 9]).is_ok());
    }

    #[test]
    fn test_blur_weights_sum_to_one() {
        let sum: f64 = Kernel::blur().weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sharpen_weights_sum_to_one() {
        let sum: f64 = Kernel::sharpen().weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_blur_uniform_interior_unchanged() {
        // An interior pixel of a uniform image sees the full kernel, which
        // sums to 1, so its value is preserved exactly.
        let buf = RasterBuffer::filled(5, 5, (100, 100, 100));
        let out = apply_kernel(&buf, &Kernel::blur());
        assert_eq!(out.get(2, 2), (100, 100, 100));
    }

    #[test]
    fn test_blur_border_darkens() {
        // Border pixels lose kernel taps without renormalization. The corner
        // keeps weights 1/4 + 2*(1/8) + 1/16 = 9/16 of the uniform value:
        // 160 * 9/16 = 90.
        let buf = RasterBuffer::filled(5, 5, (160, 160, 160));
        let out = apply_kernel(&buf, &Kernel::blur());
        assert_eq!(out.get(0, 0), (90, 90, 90));
    }

    #[test]
    fn test_blur_single_pixel_image() {
        // A 1x1 image keeps only the center tap: 100 * 1/4 = 25
        let buf = RasterBuffer::filled(1, 1, (100, 100, 100));
        let out = apply_kernel(&buf, &Kernel::blur());
        assert_eq!(out.get(0, 0), (25, 25, 25));
    }

    #[test]
    fn test_sharpen_uniform_interior_unchanged() {
        let buf = RasterBuffer::filled(7, 7, (64, 64, 64));
        let out = apply_kernel(&buf, &Kernel::sharpen());
        assert_eq!(out.get(3, 3), (64, 64, 64));
    }

    #[test]
    fn test_sharpen_boosts_edge_contrast() {
        // A bright column next to dark ones gets pushed further apart
        let mut buf = RasterBuffer::zeroed(7, 7);
        for row in 0..7 {
            buf.set(row, 3, (200, 200, 200));
        }
        let out = apply_kernel(&buf, &Kernel::sharpen());
        let (center, _, _) = out.get(3, 3);
        assert!(center > 200, "edge center should be boosted, got {center}");
    }

    #[test]
    fn test_output_dimensions_match_input() {
        let buf = RasterBuffer::zeroed(4, 9);
        let out = apply_kernel(&buf, &Kernel::sharpen());
        assert!(out.same_dimensions(&buf));
    }
}
