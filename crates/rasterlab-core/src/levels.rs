//! Levels adjustment via a closed-form quadratic tone curve.
//!
//! The curve is the exact quadratic through the three control points
//! (black, 0), (mid, 128), (white, 255), solved with Cramer's rule. It is
//! applied to every channel value and truncated without clamping, so inputs
//! below `black` can map below zero and inputs above `white` past 255.

use serde::{Deserialize, Serialize};

use crate::{EngineError, RasterBuffer};

/// The three control points of a levels adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelsParams {
    /// Input mapped to 0.
    pub black: i32,
    /// Input mapped to 128.
    pub mid: i32,
    /// Input mapped to 255.
    pub white: i32,
}

impl LevelsParams {
    /// Control points must be strictly ascending within 0-255.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.black < 0 || self.white > 255 {
            return Err(EngineError::InvalidParameter(format!(
                "levels points must lie in 0-255, got {} and {}",
                self.black, self.white
            )));
        }
        if !(self.black < self.mid && self.mid < self.white) {
            return Err(EngineError::InvalidParameter(format!(
                "levels points must be strictly ascending, got {} {} {}",
                self.black, self.mid, self.white
            )));
        }
        Ok(())
    }
}

/// A quadratic `y = a*x^2 + b*x + c` evaluated with truncation.
#[derive(Debug, Clone, Copy)]
pub struct QuadraticCurve {
    a: f64,
    b: f64,
    c: f64,
}

impl QuadraticCurve {
    /// Fit the quadratic through (black, 0), (mid, 128), (white, 255).
    pub fn fit(params: LevelsParams) -> Self {
        let (b, m, w) = (
            params.black as f64,
            params.mid as f64,
            params.white as f64,
        );

        // Cramer's rule on the 3-point interpolation system
        let det = b * b * (m - w) - b * (m * m - w * w) + (m * m * w - w * w * m);
        let det_a = -b * (128.0 - 255.0) + (128.0 * w - 255.0 * m);
        let det_b = b * b * (128.0 - 255.0) + (255.0 * m * m - 128.0 * w * w);
        let det_c = b * b * (255.0 * m - 128.0 * w) - b * (255.0 * m * m - 128.0 * w * w);

        Self {
            a: det_a / det,
            b: det_b / det,
            c: det_c / det,
        }
    }

    /// Evaluate at a channel value, truncating toward zero.
    #[inline]
    pub fn eval(&self, x: i32) -> i32 {
        let x = x as f64;
        (self.a * x * x + self.b * x + self.c) as i32
    }
}

/// Remap every channel through the fitted tone curve.
///
/// `params` must already be validated.
pub fn levels_adjust(buffer: &RasterBuffer, params: LevelsParams) -> RasterBuffer {
    let curve = QuadraticCurve::fit(params);
    buffer.map_pixels(|r, g, b| (curve.eval(r), curve.eval(g), curve.eval(b)))
}
