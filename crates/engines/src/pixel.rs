//! Orthographic splatting of point buffers onto a [`PixelSurface`].
//!
//! Always available (no feature gate) so the `png` snapshot path and any
//! in-memory consumer share the same projection.

use drift_core::color::linear_to_srgb;
use drift_core::{ColorBuffer, LinearRgb, PixelSurface, Srgb, Surface};

/// Fraction of the surface left empty around the fitted cloud.
const MARGIN: f64 = 0.05;

/// Maps the XY plane onto pixel coordinates, Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub center: (f64, f64),
    /// Pixels per world unit.
    pub scale: f64,
}

impl View {
    /// Fits the XY bounding box of `positions` into a `width`×`height`
    /// surface, preserving aspect. An empty or single-point buffer gets a
    /// unit scale around its only point (or the origin).
    pub fn fit(positions: &[f32], width: usize, height: usize) -> Self {
        let mut min = (f64::INFINITY, f64::INFINITY);
        let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in positions.chunks_exact(3) {
            let (x, y) = (p[0] as f64, p[1] as f64);
            if !(x.is_finite() && y.is_finite()) {
                continue;
            }
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
        }
        if min.0 > max.0 {
            return Self {
                center: (0.0, 0.0),
                scale: 1.0,
            };
        }
        let center = ((min.0 + max.0) / 2.0, (min.1 + max.1) / 2.0);
        let span = (max.0 - min.0).max(max.1 - min.1);
        let usable = width.min(height) as f64 * (1.0 - 2.0 * MARGIN);
        let scale = if span > 0.0 { usable / span } else { 1.0 };
        Self { center, scale }
    }

    /// Pixel coordinates of a world-space point.
    pub fn project(&self, x: f32, y: f32, width: usize, height: usize) -> (f64, f64) {
        (
            width as f64 / 2.0 + (x as f64 - self.center.0) * self.scale,
            height as f64 / 2.0 - (y as f64 - self.center.1) * self.scale,
        )
    }
}

/// Draws every point as a disc of `radius` pixels.
pub fn splat(
    surface: &mut PixelSurface,
    positions: &[f32],
    colors: ColorBuffer<'_>,
    view: &View,
    radius: f64,
) {
    let (w, h) = (surface.width(), surface.height());
    for (i, p) in positions.chunks_exact(3).enumerate() {
        let (x, y) = view.project(p[0], p[1], w, h);
        surface.fill_circle(x, y, radius, to_srgb(colors.color_of(i)));
    }
}

fn to_srgb([r, g, b]: [f32; 3]) -> Srgb {
    linear_to_srgb(LinearRgb {
        r: r as f64,
        g: g as f64,
        b: b as f64,
    })
}
