//! Drawing surfaces consumed by the flow-field engine.
//!
//! The engine never rasterises anything itself: each frame it issues a
//! translucent full-surface [`Surface::fill`] (the trail fade) followed by one
//! [`Surface::fill_circle`] per particle. [`PixelSurface`] is the CPU
//! implementation used for headless runs and PNG snapshots; browser builds
//! implement the trait over a 2D canvas context.

use crate::color::Srgb;
use crate::error::EngineError;

/// A resizable 2D drawing target.
pub trait Surface {
    /// Current `(width, height)` in pixels.
    fn size(&self) -> (f64, f64);

    /// Changes the drawing extent. Contents after a resize are unspecified.
    fn resize(&mut self, width: f64, height: f64);

    /// Blends `color` over the whole surface with opacity `alpha` in [0, 1].
    fn fill(&mut self, color: Srgb, alpha: f64);

    /// Draws an opaque filled disc centred at `(x, y)`.
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Srgb);
}

/// CPU framebuffer storing opaque sRGB pixels in row-major order.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: usize,
    height: usize,
    pixels: Vec<[f32; 3]>,
}

impl PixelSurface {
    /// Creates a black surface.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .ok_or(EngineError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            pixels: vec![[0.0; 3]; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Color of the pixel at `(x, y)`. Panics if out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Srgb {
        let [r, g, b] = self.pixels[y * self.width + x];
        Srgb {
            r: r as f64,
            g: g as f64,
            b: b as f64,
        }
    }

    /// Packs the framebuffer as RGBA8 (alpha always 255).
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&[r, g, b]| {
                let [r, g, b] = Srgb {
                    r: r as f64,
                    g: g as f64,
                    b: b as f64,
                }
                .to_rgb8();
                [r, g, b, 255u8]
            })
            .collect()
    }

    fn to_pixel(color: Srgb) -> [f32; 3] {
        [
            color.r.clamp(0.0, 1.0) as f32,
            color.g.clamp(0.0, 1.0) as f32,
            color.b.clamp(0.0, 1.0) as f32,
        ]
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(1.0) as usize;
        self.height = height.max(1.0) as usize;
        self.pixels = vec![[0.0; 3]; self.width * self.height];
    }

    fn fill(&mut self, color: Srgb, alpha: f64) {
        let a = alpha.clamp(0.0, 1.0) as f32;
        let src = Self::to_pixel(color);
        for px in &mut self.pixels {
            for (dst, s) in px.iter_mut().zip(src) {
                *dst = *dst * (1.0 - a) + s * a;
            }
        }
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Srgb) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        let src = Self::to_pixel(color);
        let r = radius.max(0.0);
        let x0 = (x - r).floor().max(0.0) as usize;
        let y0 = (y - r).floor().max(0.0) as usize;
        let x1 = ((x + r).ceil() as usize).min(self.width - 1);
        let y1 = ((y + r).ceil() as usize).min(self.height - 1);
        let r2 = r * r;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f64 + 0.5 - x;
                let dy = py as f64 + 0.5 - y;
                if dx * dx + dy * dy <= r2 {
                    self.pixels[py * self.width + px] = src;
                }
            }
        }
        // Sub-pixel discs still mark the pixel they sit in.
        let (cx, cy) = (x.floor(), y.floor());
        if cx >= 0.0 && cy >= 0.0 && (cx as usize) < self.width && (cy as usize) < self.height {
            self.pixels[cy as usize * self.width + cx as usize] = src;
        }
    }
}
