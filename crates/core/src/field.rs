//! Two-dimensional scalar field with toroidal wrapping and clamped values.
//!
//! A `Field` stores `width * height` f64 values in the range [0, 1] using
//! row-major layout. Generators use it as a brightness raster (the globe
//! reads a decoded texture through [`Field::sample_uv`]).

use crate::error::EngineError;

/// A 2D scalar field with values clamped to [0, 1] and toroidal coordinate wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Field {
    /// Creates a field from row-major data, validating that
    /// `data.len() == width * height`. Values are clamped to [0, 1].
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero,
    /// if `width * height` overflows `usize` or if the length is wrong.
    pub fn from_data(width: usize, height: usize, data: Vec<f64>) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        let expected = width
            .checked_mul(height)
            .ok_or(EngineError::InvalidDimensions)?;
        if data.len() != expected {
            return Err(EngineError::InvalidDimensions);
        }
        Ok(Self {
            width,
            height,
            data: data.into_iter().map(|v| v.clamp(0.0, 1.0)).collect(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Value at `(x, y)`, wrapping toroidally.
    fn get(&self, x: isize, y: isize) -> f64 {
        let xi = x.rem_euclid(self.width as isize) as usize;
        let yi = y.rem_euclid(self.height as isize) as usize;
        self.data[yi * self.width + xi]
    }

    /// Reads the cell under texture coordinates `(u, v)` in [0, 1]².
    ///
    /// `v` runs bottom-to-top (row `⌊(1 − v)·height⌋`), the convention of an
    /// equirectangular map where `v = 1` is the north pole. Coordinates at
    /// exactly 1.0 land on the last column/row instead of wrapping.
    pub fn sample_uv(&self, u: f64, v: f64) -> f64 {
        let px = ((u * self.width as f64).floor() as isize).clamp(0, self.width as isize - 1);
        let py = (((1.0 - v) * self.height as f64).floor() as isize)
            .clamp(0, self.height as isize - 1);
        self.get(px, py)
    }
}
