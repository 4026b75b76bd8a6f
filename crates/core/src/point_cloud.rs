//! Flat point buffers shared by generators, engines and renderers.
//!
//! A [`PointCloud`] stores `x, y, z` triples contiguously as `f32`, the
//! layout a GPU vertex buffer consumes, with an optional parallel RGB color
//! buffer. Shapes that morph into each other are matched purely by index,
//! so fixed-count generators finish with [`PointCloud::pad_to`].

use glam::Vec3;

use crate::color::LinearRgb;
use crate::error::EngineError;

/// Point count of every morphable shape.
pub const NUM_PARTICLES: usize = 2000;

/// An ordered sequence of 3D points with optional per-point colors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    positions: Vec<f32>,
    colors: Option<Vec<f32>>,
}

impl PointCloud {
    /// An empty cloud with room for `points` points.
    pub fn with_capacity(points: usize) -> Self {
        Self {
            positions: Vec::with_capacity(points * 3),
            colors: None,
        }
    }

    /// Wraps an existing flat position buffer.
    ///
    /// Returns `EngineError::PointCountMismatch` if the length is not a
    /// multiple of three.
    pub fn from_positions(positions: Vec<f32>) -> Result<Self, EngineError> {
        if positions.len() % 3 != 0 {
            return Err(EngineError::PointCountMismatch {
                expected: positions.len() / 3 * 3 + 3,
                got: positions.len(),
            });
        }
        Ok(Self {
            positions,
            colors: None,
        })
    }

    /// A cloud of `count` copies of `point`.
    pub fn uniform(count: usize, point: Vec3) -> Self {
        let mut cloud = Self::with_capacity(count);
        (0..count).for_each(|_| cloud.push(point));
        cloud
    }

    /// Appends a point. Panics in debug builds if the cloud carries colors,
    /// since that would desynchronise the buffers; use [`push_colored`](Self::push_colored).
    pub fn push(&mut self, p: Vec3) {
        debug_assert!(self.colors.is_none(), "push on a colored cloud");
        self.positions.extend_from_slice(&p.to_array());
    }

    /// Appends a point with its color.
    ///
    /// The first colored push on an empty cloud enables the color buffer.
    pub fn push_colored(&mut self, p: Vec3, color: LinearRgb) {
        if self.colors.is_none() && self.positions.is_empty() {
            self.colors = Some(Vec::with_capacity(self.positions.capacity()));
        }
        debug_assert!(self.colors.is_some(), "push_colored on an uncolored cloud");
        self.positions.extend_from_slice(&p.to_array());
        if let Some(colors) = self.colors.as_mut() {
            colors.extend_from_slice(&color.to_f32());
        }
    }

    /// Pads with origin points (black if colored) until the cloud holds
    /// exactly `count` points. Truncates if it already holds more.
    pub fn pad_to(&mut self, count: usize) {
        self.positions.resize(count * 3, 0.0);
        if let Some(colors) = self.colors.as_mut() {
            colors.resize(count * 3, 0.0);
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    /// True if the cloud holds no points.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flat `x, y, z` buffer (length `len() * 3`).
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat `r, g, b` buffer in linear RGB, if the generator assigned colors.
    pub fn colors(&self) -> Option<&[f32]> {
        self.colors.as_deref()
    }

    /// The `i`-th point.
    pub fn point(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    /// Iterates over points in order.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions.chunks_exact(3).map(Vec3::from_slice)
    }

    /// Checks that the cloud holds exactly `count` points.
    pub fn expect_len(&self, count: usize) -> Result<(), EngineError> {
        if self.positions.len() != count * 3 {
            return Err(EngineError::PointCountMismatch {
                expected: count * 3,
                got: self.positions.len(),
            });
        }
        Ok(())
    }
}
