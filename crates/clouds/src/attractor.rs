//! Peter de Jong strange attractor.
//!
//! Iterates the 2D map
//!
//! ```text
//! x' = sin(a·y) − cos(b·x)
//! y' = sin(c·x) − cos(d·y)
//! ```
//!
//! and emits one point per iterate, flattened onto the XY plane with a thin
//! random depth. Each point is colored by blending two endpoint colors in
//! linear RGB by `(sin(x·y) + 1) / 2`.

use drift_core::prng::RandomSource;
use drift_core::{LinearRgb, PointCloud, Srgb};
use glam::Vec3;

/// Point count of the intro backdrop.
pub const ATTRACTOR_POINTS: usize = 50_000;

/// Constants of the de Jong map and its projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttractorParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    /// Initial iterate.
    pub start: (f64, f64),
    /// Multiplier from attractor space (|x|, |y| ≤ 2) to world units.
    pub scale: f64,
    /// Full width of the uniform z offset; 0 makes the output deterministic.
    pub depth_jitter: f64,
    /// Color at `mix = 0`.
    pub from: Srgb,
    /// Color at `mix = 1`.
    pub to: Srgb,
}

impl Default for AttractorParams {
    fn default() -> Self {
        Self {
            a: 1.4,
            b: -2.3,
            c: 2.4,
            d: -2.1,
            start: (0.1, 0.1),
            scale: 2.0,
            depth_jitter: 0.1,
            from: Srgb::WHITE,
            to: Srgb {
                r: 136.0 / 255.0,
                g: 136.0 / 255.0,
                b: 136.0 / 255.0,
            },
        }
    }
}

impl AttractorParams {
    /// One iteration of the map.
    pub fn iterate(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            (self.a * y).sin() - (self.b * x).cos(),
            (self.c * x).sin() - (self.d * y).cos(),
        )
    }
}

/// `count` iterates of the default attractor.
pub fn attractor(count: usize, rng: &mut dyn RandomSource) -> PointCloud {
    attractor_with(count, &AttractorParams::default(), rng)
}

/// `count` iterates of the attractor described by `params`, with colors.
pub fn attractor_with(
    count: usize,
    params: &AttractorParams,
    rng: &mut dyn RandomSource,
) -> PointCloud {
    let from: LinearRgb = params.from.to_linear();
    let to: LinearRgb = params.to.to_linear();
    let mut cloud = PointCloud::with_capacity(count);
    let mut state = params.start;
    for _ in 0..count {
        state = params.iterate(state);
        let (x, y) = state;
        let z = rng.jitter(params.depth_jitter);
        let mix = ((x * y).sin() + 1.0) / 2.0;
        cloud.push_colored(
            Vec3::new(
                (x * params.scale) as f32,
                (y * params.scale) as f32,
                z as f32,
            ),
            from.lerp(to, mix),
        );
    }
    cloud
}
