//! Pure buffer math for the morph engine: easing, interpolation, turbulence
//! and the Y rotation.

use drift_core::prng::RandomSource;
use glam::{Mat3, Vec3};

/// Progress band, exclusive at both ends, inside which turbulence is added.
pub const TURBULENCE_BAND: (f64, f64) = (0.1, 0.9);

/// Cubic ease `t²(3 − 2t)`. Exact at 0 and 1.
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Writes `from·(1 − s) + to·s` into `out`, component by component.
///
/// All three slices must have the same length.
pub fn blend_into(out: &mut [f32], from: &[f32], to: &[f32], s: f64) {
    debug_assert!(out.len() == from.len() && from.len() == to.len());
    let s = s as f32;
    let r = 1.0 - s;
    for ((o, a), b) in out.iter_mut().zip(from).zip(to) {
        *o = a * r + b * s;
    }
}

/// Adds `(u − 0.5)·amplitude` to every component.
pub fn add_turbulence(buf: &mut [f32], amplitude: f64, rng: &mut dyn RandomSource) {
    for v in buf.iter_mut() {
        *v += rng.jitter(amplitude) as f32;
    }
}

/// Whether turbulence applies at raw (un-eased) progress `t`.
pub fn in_turbulence_band(t: f64) -> bool {
    t > TURBULENCE_BAND.0 && t < TURBULENCE_BAND.1
}

/// Rotates every `x, y, z` triple about the Y axis by `angle` radians.
pub fn rotate_y(buf: &mut [f32], angle: f32) {
    if angle == 0.0 {
        return;
    }
    let m = Mat3::from_rotation_y(angle);
    for p in buf.chunks_exact_mut(3) {
        let r = m * Vec3::new(p[0], p[1], p[2]);
        p.copy_from_slice(&r.to_array());
    }
}
