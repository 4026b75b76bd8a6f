//! Flow fields: deterministic maps from position and time to a heading.
//!
//! The flow-field engine perturbs every particle's velocity along the heading
//! its [`FieldSource`] returns. [`TrigField`] is the closed-form field of the
//! reference piece; [`PerlinField`] and [`CurlField`] are smoother
//! noise-based alternatives.
//!
//! All implementations are deterministic: same inputs produce the same output.

use std::f64::consts::TAU;

use noise::{NoiseFn, Perlin};

use crate::error::EngineError;

/// Names accepted by [`field_from_name`].
const FIELD_NAMES: &[&str] = &["trig", "perlin", "curl"];

/// Singularity threshold for normalising curl vectors.
const SINGULARITY_EPS: f64 = 1e-10;

/// A source of flow headings for field-based particle simulation.
pub trait FieldSource: Send + Sync {
    /// Heading in radians at position (x, y) at the given time.
    fn angle(&self, x: f64, y: f64, time: f64) -> f64;

    /// Unit direction vector `(cos angle, sin angle)`.
    fn direction(&self, x: f64, y: f64, time: f64) -> (f64, f64) {
        let a = self.angle(x, y, time);
        (a.cos(), a.sin())
    }
}

/// Sin/cos pseudo-noise: `(cos(x·s) + sin(y·s + t))·2π`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrigField {
    pub scale: f64,
}

/// Perlin noise heading: one noise octave mapped to a full turn.
pub struct PerlinField {
    noise: Perlin,
    scale: f64,
}

/// Curl noise: heading of the curl of a scalar Perlin potential, which gives
/// swirling, approximately divergence-free flow.
pub struct CurlField {
    noise: Perlin,
    scale: f64,
    eps: f64,
}

impl TrigField {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }
}

impl PerlinField {
    /// Creates a Perlin field with the given spatial scale and noise seed.
    pub fn new(scale: f64, seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
            scale,
        }
    }
}

impl CurlField {
    /// Creates a curl field; derivatives use a central difference of one
    /// unscaled unit.
    pub fn new(scale: f64, seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
            scale,
            eps: 1.0,
        }
    }
}

impl FieldSource for TrigField {
    fn angle(&self, x: f64, y: f64, time: f64) -> f64 {
        ((x * self.scale).cos() + (y * self.scale + time).sin()) * TAU
    }
}

impl FieldSource for PerlinField {
    fn angle(&self, x: f64, y: f64, time: f64) -> f64 {
        self.noise.get([x * self.scale, y * self.scale, time]) * TAU
    }
}

impl FieldSource for CurlField {
    fn angle(&self, x: f64, y: f64, time: f64) -> f64 {
        let sx = x * self.scale;
        let sy = y * self.scale;
        let eps = self.eps * self.scale;
        if eps.abs() < SINGULARITY_EPS {
            return 0.0;
        }
        // Curl of a 2D scalar potential F: (dF/dy, -dF/dx)
        let df_dy = (self.noise.get([sx, sy + eps, time]) - self.noise.get([sx, sy - eps, time]))
            / (2.0 * eps);
        let df_dx = (self.noise.get([sx + eps, sy, time]) - self.noise.get([sx - eps, sy, time]))
            / (2.0 * eps);
        if df_dy.abs() < SINGULARITY_EPS && df_dx.abs() < SINGULARITY_EPS {
            return 0.0;
        }
        (-df_dx).atan2(df_dy)
    }
}

/// Constructs a boxed field source by name (`"trig"`, `"perlin"`, `"curl"`).
pub fn field_from_name(
    name: &str,
    scale: f64,
    seed: u32,
) -> Result<Box<dyn FieldSource>, EngineError> {
    match name {
        "trig" => Ok(Box::new(TrigField::new(scale))),
        "perlin" => Ok(Box::new(PerlinField::new(scale, seed))),
        "curl" => Ok(Box::new(CurlField::new(scale, seed))),
        _ => Err(EngineError::InvalidConfig(format!(
            "unknown field '{name}', expected one of {FIELD_NAMES:?}"
        ))),
    }
}

/// Returns the names accepted by [`field_from_name`].
pub fn list_fields() -> &'static [&'static str] {
    FIELD_NAMES
}
