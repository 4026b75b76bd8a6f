//! A generated cloud driven as an engine: no motion except a spin about Z.

use drift_clouds::{
    attractor_with, globe, AttractorParams, GlobeTexture, RegionTable, ATTRACTOR_POINTS,
    GLOBE_SAMPLES,
};
use drift_core::error::EngineError;
use drift_core::params::{param_f64, param_string, param_usize};
use drift_core::{ColorBuffer, Engine, PointCloud, Srgb, Xorshift64};
use glam::{Mat3, Vec3};
use log::debug;
use serde_json::{json, Value};

/// 0.001 rad per frame at 60 fps.
pub const DEFAULT_SPIN: f64 = 0.06;

/// Which generator produced the cloud; drives `params()`.
#[derive(Debug, Clone, PartialEq)]
enum Source {
    Attractor { params: AttractorParams, count: usize },
    Globe { samples: usize, texture: String },
}

/// An immutable cloud rotated about Z by `spin` rad/s.
#[derive(Debug, Clone)]
pub struct StillCloud {
    cloud: PointCloud,
    buffer: Vec<f32>,
    spin: f64,
    angle: f64,
    source: Source,
}

impl StillCloud {
    fn new(cloud: PointCloud, spin: f64, source: Source) -> Self {
        let buffer = cloud.positions().to_vec();
        Self {
            cloud,
            buffer,
            spin,
            angle: 0.0,
            source,
        }
    }

    /// The de Jong attractor intro cloud.
    ///
    /// Params: `count`, `a`, `b`, `c`, `d`, `depth_jitter`, `from`, `to`
    /// (hex colors) and `spin`.
    pub fn attractor(seed: u64, params: &Value) -> Result<Self, EngineError> {
        let defaults = AttractorParams::default();
        let attractor = AttractorParams {
            a: param_f64(params, "a", defaults.a),
            b: param_f64(params, "b", defaults.b),
            c: param_f64(params, "c", defaults.c),
            d: param_f64(params, "d", defaults.d),
            depth_jitter: param_f64(params, "depth_jitter", defaults.depth_jitter),
            from: Srgb::from_hex(&param_string(params, "from", &defaults.from.to_hex()))?,
            to: Srgb::from_hex(&param_string(params, "to", &defaults.to.to_hex()))?,
            ..defaults
        };
        let count = param_usize(params, "count", ATTRACTOR_POINTS);
        if count == 0 {
            return Err(EngineError::InvalidConfig("count must be at least 1".into()));
        }
        let cloud = attractor_with(count, &attractor, &mut Xorshift64::new(seed));
        Ok(Self::new(
            cloud,
            spin(params)?,
            Source::Attractor {
                params: attractor,
                count,
            },
        ))
    }

    /// The textured globe.
    ///
    /// Params: `texture` (image path), `samples`, `regions` (a region table
    /// object, default the visibility table) and `spin`. A missing or
    /// unreadable texture yields an empty cloud.
    pub fn globe(seed: u64, params: &Value) -> Result<Self, EngineError> {
        let path = param_string(params, "texture", "");
        let texture = load_texture(&path);
        let regions = match params.get("regions") {
            Some(table) => RegionTable::from_json(&table.to_string())?,
            None => RegionTable::visibility(),
        };
        let samples = param_usize(params, "samples", GLOBE_SAMPLES);
        let cloud = globe(&texture, &regions, samples, &mut Xorshift64::new(seed));
        Ok(Self::new(
            cloud,
            spin(params)?,
            Source::Globe {
                samples,
                texture: path,
            },
        ))
    }

    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    /// Current rotation about Z in radians.
    pub fn angle(&self) -> f64 {
        self.angle
    }
}

fn spin(params: &Value) -> Result<f64, EngineError> {
    let spin = param_f64(params, "spin", DEFAULT_SPIN);
    if !spin.is_finite() {
        return Err(EngineError::InvalidConfig("spin must be finite".into()));
    }
    Ok(spin)
}

#[cfg(feature = "png")]
fn load_texture(path: &str) -> GlobeTexture {
    if path.is_empty() {
        debug!("no globe texture given");
        return GlobeTexture::Pending;
    }
    GlobeTexture::load(std::path::Path::new(path))
}

#[cfg(not(feature = "png"))]
fn load_texture(path: &str) -> GlobeTexture {
    if path.is_empty() {
        debug!("no globe texture given");
        return GlobeTexture::Pending;
    }
    GlobeTexture::Failed("texture decoding is not compiled in".into())
}

impl Engine for StillCloud {
    fn step(&mut self, dt: f64) -> Result<(), EngineError> {
        self.angle += self.spin * dt;
        let rotation = Mat3::from_rotation_z(self.angle as f32);
        for (out, p) in self.buffer.chunks_exact_mut(3).zip(self.cloud.points()) {
            let r: Vec3 = rotation * p;
            out.copy_from_slice(&r.to_array());
        }
        Ok(())
    }

    fn positions(&self) -> &[f32] {
        &self.buffer
    }

    fn colors(&self) -> ColorBuffer<'_> {
        match self.cloud.colors() {
            Some(colors) => ColorBuffer::PerPoint(colors),
            None => ColorBuffer::Uniform(Srgb::WHITE),
        }
    }

    fn params(&self) -> Value {
        match &self.source {
            Source::Attractor { params, count } => json!({
                "count": count,
                "a": params.a,
                "b": params.b,
                "c": params.c,
                "d": params.d,
                "depth_jitter": params.depth_jitter,
                "from": params.from.to_hex(),
                "to": params.to.to_hex(),
                "spin": self.spin,
            }),
            Source::Globe { samples, texture } => json!({
                "samples": samples,
                "texture": texture,
                "spin": self.spin,
            }),
        }
    }

    fn param_schema(&self) -> Value {
        let spin = json!({
            "type": "number",
            "default": DEFAULT_SPIN,
            "min": -1.0,
            "max": 1.0,
            "description": "Rotation about Z in radians per second"
        });
        match &self.source {
            Source::Attractor { .. } => json!({
                "count": {"type": "integer", "default": ATTRACTOR_POINTS, "min": 1, "max": 1_000_000,
                          "description": "Number of iterates"},
                "a": {"type": "number", "default": 1.4, "min": -3.0, "max": 3.0, "description": "de Jong constant a"},
                "b": {"type": "number", "default": -2.3, "min": -3.0, "max": 3.0, "description": "de Jong constant b"},
                "c": {"type": "number", "default": 2.4, "min": -3.0, "max": 3.0, "description": "de Jong constant c"},
                "d": {"type": "number", "default": -2.1, "min": -3.0, "max": 3.0, "description": "de Jong constant d"},
                "depth_jitter": {"type": "number", "default": 0.1, "min": 0.0, "max": 2.0,
                                 "description": "Width of the random z offset"},
                "from": {"type": "string", "default": "#ffffff", "description": "Color where sin(x*y) = -1"},
                "to": {"type": "string", "default": "#888888", "description": "Color where sin(x*y) = 1"},
                "spin": spin,
            }),
            Source::Globe { .. } => json!({
                "samples": {"type": "integer", "default": GLOBE_SAMPLES, "min": 1, "max": 1_000_000,
                            "description": "Texture lookups; output size depends on land coverage"},
                "texture": {"type": "string", "default": "",
                            "description": "Path of an equirectangular land-mask image"},
                "regions": {"type": "object",
                            "description": "Region table; defaults to the built-in visibility table"},
                "spin": spin,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attractor_defaults() {
        let still = StillCloud::attractor(1, &json!({"count": 1000})).unwrap();
        assert_eq!(still.point_count(), 1000);
        assert!(matches!(still.colors(), ColorBuffer::PerPoint(c) if c.len() == 3000));
        assert_eq!(still.params()["a"], 1.4);
    }

    #[test]
    fn spin_rotates_about_z_and_keeps_depth() {
        let mut still = StillCloud::attractor(1, &json!({"count": 50, "spin": 1.0})).unwrap();
        let before = still.positions().to_vec();
        still.step(std::f64::consts::FRAC_PI_2).unwrap();
        let after = still.positions();
        for (b, a) in before.chunks(3).zip(after.chunks(3)) {
            assert!((a[0] + b[1]).abs() < 1e-4, "{b:?} -> {a:?}");
            assert!((a[1] - b[0]).abs() < 1e-4);
            assert_eq!(a[2], b[2]);
        }
    }

    #[test]
    fn zero_spin_is_still() {
        let mut still = StillCloud::attractor(2, &json!({"count": 20, "spin": 0.0})).unwrap();
        let before = still.positions().to_vec();
        for _ in 0..10 {
            still.step(1.0 / 60.0).unwrap();
        }
        assert_eq!(still.positions(), before.as_slice());
    }

    #[test]
    fn globe_without_texture_is_empty() {
        let still = StillCloud::globe(1, &json!({})).unwrap();
        assert_eq!(still.point_count(), 0);
        let missing = StillCloud::globe(1, &json!({"texture": "/nonexistent/earth.png"})).unwrap();
        assert!(missing.cloud().is_empty());
    }

    #[test]
    fn bad_attractor_color_is_reported() {
        let result = StillCloud::attractor(1, &json!({"from": "white"}));
        assert!(matches!(result, Err(EngineError::InvalidColor(_))));
    }

    #[test]
    fn schemas_cover_params() {
        for still in [
            StillCloud::attractor(1, &json!({"count": 10})).unwrap(),
            StillCloud::globe(1, &json!({})).unwrap(),
        ] {
            let schema = still.param_schema();
            for key in still.params().as_object().unwrap().keys() {
                assert!(schema.get(key).is_some(), "schema missing {key}");
            }
        }
    }
}
