//! The core `Engine` trait that every particle engine implements.
//!
//! The trait is object-safe so engines can be used as `dyn Engine` for runtime
//! switching between the flow field, the shape morph and static clouds.

use crate::color::Srgb;
use crate::error::EngineError;
use serde_json::Value;

/// Colors accompanying an engine's position buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorBuffer<'a> {
    /// One linear-RGB triple per point, parallel to the positions.
    PerPoint(&'a [f32]),
    /// A single color for every point.
    Uniform(Srgb),
}

impl ColorBuffer<'_> {
    /// Linear-RGB color of point `i`.
    pub fn color_of(&self, i: usize) -> [f32; 3] {
        match self {
            ColorBuffer::PerPoint(data) => [data[i * 3], data[i * 3 + 1], data[i * 3 + 2]],
            ColorBuffer::Uniform(c) => c.to_linear().to_f32(),
        }
    }
}

/// Core trait for particle engines.
///
/// Each engine owns a working buffer of `x, y, z` triples, re-derives it on
/// [`step`](Engine::step) and exposes it read-only to a renderer. 2D engines
/// report `z = 0`.
///
/// This trait is **object-safe**: you can use `Box<dyn Engine>` or `&dyn Engine`
/// for runtime polymorphism.
pub trait Engine {
    /// Advance the simulation by one frame of `dt` seconds.
    fn step(&mut self, dt: f64) -> Result<(), EngineError>;

    /// Current flat position buffer (`len() % 3 == 0`).
    fn positions(&self) -> &[f32];

    /// Colors for the position buffer.
    fn colors(&self) -> ColorBuffer<'_>;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;

    /// Number of points in the buffer.
    fn point_count(&self) -> usize {
        self.positions().len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Minimal engine implementation used to verify trait object safety.
    struct DriftingPoint {
        positions: Vec<f32>,
        step_count: usize,
    }

    impl DriftingPoint {
        fn new() -> Self {
            Self {
                positions: vec![0.0; 6],
                step_count: 0,
            }
        }
    }

    impl Engine for DriftingPoint {
        fn step(&mut self, dt: f64) -> Result<(), EngineError> {
            self.step_count += 1;
            self.positions[0] += dt as f32;
            Ok(())
        }

        fn positions(&self) -> &[f32] {
            &self.positions
        }

        fn colors(&self) -> ColorBuffer<'_> {
            ColorBuffer::Uniform(Srgb::WHITE)
        }

        fn params(&self) -> Value {
            json!({"step_count": self.step_count})
        }

        fn param_schema(&self) -> Value {
            json!({
                "step_count": {
                    "type": "integer",
                    "default": 0,
                    "description": "Number of steps executed"
                }
            })
        }
    }

    #[test]
    fn engine_trait_is_object_safe() {
        let engine: Box<dyn Engine> = Box::new(DriftingPoint::new());
        assert_eq!(engine.point_count(), 2);
    }

    #[test]
    fn step_advances_state() {
        let mut engine = DriftingPoint::new();
        engine.step(0.5).unwrap();
        engine.step(0.25).unwrap();
        assert_eq!(engine.step_count, 2);
        assert_eq!(engine.positions()[0], 0.75);
    }

    #[test]
    fn params_reflect_state() {
        let mut engine = DriftingPoint::new();
        engine.step(1.0).unwrap();
        assert_eq!(engine.params()["step_count"], 1);
        assert_eq!(engine.param_schema()["step_count"]["type"], "integer");
    }

    #[test]
    fn dyn_engine_mut_reference_works() {
        let mut engine = DriftingPoint::new();
        let engine_ref: &mut dyn Engine = &mut engine;
        engine_ref.step(0.0).unwrap();
        assert_eq!(engine_ref.params()["step_count"], 1);
    }

    #[test]
    fn uniform_colors_are_linear() {
        let c = ColorBuffer::Uniform(Srgb::from_hex("#808080").unwrap());
        let [r, g, b] = c.color_of(17);
        assert!((r - 0.2158605).abs() < 1e-5, "got {r}");
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn per_point_colors_index_triples() {
        let data = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5];
        let c = ColorBuffer::PerPoint(&data);
        assert_eq!(c.color_of(1), [0.3, 0.4, 0.5]);
    }
}
