//! Shape-morph configuration.

use drift_clouds::Shape;
use drift_core::error::EngineError;
use drift_core::params::{param_f64, param_str_list, param_string, param_usize};
use drift_core::{Srgb, NUM_PARTICLES};
use serde_json::{json, Value};

/// Seconds spent idle on a shape before the next transition starts.
pub const DEFAULT_CYCLE_INTERVAL: f64 = 6.0;
/// Wall-clock length of a transition: 200 frames at 60 fps.
pub const DEFAULT_TRANSITION_SECONDS: f64 = 200.0 / 60.0;
/// Progress per advance under [`Pacing::PerFrame`].
pub const DEFAULT_STEP_PER_FRAME: f64 = 0.005;
/// Full width of the mid-transition jitter.
pub const DEFAULT_TURBULENCE: f64 = 0.05;
/// Y rotation in radians per second of elapsed time.
pub const DEFAULT_ROTATION_SPEED: f64 = 0.1;
pub const DEFAULT_COLOR: &str = "#00ffff";
const DEFAULT_SHAPES: &[&str] = &["cone", "shell", "crowd"];

/// How transition progress advances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pacing {
    /// Fixed progress per advance call, independent of `dt`.
    PerFrame(f64),
    /// A transition lasts this many seconds of `dt`.
    WallClock(f64),
}

impl Pacing {
    /// Progress gained by one advance of `dt` seconds.
    pub fn increment(self, dt: f64) -> f64 {
        match self {
            Pacing::PerFrame(step) => step,
            Pacing::WallClock(seconds) => dt / seconds,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::WallClock(DEFAULT_TRANSITION_SECONDS)
    }
}

/// Tunables of a [`ShapeMorph`](crate::ShapeMorph).
#[derive(Debug, Clone, PartialEq)]
pub struct MorphConfig {
    pub cycle_interval: f64,
    pub pacing: Pacing,
    /// 0 disables the jitter.
    pub turbulence: f64,
    /// 0 disables the rotation.
    pub rotation_speed: f64,
    /// Points per shape.
    pub count: usize,
    /// Generators used by [`ShapeMorph::from_json`](crate::ShapeMorph::from_json);
    /// ignored when shapes are passed in directly.
    pub shapes: Vec<Shape>,
    /// Uniform color reported to renderers.
    pub color: Srgb,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            cycle_interval: DEFAULT_CYCLE_INTERVAL,
            pacing: Pacing::default(),
            turbulence: DEFAULT_TURBULENCE,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            count: NUM_PARTICLES,
            shapes: vec![Shape::Cone, Shape::Shell, Shape::Crowd],
            color: Srgb {
                r: 0.0,
                g: 1.0,
                b: 1.0,
            },
        }
    }
}

impl MorphConfig {
    /// Reads a config from a JSON object; missing keys take their defaults.
    ///
    /// `step_per_frame`, when present, selects [`Pacing::PerFrame`] and wins
    /// over `transition_seconds`.
    pub fn from_json(params: &Value) -> Result<Self, EngineError> {
        let pacing = match params.get("step_per_frame").and_then(Value::as_f64) {
            Some(step) => Pacing::PerFrame(step),
            None => Pacing::WallClock(param_f64(
                params,
                "transition_seconds",
                DEFAULT_TRANSITION_SECONDS,
            )),
        };
        let shapes = param_str_list(params, "shapes", DEFAULT_SHAPES)
            .iter()
            .map(|name| Shape::from_name(name))
            .collect::<Result<Vec<_>, _>>()?;
        let config = Self {
            cycle_interval: param_f64(params, "cycle_interval", DEFAULT_CYCLE_INTERVAL),
            pacing,
            turbulence: param_f64(params, "turbulence", DEFAULT_TURBULENCE),
            rotation_speed: param_f64(params, "rotation_speed", DEFAULT_ROTATION_SPEED),
            count: param_usize(params, "count", NUM_PARTICLES),
            shapes,
            color: Srgb::from_hex(&param_string(params, "color", DEFAULT_COLOR))?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.cycle_interval.is_finite() || self.cycle_interval < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "cycle_interval {} must be finite and non-negative",
                self.cycle_interval
            )));
        }
        let rate = match self.pacing {
            Pacing::PerFrame(step) => step,
            Pacing::WallClock(seconds) => seconds,
        };
        if !rate.is_finite() || rate <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "pacing {:?} must be positive",
                self.pacing
            )));
        }
        if !self.turbulence.is_finite() || self.turbulence < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "turbulence {} must be finite and non-negative",
                self.turbulence
            )));
        }
        if !self.rotation_speed.is_finite() {
            return Err(EngineError::InvalidConfig(
                "rotation_speed must be finite".into(),
            ));
        }
        if self.count == 0 {
            return Err(EngineError::InvalidConfig("count must be at least 1".into()));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        let shapes: Vec<&str> = self.shapes.iter().map(|s| s.name()).collect();
        let mut out = json!({
            "cycle_interval": self.cycle_interval,
            "turbulence": self.turbulence,
            "rotation_speed": self.rotation_speed,
            "count": self.count,
            "shapes": shapes,
            "color": self.color.to_hex(),
        });
        match self.pacing {
            Pacing::PerFrame(step) => out["step_per_frame"] = json!(step),
            Pacing::WallClock(seconds) => out["transition_seconds"] = json!(seconds),
        }
        out
    }

    pub fn schema() -> Value {
        json!({
            "cycle_interval": {
                "type": "number",
                "default": DEFAULT_CYCLE_INTERVAL,
                "min": 0.0,
                "max": 120.0,
                "description": "Seconds from the start of one transition to the start of the next"
            },
            "transition_seconds": {
                "type": "number",
                "default": DEFAULT_TRANSITION_SECONDS,
                "min": 0.1,
                "max": 60.0,
                "description": "Duration of a transition in seconds"
            },
            "step_per_frame": {
                "type": "number",
                "default": DEFAULT_STEP_PER_FRAME,
                "min": 0.0001,
                "max": 1.0,
                "description": "If set, progress per frame instead of wall-clock pacing"
            },
            "turbulence": {
                "type": "number",
                "default": DEFAULT_TURBULENCE,
                "min": 0.0,
                "max": 1.0,
                "description": "Width of the random jitter in the middle of a transition"
            },
            "rotation_speed": {
                "type": "number",
                "default": DEFAULT_ROTATION_SPEED,
                "min": -2.0,
                "max": 2.0,
                "description": "Rotation about Y in radians per second"
            },
            "count": {
                "type": "integer",
                "default": NUM_PARTICLES,
                "min": 1,
                "max": 200000,
                "description": "Points per shape"
            },
            "shapes": {
                "type": "array",
                "default": DEFAULT_SHAPES,
                "options": Shape::list_names(),
                "description": "Shapes to cycle through, in order"
            },
            "color": {
                "type": "string",
                "default": DEFAULT_COLOR,
                "description": "Hex color of every point"
            }
        })
    }
}
