//! Flow-field configuration.

use drift_core::error::EngineError;
use drift_core::field_source::{field_from_name, list_fields, FieldSource};
use drift_core::params::{param_f64, param_str_list, param_string, param_usize};
use drift_core::{Palette, Srgb};
use serde_json::{json, Value};

/// Default number of particles.
pub const DEFAULT_COUNT: usize = 2000;
/// Default velocity gain applied to the field heading.
pub const DEFAULT_SPEED: f64 = 1.0;
/// Default spatial frequency of the field.
pub const DEFAULT_FLOW_FIELD_SCALE: f64 = 0.005;
/// Default opacity of the per-frame background fill.
pub const DEFAULT_TRAIL: f64 = 0.1;
/// Default pointer repulsion radius in pixels.
pub const DEFAULT_INTERACTION_RADIUS: f64 = 200.0;
/// Default field name.
pub const DEFAULT_FIELD: &str = "trig";
/// Default background fill.
pub const DEFAULT_BACKGROUND: &str = "#050505";
const DEFAULT_COLORS: &[&str] = &["#ffffff"];

/// Tunables of a [`FlowField`](crate::FlowField).
///
/// Construct with [`FlowConfig::default`] or [`FlowConfig::from_json`] and
/// check with [`FlowConfig::validate`]; the engine validates once on
/// creation and on every reconfigure.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowConfig {
    /// Pool size.
    pub count: usize,
    /// Colors a particle picks from at spawn.
    pub palette: Palette,
    /// Multiplier on the per-frame field push.
    pub speed: f64,
    /// Spatial frequency of the field (radians per pixel for `trig`).
    pub flow_field_scale: f64,
    /// Opacity in [0, 1] of the background fill drawn before the particles.
    /// 1 clears every frame; small values leave long trails.
    pub trail: f64,
    /// Pointer distance below which particles are pushed away.
    pub interaction_radius: f64,
    /// Field source name (`trig`, `perlin` or `curl`).
    pub field: String,
    pub background: Srgb,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            palette: Palette::white(),
            speed: DEFAULT_SPEED,
            flow_field_scale: DEFAULT_FLOW_FIELD_SCALE,
            trail: DEFAULT_TRAIL,
            interaction_radius: DEFAULT_INTERACTION_RADIUS,
            field: DEFAULT_FIELD.to_string(),
            background: Srgb {
                r: 5.0 / 255.0,
                g: 5.0 / 255.0,
                b: 5.0 / 255.0,
            },
        }
    }
}

impl FlowConfig {
    /// Reads a config from a JSON object. Missing keys take their defaults
    /// and unknown keys are ignored; the result is validated.
    pub fn from_json(params: &Value) -> Result<Self, EngineError> {
        let colors = param_str_list(params, "colors", DEFAULT_COLORS);
        let background = param_string(params, "background", DEFAULT_BACKGROUND);
        let config = Self {
            count: param_usize(params, "count", DEFAULT_COUNT),
            palette: Palette::from_hex(colors.as_slice())?,
            speed: param_f64(params, "speed", DEFAULT_SPEED),
            flow_field_scale: param_f64(params, "flow_field_scale", DEFAULT_FLOW_FIELD_SCALE),
            trail: param_f64(params, "trail", DEFAULT_TRAIL),
            interaction_radius: param_f64(
                params,
                "interaction_radius",
                DEFAULT_INTERACTION_RADIUS,
            ),
            field: param_string(params, "field", DEFAULT_FIELD),
            background: Srgb::from_hex(&background)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every value against its accepted range.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.count == 0 {
            return Err(EngineError::InvalidConfig("count must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.trail) {
            return Err(EngineError::InvalidConfig(format!(
                "trail {} outside [0, 1]",
                self.trail
            )));
        }
        if !self.interaction_radius.is_finite() || self.interaction_radius < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "interaction_radius {} must be finite and non-negative",
                self.interaction_radius
            )));
        }
        if !self.flow_field_scale.is_finite() {
            return Err(EngineError::InvalidConfig(
                "flow_field_scale must be finite".into(),
            ));
        }
        if !self.speed.is_finite() {
            return Err(EngineError::InvalidConfig("speed must be finite".into()));
        }
        if !list_fields().contains(&self.field.as_str()) {
            return Err(EngineError::InvalidConfig(format!(
                "unknown field '{}', expected one of {:?}",
                self.field,
                list_fields()
            )));
        }
        Ok(())
    }

    /// Builds the configured field source.
    pub(crate) fn field_source(&self, seed: u64) -> Result<Box<dyn FieldSource>, EngineError> {
        let noise_seed = (seed as u32) ^ ((seed >> 32) as u32);
        field_from_name(&self.field, self.flow_field_scale, noise_seed)
    }

    /// Current values as a JSON object (the inverse of [`from_json`](Self::from_json)).
    pub fn to_json(&self) -> Value {
        let colors: Vec<String> = self.palette.colors().iter().map(|c| c.to_hex()).collect();
        json!({
            "count": self.count,
            "colors": colors,
            "speed": self.speed,
            "flow_field_scale": self.flow_field_scale,
            "trail": self.trail,
            "interaction_radius": self.interaction_radius,
            "field": self.field,
            "background": self.background.to_hex(),
        })
    }

    /// Schema describing every key accepted by [`from_json`](Self::from_json).
    pub fn schema() -> Value {
        json!({
            "count": {
                "type": "integer",
                "default": DEFAULT_COUNT,
                "min": 1,
                "max": 20000,
                "description": "Number of particles in the pool"
            },
            "colors": {
                "type": "array",
                "default": DEFAULT_COLORS,
                "description": "Hex colors; each particle picks one at spawn"
            },
            "speed": {
                "type": "number",
                "default": DEFAULT_SPEED,
                "min": 0.0,
                "max": 10.0,
                "description": "Gain on the per-frame push along the field"
            },
            "flow_field_scale": {
                "type": "number",
                "default": DEFAULT_FLOW_FIELD_SCALE,
                "min": 0.0001,
                "max": 0.1,
                "description": "Spatial frequency of the flow field"
            },
            "trail": {
                "type": "number",
                "default": DEFAULT_TRAIL,
                "min": 0.0,
                "max": 1.0,
                "description": "Opacity of the background fill each frame; 1 disables trails"
            },
            "interaction_radius": {
                "type": "number",
                "default": DEFAULT_INTERACTION_RADIUS,
                "min": 0.0,
                "max": 2000.0,
                "description": "Pointer repulsion radius in pixels"
            },
            "field": {
                "type": "string",
                "default": DEFAULT_FIELD,
                "options": list_fields(),
                "description": "Flow field: closed-form trig, Perlin noise or curl noise"
            },
            "background": {
                "type": "string",
                "default": DEFAULT_BACKGROUND,
                "description": "Hex color of the trail fill"
            }
        })
    }
}
