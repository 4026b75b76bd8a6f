//! Reproducible description of an engine run.
//!
//! A [`Seed`] captures everything needed to recreate a snapshot:
//! engine name, surface dimensions, parameters, PRNG seed, and frame count.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Nominal frame duration used when replaying a run headlessly.
pub const FRAME_SECONDS: f64 = 1.0 / 60.0;

/// Reproducible description of an engine run.
///
/// Two identical `Seed` values fed to the same binary produce bit-identical
/// output: every random draw comes from a `Xorshift64` seeded with `seed`, and
/// frames advance by [`FRAME_SECONDS`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub engine: String,
    pub width: usize,
    pub height: usize,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub frames: usize,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Seed {
    /// Creates a new Seed with default params (`{}`) and frames (`0`).
    pub fn new(engine: &str, width: usize, height: usize, seed: u64) -> Self {
        Self {
            engine: engine.to_string(),
            width,
            height,
            params: empty_params(),
            seed,
            frames: 0,
        }
    }

    /// Validates that the seed has non-zero dimensions, that
    /// `width * height` does not overflow, and that params is an object.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(EngineError::InvalidDimensions)?;
        if !self.params.is_object() {
            return Err(EngineError::InvalidConfig(
                "seed params must be a JSON object".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_seed_with_default_params_and_frames() {
        let s = Seed::new("flow", 800, 600, 42);
        assert_eq!(s.engine, "flow");
        assert_eq!(s.width, 800);
        assert_eq!(s.height, 600);
        assert_eq!(s.seed, 42);
        assert_eq!(s.frames, 0);
        assert_eq!(s.params, serde_json::json!({}));
    }

    #[test]
    fn json_round_trip_with_custom_params() {
        let mut s = Seed::new("morph", 512, 512, 99);
        s.params = serde_json::json!({
            "shapes": ["cone", "shell", "crowd"],
            "turbulence": 0.0
        });
        s.frames = 600;

        let json = serde_json::to_string_pretty(&s).unwrap();
        let restored: Seed = serde_json::from_str(&json).unwrap();
        assert_eq!(s, restored);
    }

    #[test]
    fn missing_params_and_frames_default() {
        let s: Seed =
            serde_json::from_str(r#"{"engine":"globe","width":64,"height":32,"seed":1}"#).unwrap();
        assert_eq!(s.params, serde_json::json!({}));
        assert_eq!(s.frames, 0);
    }

    #[test]
    fn json_contains_expected_keys() {
        let s = Seed::new("attractor", 128, 128, 1);
        let v: serde_json::Value = serde_json::to_value(&s).unwrap();
        for key in ["engine", "width", "height", "params", "seed", "frames"] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn validate_succeeds_for_valid_seed() {
        assert!(Seed::new("flow", 512, 512, 42).validate().is_ok());
    }

    #[test]
    fn validate_fails_for_zero_dimensions() {
        assert!(Seed::new("flow", 0, 512, 42).validate().is_err());
        assert!(Seed::new("flow", 512, 0, 42).validate().is_err());
    }

    #[test]
    fn validate_fails_for_overflow() {
        let s = Seed::new("flow", usize::MAX, 2, 42);
        assert!(s.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_object_params() {
        let mut s = Seed::new("flow", 8, 8, 42);
        s.params = serde_json::json!([1, 2]);
        assert!(matches!(s.validate(), Err(EngineError::InvalidConfig(_))));
    }
}
