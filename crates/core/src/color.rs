//! Color types and conversion functions.
//!
//! Colors enter drift as hex strings (palettes, region tables, config) and
//! leave it either as sRGB draw colors (flow engine) or as linear RGB
//! components in a per-point color buffer (point clouds), matching what a
//! GPU point renderer expects.

use crate::error::EngineError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Linear RGB color (gamma-decoded).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    pub const WHITE: Srgb = Srgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub const BLACK: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `EngineError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Srgb, EngineError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(EngineError::InvalidColor(format!(
                "expected 6 hex digits in {hex:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|e| EngineError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Quantizes to 8-bit channels with rounding, clamping out-of-range values.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Gamma-decodes to linear RGB.
    pub fn to_linear(self) -> LinearRgb {
        srgb_to_linear(self)
    }
}

impl LinearRgb {
    /// Component-wise linear interpolation: `self` at `t = 0`, `other` at `t = 1`.
    pub fn lerp(self, other: LinearRgb, t: f64) -> LinearRgb {
        LinearRgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    /// Components as `f32`, the layout of a renderer color buffer.
    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Applies inverse sRGB gamma to convert a single sRGB component to linear.
fn srgb_component_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Applies sRGB gamma to convert a single linear component to sRGB.
fn linear_component_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Converts sRGB to linear RGB by applying inverse sRGB gamma.
pub fn srgb_to_linear(c: Srgb) -> LinearRgb {
    LinearRgb {
        r: srgb_component_to_linear(c.r),
        g: srgb_component_to_linear(c.g),
        b: srgb_component_to_linear(c.b),
    }
}

/// Converts linear RGB to sRGB by applying sRGB gamma.
pub fn linear_to_srgb(c: LinearRgb) -> Srgb {
    Srgb {
        r: linear_component_to_srgb(c.r),
        g: linear_component_to_srgb(c.g),
        b: linear_component_to_srgb(c.b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    // -- sRGB <-> Linear --

    #[test]
    fn srgb_to_linear_black_and_white_are_fixed_points() {
        let black = srgb_to_linear(Srgb::BLACK);
        let white = srgb_to_linear(Srgb::WHITE);
        assert!(approx_eq(black.r, 0.0) && approx_eq(black.g, 0.0) && approx_eq(black.b, 0.0));
        assert!(approx_eq(white.r, 1.0) && approx_eq(white.g, 1.0) && approx_eq(white.b, 1.0));
    }

    #[test]
    fn srgb_grey_888888_decodes_to_about_a_quarter() {
        let grey = Srgb::from_hex("#888888").unwrap().to_linear();
        assert!((grey.r - 0.246).abs() < 1e-3, "got {}", grey.r);
    }

    #[test]
    fn srgb_gamma_boundary_at_0_04045() {
        let below = srgb_component_to_linear(0.04);
        let above = srgb_component_to_linear(0.05);
        assert!(approx_eq(below, 0.04 / 12.92));
        assert!(above > below);
    }

    #[test]
    fn srgb_linear_round_trip_mid_gray() {
        let grey = Srgb {
            r: 0.5,
            g: 0.5,
            b: 0.5,
        };
        let back = linear_to_srgb(srgb_to_linear(grey));
        assert!(approx_eq(back.r, 0.5) && approx_eq(back.g, 0.5) && approx_eq(back.b, 0.5));
    }

    // -- lerp --

    #[test]
    fn lerp_endpoints_are_inputs() {
        let a = Srgb::WHITE.to_linear();
        let b = Srgb::from_hex("#888888").unwrap().to_linear();
        assert_eq!(a.lerp(b, 0.0), a);
        let end = a.lerp(b, 1.0);
        assert!(approx_eq(end.r, b.r) && approx_eq(end.g, b.g) && approx_eq(end.b, b.b));
    }

    #[test]
    fn lerp_midpoint_is_average() {
        let a = LinearRgb {
            r: 0.0,
            g: 0.2,
            b: 1.0,
        };
        let b = LinearRgb {
            r: 1.0,
            g: 0.4,
            b: 0.0,
        };
        let m = a.lerp(b, 0.5);
        assert!(approx_eq(m.r, 0.5) && approx_eq(m.g, 0.3) && approx_eq(m.b, 0.5));
    }

    // -- hex --

    #[test]
    fn from_hex_parses_with_and_without_hash() {
        let a = Srgb::from_hex("#ff0000").unwrap();
        let b = Srgb::from_hex("FF0000").unwrap();
        assert_eq!(a, b);
        assert!(approx_eq(a.r, 1.0) && approx_eq(a.g, 0.0));
    }

    #[test]
    fn from_hex_returns_error_for_invalid_hex() {
        assert!(Srgb::from_hex("#ff00").is_err());
        assert!(Srgb::from_hex("#gg0000").is_err());
        assert!(Srgb::from_hex("").is_err());
        assert!(Srgb::from_hex("#ff00é").is_err());
    }

    #[test]
    fn to_hex_clamps_out_of_range() {
        let c = Srgb {
            r: 1.5,
            g: -0.2,
            b: 0.5,
        };
        assert_eq!(c.to_hex(), "#ff0080");
    }

    #[test]
    fn srgb_json_round_trip() {
        let c = Srgb::from_hex("#d62222").unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#d62222\"");
        let back: Srgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_hex(), "#d62222");
    }

    #[test]
    fn srgb_deserialize_rejects_invalid_hex() {
        assert!(serde_json::from_str::<Srgb>("\"nope\"").is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn srgb_linear_round_trip_within_epsilon(
                r in 0.0_f64..=1.0,
                g in 0.0_f64..=1.0,
                b in 0.0_f64..=1.0,
            ) {
                let back = linear_to_srgb(srgb_to_linear(Srgb { r, g, b }));
                prop_assert!((back.r - r).abs() < 1e-9);
                prop_assert!((back.g - g).abs() < 1e-9);
                prop_assert!((back.b - b).abs() < 1e-9);
            }

            #[test]
            fn hex_round_trip_is_stable(bytes: [u8; 3]) {
                let hex = format!("#{:02x}{:02x}{:02x}", bytes[0], bytes[1], bytes[2]);
                prop_assert_eq!(Srgb::from_hex(&hex).unwrap().to_hex(), hex);
            }
        }
    }
}
