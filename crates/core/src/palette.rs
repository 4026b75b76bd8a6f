//! Discrete color palettes.
//!
//! A flow-field particle takes one palette entry at creation and keeps it
//! for life; point-cloud generators read entries by index.

use crate::color::Srgb;
use crate::error::EngineError;
use crate::prng::RandomSource;

/// Names accepted by [`Palette::from_name`].
const PALETTE_NAMES: &[&str] = &["white", "cyan", "ash", "ember", "signal"];

/// An ordered, non-empty list of sRGB colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Srgb>,
}

impl Palette {
    /// Creates a palette from sRGB colors. Requires at least one color.
    pub fn new(colors: Vec<Srgb>) -> Result<Self, EngineError> {
        if colors.is_empty() {
            return Err(EngineError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        Ok(Self { colors })
    }

    /// Creates a palette by parsing hex color strings ("#rrggbb" or "rrggbb").
    pub fn from_hex<S: AsRef<str>>(hexes: &[S]) -> Result<Self, EngineError> {
        let colors = hexes
            .iter()
            .map(|h| Srgb::from_hex(h.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// Returns the number of color stops in this palette.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The palette entries in order.
    pub fn colors(&self) -> &[Srgb] {
        &self.colors
    }

    /// Picks one entry uniformly at random.
    pub fn pick(&self, rng: &mut dyn RandomSource) -> Srgb {
        self.colors[rng.next_usize(self.colors.len())]
    }

    // -- Presets --

    /// Single white entry, the flow engine's default.
    pub fn white() -> Self {
        Self {
            colors: vec![Srgb::WHITE],
        }
    }

    /// Glowing cyan used by the morphing cloud.
    pub fn cyan() -> Self {
        Self::preset(&["#00ffff"])
    }

    /// White to grey, the attractor intro blend.
    pub fn ash() -> Self {
        Self::preset(&["#ffffff", "#888888"])
    }

    /// Ten-step dark-red to white ramp used by the visibility globe.
    pub fn ember() -> Self {
        Self::preset(&[
            "#2b0505", "#4a0a0a", "#6b1010", "#8f1515", "#b31b1b", "#d62222", "#ff4d4d",
            "#ff8080", "#ffb3b3", "#ffffff",
        ])
    }

    /// Blues of the story network.
    pub fn signal() -> Self {
        Self::preset(&["#ffffff", "#00ccff", "#0066cc", "#00aaff"])
    }

    /// Constructs a preset palette by name.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "white" => Ok(Self::white()),
            "cyan" => Ok(Self::cyan()),
            "ash" => Ok(Self::ash()),
            "ember" => Ok(Self::ember()),
            "signal" => Ok(Self::signal()),
            _ => Err(EngineError::InvalidPalette(format!(
                "unknown palette: {name}"
            ))),
        }
    }

    /// Returns the names accepted by [`Palette::from_name`].
    pub fn list_names() -> &'static [&'static str] {
        PALETTE_NAMES
    }

    fn preset(hexes: &[&str]) -> Self {
        let colors = hexes
            .iter()
            .filter_map(|h| Srgb::from_hex(h).ok())
            .collect();
        Self { colors }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::white()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prng::{Fixed, Xorshift64};

    #[test]
    fn new_rejects_empty_list() {
        assert!(matches!(
            Palette::new(vec![]),
            Err(EngineError::InvalidPalette(_))
        ));
        let empty: [&str; 0] = [];
        assert!(Palette::from_hex(&empty).is_err());
    }

    #[test]
    fn from_hex_propagates_color_errors() {
        assert!(matches!(
            Palette::from_hex(&["#ffffff", "zzz"]),
            Err(EngineError::InvalidColor(_))
        ));
    }

    #[test]
    fn from_hex_accepts_owned_strings() {
        let owned = vec!["#ff0000".to_string(), "#00ff00".to_string()];
        assert_eq!(Palette::from_hex(owned.as_slice()).unwrap().len(), 2);
    }

    #[test]
    fn every_preset_parses_fully() {
        assert_eq!(Palette::ember().len(), 10);
        assert_eq!(Palette::ash().len(), 2);
        for name in Palette::list_names() {
            let p = Palette::from_name(name).unwrap();
            assert!(!p.is_empty(), "{name} is empty");
        }
    }

    #[test]
    fn unknown_preset_is_an_error() {
        assert!(Palette::from_name("plaid").is_err());
    }

    #[test]
    fn pick_covers_all_entries() {
        let palette = Palette::signal();
        let mut rng = Xorshift64::new(11);
        let mut seen = vec![false; palette.len()];
        for _ in 0..1000 {
            let c = palette.pick(&mut rng);
            let idx = palette.colors().iter().position(|&p| p == c).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s), "not every entry picked: {seen:?}");
    }

    #[test]
    fn pick_with_fixed_source_is_deterministic() {
        let palette = Palette::ember();
        assert_eq!(palette.pick(&mut Fixed(0.0)), palette.colors()[0]);
        assert_eq!(palette.pick(&mut Fixed(0.99)), palette.colors()[9]);
    }
}
