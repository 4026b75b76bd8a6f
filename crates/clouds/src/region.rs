//! Latitude/longitude region tables for the globe generator.
//!
//! A [`RegionTable`] is plain data: an ordered list of boxes, each carrying
//! the color, keep probability and scatter applied to globe samples falling
//! inside it. The first region whose box contains a coordinate wins; samples
//! outside every box fall back to the table's default region. Tables
//! (de)serialize with serde so alternative tables can be loaded from JSON.

use drift_core::error::EngineError;
use drift_core::Srgb;
use serde::{Deserialize, Serialize};

/// An open latitude/longitude box in degrees. Bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl LatLonBox {
    pub const fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Strict containment: points on the border are outside.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat > self.lat_min && lat < self.lat_max && lon > self.lon_min && lon < self.lon_max
    }
}

/// Styling of globe samples inside one box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    /// `None` only for a table's default region.
    #[serde(default)]
    pub bounds: Option<LatLonBox>,
    pub color: Srgb,
    /// Probability in [0, 1] that a sample in this region is kept.
    pub keep: f64,
    /// Full width of the uniform per-axis offset added to kept samples.
    pub scatter: f64,
}

impl Region {
    fn boxed(name: &str, bounds: LatLonBox, color: &str, keep: f64, scatter: f64) -> Self {
        Self {
            name: name.to_string(),
            bounds: Some(bounds),
            color: Srgb::from_hex(color).unwrap_or(Srgb::WHITE),
            keep,
            scatter,
        }
    }
}

/// Ordered regions with a fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionTable {
    regions: Vec<Region>,
    default: Region,
}

impl RegionTable {
    /// Builds a table, checking that every keep probability is in [0, 1],
    /// every scatter is non-negative and every non-default region has bounds.
    pub fn new(regions: Vec<Region>, default: Region) -> Result<Self, EngineError> {
        for r in regions.iter().chain(std::iter::once(&default)) {
            if !(0.0..=1.0).contains(&r.keep) {
                return Err(EngineError::InvalidConfig(format!(
                    "region '{}': keep {} outside [0, 1]",
                    r.name, r.keep
                )));
            }
            if r.scatter.is_nan() || r.scatter < 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "region '{}': scatter {} is negative",
                    r.name, r.scatter
                )));
            }
        }
        if let Some(r) = regions.iter().find(|r| r.bounds.is_none()) {
            return Err(EngineError::InvalidConfig(format!(
                "region '{}' has no bounds",
                r.name
            )));
        }
        Ok(Self { regions, default })
    }

    /// Parses and validates a table from JSON.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let table: RegionTable =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        Self::new(table.regions, table.default)
    }

    /// A table with no regions: everything gets `default`.
    pub fn uniform(default: Region) -> Self {
        Self {
            regions: Vec::new(),
            default,
        }
    }

    /// The abuse-reporting visibility map: ten regions shaded on a dark-red
    /// to white ramp, brightest where reporting is most complete.
    ///
    /// The conflict box sits inside several larger ones and takes precedence;
    /// the rest follow from most to least visible.
    pub fn visibility() -> Self {
        let regions = vec![
            Region::boxed(
                "Conflict & Failed States",
                LatLonBox::new(29.0, 38.0, 60.0, 72.0),
                "#2b0505",
                0.3,
                0.60,
            ),
            Region::boxed(
                "Northern & Western Europe",
                LatLonBox::new(48.0, 70.0, -10.0, 30.0),
                "#ffffff",
                1.0,
                0.01,
            ),
            Region::boxed(
                "North America",
                LatLonBox::new(25.0, 50.0, -125.0, -65.0),
                "#ffb3b3",
                0.95,
                0.02,
            ),
            Region::boxed(
                "Southern & Eastern Europe",
                LatLonBox::new(35.0, 48.0, 10.0, 40.0),
                "#ff8080",
                0.9,
                0.04,
            ),
            Region::boxed(
                "East Asia",
                LatLonBox::new(20.0, 50.0, 100.0, 145.0),
                "#ff4d4d",
                0.85,
                0.06,
            ),
            Region::boxed(
                "Latin America & Caribbean",
                LatLonBox::new(-55.0, 30.0, -120.0, -35.0),
                "#d62222",
                0.75,
                0.10,
            ),
            Region::boxed(
                "Southeast Asia",
                LatLonBox::new(-10.0, 25.0, 95.0, 150.0),
                "#b31b1b",
                0.65,
                0.15,
            ),
            Region::boxed(
                "South Asia",
                LatLonBox::new(5.0, 35.0, 60.0, 95.0),
                "#8f1515",
                0.6,
                0.20,
            ),
            Region::boxed(
                "Middle East & North Africa",
                LatLonBox::new(12.0, 40.0, -15.0, 65.0),
                "#6b1010",
                0.5,
                0.30,
            ),
            Region::boxed(
                "Sub-Saharan Africa",
                LatLonBox::new(-35.0, 15.0, -20.0, 55.0),
                "#4a0a0a",
                0.4,
                0.40,
            ),
        ];
        let default = Region {
            name: "Rest of World".to_string(),
            bounds: None,
            color: Srgb::from_hex("#111111").unwrap_or(Srgb::BLACK),
            keep: 0.2,
            scatter: 0.05,
        };
        Self { regions, default }
    }

    /// The region governing `(lat, lon)`: first containing box, else default.
    pub fn lookup(&self, lat: f64, lon: f64) -> &Region {
        self.find(lat, lon).unwrap_or(&self.default)
    }

    /// The first bounded region containing `(lat, lon)`, if any.
    pub fn find(&self, lat: f64, lon: f64) -> Option<&Region> {
        self.regions
            .iter()
            .find(|r| r.bounds.is_some_and(|b| b.contains(lat, lon)))
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn default_region(&self) -> &Region {
        &self.default
    }
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::visibility()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_bounds_are_exclusive() {
        let b = LatLonBox::new(0.0, 10.0, 0.0, 10.0);
        assert!(b.contains(5.0, 5.0));
        assert!(!b.contains(0.0, 5.0));
        assert!(!b.contains(5.0, 10.0));
    }

    #[test]
    fn visibility_has_ten_regions_and_dim_default() {
        let table = RegionTable::visibility();
        assert_eq!(table.regions().len(), 10);
        assert_eq!(table.default_region().keep, 0.2);
        assert_eq!(table.default_region().color.to_hex(), "#111111");
    }

    #[test]
    fn conflict_box_overrides_south_asia_and_mena() {
        let table = RegionTable::visibility();
        // Kabul sits in the South Asia, MENA and conflict boxes.
        let r = table.lookup(34.5, 69.2);
        assert_eq!(r.name, "Conflict & Failed States");
        assert_eq!(r.keep, 0.3);
        assert_eq!(r.scatter, 0.60);
    }

    #[test]
    fn earlier_regions_win_overlaps() {
        let table = RegionTable::visibility();
        // Inside both North America and Latin America boxes.
        assert_eq!(table.lookup(27.0, -100.0).name, "North America");
        // Inside both Southern Europe and MENA boxes.
        assert_eq!(table.lookup(38.0, 23.0).name, "Southern & Eastern Europe");
    }

    #[test]
    fn open_ocean_falls_back_to_default() {
        let table = RegionTable::visibility();
        assert!(table.find(-60.0, -150.0).is_none());
        assert_eq!(table.lookup(-60.0, -150.0).name, "Rest of World");
    }

    #[test]
    fn border_coordinates_fall_through() {
        let table = RegionTable::visibility();
        // lat 48 is the exclusive edge of both European boxes.
        assert_eq!(table.lookup(48.0, 15.0).name, "Rest of World");
    }

    #[test]
    fn new_rejects_bad_probabilities() {
        let default = RegionTable::visibility().default_region().clone();
        let mut bad = default.clone();
        bad.bounds = Some(LatLonBox::new(0.0, 1.0, 0.0, 1.0));
        bad.keep = 1.5;
        assert!(RegionTable::new(vec![bad], default.clone()).is_err());

        let mut unbounded = default.clone();
        unbounded.keep = 0.5;
        assert!(RegionTable::new(vec![unbounded], default).is_err());
    }

    #[test]
    fn json_round_trip_preserves_table() {
        let table = RegionTable::visibility();
        let json = serde_json::to_string(&table).unwrap();
        let restored = RegionTable::from_json(&json).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn from_json_reports_malformed_input() {
        assert!(matches!(
            RegionTable::from_json("{\"regions\": 3}"),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn uniform_table_uses_default_everywhere() {
        let default = RegionTable::visibility().default_region().clone();
        let table = RegionTable::uniform(default);
        assert_eq!(table.lookup(51.5, 0.0).name, "Rest of World");
    }
}
