//! Name-based registry of fixed-count generators.

use std::fmt;

use drift_core::error::EngineError;
use drift_core::prng::RandomSource;
use drift_core::PointCloud;

use crate::attractor::attractor;
use crate::shapes::{cluster, cone, crowd, shell, CLUSTER_CENTERS, CLUSTER_RADII};

/// All shape names, in registry order.
const SHAPE_NAMES: &[&str] = &["cone", "shell", "crowd", "cluster", "attractor"];

/// A generator that always returns exactly the requested number of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Cone,
    Shell,
    Crowd,
    Cluster,
    Attractor,
}

impl Shape {
    /// Looks a shape up by name.
    ///
    /// Returns `EngineError::UnknownShape` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "cone" => Ok(Shape::Cone),
            "shell" => Ok(Shape::Shell),
            "crowd" => Ok(Shape::Crowd),
            "cluster" => Ok(Shape::Cluster),
            "attractor" => Ok(Shape::Attractor),
            _ => Err(EngineError::UnknownShape(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Cone => "cone",
            Shape::Shell => "shell",
            Shape::Crowd => "crowd",
            Shape::Cluster => "cluster",
            Shape::Attractor => "attractor",
        }
    }

    /// Returns a slice of all recognized shape names.
    pub fn list_names() -> &'static [&'static str] {
        SHAPE_NAMES
    }

    /// Generates `count` points.
    pub fn generate(self, count: usize, rng: &mut dyn RandomSource) -> PointCloud {
        match self {
            Shape::Cone => cone(count, rng),
            Shape::Shell => shell(count, rng),
            Shape::Crowd => crowd(count, rng),
            Shape::Cluster => cluster(count, &CLUSTER_CENTERS, CLUSTER_RADII, rng),
            Shape::Attractor => attractor(count, rng),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
