#![deny(unsafe_code)]
//! Point-cloud generators.
//!
//! Pure functions from a [`RandomSource`](drift_core::RandomSource) to an
//! immutable [`PointCloud`](drift_core::PointCloud). The fixed-count shapes
//! (cone, shell, crowd, cluster, attractor) serve as morph targets and are
//! reachable by name through [`Shape`]; the globe produces a variable number
//! of colored points from a land-mask texture and a [`RegionTable`].

pub mod attractor;
pub mod globe;
pub mod region;
pub mod shape;
pub mod shapes;

pub use attractor::{attractor, attractor_with, AttractorParams, ATTRACTOR_POINTS};
pub use globe::{globe, globe_point, lat_lon_of, GlobeTexture, GLOBE_SAMPLES};
pub use region::{LatLonBox, Region, RegionTable};
pub use shape::Shape;
pub use shapes::{cluster, cone, crowd, shell};
