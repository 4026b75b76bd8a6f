//! Textured globe: a point cloud sampled from an equirectangular land mask.
//!
//! Random texture coordinates are drawn; samples whose texel is dark (ocean)
//! are rejected, the rest are projected onto a sphere of radius
//! [`GLOBE_RADIUS`] and styled by the [`RegionTable`] entry covering their
//! latitude/longitude. The texture is loaded before generation and may be
//! missing; the generator then yields an empty cloud instead of failing.

use std::f64::consts::PI;

use drift_core::prng::RandomSource;
use drift_core::{EngineError, Field, PointCloud};
use glam::Vec3;
use log::{debug, warn};

use crate::region::RegionTable;

/// Random texture lookups per generation.
pub const GLOBE_SAMPLES: usize = 65_000;
/// Sphere radius in world units.
pub const GLOBE_RADIUS: f64 = 6.0;
/// Width of the brightness raster textures are resampled to.
pub const TEXTURE_WIDTH: u32 = 1024;
/// Height of the brightness raster textures are resampled to.
pub const TEXTURE_HEIGHT: u32 = 512;
/// Texels at or below this brightness are ocean.
pub const LAND_THRESHOLD: f64 = 20.0 / 255.0;

/// Load state of the land-mask texture.
#[derive(Debug, Clone, PartialEq)]
pub enum GlobeTexture {
    /// Not loaded yet.
    Pending,
    /// Brightness raster, row 0 at the north pole.
    Ready(Field),
    /// Loading failed; the reason is kept for diagnostics.
    Failed(String),
}

impl GlobeTexture {
    /// Decodes an image file into a [`TEXTURE_WIDTH`]×[`TEXTURE_HEIGHT`]
    /// brightness raster taken from the red channel.
    ///
    /// Never panics: decode and I/O errors produce [`GlobeTexture::Failed`].
    #[cfg(feature = "texture")]
    pub fn load(path: &std::path::Path) -> Self {
        match image::open(path) {
            Ok(img) => Self::from_image(&img),
            Err(e) => {
                warn!("globe texture {} failed to load: {e}", path.display());
                Self::Failed(e.to_string())
            }
        }
    }

    /// Resamples a decoded image into the brightness raster.
    #[cfg(feature = "texture")]
    pub fn from_image(img: &image::DynamicImage) -> Self {
        let resized = img
            .resize_exact(
                TEXTURE_WIDTH,
                TEXTURE_HEIGHT,
                image::imageops::FilterType::Triangle,
            )
            .to_rgb8();
        let data = resized
            .pixels()
            .map(|p| p.0[0] as f64 / 255.0)
            .collect();
        match Field::from_data(TEXTURE_WIDTH as usize, TEXTURE_HEIGHT as usize, data) {
            Ok(field) => Self::Ready(field),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// The raster, or `EngineError::Texture` saying why there is none.
    pub fn field(&self) -> Result<&Field, EngineError> {
        match self {
            Self::Ready(field) => Ok(field),
            Self::Pending => Err(EngineError::Texture("not loaded yet".into())),
            Self::Failed(reason) => Err(EngineError::Texture(reason.clone())),
        }
    }
}

/// Position on a sphere of `radius` for a latitude/longitude in degrees.
///
/// Longitude 0 faces +X and the texture seam (lon ±180) faces −X.
pub fn globe_point(lat: f64, lon: f64, radius: f64) -> Vec3 {
    let phi = (90.0 - lat) * PI / 180.0;
    let theta = (lon + 180.0) * PI / 180.0;
    Vec3::new(
        (-(radius * phi.sin() * theta.cos())) as f32,
        (radius * phi.cos()) as f32,
        (radius * phi.sin() * theta.sin()) as f32,
    )
}

/// Latitude and longitude in degrees of the direction of `p`.
///
/// Inverse of [`globe_point`]; longitude is normalised to [-180, 180]. The
/// zero vector maps to (0, 0).
pub fn lat_lon_of(p: Vec3) -> (f64, f64) {
    let n = p.as_dvec3().normalize_or_zero();
    if n == glam::DVec3::ZERO {
        return (0.0, 0.0);
    }
    let phi = n.y.clamp(-1.0, 1.0).acos();
    let theta = n.z.atan2(-n.x);
    let lat = 90.0 - phi.to_degrees();
    let mut lon = theta.to_degrees() - 180.0;
    if lon < -180.0 {
        lon += 360.0;
    }
    if lon > 180.0 {
        lon -= 360.0;
    }
    (lat, lon)
}

/// Samples the land mask `samples` times and returns the styled land points.
///
/// Output size varies with the land fraction and the regions' keep
/// probabilities. A pending or failed texture yields an empty cloud.
pub fn globe(
    texture: &GlobeTexture,
    regions: &RegionTable,
    samples: usize,
    rng: &mut dyn RandomSource,
) -> PointCloud {
    let field = match texture.field() {
        Ok(field) => field,
        Err(e) => {
            if matches!(texture, GlobeTexture::Pending) {
                debug!("globe: {e}, emitting no points");
            } else {
                warn!("globe: {e}, emitting no points");
            }
            return PointCloud::default();
        }
    };

    let mut cloud = PointCloud::with_capacity(samples / 4);
    for _ in 0..samples {
        let u = rng.next_f64();
        let v = rng.next_f64();
        if field.sample_uv(u, v) <= LAND_THRESHOLD {
            continue;
        }
        let lon = (u - 0.5) * 360.0;
        let lat = (v - 0.5) * 180.0;
        let region = regions.lookup(lat, lon);
        if !rng.chance(region.keep) {
            continue;
        }
        let scatter = Vec3::new(
            rng.jitter(region.scatter) as f32,
            rng.jitter(region.scatter) as f32,
            rng.jitter(region.scatter) as f32,
        );
        cloud.push_colored(
            globe_point(lat, lon, GLOBE_RADIUS) + scatter,
            region.color.to_linear(),
        );
    }
    debug!("globe: {} of {samples} samples kept", cloud.len());
    cloud
}
