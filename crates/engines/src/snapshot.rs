//! PNG output of a [`PixelSurface`].
//!
//! Feature-gated behind `png` (default on) so WASM builds can depend on this
//! crate without pulling in the `image` crate. Rendering an engine into a
//! surface lives in [`EngineKind::render`](crate::EngineKind::render) and
//! [`crate::pixel`] (always available).

use drift_core::error::EngineError;
use drift_core::PixelSurface;
use std::path::Path;

/// Writes a surface as an opaque PNG.
///
/// Returns `EngineError::InvalidDimensions` if the surface dimensions
/// overflow `u32`, or `EngineError::Io` on write failure.
pub fn write_png(surface: &PixelSurface, path: &Path) -> Result<(), EngineError> {
    let w = u32::try_from(surface.width()).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(surface.height()).map_err(|_| EngineError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, surface.to_rgba8())
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))
}
