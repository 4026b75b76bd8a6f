//! Error types for the drift core.

use thiserror::Error;

/// Errors produced by engine and generator operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero when creating a field or surface.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A point buffer did not have the length the consumer indexes by.
    ///
    /// Both values are counted in `f32` components (points × 3).
    #[error("point count mismatch: expected {expected} components, got {got}")]
    PointCountMismatch { expected: usize, got: usize },

    /// A shape-morph engine was created without any shapes.
    #[error("shape list is empty: at least one shape is required")]
    EmptyShapeList,

    /// A configuration value was outside its accepted range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed from the given colors.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// No engine is registered under the requested name.
    #[error("unknown engine: {0}")]
    UnknownEngine(String),

    /// No point-cloud shape is registered under the requested name.
    #[error("unknown shape: {0}")]
    UnknownShape(String),

    /// A texture could not be decoded or is not ready.
    #[error("texture unavailable: {0}")]
    Texture(String),

    /// File output failed.
    #[error("i/o error: {0}")]
    Io(String),
}
