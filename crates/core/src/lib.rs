#![deny(unsafe_code)]
//! Core types and traits for the drift particle engines.
//!
//! Provides the `Engine` trait, the `PointCloud` buffer type, the `Surface`
//! and `Host` collaborator traits (drawing target, frame scheduling and
//! listener registration), color types, `Palette`, the `Xorshift64` PRNG
//! behind the `RandomSource` trait, flow `FieldSource`s, `Seed`, and
//! parameter helpers.

pub mod color;
pub mod engine;
pub mod error;
pub mod field;
pub mod field_source;
pub mod host;
pub mod palette;
pub mod params;
pub mod point_cloud;
pub mod prng;
pub mod seed;
pub mod surface;

pub use color::{LinearRgb, Srgb};
pub use engine::{ColorBuffer, Engine};
pub use error::EngineError;
pub use field::Field;
pub use host::{FrameHandle, FrameTask, Host, ListenerHandle, ListenerKind, ListenerSet, ManualHost};
pub use palette::Palette;
pub use point_cloud::{PointCloud, NUM_PARTICLES};
pub use prng::{RandomSource, Xorshift64};
pub use seed::Seed;
pub use surface::{PixelSurface, Surface};
