#![deny(unsafe_code)]
//! Engine registry: maps engine names to implementations and provides CPU-side
//! snapshot rendering.
//!
//! This crate sits between `drift-core` (which defines the `Engine` trait)
//! and the engine crates (`drift-flow`, `drift-morph`, `drift-clouds`). Both
//! the CLI and seed replay go through it so dispatch lives in one place.

pub mod pixel;
pub mod still;

#[cfg(feature = "png")]
pub mod snapshot;

use drift_core::error::EngineError;
use drift_core::seed::FRAME_SECONDS;
use drift_core::{ColorBuffer, Engine, ManualHost, PixelSurface, Seed};
use drift_flow::FlowField;
use drift_morph::ShapeMorph;
use log::debug;
use serde_json::Value;

pub use still::StillCloud;

use crate::pixel::{splat, View};

/// All available engine names.
const ENGINE_NAMES: &[&str] = &["flow", "morph", "attractor", "globe"];

/// Disc radius in pixels used when splatting 3D clouds.
const SPLAT_RADIUS: f64 = 0.75;

/// Enumeration of all available engines.
///
/// Wraps each engine implementation and delegates `Engine` trait methods.
/// Use [`EngineKind::from_name`] for string-based construction (CLI, seeds).
pub enum EngineKind {
    /// 2D flow field drawing into an owned framebuffer.
    Flow(FlowField<PixelSurface>),
    /// 3D shape morph.
    Morph(ShapeMorph),
    /// Attractor or globe cloud with a slow spin.
    Still(StillCloud),
}

impl EngineKind {
    /// Constructs an engine by name.
    ///
    /// `width` and `height` size the flow field's framebuffer; the 3D
    /// engines ignore them. Returns `EngineError::UnknownEngine` if the name
    /// is not recognized.
    pub fn from_name(
        name: &str,
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, EngineError> {
        let engine = match name {
            "flow" => {
                let surface = PixelSurface::new(width, height)?;
                // Stepped directly, so the host only witnesses creation.
                let mut host = ManualHost::new();
                let mut flow = FlowField::from_json(Some(surface), params, &mut host, seed)?;
                flow.teardown(&mut host);
                EngineKind::Flow(flow)
            }
            "morph" => EngineKind::Morph(ShapeMorph::from_json(params, seed)?),
            "attractor" => EngineKind::Still(StillCloud::attractor(seed, params)?),
            "globe" => EngineKind::Still(StillCloud::globe(seed, params)?),
            _ => return Err(EngineError::UnknownEngine(name.to_string())),
        };
        debug!("engine '{name}' created with seed {seed}");
        Ok(engine)
    }

    /// Constructs the engine a seed describes.
    pub fn from_seed(seed: &Seed) -> Result<Self, EngineError> {
        seed.validate()?;
        Self::from_name(&seed.engine, seed.width, seed.height, seed.seed, &seed.params)
    }

    /// Returns a slice of all recognized engine names.
    pub fn list_engines() -> &'static [&'static str] {
        ENGINE_NAMES
    }

    /// Steps `frames` times at 60 fps.
    pub fn run(&mut self, frames: usize) -> Result<(), EngineError> {
        for _ in 0..frames {
            self.step(FRAME_SECONDS)?;
        }
        Ok(())
    }

    /// Current frame as a `width`×`height` image.
    ///
    /// The flow field returns a copy of its own framebuffer (and ignores the
    /// requested size); the 3D engines are splatted orthographically onto
    /// the XY plane, fitted to their bounds.
    pub fn render(&self, width: usize, height: usize) -> Result<PixelSurface, EngineError> {
        if let EngineKind::Flow(flow) = self {
            if let Some(surface) = flow.surface() {
                return Ok(surface.clone());
            }
        }
        let mut surface = PixelSurface::new(width, height)?;
        let positions = self.positions();
        let view = View::fit(positions, width, height);
        splat(&mut surface, positions, self.colors(), &view, SPLAT_RADIUS);
        Ok(surface)
    }
}

impl Engine for EngineKind {
    fn step(&mut self, dt: f64) -> Result<(), EngineError> {
        match self {
            EngineKind::Flow(e) => e.step(dt),
            EngineKind::Morph(e) => e.step(dt),
            EngineKind::Still(e) => e.step(dt),
        }
    }

    fn positions(&self) -> &[f32] {
        match self {
            EngineKind::Flow(e) => e.positions(),
            EngineKind::Morph(e) => e.positions(),
            EngineKind::Still(e) => e.positions(),
        }
    }

    fn colors(&self) -> ColorBuffer<'_> {
        match self {
            EngineKind::Flow(e) => e.colors(),
            EngineKind::Morph(e) => e.colors(),
            EngineKind::Still(e) => e.colors(),
        }
    }

    fn params(&self) -> Value {
        match self {
            EngineKind::Flow(e) => e.params(),
            EngineKind::Morph(e) => e.params(),
            EngineKind::Still(e) => e.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            EngineKind::Flow(e) => e.param_schema(),
            EngineKind::Morph(e) => e.param_schema(),
            EngineKind::Still(e) => e.param_schema(),
        }
    }
}
