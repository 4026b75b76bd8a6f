#![deny(unsafe_code)]
//! Pointer-reactive 2D flow-field particle engine.
//!
//! A fixed pool of particles drifts along a time-varying flow field, is
//! pushed away from the pointer and wraps around the edges of a drawing
//! [`Surface`]. Each frame the engine fades the surface toward the background
//! (the `trail` opacity) and draws every particle as a small disc, so slow
//! fades leave streaks behind moving particles.
//!
//! The engine never owns a clock. It asks a [`Host`] for one frame at a time
//! and does one update per delivered frame, so it runs identically under a
//! browser's animation callback and a headless [`ManualHost`](drift_core::ManualHost).

pub mod config;
pub mod particle;

pub use config::FlowConfig;
pub use particle::{repulsion, wrap, Particle};

use drift_core::error::EngineError;
use drift_core::field_source::FieldSource;
use drift_core::host::{FrameHandle, FrameTask, Host, ListenerKind, ListenerSet};
use drift_core::{ColorBuffer, Engine, Surface, Xorshift64};
use log::{debug, warn};
use serde_json::Value;

/// Field time added per frame.
pub const TIME_STEP: f64 = 0.005;

/// Listeners registered while attached.
const LISTENERS: &[ListenerKind] = &[ListenerKind::PointerMove, ListenerKind::Resize];

/// The flow-field engine drawing onto a surface of type `S`.
pub struct FlowField<S: Surface> {
    surface: Option<S>,
    config: FlowConfig,
    field: Box<dyn FieldSource>,
    particles: Vec<Particle>,
    positions: Vec<f32>,
    colors: Vec<f32>,
    rng: Xorshift64,
    seed: u64,
    time: f64,
    pointer: Option<(f64, f64)>,
    frame: FrameTask,
    listeners: ListenerSet,
}

impl<S: Surface> FlowField<S> {
    /// Creates the engine and, if a surface is given, starts it: the pool is
    /// spawned over the surface, pointer-move and resize listeners are
    /// registered and the first frame is requested.
    ///
    /// Without a surface the engine is inert until [`attach`](Self::attach).
    /// Returns an error if `config` fails validation.
    pub fn create(
        surface: Option<S>,
        config: FlowConfig,
        host: &mut dyn Host,
        seed: u64,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let field = config.field_source(seed)?;
        let mut engine = Self {
            surface: None,
            config,
            field,
            particles: Vec::new(),
            positions: Vec::new(),
            colors: Vec::new(),
            rng: Xorshift64::new(seed),
            seed,
            time: 0.0,
            pointer: None,
            frame: FrameTask::new(),
            listeners: ListenerSet::new(),
        };
        match surface {
            Some(surface) => engine.attach(surface, host),
            None => debug!("flow field created without a surface, staying inert"),
        }
        Ok(engine)
    }

    /// Creates the engine from JSON params (see [`FlowConfig::from_json`]).
    pub fn from_json(
        surface: Option<S>,
        params: &Value,
        host: &mut dyn Host,
        seed: u64,
    ) -> Result<Self, EngineError> {
        Self::create(surface, FlowConfig::from_json(params)?, host, seed)
    }

    /// Binds a surface and starts the engine. A previously attached surface
    /// is torn down and replaced.
    pub fn attach(&mut self, surface: S, host: &mut dyn Host) {
        self.teardown(host);
        self.surface = Some(surface);
        self.rebuild();
        self.listeners.register(host, LISTENERS);
        self.frame.schedule(host);
        debug!(
            "flow field attached: {} particles, field '{}'",
            self.particles.len(),
            self.config.field
        );
    }

    /// Handles the delivered frame `frame`: one update, then the next frame
    /// is requested. Returns `false` (and does nothing) if `frame` is not the
    /// one this engine is waiting on, e.g. after [`teardown`](Self::teardown)
    /// or when another engine shares the host.
    pub fn on_frame(&mut self, host: &mut dyn Host, frame: FrameHandle) -> bool {
        if !self.frame.fire(frame) {
            return false;
        }
        self.update();
        self.frame.schedule(host);
        true
    }

    /// One frame of simulation and drawing.
    ///
    /// Advances field time, fades the surface, then moves and draws every
    /// particle. Does nothing while no surface is attached.
    pub fn update(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let (width, height) = surface.size();
        self.time += TIME_STEP;
        surface.fill(self.config.background, self.config.trail);
        for (i, p) in self.particles.iter_mut().enumerate() {
            let heading = self.field.direction(p.x, p.y, self.time);
            p.advance(
                heading,
                self.config.speed,
                self.pointer,
                self.config.interaction_radius,
                width,
                height,
            );
            surface.fill_circle(p.x, p.y, p.size, p.color);
            self.positions[i * 3] = p.x as f32;
            self.positions[i * 3 + 1] = p.y as f32;
        }
    }

    /// Records the latest pointer position in surface pixels.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.pointer = Some((x, y));
    }

    /// Forgets the pointer; no repulsion until it moves again.
    pub fn on_pointer_leave(&mut self) {
        self.pointer = None;
    }

    /// Resizes the surface and respawns the pool over the new extent.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(width, height);
        }
        self.rebuild();
    }

    /// Replaces the configuration and respawns the pool.
    ///
    /// On error the engine keeps its previous configuration.
    pub fn reconfigure(&mut self, config: FlowConfig) -> Result<(), EngineError> {
        config.validate()?;
        self.field = config.field_source(self.seed)?;
        self.config = config;
        self.rebuild();
        Ok(())
    }

    /// Cancels the pending frame and removes the listeners.
    ///
    /// Idempotent, and safe on an engine that never started.
    pub fn teardown(&mut self, host: &mut dyn Host) {
        if self.frame.is_scheduled() || !self.listeners.is_empty() {
            debug!("flow field torn down");
        }
        self.frame.cancel(host);
        self.listeners.clear(host);
    }

    /// True while a frame is pending.
    pub fn is_running(&self) -> bool {
        self.frame.is_scheduled()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Field time, advanced by [`TIME_STEP`] per update.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn pointer(&self) -> Option<(f64, f64)> {
        self.pointer
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Detaches and returns the surface, stopping the engine.
    pub fn into_surface(mut self, host: &mut dyn Host) -> Option<S> {
        self.teardown(host);
        self.surface.take()
    }

    /// Respawns the whole pool over the current surface extent.
    fn rebuild(&mut self) {
        self.particles.clear();
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let (width, height) = surface.size();
        if !(width > 0.0 && height > 0.0) {
            warn!("flow surface has no area ({width}x{height}), pool left empty");
            self.positions.clear();
            self.colors.clear();
            return;
        }
        for _ in 0..self.config.count {
            let p = Particle::spawn(width, height, &self.config.palette, &mut self.rng);
            self.particles.push(p);
        }
        self.positions = self
            .particles
            .iter()
            .flat_map(|p| [p.x as f32, p.y as f32, 0.0])
            .collect();
        self.colors = self
            .particles
            .iter()
            .flat_map(|p| p.color.to_linear().to_f32())
            .collect();
    }
}

impl<S: Surface> Engine for FlowField<S> {
    /// One update per call; field time advances by [`TIME_STEP`] regardless
    /// of `dt`.
    fn step(&mut self, _dt: f64) -> Result<(), EngineError> {
        self.update();
        Ok(())
    }

    fn positions(&self) -> &[f32] {
        &self.positions
    }

    fn colors(&self) -> ColorBuffer<'_> {
        ColorBuffer::PerPoint(&self.colors)
    }

    fn params(&self) -> Value {
        self.config.to_json()
    }

    fn param_schema(&self) -> Value {
        FlowConfig::schema()
    }
}
