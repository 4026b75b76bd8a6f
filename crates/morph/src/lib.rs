#![deny(unsafe_code)]
//! Shape-morph particle engine.
//!
//! Cycles a fixed-size point buffer through a list of precomputed shapes.
//! After resting on a shape for `cycle_interval` seconds the engine eases
//! every point toward its counterpart (same index) in the next shape with a
//! smoothstep curve, shakes the points a little mid-flight and spins the whole
//! buffer slowly about the Y axis.
//!
//! ```text
//!          elapsed − last_change ≥ interval
//!   Idle ───────────────────────────────────▶ Transitioning
//!    ▲                                             │
//!    └──────────── progress reaches 1 ◀────────────┘
//! ```

pub mod blend;
pub mod config;

pub use blend::smoothstep;
pub use config::{MorphConfig, Pacing};

use drift_core::error::EngineError;
use drift_core::host::{FrameHandle, FrameTask, Host};
use drift_core::prng::RandomSource;
use drift_core::{ColorBuffer, Engine, PointCloud, Xorshift64};
use log::debug;
use serde_json::Value;

use crate::blend::{add_turbulence, blend_into, in_turbulence_band, rotate_y};

/// Transition phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Transitioning,
}

/// The shape-morph engine.
pub struct ShapeMorph {
    shapes: Vec<PointCloud>,
    config: MorphConfig,
    buffer: Vec<f32>,
    current: usize,
    target: usize,
    progress: f64,
    phase: Phase,
    elapsed: f64,
    last_change: f64,
    rng: Box<dyn RandomSource>,
    frame: FrameTask,
}

impl ShapeMorph {
    /// Creates the engine resting on the first shape.
    ///
    /// Every shape must hold exactly `config.count` points. Returns
    /// `EngineError::EmptyShapeList` for an empty list and
    /// `EngineError::PointCountMismatch` for the first shape of the wrong
    /// size; shapes are never padded here.
    pub fn create(shapes: Vec<PointCloud>, config: MorphConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let first = shapes.first().ok_or(EngineError::EmptyShapeList)?;
        for shape in &shapes {
            shape.expect_len(config.count)?;
        }
        let buffer = first.positions().to_vec();
        debug!(
            "shape morph created: {} shapes of {} points",
            shapes.len(),
            config.count
        );
        Ok(Self {
            shapes,
            config,
            buffer,
            current: 0,
            target: 0,
            progress: 0.0,
            phase: Phase::Idle,
            elapsed: 0.0,
            last_change: 0.0,
            rng: Box::new(Xorshift64::new(0)),
            frame: FrameTask::new(),
        })
    }

    /// Generates `config.shapes` and creates the engine from them.
    ///
    /// `seed` drives both shape generation and turbulence.
    pub fn generate(config: MorphConfig, seed: u64) -> Result<Self, EngineError> {
        let mut rng = Xorshift64::new(seed);
        let shapes = config
            .shapes
            .iter()
            .map(|shape| shape.generate(config.count, &mut rng))
            .collect();
        Ok(Self::create(shapes, config)?.with_rng(Box::new(rng)))
    }

    /// Creates the engine from JSON params (see [`MorphConfig::from_json`]).
    pub fn from_json(params: &Value, seed: u64) -> Result<Self, EngineError> {
        Self::generate(MorphConfig::from_json(params)?, seed)
    }

    /// Replaces the turbulence source.
    pub fn with_rng(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    /// Advances the clock by `dt` seconds and returns the new buffer.
    ///
    /// A negative or non-finite `dt` counts as zero.
    pub fn advance(&mut self, dt: f64) -> &[f32] {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;

        if self.phase == Phase::Idle
            && self.elapsed - self.last_change >= self.config.cycle_interval
        {
            self.target = (self.current + 1) % self.shapes.len();
            self.progress = 0.0;
            self.phase = Phase::Transitioning;
            self.last_change = self.elapsed;
            debug!("morph {} -> {}", self.current, self.target);
        }

        match self.phase {
            Phase::Idle => {
                self.buffer
                    .copy_from_slice(self.shapes[self.current].positions());
            }
            Phase::Transitioning => {
                self.progress =
                    (self.progress + self.config.pacing.increment(dt)).clamp(0.0, 1.0);
                if self.progress >= 1.0 {
                    self.current = self.target;
                    self.phase = Phase::Idle;
                    self.buffer
                        .copy_from_slice(self.shapes[self.current].positions());
                } else {
                    let t = self.progress;
                    blend_into(
                        &mut self.buffer,
                        self.shapes[self.current].positions(),
                        self.shapes[self.target].positions(),
                        smoothstep(t),
                    );
                    if self.config.turbulence > 0.0 && in_turbulence_band(t) {
                        add_turbulence(&mut self.buffer, self.config.turbulence, self.rng.as_mut());
                    }
                }
            }
        }

        if self.config.rotation_speed != 0.0 {
            rotate_y(
                &mut self.buffer,
                (self.elapsed * self.config.rotation_speed) as f32,
            );
        }
        &self.buffer
    }

    /// Requests the first frame.
    pub fn start(&mut self, host: &mut dyn Host) {
        self.frame.schedule(host);
    }

    /// Handles the delivered frame `frame`: advances by `dt` and requests the
    /// next one. Returns `false` if `frame` is not the one pending here.
    pub fn on_frame(&mut self, host: &mut dyn Host, frame: FrameHandle, dt: f64) -> bool {
        if !self.frame.fire(frame) {
            return false;
        }
        self.advance(dt);
        self.frame.schedule(host);
        true
    }

    /// Cancels the pending frame. Idempotent.
    pub fn teardown(&mut self, host: &mut dyn Host) {
        if self.frame.is_scheduled() {
            debug!("shape morph torn down");
        }
        self.frame.cancel(host);
    }

    pub fn is_running(&self) -> bool {
        self.frame.is_scheduled()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Raw transition progress in [0, 1].
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn target_index(&self) -> usize {
        self.target
    }

    /// Seconds of `dt` accumulated so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn shapes(&self) -> &[PointCloud] {
        &self.shapes
    }

    pub fn config(&self) -> &MorphConfig {
        &self.config
    }
}

impl Engine for ShapeMorph {
    fn step(&mut self, dt: f64) -> Result<(), EngineError> {
        self.advance(dt);
        Ok(())
    }

    fn positions(&self) -> &[f32] {
        &self.buffer
    }

    fn colors(&self) -> ColorBuffer<'_> {
        ColorBuffer::Uniform(self.config.color)
    }

    fn params(&self) -> Value {
        self.config.to_json()
    }

    fn param_schema(&self) -> Value {
        MorphConfig::schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::ManualHost;
    use glam::Vec3;

    fn flat(count: usize, value: f32) -> PointCloud {
        PointCloud::uniform(count, Vec3::splat(value))
    }

    /// No rotation, no jitter, a transition every `interval` seconds.
    fn plain(count: usize, interval: f64, pacing: Pacing) -> MorphConfig {
        MorphConfig {
            cycle_interval: interval,
            pacing,
            turbulence: 0.0,
            rotation_speed: 0.0,
            count,
            ..MorphConfig::default()
        }
    }

    #[test]
    fn empty_shape_list_is_rejected() {
        let result = ShapeMorph::create(Vec::new(), MorphConfig::default());
        assert!(matches!(result, Err(EngineError::EmptyShapeList)));
    }

    #[test]
    fn wrong_sized_shape_is_rejected() {
        let shapes = vec![flat(2000, 0.0), flat(1999, 1.0)];
        let result = ShapeMorph::create(shapes, MorphConfig::default());
        assert!(matches!(
            result,
            Err(EngineError::PointCountMismatch {
                expected: 6000,
                got: 5997
            })
        ));
    }

    #[test]
    fn idle_buffer_is_the_first_shape() {
        let mut morph =
            ShapeMorph::create(vec![flat(4, 2.0), flat(4, 5.0)], plain(4, 10.0, Pacing::default()))
                .unwrap();
        assert_eq!(morph.positions(), &[2.0; 12]);
        assert_eq!(morph.advance(1.0), &[2.0; 12]);
        assert_eq!(morph.phase(), Phase::Idle);
        assert_eq!(morph.progress(), 0.0);
    }

    #[test]
    fn zeros_to_ones_ends_exactly_on_target() {
        let mut morph = ShapeMorph::create(
            vec![flat(2000, 0.0), flat(2000, 1.0)],
            plain(2000, 0.0, Pacing::PerFrame(0.005)),
        )
        .unwrap();
        for frame in 0..1000 {
            morph.advance(1.0 / 60.0);
            if morph.current_index() == 1 {
                assert!(morph.positions().iter().all(|v| *v == 1.0));
                assert_eq!(morph.phase(), Phase::Idle);
                assert!(frame >= 199, "finished after {frame} frames");
                return;
            }
        }
        panic!("transition never completed");
    }

    #[test]
    fn transition_starts_at_interval_and_cycles() {
        let mut morph = ShapeMorph::create(
            vec![flat(3, 0.0), flat(3, 1.0), flat(3, 2.0)],
            plain(3, 1.0, Pacing::WallClock(0.5)),
        )
        .unwrap();
        morph.advance(0.75);
        assert_eq!(morph.phase(), Phase::Idle);
        morph.advance(0.25);
        assert_eq!(morph.phase(), Phase::Transitioning);
        assert_eq!((morph.current_index(), morph.target_index()), (0, 1));
        assert!((morph.progress() - 0.5).abs() < 1e-12);
        morph.advance(0.25);
        assert_eq!((morph.phase(), morph.current_index()), (Phase::Idle, 1));

        // Two more full cycles wrap back to the first shape.
        for _ in 0..2 {
            morph.advance(1.0);
            morph.advance(0.5);
        }
        assert_eq!(morph.current_index(), 0);
        assert_eq!(morph.positions(), &[0.0; 9]);
    }

    #[test]
    fn progress_is_monotone_and_resets() {
        let mut morph = ShapeMorph::create(
            vec![flat(2, 0.0), flat(2, 1.0)],
            plain(2, 0.0, Pacing::WallClock(1.0)),
        )
        .unwrap();
        let mut last = None;
        let mut transitions = 0;
        for _ in 0..100 {
            morph.advance(0.1);
            let p = morph.progress();
            match (morph.phase(), last) {
                (Phase::Transitioning, Some(prev)) => assert!(p > prev, "{p} after {prev}"),
                (Phase::Transitioning, None) => {
                    transitions += 1;
                    assert!(p <= 0.1 + 1e-12, "restarted at {p}");
                }
                (Phase::Idle, _) => assert_eq!(p, 1.0),
            }
            last = (morph.phase() == Phase::Transitioning).then_some(p);
        }
        assert!(transitions >= 8, "only {transitions} transitions");
    }

    #[test]
    fn midpoint_blend_follows_smoothstep() {
        let mut morph = ShapeMorph::create(
            vec![flat(1, 0.0), flat(1, 4.0)],
            plain(1, 0.0, Pacing::WallClock(1.0)),
        )
        .unwrap();
        morph.advance(0.5);
        assert!((morph.progress() - 0.5).abs() < 1e-12);
        assert_eq!(morph.positions(), &[2.0; 3]);
        morph.advance(0.25);
        let expected = 4.0 * smoothstep(0.75) as f32;
        assert!((morph.positions()[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn turbulence_only_mid_transition() {
        let config = MorphConfig {
            turbulence: 0.05,
            ..plain(500, 0.0, Pacing::WallClock(1.0))
        };
        let mut morph = ShapeMorph::create(vec![flat(500, 0.0), flat(500, 0.0)], config).unwrap();
        morph.advance(0.05);
        assert!(morph.positions().iter().all(|v| *v == 0.0), "jitter at t=0.05");
        morph.advance(0.45);
        let buf = morph.positions();
        assert!(buf.iter().any(|v| *v != 0.0));
        assert!(buf.iter().all(|v| v.abs() <= 0.025));
        morph.advance(0.45);
        assert!(morph.positions().iter().all(|v| *v == 0.0), "jitter at t=0.95");
    }

    #[test]
    fn rotation_spins_about_y() {
        let config = MorphConfig {
            rotation_speed: std::f64::consts::FRAC_PI_2,
            ..plain(1, 100.0, Pacing::default())
        };
        let shape = PointCloud::from_positions(vec![1.0, 3.0, 0.0]).unwrap();
        let mut morph = ShapeMorph::create(vec![shape], config).unwrap();
        let buf = morph.advance(1.0);
        assert!(buf[0].abs() < 1e-6);
        assert_eq!(buf[1], 3.0);
        assert!((buf[2] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn frame_loop_and_teardown() {
        let mut host = ManualHost::new();
        let mut morph =
            ShapeMorph::create(vec![flat(2, 0.0)], plain(2, 6.0, Pacing::default())).unwrap();
        morph.start(&mut host);
        for _ in 0..3 {
            let frame = host.take_frame().unwrap();
            assert!(morph.on_frame(&mut host, frame, 0.5));
        }
        assert!((morph.elapsed() - 1.5).abs() < 1e-12);
        let late = host.take_frame().unwrap();
        morph.teardown(&mut host);
        morph.teardown(&mut host);
        assert_eq!(host.pending_frames(), 0);
        assert!(!morph.is_running());
        assert!(!morph.on_frame(&mut host, late, 0.5));
    }

    #[test]
    fn backward_or_bad_time_does_not_move_progress() {
        let mut morph = ShapeMorph::create(
            vec![flat(1, 0.0), flat(1, 1.0)],
            plain(1, 0.0, Pacing::WallClock(1.0)),
        )
        .unwrap();
        morph.advance(0.05);
        let before = morph.progress();
        let buf = morph.positions().to_vec();
        for dt in [-0.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            morph.advance(dt);
            assert_eq!(morph.progress(), before, "dt = {dt}");
            assert_eq!(morph.phase(), Phase::Transitioning);
            assert_eq!(morph.positions(), buf.as_slice());
        }
        assert!((morph.elapsed() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn generated_shapes_have_configured_count() {
        let config = MorphConfig {
            count: 300,
            ..MorphConfig::default()
        };
        let mut morph = ShapeMorph::generate(config, 11).unwrap();
        assert_eq!(morph.shapes().len(), 3);
        assert_eq!(morph.point_count(), 300);
        morph.step(1.0 / 60.0).unwrap();
        assert_eq!(morph.positions().len(), 900);
        assert_eq!(morph.colors(), ColorBuffer::Uniform(morph.config().color));
    }

    #[test]
    fn from_json_reports_unknown_shape() {
        let result = ShapeMorph::from_json(&serde_json::json!({"shapes": ["blob"]}), 1);
        assert!(matches!(result, Err(EngineError::UnknownShape(_))));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn progress_stays_in_unit_interval(
                dts in proptest::collection::vec(-1.0f64..2.0, 1..60),
                interval in 0.0f64..3.0,
                seconds in 0.1f64..4.0,
            ) {
                let mut morph = ShapeMorph::create(
                    vec![flat(2, 0.0), flat(2, 1.0), flat(2, -1.0)],
                    plain(2, interval, Pacing::WallClock(seconds)),
                )
                .unwrap();
                for dt in dts {
                    morph.advance(dt);
                    prop_assert!((0.0..=1.0).contains(&morph.progress()));
                    prop_assert!(morph.current_index() < 3);
                    for v in morph.positions() {
                        prop_assert!((-1.0..=1.0).contains(v));
                    }
                }
            }
        }
    }
}
