//! Particle state and the pure per-frame physics.

use drift_core::prng::RandomSource;
use drift_core::{Palette, Srgb};

/// Velocity gain per frame along the field heading, before `speed`.
pub const FIELD_PUSH: f64 = 0.1;
/// Velocity retained per frame.
pub const FRICTION: f64 = 0.95;
/// Peak velocity change from the pointer, at distance zero.
pub const REPULSION_STRENGTH: f64 = 0.5;

/// One member of the flow-field pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Disc radius in pixels, in [0.5, 2.5).
    pub size: f64,
    pub color: Srgb,
    /// In [0, 1). Carried for renderers; the update ignores it.
    pub life: f64,
}

impl Particle {
    /// A resting particle at a uniform position in `[0, width) × [0, height)`.
    pub fn spawn(width: f64, height: f64, palette: &Palette, rng: &mut dyn RandomSource) -> Self {
        let x = rng.next_f64() * width;
        let y = rng.next_f64() * height;
        let size = rng.next_f64() * 2.0 + 0.5;
        let color = palette.pick(rng);
        let life = rng.next_f64();
        Self {
            x: wrap(x, width),
            y: wrap(y, height),
            vx: 0.0,
            vy: 0.0,
            size,
            color,
            life,
        }
    }

    /// Applies one frame of motion: field push along the unit `heading`,
    /// friction, pointer repulsion, integration, then toroidal wrap.
    pub fn advance(
        &mut self,
        (hx, hy): (f64, f64),
        speed: f64,
        pointer: Option<(f64, f64)>,
        radius: f64,
        width: f64,
        height: f64,
    ) {
        self.vx += hx * FIELD_PUSH * speed;
        self.vy += hy * FIELD_PUSH * speed;
        self.vx *= FRICTION;
        self.vy *= FRICTION;
        if let Some(pointer) = pointer {
            let (rx, ry) = repulsion((self.x, self.y), pointer, radius);
            self.vx += rx;
            self.vy += ry;
        }
        self.x = wrap(self.x + self.vx, width);
        self.y = wrap(self.y + self.vy, height);
    }
}

/// Velocity change pushing a particle at `p` away from `pointer`.
///
/// Zero at or beyond `radius`; grows linearly to [`REPULSION_STRENGTH`] as
/// the distance shrinks to zero.
pub fn repulsion(p: (f64, f64), pointer: (f64, f64), radius: f64) -> (f64, f64) {
    let dx = pointer.0 - p.0;
    let dy = pointer.1 - p.1;
    let distance = dx.hypot(dy);
    if distance >= radius {
        return (0.0, 0.0);
    }
    let force = (radius - distance) / radius;
    let toward = dy.atan2(dx);
    (
        -toward.cos() * force * REPULSION_STRENGTH,
        -toward.sin() * force * REPULSION_STRENGTH,
    )
}

/// Maps `v` into `[0, extent)`. Non-positive extents map everything to 0.
pub fn wrap(v: f64, extent: f64) -> f64 {
    if extent.is_nan() || extent <= 0.0 || !v.is_finite() {
        return 0.0;
    }
    let w = v.rem_euclid(extent);
    // rem_euclid of a tiny negative value can round up to `extent`.
    if w >= extent {
        0.0
    } else {
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::prng::Fixed;
    use drift_core::Xorshift64;

    #[test]
    fn spawn_respects_ranges() {
        let mut rng = Xorshift64::new(3);
        let palette = Palette::from_hex(&["#ff0000", "#00ff00"]).unwrap();
        for _ in 0..500 {
            let p = Particle::spawn(640.0, 480.0, &palette, &mut rng);
            assert!((0.0..640.0).contains(&p.x) && (0.0..480.0).contains(&p.y));
            assert!((0.5..2.5).contains(&p.size));
            assert!((0.0..1.0).contains(&p.life));
            assert!(palette.colors().contains(&p.color));
            assert_eq!((p.vx, p.vy), (0.0, 0.0));
        }
    }

    #[test]
    fn far_pointer_has_no_effect() {
        assert_eq!(repulsion((100.0, 100.0), (-10000.0, -10000.0), 200.0), (0.0, 0.0));
        assert_eq!(repulsion((0.0, 0.0), (200.0, 0.0), 200.0), (0.0, 0.0));
    }

    #[test]
    fn zero_radius_never_repels() {
        assert_eq!(repulsion((5.0, 5.0), (5.0, 5.0), 0.0), (0.0, 0.0));
    }

    #[test]
    fn repulsion_points_away_and_scales_linearly() {
        // Pointer 50px to the right with radius 100: force 0.5, push left.
        let (rx, ry) = repulsion((0.0, 0.0), (50.0, 0.0), 100.0);
        assert!((rx + 0.25).abs() < 1e-12, "rx = {rx}");
        assert!(ry.abs() < 1e-12);
        // Pointer below: push up.
        let (_, ry) = repulsion((0.0, 0.0), (0.0, 10.0), 100.0);
        assert!((ry + 0.45).abs() < 1e-12, "ry = {ry}");
    }

    #[test]
    fn wrap_is_strict() {
        assert_eq!(wrap(10.0, 10.0), 0.0);
        assert_eq!(wrap(-1.0, 10.0), 9.0);
        assert_eq!(wrap(25.5, 10.0), 5.5);
        let tiny = wrap(-1e-20, 10.0);
        assert!((0.0..10.0).contains(&tiny), "tiny = {tiny}");
        assert_eq!(wrap(f64::NAN, 10.0), 0.0);
        assert_eq!(wrap(3.0, 0.0), 0.0);
    }

    #[test]
    fn advance_applies_push_then_friction() {
        let mut p = Particle::spawn(100.0, 100.0, &Palette::white(), &mut Fixed(0.5));
        p.advance((1.0, 0.0), 1.0, None, 200.0, 100.0, 100.0);
        assert!((p.vx - 0.1 * 0.95).abs() < 1e-12);
        assert!(p.vy.abs() < 1e-12);
        assert!((p.x - (50.0 + 0.095)).abs() < 1e-12);
    }

    #[test]
    fn advance_wraps_across_the_edge() {
        let mut p = Particle::spawn(100.0, 100.0, &Palette::white(), &mut Fixed(0.5));
        p.x = 99.99;
        p.vx = 5.0;
        p.advance((1.0, 0.0), 1.0, None, 0.0, 100.0, 100.0);
        assert!(p.x < 10.0, "x = {}", p.x);
    }
}
