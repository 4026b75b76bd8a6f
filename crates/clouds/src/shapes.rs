//! Fixed-count morph targets: cone, shell, crowd and cluster.
//!
//! Every generator here returns exactly `count` points so that any two
//! outputs of the same count can be blended index by index.

use std::f64::consts::TAU;

use drift_core::prng::RandomSource;
use drift_core::PointCloud;
use glam::Vec3;

/// Humanoid figures in [`crowd`].
pub const CROWD_SIZE: usize = 15;

/// Centres of the story-network clusters.
pub const CLUSTER_CENTERS: [Vec3; 3] = [
    Vec3::new(-8.0, 5.0, -5.0),
    Vec3::new(8.0, 3.0, 4.0),
    Vec3::new(0.0, -8.0, 2.0),
];

/// Shell radii `[min, max)` around each cluster centre.
pub const CLUSTER_RADII: (f64, f64) = (4.0, 7.0);

/// Uniform direction on the unit sphere as `(sinφ·cosθ, sinφ·sinθ, cosφ)`.
fn sphere_direction(rng: &mut dyn RandomSource) -> (f64, f64, f64) {
    let theta = rng.next_f64() * TAU;
    let phi = (2.0 * rng.next_f64() - 1.0).acos();
    (phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

fn vec3(x: f64, y: f64, z: f64) -> Vec3 {
    Vec3::new(x as f32, y as f32, z as f32)
}

/// A cone standing on its tip: height in [-2, 2], radius growing linearly
/// to 2.5 at the top.
pub fn cone(count: usize, rng: &mut dyn RandomSource) -> PointCloud {
    let mut cloud = PointCloud::with_capacity(count);
    for _ in 0..count {
        let y = rng.next_range(-2.0, 2.0);
        let radius = (y + 2.0) / 4.0 * 2.5;
        let theta = rng.next_f64() * TAU;
        cloud.push(vec3(radius * theta.cos(), y, radius * theta.sin()));
    }
    cloud
}

/// A thick spherical shell with radii in [4, 10), biased toward the inner
/// surface (`r = 4 + u²·6`).
pub fn shell(count: usize, rng: &mut dyn RandomSource) -> PointCloud {
    let mut cloud = PointCloud::with_capacity(count);
    for _ in 0..count {
        let u = rng.next_f64();
        let r = 4.0 + u * u * 6.0;
        let (dx, dy, dz) = sphere_direction(rng);
        cloud.push(vec3(r * dx, r * dy, r * dz));
    }
    cloud
}

/// A loose crowd of [`CROWD_SIZE`] humanoid figures.
///
/// Each figure gets `count / 15` points split into head, torso, legs and
/// arms; the remainder of the division is padded with origin points.
pub fn crowd(count: usize, rng: &mut dyn RandomSource) -> PointCloud {
    let per_figure = count / CROWD_SIZE;
    let mut cloud = PointCloud::with_capacity(count);
    for _ in 0..CROWD_SIZE {
        let cx = rng.jitter(8.0);
        let cz = rng.jitter(4.0);
        let s = rng.next_range(0.8, 1.2);
        for _ in 0..per_figure {
            let (x, y, z) = body_point(s, rng);
            cloud.push(vec3(cx + x, y - 1.0, cz + z));
        }
    }
    cloud.pad_to(count);
    cloud
}

/// One point of a figure with scale `s`, relative to its feet-centre.
fn body_point(s: f64, rng: &mut dyn RandomSource) -> (f64, f64, f64) {
    let part = rng.next_f64();
    if part < 0.2 {
        // head
        let rad = 0.4 * s;
        let (dx, dy, dz) = sphere_direction(rng);
        (rad * dx, (rad * dy + 2.5) * s, rad * dz)
    } else if part < 0.55 {
        // torso
        let x = rng.jitter(0.8) * s;
        let y = rng.next_f64() * 2.5 * s;
        let z = rng.jitter(0.5) * s;
        (x, y, z)
    } else if part < 0.8 {
        // legs
        let column = if rng.next_f64() > 0.5 { 0.25 } else { -0.25 };
        let x = (column + rng.jitter(0.25)) * s;
        let y = rng.next_f64() * -2.5 * s;
        let z = rng.jitter(0.3) * s;
        (x, y, z)
    } else {
        // arms
        let side = if rng.next_f64() > 0.5 { 1.0 } else { -1.0 };
        let x = side * (0.5 + rng.next_f64() * 0.8) * s;
        let y = (1.0 + rng.jitter(1.5)) * s;
        let z = rng.jitter(0.3) * s;
        (x, y, z)
    }
}

/// Points on spherical shells around each centre.
///
/// `count` is split evenly across `centers`; each point lies at a distance in
/// `[radii.0, radii.1)` from its centre in a uniform direction. The remainder
/// is padded with origin points. An empty centre list yields `count` origins.
pub fn cluster(
    count: usize,
    centers: &[Vec3],
    radii: (f64, f64),
    rng: &mut dyn RandomSource,
) -> PointCloud {
    let mut cloud = PointCloud::with_capacity(count);
    if let Some(per_center) = count.checked_div(centers.len()) {
        for center in centers {
            for _ in 0..per_center {
                let (dx, dy, dz) = sphere_direction(rng);
                let r = rng.next_range(radii.0, radii.1);
                cloud.push(*center + vec3(r * dx, r * dy, r * dz));
            }
        }
    }
    cloud.pad_to(count);
    cloud
}
