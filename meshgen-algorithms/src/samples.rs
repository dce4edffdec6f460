//! Sample point sets on simple shapes
//!
//! These generators stand in for an input provider when trying out or
//! testing the reconstruction: they produce points lying on spheres, tori and
//! polyhedra, with rings staggered so that no four neighbouring samples are
//! co-circular by construction.

use meshgen_core::Point3d;
use std::f64::consts::{PI, TAU};

/// Golden angle in radians, used to stagger successive rings
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// The 12 vertices of a regular icosahedron inscribed in a sphere of `radius`
pub fn icosahedron(radius: f64) -> Vec<Point3d> {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let scale = radius / (1.0 + phi * phi).sqrt();

    let raw = [
        [-1.0, phi, 0.0],
        [1.0, phi, 0.0],
        [-1.0, -phi, 0.0],
        [1.0, -phi, 0.0],
        [0.0, -1.0, phi],
        [0.0, 1.0, phi],
        [0.0, -1.0, -phi],
        [0.0, 1.0, -phi],
        [phi, 0.0, -1.0],
        [phi, 0.0, 1.0],
        [-phi, 0.0, -1.0],
        [-phi, 0.0, 1.0],
    ];

    raw.iter()
        .map(|[x, y, z]| Point3d::new(x * scale, y * scale, z * scale))
        .collect()
}

/// Corners of an axis-aligned cube of edge `size` centred at the origin,
/// followed by the centres of its six faces
pub fn cube_with_face_centers(size: f64) -> Vec<Point3d> {
    let h = size / 2.0;
    let mut points = Vec::with_capacity(14);

    for x in [-h, h] {
        for y in [-h, h] {
            for z in [-h, h] {
                points.push(Point3d::new(x, y, z));
            }
        }
    }

    points.extend([
        Point3d::new(-h, 0.0, 0.0),
        Point3d::new(h, 0.0, 0.0),
        Point3d::new(0.0, -h, 0.0),
        Point3d::new(0.0, h, 0.0),
        Point3d::new(0.0, 0.0, -h),
        Point3d::new(0.0, 0.0, h),
    ]);

    points
}

/// `count` points spread evenly over a sphere along a Fibonacci spiral
pub fn fibonacci_sphere(count: usize, radius: f64) -> Vec<Point3d> {
    (0..count)
        .map(|i| {
            let z = 1.0 - (2.0 * i as f64 + 1.0) / count as f64;
            let r = (1.0 - z * z).max(0.0).sqrt();
            let theta = GOLDEN_ANGLE * i as f64;
            Point3d::new(radius * r * theta.cos(), radius * r * theta.sin(), radius * z)
        })
        .collect()
}

/// Points on a ring of `count` samples at polar angle `theta`
fn latitude_ring(radius: f64, theta: f64, count: usize, phase: f64) -> impl Iterator<Item = Point3d> {
    (0..count).map(move |j| {
        let azimuth = phase + TAU * j as f64 / count as f64;
        Point3d::new(
            radius * theta.sin() * azimuth.cos(),
            radius * theta.sin() * azimuth.sin(),
            radius * theta.cos(),
        )
    })
}

/// Upper hemisphere (`z >= 0`) sampled by the pole plus `rings` latitude rings.
///
/// The last ring lies on the equator and forms the open rim. Ring sizes keep
/// the spacing along each ring close to the spacing between rings.
pub fn hemisphere(rings: usize, radius: f64) -> Vec<Point3d> {
    let step = (PI / 2.0) / rings as f64;
    let mut points = vec![Point3d::new(0.0, 0.0, radius)];

    for k in 1..=rings {
        let theta = step * k as f64;
        let count = ((TAU * theta.sin() / step).round() as usize).max(3);
        points.extend(latitude_ring(radius, theta, count, GOLDEN_ANGLE * k as f64));
    }

    points
}

/// A torus around the z axis with staggered tube rings
pub fn torus(major_radius: f64, minor_radius: f64, rings: usize, per_ring: usize) -> Vec<Point3d> {
    let mut points = Vec::with_capacity(rings * per_ring);

    for i in 0..rings {
        let u = TAU * i as f64 / rings as f64;
        let phase = GOLDEN_ANGLE * i as f64;
        for j in 0..per_ring {
            let v = phase + TAU * j as f64 / per_ring as f64;
            let r = major_radius + minor_radius * v.cos();
            points.push(Point3d::new(r * u.cos(), r * u.sin(), minor_radius * v.sin()));
        }
    }

    points
}

/// A capsule: cylinder of `length` along z capped by two hemispheres
pub fn spherocylinder(radius: f64, length: f64, spacing: f64) -> Vec<Point3d> {
    let half = length / 2.0;
    let per_ring = ((TAU * radius / spacing).round() as usize).max(3);
    let cap_rings = ((PI / 2.0 * radius / spacing).round() as usize).max(1);
    let cap_step = (PI / 2.0) / cap_rings as f64;
    let body_rings = ((length / spacing).round() as usize).max(1);

    let mut points = vec![Point3d::new(0.0, 0.0, half + radius)];
    let mut ring_index = 0usize;

    // Top cap, from the pole down to (but excluding) the equator
    for k in 1..cap_rings {
        let theta = cap_step * k as f64;
        let count = ((TAU * theta.sin() * radius / spacing).round() as usize).max(3);
        ring_index += 1;
        points.extend(
            latitude_ring(radius, theta, count, GOLDEN_ANGLE * ring_index as f64)
                .map(|p| Point3d::new(p.x, p.y, p.z + half)),
        );
    }

    // Cylinder body, both equators included
    for k in 0..=body_rings {
        let z = half - length * k as f64 / body_rings as f64;
        ring_index += 1;
        points.extend(
            latitude_ring(radius, PI / 2.0, per_ring, GOLDEN_ANGLE * ring_index as f64)
                .map(|p| Point3d::new(p.x, p.y, z)),
        );
    }

    // Bottom cap, mirrored
    for k in (1..cap_rings).rev() {
        let theta = cap_step * k as f64;
        let count = ((TAU * theta.sin() * radius / spacing).round() as usize).max(3);
        ring_index += 1;
        points.extend(
            latitude_ring(radius, theta, count, GOLDEN_ANGLE * ring_index as f64)
                .map(|p| Point3d::new(p.x, p.y, -p.z - half)),
        );
    }

    points.push(Point3d::new(0.0, 0.0, -half - radius));
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_icosahedron_on_sphere() {
        let points = icosahedron(2.0);
        assert_eq!(points.len(), 12);
        for p in &points {
            assert_relative_eq!(p.coords.norm(), 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_fibonacci_sphere_on_sphere() {
        let points = fibonacci_sphere(100, 1.5);
        assert_eq!(points.len(), 100);
        for p in &points {
            assert_relative_eq!(p.coords.norm(), 1.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_hemisphere_upper_half() {
        let points = hemisphere(6, 1.0);
        assert!(points.iter().all(|p| p.z >= -1e-12));
        let rim = points.iter().filter(|p| p.z.abs() < 1e-12).count();
        assert_eq!(rim, 24);
        for p in &points {
            assert_relative_eq!(p.coords.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cube_layout() {
        let points = cube_with_face_centers(1.0);
        assert_eq!(points.len(), 14);
        assert_eq!(points[0], Point3d::new(-0.5, -0.5, -0.5));
    }

    #[test]
    fn test_torus_and_capsule_sizes() {
        assert_eq!(torus(2.0, 0.5, 24, 10).len(), 240);
        let capsule = spherocylinder(1.0, 2.0, 0.3);
        assert!(capsule.iter().all(|p| p.z.abs() <= 2.0 + 1e-12));
    }
}
