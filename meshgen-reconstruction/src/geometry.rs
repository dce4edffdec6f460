//! Triangle and ball geometry shared by seeding and candidate evaluation

use meshgen_core::{Point3d, Vector3d};
use std::f64::consts::TAU;

/// Triangles whose squared sine of the corner angle falls below this are degenerate
pub const DEGENERATE_EPS: f64 = 1e-12;

/// Pivot angles closer than this are treated as a tie
pub const ANGLE_TIE_EPS: f64 = 1e-9;

/// Circumscribed circle of a triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point3d,
    pub radius: f64,
    /// Unit normal following the winding order of the corners
    pub normal: Vector3d,
}

/// Circumcircle of `p1, p2, p3`, `None` for collinear or coincident corners
pub fn circumcircle(p1: &Point3d, p2: &Point3d, p3: &Point3d) -> Option<Circle> {
    let a = p1 - p3;
    let b = p2 - p3;
    let axb = a.cross(&b);

    let a2 = a.norm_squared();
    let b2 = b.norm_squared();
    let len2 = axb.norm_squared();
    if len2 == 0.0 || len2 <= DEGENERATE_EPS * a2 * b2 {
        return None;
    }

    let center = p3 + (b * a2 - a * b2).cross(&axb) / (2.0 * len2);

    Some(Circle {
        center,
        radius: (center - p3).norm(),
        normal: axb / len2.sqrt(),
    })
}

/// Centre of the ball of `radius` through the circle, on the side its normal points to
pub fn ball_center(circle: &Circle, radius: f64) -> Option<Point3d> {
    let h2 = radius * radius - circle.radius * circle.radius;
    if h2 < 0.0 {
        return None;
    }
    Some(circle.center + circle.normal * h2.sqrt())
}

/// Rotation from `from` to `to` around `axis` (right hand rule), in `[0, 2pi)`.
///
/// Both vectors are expected to be orthogonal to the axis. Angles within
/// `ANGLE_TIE_EPS` below a full turn wrap to zero.
pub fn pivot_angle(axis: &Vector3d, from: &Vector3d, to: &Vector3d) -> f64 {
    let angle = axis
        .dot(&from.cross(to))
        .atan2(from.dot(to))
        .rem_euclid(TAU);

    if angle > TAU - ANGLE_TIE_EPS {
        0.0
    } else {
        angle
    }
}

/// Sum of the edge lengths
pub fn perimeter(p1: &Point3d, p2: &Point3d, p3: &Point3d) -> f64 {
    (p2 - p1).norm() + (p3 - p2).norm() + (p1 - p3).norm()
}
