//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// Convert a coordinate triple into a point
#[inline]
pub fn point_from_coords(coords: [f64; 3]) -> Point3d {
    Point3d::new(coords[0], coords[1], coords[2])
}

/// Check that every coordinate of a point is finite (no NaN or infinity)
#[inline]
pub fn is_finite_point(point: &Point3d) -> bool {
    point.x.is_finite() && point.y.is_finite() && point.z.is_finite()
}

/// Bit pattern of a point, with `-0.0` folded onto `0.0`.
///
/// Two points with equal keys are exact duplicates.
#[inline]
pub(crate) fn coordinate_key(point: &Point3d) -> [u64; 3] {
    [
        (point.x + 0.0).to_bits(),
        (point.y + 0.0).to_bits(),
        (point.z + 0.0).to_bits(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_check() {
        assert!(is_finite_point(&Point3d::new(1.0, -2.0, 0.5)));
        assert!(!is_finite_point(&Point3d::new(f64::NAN, 0.0, 0.0)));
        assert!(!is_finite_point(&Point3d::new(0.0, f64::INFINITY, 0.0)));
    }

    #[test]
    fn test_signed_zero_key() {
        let a = Point3d::new(0.0, 1.0, 2.0);
        let b = Point3d::new(-0.0, 1.0, 2.0);
        assert_eq!(coordinate_key(&a), coordinate_key(&b));
    }
}
