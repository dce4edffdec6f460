//! Core traits for meshgen

use crate::{error::Result, output::Reconstruction, point::Point3d, point_set::PointSet};

/// Trait for nearest neighbor search functionality
pub trait NearestNeighborSearch {
    /// Find the k nearest neighbors to a query point
    fn find_k_nearest(&self, query: &Point3d, k: usize) -> Vec<(usize, f64)>;

    /// Find all neighbors within a given radius
    fn find_radius_neighbors(&self, query: &Point3d, radius: f64) -> Vec<(usize, f64)>;
}

/// Capability of turning an unordered point set into a triangle mesh.
///
/// The call is synchronous and keeps no state between invocations: the same
/// input always yields the same triangles.
pub trait SurfaceReconstructor {
    fn reconstruct(&self, points: &PointSet) -> Result<Reconstruction>;
}
