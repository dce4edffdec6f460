//! Result of a surface reconstruction

use crate::mesh::{Triangle, TriangleMesh};
use crate::point_set::PointSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-fatal conditions reported alongside a reconstructed mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconstructionWarning {
    /// The front stopped with open boundary edges or points left unused.
    ///
    /// This is the normal outcome for samples of open surfaces.
    StalledFront {
        boundary_edges: usize,
        unused_points: usize,
    },
}

impl fmt::Display for ReconstructionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconstructionWarning::StalledFront {
                boundary_edges,
                unused_points,
            } => write!(
                f,
                "front stalled with {} boundary edges and {} unused points",
                boundary_edges, unused_points
            ),
        }
    }
}

/// Triangles produced by a reconstruction, in commit order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconstruction {
    pub triangles: Vec<Triangle>,
    pub triangle_count: u32,
    pub warnings: Vec<ReconstructionWarning>,
}

impl Reconstruction {
    /// Bundle a triangle list with its count and warnings
    pub fn new(triangles: Vec<Triangle>, triangle_count: u32, warnings: Vec<ReconstructionWarning>) -> Self {
        Self {
            triangles,
            triangle_count,
            warnings,
        }
    }

    /// Check if no triangle was produced
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Whether the front stalled before consuming every point
    pub fn is_stalled(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, ReconstructionWarning::StalledFront { .. }))
    }

    /// Triangle indices as one flat `3 * triangle_count` buffer
    pub fn to_flat(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Pair the triangles with their vertex positions
    pub fn into_mesh(self, points: &PointSet) -> TriangleMesh {
        TriangleMesh::from_vertices_and_faces(points.points().to_vec(), self.triangles)
    }
}
