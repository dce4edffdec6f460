//! Mesh data structures and functionality

use crate::point::*;
use serde::{Deserialize, Serialize};

/// Ordered triple of point indices, counter-clockwise seen from outside
pub type Triangle = [u32; 3];

/// A triangle mesh with vertices and faces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3d>,
    pub faces: Vec<Triangle>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3d>, faces: Vec<Triangle>) -> Self {
        Self { vertices, faces }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    fn corners(&self, face: &Triangle) -> [Point3d; 3] {
        [
            self.vertices[face[0] as usize],
            self.vertices[face[1] as usize],
            self.vertices[face[2] as usize],
        ]
    }

    /// Calculate unit face normals following the winding order
    pub fn calculate_face_normals(&self) -> Vec<Vector3d> {
        self.faces
            .iter()
            .map(|face| {
                let [v0, v1, v2] = self.corners(face);
                (v1 - v0).cross(&(v2 - v0)).normalize()
            })
            .collect()
    }

    /// Total area of all faces
    pub fn surface_area(&self) -> f64 {
        self.faces
            .iter()
            .map(|face| {
                let [v0, v1, v2] = self.corners(face);
                0.5 * (v1 - v0).cross(&(v2 - v0)).norm()
            })
            .sum()
    }

    /// Signed volume enclosed by the faces, positive for outward winding.
    ///
    /// Only meaningful for closed meshes; for open ones it is the signed
    /// volume of the cone from the origin.
    pub fn signed_volume(&self) -> f64 {
        self.faces
            .iter()
            .map(|face| {
                let [v0, v1, v2] = self.corners(face);
                v0.coords.dot(&v1.coords.cross(&v2.coords))
            })
            .sum::<f64>()
            / 6.0
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
