//! Accumulates committed triangles in commit order

use crate::front::DirectedEdge;
use meshgen_core::{Error, Result, Triangle};
use std::collections::HashSet;

/// Corners of a triangle in increasing order, independent of winding
#[inline]
pub fn sorted_corners(triangle: &Triangle) -> [u32; 3] {
    let mut key = *triangle;
    key.sort_unstable();
    key
}

/// Mesh under construction.
///
/// Keeps the triangle list together with the registries the evaluator needs
/// for O(1) lookups: every committed directed edge, every committed corner
/// set, and which points are referenced by at least one triangle.
#[derive(Debug)]
pub struct MeshBuilder {
    triangles: Vec<Triangle>,
    directed: HashSet<DirectedEdge>,
    faces: HashSet<[u32; 3]>,
    vertex_used: Vec<bool>,
    used_count: usize,
}

impl MeshBuilder {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            triangles: Vec::new(),
            directed: HashSet::new(),
            faces: HashSet::new(),
            vertex_used: vec![false; vertex_count],
            used_count: 0,
        }
    }

    /// Commit a triangle.
    ///
    /// Fails without touching the mesh when one of its directed edges is
    /// already owned by another triangle.
    pub fn push(&mut self, triangle: Triangle) -> Result<()> {
        let edges = DirectedEdge::of_triangle(&triangle);
        if let Some(taken) = edges.iter().find(|e| self.directed.contains(e)) {
            return Err(Error::ManifoldViolation(format!(
                "Directed edge ({}, {}) of triangle {:?} is already committed",
                taken.from, taken.to, triangle
            )));
        }

        self.directed.extend(edges);
        self.faces.insert(sorted_corners(&triangle));

        for v in triangle {
            let used = &mut self.vertex_used[v as usize];
            if !*used {
                *used = true;
                self.used_count += 1;
            }
        }

        self.triangles.push(triangle);
        Ok(())
    }

    /// Whether a committed triangle owns this directed edge
    #[inline]
    pub fn contains_directed(&self, edge: &DirectedEdge) -> bool {
        self.directed.contains(edge)
    }

    /// Whether a triangle with the same corners was committed, in any winding
    pub fn contains_triangle(&self, triangle: &Triangle) -> bool {
        self.faces.contains(&sorted_corners(triangle))
    }

    /// Whether a point is a corner of at least one triangle
    #[inline]
    pub fn is_used(&self, vertex: u32) -> bool {
        self.vertex_used[vertex as usize]
    }

    pub fn used_count(&self) -> usize {
        self.used_count
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Check indices, corner distinctness and edge uniqueness over the whole list
    pub fn validate_manifold(&self) -> Result<()> {
        let vertex_count = self.vertex_used.len();
        let mut seen: HashSet<DirectedEdge> = HashSet::with_capacity(self.triangles.len() * 3);

        for (i, t) in self.triangles.iter().enumerate() {
            if let Some(v) = t.iter().find(|&&v| v as usize >= vertex_count) {
                return Err(Error::ManifoldViolation(format!(
                    "Triangle {} references vertex {} out of {}",
                    i, v, vertex_count
                )));
            }

            if t[0] == t[1] || t[1] == t[2] || t[0] == t[2] {
                return Err(Error::ManifoldViolation(format!(
                    "Triangle {} has repeated corners: {:?}",
                    i, t
                )));
            }

            for edge in DirectedEdge::of_triangle(t) {
                if !seen.insert(edge) {
                    return Err(Error::ManifoldViolation(format!(
                        "Directed edge ({}, {}) appears twice (triangle {})",
                        edge.from, edge.to, i
                    )));
                }
            }
        }

        Ok(())
    }

    /// Hand out the triangle list and its count
    pub fn finalize(self) -> Result<(Vec<Triangle>, u32)> {
        if cfg!(debug_assertions) {
            self.validate_manifold()?;
        }

        let count = u32::try_from(self.triangles.len()).map_err(|_| {
            Error::Algorithm(format!("{} triangles exceed the u32 range", self.triangles.len()))
        })?;

        Ok((self.triangles, count))
    }
}
