//! Topological statistics of a triangle list

use crate::front::DirectedEdge;
use meshgen_core::{Error, Result, Triangle};
use std::collections::{BTreeMap, BTreeSet};

/// Edge and vertex statistics of a triangle list
#[derive(Debug, Clone)]
pub struct MeshTopology {
    vertex_count: usize,
    face_count: usize,
    /// Directed edges keyed by undirected edge `(min, max)`
    edges: BTreeMap<(u32, u32), Vec<DirectedEdge>>,
}

impl MeshTopology {
    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        let mut vertices = BTreeSet::new();
        let mut edges: BTreeMap<(u32, u32), Vec<DirectedEdge>> = BTreeMap::new();

        for t in triangles {
            vertices.extend(t.iter().copied());
            for edge in DirectedEdge::of_triangle(t) {
                let key = (edge.from.min(edge.to), edge.from.max(edge.to));
                edges.entry(key).or_default().push(edge);
            }
        }

        Self {
            vertex_count: vertices.len(),
            face_count: triangles.len(),
            edges,
        }
    }

    /// Vertices referenced by at least one triangle
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Undirected edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.face_count
    }

    /// Edges with a single adjacent triangle, in that triangle's direction
    pub fn boundary_edges(&self) -> Vec<DirectedEdge> {
        self.edges
            .values()
            .filter(|uses| uses.len() == 1)
            .map(|uses| uses[0])
            .collect()
    }

    /// Edges shared by more than two triangles, or by two with the same direction
    pub fn non_manifold_edges(&self) -> Vec<(u32, u32)> {
        self.edges
            .iter()
            .filter(|(_, uses)| uses.len() > 2 || (uses.len() == 2 && uses[0] == uses[1]))
            .map(|(key, _)| *key)
            .collect()
    }

    /// `V - E + F`
    pub fn euler_characteristic(&self) -> i64 {
        self.vertex_count as i64 - self.edge_count() as i64 + self.face_count as i64
    }

    /// Every edge has exactly two oppositely oriented triangles
    pub fn is_closed(&self) -> bool {
        self.face_count > 0
            && self
                .edges
                .values()
                .all(|uses| uses.len() == 2 && uses[0] == uses[1].reversed())
    }

    /// Boundary edges chained into closed loops of vertex indices.
    ///
    /// Fails when a boundary vertex does not have exactly one incoming and one
    /// outgoing boundary edge, since the loops would not be simple.
    pub fn boundary_loops(&self) -> Result<Vec<Vec<u32>>> {
        let boundary = self.boundary_edges();

        let mut next: BTreeMap<u32, u32> = BTreeMap::new();
        let mut incoming: BTreeMap<u32, usize> = BTreeMap::new();
        for edge in &boundary {
            if next.insert(edge.from, edge.to).is_some() {
                return Err(Error::ManifoldViolation(format!(
                    "Boundary vertex {} has more than one outgoing boundary edge",
                    edge.from
                )));
            }
            *incoming.entry(edge.to).or_default() += 1;
        }

        for (&vertex, &count) in &incoming {
            if count != 1 || !next.contains_key(&vertex) {
                return Err(Error::ManifoldViolation(format!(
                    "Boundary vertex {} is not on a simple loop",
                    vertex
                )));
            }
        }
        if let Some(&vertex) = next.keys().find(|v| !incoming.contains_key(v)) {
            return Err(Error::ManifoldViolation(format!(
                "Boundary vertex {} has no incoming boundary edge",
                vertex
            )));
        }

        let mut loops = Vec::new();
        while let Some((start, mut current)) = next.pop_first() {
            let mut cycle = vec![start];
            while current != start {
                cycle.push(current);
                current = next.remove(&current).ok_or_else(|| {
                    Error::Algorithm(format!("Boundary walk broke at vertex {}", current))
                })?;
            }
            loops.push(cycle);
        }

        Ok(loops)
    }
}
