//! The advancing front: open boundary edges of the growing mesh
//!
//! Every edge on the front belongs to exactly one committed triangle and
//! carries that triangle's orientation. Edges are handed out in FIFO order.
//! An edge that finds no candidate is parked as a boundary edge; it stays
//! open, so a triangle grown later from the other side can still close it.
//! An edge can also be postponed: it goes back to the end of the queue,
//! stamped with the mesh size at that moment.

use meshgen_core::Triangle;
use std::collections::{HashMap, VecDeque};

/// Ordered pair of point indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirectedEdge {
    pub from: u32,
    pub to: u32,
}

impl DirectedEdge {
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    /// The same segment traversed the other way
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }

    /// The three directed edges of a triangle, following its winding
    pub fn of_triangle(triangle: &Triangle) -> [DirectedEdge; 3] {
        [
            DirectedEdge::new(triangle[0], triangle[1]),
            DirectedEdge::new(triangle[1], triangle[2]),
            DirectedEdge::new(triangle[2], triangle[0]),
        ]
    }
}

/// An open edge together with the apex of the triangle that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontEdge {
    pub edge: DirectedEdge,
    pub opposite: u32,
}

impl FrontEdge {
    pub fn new(from: u32, to: u32, opposite: u32) -> Self {
        Self {
            edge: DirectedEdge::new(from, to),
            opposite,
        }
    }

    /// The owning triangle `(from, to, opposite)`
    pub fn triangle(&self) -> Triangle {
        [self.edge.from, self.edge.to, self.opposite]
    }
}

/// Open edges of the mesh under construction
#[derive(Debug, Default)]
pub struct Front {
    queue: VecDeque<DirectedEdge>,
    /// Edges still waiting for a candidate, keyed to their owning apex
    active: HashMap<DirectedEdge, u32>,
    /// Edges that found no candidate
    boundary: HashMap<DirectedEdge, u32>,
    /// Active edges sent back to the queue, with the mesh size at that time
    postponed: HashMap<DirectedEdge, usize>,
    /// Open (active or boundary) edges incident to each vertex
    open_per_vertex: Vec<u32>,
}

impl Front {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            active: HashMap::new(),
            boundary: HashMap::new(),
            postponed: HashMap::new(),
            open_per_vertex: vec![0; vertex_count],
        }
    }

    fn touch(&mut self, edge: &DirectedEdge, opened: bool) {
        for v in [edge.from, edge.to] {
            let count = &mut self.open_per_vertex[v as usize];
            if opened {
                *count += 1;
            } else {
                *count -= 1;
            }
        }
    }

    /// Add a freshly created edge to the back of the queue
    pub fn insert_edge(&mut self, edge: FrontEdge) {
        debug_assert!(!self.is_open(&edge.edge), "edge {:?} inserted twice", edge.edge);

        self.active.insert(edge.edge, edge.opposite);
        self.queue.push_back(edge.edge);
        self.touch(&edge.edge, true);
    }

    /// Next active edge in FIFO order. The edge stays active until it is
    /// closed or marked as boundary.
    pub fn pop_active_edge(&mut self) -> Option<FrontEdge> {
        while let Some(edge) = self.queue.pop_front() {
            // Entries closed while queued are skipped
            if let Some(&opposite) = self.active.get(&edge) {
                return Some(FrontEdge { edge, opposite });
            }
        }
        None
    }

    /// Remove an edge whose second triangle has been committed.
    ///
    /// Returns false when the edge was not open.
    pub fn close_edge(&mut self, edge: &DirectedEdge) -> bool {
        self.postponed.remove(edge);
        let removed = self.active.remove(edge).is_some() || self.boundary.remove(edge).is_some();
        if removed {
            self.touch(edge, false);
        }
        removed
    }

    /// Park an active edge that found no candidate
    pub fn mark_boundary(&mut self, edge: &FrontEdge) {
        self.postponed.remove(&edge.edge);
        if let Some(opposite) = self.active.remove(&edge.edge) {
            self.boundary.insert(edge.edge, opposite);
        }
    }

    /// Requeue an active edge at the back, remembering `stamp`
    pub fn postpone(&mut self, edge: &FrontEdge, stamp: usize) {
        if self.active.contains_key(&edge.edge) {
            self.postponed.insert(edge.edge, stamp);
            self.queue.push_back(edge.edge);
        }
    }

    /// Stamp of the last postponement of an edge still waiting in the queue
    pub fn postponed_at(&self, edge: &DirectedEdge) -> Option<usize> {
        self.postponed.get(edge).copied()
    }

    /// Whether the edge is waiting for a candidate
    pub fn is_active(&self, edge: &DirectedEdge) -> bool {
        self.active.contains_key(edge)
    }

    /// Whether the edge has been parked as boundary
    pub fn is_boundary(&self, edge: &DirectedEdge) -> bool {
        self.boundary.contains_key(edge)
    }

    /// Active or boundary
    pub fn is_open(&self, edge: &DirectedEdge) -> bool {
        self.is_active(edge) || self.is_boundary(edge)
    }

    /// Number of open edges incident to a vertex
    pub fn open_edges_at(&self, vertex: u32) -> u32 {
        self.open_per_vertex[vertex as usize]
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn boundary_len(&self) -> usize {
        self.boundary.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_front() -> Front {
        let mut front = Front::new(4);
        front.insert_edge(FrontEdge::new(0, 1, 2));
        front.insert_edge(FrontEdge::new(1, 2, 0));
        front.insert_edge(FrontEdge::new(2, 0, 1));
        front
    }

    #[test]
    fn test_edge_reversal() {
        let e = DirectedEdge::new(1, 2);
        assert_eq!(e.reversed(), DirectedEdge::new(2, 1));
        assert_ne!(e, e.reversed());
    }

    #[test]
    fn test_triangle_edges() {
        let edges = DirectedEdge::of_triangle(&[0, 1, 2]);
        assert_eq!(edges[0], DirectedEdge::new(0, 1));
        assert_eq!(edges[1], DirectedEdge::new(1, 2));
        assert_eq!(edges[2], DirectedEdge::new(2, 0));
    }

    #[test]
    fn test_fifo_order() {
        let mut front = seeded_front();
        let first = front.pop_active_edge().unwrap();
        assert_eq!(first, FrontEdge::new(0, 1, 2));
        assert_eq!(first.triangle(), [0, 1, 2]);
        // Popping does not close the edge
        assert!(front.is_active(&first.edge));
        assert_eq!(front.active_len(), 3);
    }

    #[test]
    fn test_closed_edges_are_skipped() {
        let mut front = seeded_front();
        assert!(front.close_edge(&DirectedEdge::new(0, 1)));
        assert!(!front.close_edge(&DirectedEdge::new(0, 1)));

        let next = front.pop_active_edge().unwrap();
        assert_eq!(next.edge, DirectedEdge::new(1, 2));
    }

    #[test]
    fn test_open_counts() {
        let mut front = seeded_front();
        assert_eq!(front.open_edges_at(0), 2);
        assert_eq!(front.open_edges_at(3), 0);

        front.close_edge(&DirectedEdge::new(0, 1));
        assert_eq!(front.open_edges_at(0), 1);
        assert_eq!(front.open_edges_at(1), 1);
        assert_eq!(front.open_edges_at(2), 2);
    }

    #[test]
    fn test_boundary_edges_stay_closable() {
        let mut front = seeded_front();
        let edge = front.pop_active_edge().unwrap();
        front.mark_boundary(&edge);

        assert!(!front.is_active(&edge.edge));
        assert!(front.is_boundary(&edge.edge));
        assert!(front.is_open(&edge.edge));
        assert_eq!(front.open_edges_at(0), 2);

        assert!(front.close_edge(&edge.edge));
        assert_eq!(front.boundary_len(), 0);
        assert_eq!(front.open_edges_at(0), 1);
    }

    #[test]
    fn test_drains_to_empty() {
        let mut front = seeded_front();
        while let Some(edge) = front.pop_active_edge() {
            front.mark_boundary(&edge);
        }
        assert_eq!(front.active_len(), 0);
        assert_eq!(front.boundary_len(), 3);
    }

    #[test]
    fn test_postponed_edge_returns_last() {
        let mut front = seeded_front();
        let first = front.pop_active_edge().unwrap();
        front.postpone(&first, 1);
        assert_eq!(front.postponed_at(&first.edge), Some(1));

        let order: Vec<DirectedEdge> = std::iter::from_fn(|| {
            let edge = front.pop_active_edge()?;
            front.mark_boundary(&edge);
            Some(edge.edge)
        })
        .collect();
        assert_eq!(
            order,
            vec![DirectedEdge::new(1, 2), DirectedEdge::new(2, 0), DirectedEdge::new(0, 1)]
        );
        // Parking clears the stamp
        assert_eq!(front.postponed_at(&first.edge), None);
    }

    #[test]
    fn test_closing_clears_postponement() {
        let mut front = seeded_front();
        let first = front.pop_active_edge().unwrap();
        front.postpone(&first, 1);
        assert!(front.close_edge(&first.edge));
        assert_eq!(front.postponed_at(&first.edge), None);
        assert_eq!(front.pop_active_edge().unwrap().edge, DirectedEdge::new(1, 2));
    }
}
