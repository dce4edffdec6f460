//! Candidate evaluation for front edges
//!
//! For a front edge `(a, b)` owned by the committed triangle `(a, b, o)`, a
//! candidate apex `c` proposes the triangle `(b, a, c)`. The ball of radius
//! rho resting on `(a, b, o)` is pivoted around the edge; candidates are
//! ranked by how far the ball has to rotate before it touches them, and the
//! first one whose ball is empty wins.
//!
//! A used vertex is only accepted as apex when the new triangle attaches to
//! its fan along an open edge. Otherwise the vertex would join two separate
//! parts of the front and its boundary would no longer be a simple loop.

use crate::builder::MeshBuilder;
use crate::config::AfsrConfig;
use crate::front::{DirectedEdge, Front, FrontEdge};
use crate::geometry::{ball_center, circumcircle, perimeter, pivot_angle, Circle, ANGLE_TIE_EPS};
use meshgen_algorithms::SpatialIndex;
use meshgen_core::{Point3d, Vector3d};
use std::cmp::Ordering;
use tracing::trace;

/// A proposed apex for a front edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub apex: u32,
    /// Pivot rotation from the resting ball, in `[0, 2pi)`
    pub rotation: f64,
    /// Circumradius of the proposed triangle
    pub radius: f64,
    /// Centre of the ball through the proposed triangle
    pub center: Point3d,
    /// Number of open front edges the triangle would close besides its base
    pub closes: usize,
}

/// Why a candidate apex was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TriangleExists,
    EdgeTaken,
    Degenerate,
    TooLarge,
    RadiusRatio,
    Perimeter,
    Fold,
    BallNotEmpty,
    /// The apex is a used vertex that is not next to the edge on the front
    PinchedVertex,
}

/// Outcome of pivoting the ball around a front edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    Accept(Candidate),
    /// The ball first touches a used vertex that would be pinched; the edge
    /// may succeed once the front around that vertex has moved on
    Postpone { apex: u32 },
    /// No candidate at all
    Exhausted,
}

/// Scores candidate apexes against a fixed ball radius
#[derive(Debug, Clone)]
pub struct CandidateEvaluator {
    ball_radius: f64,
    cos_beta: f64,
    radius_ratio_bound: f64,
    max_perimeter: Option<f64>,
}

/// Resting state of the ball on the triangle that owns a front edge
struct Pivot {
    from: Point3d,
    to: Point3d,
    axis: Vector3d,
    midpoint: Point3d,
    rest: Vector3d,
    owner: Circle,
}

impl CandidateEvaluator {
    pub fn new(config: &AfsrConfig, ball_radius: f64) -> Self {
        Self {
            ball_radius,
            cos_beta: config.beta.cos(),
            radius_ratio_bound: config.radius_ratio_bound,
            max_perimeter: config.max_perimeter,
        }
    }

    pub fn ball_radius(&self) -> f64 {
        self.ball_radius
    }

    fn pivot(&self, index: &SpatialIndex, edge: &FrontEdge) -> Option<Pivot> {
        let from = *index.position(edge.edge.from);
        let to = *index.position(edge.edge.to);
        let owner = circumcircle(&from, &to, index.position(edge.opposite))?;

        // The owner passed the radius test, rounding aside
        let rest_center = ball_center(&owner, self.ball_radius).unwrap_or(owner.center);
        let axis = (to - from).try_normalize(0.0)?;
        let midpoint = nalgebra::center(&from, &to);

        Some(Pivot {
            from,
            to,
            axis,
            midpoint,
            rest: rest_center - midpoint,
            owner,
        })
    }

    /// Run every test except ball emptiness on the triangle `(b, a, apex)`
    fn evaluate(
        &self,
        index: &SpatialIndex,
        mesh: &MeshBuilder,
        front: &Front,
        edge: &FrontEdge,
        pivot: &Pivot,
        apex: u32,
    ) -> Result<Candidate, Rejection> {
        let (a, b) = (edge.edge.from, edge.edge.to);

        if mesh.contains_triangle(&[b, a, apex]) {
            return Err(Rejection::TriangleExists);
        }

        let forward = DirectedEdge::new(a, apex);
        let backward = DirectedEdge::new(apex, b);
        if mesh.contains_directed(&forward) || mesh.contains_directed(&backward) {
            return Err(Rejection::EdgeTaken);
        }

        let c = index.position(apex);
        let circle = circumcircle(&pivot.to, &pivot.from, c).ok_or(Rejection::Degenerate)?;
        let center = ball_center(&circle, self.ball_radius).ok_or(Rejection::TooLarge)?;

        if circle.radius > self.radius_ratio_bound * pivot.owner.radius {
            return Err(Rejection::RadiusRatio);
        }

        if let Some(limit) = self.max_perimeter {
            if perimeter(&pivot.to, &pivot.from, c) > limit {
                return Err(Rejection::Perimeter);
            }
        }

        if pivot.owner.normal.dot(&circle.normal) < -self.cos_beta {
            return Err(Rejection::Fold);
        }

        let closes = [forward, backward]
            .iter()
            .filter(|e| front.is_open(&e.reversed()))
            .count();

        Ok(Candidate {
            apex,
            rotation: pivot_angle(&pivot.axis, &pivot.rest, &(center - pivot.midpoint)),
            radius: circle.radius,
            center,
            closes,
        })
    }

    /// Best apex for a front edge.
    ///
    /// Candidates are walked in order of increasing rotation. Rotations
    /// within `ANGLE_TIE_EPS` of each other form one group; inside a group
    /// only candidates with an empty ball count, and the one closing the most
    /// open edges wins, then the smaller circumradius, then the smaller index.
    /// A group whose only empty-ball candidates would pinch a used vertex
    /// stops the walk with [`Selection::Postpone`].
    pub fn best_candidate(
        &self,
        index: &SpatialIndex,
        mesh: &MeshBuilder,
        front: &Front,
        edge: &FrontEdge,
    ) -> Selection {
        let pivot = match self.pivot(index, edge) {
            Some(pivot) => pivot,
            None => return Selection::Exhausted,
        };
        let (a, b) = (edge.edge.from, edge.edge.to);

        let mut candidates: Vec<Candidate> = index
            .active_within(&pivot.midpoint, 2.0 * self.ball_radius)
            .into_iter()
            .filter(|n| n.index != a && n.index != b && n.index != edge.opposite)
            .filter_map(|n| match self.evaluate(index, mesh, front, edge, &pivot, n.index) {
                Ok(candidate) => Some(candidate),
                Err(reason) => {
                    trace!(apex = n.index, ?reason, "Rejected candidate");
                    None
                }
            })
            .collect();

        candidates.sort_by(|x, y| {
            x.rotation
                .total_cmp(&y.rotation)
                .then_with(|| x.apex.cmp(&y.apex))
        });

        let mut start = 0;
        while start < candidates.len() {
            let lead = candidates[start].rotation;
            let end = candidates[start..]
                .iter()
                .position(|c| c.rotation - lead > ANGLE_TIE_EPS)
                .map_or(candidates.len(), |offset| start + offset);

            let (pinched, manifold): (Vec<&Candidate>, Vec<&Candidate>) = candidates[start..end]
                .iter()
                .filter(|c| {
                    let empty = !index.has_point_inside(&c.center, self.ball_radius, &[a, b, c.apex]);
                    if !empty {
                        trace!(apex = c.apex, reason = ?Rejection::BallNotEmpty, "Rejected candidate");
                    }
                    empty
                })
                .partition(|c| pinches(mesh, c));

            if let Some(winner) = manifold.into_iter().min_by(|x, y| prefer(x, y)) {
                return Selection::Accept(*winner);
            }
            if let Some(blocker) = pinched.into_iter().min_by(|x, y| prefer(x, y)) {
                trace!(apex = blocker.apex, reason = ?Rejection::PinchedVertex, "Rejected candidate");
                return Selection::Postpone { apex: blocker.apex };
            }
            start = end;
        }

        Selection::Exhausted
    }
}

/// Whether committing the candidate would give its apex a second fan sector.
///
/// A used apex keeps a single sector only when the new triangle closes one
/// of the open edges at that apex.
fn pinches(mesh: &MeshBuilder, candidate: &Candidate) -> bool {
    mesh.is_used(candidate.apex) && candidate.closes == 0
}

/// Order within a group of tied rotations, best first
fn prefer(x: &Candidate, y: &Candidate) -> Ordering {
    y.closes
        .cmp(&x.closes)
        .then_with(|| x.radius.total_cmp(&y.radius))
        .then_with(|| x.apex.cmp(&y.apex))
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshgen_core::PointSet;

    // Owner triangle (0, 1, 2) in the xy plane with normal +z and the
    // mirrored apex 3 on the other side of edge (0, 1).
    fn fixture(extra: &[[f64; 3]]) -> (SpatialIndex, MeshBuilder, Front) {
        let mut coords = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.5, 0.8, 0.0],
            [0.5, -0.8, 0.0],
        ];
        coords.extend_from_slice(extra);
        let points = PointSet::from_coords(&coords).unwrap();

        let index = SpatialIndex::new(&points);
        let mut mesh = MeshBuilder::new(points.len());
        mesh.push([0, 1, 2]).unwrap();

        let mut front = Front::new(points.len());
        front.insert_edge(FrontEdge::new(0, 1, 2));
        front.insert_edge(FrontEdge::new(1, 2, 0));
        front.insert_edge(FrontEdge::new(2, 0, 1));

        (index, mesh, front)
    }

    fn evaluator() -> CandidateEvaluator {
        CandidateEvaluator::new(&AfsrConfig::default(), 1.0)
    }

    fn evaluate_apex(
        evaluator: &CandidateEvaluator,
        state: &(SpatialIndex, MeshBuilder, Front),
        apex: u32,
    ) -> Result<Candidate, Rejection> {
        let (index, mesh, front) = state;
        let edge = FrontEdge::new(0, 1, 2);
        let pivot = evaluator.pivot(index, &edge).unwrap();
        evaluator.evaluate(index, mesh, front, &edge, &pivot, apex)
    }

    #[test]
    fn test_flat_continuation_wins() {
        let (index, mesh, front) = fixture(&[]);
        let best = match evaluator().best_candidate(&index, &mesh, &front, &FrontEdge::new(0, 1, 2)) {
            Selection::Accept(best) => best,
            other => panic!("expected a candidate, got {:?}", other),
        };

        assert_eq!(best.apex, 3);
        assert_eq!(best.closes, 0);
        assert!(best.rotation > 0.0 && best.rotation < std::f64::consts::PI);
        // The new triangle (1, 0, 3) keeps the +z side as its outside
        assert!(best.center.z > 0.0);
    }

    #[test]
    fn test_existing_triangle_rejected() {
        let state = fixture(&[]);
        assert_eq!(evaluate_apex(&evaluator(), &state, 2), Err(Rejection::TriangleExists));
    }

    #[test]
    fn test_taken_edge_rejected() {
        let mut state = fixture(&[[2.0, -1.0, 0.0]]);
        // (3, 1) becomes owned by a committed triangle
        state.1.push([3, 1, 4]).unwrap();
        assert_eq!(evaluate_apex(&evaluator(), &state, 3), Err(Rejection::EdgeTaken));
    }

    #[test]
    fn test_large_triangle_rejected() {
        let state = fixture(&[[0.5, -5.0, 0.0]]);
        assert_eq!(evaluate_apex(&evaluator(), &state, 4), Err(Rejection::TooLarge));
    }

    #[test]
    fn test_radius_ratio_rejected() {
        let state = fixture(&[[0.5, -0.95, 0.0]]);
        let strict = CandidateEvaluator::new(&AfsrConfig::default().with_radius_ratio_bound(1.0), 1.0);
        assert_eq!(evaluate_apex(&strict, &state, 4), Err(Rejection::RadiusRatio));
        assert!(evaluate_apex(&evaluator(), &state, 4).is_ok());
    }

    #[test]
    fn test_perimeter_rejected() {
        let state = fixture(&[]);
        let bounded = CandidateEvaluator::new(&AfsrConfig::default().with_max_perimeter(2.0), 1.0);
        assert_eq!(evaluate_apex(&bounded, &state, 3), Err(Rejection::Perimeter));
    }

    #[test]
    fn test_fold_rejected() {
        let state = fixture(&[[0.5, 0.6, 0.1]]);
        assert_eq!(evaluate_apex(&evaluator(), &state, 4), Err(Rejection::Fold));
    }

    #[test]
    fn test_degenerate_rejected() {
        let state = fixture(&[[2.0, 0.0, 0.0]]);
        assert_eq!(evaluate_apex(&evaluator(), &state, 4), Err(Rejection::Degenerate));
    }

    #[test]
    fn test_inactive_point_still_blocks_ball() {
        // Point 4 sits inside the ball through (1, 0, 3)
        let (mut index, mesh, front) = fixture(&[[0.5, -0.3, 0.5]]);
        index.deactivate(4);

        let best = evaluator().best_candidate(&index, &mesh, &front, &FrontEdge::new(0, 1, 2));
        assert_eq!(best, Selection::Exhausted);
    }

    #[test]
    fn test_detached_used_apex_postponed() {
        // Triangle (3, 5, 4) shares only vertex 3 with the front of (0, 1, 2)
        let (index, mut mesh, mut front) = fixture(&[[1.5, -0.8, 0.0], [0.5, -1.6, 0.0]]);
        mesh.push([3, 5, 4]).unwrap();
        front.insert_edge(FrontEdge::new(3, 5, 4));
        front.insert_edge(FrontEdge::new(5, 4, 3));
        front.insert_edge(FrontEdge::new(4, 3, 5));

        let best = evaluator().best_candidate(&index, &mesh, &front, &FrontEdge::new(0, 1, 2));
        assert_eq!(best, Selection::Postpone { apex: 3 });
    }

    #[test]
    fn test_adjacent_used_apex_accepted() {
        // Triangle (3, 0, 4) leaves (3, 0) open, so the apex joins along it
        let (index, mut mesh, mut front) = fixture(&[[-0.5, -0.8, 0.0]]);
        mesh.push([3, 0, 4]).unwrap();
        front.insert_edge(FrontEdge::new(3, 0, 4));
        front.insert_edge(FrontEdge::new(0, 4, 3));
        front.insert_edge(FrontEdge::new(4, 3, 0));

        match evaluator().best_candidate(&index, &mesh, &front, &FrontEdge::new(0, 1, 2)) {
            Selection::Accept(best) => {
                assert_eq!(best.apex, 3);
                assert_eq!(best.closes, 1);
            }
            other => panic!("expected a candidate, got {:?}", other),
        }
    }

    #[test]
    fn test_prefers_closing_candidate_on_tie() {
        let base = Candidate {
            apex: 7,
            rotation: 1.0,
            radius: 0.5,
            center: Point3d::origin(),
            closes: 0,
        };
        let closing = Candidate {
            apex: 9,
            radius: 0.6,
            closes: 1,
            ..base
        };
        let smaller = Candidate { apex: 8, radius: 0.4, ..base };

        assert_eq!(prefer(&closing, &base), Ordering::Less);
        assert_eq!(prefer(&smaller, &base), Ordering::Less);
        assert_eq!(prefer(&base, &Candidate { apex: 8, ..base }), Ordering::Less);
    }
}
