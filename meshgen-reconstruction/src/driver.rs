//! Advancing front reconstruction loop
//!
//! The driver owns the spatial index, the front and the mesh builder for the
//! duration of one reconstruction. It moves through three phases: looking for
//! a seed triangle, advancing the front grown from that seed, and terminated.
//! With [`ComponentPolicy::Multiple`] an exhausted front sends it back to
//! seeding among the points no triangle uses yet.

use crate::builder::MeshBuilder;
use crate::config::{AfsrConfig, ComponentPolicy};
use crate::evaluator::{Candidate, CandidateEvaluator, Selection};
use crate::front::{Front, FrontEdge};
use crate::geometry::{ball_center, circumcircle};
use crate::orientation;
use itertools::Itertools;
use meshgen_algorithms::SpatialIndex;
use meshgen_core::{Error, PointSet, Reconstruction, ReconstructionWarning, Result, Triangle};
use tracing::{debug, info, trace};

/// Relative tolerance of the seed side test, as a fraction of the search radius
const SEED_PLANE_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Seeding,
    Advancing,
    Terminated,
}

/// One advancing front reconstruction over a borrowed point set.
///
/// Built with [`ReconstructionDriver::new`] and consumed by
/// [`ReconstructionDriver::run`].
pub struct ReconstructionDriver<'a> {
    points: &'a PointSet,
    config: &'a AfsrConfig,
    index: SpatialIndex,
    front: Front,
    mesh: MeshBuilder,
    evaluator: CandidateEvaluator,
    /// Canonical points in lexicographic `(x, y, z, index)` order
    seed_order: Vec<u32>,
    seed_cursor: usize,
    phase: Phase,
    components: usize,
}

impl<'a> ReconstructionDriver<'a> {
    /// Validate the configuration, pick the ball radius and order the seeds.
    ///
    /// Fails with [`Error::InsufficientPoints`] when fewer than three
    /// distinct points are given.
    pub fn new(points: &'a PointSet, config: &'a AfsrConfig) -> Result<Self> {
        config.validate()?;

        let found = points.distinct_count();
        if found < 3 {
            return Err(Error::InsufficientPoints { found });
        }

        let index = SpatialIndex::new(points);
        let ball_radius = match config.ball_radius {
            Some(radius) => radius,
            None => {
                let spacing = index
                    .mean_nearest_distance()
                    .ok_or(Error::InsufficientPoints { found })?;
                spacing * config.ball_radius_factor
            }
        };

        let seed_order: Vec<u32> = (0..points.len() as u32)
            .filter(|&i| points.is_canonical(i))
            .sorted_by(|&i, &j| {
                let (p, q) = (points.point(i), points.point(j));
                p.x.total_cmp(&q.x)
                    .then_with(|| p.y.total_cmp(&q.y))
                    .then_with(|| p.z.total_cmp(&q.z))
                    .then_with(|| i.cmp(&j))
            })
            .collect();

        debug!(ball_radius, seeds = seed_order.len(), "Prepared reconstruction");

        Ok(Self {
            points,
            config,
            index,
            front: Front::new(points.len()),
            mesh: MeshBuilder::new(points.len()),
            evaluator: CandidateEvaluator::new(config, ball_radius),
            seed_order,
            seed_cursor: 0,
            phase: Phase::Seeding,
            components: 0,
        })
    }

    /// Ball radius in use, configured or derived from the point spacing
    pub fn ball_radius(&self) -> f64 {
        self.evaluator.ball_radius()
    }

    /// Run until no front edge and no seed is left.
    ///
    /// Returns [`Error::DegenerateSeed`] when not a single triangle could be
    /// built.
    pub fn run(mut self) -> Result<Reconstruction> {
        info!(
            points = self.points.len(),
            distinct = self.points.distinct_count(),
            ball_radius = self.ball_radius(),
            "Starting advancing front reconstruction"
        );

        while self.phase != Phase::Terminated {
            self.step()?;
        }

        if self.mesh.is_empty() {
            return Err(Error::DegenerateSeed);
        }

        let boundary_edges = self.front.boundary_len();
        let unused_points = (0..self.points.len() as u32)
            .filter(|&i| self.points.is_canonical(i) && !self.mesh.is_used(i))
            .count();
        let components = self.components;

        let (mut triangles, triangle_count) = self.mesh.finalize()?;
        if self.config.orient_outward {
            orientation::orient_outward(self.points, &mut triangles);
        }

        let mut warnings = Vec::new();
        if boundary_edges > 0 || unused_points > 0 {
            debug!(boundary_edges, unused_points, "Front stalled");
            warnings.push(ReconstructionWarning::StalledFront {
                boundary_edges,
                unused_points,
            });
        }

        info!(
            triangles = triangle_count,
            components,
            boundary_edges,
            unused_points,
            "Reconstruction complete"
        );

        Ok(Reconstruction::new(triangles, triangle_count, warnings))
    }

    fn step(&mut self) -> Result<()> {
        match self.phase {
            Phase::Seeding => match self.find_seed() {
                Some(seed) => {
                    self.commit_seed(seed)?;
                    self.components += 1;
                    debug!(component = self.components, ?seed, "Seeded new front");
                    self.phase = Phase::Advancing;
                }
                None => {
                    debug!(components = self.components, "No further seed triangle");
                    self.phase = Phase::Terminated;
                }
            },
            Phase::Advancing => match self.front.pop_active_edge() {
                Some(edge) => self.advance(&edge)?,
                None => {
                    debug!(
                        triangles = self.mesh.len(),
                        boundary_edges = self.front.boundary_len(),
                        "Front exhausted"
                    );
                    self.phase = match self.config.component_policy {
                        ComponentPolicy::Single => Phase::Terminated,
                        ComponentPolicy::Multiple => Phase::Seeding,
                    };
                }
            },
            Phase::Terminated => {}
        }
        Ok(())
    }

    /// Next seed triangle among unused points, resuming where the last search stopped
    fn find_seed(&mut self) -> Option<Triangle> {
        while self.seed_cursor < self.seed_order.len() {
            let a = self.seed_order[self.seed_cursor];
            if !self.mesh.is_used(a) {
                if let Some(seed) = self.seed_at(a) {
                    return Some(seed);
                }
            }
            self.seed_cursor += 1;
        }
        None
    }

    /// A seed triangle with corner `a`: a local hull face whose outer ball is empty
    fn seed_at(&self, a: u32) -> Option<Triangle> {
        let rho = self.ball_radius();
        let pa = *self.index.position(a);

        let neighbors: Vec<u32> = self
            .index
            .nearest_k(a, self.config.seed_neighbors)
            .into_iter()
            .map(|n| n.index)
            .filter(|&i| !self.mesh.is_used(i))
            .collect();
        let nearby = self.index.within(&pa, 2.0 * rho);
        let tolerance = SEED_PLANE_EPS * 2.0 * rho;

        for (b, c) in neighbors.iter().copied().tuple_combinations() {
            let pb = self.index.position(b);
            let pc = self.index.position(c);

            let circle = match circumcircle(&pa, pb, pc) {
                Some(circle) if circle.radius <= rho => circle,
                _ => continue,
            };

            let (mut above, mut below) = (0usize, 0usize);
            for n in &nearby {
                if n.index == a || n.index == b || n.index == c {
                    continue;
                }
                let side = circle.normal.dot(&(self.index.position(n.index) - pa));
                if side > tolerance {
                    above += 1;
                } else if side < -tolerance {
                    below += 1;
                }
            }
            if above > 0 && below > 0 {
                continue;
            }

            // The neighbourhood lies behind the seed
            let (triangle, circle) = if above > 0 {
                let flipped = match circumcircle(&pa, pc, pb) {
                    Some(flipped) => flipped,
                    None => continue,
                };
                ([a, c, b], flipped)
            } else {
                ([a, b, c], circle)
            };

            let center = match ball_center(&circle, rho) {
                Some(center) => center,
                None => continue,
            };
            if !self.index.has_point_inside(&center, rho, &triangle) {
                return Some(triangle);
            }
            trace!(?triangle, "Seed ball not empty");
        }

        None
    }

    fn commit_seed(&mut self, seed: Triangle) -> Result<()> {
        self.mesh.push(seed)?;
        let [a, b, c] = seed;
        self.front.insert_edge(FrontEdge::new(a, b, c));
        self.front.insert_edge(FrontEdge::new(b, c, a));
        self.front.insert_edge(FrontEdge::new(c, a, b));
        Ok(())
    }

    fn advance(&mut self, edge: &FrontEdge) -> Result<()> {
        match self
            .evaluator
            .best_candidate(&self.index, &self.mesh, &self.front, edge)
        {
            Selection::Accept(candidate) => self.commit(edge, &candidate),
            // Retried only if the mesh has grown since the last attempt
            Selection::Postpone { apex }
                if self.front.postponed_at(&edge.edge) != Some(self.mesh.len()) =>
            {
                trace!(from = edge.edge.from, to = edge.edge.to, apex, "Edge postponed");
                self.front.postpone(edge, self.mesh.len());
                Ok(())
            }
            Selection::Postpone { .. } | Selection::Exhausted => {
                trace!(from = edge.edge.from, to = edge.edge.to, "Edge left on the boundary");
                self.front.mark_boundary(edge);
                Ok(())
            }
        }
    }

    /// Add the triangle `(b, a, c)` across front edge `(a, b)`
    fn commit(&mut self, edge: &FrontEdge, candidate: &Candidate) -> Result<()> {
        let (a, b, c) = (edge.edge.from, edge.edge.to, candidate.apex);
        self.mesh.push([b, a, c])?;
        trace!(a, b, c, rotation = candidate.rotation, "Committed triangle");

        self.front.close_edge(&edge.edge);
        for new_edge in [FrontEdge::new(a, c, b), FrontEdge::new(c, b, a)] {
            if !self.front.close_edge(&new_edge.edge.reversed()) {
                self.front.insert_edge(new_edge);
            }
        }

        for v in [a, b, c] {
            if self.front.open_edges_at(v) == 0 {
                self.index.deactivate(v);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front::DirectedEdge;
    use approx::assert_relative_eq;
    use meshgen_algorithms::samples;

    #[test]
    fn test_rejects_too_few_distinct_points() {
        let points = PointSet::from_coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0]]).unwrap();
        let config = AfsrConfig::default();
        let result = ReconstructionDriver::new(&points, &config);
        assert!(matches!(result, Err(Error::InsufficientPoints { found: 2 })));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let points = PointSet::new(samples::icosahedron(1.0)).unwrap();
        let config = AfsrConfig::default().with_seed_neighbors(0);
        let result = ReconstructionDriver::new(&points, &config);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_automatic_ball_radius() {
        let points = PointSet::from_coords(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ])
        .unwrap();
        let config = AfsrConfig::default().with_ball_radius_factor(1.5);
        let driver = ReconstructionDriver::new(&points, &config).unwrap();
        assert_relative_eq!(driver.ball_radius(), 1.5, epsilon = 1e-12);

        let fixed = AfsrConfig::default().with_ball_radius(0.25);
        let driver = ReconstructionDriver::new(&points, &fixed).unwrap();
        assert_relative_eq!(driver.ball_radius(), 0.25);
    }

    #[test]
    fn test_seed_order_is_lexicographic() {
        let points = PointSet::from_coords(&[
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0],
        ])
        .unwrap();
        let config = AfsrConfig::default();
        let driver = ReconstructionDriver::new(&points, &config).unwrap();
        // The duplicate at index 3 never seeds
        assert_eq!(driver.seed_order, vec![4, 2, 1, 0]);
    }

    #[test]
    fn test_seed_is_oriented_away_from_neighbours() {
        let points = PointSet::new(samples::icosahedron(1.0)).unwrap();
        let config = AfsrConfig::default();
        let mut driver = ReconstructionDriver::new(&points, &config).unwrap();

        let seed = driver.find_seed().unwrap();
        let [a, b, c] = seed;
        let normal = (points.point(b) - points.point(a)).cross(&(points.point(c) - points.point(a)));
        // Outward normal on a sphere centred at the origin
        assert!(normal.dot(&points.point(a).coords) > 0.0);

        driver.commit_seed(seed).unwrap();
        assert_eq!(driver.front.active_len(), 3);
    }

    #[test]
    fn test_tetrahedron_closes() {
        let points = PointSet::from_coords(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ])
        .unwrap();
        let config = AfsrConfig::default().with_ball_radius(2.0);
        let driver = ReconstructionDriver::new(&points, &config).unwrap();

        let result = driver.run().unwrap();
        assert_eq!(result.triangle_count, 4);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_pinching_edge_postponed_then_parked() {
        let points = PointSet::from_coords(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.5, 0.8, 0.0],
            [0.5, -0.8, 0.0],
            [1.5, -0.8, 0.0],
            [0.5, -1.6, 0.0],
        ])
        .unwrap();
        let config = AfsrConfig::default().with_ball_radius(1.0);
        let mut driver = ReconstructionDriver::new(&points, &config).unwrap();

        // Two triangles touching only at vertex 3
        driver.commit_seed([0, 1, 2]).unwrap();
        driver.commit_seed([3, 5, 4]).unwrap();

        let edge = driver.front.pop_active_edge().unwrap();
        assert_eq!(edge.edge, DirectedEdge::new(0, 1));

        driver.advance(&edge).unwrap();
        assert_eq!(driver.front.postponed_at(&edge.edge), Some(2));
        assert!(driver.front.is_active(&edge.edge));

        // No triangle was added in between
        driver.advance(&edge).unwrap();
        assert!(driver.front.is_boundary(&edge.edge));
        assert_eq!(driver.mesh.len(), 2);
    }

    #[test]
    fn test_single_triangle_is_stalled() {
        let points = PointSet::from_coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).unwrap();
        let config = AfsrConfig::default();
        let result = ReconstructionDriver::new(&points, &config).unwrap().run().unwrap();

        assert_eq!(result.triangle_count, 1);
        assert_eq!(
            result.warnings,
            vec![ReconstructionWarning::StalledFront {
                boundary_edges: 3,
                unused_points: 0
            }]
        );
    }
}
