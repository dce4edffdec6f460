//! R*-tree spatial index over a point set
//!
//! The index is built once from the static point set. Geometry never changes
//! afterwards; only the per-point activity flags do, so that points already
//! enclosed by the growing mesh drop out of candidate queries.

use meshgen_core::{is_finite_point, NearestNeighborSearch, Point3d, PointSet};
use rayon::prelude::*;
use rstar::primitives::GeomWithData;
use rstar::RTree;
use std::cmp::Ordering;
use tracing::debug;

/// R-tree entry: coordinates tagged with the point index
type IndexedPoint = GeomWithData<[f64; 3], u32>;

/// Relative shrink applied to a ball before testing strict containment.
///
/// Points on the sphere itself (co-spherical input) are never "inside".
pub const BALL_CONTAINMENT_EPS: f64 = 1e-9;

/// A point returned by a neighbourhood query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: u32,
    pub distance: f64,
}

/// Increasing distance, then increasing index
fn neighbor_order(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.index.cmp(&b.index))
}

#[inline]
fn coords(p: &Point3d) -> [f64; 3] {
    [p.x, p.y, p.z]
}

/// Spatial index supporting radius and k-nearest queries
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
    positions: Vec<Point3d>,
    active: Vec<bool>,
    active_count: usize,
    /// Starting radius for k-nearest searches
    initial_radius: f64,
    /// Axis-aligned bounds of the indexed points
    bounds: (Point3d, Point3d),
    /// Bounding box diagonal
    extent: f64,
}

impl SpatialIndex {
    /// Bulk-load the index. Duplicate points start inactive.
    pub fn new(points: &PointSet) -> Self {
        let entries: Vec<IndexedPoint> = points
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new(coords(p), i as u32))
            .collect();

        let active: Vec<bool> = (0..points.len() as u32)
            .map(|i| points.is_canonical(i))
            .collect();
        let active_count = active.iter().filter(|a| **a).count();

        let bounds = points
            .bounding_box()
            .unwrap_or((Point3d::origin(), Point3d::origin()));
        let extent = points.diagonal().max(f64::MIN_POSITIVE);
        let initial_radius = if points.is_empty() {
            extent
        } else {
            (extent / (points.len() as f64).cbrt()).max(f64::MIN_POSITIVE)
        };

        debug!(
            points = points.len(),
            active = active_count,
            extent,
            "Built spatial index"
        );

        Self {
            tree: RTree::bulk_load(entries),
            positions: points.points().to_vec(),
            active,
            active_count,
            initial_radius,
            bounds,
            extent,
        }
    }

    /// Number of indexed points, duplicates included
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if the index holds no points
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of an indexed point
    #[inline]
    pub fn position(&self, index: u32) -> &Point3d {
        &self.positions[index as usize]
    }

    /// Whether a point still takes part in candidate queries
    #[inline]
    pub fn is_active(&self, index: u32) -> bool {
        self.active[index as usize]
    }

    /// Number of active points
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Exclude a point from future active queries
    pub fn deactivate(&mut self, index: u32) {
        let flag = &mut self.active[index as usize];
        if *flag {
            *flag = false;
            self.active_count -= 1;
        }
    }

    fn collect_within<F>(&self, center: &Point3d, radius: f64, mut keep: F) -> Vec<Neighbor>
    where
        F: FnMut(u32) -> bool,
    {
        let mut found: Vec<Neighbor> = self
            .tree
            .locate_within_distance(coords(center), radius * radius)
            .filter(|entry| keep(entry.data))
            .map(|entry| Neighbor {
                index: entry.data,
                distance: (self.position(entry.data) - center).norm(),
            })
            .collect();
        found.sort_by(neighbor_order);
        found
    }

    /// Every point within `radius` of `center`, active or not
    pub fn within(&self, center: &Point3d, radius: f64) -> Vec<Neighbor> {
        self.collect_within(center, radius, |_| true)
    }

    /// Active points within `radius` of `center`
    pub fn active_within(&self, center: &Point3d, radius: f64) -> Vec<Neighbor> {
        self.collect_within(center, radius, |i| self.is_active(i))
    }

    /// Active points within `radius` of point `index`, the point itself excluded
    pub fn query_neighbors(&self, index: u32, radius: f64) -> Vec<Neighbor> {
        let center = *self.position(index);
        self.collect_within(&center, radius, |i| i != index && self.is_active(i))
    }

    /// Radius around `center` that reaches every indexed point
    fn covering_radius(&self, center: &Point3d) -> f64 {
        let (min, max) = &self.bounds;
        let closest = Point3d::new(
            center.x.clamp(min.x, max.x),
            center.y.clamp(min.y, max.y),
            center.z.clamp(min.z, max.z),
        );
        (center - closest).norm() + self.extent
    }

    fn nearest_k_filtered<F>(&self, center: &Point3d, k: usize, keep: F) -> Vec<Neighbor>
    where
        F: Fn(u32) -> bool,
    {
        if k == 0 || self.is_empty() || !is_finite_point(center) {
            return Vec::new();
        }

        // Grow the search ball until it holds k matches or covers everything.
        let reach = self.covering_radius(center);
        let mut radius = self.initial_radius;
        loop {
            let mut found = self.collect_within(center, radius, &keep);
            if found.len() >= k || radius >= reach {
                found.truncate(k);
                return found;
            }
            radius *= 2.0;
        }
    }

    /// The `k` nearest active points to point `index`, the point itself excluded
    pub fn nearest_k(&self, index: u32, k: usize) -> Vec<Neighbor> {
        let center = *self.position(index);
        self.nearest_k_filtered(&center, k, |i| i != index && self.is_active(i))
    }

    /// Whether any point other than `exclude` lies strictly inside the ball
    pub fn has_point_inside(&self, center: &Point3d, radius: f64, exclude: &[u32]) -> bool {
        let limit = radius * radius * (1.0 - BALL_CONTAINMENT_EPS);
        self.tree
            .locate_within_distance(coords(center), radius * radius)
            .any(|entry| {
                !exclude.contains(&entry.data)
                    && (self.position(entry.data) - center).norm_squared() < limit
            })
    }

    /// Distance from point `index` to its nearest point at a different position
    fn nearest_distinct_distance(&self, index: u32) -> Option<f64> {
        let center = *self.position(index);
        self.nearest_k_filtered(&center, 1, |i| {
            self.is_active(i) && *self.position(i) != center
        })
        .first()
        .map(|n| n.distance)
    }

    /// Mean nearest-neighbour spacing over the active points.
    ///
    /// Queries run in parallel over the read-only tree; the distances are
    /// summed in index order so the result does not depend on scheduling.
    pub fn mean_nearest_distance(&self) -> Option<f64> {
        let distances: Vec<Option<f64>> = (0..self.len() as u32)
            .into_par_iter()
            .map(|i| {
                if self.is_active(i) {
                    self.nearest_distinct_distance(i)
                } else {
                    None
                }
            })
            .collect();

        let (sum, count) = distances
            .iter()
            .flatten()
            .fold((0.0, 0usize), |(sum, count), d| (sum + d, count + 1));

        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }
}

impl NearestNeighborSearch for SpatialIndex {
    fn find_k_nearest(&self, query: &Point3d, k: usize) -> Vec<(usize, f64)> {
        self.nearest_k_filtered(query, k, |_| true)
            .into_iter()
            .map(|n| (n.index as usize, n.distance))
            .collect()
    }

    fn find_radius_neighbors(&self, query: &Point3d, radius: f64) -> Vec<(usize, f64)> {
        self.within(query, radius)
            .into_iter()
            .map(|n| (n.index as usize, n.distance))
            .collect()
    }
}
