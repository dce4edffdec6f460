//! Brute force nearest neighbor search
//!
//! Linear scans are fast enough for a handful of points and make a reference
//! the R-tree queries can be checked against.

use meshgen_core::{NearestNeighborSearch, Point3d};

/// Simple brute force nearest neighbor search for small datasets
pub struct BruteForceSearch {
    points: Vec<Point3d>,
}

impl BruteForceSearch {
    pub fn new(points: &[Point3d]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }

    fn distances_to(&self, query: &Point3d) -> impl Iterator<Item = (usize, f64)> + '_ {
        let query = *query;
        self.points.iter().enumerate().map(move |(idx, point)| {
            let dx = point.x - query.x;
            let dy = point.y - query.y;
            let dz = point.z - query.z;
            (idx, (dx * dx + dy * dy + dz * dz).sqrt())
        })
    }
}

impl NearestNeighborSearch for BruteForceSearch {
    fn find_k_nearest(&self, query: &Point3d, k: usize) -> Vec<(usize, f64)> {
        let mut distances: Vec<(usize, f64)> = self.distances_to(query).collect();

        // Stable sort keeps equal distances in index order
        distances.sort_by(|a, b| a.1.total_cmp(&b.1));
        distances.truncate(k);
        distances
    }

    fn find_radius_neighbors(&self, query: &Point3d, radius: f64) -> Vec<(usize, f64)> {
        self.distances_to(query)
            .filter(|(_, distance)| *distance <= radius)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_k_nearest_order() {
        let search = BruteForceSearch::new(&[
            Point3d::new(3.0, 0.0, 0.0),
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(0.0, 2.0, 0.0),
            Point3d::new(0.0, 0.0, 1.0),
        ]);

        let nearest = search.find_k_nearest(&Point3d::origin(), 3);
        let indices: Vec<usize> = nearest.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![1, 3, 2]);
    }

    #[test]
    fn test_radius_neighbors() {
        let search = BruteForceSearch::new(&[
            Point3d::new(0.5, 0.0, 0.0),
            Point3d::new(2.0, 0.0, 0.0),
        ]);
        let found = search.find_radius_neighbors(&Point3d::origin(), 1.0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, 0);
    }
}
