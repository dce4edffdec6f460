//! The validated input point set

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An ordered, immutable set of finite 3D points.
///
/// The position of a point in the set is its canonical index: triangles
/// produced by a reconstruction refer to points by this index. Exact
/// duplicates are kept (indices must stay stable for the caller) but each one
/// is mapped to the first point with the same coordinates.
///
/// Serializes as the plain point list; deserializing runs the same validation
/// as [`PointSet::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point3d>", into = "Vec<Point3d>")]
pub struct PointSet {
    points: Vec<Point3d>,
    canonical: Vec<u32>,
    distinct: usize,
}

impl PointSet {
    /// Create a point set, rejecting non-finite coordinates
    pub fn new(points: Vec<Point3d>) -> Result<Self> {
        if points.len() > u32::MAX as usize {
            return Err(Error::InvalidData(format!(
                "Point set too large: {} points exceed the u32 index range",
                points.len()
            )));
        }

        if let Some(bad) = points.iter().position(|p| !is_finite_point(p)) {
            return Err(Error::InvalidData(format!(
                "Point {} has a non-finite coordinate: {:?}",
                bad, points[bad]
            )));
        }

        let mut first_seen: HashMap<[u64; 3], u32> = HashMap::with_capacity(points.len());
        let canonical: Vec<u32> = points
            .iter()
            .enumerate()
            .map(|(i, p)| *first_seen.entry(coordinate_key(p)).or_insert(i as u32))
            .collect();
        let distinct = first_seen.len();

        Ok(Self {
            points,
            canonical,
            distinct,
        })
    }

    /// Create a point set from coordinate triples
    pub fn from_coords(coords: &[[f64; 3]]) -> Result<Self> {
        Self::new(coords.iter().copied().map(point_from_coords).collect())
    }

    /// Create a point set from a flat `x0, y0, z0, x1, ...` buffer
    pub fn from_flat(flat: &[f64]) -> Result<Self> {
        if flat.len() % 3 != 0 {
            return Err(Error::InvalidData(format!(
                "Flat coordinate buffer length {} is not a multiple of 3",
                flat.len()
            )));
        }

        Self::new(
            flat.chunks_exact(3)
                .map(|c| Point3d::new(c[0], c[1], c[2]))
                .collect(),
        )
    }

    /// Get the number of points, duplicates included
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point set is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points with distinct coordinates
    pub fn distinct_count(&self) -> usize {
        self.distinct
    }

    /// Get a point by index
    #[inline]
    pub fn point(&self, index: u32) -> &Point3d {
        &self.points[index as usize]
    }

    /// All points in input order
    pub fn points(&self) -> &[Point3d] {
        &self.points
    }

    /// Index of the first point sharing the coordinates of `index`
    #[inline]
    pub fn canonical(&self, index: u32) -> u32 {
        self.canonical[index as usize]
    }

    /// Whether `index` is the first occurrence of its coordinates
    #[inline]
    pub fn is_canonical(&self, index: u32) -> bool {
        self.canonical(index) == index
    }

    /// Get an iterator over the points
    pub fn iter(&self) -> std::slice::Iter<'_, Point3d> {
        self.points.iter()
    }

    /// Axis-aligned bounding box, `None` for an empty set
    pub fn bounding_box(&self) -> Option<(Point3d, Point3d)> {
        let first = *self.points.first()?;
        let mut min = first;
        let mut max = first;

        for p in &self.points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);

            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some((min, max))
    }

    /// Length of the bounding box diagonal (0 for empty sets)
    pub fn diagonal(&self) -> f64 {
        self.bounding_box()
            .map(|(min, max)| (max - min).norm())
            .unwrap_or(0.0)
    }
}

impl TryFrom<Vec<Point3d>> for PointSet {
    type Error = Error;

    fn try_from(points: Vec<Point3d>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<PointSet> for Vec<Point3d> {
    fn from(set: PointSet) -> Self {
        set.points
    }
}
