//! Global orientation pass over a finished triangle list

use meshgen_core::{PointSet, Triangle};
use rayon::prelude::*;
use tracing::debug;

/// Signed volume enclosed by the triangles, `sum p1 . (p2 x p3) / 6`.
///
/// Per-triangle terms are computed in parallel and summed in triangle order,
/// so the value does not depend on thread scheduling.
pub fn signed_volume(points: &PointSet, triangles: &[Triangle]) -> f64 {
    let terms: Vec<f64> = triangles
        .par_iter()
        .map(|t| {
            let p1 = points.point(t[0]).coords;
            let p2 = points.point(t[1]).coords;
            let p3 = points.point(t[2]).coords;
            p1.dot(&p2.cross(&p3))
        })
        .collect();

    terms.iter().sum::<f64>() / 6.0
}

/// Flip every triangle when the mesh encloses a negative volume.
///
/// Returns whether the triangles were flipped.
pub fn orient_outward(points: &PointSet, triangles: &mut [Triangle]) -> bool {
    let volume = signed_volume(points, triangles);
    if volume >= 0.0 {
        return false;
    }

    debug!(volume, "Negative signed volume, flipping triangles");
    for t in triangles.iter_mut() {
        t.swap(1, 2);
    }
    true
}
