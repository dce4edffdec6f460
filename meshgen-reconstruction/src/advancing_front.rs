//! Entry points for advancing front surface reconstruction

use crate::config::AfsrConfig;
use crate::driver::ReconstructionDriver;
use meshgen_core::{PointSet, Reconstruction, Result, SurfaceReconstructor};
use tracing::instrument;

/// Advancing front surface reconstruction with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct AdvancingFront {
    pub config: AfsrConfig,
}

impl AdvancingFront {
    pub fn new(config: AfsrConfig) -> Self {
        Self { config }
    }
}

impl SurfaceReconstructor for AdvancingFront {
    #[instrument(skip_all, fields(points = points.len()))]
    fn reconstruct(&self, points: &PointSet) -> Result<Reconstruction> {
        ReconstructionDriver::new(points, &self.config)?.run()
    }
}

/// Reconstruct a triangle mesh interpolating the given points
///
/// # Arguments
/// * `points` - Point coordinates; a point is referred to by its position in this slice
///
/// # Returns
/// * `Result<Reconstruction>` - Triangles in commit order with their count
pub fn reconstruct(points: &[[f64; 3]]) -> Result<Reconstruction> {
    reconstruct_with_config(points, &AfsrConfig::default())
}

/// Reconstruct with explicit parameters
///
/// # Arguments
/// * `points` - Point coordinates
/// * `config` - Reconstruction parameters
///
/// # Returns
/// * `Result<Reconstruction>` - Triangles in commit order with their count
#[instrument(skip_all, fields(points = points.len()))]
pub fn reconstruct_with_config(points: &[[f64; 3]], config: &AfsrConfig) -> Result<Reconstruction> {
    let points = PointSet::from_coords(points)?;
    ReconstructionDriver::new(&points, config)?.run()
}
