//! Configuration for advancing front reconstruction

use meshgen_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// What the driver does once the first front is exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentPolicy {
    /// Stop after the surface patch grown from the first seed
    Single,
    /// Reseed among unused points until no seed triangle can be found
    Multiple,
}

/// Configuration for advancing front surface reconstruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AfsrConfig {
    /// Radius of the pivoting ball (None = derived from point spacing)
    pub ball_radius: Option<f64>,
    /// Multiplier on the mean nearest-neighbour distance when `ball_radius` is None
    pub ball_radius_factor: f64,
    /// Smallest dihedral angle allowed between adjacent triangles (in radians)
    pub beta: f64,
    /// Largest circumradius of a new triangle relative to the one it grows from
    pub radius_ratio_bound: f64,
    /// Largest triangle perimeter (None = unbounded)
    pub max_perimeter: Option<f64>,
    /// Nearest neighbours examined around a seed vertex
    pub seed_neighbors: usize,
    /// Single or multi-component reconstruction
    pub component_policy: ComponentPolicy,
    /// Flip the whole mesh when its signed volume is negative
    pub orient_outward: bool,
}

impl Default for AfsrConfig {
    fn default() -> Self {
        Self {
            ball_radius: None,
            ball_radius_factor: 2.0,
            beta: std::f64::consts::PI / 6.0, // 30 degrees
            radius_ratio_bound: 5.0,
            max_perimeter: None,
            seed_neighbors: 24,
            component_policy: ComponentPolicy::Multiple,
            orient_outward: true,
        }
    }
}

impl AfsrConfig {
    /// Use a fixed ball radius
    pub fn with_ball_radius(mut self, radius: f64) -> Self {
        self.ball_radius = Some(radius);
        self
    }

    /// Scale the automatic ball radius
    pub fn with_ball_radius_factor(mut self, factor: f64) -> Self {
        self.ball_radius_factor = factor;
        self
    }

    /// Set the fold angle limit
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Set the circumradius growth bound
    pub fn with_radius_ratio_bound(mut self, bound: f64) -> Self {
        self.radius_ratio_bound = bound;
        self
    }

    /// Reject triangles with a longer perimeter
    pub fn with_max_perimeter(mut self, perimeter: f64) -> Self {
        self.max_perimeter = Some(perimeter);
        self
    }

    /// Set the seed neighbourhood size
    pub fn with_seed_neighbors(mut self, count: usize) -> Self {
        self.seed_neighbors = count;
        self
    }

    /// Choose single or multi-component reconstruction
    pub fn with_component_policy(mut self, policy: ComponentPolicy) -> Self {
        self.component_policy = policy;
        self
    }

    /// Enable or disable the final orientation pass
    pub fn with_orient_outward(mut self, orient: bool) -> Self {
        self.orient_outward = orient;
        self
    }

    /// Check every parameter is in range
    pub fn validate(&self) -> Result<()> {
        if let Some(radius) = self.ball_radius {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(Error::InvalidData(format!(
                    "Ball radius must be positive and finite, got {}",
                    radius
                )));
            }
        }

        if !(self.ball_radius_factor.is_finite() && self.ball_radius_factor > 0.0) {
            return Err(Error::InvalidData(format!(
                "Ball radius factor must be positive, got {}",
                self.ball_radius_factor
            )));
        }

        if !(self.beta > 0.0 && self.beta < std::f64::consts::PI) {
            return Err(Error::InvalidData(format!(
                "Beta must lie in (0, pi), got {}",
                self.beta
            )));
        }

        if !(self.radius_ratio_bound.is_finite() && self.radius_ratio_bound >= 1.0) {
            return Err(Error::InvalidData(format!(
                "Radius ratio bound must be at least 1, got {}",
                self.radius_ratio_bound
            )));
        }

        if let Some(perimeter) = self.max_perimeter {
            if !(perimeter.is_finite() && perimeter > 0.0) {
                return Err(Error::InvalidData(format!(
                    "Maximum perimeter must be positive, got {}",
                    perimeter
                )));
            }
        }

        if self.seed_neighbors < 2 {
            return Err(Error::InvalidData(
                "Seed search needs at least 2 neighbours".to_string(),
            ));
        }

        Ok(())
    }
}
