//! # meshgen Reconstruction
//!
//! Advancing front surface reconstruction for unorganized 3D point sets.
//!
//! A ball of radius rho is rolled over the points: starting from a seed
//! triangle whose ball is empty, every open edge of the growing mesh pivots
//! the ball until it touches another point, which becomes the apex of the
//! next triangle. The result interpolates the input points and is an
//! orientable, edge-manifold triangle list.

pub mod advancing_front;
pub mod builder;
pub mod config;
pub mod driver;
pub mod evaluator;
pub mod front;
pub mod geometry;
pub mod orientation;
pub mod topology;

// Re-export commonly used items
pub use advancing_front::*;
pub use config::*;
pub use topology::MeshTopology;
