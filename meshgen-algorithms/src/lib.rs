//! # meshgen Algorithms
//!
//! Point-set algorithms the reconstruction engine builds on.
//!
//! This crate provides the R*-tree backed spatial index used for neighbourhood
//! queries during reconstruction, a brute force search for small inputs and
//! cross-checking, and generators for the sample shapes used in demos and tests.

pub mod spatial_index;
pub mod nearest_neighbor;
pub mod samples;

// Re-export commonly used items
pub use spatial_index::*;
pub use nearest_neighbor::*;
