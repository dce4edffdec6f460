//! Core data structures and traits for meshgen
//!
//! This crate provides the fundamental types shared by the reconstruction
//! crates: points, the validated input point set, triangle meshes, the
//! reconstruction result and the `SurfaceReconstructor` capability.

pub mod point;
pub mod point_set;
pub mod mesh;
pub mod output;
pub mod traits;
pub mod error;

pub use point::*;
pub use point_set::*;
pub use mesh::*;
pub use output::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
