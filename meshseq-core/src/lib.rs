//! Core data structures for mesh-sequence-player
//!
//! This crate provides the geometry types that flow from the loader to the
//! sequence player: triangle meshes, point clouds, the [`Geometry`] item
//! wrapping either, and the plain-data transfer structs used by the
//! parallel loader.

pub mod point;
pub mod mesh;
pub mod point_cloud;
pub mod geometry;
pub mod transfer;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use point_cloud::*;
pub use geometry::*;
pub use transfer::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix4};
