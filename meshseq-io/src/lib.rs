//! Geometry I/O and sequence loading
//!
//! This crate reads OBJ and PLY files into [`meshseq_core`] geometries,
//! enumerates sequence directories, and loads whole sequences either
//! sequentially or on a worker pool (see [`loader`]).

pub mod ply;
pub mod obj;
pub mod files;
pub mod loader;
pub mod progress;

pub use files::get_files_in_path;
pub use loader::{load_geometries, load_geometries_fast, load_geometries_safe, LoadOptions, LoadStrategy};

use meshseq_core::{Geometry, GeometryKind, PointCloud, Result, TriangleMesh};
use std::path::Path;

/// Options controlling how much of a file is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Decode material texture images (OBJ only)
    pub load_textures: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { load_textures: true }
    }
}

/// Trait for reading meshes from files
pub trait MeshReader {
    fn read_mesh(path: &Path, options: &ReadOptions) -> Result<TriangleMesh>;
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

/// Auto-detect format and read mesh
pub fn read_mesh(path: impl AsRef<Path>, options: &ReadOptions) -> Result<TriangleMesh> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("obj") => obj::ObjReader::read_mesh(path, options),
        Some("ply") => ply::PlyReader::read_mesh(path, options),
        _ => Err(meshseq_core::Error::UnsupportedFormat(format!(
            "Unsupported mesh format: {}",
            path.display()
        ))),
    }
}

/// Auto-detect format and read the vertices of a file as a point cloud
pub fn read_point_cloud(path: impl AsRef<Path>) -> Result<PointCloud> {
    let options = ReadOptions { load_textures: false };
    read_mesh(path, &options).map(PointCloud::from)
}

/// Read a file as the requested kind of geometry
pub fn read_geometry(path: impl AsRef<Path>, kind: GeometryKind, options: &ReadOptions) -> Result<Geometry> {
    read_mesh(path, options).map(|mesh| Geometry::from_mesh(mesh, kind))
}
