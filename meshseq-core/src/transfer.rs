//! Plain-data transfer representation of geometries
//!
//! Loader workers hand their results back as these structs rather than as
//! native geometry objects. They hold flat numeric arrays only; mesh
//! textures and adjacency lists are not part of the representation and are
//! lost when a geometry goes through a transfer.

use crate::geometry::Geometry;
use crate::mesh::TriangleMesh;
use crate::point::*;
use crate::point_cloud::PointCloud;
use serde::{Deserialize, Serialize};

/// Struct-of-arrays form of a [`TriangleMesh`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshTransfer {
    pub vertices: Vec<[f32; 3]>,
    pub vertex_normals: Vec<[f32; 3]>,
    pub vertex_colors: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
    pub triangle_normals: Vec<[f32; 3]>,
    pub triangle_uvs: Vec<[f32; 2]>,
    pub triangle_material_ids: Vec<i32>,
}

/// Struct-of-arrays form of a [`PointCloud`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloudTransfer {
    pub points: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

/// Transfer form of a [`Geometry`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeometryTransfer {
    Mesh(MeshTransfer),
    PointCloud(PointCloudTransfer),
}

fn points_to_arrays(points: &[Point3f]) -> Vec<[f32; 3]> {
    points.iter().map(|p| [p.x, p.y, p.z]).collect()
}

fn vectors_to_arrays(vectors: &[Vector3f]) -> Vec<[f32; 3]> {
    vectors.iter().map(|v| [v.x, v.y, v.z]).collect()
}

fn arrays_to_points(arrays: Vec<[f32; 3]>) -> Vec<Point3f> {
    arrays.into_iter().map(Point3f::from).collect()
}

fn arrays_to_vectors(arrays: Vec<[f32; 3]>) -> Vec<Vector3f> {
    arrays.into_iter().map(Vector3f::from).collect()
}

impl From<&TriangleMesh> for MeshTransfer {
    fn from(mesh: &TriangleMesh) -> Self {
        Self {
            vertices: points_to_arrays(&mesh.vertices),
            vertex_normals: vectors_to_arrays(&mesh.vertex_normals),
            vertex_colors: mesh.vertex_colors.clone(),
            triangles: mesh.triangles.clone(),
            triangle_normals: vectors_to_arrays(&mesh.triangle_normals),
            triangle_uvs: mesh.triangle_uvs.clone(),
            triangle_material_ids: mesh.triangle_material_ids.clone(),
        }
    }
}

impl MeshTransfer {
    /// Rebuild a native mesh; `textures` and `adjacency_list` stay empty
    pub fn into_mesh(self) -> TriangleMesh {
        TriangleMesh {
            vertices: arrays_to_points(self.vertices),
            vertex_normals: arrays_to_vectors(self.vertex_normals),
            vertex_colors: self.vertex_colors,
            triangles: self.triangles,
            triangle_normals: arrays_to_vectors(self.triangle_normals),
            triangle_uvs: self.triangle_uvs,
            triangle_material_ids: self.triangle_material_ids,
            textures: Vec::new(),
            adjacency_list: None,
        }
    }
}

impl From<&PointCloud> for PointCloudTransfer {
    fn from(cloud: &PointCloud) -> Self {
        Self {
            points: points_to_arrays(&cloud.points),
            normals: vectors_to_arrays(&cloud.normals),
            colors: cloud.colors.clone(),
        }
    }
}

impl PointCloudTransfer {
    pub fn into_point_cloud(self) -> PointCloud {
        PointCloud {
            points: arrays_to_points(self.points),
            normals: arrays_to_vectors(self.normals),
            colors: self.colors,
        }
    }
}

impl From<&Geometry> for GeometryTransfer {
    fn from(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Mesh(mesh) => GeometryTransfer::Mesh(mesh.into()),
            Geometry::PointCloud(cloud) => GeometryTransfer::PointCloud(cloud.into()),
        }
    }
}

impl GeometryTransfer {
    /// Reconstitute the native geometry in the receiving thread
    pub fn into_geometry(self) -> Geometry {
        match self {
            GeometryTransfer::Mesh(mesh) => Geometry::Mesh(mesh.into_mesh()),
            GeometryTransfer::PointCloud(cloud) => Geometry::PointCloud(cloud.into_point_cloud()),
        }
    }
}
