//! The geometry item played back by the sequence player

use crate::mesh::TriangleMesh;
use crate::point::*;
use crate::point_cloud::PointCloud;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3f,
    pub max: Point3f,
}

impl Aabb {
    /// Bounds of a set of points, `None` when there are no points
    pub fn from_points(points: &[Point3f]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for p in rest {
            min = min.inf(p);
            max = max.sup(p);
        }
        Some(Self { min, max })
    }

    pub fn center(&self) -> Point3f {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn extent(&self) -> Vector3f {
        self.max - self.min
    }

    /// Radius of the bounding sphere around [`Aabb::center`]
    pub fn radius(&self) -> f32 {
        self.extent().norm() * 0.5
    }
}

/// Which kind of geometry a file is interpreted as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometryKind {
    /// Read as a mesh, fall back to a point cloud when there are no triangles
    #[default]
    Auto,
    Mesh,
    PointCloud,
}

/// A mesh or a point cloud
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Geometry {
    Mesh(TriangleMesh),
    PointCloud(PointCloud),
}

impl Geometry {
    /// Number of vertices (meshes) or points (point clouds)
    pub fn vertex_count(&self) -> usize {
        match self {
            Geometry::Mesh(mesh) => mesh.vertex_count(),
            Geometry::PointCloud(cloud) => cloud.len(),
        }
    }

    /// Number of triangles, zero for point clouds
    pub fn triangle_count(&self) -> usize {
        match self {
            Geometry::Mesh(mesh) => mesh.triangle_count(),
            Geometry::PointCloud(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    pub fn bounds(&self) -> Option<Aabb> {
        match self {
            Geometry::Mesh(mesh) => mesh.bounds(),
            Geometry::PointCloud(cloud) => cloud.bounds(),
        }
    }

    pub fn as_mesh(&self) -> Option<&TriangleMesh> {
        match self {
            Geometry::Mesh(mesh) => Some(mesh),
            Geometry::PointCloud(_) => None,
        }
    }

    pub fn as_point_cloud(&self) -> Option<&PointCloud> {
        match self {
            Geometry::PointCloud(cloud) => Some(cloud),
            Geometry::Mesh(_) => None,
        }
    }

    /// Interpret a freshly read mesh according to `kind`
    pub fn from_mesh(mesh: TriangleMesh, kind: GeometryKind) -> Self {
        match kind {
            GeometryKind::Mesh => Geometry::Mesh(mesh),
            GeometryKind::PointCloud => Geometry::PointCloud(mesh.into()),
            GeometryKind::Auto if mesh.triangles.is_empty() && !mesh.vertices.is_empty() => {
                Geometry::PointCloud(mesh.into())
            }
            GeometryKind::Auto => Geometry::Mesh(mesh),
        }
    }
}

impl From<TriangleMesh> for Geometry {
    fn from(mesh: TriangleMesh) -> Self {
        Geometry::Mesh(mesh)
    }
}

impl From<PointCloud> for Geometry {
    fn from(cloud: PointCloud) -> Self {
        Geometry::PointCloud(cloud)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_auto_kind_demotes_meshes_without_triangles() {
        let vertices = vec![Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 0.0, 0.0)];
        let bare = TriangleMesh::from_vertices_and_triangles(vertices.clone(), Vec::new());
        assert!(matches!(
            Geometry::from_mesh(bare.clone(), GeometryKind::Auto),
            Geometry::PointCloud(_)
        ));
        assert!(matches!(
            Geometry::from_mesh(bare, GeometryKind::Mesh),
            Geometry::Mesh(_)
        ));

        let mut vertices = vertices;
        vertices.push(Point3f::new(0.0, 1.0, 0.0));
        let triangle = TriangleMesh::from_vertices_and_triangles(vertices, vec![[0, 1, 2]]);
        let geometry = Geometry::from_mesh(triangle, GeometryKind::Auto);
        assert_eq!(geometry.triangle_count(), 1);
        assert_eq!(geometry.vertex_count(), 3);
    }

    #[test]
    fn test_aabb_center_and_radius() {
        let aabb = Aabb::from_points(&[
            Point3f::new(-1.0, -1.0, -1.0),
            Point3f::new(1.0, 1.0, 1.0),
        ])
        .unwrap();

        assert_eq!(aabb.center(), Point3f::origin());
        assert_relative_eq!(aabb.radius(), 3.0f32.sqrt(), epsilon = 1e-6);
    }
}
