//! Point cloud data structures and functionality

use crate::geometry::Aabb;
use crate::mesh::TriangleMesh;
use crate::point::*;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// A point cloud with optional per-point normals and colors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointCloud {
    pub points: Vec<Point3f>,
    pub normals: Vec<Vector3f>,
    pub colors: Vec<Color>,
}

impl PointCloud {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a point cloud from a vector of points
    pub fn from_points(points: Vec<Point3f>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn has_normals(&self) -> bool {
        !self.points.is_empty() && self.normals.len() == self.points.len()
    }

    pub fn has_colors(&self) -> bool {
        !self.points.is_empty() && self.colors.len() == self.points.len()
    }

    /// Get an iterator over the points
    pub fn iter(&self) -> std::slice::Iter<'_, Point3f> {
        self.points.iter()
    }

    /// Axis-aligned bounds of the points, `None` for an empty cloud
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.points)
    }
}

impl Index<usize> for PointCloud {
    type Output = Point3f;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl FromIterator<Point3f> for PointCloud {
    fn from_iter<I: IntoIterator<Item = Point3f>>(iter: I) -> Self {
        Self::from_points(iter.into_iter().collect())
    }
}

/// Keep the vertices of a mesh and drop its connectivity
impl From<TriangleMesh> for PointCloud {
    fn from(mesh: TriangleMesh) -> Self {
        Self {
            points: mesh.vertices,
            normals: mesh.vertex_normals,
            colors: mesh.vertex_colors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mesh_keeps_vertex_attributes() {
        let mut mesh = TriangleMesh::from_vertices_and_triangles(
            vec![Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 2.0, 3.0)],
            Vec::new(),
        );
        mesh.vertex_colors = vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

        let cloud = PointCloud::from(mesh);
        assert_eq!(cloud.len(), 2);
        assert!(cloud.has_colors());
        assert!(!cloud.has_normals());
        assert_eq!(cloud[1], Point3f::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_bounds() {
        let cloud: PointCloud = vec![
            Point3f::new(-1.0, 0.0, 2.0),
            Point3f::new(3.0, -4.0, 0.0),
        ]
        .into_iter()
        .collect();

        let bounds = cloud.bounds().unwrap();
        assert_eq!(bounds.min, Point3f::new(-1.0, -4.0, 0.0));
        assert_eq!(bounds.max, Point3f::new(3.0, 0.0, 2.0));
        assert!(PointCloud::new().bounds().is_none());
    }
}
