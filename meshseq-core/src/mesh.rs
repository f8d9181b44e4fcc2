//! Triangle mesh data structures and functionality

use crate::geometry::Aabb;
use crate::point::*;
use serde::{Deserialize, Serialize};

/// A decoded RGBA8 texture image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA rows, top row first
    pub rgba: Vec<u8>,
}

impl Texture {
    /// Create a texture from packed RGBA data
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self { width, height, rgba }
    }

    /// A 1x1 opaque white texture, used where a material image is missing
    pub fn white() -> Self {
        Self::new(1, 1, vec![255, 255, 255, 255])
    }
}

/// A triangle mesh with per-vertex and per-triangle attributes
///
/// Attribute arrays are either empty or sized to match their owner:
/// vertex attributes match `vertices`, `triangle_normals` and
/// `triangle_material_ids` match `triangles`, and `triangle_uvs` holds
/// three entries per triangle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub vertex_normals: Vec<Vector3f>,
    pub vertex_colors: Vec<Color>,
    pub triangles: Vec<[u32; 3]>,
    pub triangle_normals: Vec<Vector3f>,
    pub triangle_uvs: Vec<Uv>,
    pub triangle_material_ids: Vec<i32>,
    /// Textures indexed by material id
    pub textures: Vec<Texture>,
    /// Neighbouring vertex indices per vertex, filled by [`TriangleMesh::compute_adjacency_list`]
    pub adjacency_list: Option<Vec<Vec<u32>>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from vertices and triangles
    pub fn from_vertices_and_triangles(vertices: Vec<Point3f>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
            ..Self::default()
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn has_vertex_normals(&self) -> bool {
        !self.vertices.is_empty() && self.vertex_normals.len() == self.vertices.len()
    }

    pub fn has_vertex_colors(&self) -> bool {
        !self.vertices.is_empty() && self.vertex_colors.len() == self.vertices.len()
    }

    pub fn has_triangle_uvs(&self) -> bool {
        !self.triangles.is_empty() && self.triangle_uvs.len() == 3 * self.triangles.len()
    }

    pub fn has_triangle_material_ids(&self) -> bool {
        !self.triangles.is_empty() && self.triangle_material_ids.len() == self.triangles.len()
    }

    pub fn has_textures(&self) -> bool {
        !self.textures.is_empty()
    }

    /// Axis-aligned bounds of the vertices, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }

    /// Calculate and store unit triangle normals
    pub fn compute_triangle_normals(&mut self) {
        self.triangle_normals = self
            .triangles
            .iter()
            .map(|t| {
                let v0 = self.vertices[t[0] as usize];
                let v1 = self.vertices[t[1] as usize];
                let v2 = self.vertices[t[2] as usize];

                let normal = (v1 - v0).cross(&(v2 - v0));
                normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::zeros)
            })
            .collect();
    }

    /// Calculate vertex normals as the normalized sum of adjacent triangle normals
    pub fn compute_vertex_normals(&mut self) {
        if self.triangle_normals.len() != self.triangles.len() {
            self.compute_triangle_normals();
        }

        let mut normals = vec![Vector3f::zeros(); self.vertices.len()];
        for (triangle, normal) in self.triangles.iter().zip(&self.triangle_normals) {
            for &index in triangle {
                normals[index as usize] += normal;
            }
        }

        self.vertex_normals = normals
            .into_iter()
            .map(|n| n.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::zeros))
            .collect();
    }

    /// Build the vertex adjacency list from the triangles
    pub fn compute_adjacency_list(&mut self) {
        let mut adjacency = vec![Vec::new(); self.vertices.len()];
        for t in &self.triangles {
            for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                adjacency[a as usize].push(b);
                adjacency[b as usize].push(a);
            }
        }
        for neighbours in &mut adjacency {
            neighbours.sort_unstable();
            neighbours.dedup();
        }
        self.adjacency_list = Some(adjacency);
    }

    /// Check that every triangle references an existing vertex
    pub fn validate_indices(&self) -> crate::Result<()> {
        let count = self.vertices.len() as u32;
        match self.triangles.iter().position(|t| t.iter().any(|&i| i >= count)) {
            Some(bad) => Err(crate::Error::InvalidData(format!(
                "triangle {} references a vertex outside 0..{}",
                bad, count
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad() -> TriangleMesh {
        TriangleMesh::from_vertices_and_triangles(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn test_counts_and_attribute_flags() {
        let mut mesh = quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(!mesh.has_vertex_normals());
        assert!(!mesh.has_triangle_uvs());

        mesh.triangle_uvs = vec![[0.0, 0.0]; 6];
        assert!(mesh.has_triangle_uvs());
    }

    #[test]
    fn test_normals_point_along_z() {
        let mut mesh = quad();
        mesh.compute_vertex_normals();

        assert_eq!(mesh.triangle_normals.len(), 2);
        for normal in &mesh.vertex_normals {
            assert_relative_eq!(normal.z, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_adjacency_list() {
        let mut mesh = quad();
        mesh.compute_adjacency_list();

        let adjacency = mesh.adjacency_list.unwrap();
        assert_eq!(adjacency[0], vec![1, 2, 3]);
        assert_eq!(adjacency[1], vec![0, 2]);
    }

    #[test]
    fn test_validate_indices() {
        let mut mesh = quad();
        assert!(mesh.validate_indices().is_ok());

        mesh.triangles.push([0, 1, 9]);
        assert!(mesh.validate_indices().is_err());
    }
}
