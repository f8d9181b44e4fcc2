//! PLY format support

use crate::MeshReader;
use meshseq_core::{Color, Error, Point3f, Result, TriangleMesh, Vector3f};
use ply_rs::{
    parser::Parser,
    ply::{DefaultElement, Property},
};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct PlyReader;

impl MeshReader for PlyReader {
    fn read_mesh(path: &Path, _options: &crate::ReadOptions) -> Result<TriangleMesh> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let parser = Parser::<DefaultElement>::new();
        let ply = parser
            .read_ply(&mut reader)
            .map_err(|e| Error::parse(path, e))?;

        let mut mesh = TriangleMesh::new();

        if let Some(vertex_element) = ply.payload.get("vertex") {
            mesh.vertices.reserve(vertex_element.len());
            for vertex in vertex_element {
                let x = extract_property_value(vertex, "x").map_err(|e| Error::parse(path, e))?;
                let y = extract_property_value(vertex, "y").map_err(|e| Error::parse(path, e))?;
                let z = extract_property_value(vertex, "z").map_err(|e| Error::parse(path, e))?;
                mesh.vertices.push(Point3f::new(x, y, z));
            }

            // Optional attributes are kept only when every vertex has them
            mesh.vertex_normals = vertex_element
                .iter()
                .map(|v| {
                    Some(Vector3f::new(
                        extract_property_value(v, "nx").ok()?,
                        extract_property_value(v, "ny").ok()?,
                        extract_property_value(v, "nz").ok()?,
                    ))
                })
                .collect::<Option<Vec<_>>>()
                .unwrap_or_default();

            mesh.vertex_colors = vertex_element
                .iter()
                .map(extract_color)
                .collect::<Option<Vec<_>>>()
                .unwrap_or_default();
        }

        if let Some(face_element) = ply.payload.get("face") {
            mesh.triangles.reserve(face_element.len());
            for face in face_element {
                let indices = extract_face_indices(face).map_err(|e| Error::parse(path, e))?;
                // Fan triangulation for quads and larger polygons
                for i in 1..indices.len().saturating_sub(1) {
                    mesh.triangles.push([indices[0], indices[i], indices[i + 1]]);
                }
            }
        }

        mesh.validate_indices()
            .map_err(|e| Error::parse(path, e))?;

        Ok(mesh)
    }
}

/// Extract a scalar property value as f32 from a PLY element
fn extract_property_value(element: &DefaultElement, name: &str) -> std::result::Result<f32, String> {
    match element.get(name) {
        Some(Property::Float(val)) => Ok(*val),
        Some(Property::Double(val)) => Ok(*val as f32),
        Some(Property::Char(val)) => Ok(*val as f32),
        Some(Property::UChar(val)) => Ok(*val as f32),
        Some(Property::Short(val)) => Ok(*val as f32),
        Some(Property::UShort(val)) => Ok(*val as f32),
        Some(Property::Int(val)) => Ok(*val as f32),
        Some(Property::UInt(val)) => Ok(*val as f32),
        _ => Err(format!("property '{}' not found or not a scalar", name)),
    }
}

/// Extract a vertex color; integer channels are 0..=255, float channels 0..=1
fn extract_color(element: &DefaultElement) -> Option<Color> {
    let channel = |name: &str| match element.get(name)? {
        Property::UChar(val) => Some(*val as f32 / 255.0),
        Property::UShort(val) => Some(*val as f32 / 65535.0),
        Property::Float(val) => Some(*val),
        Property::Double(val) => Some(*val as f32),
        _ => None,
    };
    Some([channel("red")?, channel("green")?, channel("blue")?])
}

/// Extract face indices from a PLY face element
fn extract_face_indices(element: &DefaultElement) -> std::result::Result<Vec<u32>, String> {
    let indices: Vec<i64> = match element.get("vertex_indices").or_else(|| element.get("vertex_index")) {
        Some(Property::ListInt(indices)) => indices.iter().map(|&i| i as i64).collect(),
        Some(Property::ListUInt(indices)) => indices.iter().map(|&i| i as i64).collect(),
        Some(Property::ListShort(indices)) => indices.iter().map(|&i| i as i64).collect(),
        Some(Property::ListUShort(indices)) => indices.iter().map(|&i| i as i64).collect(),
        Some(Property::ListChar(indices)) => indices.iter().map(|&i| i as i64).collect(),
        Some(Property::ListUChar(indices)) => indices.iter().map(|&i| i as i64).collect(),
        _ => return Err("face indices not found".to_string()),
    };

    indices
        .into_iter()
        .map(|i| u32::try_from(i).map_err(|_| format!("invalid vertex index {}", i)))
        .collect()
}
