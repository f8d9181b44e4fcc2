//! OBJ format support, including MTL diffuse textures

use crate::{MeshReader, ReadOptions};
use meshseq_core::{Error, Point3f, Result, Texture, TriangleMesh, Uv, Vector3f};
use std::path::Path;

pub struct ObjReader;

impl MeshReader for ObjReader {
    fn read_mesh(path: &Path, options: &ReadOptions) -> Result<TriangleMesh> {
        let (models, materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ignore_lines: true,
                ignore_points: true,
                ..Default::default()
            },
        )
        .map_err(|e| Error::parse(path, e))?;

        let materials = materials.unwrap_or_else(|e| {
            log::warn!("{}: ignoring materials: {}", path.display(), e);
            Vec::new()
        });

        let mut mesh = TriangleMesh::new();
        let mut normals = Vec::new();
        let mut colors = Vec::new();
        let mut uvs: Vec<Uv> = Vec::new();
        let (mut all_normals, mut all_colors, mut all_uvs) = (true, true, true);

        for model in &models {
            let m = &model.mesh;
            let offset = mesh.vertices.len() as u32;
            let vertex_count = m.positions.len() / 3;

            mesh.vertices.extend(
                m.positions
                    .chunks_exact(3)
                    .map(|p| Point3f::new(p[0], p[1], p[2])),
            );

            all_normals &= m.normals.len() == 3 * vertex_count;
            if all_normals {
                normals.extend(m.normals.chunks_exact(3).map(|n| Vector3f::new(n[0], n[1], n[2])));
            }

            all_colors &= m.vertex_color.len() == 3 * vertex_count;
            if all_colors {
                colors.extend(m.vertex_color.chunks_exact(3).map(|c| [c[0], c[1], c[2]]));
            }

            let has_uvs = m.texcoords.len() == 2 * vertex_count;
            all_uvs &= has_uvs;

            let material_id = m.material_id.map_or(-1, |id| id as i32);
            for tri in m.indices.chunks_exact(3) {
                mesh.triangles.push([offset + tri[0], offset + tri[1], offset + tri[2]]);
                mesh.triangle_material_ids.push(material_id);
                if all_uvs {
                    for &corner in tri {
                        let i = corner as usize;
                        uvs.push([m.texcoords[2 * i], m.texcoords[2 * i + 1]]);
                    }
                }
            }
        }

        if all_normals {
            mesh.vertex_normals = normals;
        }
        if all_colors {
            mesh.vertex_colors = colors;
        }
        if all_uvs {
            mesh.triangle_uvs = uvs;
        }
        if materials.is_empty() {
            mesh.triangle_material_ids.clear();
        } else if options.load_textures {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            mesh.textures = materials
                .iter()
                .map(|material| match &material.diffuse_texture {
                    Some(name) => load_texture(&base.join(name)),
                    None => Texture::white(),
                })
                .collect();
        }

        mesh.validate_indices()
            .map_err(|e| Error::parse(path, e))?;

        Ok(mesh)
    }
}

/// Decode a texture image; a missing or unreadable image becomes a white placeholder
fn load_texture(path: &Path) -> Texture {
    match image::open(path) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            Texture::new(rgba.width(), rgba.height(), rgba.into_raw())
        }
        Err(e) => {
            log::warn!("failed to load texture {}: {}", path.display(), e);
            Texture::white()
        }
    }
}
