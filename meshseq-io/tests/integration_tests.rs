//! Integration tests for meshseq-io
//!
//! These tests write small sequences to a temporary directory and load them
//! back through the directory scan and both loading strategies.

use meshseq_core::{Geometry, GeometryKind};
use meshseq_io::*;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// OBJ triangle fan with `n` rim vertices around a centre vertex
fn fan_obj(n: usize) -> String {
    let mut obj = String::from("v 0 0 0\n");
    for i in 0..n {
        let angle = i as f32 / n as f32 * std::f32::consts::TAU;
        writeln!(obj, "v {} {} 0", angle.cos(), angle.sin()).unwrap();
    }
    for i in 0..n {
        writeln!(obj, "f 1 {} {}", i + 2, (i + 1) % n + 2).unwrap();
    }
    obj
}

fn write_sequence(dir: &Path, count: usize) -> Vec<PathBuf> {
    for i in 0..count {
        // Later frames are smaller so parallel workers finish out of order
        let rim = 3 + (count - i) * 40;
        fs::write(dir.join(format!("frame_{:03}.obj", i)), fan_obj(rim)).unwrap();
    }
    get_files_in_path(dir, &["*.obj"]).unwrap()
}

fn vertex_counts(geometries: &[Geometry]) -> Vec<usize> {
    geometries.iter().map(|g| g.vertex_count()).collect()
}

#[test]
fn test_fast_and_safe_agree() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_sequence(dir.path(), 8);
    assert_eq!(files.len(), 8);

    let fast_options = LoadOptions::default().with_progress(false).with_threads(4);
    let safe_options = fast_options.clone().with_strategy(LoadStrategy::Safe);

    let fast = load_geometries(&files, &fast_options).unwrap();
    let safe = load_geometries(&files, &safe_options).unwrap();

    assert_eq!(fast.len(), safe.len());
    assert_eq!(vertex_counts(&fast), vertex_counts(&safe));
    for (f, s) in fast.iter().zip(&safe) {
        assert_eq!(f.triangle_count(), s.triangle_count());
        let (f, s) = (f.as_mesh().unwrap(), s.as_mesh().unwrap());
        assert_eq!(f.vertices, s.vertices);
        assert_eq!(f.triangles, s.triangles);
    }
}

#[test]
fn test_fast_preserves_file_order() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_sequence(dir.path(), 6);

    let options = LoadOptions::default().with_progress(false).with_threads(3);
    let geometries = load_geometries_fast(&files, &options).unwrap();

    let expected: Vec<usize> = (0..6).map(|i| 1 + 3 + (6 - i) * 40).collect();
    assert_eq!(vertex_counts(&geometries), expected);
}

#[test]
fn test_fast_drops_textures() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("quad.obj"),
        "mtllib quad.mtl\nv 0 0 0\nv 1 0 0\nv 1 1 0\nvt 0 0\nvt 1 0\nvt 1 1\nusemtl red\nf 1/1 2/2 3/3\n",
    )
    .unwrap();
    fs::write(dir.path().join("quad.mtl"), "newmtl red\nKd 1 0 0\nmap_Kd red.png\n").unwrap();
    image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 0, 0, 255]))
        .save(dir.path().join("red.png"))
        .unwrap();
    let files = vec![dir.path().join("quad.obj")];

    let options = LoadOptions::default().with_progress(false);
    let fast = load_geometries_fast(&files, &options).unwrap();
    let safe = load_geometries_safe(&files, &options).unwrap();

    let fast = fast[0].as_mesh().unwrap();
    let safe = safe[0].as_mesh().unwrap();
    assert!(fast.textures.is_empty());
    assert_eq!(safe.textures.len(), 1);
    assert_eq!(fast.triangle_uvs, safe.triangle_uvs);
    assert_eq!(fast.triangle_material_ids, safe.triangle_material_ids);
}

#[test]
fn test_bad_file_aborts_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut files = write_sequence(dir.path(), 3);
    let broken = dir.path().join("frame_999.ply");
    fs::write(&broken, "ply\nformat nonsense\nend_header\n").unwrap();
    files.insert(1, broken);

    let options = LoadOptions::default().with_progress(false);
    assert!(load_geometries_fast(&files, &options).is_err());
    assert!(load_geometries_safe(&files, &options).is_err());
}

#[test]
fn test_missing_file_aborts_load() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![dir.path().join("missing.obj")];

    let options = LoadOptions::default().with_progress(false);
    assert!(load_geometries(&files, &options).is_err());
}

#[test]
fn test_point_cloud_kind() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("cloud.ply"),
        "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\nproperty float y\nproperty float z\n\
         property uchar red\nproperty uchar green\nproperty uchar blue\nend_header\n\
         0 0 0 255 0 0\n1 0 0 0 255 0\n0 1 0 0 0 255\n",
    )
    .unwrap();
    fs::write(dir.path().join("tri.obj"), fan_obj(3)).unwrap();
    let files = get_files_in_path(dir.path(), &["*.ply", "*.obj"]).unwrap();

    // A PLY without faces is a point cloud even in auto mode
    let options = LoadOptions::default().with_progress(false);
    let auto = load_geometries(&files, &options).unwrap();
    assert!(auto[0].as_point_cloud().is_some());
    assert!(auto[1].as_mesh().is_some());

    let forced = load_geometries(&files, &options.clone().with_kind(GeometryKind::PointCloud)).unwrap();
    assert!(forced.iter().all(|g| g.as_point_cloud().is_some()));
    let cloud = forced[0].as_point_cloud().unwrap();
    assert_eq!(cloud.colors[1], [0.0, 1.0, 0.0]);
}
