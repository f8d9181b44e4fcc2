//! Point, vector and attribute types shared by meshes and point clouds

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Linear RGB color with components in `0.0..=1.0`
pub type Color = [f32; 3];

/// Texture coordinate
pub type Uv = [f32; 2];

/// Convert an 8-bit RGB triple into a [`Color`]
pub fn color_from_u8(rgb: [u8; 3]) -> Color {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    ]
}

/// Convert a [`Color`] into an 8-bit RGB triple, clamping out-of-range components
pub fn color_to_u8(color: Color) -> [u8; 3] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}
