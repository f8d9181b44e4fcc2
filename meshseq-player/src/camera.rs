//! Orbit camera for the sequence viewer

use meshseq_core::Aabb;
use nalgebra::{Matrix4, Perspective3, Point3, Vector3};

/// Radians of orbit per unit of rotation input
pub const ROTATION_SPEED: f32 = 0.003;

/// A camera circling a target point
#[derive(Debug, Clone)]
pub struct Camera {
    pub target: Point3<f32>,
    pub distance: f32,
    /// Rotation around the up axis
    pub yaw: f32,
    /// Elevation above the horizontal plane
    pub pitch: f32,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            target: Point3::origin(),
            distance: 5.0,
            yaw: 0.0,
            pitch: 0.0,
            up: Vector3::y(),
            fov: std::f32::consts::FRAC_PI_3,
            aspect_ratio,
            near: 0.01,
            far: 100.0,
        }
    }

    /// Eye position derived from the orbit parameters
    pub fn position(&self) -> Point3<f32> {
        let offset = Vector3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        self.target + offset * self.distance
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position(), &self.target, &self.up)
    }

    /// Get the projection matrix, mapped to wgpu's 0..1 depth range
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        opengl_to_wgpu() * perspective.into_inner()
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Rotate the camera around the target
    pub fn orbit(&mut self, horizontal: f32, vertical: f32) {
        self.yaw -= horizontal * ROTATION_SPEED;
        self.pitch = (self.pitch + vertical * ROTATION_SPEED).clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
    }

    /// Look at the whole box from the front
    pub fn fit(&mut self, bounds: &Aabb) {
        let radius = bounds.radius().max(1e-3);
        self.target = bounds.center();
        self.distance = radius / (self.fov * 0.5).sin() * 1.1;
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.near = (self.distance - radius * 2.0).max(self.distance * 1e-3);
        self.far = self.distance + radius * 4.0;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[rustfmt::skip]
fn opengl_to_wgpu() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use meshseq_core::Point3f;
    use nalgebra::Vector4;

    #[test]
    fn test_fit_centers_target() {
        let bounds = Aabb::from_points(&[Point3f::new(1.0, 1.0, 1.0), Point3f::new(3.0, 5.0, 1.0)]).unwrap();
        let mut camera = Camera::default();
        camera.fit(&bounds);

        assert_eq!(camera.target, Point3f::new(2.0, 3.0, 1.0));
        assert!(camera.distance > bounds.radius());
        assert!(camera.near > 0.0 && camera.near < camera.far);
    }

    #[test]
    fn test_target_projects_to_center() {
        let mut camera = Camera::default();
        camera.orbit(250.0, 100.0);
        let clip = camera.view_projection() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.xyz() / clip.w;

        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_orbit_keeps_distance_and_clamps_pitch() {
        let mut camera = Camera::default();
        camera.orbit(100.0, 0.0);
        assert_relative_eq!(camera.yaw, -0.3, epsilon = 1e-6);
        assert_relative_eq!((camera.position() - camera.target).norm(), 5.0, epsilon = 1e-4);

        camera.orbit(0.0, 10_000.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
    }
}
