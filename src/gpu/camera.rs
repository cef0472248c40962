//! Perspective camera looking at the globe.

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Fixed-position perspective camera on the +Z axis.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width over height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
}

impl Camera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            fov_y: config.fov_degrees.to_radians(),
            aspect,
            near: config.near,
            far: config.far,
            position: Vec3::new(0.0, 0.0, config.distance),
            target: Vec3::ZERO,
        }
    }

    /// Follow a new surface size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new(&CameraConfig::default(), 16.0 / 9.0);
        let clip = camera.projection_matrix() * camera.view_matrix() * glam::Vec4::W;
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-6);
        assert!(ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_set_viewport_updates_aspect() {
        let mut camera = Camera::new(&CameraConfig::default(), 1.0);
        camera.set_viewport(1920, 1080);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn test_globe_fits_default_view() {
        let camera = Camera::new(&CameraConfig::default(), 1.0);
        let top = Vec3::new(0.0, 78.0, 0.0).extend(1.0);
        let clip = camera.projection_matrix() * camera.view_matrix() * top;
        assert!((clip.y / clip.w) < 1.0);
    }
}
