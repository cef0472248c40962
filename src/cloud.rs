//! Point clouds and their orientation.

use std::f32::consts::TAU;

use glam::{EulerRot, Mat4, Vec3};

/// Euler rotation in radians, applied X first, then Y, then Z.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    /// Pitch.
    pub x: f32,
    /// Yaw.
    pub y: f32,
    /// Roll.
    pub z: f32,
}

impl Orientation {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Fold pitch and yaw back into `[0, 2π)`. The model matrix is unchanged.
    ///
    /// Unbounded angles lose precision in `f32` until a small per-frame step
    /// rounds to nothing.
    pub fn wrapped(self) -> Self {
        Self {
            x: self.x.rem_euclid(TAU),
            y: self.y.rem_euclid(TAU),
            z: self.z,
        }
    }

    /// Model matrix for this orientation.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.x, self.y, self.z)
    }
}

/// Fixed set of positions rendered as independent points.
///
/// Positions never change after construction; only the orientation does.
#[derive(Debug, Clone)]
pub struct PointCloud {
    positions: Vec<Vec3>,
    pub orientation: Orientation,
}

impl PointCloud {
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self {
            positions,
            orientation: Orientation::IDENTITY,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Copy the driving cloud's orientation onto the dependent cloud.
///
/// Does nothing until the dependent cloud exists.
pub fn sync_orientation(driver: &PointCloud, dependent: Option<&mut PointCloud>) {
    if let Some(dependent) = dependent {
        dependent.orientation = driver.orientation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_copies_exactly() {
        let mut driver = PointCloud::new(vec![Vec3::X]);
        driver.orientation = Orientation::new(0.1, -2.5, 3.0);
        let mut dependent = PointCloud::new(vec![Vec3::Y, Vec3::Z]);
        dependent.orientation = Orientation::new(9.0, 9.0, 9.0);

        sync_orientation(&driver, Some(&mut dependent));

        assert_eq!(dependent.orientation, driver.orientation);
        assert_eq!(dependent.len(), 2);
    }

    #[test]
    fn test_sync_without_dependent_is_noop() {
        let driver = PointCloud::new(Vec::new());
        sync_orientation(&driver, None);
        assert!(driver.is_empty());
    }

    #[test]
    fn test_yaw_rotates_about_y() {
        let m = Orientation::new(0.0, std::f32::consts::FRAC_PI_2, 0.0).matrix();
        let v = m.transform_point3(Vec3::X);
        assert!((v - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_wrapped_keeps_matrix() {
        let o = Orientation::new(-0.4, 13.0, 0.25);
        let w = o.wrapped();
        assert!((0.0..=TAU).contains(&w.x));
        assert!((0.0..=TAU).contains(&w.y));
        assert_eq!(w.z, 0.25);
        assert!(o.matrix().abs_diff_eq(w.matrix(), 1e-5));
    }

    #[test]
    fn test_identity_matrix() {
        assert_eq!(Orientation::IDENTITY.matrix(), Mat4::IDENTITY);
    }
}
