//! Globe configuration.
//!
//! Every tunable constant lives here. [`GlobeConfig::default`] reproduces the
//! reference look; use the `with_*` methods to adjust it:
//!
//! ```ignore
//! use excelsior::GlobeConfig;
//!
//! let config = GlobeConfig::default()
//!     .with_radius(50.0)
//!     .with_landmass_count(20_000)
//!     .with_mask_path("assets/earth_mask.png");
//! ```

use std::path::PathBuf;

use glam::Vec3;

/// Parameters for both sphere samplers.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
    /// Sphere radius in world units, shared by both clouds.
    pub radius: f32,
    /// Number of particles in the base cloud.
    pub particle_count: u32,
    /// Landmass points the mask sampler tries to accept.
    pub target_count: u32,
    /// Red-channel value a pixel must exceed to count as land.
    pub threshold: u8,
    /// Attempt cap is `target_count * attempt_multiplier`.
    pub attempt_multiplier: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            radius: 70.0,
            particle_count: 3_500,
            target_count: 47_500,
            threshold: 100,
            attempt_multiplier: 20,
        }
    }
}

/// Rotation behaviour of the globe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    /// Autonomous yaw added every frame, in radians.
    pub spin: f32,
    /// Multiplier applied to pointer offsets every frame.
    pub sensitivity: f32,
    /// Scale from pixels off-center to pointer offset.
    pub pointer_scale: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            spin: 0.002,
            sensitivity: 0.01,
            pointer_scale: 0.002,
        }
    }
}

/// Point material shared by the base and landmass clouds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialConfig {
    /// sRGB colour as `0xRRGGBB`.
    pub color: u32,
    /// Point diameter in world units, attenuated with distance.
    pub size: f32,
    pub opacity: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            color: 0x66ccff,
            size: 0.5,
            opacity: 0.95,
        }
    }
}

/// Glow shell drawn around the globe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereConfig {
    /// Shell radius is the globe radius plus this offset.
    pub offset: f32,
    /// Intensity bias (`c` in `pow(c - dot(n, view), p)`).
    pub c: f32,
    /// Intensity falloff exponent.
    pub p: f32,
    /// sRGB colour as `0xRRGGBB`.
    pub color: u32,
    /// Longitude and latitude segments of the shell mesh.
    pub segments: u32,
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            offset: 8.0,
            c: 0.075,
            p: 0.75,
            color: 0x66ccff,
            segments: 128,
        }
    }
}

/// Perspective camera looking down -Z at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Eye distance along +Z.
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            distance: 180.0,
        }
    }
}

/// Complete configuration for the globe application.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeConfig {
    /// Landmass mask, relative to the working directory.
    pub mask_path: PathBuf,
    pub title: String,
    /// Initial logical window size.
    pub window_size: (u32, u32),
    pub sampling: SamplingConfig,
    pub motion: MotionConfig,
    pub material: MaterialConfig,
    pub atmosphere: AtmosphereConfig,
    pub camera: CameraConfig,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            mask_path: PathBuf::from("landmask.png"),
            title: "Excelsior".to_string(),
            window_size: (1280, 720),
            sampling: SamplingConfig::default(),
            motion: MotionConfig::default(),
            material: MaterialConfig::default(),
            atmosphere: AtmosphereConfig::default(),
            camera: CameraConfig::default(),
            seed: None,
        }
    }
}

impl GlobeConfig {
    /// Set the mask image path.
    pub fn with_mask_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mask_path = path.into();
        self
    }

    /// Set the globe radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.sampling.radius = radius;
        self
    }

    /// Set the number of base particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.sampling.particle_count = count;
        self
    }

    /// Set the number of landmass points to aim for.
    pub fn with_landmass_count(mut self, count: u32) -> Self {
        self.sampling.target_count = count;
        self
    }

    /// Set the land brightness threshold.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.sampling.threshold = threshold;
        self
    }

    /// Set the autonomous spin per frame.
    pub fn with_spin(mut self, spin: f32) -> Self {
        self.motion.spin = spin;
        self
    }

    /// Set the pointer sensitivity.
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.motion.sensitivity = sensitivity;
        self
    }

    /// Set the shared point colour.
    pub fn with_color(mut self, color: u32) -> Self {
        self.material.color = color;
        self.atmosphere.color = color;
        self
    }

    /// Use a fixed RNG seed for reproducible clouds.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Radius of the atmosphere shell.
    pub fn atmosphere_radius(&self) -> f32 {
        self.sampling.radius + self.atmosphere.offset
    }
}

/// Split `0xRRGGBB` into sRGB components in `0.0..=1.0`.
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}

/// Convert sRGB components to linear light for an sRGB render target.
pub fn srgb_to_linear(c: Vec3) -> Vec3 {
    let f = |v: f32| {
        if v <= 0.04045 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(f(c.x), f(c.y), f(c.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_scene() {
        let config = GlobeConfig::default();
        assert_eq!(config.sampling.radius, 70.0);
        assert_eq!(config.sampling.particle_count, 3_500);
        assert_eq!(config.sampling.target_count, 47_500);
        assert_eq!(config.sampling.threshold, 100);
        assert_eq!(
            crate::sampling::MaskSampling::from(&config.sampling).max_attempts(),
            950_000
        );
        assert_eq!(config.atmosphere_radius(), 78.0);
        assert_eq!(config.mask_path, PathBuf::from("landmask.png"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = GlobeConfig::default()
            .with_radius(10.0)
            .with_landmass_count(5)
            .with_seed(7)
            .with_color(0xff0000);
        assert_eq!(config.sampling.radius, 10.0);
        assert_eq!(config.sampling.target_count, 5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.atmosphere.color, 0xff0000);
        assert_eq!(config.atmosphere_radius(), 18.0);
    }

    #[test]
    fn test_hex_to_rgb() {
        let c = hex_to_rgb(0x66ccff);
        assert!((c.x - 0.4).abs() < 0.001);
        assert!((c.y - 0.8).abs() < 0.001);
        assert!((c.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_srgb_to_linear_endpoints() {
        let black = srgb_to_linear(Vec3::ZERO);
        let white = srgb_to_linear(Vec3::ONE);
        assert!(black.length() < 1e-6);
        assert!((white - Vec3::ONE).length() < 1e-5);
    }
}
