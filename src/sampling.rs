//! Sphere surface samplers.
//!
//! [`SphereSampler::uniform`] scatters points evenly over a sphere.
//! [`SphereSampler::masked`] does the same but keeps only points that fall on
//! bright mask pixels, with a hard cap on how many candidates it draws.
//!
//! ```ignore
//! let mut sampler = SphereSampler::seeded(42);
//! let globe = sampler.uniform(3_500, 70.0);
//! let land = sampler.masked(&mask, &MaskSampling::new(47_500, 70.0));
//! ```

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::SamplingConfig;
use crate::mask::MaskImage;

/// Parameters for rejection sampling against a mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskSampling {
    pub target_count: u32,
    pub radius: f32,
    /// A pixel must be strictly brighter than this to accept a point.
    pub threshold: u8,
    pub attempt_multiplier: u32,
}

impl MaskSampling {
    /// Defaults: threshold 100, multiplier 20.
    pub fn new(target_count: u32, radius: f32) -> Self {
        Self {
            target_count,
            radius,
            threshold: 100,
            attempt_multiplier: 20,
        }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_attempt_multiplier(mut self, multiplier: u32) -> Self {
        self.attempt_multiplier = multiplier;
        self
    }

    /// Candidate budget.
    pub fn max_attempts(&self) -> u64 {
        self.target_count as u64 * self.attempt_multiplier as u64
    }
}

impl From<&SamplingConfig> for MaskSampling {
    fn from(config: &SamplingConfig) -> Self {
        Self {
            target_count: config.target_count,
            radius: config.radius,
            threshold: config.threshold,
            attempt_multiplier: config.attempt_multiplier,
        }
    }
}

/// Result of a masked sampling run.
#[derive(Debug, Clone)]
pub struct MaskSample {
    pub points: Vec<Vec3>,
    /// Candidates drawn, accepted or not.
    pub attempts: u64,
}

/// A point on the sphere in spherical form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalPoint {
    /// Polar angle from +Z, in `0..=π`.
    pub phi: f32,
    /// Azimuth from +X toward +Y, in `0..2π`.
    pub theta: f32,
}

impl SphericalPoint {
    /// Area-uniform point from two unit-interval draws.
    ///
    /// `acos(2v - 1)` rather than `v * π` keeps points from bunching at the
    /// poles.
    #[inline]
    pub fn from_unit(u: f32, v: f32) -> Self {
        Self {
            phi: (2.0 * v - 1.0).clamp(-1.0, 1.0).acos(),
            theta: TAU * u,
        }
    }

    /// Recover the angles of a Cartesian point on a sphere centred at the
    /// origin.
    pub fn from_cartesian(p: Vec3) -> Self {
        let r = p.length();
        let phi = (p.z / r).clamp(-1.0, 1.0).acos();
        let theta = p.y.atan2(p.x).rem_euclid(TAU);
        Self { phi, theta }
    }

    #[inline]
    pub fn to_cartesian(self, radius: f32) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(
            radius * sin_phi * cos_theta,
            radius * sin_phi * sin_theta,
            radius * cos_phi,
        )
    }
}

/// Random source for sphere sampling.
pub struct SphereSampler {
    rng: SmallRng,
}

impl SphereSampler {
    /// Sampler seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Reproducible sampler.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        }
    }

    /// Draw one area-uniform direction.
    #[inline]
    pub fn next_angles(&mut self) -> SphericalPoint {
        let u: f32 = self.rng.gen();
        let v: f32 = self.rng.gen();
        SphericalPoint::from_unit(u, v)
    }

    /// Exactly `count` points uniformly distributed on a sphere of `radius`.
    pub fn uniform(&mut self, count: u32, radius: f32) -> Vec<Vec3> {
        (0..count)
            .map(|_| self.next_angles().to_cartesian(radius))
            .collect()
    }

    /// Up to `params.target_count` points lying on bright mask pixels.
    ///
    /// Stops after `params.max_attempts()` candidates whether or not the
    /// target was reached, so a mostly dark mask still terminates.
    pub fn masked(&mut self, mask: &MaskImage, params: &MaskSampling) -> MaskSample {
        let target = params.target_count as usize;
        let max_attempts = params.max_attempts();
        let mut points = Vec::with_capacity(target);
        let mut attempts = 0u64;

        while points.len() < target && attempts < max_attempts {
            attempts += 1;

            let angles = self.next_angles();
            let (px, py) = mask.pixel_for_angles(angles.phi, angles.theta);
            if mask.brightness(px, py) > params.threshold {
                points.push(angles.to_cartesian(params.radius));
            }
        }

        MaskSample { points, attempts }
    }
}

impl Default for SphereSampler {
    fn default() -> Self {
        Self::new()
    }
}
