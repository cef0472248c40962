//! # Excelsior - interactive particle globe
//!
//! Renders a sphere of ambient particles, a landmass overlay sampled from a
//! land/water mask image, and a faint atmospheric glow. The globe spins on
//! its own and turns toward wherever the pointer rests.
//!
//! ## Quick Start
//!
//! ```ignore
//! use excelsior::prelude::*;
//!
//! fn main() -> Result<(), GlobeError> {
//!     excelsior::run(GlobeConfig::default().with_mask_path("landmask.png"))
//! }
//! ```
//!
//! ## Sampling without a window
//!
//! The samplers are plain CPU code and work without a GPU:
//!
//! ```ignore
//! use excelsior::prelude::*;
//!
//! let mut sampler = SphereSampler::seeded(7);
//! let globe = sampler.uniform(3_500, 70.0);
//!
//! let mask = MaskImage::open("landmask.png")?;
//! let land = sampler.masked(&mask, &MaskSampling::new(47_500, 70.0));
//! println!("{} land points in {} attempts", land.points.len(), land.attempts);
//! ```
//!
//! ## Mask format
//!
//! Any PNG or JPEG in equirectangular projection. The red channel is read as
//! brightness; pixels brighter than the threshold (default 100) are land.
//! Longitude -180° is the left edge, latitude +90° the top edge.
//!
//! ## Frame model
//!
//! Every frame advances the rotation by a fixed step (no delta time), copies
//! the base orientation onto the landmass, then renders. [`FrameDriver::run`]
//! drives a bounded loop through any [`FrameSink`] for headless use.

mod app;
pub mod cloud;
pub mod config;
mod error;
pub mod frame;
mod gpu;
pub mod input;
pub mod loader;
pub mod mask;
pub mod sampling;

pub use app::{run, App, GlobeEvent};
pub use cloud::{sync_orientation, Orientation, PointCloud};
pub use config::GlobeConfig;
pub use error::{GlobeError, GpuError, MaskError};
pub use frame::{FrameDriver, FrameSink, GlobeScene, StopSignal};
pub use glam::{Vec2, Vec3};
pub use gpu::{Camera, GpuState, MeshVertex, SphereMesh};
pub use input::PointerInput;
pub use mask::{GeoCoord, MaskImage};
pub use sampling::{MaskSample, MaskSampling, SphereSampler, SphericalPoint};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use excelsior::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cloud::{Orientation, PointCloud};
    pub use crate::config::GlobeConfig;
    pub use crate::error::{GlobeError, MaskError};
    pub use crate::frame::{FrameDriver, FrameSink, GlobeScene, StopSignal};
    pub use crate::mask::MaskImage;
    pub use crate::sampling::{MaskSampling, SphereSampler};
    pub use crate::{Vec2, Vec3};
}
