//! Background landmass loading.
//!
//! Decoding a large mask and drawing up to a million candidates takes long
//! enough to stall the first frames, so it happens on its own thread. The
//! finished cloud is handed to `deliver`, which in the application posts it to
//! the event loop.

use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, info};

use crate::cloud::PointCloud;
use crate::error::MaskError;
use crate::mask::MaskImage;
use crate::sampling::{MaskSampling, SphereSampler};

/// Decode the mask at `path` and sample the landmass cloud.
pub fn load_landmass(
    path: &std::path::Path,
    params: &MaskSampling,
    sampler: &mut SphereSampler,
) -> Result<PointCloud, MaskError> {
    let started = Instant::now();
    let mask = MaskImage::open(path)?;
    debug!(
        width = mask.width(),
        height = mask.height(),
        coverage = mask.coverage(params.threshold),
        "decoded landmass mask"
    );

    let sample = sampler.masked(&mask, params);
    info!(
        points = sample.points.len(),
        attempts = sample.attempts,
        target = params.target_count,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "landmass sampled"
    );
    Ok(PointCloud::new(sample.points))
}

/// Load the landmass on a background thread and pass the result to
/// `deliver`. There is no timeout and no cancellation.
pub fn spawn_landmass_loader<F>(
    path: PathBuf,
    params: MaskSampling,
    seed: Option<u64>,
    deliver: F,
) -> std::io::Result<JoinHandle<()>>
where
    F: FnOnce(Result<PointCloud, MaskError>) + Send + 'static,
{
    thread::Builder::new()
        .name("landmass-loader".into())
        .spawn(move || {
            info!(path = %path.display(), "loading landmass mask");
            // Offset the seed so the landmass does not replay the base cloud's draws.
            let mut sampler = SphereSampler::from_seed(seed.map(|s| s.wrapping_add(1)));
            deliver(load_landmass(&path, &params, &mut sampler));
        })
}
