//! Per-frame rotation and rendering.
//!
//! [`FrameDriver`] owns the scene state and advances it by a fixed step every
//! frame regardless of wall-clock time. Rendering goes through [`FrameSink`],
//! which the GPU renderer implements and tests replace with a recorder.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::Vec2;

use crate::cloud::{sync_orientation, PointCloud};
use crate::config::MotionConfig;

/// Everything that changes from frame to frame.
#[derive(Debug, Clone)]
pub struct GlobeScene {
    /// Base particle sphere; drives the orientation.
    pub base: PointCloud,
    /// Landmass overlay, present once the mask has loaded.
    pub landmass: Option<PointCloud>,
    /// Pointer offsets as last reported by the input mapper.
    pub pointer: Vec2,
}

impl GlobeScene {
    pub fn new(base: PointCloud) -> Self {
        Self {
            base,
            landmass: None,
            pointer: Vec2::ZERO,
        }
    }
}

/// Receives one render request per frame.
pub trait FrameSink {
    type Error;

    fn present(&mut self, scene: &GlobeScene) -> Result<(), Self::Error>;
}

/// Cloneable flag that ends [`FrameDriver::run`].
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Advances rotation and issues renders.
pub struct FrameDriver {
    scene: GlobeScene,
    motion: MotionConfig,
    frame: u64,
}

impl FrameDriver {
    pub fn new(base: PointCloud, motion: MotionConfig) -> Self {
        Self {
            scene: GlobeScene::new(base),
            motion,
            frame: 0,
        }
    }

    pub fn scene(&self) -> &GlobeScene {
        &self.scene
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Store new pointer offsets; they apply every frame until replaced.
    pub fn set_pointer(&mut self, offsets: Vec2) {
        self.scene.pointer = offsets;
    }

    /// Install the landmass cloud. Returns false if one is already present.
    pub fn install_landmass(&mut self, mut cloud: PointCloud) -> bool {
        if self.scene.landmass.is_some() {
            return false;
        }
        cloud.orientation = self.scene.base.orientation;
        self.scene.landmass = Some(cloud);
        true
    }

    /// One fixed step: spin, pointer contribution, then orientation sync.
    ///
    /// Pitch and yaw are kept in `[0, 2π)` so the step never drops below
    /// `f32` resolution, however long the globe runs.
    pub fn advance(&mut self) {
        let motion = self.motion;
        let pointer = self.scene.pointer;
        let rotation = &mut self.scene.base.orientation;

        rotation.y += motion.spin;
        rotation.x += pointer.y * motion.sensitivity;
        rotation.y += pointer.x * motion.sensitivity;
        *rotation = rotation.wrapped();

        sync_orientation(&self.scene.base, self.scene.landmass.as_mut());
        self.frame += 1;
    }

    /// Advance once and render once.
    pub fn tick<S: FrameSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        self.advance();
        sink.present(&self.scene)
    }

    /// Tick until `stop` is raised. Returns the number of frames rendered.
    pub fn run<S: FrameSink>(&mut self, sink: &mut S, stop: &StopSignal) -> Result<u64, S::Error> {
        let mut rendered = 0;
        while !stop.is_stopped() {
            self.tick(sink)?;
            rendered += 1;
        }
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::Orientation;
    use glam::Vec3;

    struct Recorder {
        frames: Vec<(Orientation, Option<Orientation>)>,
        stop_after: usize,
        stop: StopSignal,
    }

    impl FrameSink for Recorder {
        type Error = ();

        fn present(&mut self, scene: &GlobeScene) -> Result<(), ()> {
            self.frames.push((
                scene.base.orientation,
                scene.landmass.as_ref().map(|l| l.orientation),
            ));
            if self.frames.len() >= self.stop_after {
                self.stop.stop();
            }
            Ok(())
        }
    }

    fn driver() -> FrameDriver {
        FrameDriver::new(PointCloud::new(vec![Vec3::X]), MotionConfig::default())
    }

    #[test]
    fn test_spin_without_pointer() {
        let mut d = driver();
        for _ in 0..10 {
            d.advance();
        }
        let o = d.scene().base.orientation;
        assert!((o.y - 0.02).abs() < 1e-6);
        assert_eq!(o.x, 0.0);
        assert_eq!(o.z, 0.0);
        assert_eq!(d.frame(), 10);
    }

    #[test]
    fn test_pointer_contribution() {
        let mut d = driver();
        d.set_pointer(Vec2::new(0.5, -0.25));
        d.advance();
        let o = d.scene().base.orientation;
        assert!((o.y - (0.002 + 0.005)).abs() < 1e-7);
        assert!((o.x - (std::f32::consts::TAU - 0.0025)).abs() < 1e-6);
    }

    #[test]
    fn test_spin_continues_from_large_yaw() {
        let mut cloud = PointCloud::new(vec![Vec3::X]);
        cloud.orientation.y = 65_536.0;
        let mut d = FrameDriver::new(cloud, MotionConfig::default());

        d.advance();
        let start = d.scene().base.orientation.y;
        assert!((0.0..=std::f32::consts::TAU).contains(&start));
        for _ in 0..1_000 {
            d.advance();
        }
        let yaw = d.scene().base.orientation.y;
        let turned = (yaw - start).rem_euclid(std::f32::consts::TAU);
        assert!((turned - 2.0).abs() < 1e-3, "turned {turned} rad in 1000 frames");
    }

    #[test]
    fn test_landmass_follows_base() {
        let mut d = driver();
        d.advance();
        assert!(d.install_landmass(PointCloud::new(vec![Vec3::Y])));
        assert!(!d.install_landmass(PointCloud::new(Vec::new())));
        d.set_pointer(Vec2::new(0.1, 0.2));
        d.advance();
        let scene = d.scene();
        assert_eq!(
            scene.landmass.as_ref().map(|l| l.orientation),
            Some(scene.base.orientation)
        );
        assert_eq!(scene.landmass.as_ref().map(PointCloud::len), Some(1));
    }

    #[test]
    fn test_run_stops_on_signal() {
        let stop = StopSignal::new();
        let mut sink = Recorder {
            frames: Vec::new(),
            stop_after: 5,
            stop: stop.clone(),
        };
        let mut d = driver();
        let rendered = d.run(&mut sink, &stop).unwrap();
        assert_eq!(rendered, 5);
        assert_eq!(sink.frames.len(), 5);
        assert!(sink.frames.iter().all(|(_, land)| land.is_none()));
    }

    #[test]
    fn test_run_with_raised_signal_renders_nothing() {
        let stop = StopSignal::new();
        stop.stop();
        let mut sink = Recorder {
            frames: Vec::new(),
            stop_after: 1,
            stop: stop.clone(),
        };
        assert_eq!(driver().run(&mut sink, &stop).unwrap(), 0);
        assert!(sink.frames.is_empty());
    }
}
