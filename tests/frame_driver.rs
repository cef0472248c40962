//! Frame driver and orientation tests through the public API.

use std::f32::consts::TAU;

use excelsior::config::MotionConfig;
use excelsior::{
    sync_orientation, FrameDriver, FrameSink, GlobeScene, Orientation, PointCloud, SphereSampler,
    StopSignal, Vec2,
};

/// Records every presented scene and raises the stop signal after `limit`.
struct CountingSink {
    presented: Vec<GlobeScene>,
    limit: usize,
    stop: StopSignal,
}

impl CountingSink {
    fn new(limit: usize, stop: StopSignal) -> Self {
        Self {
            presented: Vec::new(),
            limit,
            stop,
        }
    }
}

impl FrameSink for CountingSink {
    type Error = String;

    fn present(&mut self, scene: &GlobeScene) -> Result<(), String> {
        self.presented.push(scene.clone());
        if self.presented.len() >= self.limit {
            self.stop.stop();
        }
        Ok(())
    }
}

/// Fails on the given frame.
struct FailingSink {
    fail_on: usize,
    seen: usize,
}

impl FrameSink for FailingSink {
    type Error = &'static str;

    fn present(&mut self, _scene: &GlobeScene) -> Result<(), &'static str> {
        self.seen += 1;
        if self.seen == self.fail_on {
            Err("surface lost")
        } else {
            Ok(())
        }
    }
}

/// Distance between two angles on the circle.
fn angle_gap(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}

fn base_cloud() -> PointCloud {
    PointCloud::new(SphereSampler::seeded(10).uniform(100, 70.0))
}

#[test]
fn test_sync_overwrites_any_prior_orientation() {
    let mut driver = base_cloud();
    driver.orientation = Orientation::new(0.3, 1.7, -0.4);

    for prior in [
        Orientation::IDENTITY,
        Orientation::new(5.0, -5.0, 5.0),
        Orientation::new(f32::MAX, 0.0, f32::MIN),
    ] {
        let mut dependent = PointCloud::new(Vec::new());
        dependent.orientation = prior;
        sync_orientation(&driver, Some(&mut dependent));
        assert_eq!(dependent.orientation, Orientation::new(0.3, 1.7, -0.4));
    }
}

#[test]
fn test_closed_form_rotation_with_fixed_pointer() {
    let motion = MotionConfig::default();
    let offsets = Vec2::new(0.3, -0.12);
    const FRAMES: u32 = 240;

    let mut driver = FrameDriver::new(base_cloud(), motion);
    driver.set_pointer(offsets);
    for _ in 0..FRAMES {
        driver.advance();
    }

    let n = FRAMES as f32;
    let expected_yaw = n * motion.spin + n * offsets.x * motion.sensitivity;
    let expected_pitch = n * offsets.y * motion.sensitivity;
    let o = driver.scene().base.orientation;
    assert!(angle_gap(o.y, expected_yaw) < 1e-4, "yaw {} vs {expected_yaw}", o.y);
    assert!(angle_gap(o.x, expected_pitch) < 1e-4, "pitch {} vs {expected_pitch}", o.x);
    assert_eq!(o.z, 0.0);
}

#[test]
fn test_closed_form_rotation_with_changing_pointer() {
    let motion = MotionConfig {
        spin: 0.01,
        sensitivity: 0.5,
        pointer_scale: 0.002,
    };
    let sequence = [Vec2::new(0.1, 0.0), Vec2::new(-0.2, 0.4), Vec2::ZERO, Vec2::new(0.0, -0.1)];

    let mut driver = FrameDriver::new(base_cloud(), motion);
    let mut expected = Orientation::IDENTITY;
    for offsets in sequence {
        driver.set_pointer(offsets);
        for _ in 0..10 {
            driver.advance();
            expected.y += motion.spin + offsets.x * motion.sensitivity;
            expected.x += offsets.y * motion.sensitivity;
        }
    }

    let o = driver.scene().base.orientation;
    assert!(angle_gap(o.x, expected.x) < 1e-4);
    assert!(angle_gap(o.y, expected.y) < 1e-4);
    assert_eq!(driver.frame(), 40);
}

#[test]
fn test_two_drivers_agree() {
    let run = || {
        let mut driver = FrameDriver::new(base_cloud(), MotionConfig::default());
        driver.set_pointer(Vec2::new(0.7, 0.2));
        for _ in 0..100 {
            driver.advance();
        }
        driver.scene().base.orientation
    };
    assert_eq!(run(), run());
}

#[test]
fn test_late_landmass_tracks_base_every_frame() {
    let stop = StopSignal::new();
    let mut sink = CountingSink::new(3, stop.clone());
    let mut driver = FrameDriver::new(base_cloud(), MotionConfig::default());
    driver.set_pointer(Vec2::new(0.05, 0.05));

    assert_eq!(driver.run(&mut sink, &stop).unwrap(), 3);
    assert!(sink.presented.iter().all(|s| s.landmass.is_none()));

    let landmass = PointCloud::new(SphereSampler::seeded(11).uniform(10, 70.0));
    assert!(driver.install_landmass(landmass));

    let stop = StopSignal::new();
    let mut sink = CountingSink::new(20, stop.clone());
    assert_eq!(driver.run(&mut sink, &stop).unwrap(), 20);
    for scene in &sink.presented {
        let land = scene.landmass.as_ref().expect("landmass installed");
        assert_eq!(land.orientation, scene.base.orientation);
        assert_eq!(land.len(), 10);
    }
    assert_eq!(driver.frame(), 23);
}

#[test]
fn test_run_propagates_render_error() {
    let stop = StopSignal::new();
    let mut sink = FailingSink { fail_on: 4, seen: 0 };
    let mut driver = FrameDriver::new(base_cloud(), MotionConfig::default());

    assert_eq!(driver.run(&mut sink, &stop), Err("surface lost"));
    // The failing frame still advanced state.
    assert_eq!(driver.frame(), 4);
}

#[test]
fn test_angles_stay_bounded_over_long_run() {
    let motion = MotionConfig::default();
    let mut driver = FrameDriver::new(base_cloud(), motion);
    driver.set_pointer(Vec2::new(1.28, -0.72));

    let mut previous = driver.scene().base.orientation;
    for _ in 0..200_000 {
        driver.advance();
        let o = driver.scene().base.orientation;
        assert!((0.0..=TAU).contains(&o.x) && (0.0..=TAU).contains(&o.y));
        let step = motion.spin + 1.28 * motion.sensitivity;
        assert!((angle_gap(o.y, previous.y) - step).abs() < 1e-5);
        previous = o;
    }
}

#[test]
fn test_positions_untouched_by_rotation() {
    let cloud = base_cloud();
    let before = cloud.positions().to_vec();
    let mut driver = FrameDriver::new(cloud, MotionConfig::default());
    driver.set_pointer(Vec2::new(1.0, 1.0));
    for _ in 0..50 {
        driver.advance();
    }
    assert_eq!(driver.scene().base.positions(), before.as_slice());
}
