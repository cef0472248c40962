//! Window, event loop, and the glue between them.

use std::sync::Arc;

use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

use crate::cloud::PointCloud;
use crate::config::GlobeConfig;
use crate::error::{GlobeError, MaskError};
use crate::frame::FrameDriver;
use crate::gpu::GpuState;
use crate::input::PointerInput;
use crate::loader::spawn_landmass_loader;
use crate::sampling::{MaskSampling, SphereSampler};

/// Messages delivered to the event loop from other threads.
#[derive(Debug)]
pub enum GlobeEvent {
    /// The landmass mask finished loading (or failed to).
    LandmassReady(Result<PointCloud, MaskError>),
}

pub struct App {
    config: GlobeConfig,
    proxy: EventLoopProxy<GlobeEvent>,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    driver: FrameDriver,
    pointer: PointerInput,
    fatal: Option<GlobeError>,
}

impl App {
    pub fn new(config: GlobeConfig, proxy: EventLoopProxy<GlobeEvent>) -> Self {
        let mut sampler = SphereSampler::from_seed(config.seed);
        let base = PointCloud::new(
            sampler.uniform(config.sampling.particle_count, config.sampling.radius),
        );
        info!(points = base.len(), radius = config.sampling.radius, "base cloud sampled");

        Self {
            driver: FrameDriver::new(base, config.motion),
            pointer: PointerInput::new(config.motion.pointer_scale),
            config,
            proxy,
            window: None,
            gpu_state: None,
            fatal: None,
        }
    }

    /// Frame driver, for inspection.
    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), GlobeError> {
        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_transparent(true)
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();
        self.pointer.set_scale_factor(window.scale_factor());
        self.pointer.set_viewport(size.width, size.height);

        let mut gpu_state = pollster::block_on(GpuState::new(window.clone(), &self.config))?;
        gpu_state.upload_base(&self.driver.scene().base);

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);

        let proxy = self.proxy.clone();
        let spawned = spawn_landmass_loader(
            self.config.mask_path.clone(),
            MaskSampling::from(&self.config.sampling),
            self.config.seed,
            move |result| {
                // Fails only once the event loop has exited.
                let _ = proxy.send_event(GlobeEvent::LandmassReady(result));
            },
        );
        if let Err(e) = spawned {
            warn!("could not start landmass loader: {e}");
        }

        Ok(())
    }

    fn install_landmass(&mut self, cloud: PointCloud) {
        let gpu_state = &mut self.gpu_state;
        accept_landmass(&mut self.driver, cloud, |installed| {
            if let Some(gpu_state) = gpu_state {
                gpu_state.upload_landmass(installed);
            }
        });
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };
        match self.driver.tick(gpu_state) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => warn!("render error: {e:?}"),
        }
    }
}

/// Install a delivered landmass and pass it to `upload` only if the driver
/// accepted it. Returns false for a duplicate, which leaves both the scene
/// and the GPU buffers on the first cloud.
fn accept_landmass(
    driver: &mut FrameDriver,
    cloud: PointCloud,
    upload: impl FnOnce(&PointCloud),
) -> bool {
    if cloud.is_empty() {
        warn!("landmass mask produced no points; check the mask brightness");
    }
    if !driver.install_landmass(cloud) {
        warn!("landmass already installed, ignoring duplicate");
        return false;
    }
    if let Some(installed) = &driver.scene().landmass {
        upload(installed);
    }
    true
}

impl ApplicationHandler<GlobeEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            error!("startup failed: {e}");
            self.fatal = Some(e);
            event_loop.exit();
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: GlobeEvent) {
        match event {
            GlobeEvent::LandmassReady(Ok(cloud)) => self.install_landmass(cloud),
            GlobeEvent::LandmassReady(Err(e)) => {
                warn!("landmass unavailable, showing globe without it: {e}");
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.pointer.handle_event(&event) {
            self.driver.set_pointer(self.pointer.offsets());
        }

        match event {
            WindowEvent::CloseRequested => {
                info!(frames = self.driver.frame(), "close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Open the window and run the globe until it is closed.
pub fn run(config: GlobeConfig) -> Result<(), GlobeError> {
    let event_loop = EventLoop::<GlobeEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, event_loop.create_proxy());
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
