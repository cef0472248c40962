//! Pointer input for globe rotation.
//!
//! The pointer does not drag the globe. Its distance from the window center
//! sets a steady rotation rate that persists until the pointer moves again.
//! Distances are measured in logical pixels, so the rate does not depend on
//! the display's scale factor:
//!
//! ```ignore
//! let mut pointer = PointerInput::new(0.002);
//! pointer.set_viewport(800, 600);
//! pointer.handle_event(&event); // CursorMoved at (500, 300)
//! assert_eq!(pointer.offsets(), Vec2::new(0.2, 0.0));
//! ```

use glam::Vec2;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;

/// Maps pointer position to rotation offsets.
#[derive(Debug, Clone)]
pub struct PointerInput {
    /// Scale from pixels off-center to offset units.
    scale: f32,
    /// Viewport size in physical pixels.
    viewport: PhysicalSize<u32>,
    /// Physical pixels per logical pixel.
    scale_factor: f64,
    /// Last known offsets; `x` drives yaw, `y` drives pitch.
    offsets: Vec2,
}

impl PointerInput {
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            viewport: PhysicalSize::new(0, 0),
            scale_factor: 1.0,
            offsets: Vec2::ZERO,
        }
    }

    /// Update the viewport used to find the center, in physical pixels.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = PhysicalSize::new(width, height);
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    /// Viewport size in logical pixels.
    pub fn logical_viewport(&self) -> Vec2 {
        let size = self.viewport.to_logical::<f32>(self.scale_factor);
        Vec2::new(size.width, size.height)
    }

    /// Recompute offsets for a pointer at `position` (logical pixels from
    /// the top-left corner).
    pub fn pointer_moved(&mut self, position: Vec2) -> Vec2 {
        self.offsets = (position - self.logical_viewport() * 0.5) * self.scale;
        self.offsets
    }

    /// Last computed offsets. Reading does not reset them.
    pub fn offsets(&self) -> Vec2 {
        self.offsets
    }

    /// Process a winit window event. Returns true if the offsets changed.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(self.scale_factor);
                self.pointer_moved(Vec2::new(logical.x, logical.y));
                true
            }
            WindowEvent::Resized(size) => {
                self.set_viewport(size.width, size.height);
                false
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.set_scale_factor(*scale_factor);
                false
            }
            _ => false,
        }
    }
}
