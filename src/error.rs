//! Error types for the globe.
//!
//! Mask errors are recoverable (the globe runs without a landmass overlay);
//! GPU and window errors abort startup.

use std::path::PathBuf;

/// Errors that can occur while loading a mask image.
#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    /// The image file could not be opened or decoded.
    #[error("failed to load mask '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// The image decoded but has no pixels.
    #[error("mask image is empty ({width}x{height})")]
    Empty { width: u32, height: u32 },
    /// Pixel buffer length does not match the stated dimensions.
    #[error("mask data size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; a Vulkan/Metal/DX12/GL capable GPU is required")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors that can occur when running the globe application.
#[derive(Debug, thiserror::Error)]
pub enum GlobeError {
    /// Failed to create or run the event loop.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create the window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}
