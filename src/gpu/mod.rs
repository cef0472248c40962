//! GPU renderer for the globe.
//!
//! Draws, in order, the atmosphere shell and then each point cloud as
//! instanced camera-facing quads. Clouds are uploaded once; only their
//! uniforms (model-view matrix) change per frame.

mod atmosphere;
mod camera;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use tracing::{debug, info};
use wgpu::util::DeviceExt;
use winit::window::Window;

pub use atmosphere::{MeshVertex, SphereMesh};
pub use camera::Camera;

use crate::cloud::PointCloud;
use crate::config::{hex_to_rgb, srgb_to_linear, GlobeConfig, MaterialConfig};
use crate::error::GpuError;
use crate::frame::{FrameSink, GlobeScene};
use atmosphere::AtmosphereState;

pub(crate) const POINTS_SHADER: &str = include_str!("shaders/points.wgsl");

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CloudUniforms {
    model_view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    color: [f32; 4],
    point_size: f32,
    aspect: f32,
    _padding: [f32; 2],
}

/// Vertex and uniform buffers for one uploaded point cloud.
struct CloudBuffers {
    vertex_buffer: wgpu::Buffer,
    count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl CloudBuffers {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        cloud: &PointCloud,
        label: &str,
    ) -> Self {
        let positions: Vec<[f32; 3]> = cloud.positions().iter().map(|p| p.to_array()).collect();

        // Zero-length vertex buffers are invalid; keep one dummy vertex and draw none.
        let contents: &[u8] = if positions.is_empty() {
            &[0; 12]
        } else {
            bytemuck::cast_slice(&positions)
        };
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents,
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} Uniform Buffer")),
            size: std::mem::size_of::<CloudUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Bind Group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            vertex_buffer,
            count: positions.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    points_pipeline: wgpu::RenderPipeline,
    cloud_layout: wgpu::BindGroupLayout,
    base: Option<CloudBuffers>,
    landmass: Option<CloudBuffers>,
    atmosphere: AtmosphereState,
    pub camera: Camera,
    material: MaterialConfig,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, globe: &GlobeConfig) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        info!(
            adapter = %adapter_info.name,
            backend = ?adapter_info.backend,
            "selected GPU adapter"
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let camera = Camera::new(
            &globe.camera,
            config.width as f32 / config.height as f32,
        );

        let cloud_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Cloud Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Points Shader"),
            source: wgpu::ShaderSource::Wgsl(POINTS_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Points Pipeline Layout"),
            bind_group_layouts: &[&cloud_layout],
            push_constant_ranges: &[],
        });

        let points_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Points Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    }],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // Transparent points never write depth.
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let atmosphere = AtmosphereState::new(
            &device,
            config.format,
            globe.atmosphere_radius(),
            &globe.atmosphere,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            points_pipeline,
            cloud_layout,
            base: None,
            landmass: None,
            atmosphere,
            camera,
            material: globe.material,
        })
    }

    /// Upload the base particle sphere.
    pub fn upload_base(&mut self, cloud: &PointCloud) {
        debug!(points = cloud.len(), "uploading base cloud");
        self.base = Some(CloudBuffers::new(&self.device, &self.cloud_layout, cloud, "Base Cloud"));
    }

    /// Upload the landmass overlay once it has been sampled.
    pub fn upload_landmass(&mut self, cloud: &PointCloud) {
        debug!(points = cloud.len(), "uploading landmass cloud");
        self.landmass = Some(CloudBuffers::new(
            &self.device,
            &self.cloud_layout,
            cloud,
            "Landmass Cloud",
        ));
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.camera.set_viewport(new_size.width, new_size.height);
            debug!(width = new_size.width, height = new_size.height, "surface resized");
        }
    }

    /// Reconfigure the surface at its current size after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn write_cloud_uniforms(&self, buffers: &CloudBuffers, cloud: &PointCloud) {
        let rgb = srgb_to_linear(hex_to_rgb(self.material.color));
        let model_view = self.camera.view_matrix() * cloud.orientation.matrix();
        let uniforms = CloudUniforms {
            model_view: model_view.to_cols_array_2d(),
            proj: self.camera.projection_matrix().to_cols_array_2d(),
            color: [rgb.x, rgb.y, rgb.z, self.material.opacity],
            point_size: self.material.size,
            aspect: self.camera.aspect,
            _padding: [0.0; 2],
        };
        self.queue
            .write_buffer(&buffers.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    pub fn render(&mut self, scene: &GlobeScene) -> Result<(), wgpu::SurfaceError> {
        self.atmosphere.update(&self.queue, &self.camera);
        if let Some(buffers) = &self.base {
            self.write_cloud_uniforms(buffers, &scene.base);
        }
        let landmass = match (&self.landmass, &scene.landmass) {
            (Some(buffers), Some(cloud)) => {
                self.write_cloud_uniforms(buffers, cloud);
                Some(buffers)
            }
            _ => None,
        };

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Globe Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.atmosphere.draw(&mut render_pass);

            render_pass.set_pipeline(&self.points_pipeline);
            for buffers in self.base.iter().chain(landmass) {
                if buffers.count == 0 {
                    continue;
                }
                render_pass.set_bind_group(0, &buffers.bind_group, &[]);
                render_pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
                render_pass.draw(0..6, 0..buffers.count);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl FrameSink for GpuState {
    type Error = wgpu::SurfaceError;

    fn present(&mut self, scene: &GlobeScene) -> Result<(), Self::Error> {
        self.render(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_points_shader_is_valid() {
        validate_wgsl(POINTS_SHADER).expect("points WGSL should be valid");
    }

    #[test]
    fn test_points_are_flat_squares() {
        let fragment = &POINTS_SHADER[POINTS_SHADER.find("@fragment").unwrap()..];
        assert!(!fragment.contains("discard"));
        assert!(fragment.contains("return cloud.color;"));
    }

    #[test]
    fn test_atmosphere_shader_is_valid() {
        validate_wgsl(atmosphere::ATMOSPHERE_SHADER).expect("atmosphere WGSL should be valid");
    }

    #[test]
    fn test_cloud_uniform_layout() {
        // Must match the WGSL struct: two mat4, one vec4, two f32, rounded to 16.
        assert_eq!(std::mem::size_of::<CloudUniforms>(), 160);
    }
}
