//! Atmospheric glow shell.
//!
//! A slightly larger sphere drawn from the inside (back faces only) with
//! additive blending. Intensity rises toward the silhouette, giving a thin
//! halo around the globe. The shell does not rotate.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use super::camera::Camera;
use crate::config::{hex_to_rgb, srgb_to_linear, AtmosphereConfig};

pub(crate) const ATMOSPHERE_SHADER: &str = include_str!("shaders/atmosphere.wgsl");

/// Mesh vertex: position and outward normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GlowUniforms {
    model_view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
    c: f32,
    p: f32,
    _padding: [f32; 2],
}

/// Indexed UV sphere.
#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// UV sphere with `segments` columns and rows. Triangles wind
    /// counter-clockwise seen from outside.
    pub fn uv(radius: f32, segments: u32) -> Self {
        let cols = segments.max(3);
        let rows = segments.max(2);

        let mut vertices = Vec::with_capacity(((cols + 1) * (rows + 1)) as usize);
        for iy in 0..=rows {
            let v = iy as f32 / rows as f32;
            let polar = v * PI;
            for ix in 0..=cols {
                let u = ix as f32 / cols as f32;
                let azimuth = u * TAU;
                let normal = Vec3::new(
                    -azimuth.cos() * polar.sin(),
                    polar.cos(),
                    azimuth.sin() * polar.sin(),
                );
                vertices.push(MeshVertex {
                    position: (normal * radius).to_array(),
                    normal: normal.to_array(),
                });
            }
        }

        let stride = cols + 1;
        let mut indices = Vec::with_capacity((cols * rows * 6) as usize);
        for iy in 0..rows {
            for ix in 0..cols {
                let a = iy * stride + ix + 1;
                let b = iy * stride + ix;
                let c = (iy + 1) * stride + ix;
                let d = (iy + 1) * stride + ix + 1;
                // Pole rows collapse to a point; skip their degenerate half.
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != rows - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }
}

/// GPU state for the glow shell.
pub struct AtmosphereState {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    color: [f32; 4],
    c: f32,
    p: f32,
}

impl AtmosphereState {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        radius: f32,
        config: &AtmosphereConfig,
    ) -> Self {
        let mesh = SphereMesh::uv(radius, config.segments);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Atmosphere Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Atmosphere Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Atmosphere Uniform Buffer"),
            size: std::mem::size_of::<GlowUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Atmosphere Bind Group Layout"),
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

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Atmosphere Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Atmosphere Shader"),
            source: wgpu::ShaderSource::Wgsl(ATMOSPHERE_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Atmosphere Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Atmosphere Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState {
                        color: additive,
                        alpha: additive,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Inside of the shell only.
                cull_mode: Some(wgpu::Face::Front),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let rgb = srgb_to_linear(hex_to_rgb(config.color));

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            uniform_buffer,
            bind_group,
            color: [rgb.x, rgb.y, rgb.z, 1.0],
            c: config.c,
            p: config.p,
        }
    }

    /// Upload camera matrices for this frame.
    pub fn update(&self, queue: &wgpu::Queue, camera: &Camera) {
        let model_view = camera.view_matrix();
        let normal_matrix = Mat4::from_mat3(glam::Mat3::from_mat4(model_view).inverse().transpose());
        let uniforms = GlowUniforms {
            model_view: model_view.to_cols_array_2d(),
            proj: camera.projection_matrix().to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            color: self.color,
            c: self.c,
            p: self.p,
            _padding: [0.0; 2],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
