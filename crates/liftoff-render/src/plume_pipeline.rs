//! Exhaust plume render pipeline
//!
//! Renders camera-facing quads via an instanced draw call with additive
//! blending. Instance positions come from a storage buffer sized for the
//! whole particle pool; only the compacted alive prefix is written and drawn
//! each frame. Depth test on, depth write off.

use bytemuck::{Pod, Zeroable};
use liftoff_core::Vec3;
use wgpu::util::DeviceExt;

/// Per-frame plume uniforms — matches WGSL struct layout
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PlumeUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = camera right, w = particle half-size in world units
    pub camera_right: [f32; 4],
    pub camera_up: [f32; 4],
    /// rgb = plume tint, a = base opacity
    pub color: [f32; 4],
}

impl Default for PlumeUniforms {
    fn default() -> Self {
        Self {
            view_proj: [[0.0; 4]; 4],
            camera_right: [1.0, 0.0, 0.0, 0.12],
            camera_up: [0.0, 1.0, 0.0, 0.0],
            color: [1.0, 0.62, 0.25, 0.16],
        }
    }
}

pub struct PlumePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_buffer: wgpu::Buffer,
    pub uniform_bind_group: wgpu::BindGroup,
    pub instance_buffer: wgpu::Buffer,
    pub instance_bind_group: wgpu::BindGroup,
    capacity: usize,
    /// Reused CPU staging for position -> vec4 conversion
    scratch: Vec<[f32; 4]>,
    instance_count: u32,
}

impl PlumePipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, capacity: usize) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Plume Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("plume.wgsl").into()),
        });

        // Group 0: uniforms
        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("Plume Uniform Bind Group Layout"),
            });

        // Group 1: instance storage buffer (read-only)
        let instance_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("Plume Instance Bind Group Layout"),
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Plume Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout, &instance_bind_group_layout],
            push_constant_ranges: &[],
        });

        // Additive blend (src_alpha + One)
        let additive_blend = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Plume Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_plume"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_plume"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(additive_blend),
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
            // Translucent: test against scene depth but never write it
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Plume Uniform Buffer"),
            contents: bytemuck::cast_slice(&[PlumeUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("Plume Uniform Bind Group"),
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Plume Instance Buffer"),
            size: (capacity * std::mem::size_of::<[f32; 4]>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let instance_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &instance_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: instance_buffer.as_entire_binding(),
            }],
            label: Some("Plume Instance Bind Group"),
        });

        Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            instance_buffer,
            instance_bind_group,
            capacity,
            scratch: Vec::new(),
            instance_count: 0,
        }
    }

    /// Upload this frame's uniforms and alive particle positions
    pub fn prepare(&mut self, queue: &wgpu::Queue, uniforms: &PlumeUniforms, positions: &[Vec3]) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));

        let count = positions.len().min(self.capacity);
        self.scratch.clear();
        self.scratch
            .extend(positions[..count].iter().map(|p| [p.x, p.y, p.z, 0.0]));
        self.instance_count = count as u32;

        if count > 0 {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.scratch));
        }
    }

    /// Draw the quads prepared for this frame
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_bind_group(1, &self.instance_bind_group, &[]);
        pass.draw(0..6, 0..self.instance_count);
    }
}
