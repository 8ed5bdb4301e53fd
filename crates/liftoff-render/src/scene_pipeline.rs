//! Blinn-Phong scene pipeline
//!
//! Two pipeline variants share one shader module and bind group layouts:
//! vertex-colored (with per-vertex shininess) and textured. Group 0 is the
//! per-object transform, group 1 the shared lights, group 2 the diffuse
//! texture (bound to the 1x1 white fallback for colored draws).

use crate::gpu_mesh::{ColoredVertex, TexturedVertex};
use bytemuck::{Pod, Zeroable};
use liftoff_core::{Mat44, Vec3};
use wgpu::util::DeviceExt;

pub const MAX_POINT_LIGHTS: usize = 4;

/// A static scene light
#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub enabled: bool,
}

/// Per-object uniforms, matching the WGSL struct layout
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct TransformUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// mat3x3 columns at vec4 stride
    pub normal: [[f32; 4]; 3],
}

impl TransformUniforms {
    /// Model matrices in this scene are rotate/translate only, so the normal
    /// matrix is the model's upper-left block.
    pub fn new(view_proj: &Mat44, model: &Mat44) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            normal: model.upper_left().to_cols_array_padded(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PointLightGpu {
    /// xyz = position, w = enabled flag (0 or 1)
    pub position: [f32; 4],
    pub color: [f32; 4],
}

/// Shared per-frame lighting uniforms
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightUniforms {
    pub sun_direction: [f32; 4],
    pub sun_color: [f32; 4],
    pub ambient: [f32; 4],
    /// Shared specular tint for the whole scene
    pub specular_color: [f32; 4],
    pub camera_pos: [f32; 4],
    pub points: [PointLightGpu; MAX_POINT_LIGHTS],
}

impl Default for LightUniforms {
    fn default() -> Self {
        Self {
            sun_direction: [-0.4, -0.8, -0.3, 0.0],
            sun_color: [1.0, 0.96, 0.9, 0.0],
            ambient: [0.18, 0.19, 0.22, 0.0],
            specular_color: [0.6, 0.6, 0.6, 0.0],
            camera_pos: [0.0; 4],
            points: [PointLightGpu {
                position: [0.0; 4],
                color: [0.0; 4],
            }; MAX_POINT_LIGHTS],
        }
    }
}

impl LightUniforms {
    pub fn set_points(&mut self, lights: &[PointLight]) {
        for (slot, light) in self.points.iter_mut().zip(
            lights
                .iter()
                .chain(std::iter::repeat(&PointLight {
                    position: Vec3::ZERO,
                    color: Vec3::ZERO,
                    enabled: false,
                }))
                .take(MAX_POINT_LIGHTS),
        ) {
            let p = light.position;
            slot.position = [p.x, p.y, p.z, if light.enabled { 1.0 } else { 0.0 }];
            let c = light.color;
            slot.color = [c.x, c.y, c.z, 0.0];
        }
    }
}

/// The scene render pipeline (colored + textured variants)
pub struct ScenePipeline {
    pub colored_pipeline: wgpu::RenderPipeline,
    pub textured_pipeline: wgpu::RenderPipeline,
    pub transform_bind_group_layout: wgpu::BindGroupLayout,
    pub texture_bind_group_layout: wgpu::BindGroupLayout,
    pub light_buffer: wgpu::Buffer,
    pub light_bind_group: wgpu::BindGroup,
}

impl ScenePipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });

        let uniform_entry = |visibility| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        // Group 0: per-object transforms
        let transform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[uniform_entry(wgpu::ShaderStages::VERTEX)],
                label: Some("Transform Bind Group Layout"),
            });

        // Group 1: shared lights
        let light_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[uniform_entry(wgpu::ShaderStages::FRAGMENT)],
                label: Some("Light Bind Group Layout"),
            });

        // Group 2: diffuse texture + sampler
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                label: Some("Scene Texture Bind Group Layout"),
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[
                &transform_bind_group_layout,
                &light_bind_group_layout,
                &texture_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });

        let depth_stencil = wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        };

        let primitive = wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        };

        let make_pipeline = |label: &str,
                             vs_entry: &str,
                             fs_entry: &str,
                             layout: wgpu::VertexBufferLayout| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(vs_entry),
                    buffers: &[layout],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive,
                depth_stencil: Some(depth_stencil.clone()),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let colored_pipeline = make_pipeline(
            "Scene Colored Pipeline",
            "vs_colored",
            "fs_colored",
            ColoredVertex::desc(),
        );
        let textured_pipeline = make_pipeline(
            "Scene Textured Pipeline",
            "vs_textured",
            "fs_textured",
            TexturedVertex::desc(),
        );

        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Uniform Buffer"),
            contents: bytemuck::cast_slice(&[LightUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let light_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &light_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: light_buffer.as_entire_binding(),
            }],
            label: Some("Light Bind Group"),
        });

        Self {
            colored_pipeline,
            textured_pipeline,
            transform_bind_group_layout,
            texture_bind_group_layout,
            light_buffer,
            light_bind_group,
        }
    }

    pub fn update_lights(&self, queue: &wgpu::Queue, lights: &LightUniforms) {
        queue.write_buffer(&self.light_buffer, 0, bytemuck::cast_slice(&[*lights]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_uniforms_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<LightUniforms>() % 16, 0);
        // Two mat4x4 plus a vec4-stride mat3x3
        assert_eq!(std::mem::size_of::<TransformUniforms>(), 176);
    }

    #[test]
    fn normal_matrix_is_the_models_rotation() {
        let model = Mat44::rotation_y(1.1).mul(&Mat44::translation(Vec3::new(0.0, 30.0, -5.0)));
        let uniforms = TransformUniforms::new(&Mat44::IDENTITY, &model);

        let expected = model.upper_left();
        for c in 0..3 {
            for r in 0..3 {
                assert!((uniforms.normal[c][r] - expected.m[r][c]).abs() < 1e-6);
            }
            // Translation never leaks into the normal transform
            assert_eq!(uniforms.normal[c][3], 0.0);
        }
    }

    #[test]
    fn set_points_disables_unused_slots() {
        let mut uniforms = LightUniforms::default();
        uniforms.set_points(&[PointLight {
            position: Vec3::new(1.0, 2.0, 3.0),
            color: Vec3::ONE,
            enabled: true,
        }]);

        assert_eq!(uniforms.points[0].position[3], 1.0);
        for slot in &uniforms.points[1..] {
            assert_eq!(slot.position[3], 0.0);
        }
    }
}
