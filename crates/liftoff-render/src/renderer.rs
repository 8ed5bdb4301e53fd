//! Scene renderer
//!
//! Owns the GPU-side scene: uploaded meshes with their per-object transform
//! bind groups, the shared lights, and the plume pipeline. The application
//! drives it per frame: update transforms, `prepare_frame`, then `draw`
//! inside its render pass.

use crate::context::{RenderContext, RenderError};
use crate::gpu_mesh::GpuMesh;
use crate::plume_pipeline::{PlumePipeline, PlumeUniforms};
use crate::scene_pipeline::{LightUniforms, ScenePipeline, TransformUniforms};
use crate::texture_cache::TextureCache;
use liftoff_core::{Mat44, Vec3};
use liftoff_mesh::MeshData;
use std::path::Path;
use wgpu::util::DeviceExt;

/// A drawable object: GPU mesh plus its per-object bind groups
pub struct SceneObject {
    pub name: String,
    pub visible: bool,
    gpu_mesh: GpuMesh,
    transform: Mat44,
    transform_buffer: wgpu::Buffer,
    transform_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
}

pub struct SceneRenderer {
    scene_pipeline: ScenePipeline,
    plume_pipeline: PlumePipeline,
    texture_cache: TextureCache,
    objects: Vec<SceneObject>,
    pub lights: LightUniforms,
    /// Plume size/tint; view-dependent fields are filled per frame
    pub plume_style: PlumeUniforms,
}

impl SceneRenderer {
    pub fn new(context: &RenderContext, plume_capacity: usize) -> Self {
        let scene_pipeline = ScenePipeline::new(&context.device, context.config.format);
        let plume_pipeline =
            PlumePipeline::new(&context.device, context.config.format, plume_capacity);
        let texture_cache = TextureCache::new(&context.device, &context.queue);

        Self {
            scene_pipeline,
            plume_pipeline,
            texture_cache,
            objects: Vec::new(),
            lights: LightUniforms::default(),
            plume_style: PlumeUniforms::default(),
        }
    }

    /// Upload a mesh and register it for drawing. Returns its object index.
    /// A textured mesh whose image fails to load falls back to flat white.
    pub fn add_mesh(
        &mut self,
        context: &RenderContext,
        name: &str,
        mesh: &MeshData,
        transform: Mat44,
    ) -> Result<usize, RenderError> {
        let device = &context.device;
        let gpu_mesh = GpuMesh::upload(device, name, mesh);

        let texture = match &gpu_mesh.texture_path {
            Some(path) => {
                match self
                    .texture_cache
                    .load_file(device, &context.queue, Path::new(path))
                {
                    Ok(tex) => tex,
                    Err(e) => {
                        log::warn!("{}: {}, using white fallback", name, e);
                        &self.texture_cache.default_white
                    }
                }
            }
            None => &self.texture_cache.default_white,
        };

        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.scene_pipeline.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
            label: Some(&format!("{} Texture Bind Group", name)),
        });

        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Transform Buffer", name)),
            contents: bytemuck::cast_slice(&[TransformUniforms::new(
                &Mat44::IDENTITY,
                &transform,
            )]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let transform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.scene_pipeline.transform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
            label: Some(&format!("{} Transform Bind Group", name)),
        });

        self.objects.push(SceneObject {
            name: name.to_string(),
            visible: true,
            gpu_mesh,
            transform,
            transform_buffer,
            transform_bind_group,
            texture_bind_group,
        });

        Ok(self.objects.len() - 1)
    }

    /// Update an object's model matrix for the next frame
    pub fn set_transform(&mut self, index: usize, transform: Mat44) {
        if let Some(object) = self.objects.get_mut(index) {
            object.transform = transform;
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Write all per-frame GPU state: lights, per-object transforms, and the
    /// plume's uniforms and alive positions
    pub fn prepare_frame(
        &mut self,
        queue: &wgpu::Queue,
        view: &Mat44,
        view_proj: &Mat44,
        camera_pos: Vec3,
        plume_positions: &[Vec3],
    ) {
        self.lights.camera_pos = [camera_pos.x, camera_pos.y, camera_pos.z, 0.0];
        self.scene_pipeline.update_lights(queue, &self.lights);

        for object in &self.objects {
            queue.write_buffer(
                &object.transform_buffer,
                0,
                bytemuck::cast_slice(&[TransformUniforms::new(view_proj, &object.transform)]),
            );
        }

        // Billboard axes are the view matrix's first two rows
        let mut uniforms = self.plume_style;
        uniforms.view_proj = view_proj.to_cols_array_2d();
        uniforms.camera_right = [
            view.m[0][0],
            view.m[0][1],
            view.m[0][2],
            self.plume_style.camera_right[3],
        ];
        uniforms.camera_up = [view.m[1][0], view.m[1][1], view.m[1][2], 0.0];
        self.plume_pipeline.prepare(queue, &uniforms, plume_positions);
    }

    /// Record the scene into an open render pass
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(1, &self.scene_pipeline.light_bind_group, &[]);

        // Opaque meshes first, grouped by pipeline variant
        for textured in [false, true] {
            let pipeline = if textured {
                &self.scene_pipeline.textured_pipeline
            } else {
                &self.scene_pipeline.colored_pipeline
            };
            let mut bound = false;

            for object in self
                .objects
                .iter()
                .filter(|o| o.visible && o.gpu_mesh.is_textured() == textured)
            {
                if !bound {
                    pass.set_pipeline(pipeline);
                    bound = true;
                }
                pass.set_bind_group(0, &object.transform_bind_group, &[]);
                pass.set_bind_group(2, &object.texture_bind_group, &[]);
                pass.set_vertex_buffer(0, object.gpu_mesh.vertex_buffer.slice(..));
                pass.draw(0..object.gpu_mesh.vertex_count, 0..1);
            }
        }

        // Translucent plume last
        self.plume_pipeline.draw(pass);
    }
}
