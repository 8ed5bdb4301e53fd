//! Liftoff Render - wgpu-based renderer
//!
//! Renders the scene's colored and textured meshes with Blinn-Phong shading
//! and the exhaust plume as additively blended camera-facing quads.

mod context;
mod gpu_mesh;
mod plume_pipeline;
mod renderer;
mod scene_pipeline;
mod texture_cache;

pub use context::{RenderContext, RenderError};
pub use gpu_mesh::{ColoredVertex, GpuMesh, TexturedVertex};
pub use plume_pipeline::{PlumePipeline, PlumeUniforms};
pub use renderer::{SceneObject, SceneRenderer};
pub use scene_pipeline::{
    LightUniforms, PointLight, PointLightGpu, ScenePipeline, TransformUniforms, MAX_POINT_LIGHTS,
};
pub use texture_cache::{GpuTexture, TextureCache};
