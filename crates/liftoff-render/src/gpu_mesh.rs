//! GPU mesh upload
//!
//! Converts a CPU-side `MeshData` into a non-indexed vertex buffer. Shader
//! attribute slots are fixed by convention: 0 = position, 1 = normal,
//! 3 = color or texcoord, 4 = shininess (untextured only).

use bytemuck::{Pod, Zeroable};
use liftoff_core::Vec3;
use liftoff_mesh::{MeshData, VertexAttributes};
use wgpu::util::DeviceExt;

/// Vertex layout for untextured, vertex-colored meshes
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ColoredVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
    pub shininess: f32,
}

impl ColoredVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,   // position
        1 => Float32x3,   // normal
        3 => Float32x3,   // color
        4 => Float32,     // shininess
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColoredVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Vertex layout for textured meshes
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl TexturedVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,   // position
        1 => Float32x3,   // normal
        3 => Float32x2,   // uv
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TexturedVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// A GPU-resident mesh ready to draw
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// Texture path when the source mesh was textured
    pub texture_path: Option<String>,
}

impl GpuMesh {
    pub fn is_textured(&self) -> bool {
        self.texture_path.is_some()
    }

    /// Upload a CPU mesh, choosing the vertex layout from its attribute mode
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let arr = |v: &Vec3| v.to_array();

        match &mesh.attributes {
            VertexAttributes::Colored { colors, shininess } => {
                let vertices: Vec<ColoredVertex> = mesh
                    .positions
                    .iter()
                    .enumerate()
                    .map(|(i, p)| ColoredVertex {
                        position: arr(p),
                        normal: arr(&mesh.normals[i]),
                        color: arr(&colors[i]),
                        shininess: shininess[i],
                    })
                    .collect();

                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Vertex Buffer", label)),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });

                Self {
                    vertex_buffer,
                    vertex_count: vertices.len() as u32,
                    texture_path: None,
                }
            }
            VertexAttributes::Textured {
                texcoords,
                texture_path,
            } => {
                let vertices: Vec<TexturedVertex> = mesh
                    .positions
                    .iter()
                    .enumerate()
                    .map(|(i, p)| TexturedVertex {
                        position: arr(p),
                        normal: arr(&mesh.normals[i]),
                        uv: texcoords[i].to_array(),
                    })
                    .collect();

                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Vertex Buffer", label)),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });

                Self {
                    vertex_buffer,
                    vertex_count: vertices.len() as u32,
                    texture_path: Some(texture_path.clone()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colored_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<ColoredVertex>(), 10 * 4);
        assert_eq!(std::mem::size_of::<TexturedVertex>(), 8 * 4);
    }
}
