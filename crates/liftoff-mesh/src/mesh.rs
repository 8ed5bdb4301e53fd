//! CPU-side mesh storage
//!
//! A mesh is a flat (non-indexed) triangle list: positions and normals plus
//! exactly one of two attribute modes. Untextured meshes carry a per-vertex
//! color and specular exponent; textured meshes carry UVs and the path of the
//! texture to sample. The mode is fixed at construction and [`MeshData::append`]
//! refuses to mix them.

use liftoff_core::{LiftoffError, Result, Vec2, Vec3};

/// A contiguous (start, count) slice of a larger vertex buffer belonging to
/// one named sub-part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubRange {
    pub start: u32,
    pub count: u32,
}

impl SubRange {
    pub fn end(&self) -> u32 {
        self.start + self.count
    }
}

/// Per-vertex attributes beyond position and normal. A mesh is exactly one of
/// these, never both.
#[derive(Clone, Debug)]
pub enum VertexAttributes {
    /// Per-vertex color and specular exponent
    Colored {
        colors: Vec<Vec3>,
        shininess: Vec<f32>,
    },
    /// Per-vertex UVs sampling the texture at `texture_path`
    Textured {
        texcoords: Vec<Vec2>,
        texture_path: String,
    },
}

impl VertexAttributes {
    pub fn len(&self) -> usize {
        match self {
            Self::Colored { colors, .. } => colors.len(),
            Self::Textured { texcoords, .. } => texcoords.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A flat triangle list with mode-tagged per-vertex attributes
#[derive(Clone, Debug)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub attributes: VertexAttributes,
}

impl MeshData {
    /// Create an empty untextured mesh
    pub fn new_colored() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            attributes: VertexAttributes::Colored {
                colors: Vec::new(),
                shininess: Vec::new(),
            },
        }
    }

    /// Create an empty textured mesh sampling `texture_path`
    pub fn new_textured(texture_path: impl Into<String>) -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            attributes: VertexAttributes::Textured {
                texcoords: Vec::new(),
                texture_path: texture_path.into(),
            },
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_textured(&self) -> bool {
        matches!(self.attributes, VertexAttributes::Textured { .. })
    }

    /// Texture path for textured meshes, `None` otherwise
    pub fn texture_path(&self) -> Option<&str> {
        match &self.attributes {
            VertexAttributes::Textured { texture_path, .. } => Some(texture_path.as_str()),
            VertexAttributes::Colored { .. } => None,
        }
    }

    /// Push one vertex onto an untextured mesh.
    ///
    /// Panics if the mesh is textured; internal builders only ever call this
    /// on meshes they created with [`MeshData::new_colored`].
    pub(crate) fn push_colored_vertex(
        &mut self,
        position: Vec3,
        normal: Vec3,
        color: Vec3,
        shine: f32,
    ) {
        self.positions.push(position);
        self.normals.push(normal);
        match &mut self.attributes {
            VertexAttributes::Colored { colors, shininess } => {
                colors.push(color);
                shininess.push(shine);
            }
            VertexAttributes::Textured { .. } => {
                unreachable!("colored vertex pushed onto textured mesh")
            }
        }
    }

    /// Append all of `other`'s vertices to this mesh.
    ///
    /// Both meshes must use the same attribute mode; appending a textured mesh
    /// onto a colored one (or vice versa) is an error. For textured meshes the
    /// texture paths must also match, since a single mesh binds one texture.
    pub fn append(&mut self, other: &MeshData) -> Result<()> {
        match (&mut self.attributes, &other.attributes) {
            (
                VertexAttributes::Colored { colors, shininess },
                VertexAttributes::Colored {
                    colors: other_colors,
                    shininess: other_shininess,
                },
            ) => {
                colors.extend_from_slice(other_colors);
                shininess.extend_from_slice(other_shininess);
            }
            (
                VertexAttributes::Textured {
                    texcoords,
                    texture_path,
                },
                VertexAttributes::Textured {
                    texcoords: other_texcoords,
                    texture_path: other_path,
                },
            ) => {
                if texture_path != other_path {
                    return Err(LiftoffError::MeshError(format!(
                        "cannot append mesh textured with '{}' onto mesh textured with '{}'",
                        other_path, texture_path
                    )));
                }
                texcoords.extend_from_slice(other_texcoords);
            }
            _ => {
                return Err(LiftoffError::MeshError(
                    "cannot append meshes with different attribute modes".into(),
                ));
            }
        }

        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        Ok(())
    }

    /// Check that every attribute sequence has the same length
    pub fn validate(&self) -> Result<()> {
        let n = self.positions.len();
        if self.normals.len() != n || self.attributes.len() != n {
            return Err(LiftoffError::MeshError(format!(
                "attribute length mismatch: {} positions, {} normals, {} attributes",
                n,
                self.normals.len(),
                self.attributes.len()
            )));
        }
        Ok(())
    }
}
