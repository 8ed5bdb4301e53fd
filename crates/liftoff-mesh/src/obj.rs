//! OBJ import
//!
//! Loads a Wavefront OBJ into a flat [`MeshData`], triangulating faces on
//! load. When the first referenced material carries a diffuse texture the
//! result is a textured mesh (UVs plus the texture path, resolved relative to
//! the OBJ file); otherwise vertices are colored from their mesh's material
//! diffuse and shininess. Material indices are validated rather than trusted.

use crate::mesh::MeshData;
use liftoff_core::{LiftoffError, Result, Vec2, Vec3};
use std::path::Path;

const DEFAULT_DIFFUSE: Vec3 = Vec3::new(0.8, 0.8, 0.8);
const DEFAULT_SHININESS: f32 = 16.0;

/// Load an OBJ file into one concatenated mesh
pub fn load_obj(path: &Path) -> Result<MeshData> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|e| LiftoffError::ObjLoadError(format!("{}: {}", path.display(), e)))?;

    let materials = match materials {
        Ok(m) => m,
        Err(e) => {
            log::warn!("{}: material library failed to load: {}", path.display(), e);
            Vec::new()
        }
    };

    let texture = find_texture(path, &models, &materials)?;

    let mut mesh = match &texture {
        Some(tex_path) => MeshData::new_textured(tex_path.clone()),
        None => MeshData::new_colored(),
    };

    for model in &models {
        append_model(&mut mesh, model, &materials, texture.is_some(), path)?;
    }

    mesh.validate()?;
    Ok(mesh)
}

/// First diffuse texture referenced by any model, resolved next to the OBJ
fn find_texture(
    path: &Path,
    models: &[tobj::Model],
    materials: &[tobj::Material],
) -> Result<Option<String>> {
    for model in models {
        let Some(id) = model.mesh.material_id else {
            continue;
        };
        let material = materials.get(id).ok_or_else(|| {
            LiftoffError::ObjLoadError(format!(
                "{}: mesh '{}' references material {} but only {} are defined",
                path.display(),
                model.name,
                id,
                materials.len()
            ))
        })?;
        if let Some(tex) = &material.diffuse_texture {
            let resolved = path
                .parent()
                .map(|dir| dir.join(tex))
                .unwrap_or_else(|| tex.into());
            return Ok(Some(resolved.to_string_lossy().into_owned()));
        }
    }
    Ok(None)
}

fn append_model(
    mesh: &mut MeshData,
    model: &tobj::Model,
    materials: &[tobj::Material],
    textured: bool,
    path: &Path,
) -> Result<()> {
    let m = &model.mesh;
    let vertex = |i: usize| {
        Vec3::new(
            m.positions[i * 3],
            m.positions[i * 3 + 1],
            m.positions[i * 3 + 2],
        )
    };

    let material = match m.material_id {
        Some(id) => Some(materials.get(id).ok_or_else(|| {
            LiftoffError::ObjLoadError(format!(
                "{}: mesh '{}' references material {} but only {} are defined",
                path.display(),
                model.name,
                id,
                materials.len()
            ))
        })?),
        None => None,
    };
    let (color, shininess) = match material {
        Some(mat) => (
            mat.diffuse.map(Vec3::from_array).unwrap_or(DEFAULT_DIFFUSE),
            mat.shininess.unwrap_or(DEFAULT_SHININESS),
        ),
        None => (DEFAULT_DIFFUSE, DEFAULT_SHININESS),
    };

    if textured && m.texcoords.is_empty() {
        return Err(LiftoffError::ObjLoadError(format!(
            "{}: mesh '{}' has a diffuse texture but no texture coordinates",
            path.display(),
            model.name
        )));
    }

    let mut sub = if textured {
        // Mode already fixed by the caller; clone the path to satisfy append
        MeshData::new_textured(mesh.texture_path().unwrap_or_default())
    } else {
        MeshData::new_colored()
    };

    for tri in m.indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let pa = vertex(a);
        let pb = vertex(b);
        let pc = vertex(c);

        // Fall back to a flat face normal when the OBJ carries none
        let flat = (pb - pa).cross(&(pc - pa)).normalized();
        let normal = |i: usize| {
            if m.normals.is_empty() {
                flat
            } else {
                Vec3::new(m.normals[i * 3], m.normals[i * 3 + 1], m.normals[i * 3 + 2])
            }
        };

        for (idx, pos) in [(a, pa), (b, pb), (c, pc)] {
            sub.positions.push(pos);
            sub.normals.push(normal(idx));
            match &mut sub.attributes {
                crate::mesh::VertexAttributes::Colored {
                    colors,
                    shininess: shine,
                } => {
                    colors.push(color);
                    shine.push(shininess);
                }
                crate::mesh::VertexAttributes::Textured { texcoords, .. } => {
                    texcoords.push(Vec2::new(m.texcoords[idx * 2], m.texcoords[idx * 2 + 1]));
                }
            }
        }
    }

    mesh.append(&sub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::VertexAttributes;
    use std::fs;

    fn write_fixture(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("liftoff-obj-tests");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn quad_face_triangulates_to_six_vertices() {
        let path = write_fixture(
            "quad.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        );

        let mesh = load_obj(&path).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert!(!mesh.is_textured());
        // No normals in the file, so both triangles get the flat +Z normal
        for n in &mesh.normals {
            assert!((n.z - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn material_diffuse_becomes_vertex_color() {
        write_fixture(
            "red.mtl",
            "newmtl red\nKd 1.0 0.0 0.0\nNs 42.0\n",
        );
        let path = write_fixture(
            "red.obj",
            "mtllib red.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl red\nf 1 2 3\n",
        );

        let mesh = load_obj(&path).unwrap();
        match &mesh.attributes {
            VertexAttributes::Colored { colors, shininess } => {
                assert!((colors[0].x - 1.0).abs() < 1e-5);
                assert!(colors[0].y.abs() < 1e-5);
                assert!((shininess[0] - 42.0).abs() < 1e-5);
            }
            _ => panic!("expected colored mesh"),
        }
    }

    #[test]
    fn diffuse_texture_selects_textured_mode() {
        write_fixture(
            "tex.mtl",
            "newmtl painted\nKd 1.0 1.0 1.0\nmap_Kd paint.png\n",
        );
        let path = write_fixture(
            "tex.obj",
            "mtllib tex.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nusemtl painted\nf 1/1 2/2 3/3\n",
        );

        let mesh = load_obj(&path).unwrap();
        assert!(mesh.is_textured());
        let tex = mesh.texture_path().unwrap();
        assert!(tex.ends_with("paint.png"));

        match &mesh.attributes {
            VertexAttributes::Textured { texcoords, .. } => {
                assert_eq!(texcoords.len(), 3);
            }
            _ => panic!("expected textured mesh"),
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("liftoff-obj-tests/does-not-exist.obj");
        assert!(load_obj(&path).is_err());
    }
}
