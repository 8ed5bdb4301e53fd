//! Procedural solid primitives
//!
//! Each builder emits a flat-shaded, counter-clockwise triangle list in local
//! primitive space, with every vertex pre-multiplied by the caller's transform
//! before emission. Normals are recomputed from the transformed triangle edges
//! so non-uniform scales in the pre-transform stay correct.
//!
//! Local conventions: cylinders span y in [-0.5, 0.5] with radius 1; cones
//! have their base ring at y=0 (radius 1) and apex at y=1; fins are a right
//! triangle with unit legs along +X and +Y, extruded over z in [-0.5, 0.5].

use crate::mesh::MeshData;
use liftoff_core::{Mat44, Vec3};

/// Minimum circle subdivision. Lower requests are clamped here.
pub const MIN_SEGMENTS: u32 = 3;

/// Surface response parameters shared by all vertices of one solid
#[derive(Clone, Copy, Debug)]
pub struct SolidMaterial {
    pub shininess: f32,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub emissive: Vec3,
    pub specular: Vec3,
}

impl SolidMaterial {
    pub const MATTE: Self = Self {
        shininess: 8.0,
        ambient: Vec3::new(0.2, 0.2, 0.2),
        diffuse: Vec3::ONE,
        emissive: Vec3::ZERO,
        specular: Vec3::new(0.1, 0.1, 0.1),
    };

    pub const POLISHED: Self = Self {
        shininess: 64.0,
        ambient: Vec3::new(0.15, 0.15, 0.15),
        diffuse: Vec3::ONE,
        emissive: Vec3::ZERO,
        specular: Vec3::new(0.9, 0.9, 0.9),
    };

    /// Resolve the base vertex color against this material's reflectances.
    /// Emissive terms add on top so signal lights stay visible unlit.
    fn bake(&self, color: Vec3) -> Vec3 {
        let lit = color.mul_component(&self.diffuse) + self.ambient.mul_component(&color) * 0.25;
        let out = lit + self.emissive;
        Vec3::new(out.x.min(1.0), out.y.min(1.0), out.z.min(1.0))
    }
}

/// Accumulates transformed, flat-shaded triangles into a colored mesh
struct SolidBuilder<'a> {
    mesh: MeshData,
    transform: &'a Mat44,
    color: Vec3,
    shininess: f32,
}

impl<'a> SolidBuilder<'a> {
    fn new(transform: &'a Mat44, color: Vec3, material: &SolidMaterial) -> Self {
        Self {
            mesh: MeshData::new_colored(),
            transform,
            color: material.bake(color),
            shininess: material.shininess,
        }
    }

    /// Emit one triangle. Vertices are local-space, counter-clockwise as seen
    /// from outside; the shared face normal comes from the transformed edges.
    fn triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let a = self.transform.transform_point(a);
        let b = self.transform.transform_point(b);
        let c = self.transform.transform_point(c);
        let normal = (b - a).cross(&(c - a)).normalized();

        for p in [a, b, c] {
            self.mesh
                .push_colored_vertex(p, normal, self.color, self.shininess);
        }
    }

    fn quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
        self.triangle(a, b, c);
        self.triangle(a, c, d);
    }

    fn finish(self) -> MeshData {
        self.mesh
    }
}

fn ring_point(angle: f32, y: f32) -> Vec3 {
    Vec3::new(angle.cos(), y, angle.sin())
}

fn segment_angles(segments: u32, i: u32) -> (f32, f32) {
    let step = std::f32::consts::TAU / segments as f32;
    (i as f32 * step, (i + 1) as f32 * step)
}

/// Unit cylinder: radius 1, y in [-0.5, 0.5], N side quads, optional cap fans.
pub fn cylinder(
    segments: u32,
    capped: bool,
    color: Vec3,
    transform: &Mat44,
    material: &SolidMaterial,
) -> MeshData {
    let segments = segments.max(MIN_SEGMENTS);
    let mut builder = SolidBuilder::new(transform, color, material);
    let (y0, y1) = (-0.5, 0.5);

    for i in 0..segments {
        let (a0, a1) = segment_angles(segments, i);
        let bottom0 = ring_point(a0, y0);
        let bottom1 = ring_point(a1, y0);
        let top0 = ring_point(a0, y1);
        let top1 = ring_point(a1, y1);

        builder.quad(bottom0, top0, top1, bottom1);

        if capped {
            builder.triangle(Vec3::new(0.0, y1, 0.0), top1, top0);
            builder.triangle(Vec3::new(0.0, y0, 0.0), bottom0, bottom1);
        }
    }

    builder.finish()
}

/// Unit cone: base ring (radius 1) at y=0, apex at y=1, optional base fan.
pub fn cone(
    segments: u32,
    capped: bool,
    color: Vec3,
    transform: &Mat44,
    material: &SolidMaterial,
) -> MeshData {
    let segments = segments.max(MIN_SEGMENTS);
    let mut builder = SolidBuilder::new(transform, color, material);
    let apex = Vec3::new(0.0, 1.0, 0.0);

    for i in 0..segments {
        let (a0, a1) = segment_angles(segments, i);
        let base0 = ring_point(a0, 0.0);
        let base1 = ring_point(a1, 0.0);

        builder.triangle(apex, base1, base0);

        if capped {
            builder.triangle(Vec3::ZERO, base0, base1);
        }
    }

    builder.finish()
}

/// Axis-aligned box around the origin with the given half-extents
pub fn cuboid(
    half_extents: Vec3,
    color: Vec3,
    transform: &Mat44,
    material: &SolidMaterial,
) -> MeshData {
    let mut builder = SolidBuilder::new(transform, color, material);
    let Vec3 { x: hx, y: hy, z: hz } = half_extents;

    let corners = [
        Vec3::new(-hx, -hy, -hz), // 0
        Vec3::new(hx, -hy, -hz),  // 1
        Vec3::new(hx, hy, -hz),   // 2
        Vec3::new(-hx, hy, -hz),  // 3
        Vec3::new(-hx, -hy, hz),  // 4
        Vec3::new(hx, -hy, hz),   // 5
        Vec3::new(hx, hy, hz),    // 6
        Vec3::new(-hx, hy, hz),   // 7
    ];

    // One quad per face, wound CCW from outside
    let faces: [[usize; 4]; 6] = [
        [0, 3, 2, 1], // back (z-)
        [4, 5, 6, 7], // front (z+)
        [0, 4, 7, 3], // left (x-)
        [5, 1, 2, 6], // right (x+)
        [0, 1, 5, 4], // bottom (y-)
        [3, 7, 6, 2], // top (y+)
    ];

    for face in faces {
        builder.quad(
            corners[face[0]],
            corners[face[1]],
            corners[face[2]],
            corners[face[3]],
        );
    }

    builder.finish()
}

/// Right-triangle prism for stabilizer fins: unit legs along +X and +Y,
/// thickness 1 along Z.
pub fn fin(color: Vec3, transform: &Mat44, material: &SolidMaterial) -> MeshData {
    let mut builder = SolidBuilder::new(transform, color, material);

    let a_back = Vec3::new(0.0, 0.0, -0.5);
    let b_back = Vec3::new(1.0, 0.0, -0.5);
    let c_back = Vec3::new(0.0, 1.0, -0.5);
    let a_front = Vec3::new(0.0, 0.0, 0.5);
    let b_front = Vec3::new(1.0, 0.0, 0.5);
    let c_front = Vec3::new(0.0, 1.0, 0.5);

    // Triangular end faces
    builder.triangle(a_front, b_front, c_front);
    builder.triangle(a_back, c_back, b_back);

    // Bottom (y=0), inner (x=0), and hypotenuse walls
    builder.quad(a_back, b_back, b_front, a_front);
    builder.quad(a_back, a_front, c_front, c_back);
    builder.quad(b_front, b_back, c_back, c_front);

    builder.finish()
}
