//! Procedural vehicle assembly
//!
//! Builds the whole launch vehicle as one colored triangle list by placing
//! primitive solids with baked pre-transforms: a cylindrical body, an exhaust
//! cone under it, three stabilizer fins and three signal bulbs at 120 degree
//! spacing, and a top assembly (neck, nose dome, antenna mast, tip). The
//! vehicle is authored nose-up along +Y with the engine joint at y=0; flight
//! code re-orients the whole mesh with a single model matrix per frame.

use crate::mesh::{MeshData, SubRange};
use crate::solids::{self, SolidMaterial};
use liftoff_core::{Mat44, Result, Vec3};

pub const BODY_RADIUS: f32 = 1.0;
pub const BODY_HEIGHT: f32 = 6.0;
pub const BODY_SEGMENTS: u32 = 24;

pub const ENGINE_RADIUS: f32 = 0.7;
pub const ENGINE_HEIGHT: f32 = 1.2;
pub const ENGINE_SEGMENTS: u32 = 18;

pub const FIN_LENGTH: f32 = 1.4;
pub const FIN_HEIGHT: f32 = 2.0;
pub const FIN_THICKNESS: f32 = 0.12;

pub const BULB_HALF_EXTENT: f32 = 0.1;
pub const BULB_RING_HEIGHT: f32 = 4.8;

pub const NECK_RADIUS: f32 = 0.55;
pub const NECK_HEIGHT: f32 = 0.6;
pub const DOME_RADIUS: f32 = 0.85;
pub const DOME_HEIGHT: f32 = 1.6;
pub const ANTENNA_RADIUS: f32 = 0.04;
pub const ANTENNA_HEIGHT: f32 = 0.9;
pub const TIP_RADIUS: f32 = 0.09;
pub const TIP_HEIGHT: f32 = 0.22;

const HULL_COLOR: Vec3 = Vec3::new(0.92, 0.93, 0.95);
const ENGINE_COLOR: Vec3 = Vec3::new(0.25, 0.26, 0.28);
const FIN_COLOR: Vec3 = Vec3::new(0.82, 0.12, 0.1);
const BULB_COLOR: Vec3 = Vec3::new(0.3, 0.08, 0.02);
const TOP_COLOR: Vec3 = Vec3::new(0.75, 0.78, 0.82);

const BULB_MATERIAL: SolidMaterial = SolidMaterial {
    shininess: 16.0,
    ambient: Vec3::new(0.1, 0.1, 0.1),
    diffuse: Vec3::ONE,
    emissive: Vec3::new(0.9, 0.35, 0.05),
    specular: Vec3::new(0.4, 0.4, 0.4),
};

/// The assembled vehicle plus per-part vertex ranges for partial draws
#[derive(Clone, Debug)]
pub struct VehicleMesh {
    pub mesh: MeshData,
    pub body: SubRange,
    pub engine: SubRange,
    pub fins: SubRange,
    pub bulbs: SubRange,
    pub top: SubRange,
}

struct VehicleBuilder {
    mesh: MeshData,
}

impl VehicleBuilder {
    fn new() -> Self {
        Self {
            mesh: MeshData::new_colored(),
        }
    }

    /// Append `parts` and return the sub-range they occupy
    fn part(&mut self, parts: &[MeshData]) -> Result<SubRange> {
        let start = self.mesh.vertex_count() as u32;
        for p in parts {
            self.mesh.append(p)?;
        }
        Ok(SubRange {
            start,
            count: self.mesh.vertex_count() as u32 - start,
        })
    }
}

/// Non-uniform scale composed under a translation, the common part placement
fn place(offset: Vec3, scale: Vec3) -> Mat44 {
    Mat44::translation(offset).mul(&Mat44::scaling(scale))
}

/// Build the vehicle mesh. Invoked once at startup; the result is static.
pub fn build_vehicle() -> Result<VehicleMesh> {
    let mut builder = VehicleBuilder::new();

    let body = builder.part(&[solids::cylinder(
        BODY_SEGMENTS,
        true,
        HULL_COLOR,
        &place(
            Vec3::new(0.0, BODY_HEIGHT / 2.0, 0.0),
            Vec3::new(BODY_RADIUS, BODY_HEIGHT, BODY_RADIUS),
        ),
        &SolidMaterial::POLISHED,
    )])?;

    // Exhaust bell: base ring down at -ENGINE_HEIGHT, apex at the body joint
    let engine = builder.part(&[solids::cone(
        ENGINE_SEGMENTS,
        false,
        ENGINE_COLOR,
        &place(
            Vec3::new(0.0, -ENGINE_HEIGHT, 0.0),
            Vec3::new(ENGINE_RADIUS, ENGINE_HEIGHT, ENGINE_RADIUS),
        ),
        &SolidMaterial::MATTE,
    )])?;

    let fins = builder.part(&three_fold(|rotation| {
        solids::fin(
            FIN_COLOR,
            &rotation
                .mul(&Mat44::translation(Vec3::new(BODY_RADIUS * 0.95, 0.0, 0.0)))
                .mul(&Mat44::scaling(Vec3::new(
                    FIN_LENGTH,
                    FIN_HEIGHT,
                    FIN_THICKNESS,
                ))),
            &SolidMaterial::MATTE,
        )
    }))?;

    // Bulbs sit between the fins, offset 60 degrees
    let bulb_offset = Mat44::rotation_y(std::f32::consts::FRAC_PI_3);
    let bulbs = builder.part(&three_fold(|rotation| {
        solids::cuboid(
            Vec3::new(BULB_HALF_EXTENT, BULB_HALF_EXTENT, BULB_HALF_EXTENT),
            BULB_COLOR,
            &bulb_offset.mul(&rotation).mul(&Mat44::translation(Vec3::new(
                BODY_RADIUS + BULB_HALF_EXTENT * 0.5,
                BULB_RING_HEIGHT,
                0.0,
            ))),
            &BULB_MATERIAL,
        )
    }))?;

    let neck_base = BODY_HEIGHT;
    let dome_base = neck_base + NECK_HEIGHT;
    let antenna_base = dome_base + DOME_HEIGHT;
    let tip_base = antenna_base + ANTENNA_HEIGHT;

    let top = builder.part(&[
        solids::cylinder(
            BODY_SEGMENTS,
            true,
            TOP_COLOR,
            &place(
                Vec3::new(0.0, neck_base + NECK_HEIGHT / 2.0, 0.0),
                Vec3::new(NECK_RADIUS, NECK_HEIGHT, NECK_RADIUS),
            ),
            &SolidMaterial::POLISHED,
        ),
        solids::cone(
            BODY_SEGMENTS,
            false,
            TOP_COLOR,
            &place(
                Vec3::new(0.0, dome_base, 0.0),
                Vec3::new(DOME_RADIUS, DOME_HEIGHT, DOME_RADIUS),
            ),
            &SolidMaterial::POLISHED,
        ),
        solids::cylinder(
            8,
            true,
            ENGINE_COLOR,
            &place(
                Vec3::new(0.0, antenna_base + ANTENNA_HEIGHT / 2.0, 0.0),
                Vec3::new(ANTENNA_RADIUS, ANTENNA_HEIGHT, ANTENNA_RADIUS),
            ),
            &SolidMaterial::MATTE,
        ),
        solids::cone(
            8,
            false,
            FIN_COLOR,
            &place(
                Vec3::new(0.0, tip_base, 0.0),
                Vec3::new(TIP_RADIUS, TIP_HEIGHT, TIP_RADIUS),
            ),
            &SolidMaterial::MATTE,
        ),
    ])?;

    Ok(VehicleMesh {
        mesh: builder.mesh,
        body,
        engine,
        fins,
        bulbs,
        top,
    })
}

/// Instantiate a part at 0, 120, and 240 degrees around the vehicle axis
fn three_fold(build: impl Fn(Mat44) -> MeshData) -> Vec<MeshData> {
    (0..3)
        .map(|k| {
            let angle = k as f32 * std::f32::consts::TAU / 3.0;
            build(Mat44::rotation_y(angle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_ranges_tile_the_buffer() {
        let vehicle = build_vehicle().unwrap();
        let ranges = [
            vehicle.body,
            vehicle.engine,
            vehicle.fins,
            vehicle.bulbs,
            vehicle.top,
        ];

        assert_eq!(ranges[0].start, 0);
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start);
        }
        assert_eq!(
            ranges[4].end() as usize,
            vehicle.mesh.vertex_count()
        );
        assert!(vehicle.mesh.validate().is_ok());
    }

    #[test]
    fn fins_and_bulbs_are_three_fold() {
        let vehicle = build_vehicle().unwrap();
        assert_eq!(vehicle.fins.count % 3, 0);
        assert_eq!(vehicle.bulbs.count % 3, 0);
        // One bulb is a 12-triangle box
        assert_eq!(vehicle.bulbs.count, 3 * 36);
    }

    #[test]
    fn body_triangle_count_matches_subdivision() {
        let vehicle = build_vehicle().unwrap();
        // Capped cylinder: 2N side triangles + 2N cap triangles
        assert_eq!(vehicle.body.count, BODY_SEGMENTS * 4 * 3);
    }

    #[test]
    fn vehicle_stays_untextured() {
        let vehicle = build_vehicle().unwrap();
        assert!(!vehicle.mesh.is_textured());
    }

    #[test]
    fn engine_hangs_below_the_body_joint() {
        let vehicle = build_vehicle().unwrap();
        let engine_min_y = (vehicle.engine.start..vehicle.engine.end())
            .map(|i| vehicle.mesh.positions[i as usize].y)
            .fold(f32::INFINITY, f32::min);
        assert!((engine_min_y + ENGINE_HEIGHT).abs() < 1e-4);
    }

    #[test]
    fn tip_is_the_highest_point() {
        let vehicle = build_vehicle().unwrap();
        let max_y = vehicle
            .mesh
            .positions
            .iter()
            .fold(f32::NEG_INFINITY, |acc, p| acc.max(p.y));
        let expected = BODY_HEIGHT + NECK_HEIGHT + DOME_HEIGHT + ANTENNA_HEIGHT + TIP_HEIGHT;
        assert!((max_y - expected).abs() < 1e-4);
    }
}
