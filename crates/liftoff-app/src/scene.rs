//! Scene setup
//!
//! Builds the vehicle mesh and loads the terrain and landing pad OBJ files,
//! substituting procedural stand-ins when the assets are missing so the app
//! always starts with a complete scene.

use anyhow::Result;
use liftoff_core::{Mat44, Vec3};
use liftoff_mesh::obj::load_obj;
use liftoff_mesh::solids::{self, SolidMaterial};
use liftoff_mesh::vehicle::{BODY_RADIUS, BULB_HALF_EXTENT, BULB_RING_HEIGHT};
use liftoff_mesh::{build_vehicle, MeshData};
use liftoff_render::{PointLight, RenderContext, SceneRenderer};
use std::path::Path;

const GROUND_HALF_EXTENT: f32 = 140.0;
const GROUND_COLOR: Vec3 = Vec3::new(0.32, 0.36, 0.3);
const PAD_RADIUS: f32 = 6.0;
const PAD_HEIGHT: f32 = 0.4;
const PAD_COLOR: Vec3 = Vec3::new(0.45, 0.45, 0.48);

/// Warm glow matching the bulb material's emissive term
const BULB_LIGHT_COLOR: Vec3 = Vec3::new(2.2, 0.85, 0.12);

/// Object indices handed back to the frame loop
pub struct SceneHandles {
    pub vehicle: usize,
}

/// Build and upload every scene object. The vehicle sits on the pad at the
/// origin; terrain and pad come from OBJ files under `asset_dir` when
/// present.
pub fn populate(
    renderer: &mut SceneRenderer,
    context: &RenderContext,
    asset_dir: &Path,
) -> Result<SceneHandles> {
    let terrain = load_or_fallback(asset_dir, "terrain.obj", fallback_ground);
    renderer.add_mesh(context, "terrain", &terrain, Mat44::IDENTITY)?;

    let pad = load_or_fallback(asset_dir, "landing_pad.obj", fallback_pad);
    renderer.add_mesh(context, "landing_pad", &pad, Mat44::IDENTITY)?;

    let vehicle_mesh = build_vehicle()?;
    log::info!(
        "Vehicle mesh: {} vertices in 5 parts",
        vehicle_mesh.mesh.vertex_count()
    );
    let vehicle = renderer.add_mesh(context, "vehicle", &vehicle_mesh.mesh, Mat44::IDENTITY)?;

    Ok(SceneHandles { vehicle })
}

fn load_or_fallback(asset_dir: &Path, file: &str, fallback: fn() -> MeshData) -> MeshData {
    let path = asset_dir.join(file);
    match load_obj(&path) {
        Ok(mesh) => {
            log::info!("Loaded {} ({} vertices)", path.display(), mesh.vertex_count());
            mesh
        }
        Err(e) => {
            log::warn!("{}: {}, using procedural fallback", path.display(), e);
            fallback()
        }
    }
}

/// Flat slab just below y=0
fn fallback_ground() -> MeshData {
    solids::cuboid(
        Vec3::new(GROUND_HALF_EXTENT, 0.1, GROUND_HALF_EXTENT),
        GROUND_COLOR,
        &Mat44::translation(Vec3::new(0.0, -0.1, 0.0)),
        &SolidMaterial::MATTE,
    )
}

/// Squat disk centered under the vehicle
fn fallback_pad() -> MeshData {
    solids::cylinder(
        32,
        true,
        PAD_COLOR,
        &Mat44::translation(Vec3::new(0.0, PAD_HEIGHT / 2.0, 0.0)).mul(&Mat44::scaling(
            Vec3::new(PAD_RADIUS, PAD_HEIGHT, PAD_RADIUS),
        )),
        &SolidMaterial::MATTE,
    )
}

/// Point lights riding the vehicle's signal bulb ring, in world space
pub fn bulb_lights(model: &Mat44) -> [PointLight; 3] {
    let local = Vec3::new(
        BODY_RADIUS + BULB_HALF_EXTENT * 0.5,
        BULB_RING_HEIGHT,
        0.0,
    );

    // Bulbs sit at 60/180/300 degrees around the hull
    let mut lights = [PointLight {
        position: Vec3::ZERO,
        color: BULB_LIGHT_COLOR,
        enabled: true,
    }; 3];
    for (i, light) in lights.iter_mut().enumerate() {
        let angle = std::f32::consts::FRAC_PI_3 * (1 + 2 * i as u32) as f32;
        let ring = Mat44::rotation_y(angle).transform_point(local);
        light.position = model.transform_point(ring);
    }
    lights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_ground_stays_below_zero() {
        let ground = fallback_ground();
        assert!(ground.positions.iter().all(|p| p.y <= 1e-5));
    }

    #[test]
    fn fallback_pad_is_flush_with_the_ground() {
        let pad = fallback_pad();
        let min_y = pad.positions.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        let max_y = pad.positions.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        assert!(min_y.abs() < 1e-5);
        assert!((max_y - PAD_HEIGHT).abs() < 1e-5);
    }

    #[test]
    fn bulb_lights_follow_the_model_matrix() {
        let identity = bulb_lights(&Mat44::IDENTITY);
        let lifted = bulb_lights(&Mat44::translation(Vec3::new(0.0, 10.0, 0.0)));

        for (a, b) in identity.iter().zip(lifted.iter()) {
            assert!((b.position.y - a.position.y - 10.0).abs() < 1e-5);
        }

        // All three sit on the bulb ring radius
        let r = BODY_RADIUS + BULB_HALF_EXTENT * 0.5;
        for light in &identity {
            let horizontal = Vec3::new(light.position.x, 0.0, light.position.z).length();
            assert!((horizontal - r).abs() < 1e-4);
            assert!((light.position.y - BULB_RING_HEIGHT).abs() < 1e-5);
        }
    }
}
