//! Top-level simulation state
//!
//! Owns every per-frame mutable piece (flight animation, camera rig, exhaust
//! plume) and advances them in a fixed order each frame: animation time,
//! vehicle pose, camera movement, emission, integration, compaction. Emission
//! and integration never interleave with the alive-slot scan, so slot reuse
//! within a frame is safe.

use crate::camera::CameraRig;
use crate::flight::{FlightPath, VehicleAnimation, VehiclePose};
use crate::plume::{ExhaustPlume, DEFAULT_EMISSION_RATE};
use liftoff_core::{Mat44, Vec3};

pub struct World {
    pub path: FlightPath,
    pub animation: VehicleAnimation,
    pub camera: CameraRig,
    pub plume: ExhaustPlume,
    /// Landing pad reference point; flight start and ground camera anchor
    pub pad_anchor: Vec3,
    pose: VehiclePose,
    prev_nozzle: Vec3,
}

impl World {
    pub fn new(pad_anchor: Vec3, camera_start: Vec3) -> Self {
        let path = FlightPath::ascent_from(pad_anchor);
        let pose = path.parked();
        Self {
            path,
            animation: VehicleAnimation::default(),
            camera: CameraRig::new(camera_start),
            plume: ExhaustPlume::new(DEFAULT_EMISSION_RATE),
            pad_anchor,
            pose,
            prev_nozzle: pose.position,
        }
    }

    pub fn pose(&self) -> &VehiclePose {
        &self.pose
    }

    /// Vehicle model matrix for the current frame
    pub fn vehicle_transform(&self) -> Mat44 {
        self.pose.model_matrix()
    }

    /// View matrix and camera world position for the current frame
    pub fn view(&self) -> (Mat44, Vec3) {
        self.camera
            .compute_view(self.pose.position, self.pose.forward, self.pad_anchor)
    }

    /// True while the engine is firing
    pub fn engine_on(&self) -> bool {
        self.animation.active && !self.animation.paused && !self.animation.is_complete()
    }

    /// Advance one frame
    pub fn step(&mut self, dt: f32) {
        self.animation.advance(dt);
        self.pose = self.path.sample(&self.animation);

        self.camera.update_free_movement(dt);

        let nozzle = self.pose.position;
        if self.engine_on() {
            self.plume.emit(
                dt,
                self.prev_nozzle,
                nozzle,
                self.pose.forward,
                self.pose.right,
                self.pose.up,
            );
        }
        self.prev_nozzle = nozzle;

        self.plume.integrate(dt);
        self.plume.compact();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parked_world_emits_nothing() {
        let mut world = World::new(Vec3::ZERO, Vec3::new(0.0, 5.0, 20.0));
        for _ in 0..10 {
            world.step(1.0 / 60.0);
        }
        assert_eq!(world.plume.alive_count(), 0);
    }

    #[test]
    fn launch_starts_emission_and_motion() {
        let mut world = World::new(Vec3::ZERO, Vec3::new(0.0, 5.0, 20.0));
        let parked_y = world.pose().position.y;

        world.animation.launch();
        for _ in 0..120 {
            world.step(1.0 / 60.0);
        }

        assert!(world.plume.alive_count() > 0);
        assert!(world.pose().position.y > parked_y);
    }

    #[test]
    fn pause_freezes_flight_time_and_emission() {
        let mut world = World::new(Vec3::ZERO, Vec3::ZERO);
        world.animation.launch();
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }

        world.animation.toggle_pause();
        let frozen = world.animation.elapsed;

        // Existing particles still age out while paused
        for _ in 0..200 {
            world.step(1.0 / 60.0);
        }
        assert_eq!(world.animation.elapsed, frozen);
        assert_eq!(world.plume.alive_count(), 0);
    }

    #[test]
    fn reset_returns_to_the_pad() {
        let mut world = World::new(Vec3::new(3.0, 0.0, -2.0), Vec3::ZERO);
        world.animation.launch();
        for _ in 0..60 {
            world.step(1.0 / 60.0);
        }

        world.animation.reset();
        world.step(1.0 / 60.0);
        assert_eq!(world.pose().position, world.path.points[0]);
    }

    #[test]
    fn completed_flight_stops_emitting() {
        let mut world = World::new(Vec3::ZERO, Vec3::ZERO);
        world.animation.launch();
        world.animation.elapsed = crate::flight::FLIGHT_DURATION + 1.0;
        world.step(1.0 / 60.0);
        assert!(!world.engine_on());
    }
}
