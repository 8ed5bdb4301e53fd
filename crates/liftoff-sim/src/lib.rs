//! Liftoff Sim - Frame-synchronous simulation
//!
//! Single-threaded, stepped once per rendered frame:
//! - `flight` - Bezier ascent path, animation state, vehicle pose
//! - `camera` - Free/Chase/Ground camera rig
//! - `plume` - Fixed-capacity exhaust particle pool
//! - `world` - Owns all of the above with one `step(dt)` entry point

pub mod camera;
mod clock;
pub mod flight;
pub mod plume;
mod rand;
pub mod world;

pub use camera::{CameraMode, CameraRig, MoveIntents};
pub use clock::FrameClock;
pub use flight::{FlightPath, VehicleAnimation, VehiclePose, FLIGHT_DURATION};
pub use plume::{ExhaustPlume, Particle, PLUME_CAPACITY};
pub use world::World;
