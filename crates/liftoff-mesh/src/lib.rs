//! Liftoff Mesh - CPU-side geometry
//!
//! Everything that produces or holds vertex data before GPU upload:
//! - `MeshData` / `VertexAttributes` - Mode-tagged flat triangle lists
//! - `solids` - Procedural cylinder/cone/cuboid/fin builders
//! - `vehicle` - The assembled launch vehicle with named sub-ranges
//! - `obj` - Wavefront OBJ import

mod mesh;
pub mod obj;
pub mod solids;
pub mod vehicle;

pub use mesh::{MeshData, SubRange, VertexAttributes};
pub use solids::SolidMaterial;
pub use vehicle::{build_vehicle, VehicleMesh};
