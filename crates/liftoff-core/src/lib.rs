//! Liftoff Core - Foundational types for the liftoff scene renderer
//!
//! This crate provides what every other liftoff crate depends on:
//! - `Vec2`, `Vec3`, `Vec4` - Vector value types
//! - `Mat33`, `Mat44` - Row-major matrices and transform constructors
//! - Error types and Result alias

mod error;
mod math;

pub use error::{LiftoffError, Result};
pub use math::{Mat33, Mat44, Vec2, Vec3, Vec4};
