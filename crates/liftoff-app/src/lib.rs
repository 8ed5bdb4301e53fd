//! Liftoff App — interactive launch viewer
//!
//! This crate provides the `LiftoffApp` application handler that ties the
//! simulation and renderer together under a winit event loop with an egui
//! control overlay.

mod app;
pub mod config;
pub mod input;
pub mod scene;
pub mod ui;

pub use app::LiftoffApp;
pub use config::AppConfig;
