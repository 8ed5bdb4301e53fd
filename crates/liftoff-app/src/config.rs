//! Application configuration
//!
//! Loaded from `liftoff.toml` next to the binary. A missing file is not an
//! error; every field falls back to its default, so a partial file only needs
//! to name the keys it overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_width: u32,
    pub window_height: u32,
    /// Directory searched for the terrain and landing pad OBJ files
    pub asset_dir: String,
    /// Exhaust particles spawned per second while the engine fires
    pub emission_rate: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: 1600,
            window_height: 900,
            asset_dir: "assets".to_string(),
            emission_rate: 9_000.0,
        }
    }
}

impl AppConfig {
    /// Read the config file, or fall back to defaults when it is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }
}
