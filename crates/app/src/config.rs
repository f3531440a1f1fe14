//! Settings and stroke script loading

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use carving::PointerEvent;
use chisel_config::ChiselConfig;

/// Read settings from a JSON file, or use the defaults.
///
/// Missing fields fall back to their defaults.
pub fn load_config(path: Option<&Path>) -> Result<ChiselConfig> {
    let Some(path) = path else {
        return Ok(ChiselConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: ChiselConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config
        .carve
        .validate()
        .with_context(|| format!("invalid carve settings in {}", path.display()))?;
    Ok(config)
}

/// Read a recorded pointer script
pub fn load_script(path: &Path) -> Result<Vec<PointerEvent>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading stroke script {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing stroke script {}", path.display()))
}
