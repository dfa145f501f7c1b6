//! Simulation configuration.

use std::path::Path;

use serde::Deserialize;

/// Switches and tunables for the container-block simulation, loaded from the
/// host's TOML configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub enable_furnace: bool,
    pub enable_blast_furnace: bool,
    pub enable_smoker: bool,
    pub enable_hopper: bool,
    pub enable_block_resync: bool,
    /// How many smeltable-table entries recipe lookup considers, counted from
    /// the front of the table. `0` (the default) scans the whole table.
    pub recipe_scan_limit: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            enable_furnace: true,
            enable_blast_furnace: true,
            enable_smoker: true,
            enable_hopper: true,
            enable_block_resync: true,
            recipe_scan_limit: 0,
        }
    }
}

impl SimConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
