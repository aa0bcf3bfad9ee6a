use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const REPULSION_RANGE: RangeInclusive<f32> = 0.0..=10_000.0;
pub const ATTRACTION_RANGE: RangeInclusive<f32> = 0.0..=0.5;
pub const CENTER_FORCE_RANGE: RangeInclusive<f32> = 0.0..=0.05;
pub const LINK_LENGTH_RANGE: RangeInclusive<f32> = 20.0..=400.0;

/// Tunable force parameters. Every float is kept non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
    pub repulsion_strength: f32,
    /// Spring stiffness, as a fraction of the length error per step.
    pub attraction_strength: f32,
    pub center_force_strength: f32,
    pub target_link_length: f32,
    /// Adds a coarse quadtree-approximated push from nodes beyond the local
    /// repulsion radius, so far apart components still keep their distance.
    pub long_range_repulsion: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            repulsion_strength: 2_000.0,
            attraction_strength: 0.05,
            center_force_strength: 0.002,
            target_link_length: 120.0,
            long_range_repulsion: false,
        }
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

impl SimulationConfig {
    pub fn sanitized(self) -> Self {
        Self {
            repulsion_strength: non_negative(self.repulsion_strength),
            attraction_strength: non_negative(self.attraction_strength),
            center_force_strength: non_negative(self.center_force_strength),
            target_link_length: non_negative(self.target_link_length),
            long_range_repulsion: self.long_range_repulsion,
        }
    }

    pub fn set_repulsion_strength(&mut self, value: f32) {
        self.repulsion_strength = non_negative(value);
    }

    pub fn set_attraction_strength(&mut self, value: f32) {
        self.attraction_strength = non_negative(value);
    }

    pub fn set_center_force_strength(&mut self, value: f32) {
        self.center_force_strength = non_negative(value);
    }

    pub fn set_target_link_length(&mut self, value: f32) {
        self.target_link_length = non_negative(value);
    }
}

/// Reads a JSON config file, falling back to defaults for missing keys.
pub fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read simulation config {}", path.display()))?;
    let parsed: SimulationConfig = serde_json::from_str(&contents)
        .with_context(|| format!("invalid simulation config {}", path.display()))?;
    Ok(parsed.sanitized())
}
