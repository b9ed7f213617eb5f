use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::sim_params::SimParams;
use crate::vecmath::Vector2;
use std::path::Path;

// Configuration for the world rectangle [0, width] x [0, height]
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UniverseConfig {
    pub width: f64,
    pub height: f64,
}

// Physical constants
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PhysicsConfig {
    #[serde(default = "default_gravitational_constant")]
    pub gravitational_constant: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravitational_constant: default_gravitational_constant(),
        }
    }
}

// Configuration for the run length and recording cadence
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    pub total_steps: u64,
    #[serde(default = "default_record_interval_steps")]
    pub record_interval_steps: u64,
}

/// One body slot, as entered on the setup form.
/// Disabled slots keep their position in the list but are left out of the simulation.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BodyConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub name: Option<String>,
    pub mass: f64,
    pub radius: f64,
    pub position: [f64; 2],
    #[serde(default)]
    pub velocity: [f64; 2],
    #[serde(default)]
    pub fixed: bool,
}

impl BodyConfig {
    pub fn initial_position(&self) -> Vector2 {
        Vector2::from(self.position)
    }

    pub fn initial_velocity(&self) -> Vector2 {
        Vector2::from(self.velocity)
    }
}

// Configuration for output settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    pub save_positions: bool,
    pub save_stats: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            base_filename: String::from("planets"),
            save_positions: false,
            save_stats: false,
            format: None,
        }
    }
}

fn default_gravitational_constant() -> f64 {
    10.0
}

fn default_record_interval_steps() -> u64 {
    1
}

fn default_enabled() -> bool {
    true
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    pub universe: UniverseConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    pub timing: TimingConfig,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// World-level checks. Per-body values are checked when the engine builds its bodies,
    /// so the offending slot can be reported.
    pub fn validate(&self) -> Result<()> {
        if !(self.universe.width > 0.0 && self.universe.width.is_finite())
            || !(self.universe.height > 0.0 && self.universe.height.is_finite())
        {
            anyhow::bail!(
                "universe dimensions must be positive and finite (got {} x {}).",
                self.universe.width,
                self.universe.height
            );
        }
        if !self.physics.gravitational_constant.is_finite() {
            anyhow::bail!("gravitational_constant must be finite.");
        }
        if self.timing.record_interval_steps == 0 {
            anyhow::bail!("record_interval_steps must be greater than 0.");
        }
        if !self.bodies.iter().any(|b| b.enabled) {
            anyhow::bail!("at least one enabled body is required.");
        }
        Ok(())
    }

    /// Converts the configuration into simulation parameters used at runtime.
    pub fn get_sim_params(&self) -> SimParams {
        SimParams {
            world_width: self.universe.width,
            world_height: self.universe.height,
            gravitational_constant: self.physics.gravitational_constant,
            time_step: 0,
        }
    }
}
