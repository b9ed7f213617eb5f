use serde::{Deserialize, Serialize};
use crate::vecmath::Vector2;

/// Simulation parameters derived from the configuration, used frequently during simulation steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimParams {
    // World
    pub world_width: f64,
    pub world_height: f64,

    // Physics
    pub gravitational_constant: f64,

    // Time
    pub time_step: u64, // Current simulation step number
}

impl SimParams {
    /// Lower-right corner of the world rectangle; the upper-left corner is the origin.
    pub fn bounds(&self) -> Vector2 {
        Vector2::new(self.world_width, self.world_height)
    }
}
