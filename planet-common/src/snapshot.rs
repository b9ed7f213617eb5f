use serde::{Serialize, Deserialize};
use crate::vecmath::Vector2;

/// State of a single body at snapshot time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub mass: f64,
    pub radius: f64,
    pub position: (f64, f64),
    pub velocity: (f64, f64),
    pub fixed: bool,
    /// Ids of the bodies this one is currently in contact with, sorted.
    pub colliding_with: Vec<u32>,
}

/// A snapshot of the simulation state and metrics at a specific step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// The step number at which the snapshot was taken (0 = initial conditions).
    pub step: u64,
    /// Mass-weighted mean position of all bodies.
    pub center_of_mass: (f64, f64),
    /// Sum of m * v over all bodies.
    pub total_momentum: (f64, f64),
    /// Sum of m * |v|^2 / 2 over all bodies.
    pub kinetic_energy: f64,
    /// Number of distinct body pairs currently in contact.
    pub contact_pairs: u32,
    pub bodies: Vec<BodySnapshot>,
}

impl Snapshot {
    /// Position of a body by id, if present in this snapshot.
    pub fn position_of(&self, id: u32) -> Option<Vector2> {
        self.bodies
            .iter()
            .find(|b| b.id == id)
            .map(|b| Vector2::new(b.position.0, b.position.1))
    }
}
