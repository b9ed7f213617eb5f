//! Newtonian gravity between bodies.
//!
//! Every body is pulled toward every other body with acceleration
//! `G * m_other / r^2`. Each body sums over all others on its own, so a step
//! costs O(N^2) and the pair symmetry is not exploited.

use crate::body::Body;
use crate::error::{EngineError, EngineResult};
use planet_common::Vector2;

/// Gravitational constant used when the configuration does not set one.
pub const DEFAULT_GRAVITATIONAL_CONSTANT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityModel {
    gravitational_constant: f64,
}

impl Default for GravityModel {
    fn default() -> Self {
        GravityModel::new(DEFAULT_GRAVITATIONAL_CONSTANT)
    }
}

impl GravityModel {
    pub fn new(gravitational_constant: f64) -> Self {
        GravityModel { gravitational_constant }
    }

    pub fn gravitational_constant(&self) -> f64 {
        self.gravitational_constant
    }

    /// Total gravitational acceleration on `target` from every other body in `bodies`.
    ///
    /// Fixed targets get the zero vector. `bodies` may include `target` itself; it is
    /// skipped by id. Coincident centres are reported as [`EngineError::DegenerateGeometry`].
    pub fn acceleration(&self, target: &Body, bodies: &[Body]) -> EngineResult<Vector2> {
        let mut accel = Vector2::zero();
        if target.fixed {
            return Ok(accel);
        }

        for other in bodies.iter().filter(|b| b.id != target.id) {
            let distance_vector = other.position - target.position;
            let direction = distance_vector.unit().ok_or(EngineError::DegenerateGeometry {
                a: target.id,
                b: other.id,
            })?;
            let magnitude =
                self.gravitational_constant * other.mass / distance_vector.magnitude_squared();
            accel += direction * magnitude;
        }

        log::trace!("Gravity on {}: {:?}", target.id, accel);
        Ok(accel)
    }
}
