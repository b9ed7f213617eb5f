use crate::error::{EngineError, EngineResult};
use planet_common::{BodyConfig, BodySnapshot, Vector2};
use std::collections::HashSet;
use std::fmt;

/// Stable identity of a body for the lifetime of a run.
/// Equal to the body's slot index in the configuration, so it is unique by construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A simulated planet.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub name: Option<String>,
    pub mass: f64,
    pub radius: f64,
    pub position: Vector2,
    pub velocity: Vector2,
    /// Fixed bodies pull and block others but never move themselves.
    pub fixed: bool,
    /// Partners currently in contact. Written only when a collision pass is committed.
    colliding_with: HashSet<BodyId>,
}

impl Body {
    /// Creates a body after checking its physical values.
    /// Errors report the id as the config slot.
    pub fn new(
        id: BodyId,
        mass: f64,
        radius: f64,
        position: Vector2,
        velocity: Vector2,
        fixed: bool,
    ) -> EngineResult<Self> {
        let slot = id.0 as usize;
        let invalid = |reason: String| EngineError::InvalidBodyConfig { slot, reason };

        if !(mass > 0.0 && mass.is_finite()) {
            return Err(invalid(format!("mass must be positive and finite, got {}", mass)));
        }
        if !(radius >= 0.0 && radius.is_finite()) {
            return Err(invalid(format!("radius must be non-negative and finite, got {}", radius)));
        }
        if !position.is_finite() {
            return Err(invalid(format!("position must be finite, got {:?}", position)));
        }
        if !velocity.is_finite() {
            return Err(invalid(format!("velocity must be finite, got {:?}", velocity)));
        }

        Ok(Body {
            id,
            name: None,
            mass,
            radius,
            position,
            velocity,
            fixed,
            colliding_with: HashSet::new(),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn momentum(&self) -> Vector2 {
        self.velocity.scale(self.mass)
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude_squared()
    }

    pub fn is_colliding_with(&self, other: BodyId) -> bool {
        self.colliding_with.contains(&other)
    }

    /// Contact partners in ascending id order.
    pub fn contacts(&self) -> Vec<BodyId> {
        let mut ids: Vec<BodyId> = self.colliding_with.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn mark_colliding(&mut self, other: BodyId) {
        self.colliding_with.insert(other);
    }

    pub(crate) fn clear_colliding(&mut self, other: BodyId) {
        self.colliding_with.remove(&other);
    }

    pub fn to_snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            id: self.id.0,
            name: self.name.clone(),
            mass: self.mass,
            radius: self.radius,
            position: self.position.into(),
            velocity: self.velocity.into(),
            fixed: self.fixed,
            colliding_with: self.contacts().into_iter().map(|id| id.0).collect(),
        }
    }
}

/// Builds the simulated body set from the configured slots.
/// Disabled slots are skipped entirely; enabled ones keep their slot index as id.
pub fn bodies_from_config(slots: &[BodyConfig]) -> EngineResult<Vec<Body>> {
    let mut bodies = Vec::with_capacity(slots.len());
    for (slot, cfg) in slots.iter().enumerate() {
        if !cfg.enabled {
            log::debug!("Skipping disabled body slot {}.", slot);
            continue;
        }
        let id = u32::try_from(slot).map_err(|_| EngineError::InvalidBodyConfig {
            slot,
            reason: String::from("too many body slots"),
        })?;
        let mut body = Body::new(
            BodyId(id),
            cfg.mass,
            cfg.radius,
            cfg.initial_position(),
            cfg.initial_velocity(),
            cfg.fixed,
        )?;
        body.name = cfg.name.clone();
        bodies.push(body);
    }
    Ok(bodies)
}
