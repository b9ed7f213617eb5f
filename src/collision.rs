//! Contact handling: wall bounces, body-body impulses and overlap removal.
//!
//! Impulses are expressed as velocity deltas that the step folds into the
//! integration, the same way gravity is. Contacts carry hysteresis: a pair
//! receives one impulse when it starts overlapping and none again until it has
//! separated.

use crate::body::{Body, BodyId};
use crate::error::{EngineError, EngineResult};
use planet_common::{SimParams, Vector2};

/// The world rectangle `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f64,
    pub height: f64,
}

impl WorldBounds {
    pub fn new(width: f64, height: f64) -> EngineResult<Self> {
        if !(width > 0.0 && width.is_finite() && height > 0.0 && height.is_finite()) {
            return Err(EngineError::InvalidWorld {
                reason: format!("bounds must be positive and finite, got {} x {}", width, height),
            });
        }
        Ok(WorldBounds { width, height })
    }

    pub fn from_params(params: &SimParams) -> EngineResult<Self> {
        let corner = params.bounds();
        Self::new(corner.x, corner.y)
    }
}

/// Velocity reversal for a body touching a wall while still moving outward.
///
/// Returns `-2 * v` on each offending axis, zero otherwise. Fixed bodies never bounce.
pub fn boundary_impulse(body: &Body, bounds: &WorldBounds) -> Vector2 {
    let mut impulse = Vector2::zero();
    if body.fixed {
        return impulse;
    }

    let (pos, vel, r) = (body.position, body.velocity, body.radius);
    if (pos.x <= r && vel.x < 0.0) || (pos.x >= bounds.width - r && vel.x > 0.0) {
        impulse.x -= 2.0 * vel.x;
    }
    if (pos.y <= r && vel.y < 0.0) || (pos.y >= bounds.height - r && vel.y > 0.0) {
        impulse.y -= 2.0 * vel.y;
    }
    impulse
}

/// How the contact state of a pair changed during a collision pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactTransition {
    Began(BodyId, BodyId),
    Ended(BodyId, BodyId),
}

/// Result of a collision pass. Nothing is applied until the step commits it.
#[derive(Debug, Clone, Default)]
pub struct CollisionResponse {
    /// Velocity delta per body, indexed like the input slice.
    pub impulses: Vec<Vector2>,
    pub transitions: Vec<ContactTransition>,
}

/// True when the pair overlaps strictly; touching exactly does not count.
pub fn is_overlapping(a: &Body, b: &Body) -> bool {
    a.position.distance(b.position) < a.radius + b.radius
}

/// Elastic two-body impulse on `target` from a new contact with `other`,
/// computed from `target`'s point of view along the line of centres.
pub fn contact_impulse(target: &Body, other: &Body) -> EngineResult<Vector2> {
    if target.fixed {
        return Ok(Vector2::zero());
    }
    let d = target.position - other.position;
    let dist_sq = d.magnitude_squared();
    if dist_sq == 0.0 {
        return Err(EngineError::DegenerateGeometry { a: target.id, b: other.id });
    }
    let v = target.velocity - other.velocity;
    let factor = -2.0 * other.mass / (target.mass + other.mass) * v.dot(d) / dist_sq;
    Ok(d * factor)
}

/// Detects contacts between every pair in `bodies` (post-integration state) and
/// computes the impulses for pairs that just started touching.
pub fn resolve_contacts(bodies: &[Body]) -> EngineResult<CollisionResponse> {
    let mut response = CollisionResponse {
        impulses: vec![Vector2::zero(); bodies.len()],
        transitions: Vec::new(),
    };

    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (a, b) = (&bodies[i], &bodies[j]);
            let overlapping = is_overlapping(a, b);
            let marked = a.is_colliding_with(b.id);

            if overlapping && !marked {
                // Each side computes its own impulse.
                response.impulses[i] += contact_impulse(a, b)?;
                response.impulses[j] += contact_impulse(b, a)?;
                response.transitions.push(ContactTransition::Began(a.id, b.id));
                log::debug!("Contact began between {} and {}.", a.id, b.id);
            } else if marked && !overlapping {
                response.transitions.push(ContactTransition::Ended(a.id, b.id));
                log::debug!("Contact ended between {} and {}.", a.id, b.id);
            }
        }
    }

    Ok(response)
}

/// Writes contact transitions into both bodies' hysteresis sets.
pub fn apply_transitions(bodies: &mut [Body], transitions: &[ContactTransition]) {
    for transition in transitions {
        match *transition {
            ContactTransition::Began(a, b) => {
                for body in bodies.iter_mut() {
                    if body.id == a {
                        body.mark_colliding(b);
                    } else if body.id == b {
                        body.mark_colliding(a);
                    }
                }
            }
            ContactTransition::Ended(a, b) => {
                for body in bodies.iter_mut() {
                    if body.id == a {
                        body.clear_colliding(b);
                    } else if body.id == b {
                        body.clear_colliding(a);
                    }
                }
            }
        }
    }
}

/// Position correction that pushes `target` out of every body it overlaps.
///
/// A fixed partner makes `target` take the whole penetration depth; two movable
/// bodies take half each. All corrections are summed so the result does not
/// depend on pair order.
pub fn depenetration_shift(target: &Body, bodies: &[Body]) -> EngineResult<Vector2> {
    let mut shift = Vector2::zero();
    if target.fixed {
        return Ok(shift);
    }

    for other in bodies.iter().filter(|b| b.id != target.id) {
        let d = target.position - other.position;
        let depth = d.magnitude() - (target.radius + other.radius);
        if depth > 0.0 {
            continue;
        }
        let direction = d
            .unit()
            .ok_or(EngineError::DegenerateGeometry { a: target.id, b: other.id })?;
        let share = if other.fixed { 1.0 } else { 0.5 };
        shift += direction * (-depth * share);
    }

    Ok(shift)
}
