use crate::body::{bodies_from_config, Body, BodyId};
use crate::collision::{self, WorldBounds};
use crate::error::{EngineError, EngineResult};
use crate::forces::GravityModel;
use log::{debug, info, trace, warn};
use planet_common::{Canvas, SimParams, SimulationConfig, Snapshot, Vector2};
use std::collections::HashSet;

/// Lifecycle of a run: `Idle -> Running -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

/// Advances `bodies` by one step and returns the new body set.
///
/// Passes, in order:
/// 1. gravity plus wall bounce, read from the committed state;
/// 2. semi-implicit Euler (`v += a; p += v`) for movable bodies;
/// 3. contact detection and impulses on the integrated positions;
/// 4. overlap removal.
///
/// The contact impulse is folded into both velocity and position, like an
/// acceleration integrated within the same step. The input is never touched,
/// so an error leaves the caller's state as it was.
pub fn advance(bodies: &[Body], bounds: &WorldBounds, gravity: &GravityModel) -> EngineResult<Vec<Body>> {
    // --- 1. Acceleration pass (pre-step snapshot) ---
    let accelerations = bodies
        .iter()
        .map(|body| -> EngineResult<Vector2> {
            Ok(gravity.acceleration(body, bodies)? + collision::boundary_impulse(body, bounds))
        })
        .collect::<EngineResult<Vec<Vector2>>>()?;

    // --- 2. Integration pass into the working buffer ---
    let mut next = bodies.to_vec();
    for (body, accel) in next.iter_mut().zip(&accelerations) {
        if body.fixed {
            continue;
        }
        body.velocity += *accel;
        body.position += body.velocity;
    }

    // --- 3. Collision pass (post-integration snapshot) ---
    let response = collision::resolve_contacts(&next)?;

    // --- 4. De-penetration pass (same snapshot) ---
    let shifts = next
        .iter()
        .map(|body| collision::depenetration_shift(body, &next))
        .collect::<EngineResult<Vec<Vector2>>>()?;

    // --- Commit ---
    for ((body, impulse), shift) in next.iter_mut().zip(&response.impulses).zip(&shifts) {
        if body.fixed {
            continue;
        }
        body.velocity += *impulse;
        body.position += *impulse + *shift;
    }
    collision::apply_transitions(&mut next, &response.transitions);

    Ok(next)
}

/// Owns a body set and drives it one tick at a time.
pub struct Simulation {
    params: SimParams,
    bounds: WorldBounds,
    gravity: GravityModel,
    bodies: Vec<Body>,
    run_state: RunState,
    /// The current simulation time step number.
    current_time_step: u64,
    /// Stores collected simulation data snapshots.
    recorded_snapshots: Vec<Snapshot>,
}

impl Simulation {
    /// Creates a simulation from a loaded configuration. Disabled body slots are left out.
    pub fn new(config: &SimulationConfig) -> EngineResult<Self> {
        let bodies = bodies_from_config(&config.bodies)?;
        info!(
            "Built {} bodies from {} configured slots.",
            bodies.len(),
            config.bodies.len()
        );
        Self::from_parts(config.get_sim_params(), bodies)
    }

    /// Creates a simulation from explicit parameters and bodies. Body ids must be unique.
    pub fn from_parts(params: SimParams, bodies: Vec<Body>) -> EngineResult<Self> {
        let bounds = WorldBounds::from_params(&params)?;
        if !params.gravitational_constant.is_finite() {
            return Err(EngineError::InvalidWorld {
                reason: format!("gravitational constant must be finite, got {}", params.gravitational_constant),
            });
        }

        let mut seen = HashSet::new();
        for (slot, body) in bodies.iter().enumerate() {
            if !seen.insert(body.id) {
                return Err(EngineError::InvalidBodyConfig {
                    slot,
                    reason: format!("duplicate body id {}", body.id),
                });
            }
        }

        let gravity = GravityModel::new(params.gravitational_constant);
        debug!("World {:?}, G = {}", bounds, gravity.gravitational_constant());

        Ok(Self {
            params,
            bounds,
            gravity,
            bodies,
            run_state: RunState::Idle,
            current_time_step: 0,
            recorded_snapshots: Vec::new(),
        })
    }

    pub fn start(&mut self) {
        if self.run_state == RunState::Running {
            warn!("start() called on a running simulation; ignoring.");
            return;
        }
        info!("Simulation started at step {}.", self.current_time_step);
        self.run_state = RunState::Running;
    }

    pub fn stop(&mut self) {
        if self.run_state == RunState::Running {
            info!("Simulation stopped at step {}.", self.current_time_step);
        }
        self.run_state = RunState::Idle;
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Advances the simulation by one step.
    /// On error the body set is unchanged and the next call may simply retry.
    pub fn step(&mut self) -> EngineResult<()> {
        if self.run_state != RunState::Running {
            return Err(EngineError::NotRunning);
        }

        self.bodies = advance(&self.bodies, &self.bounds, &self.gravity)?;
        self.current_time_step += 1;
        self.params.time_step = self.current_time_step;
        trace!("Step {} committed.", self.current_time_step);
        Ok(())
    }

    /// One animation frame: step, then redraw every body on `canvas`.
    pub fn tick<C: Canvas>(&mut self, canvas: &mut C) -> EngineResult<()> {
        self.step()?;
        self.render(canvas);
        Ok(())
    }

    /// Clears `canvas` and draws each body as a circle.
    pub fn render<C: Canvas>(&self, canvas: &mut C) {
        canvas.clear();
        for body in &self.bodies {
            canvas.draw_circle(body.position, body.radius, body.fixed);
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    pub fn current_step(&self) -> u64 {
        self.current_time_step
    }

    pub fn current_body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Builds a snapshot of the current state with aggregate metrics.
    pub fn snapshot(&self) -> Snapshot {
        let total_mass: f64 = self.bodies.iter().map(|b| b.mass).sum();
        let weighted = self
            .bodies
            .iter()
            .fold(Vector2::zero(), |acc, b| acc + b.position * b.mass);
        let center_of_mass = if total_mass > 0.0 { weighted / total_mass } else { Vector2::zero() };
        let total_momentum = self.bodies.iter().fold(Vector2::zero(), |acc, b| acc + b.momentum());
        let kinetic_energy: f64 = self.bodies.iter().map(|b| b.kinetic_energy()).sum();
        let contact_links: usize = self.bodies.iter().map(|b| b.contacts().len()).sum();

        Snapshot {
            step: self.current_time_step,
            center_of_mass: center_of_mass.into(),
            total_momentum: total_momentum.into(),
            kinetic_energy,
            contact_pairs: (contact_links / 2) as u32,
            bodies: self.bodies.iter().map(Body::to_snapshot).collect(),
        }
    }

    /// Records a snapshot of the current state.
    pub fn record_snapshot(&mut self) {
        let snapshot = self.snapshot();
        debug!(
            "Recorded snapshot at step {} (KE = {:.4}, contacts = {}).",
            snapshot.step, snapshot.kinetic_energy, snapshot.contact_pairs
        );
        self.recorded_snapshots.push(snapshot);
    }

    pub fn get_recorded_snapshots(&self) -> &Vec<Snapshot> {
        &self.recorded_snapshots
    }

    /// Final positions of all bodies, in body order.
    pub fn get_results(&self) -> Vec<(u32, f64, f64)> {
        self.bodies
            .iter()
            .map(|b| (b.id.0, b.position.x, b.position.y))
            .collect()
    }
}
