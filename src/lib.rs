//! Planet engine: a small 2D gravity and collision simulator.
//!
//! Bodies attract each other, bounce off the walls of the world rectangle and
//! collide elastically with each other. The [`Simulation`] advances them one
//! discrete step at a time; rendering is left to whoever drives it.

pub mod body;
pub mod collision;
pub mod error;
pub mod forces;
pub mod simulation;

pub use body::{bodies_from_config, Body, BodyId};
pub use collision::WorldBounds;
pub use error::{EngineError, EngineResult};
pub use forces::GravityModel;
pub use simulation::{advance, RunState, Simulation};
