pub mod canvas;
pub mod config;
pub mod sim_params;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use canvas::Canvas;
pub use config::{SimulationConfig, UniverseConfig, PhysicsConfig, TimingConfig, BodyConfig, OutputConfig};
pub use sim_params::SimParams;
pub use snapshot::{Snapshot, BodySnapshot};
pub use vecmath::Vector2;
