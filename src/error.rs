use crate::body::BodyId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("bodies {a} and {b} share the same centre; direction between them is undefined")]
    DegenerateGeometry { a: BodyId, b: BodyId },

    #[error("body slot {slot} is invalid: {reason}")]
    InvalidBodyConfig { slot: usize, reason: String },

    #[error("world is invalid: {reason}")]
    InvalidWorld { reason: String },

    #[error("simulation is idle; call start() before step()")]
    NotRunning,
}

pub type EngineResult<T> = Result<T, EngineError>;
