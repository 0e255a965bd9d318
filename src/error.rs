//! Simulation errors

use thiserror::Error;

/// Errors raised by table construction, stepping and shot handling
#[derive(Error, Debug)]
pub enum SimError {
    /// A setting is out of range (never clamped)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A call was rejected at the API boundary
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A bounded loop ran out of iterations
    #[error("simulation stalled: {what} did not finish after {iterations} iterations")]
    Stalled { what: &'static str, iterations: u32 },

    #[error("the cue ball is not on the table")]
    CueBallPocketed,

    #[error("the cue ball is already on the table")]
    CueBallOnTable,

    #[error("balls are still moving")]
    NotSettled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
