// error.rs - Error type shared by the grid engine and the simulation controller

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    /// A grid mutation was attempted while the simulation is running.
    #[error("cannot {operation} while the simulation is running")]
    InvalidState { operation: &'static str },

    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("unknown grid size '{0}' (expected 10x20, 30x30 or 30x50)")]
    UnknownPreset(String),

    #[error("unknown pattern '{0}'")]
    UnknownPattern(String),

    #[error("the simulation must be created inside a tokio runtime")]
    NoRuntime,

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
