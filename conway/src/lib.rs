// lib.rs - Conway's Game of Life on a bounded grid, stepped by a tokio timer

pub mod config;
pub mod dimensions;
pub mod error;
pub mod grid;
pub mod patterns;
pub mod simulation;

pub use config::SimulationConfig;
pub use dimensions::Dimensions;
pub use error::{Result, SimulationError};
pub use grid::Grid;
pub use patterns::{PATTERNS, Pattern};
pub use simulation::{Simulation, Snapshot};
