//! Error taxonomy for a blockade simulation.

use blockade_geometry::parsers::ParseError;
use blockade_geometry::GeometryError;
use thiserror::Error;

use crate::solver::SolverError;

/// Any failure that stops a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("Failed to load structure: {0}")]
    Structure(#[from] ParseError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Open-pore current {open_current:.3e} A is indistinguishable from zero; blockage is undefined")]
    DegenerateNormalization { open_current: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimulationResult<T> = Result<T, SimulationError>;
