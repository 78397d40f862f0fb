//! Conduction solver abstraction and implementations.
//!
//! The [`ConductionSolver`] trait is the only contact point between the
//! field/sweep logic and the linear algebra. A solver owns a
//! [`StructuredDomain`], accepts a fully populated [`ConductivityBuffer`],
//! and returns a [`PotentialField`] from which boundary fluxes are
//! integrated. The finite-volume solver in [`fv`] is the shipped
//! implementation.

pub mod domain;
pub mod field;
pub mod fv;

pub use domain::StructuredDomain;
pub use field::{ConductivityBuffer, PotentialField};

use thiserror::Error;

/// Metres per angstrom.
pub const ANGSTROM: f64 = 1e-10;

/// Errors that can occur during a conduction solve.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Solver failed to converge after {max_iter} iterations (residual: {residual:.2e})")]
    ConvergenceFailure { max_iter: usize, residual: f64 },

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Invalid conductivity field: {0}")]
    InvalidField(String),

    #[error("Iteration broke down: {0}")]
    Breakdown(String),
}

/// Dirichlet faces of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// The `z_min` face, held at 0 V.
    Ground,
    /// The `z_max` face, held at the applied voltage.
    Terminal,
}

/// Fixed potentials on the ground and terminal faces; all other faces are
/// insulating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryConditions {
    pub ground_potential: f64,
    pub terminal_potential: f64,
}

impl BoundaryConditions {
    /// Ground at 0 V, terminal at `millivolts / 1000` V.
    pub fn from_millivolts(millivolts: f64) -> Self {
        Self {
            ground_potential: 0.0,
            terminal_potential: millivolts / 1000.0,
        }
    }
}

/// Current through the box for one conductivity field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentMeasurement {
    /// `|terminal flux|` (A).
    pub current: f64,
    pub ground_flux: f64,
    pub terminal_flux: f64,
    pub iterations: usize,
    pub residual: f64,
}

impl CurrentMeasurement {
    /// Relative mismatch between ground and terminal flux.
    pub fn flux_discrepancy(&self) -> f64 {
        let scale = self.terminal_flux.abs().max(self.ground_flux.abs());
        if scale > 0.0 {
            (self.ground_flux - self.terminal_flux).abs() / scale
        } else {
            0.0
        }
    }
}

/// The interface every conduction solver implements.
///
/// Implementations solve `∇·(σ∇u) = 0` with the given Dirichlet faces and
/// insulating side walls. Failure to converge is an error, never a
/// silently accepted approximation.
pub trait ConductionSolver {
    /// The discretised domain on which fields are sampled.
    fn domain(&self) -> &StructuredDomain;

    /// Solve for the potential.
    fn solve(
        &self,
        field: &ConductivityBuffer,
        bc: &BoundaryConditions,
    ) -> Result<PotentialField, SolverError>;

    /// Integral of the z-component of `σ∇u` over a Dirichlet face (A).
    fn boundary_flux(
        &self,
        potential: &PotentialField,
        field: &ConductivityBuffer,
        boundary: Boundary,
    ) -> Result<f64, SolverError>;

    /// Human-readable name of the solver method.
    fn method_name(&self) -> &str;

    /// Solve and integrate both face fluxes.
    fn measure_current(
        &self,
        field: &ConductivityBuffer,
        bc: &BoundaryConditions,
    ) -> Result<CurrentMeasurement, SolverError> {
        let potential = self.solve(field, bc)?;
        let ground_flux = self.boundary_flux(&potential, field, Boundary::Ground)?;
        let terminal_flux = self.boundary_flux(&potential, field, Boundary::Terminal)?;
        Ok(CurrentMeasurement {
            current: terminal_flux.abs(),
            ground_flux,
            terminal_flux,
            iterations: potential.iterations(),
            residual: potential.residual(),
        })
    }
}
