//! # Blockade Core
//!
//! The numerical backbone of the Blockade framework. This crate estimates
//! the ionic-current blockage caused by an analyte moving along the axis of
//! a nanopore, by solving steady-state conduction `∇·(σ∇u) = 0` over a box
//! whose conductivity encodes the membrane and the analyte's excluded
//! volume.
//!
//! ## Architecture
//!
//! All solvers implement the [`solver::ConductionSolver`] trait, which
//! separates the geometry, field and sweep logic from the linear algebra.
//! The implementation shipped here is a vertex-centred finite-volume
//! discretisation solved with preconditioned conjugate gradients
//! ([`solver::fv::FiniteVolumeSolver`]).
//!
//! ## Modules
//!
//! - [`types`]: Validated parameters, sweep ranges and result containers.
//! - [`analyte`]: Atom records, radius assignment and centre of mass.
//! - [`conductivity`]: Base bulk/membrane conductivity grid and interpolator.
//! - [`perturbation`]: Distance-to-conductivity model around atoms.
//! - [`spatial`]: R-tree nearest-atom queries.
//! - [`assembler`]: Combines base field and perturbation per analyte position.
//! - [`solver`]: Conduction solver trait, structured domain and FV/PCG solver.
//! - [`sweep`]: Open-pore baseline and position sweep driver.
//! - [`preview`]: x–z conductivity slices for inspecting a setup.
//! - [`error`]: Simulation error taxonomy.

pub mod analyte;
pub mod assembler;
pub mod conductivity;
pub mod error;
pub mod perturbation;
pub mod preview;
pub mod solver;
pub mod spatial;
pub mod sweep;
pub mod types;

pub use error::{SimulationError, SimulationResult};
