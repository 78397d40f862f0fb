//! Core types shared across the Blockade framework.
//!
//! This module defines the validated simulation parameters consumed by the
//! pipeline and the containers for sweep results.

use blockade_geometry::{PoreSpec, SimulationBox};
use serde::{Deserialize, Serialize};

use crate::error::{SimulationError, SimulationResult};
use crate::perturbation::MIN_DISTANCE;

/// Preconditioner used by the conjugate-gradient solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preconditioner {
    /// Diagonal scaling.
    #[default]
    Jacobi,
    /// Symmetric successive over-relaxation.
    Ssor,
}

/// Linear solver controls. Missing fields take their defaults when
/// deserialised.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Relative residual tolerance (default: 1e-8).
    pub tolerance: f64,
    /// Iteration cap; exceeding it is fatal (default: 20000).
    pub max_iterations: usize,
    /// Largest element count along any axis before the mesh is coarsened
    /// (default: 400).
    pub max_elements: usize,
    pub preconditioner: Preconditioner,
    /// Relaxation factor for [`Preconditioner::Ssor`], in (0, 2).
    pub ssor_omega: f64,
    /// Relative ground/terminal flux mismatch above which a warning is logged.
    pub flux_tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 20_000,
            max_elements: 400,
            preconditioner: Preconditioner::Jacobi,
            ssor_omega: 1.2,
            flux_tolerance: 1e-3,
        }
    }
}

/// Axial positions visited by the analyte's centre of mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    pub z_start: f64,
    pub z_end: f64,
    pub z_step: f64,
}

impl SweepRange {
    /// Number of positions: `floor(|z_end - z_start| / z_step) + 1`.
    pub fn count(&self) -> usize {
        ((self.z_end - self.z_start).abs() / self.z_step).floor() as usize + 1
    }

    /// Evenly spaced positions including both endpoints.
    ///
    /// When the range is not a multiple of `z_step` the realised spacing
    /// differs slightly from `z_step`; the count is what is preserved.
    pub fn positions(&self) -> Vec<f64> {
        let n = self.count();
        if n == 1 {
            return vec![self.z_start];
        }
        let step = (self.z_end - self.z_start) / (n - 1) as f64;
        (0..n)
            .map(|i| {
                if i == n - 1 {
                    self.z_end
                } else {
                    self.z_start + i as f64 * step
                }
            })
            .collect()
    }
}

/// Fully validated parameters for one simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationParams {
    pub pore: PoreSpec,
    pub sim_box: SimulationBox,
    /// Spacing of the base grid and target mesh spacing (Å).
    pub grid_resolution: f64,
    /// Electrolyte conductivity (S/m).
    pub bulk_conductivity: f64,
    /// Conductivity assigned to membrane material (S/m).
    pub membrane_conductivity: f64,
    /// Distance beyond an atom surface at which conductivity recovers (Å).
    pub cutoff: f64,
    /// Applied voltage (mV).
    pub voltage_mv: f64,
    pub sweep: SweepRange,
    pub use_element_radii: bool,
    /// Radius for atoms with no tabulated or file-provided value (Å).
    pub default_radius: f64,
    pub solver: SolverSettings,
}

fn require(cond: bool, message: impl FnOnce() -> String) -> SimulationResult<()> {
    if cond {
        Ok(())
    } else {
        Err(SimulationError::Configuration(message()))
    }
}

fn positive(name: &str, value: f64) -> SimulationResult<()> {
    require(value.is_finite() && value > 0.0, || {
        format!("{name} must be positive, got {value}")
    })
}

impl SimulationParams {
    /// Applied voltage in volts.
    pub fn voltage_volts(&self) -> f64 {
        self.voltage_mv / 1000.0
    }

    /// Reject inconsistent numeric combinations before any numerical work.
    pub fn validate(&self) -> SimulationResult<()> {
        positive("grid_resolution", self.grid_resolution)?;
        positive("bulk_conductivity", self.bulk_conductivity)?;
        positive("membrane_conductivity", self.membrane_conductivity)?;
        positive("default_radius", self.default_radius)?;
        positive("z_step", self.sweep.z_step)?;
        require(self.voltage_mv.is_finite(), || "voltage must be finite".into())?;
        require(
            self.sweep.z_start.is_finite() && self.sweep.z_end.is_finite(),
            || "z_start and z_end must be finite".into(),
        )?;
        require(self.cutoff.is_finite() && self.cutoff > MIN_DISTANCE, || {
            format!(
                "cutoff must exceed the minimum approach distance {MIN_DISTANCE} Å, got {}",
                self.cutoff
            )
        })?;
        require(
            self.membrane_conductivity <= self.bulk_conductivity,
            || "membrane_conductivity must not exceed bulk_conductivity".into(),
        )?;
        let s = &self.solver;
        positive("solver tolerance", s.tolerance)?;
        positive("flux_tolerance", s.flux_tolerance)?;
        require(s.max_iterations > 0, || "max_iterations must be positive".into())?;
        require(s.max_elements >= 2, || "max_elements must be at least 2".into())?;
        require(s.ssor_omega > 0.0 && s.ssor_omega < 2.0, || {
            format!("ssor_omega must lie in (0, 2), got {}", s.ssor_omega)
        })?;
        Ok(())
    }
}

/// Measured current at one analyte position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Zero-based position index in the sweep.
    pub index: usize,
    /// Centre-of-mass height (Å).
    pub z_position: f64,
    /// Current (A).
    pub current: f64,
    /// `current / open_current`.
    pub normalized_current: f64,
    /// `(1 - normalized_current) * 100`.
    pub blockage: f64,
}

/// Position and magnitude of the largest blockage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepSummary {
    pub max_blockage: f64,
    pub z_at_max: f64,
}

/// Complete blockage curve.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResult {
    /// Reference current with no analyte present (A).
    pub open_current: f64,
    pub steps: Vec<StepRecord>,
    pub pore: PoreSpec,
    pub sim_box: SimulationBox,
    pub use_element_radii: bool,
    pub summary: Option<SweepSummary>,
}

impl SweepResult {
    pub fn new(
        open_current: f64,
        steps: Vec<StepRecord>,
        pore: PoreSpec,
        sim_box: SimulationBox,
        use_element_radii: bool,
    ) -> Self {
        let summary = steps
            .iter()
            .fold(None::<&StepRecord>, |best, s| match best {
                Some(b) if b.blockage >= s.blockage => Some(b),
                _ => Some(s),
            })
            .map(|s| SweepSummary {
                max_blockage: s.blockage,
                z_at_max: s.z_position,
            });
        Self {
            open_current,
            steps,
            pore,
            sim_box,
            use_element_radii,
            summary,
        }
    }

    pub fn z_positions(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.z_position).collect()
    }

    pub fn currents(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.current).collect()
    }

    pub fn normalized_currents(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.normalized_current).collect()
    }

    pub fn blockages(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.blockage).collect()
    }
}
