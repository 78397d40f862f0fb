//! Conductivity near an atom surface.
//!
//! Electrolyte is excluded from within [`MIN_DISTANCE`] of an atom surface
//! and recovers linearly to bulk conductivity at the cutoff:
//!
//! ```text
//! σ(d) = floor + clamp((d - m) / (c - m), 0, 1) · (B - floor)   for d < c
//! σ(d) = B                                                       for d ≥ c
//! ```
//!
//! with `floor = 1e-7 · B`. The floor keeps the conduction problem
//! well-posed inside the analyte.

use crate::error::{SimulationError, SimulationResult};

/// Closest approach of conducting electrolyte to an atom surface (Å).
pub const MIN_DISTANCE: f64 = 1.3;

/// Default recovery distance (Å).
pub const DEFAULT_CUTOFF: f64 = 4.1;

/// Conductivity at or inside [`MIN_DISTANCE`], relative to bulk.
pub const FLOOR_FRACTION: f64 = 1e-7;

/// Piecewise-linear surface-distance model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerturbationModel {
    bulk: f64,
    cutoff: f64,
    min_distance: f64,
    floor: f64,
}

impl PerturbationModel {
    pub fn new(bulk_conductivity: f64, cutoff: f64) -> SimulationResult<Self> {
        if !(bulk_conductivity.is_finite() && bulk_conductivity > 0.0) {
            return Err(SimulationError::Configuration(format!(
                "bulk_conductivity must be positive, got {bulk_conductivity}"
            )));
        }
        if !(cutoff.is_finite() && cutoff > MIN_DISTANCE) {
            return Err(SimulationError::Configuration(format!(
                "cutoff must exceed {MIN_DISTANCE} Å, got {cutoff}"
            )));
        }
        Ok(Self {
            bulk: bulk_conductivity,
            cutoff,
            min_distance: MIN_DISTANCE,
            floor: FLOOR_FRACTION * bulk_conductivity,
        })
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn bulk(&self) -> f64 {
        self.bulk
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Conductivity at surface distance `d` (Å, already clamped at zero).
    #[inline]
    pub fn conductivity(&self, d: f64) -> f64 {
        if d >= self.cutoff {
            return self.bulk;
        }
        let fraction =
            ((d - self.min_distance) / (self.cutoff - self.min_distance)).clamp(0.0, 1.0);
        (self.floor + fraction * (self.bulk - self.floor)).min(self.bulk)
    }
}
