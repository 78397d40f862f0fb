//! Per-position conductivity assembly.
//!
//! For an analyte placed at a target height, every sample point takes the
//! smaller of the base conductivity and the perturbation model evaluated at
//! its distance to the nearest atom surface. Points farther than
//! `cutoff + max_radius` from every atom centre keep the base value, which
//! bounds the cost of each query.

use rayon::prelude::*;

use crate::analyte::AnalyteStructure;
use crate::conductivity::BaseConductivityGrid;
use crate::perturbation::PerturbationModel;
use crate::spatial::AtomIndex;

/// Combines the base grid and the perturbation model.
#[derive(Debug, Clone)]
pub struct FieldAssembler {
    base: BaseConductivityGrid,
    model: PerturbationModel,
}

impl FieldAssembler {
    pub fn new(base: BaseConductivityGrid, model: PerturbationModel) -> Self {
        Self { base, model }
    }

    pub fn base(&self) -> &BaseConductivityGrid {
        &self.base
    }

    pub fn model(&self) -> &PerturbationModel {
        &self.model
    }

    /// Conductivity with no analyte present.
    pub fn base_field(&self, points: &[[f64; 3]]) -> Vec<f64> {
        self.base.sample_all(points)
    }

    /// Conductivity with the analyte's centre of mass at height `z`.
    pub fn analyte_field(&self, analyte: &AnalyteStructure, z: f64, points: &[[f64; 3]]) -> Vec<f64> {
        let index = AtomIndex::build(&analyte.positions_at(z), &analyte.radii());
        self.perturbed(&index, points)
    }

    fn perturbed(&self, index: &AtomIndex, points: &[[f64; 3]]) -> Vec<f64> {
        let bound = self.model.cutoff() + index.max_radius();
        points
            .par_iter()
            .map(|&p| {
                let base = self.base.sample(p);
                match index.nearest_within(p, bound) {
                    Some(hit) => base.min(self.model.conductivity(hit.surface_distance())),
                    None => base,
                }
            })
            .collect()
    }
}
