//! Base conductivity grid.
//!
//! The membrane is rasterised once onto a regular grid: every node starts at
//! bulk conductivity and nodes inside membrane material are set to a small
//! positive floor. Queries between nodes are trilinear. Queries inside the
//! box but past the last node take the edge value; queries outside the box
//! return bulk conductivity.

use blockade_geometry::{PoreProfile, SimulationBox};
use ndarray::Array3;
use rayon::prelude::*;

use crate::error::{SimulationError, SimulationResult};

/// Default conductivity of membrane material (S/m).
pub const DEFAULT_MEMBRANE_CONDUCTIVITY: f64 = 1e-4;

/// Axis `lo, lo + step, …` up to and including the last value not beyond
/// `hi`.
pub(crate) fn axis(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    let n = ((hi - lo) / step + 1e-9).floor().max(0.0) as usize + 1;
    (0..n).map(|i| lo + i as f64 * step).collect()
}

/// Bulk/membrane conductivity sampled on a regular grid.
#[derive(Debug, Clone)]
pub struct BaseConductivityGrid {
    axes: [Vec<f64>; 3],
    extent: [(f64, f64); 3],
    values: Array3<f64>,
    resolution: f64,
    bulk: f64,
    membrane_nodes: usize,
}

impl BaseConductivityGrid {
    /// Rasterise `pore` over `sim_box` at `resolution`.
    pub fn build<P: PoreProfile + Sync + ?Sized>(
        pore: &P,
        sim_box: &SimulationBox,
        resolution: f64,
        bulk: f64,
        membrane: f64,
    ) -> SimulationResult<Self> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(SimulationError::Configuration(format!(
                "grid_resolution must be positive, got {resolution}"
            )));
        }
        let axes = [
            axis(sim_box.x.0, sim_box.x.1, resolution),
            axis(sim_box.y.0, sim_box.y.1, resolution),
            axis(sim_box.z.0, sim_box.z.1, resolution),
        ];
        let shape = (axes[0].len(), axes[1].len(), axes[2].len());

        let (ny, nz) = (shape.1, shape.2);
        let flat: Vec<f64> = (0..shape.0 * ny * nz)
            .into_par_iter()
            .map(|idx| {
                let (i, rem) = (idx / (ny * nz), idx % (ny * nz));
                let (j, k) = (rem / nz, rem % nz);
                if pore.is_membrane(axes[0][i], axes[1][j], axes[2][k]) {
                    membrane
                } else {
                    bulk
                }
            })
            .collect();
        let membrane_nodes = flat.iter().filter(|&&v| v != bulk).count();
        let values = Array3::from_shape_vec(shape, flat)
            .map_err(|e| SimulationError::Configuration(format!("base grid shape: {e}")))?;

        log::info!(
            "Created base conductivity grid with shape {:?}; membrane occupies {}/{} points ({:.1}%)",
            shape,
            membrane_nodes,
            values.len(),
            100.0 * membrane_nodes as f64 / values.len() as f64
        );

        Ok(Self {
            axes,
            extent: [sim_box.x, sim_box.y, sim_box.z],
            values,
            resolution,
            bulk,
            membrane_nodes,
        })
    }

    pub fn shape(&self) -> [usize; 3] {
        [self.axes[0].len(), self.axes[1].len(), self.axes[2].len()]
    }

    pub fn values(&self) -> &Array3<f64> {
        &self.values
    }

    pub fn bulk(&self) -> f64 {
        self.bulk
    }

    pub fn membrane_nodes(&self) -> usize {
        self.membrane_nodes
    }

    /// Bracketing index and weight of `v` on axis `a`, or `None` outside
    /// the box.
    fn locate(&self, a: usize, v: f64) -> Option<(usize, f64)> {
        let (lo, hi) = self.extent[a];
        if !(v >= lo && v <= hi) {
            return None;
        }
        let ax = &self.axes[a];
        let first = ax[0];
        if ax.len() == 1 {
            return Some((0, 0.0));
        }
        let i = (((v - first) / self.resolution).floor() as usize).min(ax.len() - 2);
        let t = ((v - ax[i]) / self.resolution).clamp(0.0, 1.0);
        Some((i, t))
    }

    /// Trilinear interpolation; bulk conductivity outside the box.
    pub fn sample(&self, p: [f64; 3]) -> f64 {
        let (Some((i, tx)), Some((j, ty)), Some((k, tz))) =
            (self.locate(0, p[0]), self.locate(1, p[1]), self.locate(2, p[2]))
        else {
            return self.bulk;
        };
        let [nx, ny, nz] = self.shape();
        let i1 = (i + 1).min(nx - 1);
        let j1 = (j + 1).min(ny - 1);
        let k1 = (k + 1).min(nz - 1);
        let v = &self.values;
        let lerp = |a: f64, b: f64, t: f64| a + (b - a) * t;

        let c00 = lerp(v[[i, j, k]], v[[i1, j, k]], tx);
        let c10 = lerp(v[[i, j1, k]], v[[i1, j1, k]], tx);
        let c01 = lerp(v[[i, j, k1]], v[[i1, j, k1]], tx);
        let c11 = lerp(v[[i, j1, k1]], v[[i1, j1, k1]], tx);
        lerp(lerp(c00, c10, ty), lerp(c01, c11, ty), tz)
    }

    /// Sample every point in parallel, preserving order.
    pub fn sample_all(&self, points: &[[f64; 3]]) -> Vec<f64> {
        points.par_iter().map(|&p| self.sample(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use blockade_geometry::{Cylindrical, DoubleCone};

    fn grid() -> BaseConductivityGrid {
        let pore = Cylindrical::new(10.0, 20.0, 0.0, None).unwrap();
        let sim_box = SimulationBox::new((-30.0, 30.0), (-30.0, 30.0), (-30.0, 30.0)).unwrap();
        BaseConductivityGrid::build(&pore, &sim_box, 2.0, 10.5, 1e-4).unwrap()
    }

    #[test]
    fn test_axis_includes_reachable_end() {
        assert_eq!(axis(-2.0, 2.0, 1.0), vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(axis(0.0, 2.5, 1.0), vec![0.0, 1.0, 2.0]);
        assert_eq!(axis(-200.0, 200.0, 8.0).len(), 51);
    }

    #[test]
    fn test_membrane_and_pore_values() {
        let g = grid();
        assert_eq!(g.shape(), [31, 31, 31]);
        // Inside membrane material.
        assert_relative_eq!(g.sample([20.0, 0.0, 0.0]), 1e-4);
        // Inside the pore.
        assert_relative_eq!(g.sample([0.0, 0.0, 0.0]), 10.5);
        // Reservoir above the membrane.
        assert_relative_eq!(g.sample([20.0, 20.0, 14.0]), 10.5);
        assert!(g.membrane_nodes() > 0);
    }

    #[test]
    fn test_outside_grid_is_bulk() {
        let g = grid();
        assert_eq!(g.sample([31.0, 0.0, 0.0]), 10.5);
        assert_eq!(g.sample([0.0, -31.0, 0.0]), 10.5);
        assert_eq!(g.sample([f64::NAN, 0.0, 0.0]), 10.5);
    }

    #[test]
    fn test_interpolates_between_nodes() {
        let g = grid();
        // Halfway between a pore node (x = 10) and a membrane node (x = 12).
        let v = g.sample([11.0, 0.0, 0.0]);
        assert_relative_eq!(v, 0.5 * (10.5 + 1e-4), epsilon = 1e-12);
    }

    #[test]
    fn test_partial_last_cell_takes_edge_value() {
        // Axis stops at x = 8; the box extends to 9.
        let pore = Cylindrical::new(2.0, 4.0, 0.0, None).unwrap();
        let sim_box = SimulationBox::new((0.0, 9.0), (-1.0, 1.0), (-1.0, 1.0)).unwrap();
        let g = BaseConductivityGrid::build(&pore, &sim_box, 2.0, 5.0, 1e-4).unwrap();
        assert_eq!(g.shape()[0], 5);
        assert_relative_eq!(g.sample([9.0, 1.0, 1.0]), 1e-4);
        assert_eq!(g.sample([9.5, 1.0, 1.0]), 5.0);
    }

    #[test]
    fn test_double_cone_grid() {
        let pore = DoubleCone::new(5.0, 15.0, 20.0).unwrap();
        let sim_box = SimulationBox::new((-20.0, 20.0), (-20.0, 20.0), (-20.0, 20.0)).unwrap();
        let g = BaseConductivityGrid::build(&pore, &sim_box, 1.0, 1.0, 1e-4).unwrap();
        assert_relative_eq!(g.sample([8.0, 0.0, 0.0]), 1e-4);
        assert_relative_eq!(g.sample([8.0, 0.0, 9.0]), 1.0);
    }
}
