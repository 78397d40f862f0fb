//! Finite-volume stencil assembly.
//!
//! Each node owns the dual cell spanning half a spacing either side of it.
//! Neighbouring nodes are coupled through the shared dual-cell face with
//! conductance
//!
//! $$ G = \bar\sigma \, A_{\text{face}} / h, \qquad \bar\sigma = \frac{2\sigma_a\sigma_b}{\sigma_a + \sigma_b} $$
//!
//! The ground and terminal layers are Dirichlet and are eliminated, leaving
//! one unknown per node in layers `1..nz`. The reduced matrix
//! `A = D - G_off` is symmetric positive definite.

use rayon::prelude::*;

use super::iterative::SpdOperator;
use crate::solver::{BoundaryConditions, ConductivityBuffer, SolverError, StructuredDomain};

/// Harmonic mean of two positive conductivities.
#[inline]
pub(crate) fn harmonic_mean(a: f64, b: f64) -> f64 {
    2.0 * a * b / (a + b)
}

/// Conductance of the z link from node `p` to the node directly above it.
#[inline]
pub(crate) fn z_link(domain: &StructuredDomain, sigma: &[f64], p: usize) -> f64 {
    let (i, j, _) = domain.coords(p);
    let area = domain.dual_width(0, i) * domain.dual_width(1, j);
    let q = p + domain.layer_len();
    harmonic_mean(sigma[p], sigma[q]) * area / domain.spacing()[2]
}

/// Off-diagonal couplings of one row: up to six `(column, conductance)`
/// pairs.
#[derive(Debug, Clone, Copy)]
pub struct Row {
    cols: [usize; 6],
    weights: [f64; 6],
    len: usize,
}

impl Row {
    pub(crate) fn new() -> Self {
        Self {
            cols: [0; 6],
            weights: [0.0; 6],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, col: usize, g: f64) {
        self.cols[self.len] = col;
        self.weights[self.len] = g;
        self.len += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.cols[..self.len]
            .iter()
            .copied()
            .zip(self.weights[..self.len].iter().copied())
    }
}

/// Matrix-free operator for the reduced conduction system.
pub struct FvOperator<'d> {
    domain: &'d StructuredDomain,
    gx: Vec<f64>,
    gy: Vec<f64>,
    gz: Vec<f64>,
    diag: Vec<f64>,
}

impl<'d> FvOperator<'d> {
    /// Compute link conductances and the diagonal from a nodal field.
    pub fn assemble(
        domain: &'d StructuredDomain,
        field: &ConductivityBuffer,
    ) -> Result<Self, SolverError> {
        if field.len() != domain.node_count() {
            return Err(SolverError::InvalidField(format!(
                "field has {} values but domain has {} nodes",
                field.len(),
                domain.node_count()
            )));
        }
        let sigma = field.values();
        let [nx, ny, nz] = domain.elements();
        let [hx, hy, _] = domain.spacing();
        let nx1 = nx + 1;
        let layer = domain.layer_len();
        let total = domain.node_count();

        let gx: Vec<f64> = (0..total)
            .into_par_iter()
            .map(|p| {
                let (i, j, k) = domain.coords(p);
                if i == nx {
                    return 0.0;
                }
                let area = domain.dual_width(1, j) * domain.dual_width(2, k);
                harmonic_mean(sigma[p], sigma[p + 1]) * area / hx
            })
            .collect();
        let gy: Vec<f64> = (0..total)
            .into_par_iter()
            .map(|p| {
                let (i, j, k) = domain.coords(p);
                if j == ny {
                    return 0.0;
                }
                let area = domain.dual_width(0, i) * domain.dual_width(2, k);
                harmonic_mean(sigma[p], sigma[p + nx1]) * area / hy
            })
            .collect();
        let gz: Vec<f64> = (0..total)
            .into_par_iter()
            .map(|p| {
                let (_, _, k) = domain.coords(p);
                if k == nz {
                    0.0
                } else {
                    z_link(domain, sigma, p)
                }
            })
            .collect();

        let unknowns = (nz - 1) * layer;
        let diag: Vec<f64> = (0..unknowns)
            .into_par_iter()
            .map(|r| {
                let p = r + layer;
                let (i, j, _) = domain.coords(p);
                let mut d = gx[p] + gy[p] + gz[p] + gz[p - layer];
                if i > 0 {
                    d += gx[p - 1];
                }
                if j > 0 {
                    d += gy[p - nx1];
                }
                d
            })
            .collect();

        Ok(Self {
            domain,
            gx,
            gy,
            gz,
            diag,
        })
    }

    /// Right-hand side carrying the eliminated Dirichlet layers.
    pub fn rhs(&self, bc: &BoundaryConditions) -> Vec<f64> {
        let layer = self.domain.layer_len();
        let nz = self.domain.elements()[2];
        let mut b = vec![0.0; self.diag.len()];
        // Bottom unknown layer couples to ground, top unknown layer to terminal.
        for (r, v) in b.iter_mut().enumerate().take(layer) {
            *v += self.gz[r] * bc.ground_potential;
        }
        let top = (nz - 2) * layer;
        for (r, v) in b.iter_mut().enumerate().skip(top) {
            *v += self.gz[r + layer] * bc.terminal_potential;
        }
        b
    }
}

impl SpdOperator for FvOperator<'_> {
    /// Number of unknowns.
    fn dim(&self) -> usize {
        self.diag.len()
    }

    fn diagonal(&self) -> &[f64] {
        &self.diag
    }

    /// Couplings of row `r` to its neighbouring unknowns.
    #[inline]
    fn row(&self, r: usize) -> Row {
        let layer = self.domain.layer_len();
        let [nx, ny, nz] = self.domain.elements();
        let nx1 = nx + 1;
        let p = r + layer;
        let (i, j, k) = self.domain.coords(p);

        let mut row = Row::new();
        if k > 1 {
            row.push(r - layer, self.gz[p - layer]);
        }
        if j > 0 {
            row.push(r - nx1, self.gy[p - nx1]);
        }
        if i > 0 {
            row.push(r - 1, self.gx[p - 1]);
        }
        if i < nx {
            row.push(r + 1, self.gx[p]);
        }
        if j < ny {
            row.push(r + nx1, self.gy[p]);
        }
        if k + 1 < nz {
            row.push(r + layer, self.gz[p]);
        }
        row
    }

    /// `y = A x`.
    fn apply(&self, x: &[f64], y: &mut [f64]) {
        y.par_iter_mut().enumerate().for_each(|(r, out)| {
            let off: f64 = self.row(r).iter().map(|(c, g)| g * x[c]).sum();
            *out = self.diag[r] * x[r] - off;
        });
    }
}
