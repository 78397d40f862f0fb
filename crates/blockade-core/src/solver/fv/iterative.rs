//! Preconditioned conjugate gradient for the reduced conduction system.
//!
//! Iteration for `A x = b` with preconditioner `M`:
//!
//! 1. `r = b - A x`, `z = M⁻¹ r`, `p = z`
//! 2. `α = (r, z) / (p, A p)`, `x += α p`, `r -= α A p`
//! 3. stop when `‖r‖ ≤ tol · ‖b‖`
//! 4. `z = M⁻¹ r`, `β = (r, z)_new / (r, z)_old`, `p = z + β p`
//!
//! Reductions are sequential so that repeated solves of the same system are
//! bitwise identical regardless of thread count.

use rayon::prelude::*;

use super::assembly::Row;
use crate::solver::SolverError;
use crate::types::Preconditioner;

/// A symmetric positive definite operator with a sparse row structure.
pub trait SpdOperator: Sync {
    fn dim(&self) -> usize;

    /// `y = A x`.
    fn apply(&self, x: &[f64], y: &mut [f64]);

    fn diagonal(&self) -> &[f64];

    /// Off-diagonal couplings of row `r`, stored as positive weights
    /// (`A[r][c] = -g`).
    fn row(&self, r: usize) -> Row;
}

#[derive(Debug, Clone, Copy)]
pub struct PcgConfig {
    /// Relative residual target.
    pub tolerance: f64,
    pub max_iterations: usize,
    pub preconditioner: Preconditioner,
    /// Relaxation factor for SSOR, in `(0, 2)`.
    pub omega: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PcgResult {
    pub iterations: usize,
    /// `‖b - A x‖ / ‖b‖` at exit.
    pub relative_residual: f64,
}

fn vec_dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn vec_norm(a: &[f64]) -> f64 {
    vec_dot(a, a).sqrt()
}

/// `y += alpha * x`.
fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    y.par_iter_mut().zip(x.par_iter()).for_each(|(yi, xi)| *yi += alpha * xi);
}

fn precondition<A: SpdOperator + ?Sized>(
    op: &A,
    config: &PcgConfig,
    r: &[f64],
    z: &mut [f64],
) {
    match config.preconditioner {
        Preconditioner::Jacobi => {
            let diag = op.diagonal();
            z.par_iter_mut()
                .zip(r.par_iter())
                .zip(diag.par_iter())
                .for_each(|((zi, ri), di)| *zi = ri / di);
        }
        Preconditioner::Ssor => ssor(op, config.omega, r, z),
    }
}

/// Symmetric SOR sweep, `z = M⁻¹ r` with
/// `M = (D/ω - L) (D/ω)⁻¹ (D/ω - U) · ω/(2-ω)`.
fn ssor<A: SpdOperator + ?Sized>(op: &A, omega: f64, r: &[f64], z: &mut [f64]) {
    let diag = op.diagonal();
    let n = op.dim();
    let scale = 2.0 - omega;

    // Forward: (D - ωL) w = (2-ω) r.
    for i in 0..n {
        let lower: f64 = op
            .row(i)
            .iter()
            .filter(|&(c, _)| c < i)
            .map(|(c, g)| g * z[c])
            .sum();
        z[i] = (scale * r[i] + omega * lower) / diag[i];
    }
    // Backward: (D - ωU) z = D w.
    for i in (0..n).rev() {
        let upper: f64 = op
            .row(i)
            .iter()
            .filter(|&(c, _)| c > i)
            .map(|(c, g)| g * z[c])
            .sum();
        z[i] += omega * upper / diag[i];
    }
}

/// Solve `A x = b` in place, starting from the contents of `x`.
pub fn solve_pcg<A: SpdOperator + ?Sized>(
    op: &A,
    b: &[f64],
    x: &mut [f64],
    config: &PcgConfig,
) -> Result<PcgResult, SolverError> {
    let n = op.dim();
    if b.len() != n || x.len() != n {
        return Err(SolverError::InvalidField(format!(
            "system of size {n} given rhs of {} and guess of {}",
            b.len(),
            x.len()
        )));
    }

    let b_norm = vec_norm(b);
    if b_norm == 0.0 {
        x.iter_mut().for_each(|v| *v = 0.0);
        return Ok(PcgResult {
            iterations: 0,
            relative_residual: 0.0,
        });
    }

    let mut r = vec![0.0; n];
    op.apply(x, &mut r);
    r.par_iter_mut().zip(b.par_iter()).for_each(|(ri, bi)| *ri = bi - *ri);

    let mut rel = vec_norm(&r) / b_norm;
    if rel <= config.tolerance {
        return Ok(PcgResult {
            iterations: 0,
            relative_residual: rel,
        });
    }

    let mut z = vec![0.0; n];
    precondition(op, config, &r, &mut z);
    let mut p = z.clone();
    let mut ap = vec![0.0; n];
    let mut rz = vec_dot(&r, &z);

    for iter in 1..=config.max_iterations {
        op.apply(&p, &mut ap);
        let pap = vec_dot(&p, &ap);
        if !(pap.is_finite() && pap > 0.0) {
            return Err(SolverError::Breakdown(format!(
                "non-positive curvature p·Ap = {pap:e} at iteration {iter}"
            )));
        }
        let alpha = rz / pap;
        axpy(alpha, &p, x);
        axpy(-alpha, &ap, &mut r);

        rel = vec_norm(&r) / b_norm;
        if !rel.is_finite() {
            return Err(SolverError::Breakdown(format!(
                "residual became non-finite at iteration {iter}"
            )));
        }
        if rel <= config.tolerance {
            log::debug!("PCG converged in {iter} iterations (residual {rel:.3e})");
            return Ok(PcgResult {
                iterations: iter,
                relative_residual: rel,
            });
        }

        precondition(op, config, &r, &mut z);
        let rz_new = vec_dot(&r, &z);
        let beta = rz_new / rz;
        rz = rz_new;
        p.par_iter_mut()
            .zip(z.par_iter())
            .for_each(|(pi, zi)| *pi = zi + beta * *pi);
    }

    Err(SolverError::ConvergenceFailure {
        max_iter: config.max_iterations,
        residual: rel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// 1-D Dirichlet Laplacian with unit links, scaled by `weight`.
    struct Chain {
        diag: Vec<f64>,
        weight: f64,
    }

    impl Chain {
        fn new(n: usize, weight: f64) -> Self {
            Self {
                diag: vec![2.0 * weight; n],
                weight,
            }
        }
    }

    impl SpdOperator for Chain {
        fn dim(&self) -> usize {
            self.diag.len()
        }

        fn apply(&self, x: &[f64], y: &mut [f64]) {
            for (r, out) in y.iter_mut().enumerate() {
                let off: f64 = self.row(r).iter().map(|(c, g)| g * x[c]).sum();
                *out = self.diag[r] * x[r] - off;
            }
        }

        fn diagonal(&self) -> &[f64] {
            &self.diag
        }

        fn row(&self, r: usize) -> Row {
            let mut row = Row::new();
            if r > 0 {
                row.push(r - 1, self.weight);
            }
            if r + 1 < self.dim() {
                row.push(r + 1, self.weight);
            }
            row
        }
    }

    fn config(preconditioner: Preconditioner) -> PcgConfig {
        PcgConfig {
            tolerance: 1e-12,
            max_iterations: 5000,
            preconditioner,
            omega: 1.2,
        }
    }

    #[test]
    fn test_chain_linear_solution() {
        // Boundary values 0 and 1 folded into the rhs: solution is linear.
        let n = 19;
        for pc in [Preconditioner::Jacobi, Preconditioner::Ssor] {
            let op = Chain::new(n, 3.0);
            let mut b = vec![0.0; n];
            b[n - 1] = 3.0;
            let mut x = vec![0.0; n];
            let res = solve_pcg(&op, &b, &mut x, &config(pc)).unwrap();
            assert!(res.relative_residual <= 1e-12);
            for (i, xi) in x.iter().enumerate() {
                assert_relative_eq!(*xi, (i + 1) as f64 / (n + 1) as f64, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_preconditioners_agree() {
        let n = 120;
        let op = Chain::new(n, 1.0);
        let b: Vec<f64> = (0..n).map(|i| 1.0 + (i % 5) as f64).collect();
        let mut x_j = vec![0.0; n];
        let mut x_s = vec![0.0; n];
        solve_pcg(&op, &b, &mut x_j, &config(Preconditioner::Jacobi)).unwrap();
        solve_pcg(&op, &b, &mut x_s, &config(Preconditioner::Ssor)).unwrap();
        for (a, s) in x_j.iter().zip(&x_s) {
            assert_relative_eq!(*a, *s, max_relative = 1e-8);
        }
    }

    #[test]
    fn test_iteration_cap_is_an_error() {
        let n = 100;
        let op = Chain::new(n, 1.0);
        let mut b = vec![0.0; n];
        b[n - 1] = 1.0;
        let mut x = vec![0.0; n];
        let cfg = PcgConfig {
            max_iterations: 3,
            ..config(Preconditioner::Jacobi)
        };
        assert!(matches!(
            solve_pcg(&op, &b, &mut x, &cfg),
            Err(SolverError::ConvergenceFailure { max_iter: 3, .. })
        ));
    }

    #[test]
    fn test_zero_rhs_returns_zero() {
        let op = Chain::new(5, 1.0);
        let mut x = vec![1.0; 5];
        let res = solve_pcg(&op, &[0.0; 5], &mut x, &config(Preconditioner::Jacobi)).unwrap();
        assert_eq!(res.iterations, 0);
        assert!(x.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_repeat_solves_are_bitwise_identical() {
        let n = 64;
        let op = Chain::new(n, 0.7);
        let b: Vec<f64> = (0..n).map(|i| (i as f64).sin()).collect();
        let mut x1 = vec![0.0; n];
        let mut x2 = vec![0.0; n];
        solve_pcg(&op, &b, &mut x1, &config(Preconditioner::Jacobi)).unwrap();
        solve_pcg(&op, &b, &mut x2, &config(Preconditioner::Jacobi)).unwrap();
        assert_eq!(x1, x2);
    }
}
