//! Nodal fields exchanged with a solver.

use super::{SolverError, StructuredDomain};

/// Conductivity at every node of a domain.
///
/// A buffer can only be created from a complete sample vector, so a solver
/// never sees a partially written field.
#[derive(Debug, Clone, PartialEq)]
pub struct ConductivityBuffer {
    values: Vec<f64>,
}

impl ConductivityBuffer {
    /// Take ownership of one sample per node. Every value must be finite
    /// and positive.
    pub fn from_samples(domain: &StructuredDomain, samples: Vec<f64>) -> Result<Self, SolverError> {
        if samples.len() != domain.node_count() {
            return Err(SolverError::InvalidField(format!(
                "expected {} samples, got {}",
                domain.node_count(),
                samples.len()
            )));
        }
        if let Some((n, v)) = samples
            .iter()
            .enumerate()
            .find(|(_, v)| !(v.is_finite() && **v > 0.0))
        {
            return Err(SolverError::InvalidField(format!(
                "conductivity at node {n} is {v}; values must be finite and positive"
            )));
        }
        Ok(Self { values: samples })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Solved potential at every node (V), with solve statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct PotentialField {
    values: Vec<f64>,
    iterations: usize,
    residual: f64,
}

impl PotentialField {
    pub(crate) fn new(values: Vec<f64>, iterations: usize, residual: f64) -> Self {
        Self {
            values,
            iterations,
            residual,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Final relative residual.
    pub fn residual(&self) -> f64 {
        self.residual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockade_geometry::SimulationBox;

    fn domain() -> StructuredDomain {
        let b = SimulationBox::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)).unwrap();
        StructuredDomain::build(&b, 1.0, 400).unwrap()
    }

    #[test]
    fn test_complete_buffer_accepted() {
        let d = domain();
        let buf = ConductivityBuffer::from_samples(&d, vec![1.0; 27]).unwrap();
        assert_eq!(buf.len(), 27);
    }

    #[test]
    fn test_partial_or_invalid_rejected() {
        let d = domain();
        assert!(ConductivityBuffer::from_samples(&d, vec![1.0; 26]).is_err());
        let mut v = vec![1.0; 27];
        v[13] = 0.0;
        assert!(ConductivityBuffer::from_samples(&d, v.clone()).is_err());
        v[13] = f64::NAN;
        assert!(ConductivityBuffer::from_samples(&d, v).is_err());
    }
}
