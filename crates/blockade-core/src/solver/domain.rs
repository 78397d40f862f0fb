//! Structured node grid over the simulation box.
//!
//! The box is divided into `nx × ny × nz` hexahedral elements, giving
//! `(nx+1)(ny+1)(nz+1)` nodes. Nodes are numbered with x fastest and z
//! slowest, so each z layer is a contiguous block.

use blockade_geometry::SimulationBox;

use super::SolverError;

/// Regular node grid covering a [`SimulationBox`].
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredDomain {
    origin: [f64; 3],
    spacing: [f64; 3],
    elements: [usize; 3],
    downscaled: bool,
}

impl StructuredDomain {
    /// Size the grid from the box extent and requested resolution.
    ///
    /// Element counts are `trunc(extent / resolution)`. If any count exceeds
    /// `max_elements`, all three are scaled by the same factor to keep the
    /// aspect ratio, and a warning is logged.
    pub fn build(
        sim_box: &SimulationBox,
        resolution: f64,
        max_elements: usize,
    ) -> Result<Self, SolverError> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(SolverError::InvalidDomain(format!(
                "resolution must be positive, got {resolution}"
            )));
        }
        let lengths = sim_box.lengths();
        let mut elements = lengths.map(|l| (l / resolution) as usize);

        let largest = elements.iter().copied().max().unwrap_or(0);
        let downscaled = largest > max_elements;
        if downscaled {
            let scale = max_elements as f64 / largest as f64;
            elements = elements.map(|n| (n as f64 * scale) as usize);
            log::warn!(
                "Reduced mesh resolution to {}x{}x{} elements (cap {} per axis)",
                elements[0],
                elements[1],
                elements[2],
                max_elements
            );
        }

        if elements[0] < 1 || elements[1] < 1 || elements[2] < 2 {
            return Err(SolverError::InvalidDomain(format!(
                "mesh {}x{}x{} is too coarse; need at least 1x1x2 elements",
                elements[0], elements[1], elements[2]
            )));
        }

        let spacing = [
            lengths[0] / elements[0] as f64,
            lengths[1] / elements[1] as f64,
            lengths[2] / elements[2] as f64,
        ];
        log::info!(
            "Created mesh with {}x{}x{} elements",
            elements[0],
            elements[1],
            elements[2]
        );

        Ok(Self {
            origin: sim_box.min_corner(),
            spacing,
            elements,
            downscaled,
        })
    }

    /// Element counts `[nx, ny, nz]`.
    pub fn elements(&self) -> [usize; 3] {
        self.elements
    }

    /// Node counts per axis, `[nx+1, ny+1, nz+1]`.
    pub fn nodes_per_axis(&self) -> [usize; 3] {
        self.elements.map(|n| n + 1)
    }

    pub fn node_count(&self) -> usize {
        self.nodes_per_axis().iter().product()
    }

    /// Nodes in one z layer.
    pub fn layer_len(&self) -> usize {
        let [nx1, ny1, _] = self.nodes_per_axis();
        nx1 * ny1
    }

    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    pub fn was_downscaled(&self) -> bool {
        self.downscaled
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        let [nx1, ny1, _] = self.nodes_per_axis();
        (k * ny1 + j) * nx1 + i
    }

    #[inline]
    pub fn coords(&self, idx: usize) -> (usize, usize, usize) {
        let [nx1, ny1, _] = self.nodes_per_axis();
        (idx % nx1, (idx / nx1) % ny1, idx / (nx1 * ny1))
    }

    pub fn node_position(&self, idx: usize) -> [f64; 3] {
        let (i, j, k) = self.coords(idx);
        [
            self.origin[0] + i as f64 * self.spacing[0],
            self.origin[1] + j as f64 * self.spacing[1],
            self.origin[2] + k as f64 * self.spacing[2],
        ]
    }

    /// Positions of every node, in index order.
    pub fn node_positions(&self) -> Vec<[f64; 3]> {
        (0..self.node_count()).map(|n| self.node_position(n)).collect()
    }

    /// Width of the dual cell around node `n` along `axis`: one spacing
    /// inside, half a spacing on the boundary.
    #[inline]
    pub(crate) fn dual_width(&self, axis: usize, n: usize) -> f64 {
        let last = self.elements[axis];
        if n == 0 || n == last {
            0.5 * self.spacing[axis]
        } else {
            self.spacing[axis]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sim_box(z: (f64, f64)) -> SimulationBox {
        SimulationBox::new((-10.0, 10.0), (-5.0, 5.0), z).unwrap()
    }

    #[test]
    fn test_node_layout() {
        let d = StructuredDomain::build(&sim_box((0.0, 8.0)), 2.0, 400).unwrap();
        assert_eq!(d.elements(), [10, 5, 4]);
        assert_eq!(d.node_count(), 11 * 6 * 5);
        assert_eq!(d.layer_len(), 66);

        let idx = d.index(3, 2, 1);
        assert_eq!(d.coords(idx), (3, 2, 1));
        assert_eq!(d.node_position(idx), [-4.0, -1.0, 2.0]);
        let last = d.node_count() - 1;
        assert_eq!(d.node_position(last), [10.0, 5.0, 8.0]);
    }

    #[test]
    fn test_cap_downscales_uniformly() {
        let d = StructuredDomain::build(&sim_box((0.0, 100.0)), 0.5, 100).unwrap();
        // Unscaled 40 x 20 x 200; scale 0.5.
        assert_eq!(d.elements(), [20, 10, 100]);
        assert!(d.was_downscaled());
        assert_relative_eq!(d.spacing()[2], 1.0);
    }

    #[test]
    fn test_truncates_partial_elements() {
        let d = StructuredDomain::build(&sim_box((0.0, 9.0)), 2.0, 400).unwrap();
        assert_eq!(d.elements()[2], 4);
        assert_relative_eq!(d.spacing()[2], 2.25);
    }

    #[test]
    fn test_too_coarse() {
        assert!(matches!(
            StructuredDomain::build(&sim_box((0.0, 3.0)), 2.0, 400),
            Err(SolverError::InvalidDomain(_))
        ));
    }

    #[test]
    fn test_dual_widths() {
        let d = StructuredDomain::build(&sim_box((0.0, 8.0)), 2.0, 400).unwrap();
        assert_relative_eq!(d.dual_width(0, 0), 1.0);
        assert_relative_eq!(d.dual_width(0, 5), 2.0);
        assert_relative_eq!(d.dual_width(2, 4), 1.0);
    }
}
