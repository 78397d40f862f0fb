//! Axis-aligned simulation boxes.

use serde::{Deserialize, Serialize};

use crate::pore::{GeometryError, PoreProfile};

/// Clearance added around the membrane and the sweep range (Å).
pub const AUTO_PADDING: f64 = 20.0;

/// Smallest lateral half-width of an automatic box (Å).
pub const MIN_LATERAL_HALF_WIDTH: f64 = 150.0;

/// Axis-aligned `(min, max)` bounds per dimension, in angstroms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationBox {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
}

impl SimulationBox {
    pub fn new(x: (f64, f64), y: (f64, f64), z: (f64, f64)) -> Result<Self, GeometryError> {
        for (axis, (lo, hi)) in [("x", x), ("y", y), ("z", z)] {
            if !(lo.is_finite() && hi.is_finite() && hi > lo) {
                return Err(GeometryError::InvalidBox(format!(
                    "{axis} bounds ({lo}, {hi}) must be finite with max > min"
                )));
            }
        }
        Ok(Self { x, y, z })
    }

    /// Size a box around the pore and the analyte's sweep range.
    ///
    /// The lateral half-width is `max(150, 3 r_max + padding)`; vertically
    /// the box covers both the membrane and the sweep range with padding,
    /// whichever direction the sweep runs.
    pub fn auto<P: PoreProfile + ?Sized>(pore: &P, z_start: f64, z_end: f64) -> Self {
        let half_width = MIN_LATERAL_HALF_WIDTH.max(pore.max_radius() * 3.0 + AUTO_PADDING);
        let ht = pore.half_thickness();
        let z_min = (-ht - AUTO_PADDING).min(z_start.min(z_end) - AUTO_PADDING);
        let z_max = (ht + AUTO_PADDING).max(z_start.max(z_end) + AUTO_PADDING);
        Self {
            x: (-half_width, half_width),
            y: (-half_width, half_width),
            z: (z_min, z_max),
        }
    }

    /// Extent along each axis.
    pub fn lengths(&self) -> [f64; 3] {
        [
            self.x.1 - self.x.0,
            self.y.1 - self.y.0,
            self.z.1 - self.z.0,
        ]
    }

    pub fn min_corner(&self) -> [f64; 3] {
        [self.x.0, self.y.0, self.z.0]
    }

    pub fn max_corner(&self) -> [f64; 3] {
        [self.x.1, self.y.1, self.z.1]
    }

    /// Midpoint of the y range, used for x-z preview slices.
    pub fn y_mid(&self) -> f64 {
        0.5 * (self.y.0 + self.y.1)
    }

    pub fn contains(&self, p: [f64; 3]) -> bool {
        (self.x.0..=self.x.1).contains(&p[0])
            && (self.y.0..=self.y.1).contains(&p[1])
            && (self.z.0..=self.z.1).contains(&p[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pore::{Cylindrical, DoubleCone};
    use approx::assert_relative_eq;

    #[test]
    fn test_auto_box_default_sweep() {
        let pore = Cylindrical::new(100.0, 200.0, 0.0, None).unwrap();
        let b = SimulationBox::auto(&pore, 150.0, -150.0);
        // 3 * 100 + 20 = 320 > 150
        assert_eq!(b.x, (-320.0, 320.0));
        assert_eq!(b.y, (-320.0, 320.0));
        assert_eq!(b.z, (-170.0, 170.0));
    }

    #[test]
    fn test_auto_box_small_pore_uses_minimum() {
        let pore = DoubleCone::new(10.0, 30.0, 40.0).unwrap();
        let b = SimulationBox::auto(&pore, 5.0, -5.0);
        assert_eq!(b.x, (-150.0, 150.0));
        // Membrane dominates the sweep range.
        assert_eq!(b.z, (-40.0, 40.0));
    }

    #[test]
    fn test_explicit_box_validation() {
        assert!(SimulationBox::new((-1.0, 1.0), (-1.0, 1.0), (1.0, 1.0)).is_err());
        assert!(SimulationBox::new((-1.0, 1.0), (f64::NAN, 1.0), (0.0, 1.0)).is_err());
        let b = SimulationBox::new((-10.0, 10.0), (0.0, 4.0), (-5.0, 5.0)).unwrap();
        assert_eq!(b.lengths(), [20.0, 4.0, 10.0]);
        assert_relative_eq!(b.y_mid(), 2.0);
        assert!(b.contains([0.0, 1.0, 5.0]));
        assert!(!b.contains([0.0, 1.0, 5.1]));
    }
}
