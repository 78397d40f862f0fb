//! x–z conductivity slices for checking a setup before running a sweep.

use blockade_geometry::SimulationBox;
use ndarray::Array2;

use crate::analyte::AnalyteStructure;
use crate::assembler::FieldAssembler;
use crate::conductivity::axis;
use crate::error::{SimulationError, SimulationResult};

/// Combined conductivity on the `y = y_mid` plane with the analyte at one
/// height. Rows are x, columns are z.
#[derive(Debug, Clone)]
pub struct PreviewSlice {
    pub z_position: f64,
    pub x_coords: Vec<f64>,
    pub z_coords: Vec<f64>,
    pub values: Array2<f64>,
}

/// Sample the assembled field on the box's y-midplane.
pub fn conductivity_slice(
    assembler: &FieldAssembler,
    analyte: &AnalyteStructure,
    sim_box: &SimulationBox,
    resolution: f64,
    z_position: f64,
) -> SimulationResult<PreviewSlice> {
    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(SimulationError::Configuration(format!(
            "preview resolution must be positive, got {resolution}"
        )));
    }
    let x_coords = axis(sim_box.x.0, sim_box.x.1, resolution);
    let z_coords = axis(sim_box.z.0, sim_box.z.1, resolution);
    let y = sim_box.y_mid();

    let points: Vec<[f64; 3]> = x_coords
        .iter()
        .flat_map(|&x| z_coords.iter().map(move |&z| [x, y, z]))
        .collect();
    let flat = assembler.analyte_field(analyte, z_position, &points);
    let values = Array2::from_shape_vec((x_coords.len(), z_coords.len()), flat)
        .map_err(|e| SimulationError::Configuration(format!("preview slice shape: {e}")))?;

    Ok(PreviewSlice {
        z_position,
        x_coords,
        z_coords,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyte::AtomRecord;
    use crate::conductivity::BaseConductivityGrid;
    use crate::perturbation::PerturbationModel;
    use blockade_geometry::Cylindrical;
    use nalgebra::Vector3;

    #[test]
    fn test_slice_shows_membrane_and_atom() {
        let pore = Cylindrical::new(10.0, 10.0, 0.0, None).unwrap();
        let sim_box = SimulationBox::new((-20.0, 20.0), (-20.0, 20.0), (-20.0, 20.0)).unwrap();
        let base = BaseConductivityGrid::build(&pore, &sim_box, 1.0, 10.0, 1e-4).unwrap();
        let assembler = FieldAssembler::new(base, PerturbationModel::new(10.0, 4.1).unwrap());
        let analyte = AnalyteStructure::new(vec![AtomRecord {
            position: Vector3::zeros(),
            radius: 2.0,
            element: "C".into(),
            mass: 12.0,
        }])
        .unwrap();

        let slice = conductivity_slice(&assembler, &analyte, &sim_box, 1.0, 0.0).unwrap();
        assert_eq!(slice.values.dim(), (41, 41));

        // x = -20 + i, z = -20 + k.
        let at = |x: f64, z: f64| slice.values[[(x + 20.0) as usize, (z + 20.0) as usize]];
        assert_eq!(at(15.0, 0.0), 1e-4);
        assert_eq!(at(15.0, 15.0), 10.0);
        assert!(at(0.0, 0.0) < 1e-5);
        assert_eq!(at(-8.0, 0.0), 10.0);
    }
}
