//! The analyte: atoms with radii and masses, and its centre of mass.
//!
//! Positions are never mutated. Each sweep step asks for a translated copy
//! of the coordinates with the centre of mass moved to a target height.

use blockade_elements::{
    assign_radii, AtomIdentity, RadiusProvider, RadiusReport, UniformRadius, VanDerWaalsRadii,
};
use blockade_geometry::parsers::ParsedAtom;
use nalgebra::Vector3;

use crate::error::{SimulationError, SimulationResult};

/// One atom with its resolved radius.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Position (Å).
    pub position: Vector3<f64>,
    /// Excluded-volume radius (Å).
    pub radius: f64,
    /// Element key used for lookup.
    pub element: String,
    /// Atomic mass (u); zero when the element is not tabulated.
    pub mass: f64,
}

/// Where atom radii come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusSource {
    /// Tabulated van der Waals radius per element, `default_radius` when unknown.
    ElementSpecific { default_radius: f64 },
    /// File-provided radius when present and positive, else `default_radius`.
    Uniform { default_radius: f64 },
}

impl RadiusSource {
    pub fn new(use_element_radii: bool, default_radius: f64) -> Self {
        if use_element_radii {
            RadiusSource::ElementSpecific { default_radius }
        } else {
            RadiusSource::Uniform { default_radius }
        }
    }
}

/// Ordered atoms plus their centre of mass.
#[derive(Debug, Clone)]
pub struct AnalyteStructure {
    atoms: Vec<AtomRecord>,
    center_of_mass: Vector3<f64>,
}

impl AnalyteStructure {
    pub fn new(atoms: Vec<AtomRecord>) -> SimulationResult<Self> {
        if atoms.is_empty() {
            return Err(SimulationError::Configuration("analyte has no atoms".into()));
        }
        if let Some(bad) = atoms.iter().find(|a| !(a.radius.is_finite() && a.radius > 0.0)) {
            return Err(SimulationError::Configuration(format!(
                "atom radius must be positive, got {} for {}",
                bad.radius, bad.element
            )));
        }
        let center_of_mass = center_of_mass(&atoms);
        Ok(Self {
            atoms,
            center_of_mass,
        })
    }

    /// Assign radii and masses to parsed atoms.
    ///
    /// The returned report lists per-element counts and the identities that
    /// fell back to the default radius; logging it is left to the caller.
    pub fn from_parsed(
        parsed: &[ParsedAtom],
        source: RadiusSource,
    ) -> SimulationResult<(Self, RadiusReport)> {
        let identities = parsed.iter().map(|a| {
            AtomIdentity::from_fields(
                a.element.as_deref(),
                a.name.as_deref(),
                a.atom_type.as_deref(),
            )
        });

        let (resolutions, report) = match source {
            RadiusSource::ElementSpecific { default_radius } => {
                let provider = VanDerWaalsRadii::new(default_radius)
                    .map_err(|e| SimulationError::Configuration(e.to_string()))?;
                assign_radii(&provider as &dyn RadiusProvider, identities)
            }
            RadiusSource::Uniform { default_radius } => {
                let provider = UniformRadius::new(default_radius)
                    .map_err(|e| SimulationError::Configuration(e.to_string()))?;
                assign_radii(&provider as &dyn RadiusProvider, identities)
            }
        };

        let use_file_radius = matches!(source, RadiusSource::Uniform { .. });
        let atoms = parsed
            .iter()
            .zip(resolutions)
            .map(|(p, res)| {
                let radius = match p.radius {
                    Some(r) if use_file_radius && r.is_finite() && r > 0.0 => r,
                    _ => res.radius,
                };
                AtomRecord {
                    position: Vector3::from(p.position),
                    radius,
                    element: res.key,
                    mass: res.mass.unwrap_or(0.0),
                }
            })
            .collect();

        Ok((Self::new(atoms)?, report))
    }

    pub fn atoms(&self) -> &[AtomRecord] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn center_of_mass(&self) -> Vector3<f64> {
        self.center_of_mass
    }

    pub fn radii(&self) -> Vec<f64> {
        self.atoms.iter().map(|a| a.radius).collect()
    }

    pub fn max_radius(&self) -> f64 {
        self.atoms.iter().map(|a| a.radius).fold(0.0, f64::max)
    }

    /// Atom positions with the centre of mass moved to height `z`; x and y
    /// are unchanged.
    pub fn positions_at(&self, z: f64) -> Vec<[f64; 3]> {
        let shift = Vector3::new(0.0, 0.0, z - self.center_of_mass.z);
        self.atoms
            .iter()
            .map(|a| {
                let p = a.position + shift;
                [p.x, p.y, p.z]
            })
            .collect()
    }
}

/// Mass-weighted mean position; the plain centroid when no mass is known.
fn center_of_mass(atoms: &[AtomRecord]) -> Vector3<f64> {
    let total: f64 = atoms.iter().map(|a| a.mass).sum();
    if total > 0.0 {
        atoms
            .iter()
            .fold(Vector3::zeros(), |acc, a| acc + a.position * a.mass)
            / total
    } else {
        atoms.iter().fold(Vector3::zeros(), |acc, a| acc + a.position) / atoms.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parsed(element: &str, position: [f64; 3], radius: Option<f64>) -> ParsedAtom {
        ParsedAtom {
            position,
            element: Some(element.to_string()),
            name: None,
            atom_type: None,
            radius,
        }
    }

    #[test]
    fn test_element_radii_and_masses() {
        let atoms = [
            parsed("C", [0.0, 0.0, 0.0], None),
            parsed("O", [0.0, 0.0, 1.2], None),
            parsed("Xx", [5.0, 0.0, 0.0], None),
        ];
        let (analyte, report) =
            AnalyteStructure::from_parsed(&atoms, RadiusSource::new(true, 1.5)).unwrap();
        assert_relative_eq!(analyte.atoms()[0].radius, 1.70);
        assert_relative_eq!(analyte.atoms()[1].radius, 1.52);
        assert_relative_eq!(analyte.atoms()[2].radius, 1.5);
        assert_eq!(analyte.atoms()[2].mass, 0.0);
        assert_eq!(report.unresolved_atoms(), 1);

        // Untabulated atom carries no mass.
        let com = analyte.center_of_mass();
        let expected_z = 15.999 * 1.2 / (12.011 + 15.999);
        assert_relative_eq!(com.z, expected_z, epsilon = 1e-12);
        assert_relative_eq!(com.x, 0.0);
    }

    #[test]
    fn test_uniform_prefers_file_radius() {
        let atoms = [
            parsed("C", [0.0, 0.0, 0.0], Some(2.2)),
            parsed("C", [0.0, 0.0, 0.0], Some(0.0)),
            parsed("C", [0.0, 0.0, 0.0], None),
        ];
        let (analyte, _) =
            AnalyteStructure::from_parsed(&atoms, RadiusSource::new(false, 1.8)).unwrap();
        assert_eq!(analyte.radii(), vec![2.2, 1.8, 1.8]);
    }

    #[test]
    fn test_centroid_fallback_and_translation() {
        let atoms = vec![
            AtomRecord {
                position: Vector3::new(1.0, 2.0, 0.0),
                radius: 1.0,
                element: "UNKNOWN".into(),
                mass: 0.0,
            },
            AtomRecord {
                position: Vector3::new(3.0, 2.0, 4.0),
                radius: 1.0,
                element: "UNKNOWN".into(),
                mass: 0.0,
            },
        ];
        let analyte = AnalyteStructure::new(atoms).unwrap();
        assert_relative_eq!(analyte.center_of_mass().z, 2.0);

        let moved = analyte.positions_at(-10.0);
        assert_eq!(moved[0], [1.0, 2.0, -12.0]);
        assert_eq!(moved[1], [3.0, 2.0, -8.0]);
        // Original coordinates untouched.
        assert_relative_eq!(analyte.atoms()[0].position.z, 0.0);
    }

    #[test]
    fn test_empty_analyte_rejected() {
        assert!(AnalyteStructure::new(Vec::new()).is_err());
    }
}
