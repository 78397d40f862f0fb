//! Job configuration deserialisation and validation.
//!
//! Job files are TOML, or JSON when the extension is `.json`. Every field
//! except the structure path has a default.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use blockade_core::conductivity::DEFAULT_MEMBRANE_CONDUCTIVITY;
use blockade_core::perturbation::DEFAULT_CUTOFF;
use blockade_core::types::{SimulationParams, SolverSettings, SweepRange};
use blockade_core::{SimulationError, SimulationResult};
use blockade_geometry::{Cylindrical, DoubleCone, PoreSpec, SimulationBox};

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub pore_geometry: PoreGeometryConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Explicit box; computed from the pore and sweep range when absent.
    #[serde(default)]
    pub box_dimensions: Option<BoxConfig>,
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    /// Analyte structure file (`.pdb`, `.ent`, `.pqr` or `.xyz`).
    #[serde(alias = "moving_pdb")]
    pub structure: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PoreGeometryConfig {
    /// `cylindrical` or `double_cone`, any case.
    pub pore_type: String,
    /// Cylinder radius, or the inner (waist) radius of a double cone (Å).
    pub pore_radius: f64,
    /// Double-cone radius at the membrane faces (Å); 1.5 × pore_radius when
    /// absent.
    pub outer_radius: Option<f64>,
    pub corner_radius: f64,
    pub chamfer_depth: Option<f64>,
    pub membrane_thickness: f64,
}

impl Default for PoreGeometryConfig {
    fn default() -> Self {
        Self {
            pore_type: "cylindrical".into(),
            pore_radius: 100.0,
            outer_radius: None,
            corner_radius: 0.0,
            chamfer_depth: None,
            membrane_thickness: 200.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Applied voltage (mV).
    pub voltage: f64,
    pub bulk_conductivity: f64,
    pub membrane_conductivity: f64,
    pub grid_resolution: f64,
    pub cutoff: f64,
    #[serde(alias = "use_vdw_radii")]
    pub use_element_radii: bool,
    pub default_radius: f64,
    pub solver: SolverSettings,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            voltage: 100.0,
            bulk_conductivity: 10.5,
            membrane_conductivity: DEFAULT_MEMBRANE_CONDUCTIVITY,
            grid_resolution: 1.0,
            cutoff: DEFAULT_CUTOFF,
            use_element_radii: true,
            default_radius: 1.5,
            solver: SolverSettings::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub z_start: f64,
    pub z_end: f64,
    pub z_step: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            z_start: 150.0,
            z_end: -150.0,
            z_step: 1.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_prefix: String,
    /// Directory for all output files (default: current directory).
    pub directory: PathBuf,
    /// Also write `<prefix>_results.json`.
    pub save_json: bool,
    /// Frames rendered by `preview`.
    pub preview_frames: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_prefix: "vertical_movement".into(),
            directory: PathBuf::from("."),
            save_json: false,
            preview_frames: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BoxConfig {
    pub x: [f64; 2],
    pub y: [f64; 2],
    pub z: [f64; 2],
}

impl JobConfig {
    /// Build the pore variant named by `pore_type`.
    pub fn pore(&self) -> SimulationResult<PoreSpec> {
        let g = &self.pore_geometry;
        match g.pore_type.trim().to_lowercase().as_str() {
            "cylindrical" => Ok(Cylindrical::new(
                g.pore_radius,
                g.membrane_thickness,
                g.corner_radius,
                g.chamfer_depth,
            )?
            .into()),
            "double_cone" => {
                let outer = g.outer_radius.unwrap_or(1.5 * g.pore_radius);
                Ok(DoubleCone::new(g.pore_radius, outer, g.membrane_thickness)?.into())
            }
            other => Err(SimulationError::Configuration(format!(
                "unknown pore_type '{other}'; expected 'cylindrical' or 'double_cone'"
            ))),
        }
    }

    /// Convert into validated simulation parameters.
    pub fn validate(&self) -> SimulationResult<SimulationParams> {
        let pore = self.pore()?;
        let m = &self.movement;
        let sim_box = match self.box_dimensions {
            Some(b) => SimulationBox::new((b.x[0], b.x[1]), (b.y[0], b.y[1]), (b.z[0], b.z[1]))?,
            None => SimulationBox::auto(&pore, m.z_start, m.z_end),
        };
        let s = &self.simulation;
        let params = SimulationParams {
            pore,
            sim_box,
            grid_resolution: s.grid_resolution,
            bulk_conductivity: s.bulk_conductivity,
            membrane_conductivity: s.membrane_conductivity,
            cutoff: s.cutoff,
            voltage_mv: s.voltage,
            sweep: SweepRange {
                z_start: m.z_start,
                z_end: m.z_end,
                z_step: m.z_step,
            },
            use_element_radii: s.use_element_radii,
            default_radius: s.default_radius,
            solver: s.solver.clone(),
        };
        params.validate()?;
        Ok(params)
    }
}

fn parse_config(content: &str, json: bool) -> anyhow::Result<JobConfig> {
    if json {
        Ok(serde_json::from_str(content)?)
    } else {
        Ok(toml::from_str(content)?)
    }
}

/// Load a job file. A relative structure path is taken relative to the
/// job file's directory.
pub fn load_config(path: &Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading configuration {}", path.display()))?;
    let json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let mut config = parse_config(&content, json)
        .with_context(|| format!("parsing configuration {}", path.display()))?;

    if config.input.structure.is_relative() {
        if let Some(dir) = path.parent() {
            config.input.structure = dir.join(&config.input.structure);
        }
    }
    log::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use blockade_core::types::Preconditioner;
    use blockade_geometry::PoreProfile;

    #[test]
    fn test_minimal_toml_takes_defaults() {
        let job = parse_config("[input]\nstructure = \"a.pdb\"\n", false).unwrap();
        let params = job.validate().unwrap();
        assert_eq!(params.pore.pore_type(), "cylindrical");
        assert_relative_eq!(params.bulk_conductivity, 10.5);
        assert_eq!(params.sweep.positions().len(), 301);
        assert!(params.use_element_radii);
        assert_eq!(job.output.output_prefix, "vertical_movement");
        // Auto box: half-thickness 100 + padding 20, sweep 150 + 20.
        assert_eq!(params.sim_box.z, (-170.0, 170.0));
        assert_eq!(params.sim_box.x, (-320.0, 320.0));
    }

    #[test]
    fn test_json_with_legacy_keys() {
        let text = r#"{
            "input": {"moving_pdb": "dna.pdb"},
            "pore_geometry": {"pore_type": "Double_Cone", "pore_radius": 20.0,
                              "outer_radius": 40.0, "membrane_thickness": 60.0},
            "simulation": {"voltage": 200.0, "bulk_conductivity": 11.2,
                           "grid_resolution": 2.0, "use_vdw_radii": false,
                           "default_radius": 1.8,
                           "solver": {"preconditioner": "ssor"}},
            "movement": {"z_start": 50.0, "z_end": -50.0, "z_step": 2.0},
            "output": {"output_prefix": "run1"},
            "box_dimensions": {"x": [-60, 60], "y": [-60, 60], "z": [-80, 80]}
        }"#;
        let job = parse_config(text, true).unwrap();
        assert_eq!(job.input.structure, PathBuf::from("dna.pdb"));
        let params = job.validate().unwrap();
        assert_eq!(params.pore.pore_type(), "double_cone");
        assert_relative_eq!(params.pore.local_radius(30.0), 40.0);
        assert!(!params.use_element_radii);
        assert_eq!(params.solver.preconditioner, Preconditioner::Ssor);
        assert_eq!(params.solver.max_iterations, 20_000);
        assert_eq!(params.sim_box.z, (-80.0, 80.0));
        assert_relative_eq!(params.voltage_volts(), 0.2);
    }

    #[test]
    fn test_double_cone_default_outer_radius() {
        let job = parse_config(
            "[input]\nstructure = \"a.xyz\"\n[pore_geometry]\npore_type = \"double_cone\"\npore_radius = 10.0\n",
            false,
        )
        .unwrap();
        let pore = job.pore().unwrap();
        assert_relative_eq!(pore.max_radius(), 15.0);
    }

    #[test]
    fn test_inconsistent_configs_rejected() {
        let bad = [
            "[pore_geometry]\npore_type = \"hexagonal\"",
            "[pore_geometry]\npore_type = \"double_cone\"\npore_radius = 20.0\nouter_radius = 10.0",
            "[pore_geometry]\ncorner_radius = -1.0",
            "[movement]\nz_step = 0.0",
            "[simulation]\ncutoff = 1.0",
            "[simulation]\ngrid_resolution = -1.0",
            "[box_dimensions]\nx = [1.0, -1.0]\ny = [-1.0, 1.0]\nz = [-1.0, 1.0]",
        ];
        for extra in bad {
            let text = format!("[input]\nstructure = \"a.pdb\"\n{extra}\n");
            let job = parse_config(&text, false).unwrap();
            assert!(job.validate().is_err(), "accepted: {extra}");
        }
    }

    #[test]
    fn test_missing_structure_is_a_parse_error() {
        assert!(parse_config("[movement]\nz_step = 1.0\n", false).is_err());
    }

    #[test]
    fn test_relative_structure_resolved_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.toml");
        std::fs::write(&path, "[input]\nstructure = \"mol.pdb\"\n").unwrap();
        let job = load_config(&path).unwrap();
        assert_eq!(job.input.structure, dir.path().join("mol.pdb"));
    }
}
