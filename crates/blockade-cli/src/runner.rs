//! Simulation runner: loads the analyte, drives the sweep and writes
//! output files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use blockade_core::analyte::{AnalyteStructure, RadiusSource};
use blockade_core::assembler::FieldAssembler;
use blockade_core::conductivity::BaseConductivityGrid;
use blockade_core::perturbation::PerturbationModel;
use blockade_core::preview::{conductivity_slice, PreviewSlice};
use blockade_core::sweep::{preview_frame_indices, StepSink, SweepDriver};
use blockade_core::types::{SimulationParams, StepRecord, SweepResult};
use blockade_core::SimulationResult;
use blockade_elements::resolver::{element_key, AtomIdentity, RadiusReport};
use blockade_elements::table::{self, ELEMENTS};
use blockade_elements::{RadiusProvider, VanDerWaalsRadii};
use blockade_geometry::parsers::load_structure;

use crate::config::JobConfig;

/// Writes `<prefix>_position_<i>.dat` as soon as each step finishes.
pub struct FileStepSink {
    directory: PathBuf,
    prefix: String,
}

impl FileStepSink {
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    pub fn step_path(&self, index: usize) -> PathBuf {
        self.directory
            .join(format!("{}_position_{:04}.dat", self.prefix, index))
    }
}

impl StepSink for FileStepSink {
    fn record(&mut self, step: &StepRecord) -> SimulationResult<()> {
        let line = format!("{} {} {}\n", step.z_position, step.current, step.blockage);
        std::fs::write(self.step_path(step.index), line)?;
        Ok(())
    }
}

/// Log per-element counts and any identities that fell back to the default.
pub fn log_radius_report(report: &RadiusReport) {
    log::info!(
        "Assigned radii to {} atoms using {}",
        report.total_atoms(),
        report.provider
    );
    for (key, e) in &report.elements {
        log::info!("  {}: {} atoms (radius: {:.2} Å)", key, e.count, e.radius);
    }
    if !report.unresolved.is_empty() {
        log::warn!(
            "{} atoms with unrecognised elements used the default radius: {}",
            report.unresolved_atoms(),
            report
                .unresolved
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
}

/// Read the structure file and assign radii.
pub fn load_analyte(job: &JobConfig, params: &SimulationParams) -> Result<AnalyteStructure> {
    let path = &job.input.structure;
    let atoms = load_structure(path)
        .with_context(|| format!("loading structure {}", path.display()))?;
    log::info!("Loaded {} atoms from {}", atoms.len(), path.display());

    let source = RadiusSource::new(params.use_element_radii, params.default_radius);
    let (analyte, report) = AnalyteStructure::from_parsed(&atoms, source)?;
    log_radius_report(&report);
    let com = analyte.center_of_mass();
    log::info!(
        "Analyte centre of mass: ({:.2}, {:.2}, {:.2}) Å",
        com.x,
        com.y,
        com.z
    );
    Ok(analyte)
}

/// Log the settings a run will use.
pub fn log_summary(job: &JobConfig, params: &SimulationParams) {
    let g = &job.pore_geometry;
    log::info!("Configuration summary:");
    log::info!("  Structure: {}", job.input.structure.display());
    log::info!("  Pore type: {}", params.pore.pore_type());
    log::info!("  Pore radius: {} Å", g.pore_radius);
    if g.corner_radius > 0.0 {
        log::info!("  Corner radius: {} Å", g.corner_radius);
    }
    if let Some(outer) = g.outer_radius {
        log::info!("  Outer radius: {} Å", outer);
    }
    log::info!("  Membrane thickness: {} Å", g.membrane_thickness);
    log::info!("  Voltage: {} mV", params.voltage_mv);
    log::info!("  Bulk conductivity: {} S/m", params.bulk_conductivity);
    log::info!("  Element-specific radii: {}", params.use_element_radii);
    log::info!(
        "  Z range: {} to {} Å, step {} Å ({} positions)",
        params.sweep.z_start,
        params.sweep.z_end,
        params.sweep.z_step,
        params.sweep.count()
    );
    let b = &params.sim_box;
    log::info!(
        "  Box: x [{}, {}], y [{}, {}], z [{}, {}] Å",
        b.x.0,
        b.x.1,
        b.y.0,
        b.y.1,
        b.z.0,
        b.z.1
    );
    log::info!("  Output prefix: {}", job.output.output_prefix);
}

/// Run the full sweep, writing per-step files into `out_dir`.
pub fn run_simulation(job: &JobConfig, out_dir: &Path) -> Result<SweepResult> {
    let params = job.validate()?;
    log_summary(job, &params);
    let analyte = load_analyte(job, &params)?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let mut sink = FileStepSink::new(out_dir, job.output.output_prefix.clone());

    let mut driver = SweepDriver::from_params(params, analyte)?;
    let result = driver.run(&mut sink)?;
    Ok(result)
}

/// Header line of the aggregate results file.
pub fn results_header(result: &SweepResult) -> String {
    let mut header = format!(
        "Z_position(Angstrom) Current(Ampere) Normalized_Current Blockage(%) # Pore_type: {}",
        result.pore.pore_type()
    );
    if result.use_element_radii {
        header.push_str(" - Using element-specific radii");
    }
    header
}

/// Write the aggregate `z current normalized blockage` table.
pub fn write_results(result: &SweepResult, path: &Path) -> Result<()> {
    let mut file = BufWriter::new(
        File::create(path).with_context(|| format!("creating {}", path.display()))?,
    );
    writeln!(file, "# {}", results_header(result))?;
    for s in &result.steps {
        writeln!(
            file,
            "{:.18e} {:.18e} {:.18e} {:.18e}",
            s.z_position, s.current, s.normalized_current, s.blockage
        )?;
    }
    file.flush()?;
    println!("Results written to: {}", path.display());
    Ok(())
}

/// Write the full result as pretty JSON.
pub fn write_results_json(result: &SweepResult, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("serialising results")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    println!("Results (JSON) written to: {}", path.display());
    Ok(())
}

/// Write one slice as a whitespace-separated matrix (rows = x, columns = z).
pub fn write_slice(slice: &PreviewSlice, path: &Path) -> Result<()> {
    let mut file = BufWriter::new(
        File::create(path).with_context(|| format!("creating {}", path.display()))?,
    );
    for row in slice.values.rows() {
        let line: Vec<String> = row.iter().map(|v| format!("{v:.18e}")).collect();
        writeln!(file, "{}", line.join(" "))?;
    }
    file.flush()?;
    Ok(())
}

/// Render conductivity slices at evenly spaced sweep positions without
/// solving. Returns the files written.
pub fn run_preview(job: &JobConfig, out_dir: &Path, frames: usize) -> Result<Vec<PathBuf>> {
    let params = job.validate()?;
    log_summary(job, &params);
    let analyte = load_analyte(job, &params)?;

    let base = BaseConductivityGrid::build(
        &params.pore,
        &params.sim_box,
        params.grid_resolution,
        params.bulk_conductivity,
        params.membrane_conductivity,
    )?;
    let model = PerturbationModel::new(params.bulk_conductivity, params.cutoff)?;
    let assembler = FieldAssembler::new(base, model);

    let positions = params.sweep.positions();
    let indices = preview_frame_indices(positions.len(), frames);
    log::info!(
        "Selecting {} preview frames from {} positions",
        indices.len(),
        positions.len()
    );

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let mut written = Vec::with_capacity(indices.len());
    for (n, &frame) in indices.iter().enumerate() {
        let z = positions[frame];
        log::info!(
            "Creating preview frame {}/{} at Z = {:.1} Å",
            n + 1,
            indices.len(),
            z
        );
        let slice = conductivity_slice(
            &assembler,
            &analyte,
            &params.sim_box,
            params.grid_resolution,
            z,
        )?;
        let path = out_dir.join(format!(
            "{}_{}_preview_frame_{:04}_z_{:.1}A.dat",
            job.output.output_prefix,
            params.pore.pore_type(),
            frame,
            z
        ));
        write_slice(&slice, &path)?;
        written.push(path);
    }
    Ok(written)
}

/// Print the radius table, or resolve the given identities.
pub fn print_radii(identities: &[String], default_radius: f64) -> Result<()> {
    if identities.is_empty() {
        println!("{:<6} {:>10} {:>12}", "Symbol", "Radius (Å)", "Mass (u)");
        for e in ELEMENTS {
            println!("{:<6} {:>10.2} {:>12.3}", e.symbol, e.vdw_radius, e.mass);
        }
        return Ok(());
    }

    let provider = VanDerWaalsRadii::new(default_radius)?;
    for raw in identities {
        let id = AtomIdentity::Symbol(raw);
        let res = provider.resolve(&id);
        let mass = table::atomic_mass(&element_key(&id))
            .map(|m| format!("{m:.3} u"))
            .unwrap_or_else(|| "-".into());
        let note = if res.known { "" } else { " (default)" };
        println!("{raw:<8} -> {:<4} {:.2} Å{note}  {mass}", res.key, res.radius);
    }
    Ok(())
}
