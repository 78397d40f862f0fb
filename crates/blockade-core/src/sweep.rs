//! Open-pore baseline and position sweep.
//!
//! A [`SweepDriver`] moves through
//! `Initialized → OpenPoreComputed → Sweeping → Completed`. The open-pore
//! current is computed once from the base field and normalises every later
//! step. Each step assembles a fresh conductivity buffer, solves, and hands
//! the record to a [`StepSink`] before the next step starts. Any failure
//! aborts the whole sweep.

use crate::analyte::AnalyteStructure;
use crate::assembler::FieldAssembler;
use crate::conductivity::BaseConductivityGrid;
use crate::error::{SimulationError, SimulationResult};
use crate::perturbation::PerturbationModel;
use crate::solver::fv::FiniteVolumeSolver;
use crate::solver::{
    BoundaryConditions, ConductionSolver, ConductivityBuffer, CurrentMeasurement,
    StructuredDomain, ANGSTROM,
};
use crate::types::{SimulationParams, StepRecord, SweepResult};

/// Open-pore currents below this fraction of the uniform-medium estimate
/// are treated as zero.
pub const DEGENERATE_FRACTION: f64 = 1e-12;

/// Progress of a [`SweepDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    Initialized,
    OpenPoreComputed,
    /// Working on position `index` of `total`.
    Sweeping { index: usize, total: usize },
    Completed,
}

/// Receives each step as soon as it is measured.
pub trait StepSink {
    fn record(&mut self, step: &StepRecord) -> SimulationResult<()>;
}

impl StepSink for Vec<StepRecord> {
    fn record(&mut self, step: &StepRecord) -> SimulationResult<()> {
        self.push(*step);
        Ok(())
    }
}

/// Discards steps; the caller only wants the aggregate result.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StepSink for NullSink {
    fn record(&mut self, _step: &StepRecord) -> SimulationResult<()> {
        Ok(())
    }
}

/// Drives the baseline solve and the sweep over one solver instance.
pub struct SweepDriver<S: ConductionSolver> {
    solver: S,
    assembler: FieldAssembler,
    analyte: AnalyteStructure,
    params: SimulationParams,
    points: Vec<[f64; 3]>,
    bc: BoundaryConditions,
    state: SweepState,
    open_current: Option<f64>,
}

impl SweepDriver<FiniteVolumeSolver> {
    /// Build the base field, domain and finite-volume solver from validated
    /// parameters.
    pub fn from_params(params: SimulationParams, analyte: AnalyteStructure) -> SimulationResult<Self> {
        params.validate()?;
        let base = BaseConductivityGrid::build(
            &params.pore,
            &params.sim_box,
            params.grid_resolution,
            params.bulk_conductivity,
            params.membrane_conductivity,
        )?;
        let model = PerturbationModel::new(params.bulk_conductivity, params.cutoff)?;
        let domain = StructuredDomain::build(
            &params.sim_box,
            params.grid_resolution,
            params.solver.max_elements,
        )?;
        let solver = FiniteVolumeSolver::new(domain, &params.solver);
        Ok(Self::new(solver, FieldAssembler::new(base, model), analyte, params))
    }
}

impl<S: ConductionSolver> SweepDriver<S> {
    pub fn new(
        solver: S,
        assembler: FieldAssembler,
        analyte: AnalyteStructure,
        params: SimulationParams,
    ) -> Self {
        let points = solver.domain().node_positions();
        let bc = BoundaryConditions::from_millivolts(params.voltage_mv);
        log::info!(
            "Sweep driver ready: {} atoms, {} solver nodes, method {}",
            analyte.len(),
            points.len(),
            solver.method_name()
        );
        Self {
            solver,
            assembler,
            analyte,
            params,
            points,
            bc,
            state: SweepState::Initialized,
            open_current: None,
        }
    }

    pub fn state(&self) -> SweepState {
        self.state
    }

    pub fn open_current(&self) -> Option<f64> {
        self.open_current
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn assembler(&self) -> &FieldAssembler {
        &self.assembler
    }

    pub fn analyte(&self) -> &AnalyteStructure {
        &self.analyte
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Ohmic current through the box if it were filled with electrolyte (A).
    fn reference_current(&self) -> f64 {
        let [lx, ly, lz] = self.params.sim_box.lengths();
        self.params.bulk_conductivity * self.bc.terminal_potential.abs() * lx * ly / lz * ANGSTROM
    }

    fn measure(&self, samples: Vec<f64>) -> SimulationResult<CurrentMeasurement> {
        let buffer = ConductivityBuffer::from_samples(self.solver.domain(), samples)?;
        let m = self.solver.measure_current(&buffer, &self.bc)?;
        let mismatch = m.flux_discrepancy();
        if mismatch > self.params.solver.flux_tolerance {
            log::warn!(
                "Ground/terminal flux mismatch {:.2e} ({:.6e} A vs {:.6e} A); solve may not have converged",
                mismatch,
                m.ground_flux,
                m.terminal_flux
            );
        }
        log::debug!(
            "Solve finished in {} iterations (residual {:.2e})",
            m.iterations,
            m.residual
        );
        Ok(m)
    }

    /// Solve with the base field only and store the normalisation reference.
    pub fn compute_open_pore(&mut self) -> SimulationResult<f64> {
        log::info!("Computing open pore current...");
        let samples = self.assembler.base_field(&self.points);
        let current = self.measure(samples)?.current;

        if !(current.is_finite() && current > DEGENERATE_FRACTION * self.reference_current()) {
            return Err(SimulationError::DegenerateNormalization {
                open_current: current,
            });
        }
        log::info!("Open pore current: {current:.6e} A");
        self.open_current = Some(current);
        self.state = SweepState::OpenPoreComputed;
        Ok(current)
    }

    /// Measure a single analyte position against the stored baseline.
    pub fn measure_step(&self, index: usize, z: f64) -> SimulationResult<StepRecord> {
        let open = self.open_current.ok_or_else(|| {
            SimulationError::Configuration("open-pore current has not been computed".into())
        })?;
        let samples = self.assembler.analyte_field(&self.analyte, z, &self.points);
        let current = self.measure(samples)?.current;
        let normalized_current = current / open;
        Ok(StepRecord {
            index,
            z_position: z,
            current,
            normalized_current,
            blockage: (1.0 - normalized_current) * 100.0,
        })
    }

    /// Run the full sweep, computing the baseline first if needed.
    pub fn run(&mut self, sink: &mut dyn StepSink) -> SimulationResult<SweepResult> {
        let open = match self.open_current {
            Some(c) => c,
            None => self.compute_open_pore()?,
        };

        let positions = self.params.sweep.positions();
        let total = positions.len();
        log::info!("Starting vertical movement simulation with {total} positions");

        let mut steps = Vec::with_capacity(total);
        for (index, &z) in positions.iter().enumerate() {
            self.state = SweepState::Sweeping { index, total };
            log::info!("Processing position {}/{}: Z = {:.2} Å", index + 1, total, z);

            let step = self.measure_step(index, z)?;
            log::info!(
                "Current: {:.6e} A, Blockage: {:.2}%",
                step.current,
                step.blockage
            );
            sink.record(&step)?;
            steps.push(step);
        }

        self.state = SweepState::Completed;
        let result = SweepResult::new(
            open,
            steps,
            self.params.pore.clone(),
            self.params.sim_box,
            self.params.use_element_radii,
        );
        if let Some(s) = result.summary {
            log::info!(
                "Maximum blockage: {:.2}% at Z = {:.2} Å",
                s.max_blockage,
                s.z_at_max
            );
        }
        Ok(result)
    }
}

/// Sweep indices rendered by preview: every position when `frames` covers
/// them all, else `floor` of `frames` evenly spaced values over `0..total`.
pub fn preview_frame_indices(total: usize, frames: usize) -> Vec<usize> {
    if frames >= total {
        return (0..total).collect();
    }
    match frames {
        0 => Vec::new(),
        1 => vec![0],
        _ => {
            let last = (total - 1) as f64;
            (0..frames)
                .map(|i| (i as f64 * last / (frames - 1) as f64).floor() as usize)
                .collect()
        }
    }
}
