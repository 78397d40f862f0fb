use blockade_core::conductivity::BaseConductivityGrid;
use blockade_core::solver::fv::FiniteVolumeSolver;
use blockade_core::solver::{BoundaryConditions, ConductionSolver, ConductivityBuffer, StructuredDomain};
use blockade_core::types::{Preconditioner, SolverSettings};
use blockade_geometry::{Cylindrical, SimulationBox};
use criterion::{criterion_group, criterion_main, Criterion};

/// Open-pore solve on a 32 × 32 × 48 mesh, one run per preconditioner.
fn bench_open_pore_solve(c: &mut Criterion) {
    let pore = Cylindrical::new(8.0, 16.0, 0.0, None).unwrap();
    let sim_box = SimulationBox::new((-16.0, 16.0), (-16.0, 16.0), (-24.0, 24.0)).unwrap();
    let base = BaseConductivityGrid::build(&pore, &sim_box, 1.0, 10.5, 1e-4).unwrap();
    let domain = StructuredDomain::build(&sim_box, 1.0, 400).unwrap();
    let samples = base.sample_all(&domain.node_positions());
    let field = ConductivityBuffer::from_samples(&domain, samples).unwrap();
    let bc = BoundaryConditions::from_millivolts(100.0);

    for (name, preconditioner) in [
        ("open_pore_jacobi", Preconditioner::Jacobi),
        ("open_pore_ssor", Preconditioner::Ssor),
    ] {
        let settings = SolverSettings {
            preconditioner,
            ..SolverSettings::default()
        };
        let solver = FiniteVolumeSolver::new(domain.clone(), &settings);
        c.bench_function(name, |b| {
            b.iter(|| std::hint::black_box(solver.measure_current(&field, &bc).unwrap()))
        });
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_open_pore_solve
}
criterion_main!(benches);
