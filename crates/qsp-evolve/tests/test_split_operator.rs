//! Evolution circuits must agree with the classical reference when run on
//! the statevector simulator.

use num_complex::Complex64;
use qsp_adapter_sim::SimulatorBackend;
use qsp_evolve::observables::{fidelity, mean_position, probabilities};
use qsp_evolve::{
    EvolveError, Grid, Particle1D, Potential, SplitOperatorEvolution, phase_kick, reference,
};
use qsp_hal::Backend;
use qsp_ir::Circuit;
use qsp_prep::KitaevWebb;

fn statevector(circuit: &Circuit) -> Vec<Complex64> {
    SimulatorBackend::new().statevector(circuit).unwrap()
}

/// Kitaev–Webb packet centred on grid index `mu`, kicked to momentum `p0`.
fn packet(grid: &Grid, mu: f64, sigma: f64, p0: f64) -> Circuit {
    let mut circuit = KitaevWebb::new(grid.num_qubits())
        .unwrap()
        .prepare(mu, sigma)
        .unwrap();
    phase_kick(&mut circuit, grid, p0).unwrap();
    circuit
}

fn assert_matches_reference(particle: Particle1D, t: f64, n_steps: usize) {
    let grid = *particle.grid();
    let initial = packet(&grid, 12.0, 2.5, 1.0);
    let psi0 = statevector(&initial);

    let circuit = SplitOperatorEvolution::new(particle, t, n_steps)
        .with_initial(initial)
        .circuit()
        .unwrap();
    let evolved = statevector(&circuit);
    let expected = reference::split_operator(&psi0, &particle, t, n_steps).unwrap();

    let f = fidelity(&evolved, &expected).unwrap();
    assert!(f > 1.0 - 1e-9, "fidelity {f}");
}

#[test]
fn free_particle_matches_reference() {
    let grid = Grid::new(5, -8.0, 8.0).unwrap();
    assert_matches_reference(Particle1D::free(grid, 1.0).unwrap(), 1.0, 1);
}

#[test]
fn harmonic_matches_reference() {
    let grid = Grid::new(5, -8.0, 8.0).unwrap();
    let particle = Particle1D::new(
        grid,
        1.0,
        Potential::Harmonic {
            omega: 0.8,
            center: 1.0,
        },
    )
    .unwrap();
    assert_matches_reference(particle, 1.2, 3);
}

#[test]
fn barrier_matches_reference() {
    let grid = Grid::new(4, -4.0, 4.0).unwrap();
    let particle = Particle1D::new(
        grid,
        2.0,
        Potential::Barrier {
            height: 5.0,
            left: 0.5,
            right: 1.5,
        },
    )
    .unwrap();
    let initial = packet(&grid, 5.0, 1.5, 2.0);
    let psi0 = statevector(&initial);
    let circuit = SplitOperatorEvolution::new(particle, 0.8, 2)
        .with_initial(initial)
        .circuit()
        .unwrap();
    let expected = reference::split_operator(&psi0, &particle, 0.8, 2).unwrap();
    assert!(fidelity(&statevector(&circuit), &expected).unwrap() > 1.0 - 1e-9);
}

#[test]
fn linear_potential_matches_reference() {
    let grid = Grid::new(5, -8.0, 8.0).unwrap();
    let particle = Particle1D::new(grid, 1.0, Potential::Linear { slope: 0.5 }).unwrap();
    assert_matches_reference(particle, 0.7, 2);
}

#[test]
fn kick_multiplies_by_plane_wave() {
    let grid = Grid::new(4, -4.0, 4.0).unwrap();
    let plain = statevector(&packet(&grid, 7.5, 2.0, 0.0));
    let kicked = statevector(&packet(&grid, 7.5, 2.0, 1.3));

    let expected: Vec<Complex64> = plain
        .iter()
        .zip(grid.positions())
        .map(|(a, x)| a * Complex64::from_polar(1.0, 1.3 * x))
        .collect();
    assert!(fidelity(&kicked, &expected).unwrap() > 1.0 - 1e-12);
}

#[test]
fn kicked_packet_moves_right() {
    let grid = Grid::new(5, -8.0, 8.0).unwrap();
    let particle = Particle1D::free(grid, 1.0).unwrap();
    // Grid index 16 is x = 0.
    let initial = packet(&grid, 16.0, 3.0, 1.5);
    let before = mean_position(&grid, &probabilities(&statevector(&initial))).unwrap();

    let circuit = SplitOperatorEvolution::new(particle, 1.0, 1)
        .with_initial(initial)
        .circuit()
        .unwrap();
    let after = mean_position(&grid, &probabilities(&statevector(&circuit))).unwrap();
    assert!(before.abs() < 1e-4);
    assert!((after - 1.5).abs() < 0.1, "mean position {after}");
}

#[test]
fn register_smaller_than_grid_is_rejected() {
    let grid = Grid::new(4, -4.0, 4.0).unwrap();
    let mut circuit = Circuit::with_size("small", 3, 0);
    let err = phase_kick(&mut circuit, &grid, 1.0).unwrap_err();
    assert!(matches!(err, EvolveError::QubitOutOfRange { .. }));
}
