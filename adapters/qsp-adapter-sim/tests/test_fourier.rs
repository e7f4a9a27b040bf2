//! The register QFT must match the discrete Fourier transform
//! `|x⟩ → N^{-1/2} Σ_k e^{2πi xk/N} |k⟩` with qubit `j` as bit `j`.

use num_complex::Complex64;
use qsp_adapter_sim::SimulatorBackend;
use qsp_hal::Backend;
use qsp_ir::{Circuit, QubitId};
use std::f64::consts::PI;

fn basis_state(n: u32, x: usize) -> Circuit {
    let mut circuit = Circuit::with_size("basis", n, 0);
    for j in 0..n {
        if (x >> j) & 1 == 1 {
            circuit.x(QubitId(j)).unwrap();
        }
    }
    circuit
}

#[allow(clippy::cast_precision_loss)]
fn dft_column(n: u32, x: usize, sign: f64) -> Vec<Complex64> {
    let dim = 1usize << n;
    let norm = 1.0 / (dim as f64).sqrt();
    (0..dim)
        .map(|k| Complex64::from_polar(norm, sign * 2.0 * PI * (x * k) as f64 / dim as f64))
        .collect()
}

fn assert_close(actual: &[Complex64], expected: &[Complex64]) {
    for (k, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).norm() < 1e-10, "amplitude {k}: {a} vs {e}");
    }
}

#[test]
fn qft_matches_dft_on_basis_states() {
    let backend = SimulatorBackend::new();
    for n in 1..=4u32 {
        for x in 0..(1usize << n) {
            let mut circuit = basis_state(n, x);
            let qubits = circuit.qubit_ids();
            circuit.qft(&qubits).unwrap();
            let amps = backend.statevector(&circuit).unwrap();
            assert_close(&amps, &dft_column(n, x, 1.0));
        }
    }
}

#[test]
fn inverse_qft_matches_inverse_dft() {
    let backend = SimulatorBackend::new();
    let n = 3;
    for x in 0..8 {
        let mut circuit = basis_state(n, x);
        let qubits = circuit.qubit_ids();
        circuit.inverse_qft(&qubits).unwrap();
        let amps = backend.statevector(&circuit).unwrap();
        assert_close(&amps, &dft_column(n, x, -1.0));
    }
}

#[test]
fn qft_then_inverse_is_identity() {
    let backend = SimulatorBackend::new();
    let mut circuit = Circuit::with_size("round", 4, 0);
    circuit.h(QubitId(0)).unwrap().ry(0.8, QubitId(2)).unwrap();
    let before = backend.statevector(&circuit).unwrap();

    let qubits = circuit.qubit_ids();
    circuit.qft(&qubits).unwrap().inverse_qft(&qubits).unwrap();
    let after = backend.statevector(&circuit).unwrap();
    assert_close(&after, &before);
}
