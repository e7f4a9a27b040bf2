//! Pauli-string exponentiation.
//!
//! Implements the standard gate synthesis for
//!
//!   exp(-i · coeff · t · P)
//!
//! where P is a tensor product of Pauli operators, using the circuit identity:
//!
//!   exp(-i θ/2 · Z⊗Z⊗...⊗Z) = CNOT_ladder · Rz(θ) · CNOT_ladder†
//!
//! with basis rotations applied before/after to handle X and Y factors:
//!   X → H · Z · H
//!   Y → Sdg · H · Z · H · S
//!   Z → identity
//!
//! Gate count per term: 2·(k-1) CX + 2·k basis gates + 1 Rz,
//! where k = number of non-identity qubits.
//!
//! Pauli positions are register positions: position `j` acts on `qubits[j]`.

use qsp_ir::{Circuit, QubitId};

use crate::error::{EvolveError, EvolveResult};
use crate::hamiltonian::{Hamiltonian, HamiltonianTerm, PauliOp};

fn resolve(qubits: &[QubitId], position: u32) -> EvolveResult<QubitId> {
    qubits
        .get(position as usize)
        .copied()
        .ok_or(EvolveError::QubitOutOfRange {
            qubit: position,
            n_qubits: u32::try_from(qubits.len()).unwrap_or(u32::MAX),
        })
}

/// Append the circuit for `exp(-i · coeff · t · P)` to `circuit`.
///
/// An identity Pauli string is a global phase and appends nothing.
pub fn append_exp_pauli(
    circuit: &mut Circuit,
    term: &HamiltonianTerm,
    t: f64,
    qubits: &[QubitId],
) -> EvolveResult<()> {
    let ops: Vec<(QubitId, PauliOp)> = term
        .pauli
        .ops()
        .iter()
        .map(|&(pos, op)| Ok((resolve(qubits, pos)?, op)))
        .collect::<EvolveResult<_>>()?;
    let Some(&(target, _)) = ops.last() else {
        return Ok(());
    };

    // Rz(θ) implements exp(-i θ/2 Z)
    let theta = 2.0 * term.coeff * t;

    basis_change(circuit, &ops, false)?;
    cnot_ladder(circuit, &ops)?;
    circuit.rz(theta, target)?;
    cnot_ladder_reverse(circuit, &ops)?;
    basis_change(circuit, &ops, true)?;

    Ok(())
}

/// Append `exp(-i H t)` as one exponential per term, in order.
///
/// Exact when the terms commute, as for any diagonal Hamiltonian.
pub fn append_evolution(
    circuit: &mut Circuit,
    hamiltonian: &Hamiltonian,
    t: f64,
    qubits: &[QubitId],
) -> EvolveResult<()> {
    if hamiltonian.is_empty() {
        return Err(EvolveError::EmptyHamiltonian);
    }
    for term in hamiltonian.terms() {
        append_exp_pauli(circuit, term, t, qubits)?;
    }
    Ok(())
}

/// Append `exp(-i diag(values) t)` up to a global phase.
///
/// `values` must hold one entry per basis state of `qubits`. A constant
/// diagonal appends nothing.
pub fn append_diagonal_phase(
    circuit: &mut Circuit,
    values: &[f64],
    t: f64,
    qubits: &[QubitId],
) -> EvolveResult<()> {
    let expected = 1usize << qubits.len();
    if values.len() != expected {
        return Err(EvolveError::LengthMismatch {
            expected,
            got: values.len(),
        });
    }
    let hamiltonian = Hamiltonian::from_diagonal(values);
    if hamiltonian.is_empty() {
        return Ok(());
    }
    append_evolution(circuit, &hamiltonian, t, qubits)
}

/// Apply basis-change gates for each Pauli operator.
///
/// Forward: X → H, Y → Sdg · H. Undo: X → H, Y → H · S.
fn basis_change(
    circuit: &mut Circuit,
    ops: &[(QubitId, PauliOp)],
    undo: bool,
) -> EvolveResult<()> {
    for &(q, op) in ops {
        match (op, undo) {
            (PauliOp::X, _) => {
                circuit.h(q)?;
            }
            (PauliOp::Y, false) => {
                circuit.sdg(q)?;
                circuit.h(q)?;
            }
            (PauliOp::Y, true) => {
                circuit.h(q)?;
                circuit.s(q)?;
            }
            (PauliOp::Z | PauliOp::I, _) => {}
        }
    }
    Ok(())
}

/// CX(q[0],q[1]), CX(q[1],q[2]), …; the parity of all qubits lands on the
/// last one.
fn cnot_ladder(circuit: &mut Circuit, ops: &[(QubitId, PauliOp)]) -> EvolveResult<()> {
    for window in ops.windows(2) {
        circuit.cx(window[0].0, window[1].0)?;
    }
    Ok(())
}

/// The ladder run backwards, undoing [`cnot_ladder`].
fn cnot_ladder_reverse(circuit: &mut Circuit, ops: &[(QubitId, PauliOp)]) -> EvolveResult<()> {
    for window in ops.windows(2).rev() {
        circuit.cx(window[0].0, window[1].0)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hamiltonian::PauliString;

    fn register(n: u32) -> (Circuit, Vec<QubitId>) {
        let circuit = Circuit::with_size("test", n, 0);
        let qubits = circuit.qubit_ids();
        (circuit, qubits)
    }

    #[test]
    fn test_single_z_is_one_rz() {
        let (mut circuit, qubits) = register(2);
        append_exp_pauli(&mut circuit, &HamiltonianTerm::z(1, 0.5), 2.0, &qubits).unwrap();
        assert_eq!(circuit.num_ops(), 1);
        let inst = circuit.instructions().next().unwrap();
        assert_eq!(inst.name(), "rz");
        assert_eq!(inst.qubits, vec![QubitId(1)]);
    }

    #[test]
    fn test_gate_count() {
        // XYZ on three qubits: 2 X/Y basis gates forward (1 + 2), same back,
        // 4 CX, 1 Rz.
        let (mut circuit, qubits) = register(3);
        let term = HamiltonianTerm::new(
            1.0,
            PauliString::from_ops([(0, PauliOp::X), (1, PauliOp::Y), (2, PauliOp::Z)]),
        );
        append_exp_pauli(&mut circuit, &term, 1.0, &qubits).unwrap();
        assert_eq!(circuit.count_ops().get("cx"), Some(&4));
        assert_eq!(circuit.count_ops().get("rz"), Some(&1));
        assert_eq!(circuit.count_ops().get("h"), Some(&4));
        assert_eq!(circuit.num_ops(), 11);
    }

    #[test]
    fn test_positions_map_to_register() {
        let mut circuit = Circuit::with_size("test", 4, 0);
        let qubits = [QubitId(3), QubitId(2)];
        append_exp_pauli(&mut circuit, &HamiltonianTerm::z(0, 1.0), 1.0, &qubits).unwrap();
        assert_eq!(circuit.instructions().next().unwrap().qubits, vec![QubitId(3)]);
    }

    #[test]
    fn test_out_of_range() {
        let (mut circuit, qubits) = register(2);
        let err = append_exp_pauli(&mut circuit, &HamiltonianTerm::z(2, 1.0), 1.0, &qubits)
            .unwrap_err();
        assert!(matches!(
            err,
            EvolveError::QubitOutOfRange {
                qubit: 2,
                n_qubits: 2
            }
        ));
    }

    #[test]
    fn test_empty_hamiltonian() {
        let (mut circuit, qubits) = register(1);
        let err = append_evolution(&mut circuit, &Hamiltonian::default(), 1.0, &qubits).unwrap_err();
        assert!(matches!(err, EvolveError::EmptyHamiltonian));
    }

    #[test]
    fn test_diagonal_phase_length_and_constant() {
        let (mut circuit, qubits) = register(2);
        assert!(matches!(
            append_diagonal_phase(&mut circuit, &[1.0, 2.0], 1.0, &qubits),
            Err(EvolveError::LengthMismatch { expected: 4, got: 2 })
        ));
        append_diagonal_phase(&mut circuit, &[3.0; 4], 1.0, &qubits).unwrap();
        assert_eq!(circuit.num_ops(), 0);
    }
}
