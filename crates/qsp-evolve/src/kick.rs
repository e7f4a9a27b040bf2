//! Momentum boost of a prepared wave packet.

use qsp_ir::Circuit;
use tracing::debug;

use crate::error::EvolveResult;
use crate::grid::Grid;
use crate::split_operator::grid_register;
use crate::synthesis::append_diagonal_phase;

/// Multiply the wavefunction on the grid register by `exp(i p0 x)`.
///
/// The phase is synthesised from the Z-string decomposition of `-p0·x`
/// evolved for unit time, so it is exact up to a global phase.
pub fn phase_kick(circuit: &mut Circuit, grid: &Grid, p0: f64) -> EvolveResult<()> {
    let qubits = grid_register(circuit, grid)?;
    let phases: Vec<f64> = grid.positions().into_iter().map(|x| -p0 * x).collect();
    let before = circuit.num_ops();
    append_diagonal_phase(circuit, &phases, 1.0, &qubits)?;
    debug!(p0, n_ops = circuit.num_ops() - before, "appended momentum kick");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_phase_is_single_qubit() {
        // x is affine in the bits, so only single-Z terms appear.
        let grid = Grid::new(4, -8.0, 8.0).unwrap();
        let mut circuit = Circuit::with_size("kick", 4, 0);
        phase_kick(&mut circuit, &grid, 0.7).unwrap();
        assert_eq!(circuit.num_ops(), 4);
        assert_eq!(circuit.count_ops().get("rz"), Some(&4));
    }

    #[test]
    fn test_zero_kick_is_empty() {
        let grid = Grid::new(3, 0.0, 1.0).unwrap();
        let mut circuit = Circuit::with_size("kick", 3, 0);
        phase_kick(&mut circuit, &grid, 0.0).unwrap();
        assert_eq!(circuit.num_ops(), 0);
    }
}
