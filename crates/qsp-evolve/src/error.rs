//! Error types for the evolve crate.

use thiserror::Error;

/// Errors produced by time-evolution synthesis.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvolveError {
    /// Hamiltonian contains no terms.
    #[error("Hamiltonian is empty: no terms to synthesise")]
    EmptyHamiltonian,

    /// A Pauli string references a qubit index that is out of range.
    #[error("Pauli string references qubit {qubit} but the register only has {n_qubits} qubits")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: u32,
        /// Number of qubits in the target register.
        n_qubits: u32,
    },

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qsp_ir::IrError),

    /// n_steps must be ≥ 1.
    #[error("n_steps must be at least 1, got {0}")]
    InvalidSteps(usize),

    /// Evolution time must be finite.
    #[error("Evolution time must be finite, got {0}")]
    InvalidTime(f64),

    /// Particle mass must be positive and finite.
    #[error("Mass must be positive, got {0}")]
    InvalidMass(f64),

    /// Grid bounds or size are unusable.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// A vector does not match the grid size.
    #[error("Length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },
}

/// Result type for evolution operations.
pub type EvolveResult<T> = Result<T, EvolveError>;
