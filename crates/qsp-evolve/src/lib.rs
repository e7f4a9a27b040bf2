//! Time evolution of a particle on a 1-D grid.
//!
//! A register of `n` qubits holds a wavefunction on `2^n` grid points.
//! This crate synthesises the circuit that approximates `exp(-i H t)` for
//!
//!   H = p²/2m + V(x)      (ħ = 1)
//!
//! by the split-operator method: the potential is diagonal in the position
//! basis, the kinetic term in the momentum basis, and the register's QFT
//! moves between the two. Each diagonal factor is expanded exactly into
//! Z-strings (a Walsh–Hadamard transform) and exponentiated with CNOT
//! ladders.
//!
//! The resulting circuits are ordinary [`qsp_ir::Circuit`]s and can be
//! prefixed with any state preparation, typically a Kitaev–Webb Gaussian.
//!
//! # Quick start
//!
//! ```rust
//! use qsp_evolve::{Grid, Particle1D, Potential, SplitOperatorEvolution};
//!
//! let grid = Grid::new(4, -5.0, 5.0)?;
//! let particle = Particle1D::new(grid, 1.0, Potential::Harmonic { omega: 1.0, center: 0.0 })?;
//!
//! let evol = SplitOperatorEvolution::new(particle, 1.0 /* t */, 8 /* steps */);
//! let circuit = evol.circuit()?;
//! assert_eq!(circuit.num_qubits(), 4);
//! # Ok::<(), qsp_evolve::EvolveError>(())
//! ```

pub mod error;
pub mod grid;
pub mod hamiltonian;
pub mod kick;
pub mod observables;
pub mod potential;
pub mod reference;
pub mod split_operator;
pub mod synthesis;

pub use error::{EvolveError, EvolveResult};
pub use grid::{Grid, MAX_GRID_QUBITS};
pub use hamiltonian::{Hamiltonian, HamiltonianTerm, PauliOp, PauliString};
pub use kick::phase_kick;
pub use potential::{Particle1D, Potential};
pub use split_operator::SplitOperatorEvolution;
pub use synthesis::{append_diagonal_phase, append_evolution, append_exp_pauli};
