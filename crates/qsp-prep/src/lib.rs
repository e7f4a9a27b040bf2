//! Classical pre-computation for quantum state preparation
//!
//! A register of `n` qubits discretises a domain `[lo, hi)` into `2^n` equal
//! bins; bin `x = Σ_j b_j 2^j` is statevector index `x`. This crate computes
//! the controlled-`Ry` rotation angles that load a probability distribution
//! into such a register and emits them as a [`qsp_ir::Circuit`].
//!
//! # Algorithms
//!
//! - [`GroverRudolph`]: bisection of a continuous (ideally log-concave)
//!   distribution, most significant qubit first
//! - [`KitaevWebb`]: discrete Gaussian on the integers `0 … 2^n - 1`,
//!   least significant qubit first
//!
//! Both produce an [`AngleTree`], which can predict the prepared
//! probabilities classically, emit concrete or symbolic circuits, and be
//! quantized to a fixed number of binary digits.
//!
//! # Example
//!
//! ```rust
//! use qsp_prep::{Domain, Gaussian, GroverRudolph};
//!
//! let gr = GroverRudolph::new(4, Domain::new(-4.0, 4.0)?)?;
//! let dist = Gaussian::new(0.0, 1.0)?;
//!
//! let tree = gr.compute_angles(&dist)?;
//! let circuit = gr.circuit(&tree)?;
//! assert_eq!(circuit.num_qubits(), 4);
//! assert_eq!(circuit.num_ops(), 15);
//!
//! let predicted = tree.probabilities();
//! let target = gr.leaf_masses(&dist)?;
//! assert!(qsp_prep::total_variation(&predicted, &target)? < 1e-12);
//! # Ok::<(), qsp_prep::PrepError>(())
//! ```

pub mod angle_tree;
pub mod binary;
pub mod distribution;
pub mod domain;
pub mod error;
pub mod grover_rudolph;
pub mod kitaev_webb;
pub mod metrics;
pub mod quadrature;

pub use angle_tree::{AngleTree, BitOrder, RotationStep, symbol_name};
pub use binary::{BinaryFraction, MAX_PRECISION, append_binary_rotation};
pub use distribution::{
    Density, Gaussian, ProbabilityDistribution, Tabulated, log_concavity_violation,
};
pub use domain::{Domain, DyadicInterval};
pub use error::{PrepError, PrepResult};
pub use grover_rudolph::{GroverRudolph, GroverRudolphOptions, MAX_QUBITS, split_angle};
pub use kitaev_webb::KitaevWebb;
pub use metrics::{classical_fidelity, probabilities_from_counts, total_variation};
pub use quadrature::{AdaptiveSimpson, Integral};
