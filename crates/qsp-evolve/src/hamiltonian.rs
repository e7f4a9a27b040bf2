//! Hamiltonian data structures.
//!
//! A Hamiltonian is a sum of weighted Pauli strings:
//!
//!   H = Σ_k  c_k · P_k
//!
//! where each P_k is a tensor product of single-qubit Pauli operators
//! (I, X, Y, Z) on register positions and c_k ∈ ℝ.
//!
//! A diagonal operator `f(x)` on `n` qubits is exactly a sum of Z-strings:
//! `f = Σ_S c_S Z_S` with `c_S = 2^{-n} Σ_x f(x) (-1)^{|x ∧ S|}`, the
//! Walsh–Hadamard transform of `f`.
//!
//! # Example
//!
//! ```rust
//! use qsp_evolve::hamiltonian::{Hamiltonian, PauliOp};
//!
//! // f(x) = x on two qubits: 1.5·I - 0.5·Z₀ - 1.0·Z₁
//! let h = Hamiltonian::from_diagonal(&[0.0, 1.0, 2.0, 3.0]);
//! assert_eq!(h.n_terms(), 2);
//! assert_eq!(h.terms()[0].pauli.ops(), &[(0, PauliOp::Z)]);
//! assert!((h.terms()[0].coeff + 0.5).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Walsh coefficients below this magnitude are dropped.
pub const COEFF_CUTOFF: f64 = 1e-12;

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity; contributes a global phase.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

/// A tensor product of Pauli operators on register positions.
///
/// Stored sorted by position with identities omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauliString {
    ops: Vec<(u32, PauliOp)>,
}

impl PauliString {
    /// Construct from `(position, op)` pairs; identities are dropped.
    pub fn from_ops(ops: impl IntoIterator<Item = (u32, PauliOp)>) -> Self {
        let mut v: Vec<(u32, PauliOp)> = ops
            .into_iter()
            .filter(|(_, op)| *op != PauliOp::I)
            .collect();
        v.sort_by_key(|(q, _)| *q);
        Self { ops: v }
    }

    /// Z on every position whose bit is set in `mask`.
    pub fn z_mask(mask: u64) -> Self {
        Self {
            ops: (0..64)
                .filter(|&j| (mask >> j) & 1 == 1)
                .map(|j| (j, PauliOp::Z))
                .collect(),
        }
    }

    /// The non-identity `(position, op)` pairs, sorted by position.
    pub fn ops(&self) -> &[(u32, PauliOp)] {
        &self.ops
    }

    /// True if there are no non-identity operators.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// True if every factor is Z.
    pub fn is_diagonal(&self) -> bool {
        self.ops.iter().all(|(_, op)| *op == PauliOp::Z)
    }

    /// The highest position referenced, or `None` for an identity string.
    pub fn max_qubit(&self) -> Option<u32> {
        self.ops.last().map(|(q, _)| *q)
    }
}

/// A single weighted Pauli term: `coeff · pauli`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HamiltonianTerm {
    /// Real coefficient.
    pub coeff: f64,
    /// The Pauli string.
    pub pauli: PauliString,
}

impl HamiltonianTerm {
    /// Create a new term.
    pub fn new(coeff: f64, pauli: PauliString) -> Self {
        Self { coeff, pauli }
    }

    /// Single-qubit Z term.
    pub fn z(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::Z)]))
    }

    /// ZZ coupling term.
    pub fn zz(q0: u32, q1: u32, coeff: f64) -> Self {
        Self::new(
            coeff,
            PauliString::from_ops([(q0, PauliOp::Z), (q1, PauliOp::Z)]),
        )
    }

    /// Single-qubit X term.
    pub fn x(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::X)]))
    }
}

/// A sum-of-Pauli-strings Hamiltonian.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hamiltonian {
    terms: Vec<HamiltonianTerm>,
}

/// In-place Walsh–Hadamard transform, unnormalised.
fn walsh_hadamard(values: &mut [f64]) {
    let mut h = 1;
    while h < values.len() {
        for block in values.chunks_mut(2 * h) {
            let (lo, hi) = block.split_at_mut(h);
            for (a, b) in lo.iter_mut().zip(hi) {
                let (x, y) = (*a, *b);
                *a = x + y;
                *b = x - y;
            }
        }
        h *= 2;
    }
}

impl Hamiltonian {
    /// Create from a list of terms.
    pub fn from_terms(terms: Vec<HamiltonianTerm>) -> Self {
        Self { terms }
    }

    /// Exact Z-string decomposition of `diag(values)`.
    ///
    /// `values.len()` must be a power of two; index `x` is basis state `|x⟩`.
    /// The identity component is dropped, so evolving under the result
    /// differs from `exp(-i diag(values) t)` by a global phase only.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_diagonal(values: &[f64]) -> Self {
        debug_assert!(values.len().is_power_of_two());
        let mut coeffs = values.to_vec();
        walsh_hadamard(&mut coeffs);
        let scale = 1.0 / values.len() as f64;

        let terms: Vec<_> = (1u64..)
            .zip(coeffs.iter().skip(1))
            .map(|(mask, &c)| (mask, c * scale))
            .filter(|(_, c)| c.abs() >= COEFF_CUTOFF)
            .map(|(mask, c)| HamiltonianTerm::new(c, PauliString::z_mask(mask)))
            .collect();

        debug!(
            n_values = values.len(),
            n_terms = terms.len(),
            "decomposed diagonal into Z-strings"
        );
        Self { terms }
    }

    /// Constant offset of `diag(values)`, the dropped identity coefficient.
    #[allow(clippy::cast_precision_loss)]
    pub fn diagonal_offset(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// All terms.
    pub fn terms(&self) -> &[HamiltonianTerm] {
        &self.terms
    }

    /// Number of terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// True if there are no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// True if every term is a Z-string, so all terms commute.
    pub fn is_diagonal(&self) -> bool {
        self.terms.iter().all(|t| t.pauli.is_diagonal())
    }

    /// Spectral norm upper bound: Σ |c_k|.
    pub fn lambda(&self) -> f64 {
        self.terms.iter().map(|t| t.coeff.abs()).sum()
    }

    /// The minimum number of qubits required to represent this Hamiltonian.
    pub fn min_qubits(&self) -> u32 {
        self.terms
            .iter()
            .filter_map(|t| t.pauli.max_qubit())
            .max()
            .map_or(0, |q| q + 1)
    }

    /// Diagonal of a Z-only Hamiltonian on `num_qubits` qubits, without the
    /// dropped identity component.
    ///
    /// Returns `None` if some term is not diagonal.
    pub fn diagonal(&self, num_qubits: u32) -> Option<Vec<f64>> {
        if !self.is_diagonal() {
            return None;
        }
        let size = 1u64 << num_qubits;
        Some(
            (0..size)
                .map(|x| {
                    self.terms
                        .iter()
                        .map(|t| {
                            let parity = t
                                .pauli
                                .ops()
                                .iter()
                                .filter(|&&(q, _)| (x >> q) & 1 == 1)
                                .count();
                            if parity % 2 == 0 { t.coeff } else { -t.coeff }
                        })
                        .sum()
                })
                .collect(),
        )
    }
}

impl FromIterator<HamiltonianTerm> for Hamiltonian {
    fn from_iter<T: IntoIterator<Item = HamiltonianTerm>>(iter: T) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}
