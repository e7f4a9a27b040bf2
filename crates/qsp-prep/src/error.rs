//! Error types for state preparation.

use qsp_ir::IrError;
use thiserror::Error;

/// Errors that can occur while computing or emitting a preparation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PrepError {
    /// Register size outside the supported range.
    #[error("Invalid qubit count {num_qubits}: expected 1..={max}")]
    InvalidQubitCount {
        /// Requested number of qubits.
        num_qubits: u32,
        /// Largest supported register.
        max: u32,
    },

    /// Domain bounds are not finite or not ordered.
    #[error("Invalid domain [{lo}, {hi})")]
    InvalidDomain {
        /// Lower bound.
        lo: f64,
        /// Upper bound.
        hi: f64,
    },

    /// A distribution or algorithm parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A bin or interval received negative probability mass.
    #[error("Negative mass {mass} on [{lo}, {hi})")]
    NegativeMass {
        /// Interval start.
        lo: f64,
        /// Interval end.
        hi: f64,
        /// The offending mass.
        mass: f64,
    },

    /// A bin or interval received a NaN or infinite mass.
    #[error("Non-finite mass {mass} on [{lo}, {hi})")]
    NonFiniteMass {
        /// Interval start.
        lo: f64,
        /// Interval end.
        hi: f64,
        /// The offending mass.
        mass: f64,
    },

    /// The distribution has no mass on the domain.
    #[error("Distribution has zero total mass on the domain")]
    ZeroMass,

    /// Binned masses are not log-concave.
    #[error("Distribution is not log-concave at bin {index}")]
    NotLogConcave {
        /// First bin where `m_i² < m_{i-1} m_{i+1}`.
        index: usize,
    },

    /// Two vectors that must align have different lengths.
    #[error("Length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Binary precision outside the representable range.
    #[error("Invalid binary precision {bits}: expected 1..={max}")]
    InvalidPrecision {
        /// Requested number of bits.
        bits: u32,
        /// Largest supported precision.
        max: u32,
    },

    /// Circuit construction failed.
    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for state-preparation operations.
pub type PrepResult<T> = Result<T, PrepError>;
