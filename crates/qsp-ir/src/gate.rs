//! Quantum gate types.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::parameter::ParameterExpression;

/// Standard gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(ParameterExpression),
    /// Rotation around Y axis.
    Ry(ParameterExpression),
    /// Rotation around Z axis.
    Rz(ParameterExpression),
    /// Phase gate.
    P(ParameterExpression),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// Controlled phase gate.
    CP(ParameterExpression),
    /// SWAP gate.
    Swap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::CP(_) => "cp",
            StandardGate::Swap => "swap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX | StandardGate::CZ | StandardGate::CP(_) | StandardGate::Swap => 2,
            _ => 1,
        }
    }

    /// Check if this gate has unbound symbolic parameters.
    pub fn is_parameterized(&self) -> bool {
        self.parameter().is_some_and(ParameterExpression::is_symbolic)
    }

    /// The rotation or phase angle, for gates that carry one.
    pub fn parameter(&self) -> Option<&ParameterExpression> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CP(p) => Some(p),
            _ => None,
        }
    }

    /// Return the same gate with its parameter replaced through `f`.
    #[must_use]
    pub fn map_parameter(&self, f: impl FnOnce(&ParameterExpression) -> ParameterExpression) -> Self {
        match self {
            StandardGate::Rx(p) => StandardGate::Rx(f(p)),
            StandardGate::Ry(p) => StandardGate::Ry(f(p)),
            StandardGate::Rz(p) => StandardGate::Rz(f(p)),
            StandardGate::P(p) => StandardGate::P(f(p)),
            StandardGate::CP(p) => StandardGate::CP(f(p)),
            other => other.clone(),
        }
    }
}

/// A single-qubit standard gate conditioned on a pattern of control qubits.
///
/// Operands are laid out as `[c_0, c_1, …, c_{k-1}, target]`. Bit `c` of
/// `ctrl_state` is the value control `c` must hold for the base gate to act:
/// a set bit is a closed control, a clear bit an open control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlledGate {
    /// The gate applied to the target.
    pub base: StandardGate,
    /// Number of control qubits.
    pub num_ctrl_qubits: u32,
    /// Activation pattern of the controls.
    pub ctrl_state: u64,
}

impl ControlledGate {
    /// Create a controlled gate, validating base arity and the control pattern.
    pub fn new(base: StandardGate, num_ctrl_qubits: u32, ctrl_state: u64) -> IrResult<Self> {
        if base.num_qubits() != 1 {
            return Err(IrError::InvalidControlledBase(base.name().to_string()));
        }
        if num_ctrl_qubits >= 64 || ctrl_state >> num_ctrl_qubits != 0 {
            return Err(IrError::InvalidControlState {
                ctrl_state,
                num_ctrl_qubits,
            });
        }
        Ok(Self {
            base,
            num_ctrl_qubits,
            ctrl_state,
        })
    }

    /// Controlled gate that fires when every control is |1⟩.
    pub fn all_closed(base: StandardGate, num_ctrl_qubits: u32) -> IrResult<Self> {
        let ctrl_state = if num_ctrl_qubits >= 64 {
            u64::MAX
        } else {
            (1u64 << num_ctrl_qubits) - 1
        };
        Self::new(base, num_ctrl_qubits, ctrl_state)
    }

    /// Whether control `c` must be |1⟩.
    #[inline]
    pub fn is_closed(&self, c: u32) -> bool {
        (self.ctrl_state >> c) & 1 == 1
    }

    /// Indices of the open (|0⟩-activated) controls.
    pub fn open_controls(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.num_ctrl_qubits).filter(|&c| !self.is_closed(c))
    }

    /// Name in the `mc<base>` style, e.g. `mcry`.
    pub fn name(&self) -> String {
        format!("mc{}", self.base.name())
    }
}

/// A quantum gate, either standard or multi-controlled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A single-qubit gate with a control pattern.
    Controlled(ControlledGate),
}

impl GateKind {
    /// Get the name of this gate.
    pub fn name(&self) -> String {
        match self {
            GateKind::Standard(g) => g.name().to_string(),
            GateKind::Controlled(g) => g.name(),
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Controlled(g) => g.num_ctrl_qubits + 1,
        }
    }

    /// Check for unbound symbolic parameters.
    pub fn is_parameterized(&self) -> bool {
        match self {
            GateKind::Standard(g) => g.is_parameterized(),
            GateKind::Controlled(g) => g.base.is_parameterized(),
        }
    }
}

/// A gate with associated metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Optional label for the gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
            label: None,
        }
    }

    /// Create a new gate from a controlled gate.
    pub fn controlled(gate: ControlledGate) -> Self {
        Self {
            kind: GateKind::Controlled(gate),
            label: None,
        }
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> String {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

impl From<ControlledGate> for Gate {
    fn from(gate: ControlledGate) -> Self {
        Gate::controlled(gate)
    }
}
