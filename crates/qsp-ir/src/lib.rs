//! Circuit intermediate representation for qsp
//!
//! This crate holds the data structures every other qsp crate emits or
//! consumes: state-preparation routines build a [`Circuit`], and execution
//! backends walk its instructions.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`StandardGate`] for built-in gates and [`ControlledGate`] for
//!   single-qubit gates under an arbitrary control pattern
//! - **Parameters**: [`ParameterExpression`] for symbolic rotation angles
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **DAG**: [`CircuitDag`] for the internal graph representation
//! - **Circuit**: [`Circuit`] high-level builder API and
//!   [`CircuitDescription`] for serialisation
//!
//! # Example: A Controlled Rotation on an Open Control
//!
//! ```rust
//! use qsp_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("prep", 2, 0);
//!
//! // Split the mass of qubit 1, then rotate qubit 0 only where qubit 1 is |0⟩.
//! circuit.ry(1.2, QubitId(1)).unwrap();
//! circuit.mcry(0.7, &[QubitId(1)], 0b0, QubitId(0)).unwrap();
//!
//! assert_eq!(circuit.num_ops(), 2);
//! assert_eq!(circuit.count_ops().get("mcry"), Some(&1));
//! ```
//!
//! # Example: Parameterized Circuit
//!
//! ```rust
//! use qsp_ir::{Circuit, QubitId, ParameterExpression};
//! use rustc_hash::FxHashMap;
//!
//! let mut circuit = Circuit::with_size("template", 1, 0);
//! circuit.ry(ParameterExpression::symbol("theta_0_0"), QubitId(0)).unwrap();
//! assert!(circuit.is_parameterized());
//!
//! let mut bindings = FxHashMap::default();
//! bindings.insert("theta_0_0".to_string(), 0.5);
//! let bound = circuit.bind_parameters(&bindings);
//! assert!(!bound.is_parameterized());
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg`, `T`, `Tdg` | 1 | Phase gates |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `CX`, `CZ`, `CP` | 2 | Controlled gates |
//! | `Swap` | 2 | SWAP gate |
//! | `mc*` | k+1 | Any single-qubit gate under k controls with a control state |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;

pub use circuit::{Circuit, CircuitDescription};
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::{ControlledGate, Gate, GateKind, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use parameter::ParameterExpression;
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};
