//! qsp Hardware Abstraction Layer
//!
//! State-preparation and evolution routines in this workspace only describe
//! circuits. Executing them is the job of a [`Backend`], which reports its
//! [`Capabilities`], samples measurement [`Counts`], and optionally exposes
//! exact amplitudes.
//!
//! # Implementing a Backend
//!
//! ```
//! use qsp_hal::{Backend, Capabilities, Counts, ExecutionResult, HalResult};
//! use qsp_ir::Circuit;
//!
//! struct AllZeros(Capabilities);
//!
//! impl Backend for AllZeros {
//!     fn name(&self) -> &str {
//!         "zeros"
//!     }
//!
//!     fn capabilities(&self) -> &Capabilities {
//!         &self.0
//!     }
//!
//!     fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
//!         self.validate(circuit)?;
//!         let mut counts = Counts::new();
//!         counts.insert("0".repeat(circuit.num_qubits()), u64::from(shots));
//!         Ok(ExecutionResult::new(counts, shots))
//!     }
//! }
//!
//! let backend = AllZeros(Capabilities::simulator(4));
//! let result = backend.run(&Circuit::with_size("c", 2, 0), 8).unwrap();
//! assert_eq!(result.counts.get("00"), 8);
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod result;

pub use backend::Backend;
pub use capability::Capabilities;
pub use error::{HalError, HalResult};
pub use result::{Counts, ExecutionResult};
