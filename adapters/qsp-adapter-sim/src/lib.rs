//! qsp Local Simulator Backend
//!
//! A statevector simulator for validating prepared states on small registers.
//! Amplitudes are stored little-endian: qubit `q` is bit `q` of the index.
//!
//! # Example
//!
//! ```
//! use qsp_adapter_sim::SimulatorBackend;
//! use qsp_hal::Backend;
//! use qsp_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("flip", 2, 0);
//! circuit.x(QubitId(1)).unwrap();
//!
//! let backend = SimulatorBackend::new().with_seed(7);
//! let result = backend.run(&circuit, 50).unwrap();
//! assert_eq!(result.counts.get("01"), 50);
//! ```

mod simulator;
mod statevector;

pub use simulator::SimulatorBackend;
pub use statevector::Statevector;
