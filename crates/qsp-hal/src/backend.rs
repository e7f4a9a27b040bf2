//! Backend trait.
//!
//! ```text
//!   capabilities() ──→ validate() ──→ run() / statevector()
//! ```
//!
//! Every method is synchronous: the only engine in this workspace is a local
//! simulator, and state-preparation circuits are small enough to run inline.

use num_complex::Complex64;

use qsp_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::result::ExecutionResult;

/// An engine that executes circuits.
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Check a circuit against the backend's limits.
    ///
    /// The provided implementation checks qubit count and rejects unbound
    /// parameters.
    fn validate(&self, circuit: &Circuit) -> HalResult<()> {
        let caps = self.capabilities();
        if circuit.num_qubits() > caps.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "circuit has {} qubits, backend supports {}",
                circuit.num_qubits(),
                caps.num_qubits
            )));
        }
        if let Some(name) = circuit.parameters().into_iter().next() {
            return Err(HalError::UnboundParameter(name));
        }
        Ok(())
    }

    /// Execute `circuit` and sample `shots` measurement outcomes of every
    /// qubit.
    fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult>;

    /// Exact final amplitudes, indexed so that qubit `j` is bit `j`.
    fn statevector(&self, circuit: &Circuit) -> HalResult<Vec<Complex64>> {
        let _ = circuit;
        Err(HalError::Unsupported(format!(
            "{} does not expose amplitudes",
            self.name()
        )))
    }
}
