//! Backend capability introspection.

use serde::{Deserialize, Serialize};

/// What an execution engine can run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Maximum number of shots per run.
    pub max_shots: u32,
    /// Whether the backend can return exact amplitudes.
    pub exact_statevector: bool,
}

impl Capabilities {
    /// Capabilities of a local statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            max_shots: 1_000_000,
            exact_statevector: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator(12);
        assert_eq!(caps.num_qubits, 12);
        assert!(caps.exact_statevector);

        let json = serde_json::to_value(&caps).unwrap();
        assert_eq!(json["name"], "simulator");
    }
}
