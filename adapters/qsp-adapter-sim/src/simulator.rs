//! Simulator backend implementation.

use num_complex::Complex64;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::time::Instant;
use tracing::{debug, instrument};

use qsp_hal::{Backend, Capabilities, Counts, ExecutionResult, HalError, HalResult};
use qsp_ir::Circuit;

use crate::statevector::{Statevector, sample_cumulative};

/// Local simulator backend.
///
/// The circuit is simulated once; every shot samples the final state. With a
/// seed, repeated runs of the same circuit return identical counts.
#[derive(Debug, Clone)]
pub struct SimulatorBackend {
    capabilities: Capabilities,
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(20)
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            capabilities: Capabilities::simulator(max_qubits),
            seed: None,
        }
    }

    /// Fix the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run the circuit on |0…0⟩ and return the final state.
    #[instrument(skip_all, fields(circuit = circuit.name(), qubits = circuit.num_qubits()))]
    pub fn simulate(&self, circuit: &Circuit) -> HalResult<Statevector> {
        self.validate(circuit)?;
        let start = Instant::now();

        let mut sv = Statevector::new(circuit.num_qubits());
        let mut applied = 0usize;
        for inst in circuit.instructions() {
            sv.apply(inst)?;
            applied += 1;
        }

        debug!(
            "Applied {} instructions in {:?}",
            applied,
            start.elapsed()
        );
        Ok(sv)
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[instrument(skip(self, circuit))]
    fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        if shots == 0 || shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} not in 1..={}",
                self.capabilities.max_shots
            )));
        }
        let start = Instant::now();
        let sv = self.simulate(circuit)?;

        let cumulative = sv.cumulative();
        let mut rng = self.rng();
        let mut outcomes: FxHashMap<usize, u64> = FxHashMap::default();
        for _ in 0..shots {
            *outcomes
                .entry(sample_cumulative(&cumulative, &mut rng))
                .or_insert(0) += 1;
        }

        let counts: Counts = outcomes
            .into_iter()
            .map(|(outcome, n)| (sv.outcome_to_bitstring(outcome), n))
            .collect();

        let elapsed = start.elapsed();
        debug!(
            "Sampled {} shots into {} outcomes in {:?}",
            shots,
            counts.len(),
            elapsed
        );

        #[allow(clippy::cast_possible_truncation)]
        let ms = elapsed.as_millis() as u64;
        Ok(ExecutionResult::new(counts, shots).with_execution_time(ms))
    }

    fn statevector(&self, circuit: &Circuit) -> HalResult<Vec<Complex64>> {
        Ok(self.simulate(circuit)?.into_amplitudes())
    }
}
