//! Split-operator time evolution.
//!
//! Approximates `exp(-i (T + V) t)` by `n_steps` symmetric Strang slices
//!
//!   S(dt) = e^{-i V dt/2} · F · e^{-i T dt} · F⁻¹ · e^{-i V dt/2}
//!
//! where `F⁻¹` (the inverse QFT) takes the position register to momentum
//! space, in which the kinetic energy `T = p²/2m` is diagonal. Both diagonal
//! factors are synthesised exactly from their Z-string decomposition.
//!
//! Error: O(t³ / n²) per unit time, and exact when `V` is constant.

use qsp_ir::{Circuit, QubitId};
use tracing::{debug, instrument};

use crate::error::{EvolveError, EvolveResult};
use crate::grid::Grid;
use crate::potential::Particle1D;
use crate::synthesis::append_diagonal_phase;

/// The first `grid.num_qubits()` qubits of `circuit`, which hold the grid.
pub(crate) fn grid_register(circuit: &Circuit, grid: &Grid) -> EvolveResult<Vec<QubitId>> {
    let qubits = circuit.qubit_ids();
    let n = grid.num_qubits() as usize;
    if qubits.len() < n {
        return Err(EvolveError::QubitOutOfRange {
            qubit: grid.num_qubits() - 1,
            n_qubits: u32::try_from(qubits.len()).unwrap_or(u32::MAX),
        });
    }
    Ok(qubits[..n].to_vec())
}

/// Split-operator synthesiser for a particle on a grid.
#[derive(Debug, Clone)]
pub struct SplitOperatorEvolution {
    particle: Particle1D,
    /// Total evolution time t.
    t: f64,
    /// Number of Strang slices.
    n_steps: usize,
    /// Circuit preparing the initial state, if any.
    initial: Option<Circuit>,
}

impl SplitOperatorEvolution {
    /// Evolve `particle` for time `t` in `n_steps` slices.
    pub fn new(particle: Particle1D, t: f64, n_steps: usize) -> Self {
        Self {
            particle,
            t,
            n_steps,
            initial: None,
        }
    }

    /// Prefix the evolution with a state-preparation circuit.
    ///
    /// The grid occupies the circuit's lowest qubits.
    #[must_use]
    pub fn with_initial(mut self, circuit: Circuit) -> Self {
        self.initial = Some(circuit);
        self
    }

    /// The evolved particle.
    pub fn particle(&self) -> &Particle1D {
        &self.particle
    }

    /// Total evolution time.
    pub fn time(&self) -> f64 {
        self.t
    }

    /// Number of slices.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Time step `t / n_steps`.
    #[allow(clippy::cast_precision_loss)]
    pub fn dt(&self) -> f64 {
        self.t / self.n_steps as f64
    }

    fn validate(&self) -> EvolveResult<()> {
        if self.n_steps == 0 {
            return Err(EvolveError::InvalidSteps(0));
        }
        if !self.t.is_finite() {
            return Err(EvolveError::InvalidTime(self.t));
        }
        Ok(())
    }

    /// Synthesise the evolution circuit, after the initial state if one is set.
    #[instrument(
        skip(self),
        fields(n_qubits = self.particle.grid().num_qubits(), n_steps = self.n_steps)
    )]
    pub fn circuit(&self) -> EvolveResult<Circuit> {
        self.validate()?;
        let grid = *self.particle.grid();
        let mut circuit = match &self.initial {
            Some(initial) => initial.clone(),
            None => Circuit::with_size("split_operator", grid.num_qubits(), 0),
        };
        let qubits = grid_register(&circuit, &grid)?;

        let dt = self.dt();
        let potential = self.particle.potential_diagonal();
        let kinetic = self.particle.kinetic_diagonal();
        let before = circuit.num_ops();

        for _ in 0..self.n_steps {
            append_diagonal_phase(&mut circuit, &potential, dt / 2.0, &qubits)?;
            circuit.inverse_qft(&qubits)?;
            append_diagonal_phase(&mut circuit, &kinetic, dt, &qubits)?;
            circuit.qft(&qubits)?;
            append_diagonal_phase(&mut circuit, &potential, dt / 2.0, &qubits)?;
        }

        debug!(
            n_ops = circuit.num_ops() - before,
            dt, "synthesised split-operator evolution"
        );
        Ok(circuit)
    }
}
