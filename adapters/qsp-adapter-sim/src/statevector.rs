//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::FRAC_1_SQRT_2;

use qsp_hal::{HalError, HalResult};
use qsp_ir::{
    ControlledGate, GateKind, Instruction, InstructionKind, ParameterExpression, StandardGate,
};

/// A 2×2 single-qubit unitary, row major.
type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// A statevector representing a quantum state.
#[derive(Debug, Clone)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![ZERO; 1 << num_qubits];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Amplitudes indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume the state and return its amplitudes.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Born-rule probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Apply an instruction to the statevector.
    ///
    /// Measurements and barriers leave the state untouched; sampling always
    /// reads every qubit at the end.
    pub fn apply(&mut self, instruction: &Instruction) -> HalResult<()> {
        let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.0 as usize).collect();
        if let Some(&q) = qubits.iter().find(|&&q| q >= self.num_qubits) {
            return Err(HalError::InvalidCircuit(format!(
                "qubit {q} outside a {}-qubit state",
                self.num_qubits
            )));
        }
        match &instruction.kind {
            InstructionKind::Gate(gate) => match &gate.kind {
                GateKind::Standard(g) => self.apply_standard(g, &qubits),
                GateKind::Controlled(g) => self.apply_controlled(g, &qubits),
            },
            InstructionKind::Reset => {
                self.reset(qubits[0]);
                Ok(())
            }
            InstructionKind::Measure | InstructionKind::Barrier => Ok(()),
        }
    }

    fn apply_standard(&mut self, gate: &StandardGate, qubits: &[usize]) -> HalResult<()> {
        let base = match gate {
            StandardGate::Swap => {
                self.apply_swap(qubits[0], qubits[1]);
                return Ok(());
            }
            StandardGate::CX => StandardGate::X,
            StandardGate::CZ => StandardGate::Z,
            StandardGate::CP(theta) => StandardGate::P(theta.clone()),
            single => {
                self.apply_matrix(qubits[0], 0, 0, &matrix(single)?);
                return Ok(());
            }
        };
        let ctrl = 1 << qubits[0];
        self.apply_matrix(qubits[1], ctrl, ctrl, &matrix(&base)?);
        Ok(())
    }

    fn apply_controlled(&mut self, gate: &ControlledGate, qubits: &[usize]) -> HalResult<()> {
        let Some((&target, controls)) = qubits.split_last() else {
            return Err(HalError::InvalidCircuit("controlled gate without target".into()));
        };
        let mut mask = 0usize;
        let mut value = 0usize;
        for (c, &q) in (0u32..).zip(controls) {
            mask |= 1 << q;
            if gate.is_closed(c) {
                value |= 1 << q;
            }
        }
        self.apply_matrix(target, mask, value, &matrix(&gate.base)?);
        Ok(())
    }

    /// Apply `m` to `target` on every basis pair whose bits under
    /// `ctrl_mask` equal `ctrl_value`.
    fn apply_matrix(&mut self, target: usize, ctrl_mask: usize, ctrl_value: usize, m: &Matrix2) {
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & tgt_mask != 0 || i & ctrl_mask != ctrl_value {
                continue;
            }
            let j = i | tgt_mask;
            let a = self.amplitudes[i];
            let b = self.amplitudes[j];
            self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
            self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if i & mask1 != 0 && i & mask2 == 0 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Move each pair's weight onto the `qubit = 0` half.
    ///
    /// Keeps the marginal distribution of the other qubits and drops the
    /// coherence between the two halves.
    fn reset(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask != 0 {
                continue;
            }
            let j = i | mask;
            let a = self.amplitudes[i];
            let b = self.amplitudes[j];
            let weight = (a.norm_sqr() + b.norm_sqr()).sqrt();
            let phase = if a.norm() > 0.0 {
                a / a.norm()
            } else if b.norm() > 0.0 {
                b / b.norm()
            } else {
                ONE
            };
            self.amplitudes[i] = phase * weight;
            self.amplitudes[j] = ZERO;
        }
    }

    /// Running sum of the basis-state probabilities.
    pub fn cumulative(&self) -> Vec<f64> {
        let mut total = 0.0;
        self.amplitudes
            .iter()
            .map(|amp| {
                total += amp.norm_sqr();
                total
            })
            .collect()
    }

    /// Sample a basis state.
    pub fn sample_with<R: Rng>(&self, rng: &mut R) -> usize {
        sample_cumulative(&self.cumulative(), rng)
    }

    /// Convert measurement outcome to bitstring, qubit 0 first.
    pub fn outcome_to_bitstring(&self, outcome: usize) -> String {
        format!("{:0width$b}", outcome, width = self.num_qubits)
            .chars()
            .rev()
            .collect()
    }
}

/// Draw an index from a cumulative distribution.
pub(crate) fn sample_cumulative<R: Rng>(cumulative: &[f64], rng: &mut R) -> usize {
    let total = cumulative.last().copied().unwrap_or(0.0);
    let r: f64 = rng.r#gen::<f64>() * total;
    cumulative
        .partition_point(|&c| c <= r)
        .min(cumulative.len().saturating_sub(1))
}

fn angle(theta: &ParameterExpression) -> HalResult<f64> {
    theta.as_f64().ok_or_else(|| {
        let name = theta.symbols().into_iter().next().unwrap_or_default();
        HalError::UnboundParameter(name)
    })
}

/// Unitary of a single-qubit standard gate.
fn matrix(gate: &StandardGate) -> HalResult<Matrix2> {
    let phase = |theta: f64| [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, theta)]];
    let m = match gate {
        StandardGate::I => [[ONE, ZERO], [ZERO, ONE]],
        StandardGate::X => [[ZERO, ONE], [ONE, ZERO]],
        StandardGate::Y => [[ZERO, -I], [I, ZERO]],
        StandardGate::Z => phase(std::f64::consts::PI),
        StandardGate::H => {
            let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
            [[h, h], [h, -h]]
        }
        StandardGate::S => phase(std::f64::consts::FRAC_PI_2),
        StandardGate::Sdg => phase(-std::f64::consts::FRAC_PI_2),
        StandardGate::T => phase(std::f64::consts::FRAC_PI_4),
        StandardGate::Tdg => phase(-std::f64::consts::FRAC_PI_4),
        StandardGate::P(theta) => phase(angle(theta)?),
        StandardGate::Rx(theta) => {
            let t = angle(theta)? / 2.0;
            let c = Complex64::new(t.cos(), 0.0);
            let s = Complex64::new(0.0, -t.sin());
            [[c, s], [s, c]]
        }
        StandardGate::Ry(theta) => {
            let t = angle(theta)? / 2.0;
            let c = Complex64::new(t.cos(), 0.0);
            let s = Complex64::new(t.sin(), 0.0);
            [[c, -s], [s, c]]
        }
        StandardGate::Rz(theta) => {
            let t = angle(theta)? / 2.0;
            [
                [Complex64::from_polar(1.0, -t), ZERO],
                [ZERO, Complex64::from_polar(1.0, t)],
            ]
        }
        StandardGate::CX | StandardGate::CZ | StandardGate::CP(_) | StandardGate::Swap => {
            return Err(HalError::InvalidCircuit(format!(
                "{} is not a single-qubit gate",
                gate.name()
            )));
        }
    };
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsp_ir::{Circuit, QubitId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn run(circuit: &Circuit) -> Statevector {
        let mut sv = Statevector::new(circuit.num_qubits());
        for inst in circuit.instructions() {
            sv.apply(inst).unwrap();
        }
        sv
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes()[0], ONE));
        assert!(sv.amplitudes()[1..].iter().all(|a| approx_eq(*a, ZERO)));
    }

    #[test]
    fn test_bell_state() {
        let mut circuit = Circuit::with_size("bell", 2, 0);
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        let sv = run(&circuit);

        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        assert!(approx_eq(sv.amplitudes()[0], h));
        assert!(approx_eq(sv.amplitudes()[1], ZERO));
        assert!(approx_eq(sv.amplitudes()[2], ZERO));
        assert!(approx_eq(sv.amplitudes()[3], h));
    }

    #[test]
    fn test_ry_splits_mass() {
        let mut circuit = Circuit::with_size("ry", 1, 0);
        circuit.ry(2.0 * (0.3_f64).sqrt().acos(), QubitId(0)).unwrap();
        let probs = run(&circuit).probabilities();
        assert!((probs[0] - 0.3).abs() < 1e-12);
        assert!((probs[1] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_open_control_fires_on_zero() {
        // X on qubit 0 only where qubit 2 is |0⟩ and qubit 1 is |1⟩
        let mut circuit = Circuit::with_size("mcx", 3, 0);
        circuit.x(QubitId(1)).unwrap();
        circuit
            .mcx(&[QubitId(2), QubitId(1)], 0b10, QubitId(0))
            .unwrap();
        let probs = run(&circuit).probabilities();
        assert!((probs[0b011] - 1.0).abs() < 1e-12);

        let mut circuit = Circuit::with_size("mcx", 3, 0);
        circuit.x(QubitId(2)).unwrap().x(QubitId(1)).unwrap();
        circuit
            .mcx(&[QubitId(2), QubitId(1)], 0b10, QubitId(0))
            .unwrap();
        let probs = run(&circuit).probabilities();
        assert!((probs[0b110] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_open_control_expansion_is_equivalent() {
        let mut circuit = Circuit::with_size("tree", 3, 0);
        circuit.h(QubitId(2)).unwrap().h(QubitId(1)).unwrap();
        circuit
            .mcry(0.7, &[QubitId(2), QubitId(1)], 0b00, QubitId(0))
            .unwrap()
            .mcry(1.9, &[QubitId(2), QubitId(1)], 0b10, QubitId(0))
            .unwrap();
        let direct = run(&circuit);
        let expanded = run(&circuit.expand_open_controls().unwrap());
        for (a, b) in direct.amplitudes().iter().zip(expanded.amplitudes()) {
            assert!(approx_eq(*a, *b));
        }
    }

    #[test]
    fn test_rz_phases() {
        let mut circuit = Circuit::with_size("rz", 1, 0);
        circuit.h(QubitId(0)).unwrap().rz(1.0, QubitId(0)).unwrap();
        let sv = run(&circuit);
        let rel = sv.amplitudes()[1] / sv.amplitudes()[0];
        assert!(approx_eq(rel, Complex64::from_polar(1.0, 1.0)));
    }

    #[test]
    fn test_reset_keeps_other_marginals() {
        let mut circuit = Circuit::with_size("reset", 2, 0);
        circuit.h(QubitId(0)).unwrap().ry(1.0, QubitId(1)).unwrap();
        circuit.reset(QubitId(0)).unwrap();
        let probs = run(&circuit).probabilities();
        assert!((probs[1] + probs[3]).abs() < 1e-12);
        assert!((probs[2] - 0.5_f64.sin().powi(2)).abs() < 1e-12);
    }

    #[test]
    fn test_unbound_parameter_is_rejected() {
        let mut circuit = Circuit::with_size("sym", 1, 0);
        circuit
            .ry(ParameterExpression::symbol("theta_0_0"), QubitId(0))
            .unwrap();
        let mut sv = Statevector::new(1);
        let inst = circuit.instructions().next().unwrap();
        assert!(matches!(sv.apply(inst), Err(HalError::UnboundParameter(n)) if n == "theta_0_0"));
    }

    #[test]
    fn test_sample_deterministic() {
        let mut sv = Statevector::new(2);
        sv.apply(&Instruction::single_qubit_gate(StandardGate::X, QubitId(1)))
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(sv.sample_with(&mut rng), 2);
        }
        assert_eq!(sv.outcome_to_bitstring(2), "01");
    }
}
