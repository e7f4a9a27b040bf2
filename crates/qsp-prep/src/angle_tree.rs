//! Rotation-angle trees and their circuits.
//!
//! Both preparation algorithms decide one register bit per level: level `k`
//! holds `2^k` angles, one per assignment of the bits decided before it.
//! Angle `θ` sends the undecided bit to `cos(θ/2)|0⟩ + sin(θ/2)|1⟩`.

use serde::{Deserialize, Serialize};

use qsp_ir::{Circuit, ParameterExpression, QubitId};

use crate::error::PrepResult;

/// Rotations with `|θ|` below this act as the identity.
pub const TRIVIAL_ANGLE: f64 = 1e-12;

/// Which end of the register a tree decides first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitOrder {
    /// Level `k` targets qubit `n-1-k` (Grover–Rudolph bisection).
    MsbFirst,
    /// Level `k` targets qubit `k` (Kitaev–Webb parity recursion).
    LsbFirst,
}

/// Per-level rotation angles for an `n`-qubit register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleTree {
    num_qubits: u32,
    order: BitOrder,
    levels: Vec<Vec<f64>>,
}

/// One (multi-)controlled Ry of a preparation circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationStep {
    /// Tree level.
    pub level: u32,
    /// Node index within the level.
    pub index: u64,
    /// Qubit being rotated.
    pub target: QubitId,
    /// Controls in control-state bit order.
    pub controls: Vec<QubitId>,
    /// Activation pattern: bit `c` is the value `controls[c]` must hold.
    pub ctrl_state: u64,
    /// Ry angle.
    pub theta: f64,
}

impl RotationStep {
    /// Whether the rotation is numerically the identity.
    pub fn is_trivial(&self) -> bool {
        self.theta.abs() < TRIVIAL_ANGLE
    }

    /// Symbol naming this angle in a parameterised circuit.
    pub fn symbol(&self) -> String {
        symbol_name(self.level, self.index)
    }
}

/// `theta_{level}_{index}`.
pub fn symbol_name(level: u32, index: u64) -> String {
    format!("theta_{level}_{index}")
}

impl AngleTree {
    /// Build a tree; level `k` must hold exactly `2^k` angles.
    pub(crate) fn from_levels(order: BitOrder, levels: Vec<Vec<f64>>) -> Self {
        debug_assert!(
            levels
                .iter()
                .enumerate()
                .all(|(k, level)| level.len() == 1usize << k)
        );
        #[allow(clippy::cast_possible_truncation)]
        let num_qubits = levels.len() as u32;
        Self {
            num_qubits,
            order,
            levels,
        }
    }

    /// Register size.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Bit order of the levels.
    pub fn order(&self) -> BitOrder {
        self.order
    }

    /// Angles, level by level.
    pub fn levels(&self) -> &[Vec<f64>] {
        &self.levels
    }

    /// Angle of node `index` at `level`.
    pub fn angle(&self, level: u32, index: u64) -> Option<f64> {
        let level = self.levels.get(level as usize)?;
        usize::try_from(index).ok().and_then(|i| level.get(i).copied())
    }

    /// Total number of angles, `2^n - 1`.
    pub fn num_angles(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Replace every angle through `f`, keeping the shape.
    #[must_use]
    pub fn map_angles(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self {
            num_qubits: self.num_qubits,
            order: self.order,
            levels: self
                .levels
                .iter()
                .map(|level| level.iter().map(|&t| f(t)).collect())
                .collect(),
        }
    }

    /// Qubit rotated at `level`.
    pub fn target(&self, level: u32) -> QubitId {
        match self.order {
            BitOrder::MsbFirst => QubitId(self.num_qubits - 1 - level),
            BitOrder::LsbFirst => QubitId(level),
        }
    }

    /// Qubits decided before `level`, in control-state bit order.
    pub fn controls(&self, level: u32) -> Vec<QubitId> {
        match self.order {
            BitOrder::MsbFirst => (0..level).map(|c| QubitId(self.num_qubits - 1 - c)).collect(),
            BitOrder::LsbFirst => (0..level).map(QubitId).collect(),
        }
    }

    /// Control pattern selecting node `index` at `level`.
    ///
    /// For most-significant-first trees the node index lists the decided bits
    /// with the earliest one most significant, so the pattern is the index
    /// bit-reversed over `level` bits.
    pub fn ctrl_state(&self, level: u32, index: u64) -> u64 {
        match self.order {
            BitOrder::MsbFirst => (0..level).fold(0, |state, c| {
                state | (((index >> (level - 1 - c)) & 1) << c)
            }),
            BitOrder::LsbFirst => index,
        }
    }

    /// Node index at `level` and the bit decided there, for basis state `x`.
    fn path(&self, x: u64, level: u32) -> (usize, u64) {
        let (node, bit) = match self.order {
            BitOrder::MsbFirst => (
                x >> (self.num_qubits - level),
                (x >> (self.num_qubits - 1 - level)) & 1,
            ),
            BitOrder::LsbFirst => (x & ((1u64 << level) - 1), (x >> level) & 1),
        };
        #[allow(clippy::cast_possible_truncation)]
        (node as usize, bit)
    }

    /// Every rotation in application order.
    pub fn steps(&self) -> Vec<RotationStep> {
        let mut steps = Vec::with_capacity(self.num_angles());
        for (level, angles) in (0u32..).zip(&self.levels) {
            let target = self.target(level);
            let controls = self.controls(level);
            for (index, &theta) in (0u64..).zip(angles) {
                steps.push(RotationStep {
                    level,
                    index,
                    target,
                    controls: controls.clone(),
                    ctrl_state: self.ctrl_state(level, index),
                    theta,
                });
            }
        }
        steps
    }

    /// Basis-state probabilities the tree prepares from |0…0⟩.
    pub fn probabilities(&self) -> Vec<f64> {
        let size = 1u64 << self.num_qubits;
        (0..size)
            .map(|x| {
                (0..self.num_qubits).fold(1.0, |p, level| {
                    let (node, bit) = self.path(x, level);
                    let half = self.levels[level as usize][node] / 2.0;
                    if bit == 0 {
                        p * half.cos().powi(2)
                    } else {
                        p * half.sin().powi(2)
                    }
                })
            })
            .collect()
    }

    /// Real amplitudes the tree prepares, `√p(x)`.
    pub fn amplitudes(&self) -> Vec<f64> {
        self.probabilities().into_iter().map(f64::sqrt).collect()
    }

    /// Emit the preparation with concrete angles on a register named `x`.
    pub fn circuit(&self, name: &str, skip_trivial: bool) -> PrepResult<Circuit> {
        let mut circuit = Circuit::new(name);
        circuit.add_qreg("x", self.num_qubits);
        for step in self.steps() {
            if skip_trivial && step.is_trivial() {
                continue;
            }
            circuit.mcry(step.theta, &step.controls, step.ctrl_state, step.target)?;
        }
        Ok(circuit)
    }

    /// Emit the preparation with symbolic angles and their binding table.
    ///
    /// Every node is emitted, so the template depends only on the register
    /// size.
    pub fn parameterized_circuit(&self, name: &str) -> PrepResult<(Circuit, Vec<(String, f64)>)> {
        let mut circuit = Circuit::new(name);
        circuit.add_qreg("x", self.num_qubits);
        let mut bindings = Vec::with_capacity(self.num_angles());
        for step in self.steps() {
            let symbol = step.symbol();
            circuit.mcry(
                ParameterExpression::symbol(&symbol),
                &step.controls,
                step.ctrl_state,
                step.target,
            )?;
            bindings.push((symbol, step.theta));
        }
        Ok((circuit, bindings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn msb_tree() -> AngleTree {
        AngleTree::from_levels(
            BitOrder::MsbFirst,
            vec![vec![PI / 2.0], vec![0.4, 2.0], vec![0.1, 0.2, 0.3, 0.4]],
        )
    }

    #[test]
    fn test_msb_layout() {
        let tree = msb_tree();
        assert_eq!(tree.target(0), QubitId(2));
        assert_eq!(tree.target(2), QubitId(0));
        assert_eq!(tree.controls(2), vec![QubitId(2), QubitId(1)]);
        // node 0b01: qubit 2 = 0, qubit 1 = 1
        assert_eq!(tree.ctrl_state(2, 0b01), 0b10);
        assert_eq!(tree.ctrl_state(2, 0b10), 0b01);
        assert_eq!(tree.ctrl_state(0, 0), 0);
    }

    #[test]
    fn test_lsb_layout() {
        let tree = AngleTree::from_levels(BitOrder::LsbFirst, vec![vec![1.0], vec![0.5, 0.7]]);
        assert_eq!(tree.target(1), QubitId(1));
        assert_eq!(tree.controls(1), vec![QubitId(0)]);
        assert_eq!(tree.ctrl_state(1, 1), 1);
    }

    #[test]
    fn test_probabilities_are_normalised() {
        let probs = msb_tree().probabilities();
        assert_eq!(probs.len(), 8);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        // x = 0b000: cos²(π/4)·cos²(0.2)·cos²(0.05)
        let expected = 0.5 * 0.2_f64.cos().powi(2) * 0.05_f64.cos().powi(2);
        assert!((probs[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_steps_and_circuit() {
        let tree = msb_tree();
        let steps = tree.steps();
        assert_eq!(steps.len(), 7);
        assert_eq!(steps[3].symbol(), "theta_2_0");

        let circuit = tree.circuit("prep", false).unwrap();
        let counts = circuit.count_ops();
        assert_eq!(counts.get("ry"), Some(&1));
        assert_eq!(counts.get("mcry"), Some(&6));
    }

    #[test]
    fn test_skip_trivial() {
        let tree = AngleTree::from_levels(BitOrder::MsbFirst, vec![vec![1.0], vec![0.0, 0.3]]);
        let circuit = tree.circuit("prep", true).unwrap();
        assert_eq!(circuit.num_ops(), 2);
    }

    #[test]
    fn test_parameterized_circuit_binds_back() {
        let tree = msb_tree();
        let (template, bindings) = tree.parameterized_circuit("tmpl").unwrap();
        assert_eq!(template.parameters().len(), 7);
        assert_eq!(bindings[0], ("theta_0_0".to_string(), PI / 2.0));

        let table = bindings.into_iter().collect();
        let bound = template.bind_parameters(&table);
        assert_eq!(
            bound.description().instructions,
            tree.circuit("tmpl", false).unwrap().description().instructions
        );
    }
}
