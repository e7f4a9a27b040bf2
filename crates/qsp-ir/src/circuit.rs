//! High-level circuit builder API.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::dag::CircuitDag;
use crate::error::IrResult;
use crate::gate::{ControlledGate, Gate, GateKind, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::parameter::ParameterExpression;
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};

/// A quantum circuit.
///
/// Qubits are numbered in allocation order, and a register's qubit `j` is the
/// `2^j` bit of the integer the register encodes.
#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    qubits: Vec<Qubit>,
    clbits: Vec<Clbit>,
    dag: CircuitDag,
    next_qubit_id: u32,
    next_clbit_id: u32,
}

/// Flat, serialisable form of a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitDescription {
    /// Circuit name.
    pub name: String,
    /// Number of qubits.
    pub num_qubits: u32,
    /// Number of classical bits.
    #[serde(default)]
    pub num_clbits: u32,
    /// Instructions in application order.
    pub instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            dag: CircuitDag::new(),
            next_qubit_id: 0,
            next_clbit_id: 0,
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.next_qubit_id);
        self.next_qubit_id += 1;
        self.qubits.push(Qubit::new(id));
        self.dag.add_qubit(id);
        id
    }

    /// Add a quantum register with multiple qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let name = name.into();
        let mut ids = vec![];
        for i in 0..size {
            let id = QubitId(self.next_qubit_id);
            self.next_qubit_id += 1;
            self.qubits.push(Qubit::with_register(id, &name, i));
            self.dag.add_qubit(id);
            ids.push(id);
        }
        ids
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.next_clbit_id);
        self.next_clbit_id += 1;
        self.clbits.push(Clbit::new(id));
        self.dag.add_clbit(id);
        id
    }

    /// Add a classical register with multiple bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let name = name.into();
        let mut ids = vec![];
        for i in 0..size {
            let id = ClbitId(self.next_clbit_id);
            self.next_clbit_id += 1;
            self.clbits.push(Clbit::with_register(id, &name, i));
            self.dag.add_clbit(id);
            ids.push(id);
        }
        ids
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    fn single(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(gate, qubit))?;
        Ok(self)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Z, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::S, qubit)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Sdg, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::T, qubit)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Tdg, qubit)
    }

    /// Apply Rx rotation gate.
    pub fn rx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.single(StandardGate::Rx(theta.into()), qubit)
    }

    /// Apply Ry rotation gate.
    pub fn ry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.single(StandardGate::Ry(theta.into()), qubit)
    }

    /// Apply Rz rotation gate.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.single(StandardGate::Rz(theta.into()), qubit)
    }

    /// Apply phase gate.
    pub fn p(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.single(StandardGate::P(theta.into()), qubit)
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            control,
            target,
        ))?;
        Ok(self)
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::two_qubit_gate(
            StandardGate::CZ,
            control,
            target,
        ))?;
        Ok(self)
    }

    /// Apply controlled-phase gate.
    pub fn cp(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::two_qubit_gate(
            StandardGate::CP(theta.into()),
            control,
            target,
        ))?;
        Ok(self)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))?;
        Ok(self)
    }

    // =========================================================================
    // Multi-controlled gates
    // =========================================================================

    /// Apply a single-qubit gate conditioned on `controls` matching `ctrl_state`.
    ///
    /// Bit `c` of `ctrl_state` is the activating value of `controls[c]`. With
    /// no controls the base gate is applied directly.
    pub fn controlled(
        &mut self,
        base: StandardGate,
        controls: &[QubitId],
        ctrl_state: u64,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        if controls.is_empty() {
            return self.single(base, target);
        }
        #[allow(clippy::cast_possible_truncation)]
        let gate = ControlledGate::new(base, controls.len() as u32, ctrl_state)?;
        self.dag
            .apply(Instruction::controlled_gate(gate, controls, target))?;
        Ok(self)
    }

    /// Apply a multi-controlled Ry rotation.
    pub fn mcry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        controls: &[QubitId],
        ctrl_state: u64,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.controlled(StandardGate::Ry(theta.into()), controls, ctrl_state, target)
    }

    /// Apply a multi-controlled Rz rotation.
    pub fn mcrz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        controls: &[QubitId],
        ctrl_state: u64,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.controlled(StandardGate::Rz(theta.into()), controls, ctrl_state, target)
    }

    /// Apply a multi-controlled X gate.
    pub fn mcx(
        &mut self,
        controls: &[QubitId],
        ctrl_state: u64,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.controlled(StandardGate::X, controls, ctrl_state, target)
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply a custom gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    /// Append a prepared instruction.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(instruction)?;
        Ok(self)
    }

    /// Append every instruction of `other`, which must use a subset of this
    /// circuit's wires.
    pub fn append(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        for inst in other.instructions() {
            self.dag.apply(inst.clone())?;
        }
        Ok(self)
    }

    /// Measure all qubits to corresponding classical bits.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.clbits.len() < self.qubits.len() {
            self.add_clbit();
        }

        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        let clbits: Vec<_> = self
            .clbits
            .iter()
            .map(|c| c.id)
            .take(qubits.len())
            .collect();

        self.dag.apply(Instruction::measure_all(qubits, clbits)?)?;
        Ok(self)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::reset(qubit))?;
        Ok(self)
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::barrier(qubits))?;
        Ok(self)
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.dag.apply(Instruction::barrier(qubits))?;
        Ok(self)
    }

    // =========================================================================
    // Fourier transforms
    // =========================================================================

    /// Apply the quantum Fourier transform to a register.
    ///
    /// `qubits[j]` is bit `j` of the register value, and the transform maps
    /// `|x⟩` to `N^{-1/2} Σ_k e^{2πi xk/N} |k⟩`. Includes the final swaps.
    #[allow(clippy::cast_possible_wrap)]
    pub fn qft(&mut self, qubits: &[QubitId]) -> IrResult<&mut Self> {
        let n = qubits.len();
        for j in (0..n).rev() {
            self.h(qubits[j])?;
            for k in (0..j).rev() {
                let angle = PI / f64::powi(2.0, (j - k) as i32);
                self.cp(angle, qubits[k], qubits[j])?;
            }
        }
        for i in 0..n / 2 {
            self.swap(qubits[i], qubits[n - 1 - i])?;
        }
        Ok(self)
    }

    /// Apply the inverse of [`Circuit::qft`] to a register.
    #[allow(clippy::cast_possible_wrap)]
    pub fn inverse_qft(&mut self, qubits: &[QubitId]) -> IrResult<&mut Self> {
        let n = qubits.len();
        for i in 0..n / 2 {
            self.swap(qubits[i], qubits[n - 1 - i])?;
        }
        for j in 0..n {
            for k in 0..j {
                let angle = -PI / f64::powi(2.0, (j - k) as i32);
                self.cp(angle, qubits[k], qubits[j])?;
            }
            self.h(qubits[j])?;
        }
        Ok(self)
    }

    // =========================================================================
    // Rewrites
    // =========================================================================

    /// Symbol names still unbound anywhere in the circuit.
    pub fn parameters(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for inst in self.instructions() {
            if let Some(p) = inst.as_gate().and_then(|g| gate_parameter(&g.kind)) {
                names.extend(p.symbols());
            }
        }
        names
    }

    /// Whether any instruction carries an unbound symbol.
    pub fn is_parameterized(&self) -> bool {
        self.instructions().any(Instruction::is_parameterized)
    }

    /// Return a copy with every symbol in `bindings` replaced by its value.
    ///
    /// Symbols absent from `bindings` stay symbolic.
    #[must_use]
    pub fn bind_parameters(&self, bindings: &FxHashMap<String, f64>) -> Self {
        let mut bound = self.clone();
        for inst in bound.dag.instructions_mut() {
            if let InstructionKind::Gate(gate) = &mut inst.kind {
                let bind = |p: &ParameterExpression| p.bind_all(bindings).simplify();
                gate.kind = match &gate.kind {
                    GateKind::Standard(g) => GateKind::Standard(g.map_parameter(bind)),
                    GateKind::Controlled(g) => GateKind::Controlled(ControlledGate {
                        base: g.base.map_parameter(bind),
                        ..g.clone()
                    }),
                };
            }
        }
        bound
    }

    /// Rewrite every open control as a closed control conjugated by X gates.
    pub fn expand_open_controls(&self) -> IrResult<Self> {
        let mut out = self.empty_like();
        for inst in self.instructions() {
            let Some((gate, controls, target)) = inst.as_controlled() else {
                out.dag.apply(inst.clone())?;
                continue;
            };
            let open: Vec<QubitId> = gate.open_controls().map(|c| controls[c as usize]).collect();
            for &q in &open {
                out.x(q)?;
            }
            let closed = ControlledGate::all_closed(gate.base.clone(), gate.num_ctrl_qubits)?;
            out.dag
                .apply(Instruction::controlled_gate(closed, controls, target))?;
            for &q in &open {
                out.x(q)?;
            }
        }
        Ok(out)
    }

    /// Same wires and name, no instructions.
    fn empty_like(&self) -> Self {
        let mut dag = CircuitDag::new();
        for q in &self.qubits {
            dag.add_qubit(q.id);
        }
        for c in &self.clbits {
            dag.add_clbit(c.id);
        }
        Self {
            name: self.name.clone(),
            qubits: self.qubits.clone(),
            clbits: self.clbits.clone(),
            dag,
            next_qubit_id: self.next_qubit_id,
            next_clbit_id: self.next_clbit_id,
        }
    }

    /// Flatten into a serialisable description.
    #[allow(clippy::cast_possible_truncation)]
    pub fn description(&self) -> CircuitDescription {
        CircuitDescription {
            name: self.name.clone(),
            num_qubits: self.qubits.len() as u32,
            num_clbits: self.clbits.len() as u32,
            instructions: self.instructions().cloned().collect(),
        }
    }

    /// Rebuild a circuit from its description.
    pub fn from_description(desc: &CircuitDescription) -> IrResult<Self> {
        let mut circuit = Self::with_size(&desc.name, desc.num_qubits, desc.num_clbits);
        for inst in &desc.instructions {
            circuit.dag.apply(inst.clone())?;
        }
        Ok(circuit)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Get the number of operations.
    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    /// Operation counts by name.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        self.dag.count_ops()
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.dag.topological_ops().map(|(_, inst)| inst)
    }

    /// Get a reference to the underlying DAG.
    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Qubit ids in allocation order.
    pub fn qubit_ids(&self) -> Vec<QubitId> {
        self.qubits.iter().map(|q| q.id).collect()
    }

    /// Get the classical bits in the circuit.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }
}

fn gate_parameter(kind: &GateKind) -> Option<&ParameterExpression> {
    match kind {
        GateKind::Standard(g) => g.parameter(),
        GateKind::Controlled(g) => g.base.parameter(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circuit_with_size() {
        let circuit = Circuit::with_size("test", 3, 2);
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_add_registers() {
        let mut circuit = Circuit::new("test");
        let qreg = circuit.add_qreg("x", 4);
        let creg = circuit.add_creg("c", 4);
        assert_eq!(qreg, vec![QubitId(0), QubitId(1), QubitId(2), QubitId(3)]);
        assert_eq!(creg.len(), 4);
        assert_eq!(format!("{}", circuit.qubits()[2]), "x[2]");
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure_all()
            .unwrap();
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_mcry_without_controls_is_plain_ry() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.mcry(0.4, &[], 0, QubitId(0)).unwrap();
        assert_eq!(circuit.count_ops().get("ry"), Some(&1));
    }

    #[test]
    fn test_mcry_rejects_oversized_state() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        let err = circuit
            .mcry(0.4, &[QubitId(2), QubitId(1)], 0b100, QubitId(0))
            .unwrap_err();
        assert!(matches!(err, crate::IrError::InvalidControlState { .. }));
    }

    #[test]
    fn test_qft_gate_counts() {
        let mut circuit = Circuit::with_size("qft", 4, 0);
        let qubits = circuit.qubit_ids();
        circuit.qft(&qubits).unwrap();
        let counts = circuit.count_ops();
        assert_eq!(counts.get("h"), Some(&4));
        assert_eq!(counts.get("cp"), Some(&6));
        assert_eq!(counts.get("swap"), Some(&2));

        let mut inverse = Circuit::with_size("iqft", 4, 0);
        inverse.inverse_qft(&qubits).unwrap();
        assert_eq!(inverse.count_ops(), counts);
    }

    #[test]
    fn test_inverse_qft_mirrors_qft() {
        let mut forward = Circuit::with_size("qft", 3, 0);
        let qubits = forward.qubit_ids();
        forward.qft(&qubits).unwrap();
        let mut inverse = Circuit::with_size("iqft", 3, 0);
        inverse.inverse_qft(&qubits).unwrap();

        let fwd: Vec<_> = forward.instructions().cloned().collect();
        let inv: Vec<_> = inverse.instructions().cloned().collect();
        for (a, b) in fwd.iter().zip(inv.iter().rev()) {
            assert_eq!(a.qubits, b.qubits);
            let angle = |i: &Instruction| {
                i.as_gate()
                    .and_then(|g| gate_parameter(&g.kind))
                    .and_then(ParameterExpression::as_f64)
            };
            match (angle(a), angle(b)) {
                (Some(x), Some(y)) => assert!((x + y).abs() < 1e-12),
                (None, None) => assert_eq!(a.name(), b.name()),
                _ => panic!("mismatched instructions {} / {}", a.name(), b.name()),
            }
        }
    }

    #[test]
    fn test_bind_parameters() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit
            .ry(ParameterExpression::symbol("theta_0_0"), QubitId(1))
            .unwrap()
            .mcry(ParameterExpression::symbol("theta_1_0"), &[QubitId(1)], 0, QubitId(0))
            .unwrap();
        assert!(circuit.is_parameterized());
        assert_eq!(circuit.parameters().len(), 2);

        let mut bindings = FxHashMap::default();
        bindings.insert("theta_0_0".to_string(), 0.25);
        let partial = circuit.bind_parameters(&bindings);
        assert_eq!(
            partial.parameters().into_iter().collect::<Vec<_>>(),
            vec!["theta_1_0"]
        );

        bindings.insert("theta_1_0".to_string(), 0.5);
        let bound = circuit.bind_parameters(&bindings);
        assert!(!bound.is_parameterized());
        let (gate, _, _) = bound.instructions().nth(1).unwrap().as_controlled().unwrap();
        assert_eq!(gate.base, StandardGate::Ry(ParameterExpression::Constant(0.5)));
    }

    #[test]
    fn test_expand_open_controls() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit
            .mcry(0.3, &[QubitId(2), QubitId(1)], 0b01, QubitId(0))
            .unwrap();
        let expanded = circuit.expand_open_controls().unwrap();
        let names: Vec<_> = expanded.instructions().map(Instruction::name).collect();
        assert_eq!(names, vec!["x", "mcry", "x"]);

        let x = expanded.instructions().next().unwrap();
        assert_eq!(x.qubits, vec![QubitId(1)]);
        let (gate, _, _) = expanded.instructions().nth(1).unwrap().as_controlled().unwrap();
        assert_eq!(gate.ctrl_state, 0b11);
    }

    #[test]
    fn test_description_round_trip() {
        let mut circuit = Circuit::with_size("prep", 2, 0);
        circuit
            .ry(1.0, QubitId(1))
            .unwrap()
            .mcry(0.5, &[QubitId(1)], 1, QubitId(0))
            .unwrap();
        let desc = circuit.description();
        let json = serde_json::to_string(&desc).unwrap();
        let back: CircuitDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, desc);

        let rebuilt = Circuit::from_description(&back).unwrap();
        assert_eq!(rebuilt.num_ops(), 2);
        assert_eq!(rebuilt.name(), "prep");
    }

    #[test]
    fn test_append() {
        let mut prep = Circuit::with_size("prep", 2, 0);
        prep.h(QubitId(0)).unwrap();
        let mut main = Circuit::with_size("main", 2, 0);
        main.append(&prep).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        assert_eq!(main.num_ops(), 2);

        let small = Circuit::with_size("small", 1, 0);
        let mut big = Circuit::with_size("big", 3, 0);
        big.h(QubitId(2)).unwrap();
        assert!(Circuit::with_size("x", 1, 0).append(&big).is_err());
        assert!(big.append(&small).is_ok());
    }
}
