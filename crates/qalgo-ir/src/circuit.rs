//! High-level circuit builder API.

use std::f64::consts::PI;

use crate::dag::CircuitDag;
use crate::error::{IrError, IrResult};
use crate::gate::{CompositeGate, Gate, StandardGate};
use crate::instruction::Instruction;
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};

/// A quantum circuit.
///
/// This provides a high-level API for building quantum circuits,
/// with convenient methods for common gates and operations.
///
/// Qubit and classical bit ids are handed out densely in creation order, so
/// the `k`-th qubit added is `QubitId(k)`.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit.
    qubits: Vec<Qubit>,
    /// Classical bits in the circuit.
    clbits: Vec<Clbit>,
    /// The underlying DAG representation.
    dag: CircuitDag,
    /// Counter for generating qubit IDs.
    next_qubit_id: u32,
    /// Counter for generating classical bit IDs.
    next_clbit_id: u32,
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
        let mut ids = Vec::with_capacity(size as usize);
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
        let mut ids = Vec::with_capacity(size as usize);
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
        self.dag.apply(Instruction::single_qubit_gate(gate, qubit))?;
        Ok(self)
    }

    /// Apply identity gate.
    pub fn id(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::I, qubit)
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

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::SX, qubit)
    }

    /// Apply sqrt(X)-dagger gate.
    pub fn sxdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::SXdg, qubit)
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Rx(theta), qubit)
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Ry(theta), qubit)
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Rz(theta), qubit)
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::P(theta), qubit)
    }

    /// Apply universal U gate.
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::U(theta, phi, lambda), qubit)
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    fn double(&mut self, gate: StandardGate, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::two_qubit_gate(gate, q1, q2))?;
        Ok(self)
    }

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::CX, control, target)
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::CY, control, target)
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::CZ, control, target)
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::CH, control, target)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::Swap, q1, q2)
    }

    /// Apply controlled-Rx gate.
    pub fn crx(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::CRx(theta), control, target)
    }

    /// Apply controlled-Ry gate.
    pub fn cry(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::CRy(theta), control, target)
    }

    /// Apply controlled-Rz gate.
    pub fn crz(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::CRz(theta), control, target)
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::CP(theta), control, target)
    }

    // =========================================================================
    // Three-qubit gates
    // =========================================================================

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::gate(StandardGate::CCX, [c1, c2, target]))?;
        Ok(self)
    }

    /// Apply Fredkin (CSWAP) gate.
    pub fn cswap(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::gate(StandardGate::CSwap, [control, t1, t2]))?;
        Ok(self)
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply a standard or composite gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::measure(qubit, clbit))?;
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
    // Composition
    // =========================================================================

    /// Append every instruction of `other`, with `other`'s qubit `i` mapped
    /// onto `qubits[i]`.
    ///
    /// `other` must be unitary: it has no classical bits to map measurements
    /// onto.
    pub fn compose(&mut self, other: &Circuit, qubits: &[QubitId]) -> IrResult<&mut Self> {
        if other.num_qubits() != qubits.len() {
            return Err(IrError::CompositionMismatch {
                name: other.name.clone(),
                expected: other.num_qubits(),
                got: qubits.len(),
            });
        }

        for inst in other.instructions() {
            if !inst.is_unitary() {
                return Err(IrError::NonUnitary(inst.name().to_string()));
            }
            self.dag
                .apply(inst.remap_qubits(|q| qubits[q.index()]))?;
        }
        Ok(self)
    }

    /// The adjoint circuit: every instruction inverted, in reverse order.
    ///
    /// Fails with [`IrError::NonUnitary`] if the circuit measures or resets.
    pub fn inverse(&self) -> IrResult<Circuit> {
        let mut inverted = Circuit {
            name: format!("{}_dg", self.name),
            qubits: self.qubits.clone(),
            clbits: self.clbits.clone(),
            dag: CircuitDag::new(),
            next_qubit_id: self.next_qubit_id,
            next_clbit_id: self.next_clbit_id,
        };
        for q in &self.qubits {
            inverted.dag.add_qubit(q.id);
        }
        for c in &self.clbits {
            inverted.dag.add_clbit(c.id);
        }

        let ops: Vec<_> = self.instructions().collect();
        for inst in ops.into_iter().rev() {
            inverted.dag.apply(inst.inverse()?)?;
        }
        Ok(inverted)
    }

    /// Package this circuit as a gate acting on `num_qubits()` operands.
    pub fn to_gate(&self) -> IrResult<CompositeGate> {
        let body = self
            .instructions()
            .map(|inst| {
                if inst.is_unitary() {
                    Ok(inst.clone())
                } else {
                    Err(IrError::NonUnitary(inst.name().to_string()))
                }
            })
            .collect::<IrResult<Vec<_>>>()?;
        #[allow(clippy::cast_possible_truncation)]
        let width = self.qubits.len() as u32;
        Ok(CompositeGate::new(self.name.clone(), width, body))
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

    /// Get the number of operations.
    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Instructions in an order that respects every wire.
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

    /// Get the classical bits in the circuit.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        let q0 = QubitId(0);
        let q1 = QubitId(1);

        circuit
            .h(q0)?
            .cx(q0, q1)?
            .measure(q0, ClbitId(0))?
            .measure(q1, ClbitId(1))?;

        Ok(circuit)
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        if n == 0 {
            return Ok(Self::new("ghz_0"));
        }

        let mut circuit = Self::with_size("ghz", n, n);
        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        for i in 0..n {
            circuit.measure(QubitId(i), ClbitId(i))?;
        }

        Ok(circuit)
    }

    /// Create a QFT circuit (without measurements).
    ///
    /// Little-endian: qubit `k` carries bit `k` of the basis index, and the
    /// circuit maps `|x⟩` to `Σ_y e^{2πixy/2^n} |y⟩ / √2^n`. The trailing
    /// swaps are included.
    pub fn qft(n: u32) -> IrResult<Self> {
        if n == 0 {
            return Ok(Self::new("qft_0"));
        }

        let mut circuit = Self::with_size("qft", n, 0);

        for j in (0..n).rev() {
            circuit.h(QubitId(j))?;
            for k in (0..j).rev() {
                let angle = PI / f64::from(1u32 << (j - k));
                circuit.cp(angle, QubitId(j), QubitId(k))?;
            }
        }

        for i in 0..n / 2 {
            circuit.swap(QubitId(i), QubitId(n - 1 - i))?;
        }

        Ok(circuit)
    }

    /// Create an inverse QFT circuit (without measurements).
    pub fn iqft(n: u32) -> IrResult<Self> {
        let mut inverse = Self::qft(n)?.inverse()?;
        inverse.name = format!("iqft_{n}");
        Ok(inverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
    }

    #[test]
    fn test_circuit_with_size() {
        let circuit = Circuit::with_size("test", 3, 2);
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 2);
    }

    #[test]
    fn test_add_registers() {
        let mut circuit = Circuit::new("qpe");
        let ancilla = circuit.add_qreg("ancilla", 4);
        let target = circuit.add_qreg("target", 1);
        let creg = circuit.add_creg("c", 4);

        assert_eq!(ancilla, vec![QubitId(0), QubitId(1), QubitId(2), QubitId(3)]);
        assert_eq!(target, vec![QubitId(4)]);
        assert_eq!(creg.len(), 4);
        assert_eq!(circuit.qubits()[4].to_string(), "target[0]");
    }

    #[test]
    fn test_bell_state() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.depth(), 3); // H, CX, parallel measures
    }

    #[test]
    fn test_ghz_state() {
        let circuit = Circuit::ghz(5).unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.num_ops(), 1 + 4 + 5);
    }

    #[test]
    fn test_measure_all_adds_clbits() {
        let mut circuit = Circuit::with_size("m", 3, 0);
        circuit.h(QubitId(0)).unwrap().measure_all().unwrap();
        assert_eq!(circuit.num_clbits(), 3);
    }

    #[test]
    fn test_qft_gate_counts() {
        let qft = Circuit::qft(4).unwrap();
        // 4 H, 6 CP, 2 swaps
        assert_eq!(qft.num_ops(), 12);
        let cps = qft.instructions().filter(|i| i.name() == "cp").count();
        assert_eq!(cps, 6);
    }

    #[test]
    fn test_iqft_is_reverse_of_qft() {
        let qft = Circuit::qft(3).unwrap();
        let iqft = Circuit::iqft(3).unwrap();
        assert_eq!(iqft.name(), "iqft_3");
        assert_eq!(iqft.num_ops(), qft.num_ops());

        let first = iqft.instructions().next().unwrap();
        assert_eq!(first.name(), "swap");
        for inst in iqft.instructions().filter(|i| i.name() == "cp") {
            let params = inst.as_gate().map(|g| match &g.kind {
                crate::gate::GateKind::Standard(s) => s.parameters(),
                crate::gate::GateKind::Composite(_) => vec![],
            });
            assert!(params.unwrap()[0] < 0.0);
        }
    }

    #[test]
    fn test_compose_remaps_qubits() {
        let mut sub = Circuit::with_size("sub", 2, 0);
        sub.cx(QubitId(0), QubitId(1)).unwrap();

        let mut circuit = Circuit::with_size("main", 4, 0);
        circuit.compose(&sub, &[QubitId(3), QubitId(1)]).unwrap();

        let inst = circuit.instructions().next().unwrap();
        assert_eq!(inst.qubits, vec![QubitId(3), QubitId(1)]);
    }

    #[test]
    fn test_compose_width_mismatch() {
        let sub = Circuit::with_size("sub", 2, 0);
        let mut circuit = Circuit::with_size("main", 4, 0);
        let err = circuit.compose(&sub, &[QubitId(0)]).unwrap_err();
        assert!(matches!(
            err,
            IrError::CompositionMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_inverse_rejects_measurement() {
        let circuit = Circuit::bell().unwrap();
        assert!(matches!(circuit.inverse(), Err(IrError::NonUnitary(_))));
        assert!(matches!(circuit.to_gate(), Err(IrError::NonUnitary(_))));
    }

    #[test]
    fn test_to_gate() {
        let mut circuit = Circuit::with_size("amod", 3, 0);
        circuit
            .swap(QubitId(0), QubitId(1))
            .unwrap()
            .x(QubitId(2))
            .unwrap();

        let gate = circuit.to_gate().unwrap();
        assert_eq!(gate.name, "amod");
        assert_eq!(gate.width, 3);
        assert_eq!(gate.num_controls, 0);
        assert_eq!(gate.body.len(), 2);

        let cgate = gate.controlled();
        let mut host = Circuit::with_size("host", 4, 0);
        host.gate(cgate, [QubitId(3), QubitId(0), QubitId(1), QubitId(2)])
            .unwrap();
        assert_eq!(host.num_ops(), 1);
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("test", 2, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(1))
            .unwrap();

        assert_eq!(circuit.depth(), 3);
    }
}
