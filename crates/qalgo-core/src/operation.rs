//! Operations that algorithms apply to a register, plain or controlled.

use qalgo_ir::{Circuit, Gate, QubitId, StandardGate};

use crate::error::{AlgoError, AlgoResult};

/// A unitary operation over a fixed number of qubits.
///
/// Native gates keep their native controlled form where the gate set has one;
/// everything else is wrapped into a composite gate with an extra control.
#[derive(Debug, Clone)]
pub enum Operation {
    /// A single standard gate.
    Gate(StandardGate),
    /// An arbitrary unitary sub-circuit.
    SubCircuit(Circuit),
}

impl Operation {
    /// The phase gate `P(theta)`, whose eigenstate `|1⟩` picks up `e^(i·theta)`.
    pub fn phase(theta: f64) -> Self {
        Self::Gate(StandardGate::P(theta))
    }

    /// Number of qubits the operation acts on.
    pub fn width(&self) -> usize {
        match self {
            Self::Gate(g) => g.num_qubits() as usize,
            Self::SubCircuit(c) => c.num_qubits(),
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        match self {
            Self::Gate(g) => g.name(),
            Self::SubCircuit(c) => c.name(),
        }
    }

    /// Apply the operation to `qubits` of `circuit`.
    pub fn apply(&self, circuit: &mut Circuit, qubits: &[QubitId]) -> AlgoResult<()> {
        self.check_width(qubits)?;
        match self {
            Self::Gate(g) => {
                circuit.gate(g.clone(), qubits.iter().copied())?;
            }
            Self::SubCircuit(c) => {
                circuit.compose(c, qubits)?;
            }
        }
        Ok(())
    }

    /// Apply the operation to `targets`, conditioned on `control`.
    pub fn apply_controlled(
        &self,
        circuit: &mut Circuit,
        control: QubitId,
        targets: &[QubitId],
    ) -> AlgoResult<()> {
        self.check_width(targets)?;
        let gate = self.controlled_gate()?;
        circuit.gate(gate, std::iter::once(control).chain(targets.iter().copied()))?;
        Ok(())
    }

    /// The gate that applies this operation under one leading control qubit.
    ///
    /// Building it once and cloning it is cheaper than calling
    /// [`Operation::apply_controlled`] in a loop.
    pub fn controlled_gate(&self) -> AlgoResult<Gate> {
        match self {
            Self::Gate(g) => match g.controlled() {
                Some(native) => Ok(Gate::standard(native)),
                None => {
                    let width = g.num_qubits();
                    let mut wrapper = Circuit::with_size(g.name(), width, 0);
                    wrapper.gate(g.clone(), (0..width).map(QubitId))?;
                    Ok(Gate::composite(wrapper.to_gate()?.controlled()))
                }
            },
            Self::SubCircuit(c) => Ok(Gate::composite(c.to_gate()?.controlled())),
        }
    }

    fn check_width(&self, qubits: &[QubitId]) -> AlgoResult<()> {
        if qubits.len() == self.width() {
            Ok(())
        } else {
            Err(AlgoError::invalid(format!(
                "operation '{}' acts on {} qubits, got {}",
                self.name(),
                self.width(),
                qubits.len()
            )))
        }
    }
}

impl From<StandardGate> for Operation {
    fn from(gate: StandardGate) -> Self {
        Self::Gate(gate)
    }
}

impl From<Circuit> for Operation {
    fn from(circuit: Circuit) -> Self {
        Self::SubCircuit(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qalgo_ir::GateKind;

    #[test]
    fn test_native_controlled_form() {
        let op = Operation::phase(0.5);
        let gate = op.controlled_gate().unwrap();
        assert_eq!(gate.kind, GateKind::Standard(StandardGate::CP(0.5)));
        assert_eq!(gate.num_qubits(), 2);
    }

    #[test]
    fn test_composite_fallback_for_gate_without_native_control() {
        let op = Operation::Gate(StandardGate::T);
        let gate = op.controlled_gate().unwrap();
        match gate.kind {
            GateKind::Composite(c) => {
                assert_eq!(c.num_controls, 1);
                assert_eq!(c.width, 1);
                assert_eq!(c.body.len(), 1);
            }
            GateKind::Standard(_) => panic!("expected a composite"),
        }
    }

    #[test]
    fn test_sub_circuit_controlled() {
        let mut body = Circuit::with_size("swap_x", 2, 0);
        body.swap(QubitId(0), QubitId(1))
            .unwrap()
            .x(QubitId(0))
            .unwrap();
        let op = Operation::from(body);
        assert_eq!(op.width(), 2);

        let mut circuit = Circuit::with_size("host", 3, 0);
        op.apply_controlled(&mut circuit, QubitId(2), &[QubitId(0), QubitId(1)])
            .unwrap();
        assert_eq!(circuit.num_ops(), 1);
        let inst = circuit.instructions().next().unwrap();
        assert_eq!(inst.name(), "cswap_x");
        assert_eq!(inst.qubits, vec![QubitId(2), QubitId(0), QubitId(1)]);
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let op = Operation::Gate(StandardGate::CX);
        let mut circuit = Circuit::with_size("host", 3, 0);
        let err = op.apply(&mut circuit, &[QubitId(0)]).unwrap_err();
        assert!(matches!(err, AlgoError::InvalidArgument(_)));
        assert!(
            op.apply_controlled(&mut circuit, QubitId(2), &[QubitId(0)])
                .is_err()
        );
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_apply_sub_circuit_composes() {
        let mut prep = Circuit::with_size("prep", 2, 0);
        prep.x(QubitId(0)).unwrap().h(QubitId(1)).unwrap();
        let mut circuit = Circuit::with_size("host", 4, 0);
        Operation::from(prep)
            .apply(&mut circuit, &[QubitId(2), QubitId(3)])
            .unwrap();
        let mut targets: Vec<_> = circuit
            .instructions()
            .map(|i| (i.name().to_string(), i.qubits[0]))
            .collect();
        targets.sort();
        assert_eq!(
            targets,
            vec![("h".to_string(), QubitId(3)), ("x".to_string(), QubitId(2))]
        );
    }
}
