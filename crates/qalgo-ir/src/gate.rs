//! Quantum gate types.

use serde::{Deserialize, Serialize};

use crate::error::IrResult;
use crate::instruction::Instruction;

/// Standard gates with known semantics.
///
/// Angles are concrete radians; the algorithms in this workspace never need
/// symbolic parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate: diag(1, e^{iθ}).
    P(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(f64, f64, f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// Controlled rotation around X.
    CRx(f64),
    /// Controlled rotation around Y.
    CRy(f64),
    /// Controlled rotation around Z.
    CRz(f64),
    /// Controlled phase gate.
    CP(f64),

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(_, _, _) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::CRx(_) => "crx",
            StandardGate::CRy(_) => "cry",
            StandardGate::CRz(_) => "crz",
            StandardGate::CP(_) => "cp",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(_, _, _) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CRx(_)
            | StandardGate::CRy(_)
            | StandardGate::CRz(_)
            | StandardGate::CP(_) => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,
        }
    }

    /// Get the angle parameters of this gate.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CRx(p)
            | StandardGate::CRy(p)
            | StandardGate::CRz(p)
            | StandardGate::CP(p) => vec![*p],

            StandardGate::U(a, b, c) => vec![*a, *b, *c],

            _ => vec![],
        }
    }

    /// The adjoint of this gate.
    pub fn inverse(&self) -> StandardGate {
        match self {
            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            StandardGate::SX => StandardGate::SXdg,
            StandardGate::SXdg => StandardGate::SX,
            StandardGate::Rx(t) => StandardGate::Rx(-t),
            StandardGate::Ry(t) => StandardGate::Ry(-t),
            StandardGate::Rz(t) => StandardGate::Rz(-t),
            StandardGate::P(t) => StandardGate::P(-t),
            // U(θ,φ,λ)† = U(-θ,-λ,-φ)
            StandardGate::U(theta, phi, lambda) => StandardGate::U(-theta, -lambda, -phi),
            StandardGate::CRx(t) => StandardGate::CRx(-t),
            StandardGate::CRy(t) => StandardGate::CRy(-t),
            StandardGate::CRz(t) => StandardGate::CRz(-t),
            StandardGate::CP(t) => StandardGate::CP(-t),
            // Hermitian gates
            other => other.clone(),
        }
    }

    /// The native gate that applies this gate under one extra leading control
    /// qubit, if the gate set has one.
    pub fn controlled(&self) -> Option<StandardGate> {
        match self {
            StandardGate::X => Some(StandardGate::CX),
            StandardGate::Y => Some(StandardGate::CY),
            StandardGate::Z => Some(StandardGate::CZ),
            StandardGate::H => Some(StandardGate::CH),
            StandardGate::Rx(t) => Some(StandardGate::CRx(*t)),
            StandardGate::Ry(t) => Some(StandardGate::CRy(*t)),
            StandardGate::Rz(t) => Some(StandardGate::CRz(*t)),
            StandardGate::P(t) => Some(StandardGate::CP(*t)),
            StandardGate::CX => Some(StandardGate::CCX),
            StandardGate::Swap => Some(StandardGate::CSwap),
            _ => None,
        }
    }
}

/// A quantum gate, either standard or composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A gate defined by a sub-circuit, optionally with extra controls.
    Composite(CompositeGate),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Composite(g) => &g.name,
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Composite(g) => g.num_qubits(),
        }
    }
}

/// A gate whose action is given by a body of instructions.
///
/// The body addresses local qubits `0..width`. A composite with
/// `num_controls = k` acts on `k + width` qubits: the first `k` operands are
/// controls and the remaining `width` operands receive the body. The body is
/// only applied on basis states where every control is `|1⟩`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeGate {
    /// The name of the gate.
    pub name: String,
    /// Number of qubits the body acts on.
    pub width: u32,
    /// Number of leading control qubits.
    pub num_controls: u32,
    /// Unitary body over local qubits `0..width`.
    pub body: Vec<Instruction>,
}

impl CompositeGate {
    /// Create an uncontrolled composite gate.
    ///
    /// Callers are expected to go through [`crate::Circuit::to_gate`], which
    /// checks that the body is unitary.
    pub(crate) fn new(name: impl Into<String>, width: u32, body: Vec<Instruction>) -> Self {
        Self {
            name: name.into(),
            width,
            num_controls: 0,
            body,
        }
    }

    /// Total number of operands (controls + body width).
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_controls + self.width
    }

    /// Add one more leading control qubit.
    #[must_use]
    pub fn controlled(mut self) -> Self {
        self.num_controls += 1;
        self.name = format!("c{}", self.name);
        self
    }

    /// The adjoint: inverted body instructions in reverse order.
    pub fn inverse(&self) -> IrResult<Self> {
        let body = self
            .body
            .iter()
            .rev()
            .map(Instruction::inverse)
            .collect::<IrResult<Vec<_>>>()?;
        Ok(Self {
            name: format!("{}_dg", self.name),
            width: self.width,
            num_controls: self.num_controls,
            body,
        })
    }
}

/// A gate with associated metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Optional label for the gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
            label: None,
        }
    }

    /// Create a new gate from a composite gate.
    pub fn composite(gate: CompositeGate) -> Self {
        Self {
            kind: GateKind::Composite(gate),
            label: None,
        }
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }

    /// The adjoint of this gate. The label is kept.
    pub fn inverse(&self) -> IrResult<Self> {
        let kind = match &self.kind {
            GateKind::Standard(g) => GateKind::Standard(g.inverse()),
            GateKind::Composite(g) => GateKind::Composite(g.inverse()?),
        };
        Ok(Self {
            kind,
            label: self.label.clone(),
        })
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

impl From<CompositeGate> for Gate {
    fn from(gate: CompositeGate) -> Self {
        Gate::composite(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubit::QubitId;
    use std::f64::consts::PI;

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);

        assert!(StandardGate::H.parameters().is_empty());
        assert_eq!(StandardGate::CP(PI).parameters(), vec![PI]);
        assert_eq!(StandardGate::U(1.0, 2.0, 3.0).parameters().len(), 3);
    }

    #[test]
    fn test_inverse_pairs() {
        assert_eq!(StandardGate::S.inverse(), StandardGate::Sdg);
        assert_eq!(StandardGate::Tdg.inverse(), StandardGate::T);
        assert_eq!(StandardGate::CP(0.5).inverse(), StandardGate::CP(-0.5));
        assert_eq!(StandardGate::H.inverse(), StandardGate::H);
        assert_eq!(
            StandardGate::U(1.0, 2.0, 3.0).inverse(),
            StandardGate::U(-1.0, -3.0, -2.0)
        );
    }

    #[test]
    fn test_native_controlled_forms() {
        assert_eq!(StandardGate::P(0.25).controlled(), Some(StandardGate::CP(0.25)));
        assert_eq!(StandardGate::X.controlled(), Some(StandardGate::CX));
        assert_eq!(StandardGate::CX.controlled(), Some(StandardGate::CCX));
        assert_eq!(StandardGate::Swap.controlled(), Some(StandardGate::CSwap));
        assert_eq!(StandardGate::T.controlled(), None);
        assert_eq!(StandardGate::CCX.controlled(), None);
    }

    #[test]
    fn test_gate_creation() {
        let h = Gate::standard(StandardGate::H);
        assert_eq!(h.name(), "h");
        assert_eq!(h.num_qubits(), 1);
        assert!(h.label.is_none());

        let h_labeled = Gate::standard(StandardGate::H).with_label("my_hadamard");
        assert_eq!(h_labeled.label, Some("my_hadamard".to_string()));
    }

    #[test]
    fn test_composite_controlled_and_inverse() {
        let body = vec![
            Instruction::single_qubit_gate(StandardGate::T, QubitId(0)),
            Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1)),
        ];
        let gate = CompositeGate::new("blk", 2, body);
        assert_eq!(gate.num_qubits(), 2);

        let controlled = gate.clone().controlled();
        assert_eq!(controlled.num_qubits(), 3);
        assert_eq!(controlled.name, "cblk");

        let inv = gate.inverse().unwrap();
        assert_eq!(inv.body[0].name(), "cx");
        assert_eq!(inv.body[1].name(), "tdg");
    }

    #[test]
    fn test_gate_serialization() {
        let gate = Gate::standard(StandardGate::CP(0.5)).with_label("k=0");
        let json = serde_json::to_string(&gate).unwrap();
        let back: Gate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, gate);

        let unlabeled = serde_json::to_string(&Gate::standard(StandardGate::H)).unwrap();
        assert!(!unlabeled.contains("label"));
    }
}
