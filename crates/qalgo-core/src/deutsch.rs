//! Deutsch's algorithm: one query decides whether `f: {0,1} → {0,1}` is
//! constant or balanced.

use std::fmt;

use qalgo_hal::Backend;
use qalgo_ir::{Circuit, ClbitId, QubitId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Verdict;
use crate::error::{AlgoError, AlgoResult};

/// The four functions from one bit to one bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeutschFunction {
    /// f₁(x) = 0
    ConstantZero,
    /// f₂(x) = x
    Identity,
    /// f₃(x) = ¬x
    Not,
    /// f₄(x) = 1
    ConstantOne,
}

impl DeutschFunction {
    /// All four functions, in index order.
    pub const ALL: [Self; 4] = [
        Self::ConstantZero,
        Self::Identity,
        Self::Not,
        Self::ConstantOne,
    ];

    /// Select a function by its index 1–4.
    pub fn from_index(index: u32) -> AlgoResult<Self> {
        match index {
            1 => Ok(Self::ConstantZero),
            2 => Ok(Self::Identity),
            3 => Ok(Self::Not),
            4 => Ok(Self::ConstantOne),
            other => Err(AlgoError::invalid(format!(
                "function must be 1, 2, 3, or 4, got {other}"
            ))),
        }
    }

    /// The function's index 1–4.
    pub fn index(self) -> u32 {
        match self {
            Self::ConstantZero => 1,
            Self::Identity => 2,
            Self::Not => 3,
            Self::ConstantOne => 4,
        }
    }

    /// Evaluate the function classically.
    pub fn evaluate(self, x: bool) -> bool {
        match self {
            Self::ConstantZero => false,
            Self::Identity => x,
            Self::Not => !x,
            Self::ConstantOne => true,
        }
    }

    /// Whether the function is constant or balanced.
    pub fn kind(self) -> Verdict {
        if self.evaluate(false) == self.evaluate(true) {
            Verdict::Constant
        } else {
            Verdict::Balanced
        }
    }

    /// The rows `(x, f(x))` for `x = 0, 1`.
    pub fn truth_table(self) -> [(u8, u8); 2] {
        [
            (0, u8::from(self.evaluate(false))),
            (1, u8::from(self.evaluate(true))),
        ]
    }

    /// The query gate `|x⟩|y⟩ ↦ |x⟩|y ⊕ f(x)⟩` on qubits (0, 1).
    pub fn query_gate(self) -> AlgoResult<Circuit> {
        let mut gate = Circuit::with_size(format!("f{}", self.index()), 2, 0);
        match self {
            Self::ConstantZero => {}
            Self::Identity => {
                gate.cx(QubitId(0), QubitId(1))?;
            }
            Self::Not => {
                gate.x(QubitId(1))?.cx(QubitId(0), QubitId(1))?;
            }
            Self::ConstantOne => {
                gate.x(QubitId(1))?;
            }
        }
        Ok(gate)
    }
}

impl fmt::Display for DeutschFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.index())
    }
}

/// The full Deutsch circuit for `f`, measuring qubit 0 only.
pub fn deutsch_circuit(f: DeutschFunction) -> AlgoResult<Circuit> {
    let mut circuit = Circuit::with_size(format!("deutsch_{f}"), 2, 1);
    circuit
        .x(QubitId(1))?
        .h(QubitId(0))?
        .h(QubitId(1))?
        .barrier_all()?;
    circuit.compose(&f.query_gate()?, &[QubitId(0), QubitId(1)])?;
    circuit
        .barrier_all()?
        .h(QubitId(0))?
        .measure(QubitId(0), ClbitId(0))?;
    Ok(circuit)
}

/// Decide whether `f` is constant or balanced with a single shot.
pub fn run(backend: &dyn Backend, f: DeutschFunction) -> AlgoResult<Verdict> {
    let circuit = deutsch_circuit(f)?;
    let result = backend.run(&circuit, 1)?;
    let verdict = match result.counts.most_frequent() {
        Some((bits, _)) if bits == "1" => Verdict::Balanced,
        Some(_) => Verdict::Constant,
        None => {
            return Err(qalgo_hal::HalError::Backend(format!(
                "backend '{}' returned no outcome",
                backend.name()
            ))
            .into());
        }
    };
    debug!(function = %f, %verdict, "deutsch");
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index() {
        for (i, f) in DeutschFunction::ALL.iter().enumerate() {
            let index = u32::try_from(i).unwrap() + 1;
            assert_eq!(DeutschFunction::from_index(index).unwrap(), *f);
            assert_eq!(f.index(), index);
        }
        assert!(DeutschFunction::from_index(0).is_err());
        assert!(DeutschFunction::from_index(5).is_err());
    }

    #[test]
    fn test_truth_tables() {
        assert_eq!(DeutschFunction::ConstantZero.truth_table(), [(0, 0), (1, 0)]);
        assert_eq!(DeutschFunction::Identity.truth_table(), [(0, 0), (1, 1)]);
        assert_eq!(DeutschFunction::Not.truth_table(), [(0, 1), (1, 0)]);
        assert_eq!(DeutschFunction::ConstantOne.truth_table(), [(0, 1), (1, 1)]);
    }

    #[test]
    fn test_kind() {
        assert_eq!(DeutschFunction::ConstantZero.kind(), Verdict::Constant);
        assert_eq!(DeutschFunction::ConstantOne.kind(), Verdict::Constant);
        assert_eq!(DeutschFunction::Identity.kind(), Verdict::Balanced);
        assert_eq!(DeutschFunction::Not.kind(), Verdict::Balanced);
    }

    #[test]
    fn test_query_gate_sizes() {
        assert_eq!(DeutschFunction::ConstantZero.query_gate().unwrap().num_ops(), 0);
        assert_eq!(DeutschFunction::Not.query_gate().unwrap().num_ops(), 2);
        let circuit = deutsch_circuit(DeutschFunction::Identity).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 1);
    }
}
