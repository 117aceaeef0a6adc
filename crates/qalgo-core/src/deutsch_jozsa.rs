//! Deutsch–Jozsa: one query decides whether an n-bit oracle is constant or
//! balanced, given that it is one of the two.

use qalgo_hal::{Backend, HalError};
use qalgo_ir::{Circuit, ClbitId, QubitId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Verdict;
use crate::error::{AlgoError, AlgoResult};

/// Largest input width, limited by the pattern's bit width.
pub const MAX_INPUTS: u32 = 63;

/// A Deutsch–Jozsa oracle over `n` input bits and one output bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DjOracle {
    /// `f(x) = value` for every `x`.
    Constant {
        /// The constant output.
        value: bool,
    },
    /// `f(x) = parity(x ⊕ pattern)`, balanced for every pattern.
    Balanced {
        /// Input qubits conjugated with X, bit `i` for qubit `i`.
        pattern: u64,
    },
}

fn check_inputs(n: u32) -> AlgoResult<()> {
    if (1..=MAX_INPUTS).contains(&n) {
        Ok(())
    } else {
        Err(AlgoError::invalid(format!(
            "n must be a positive integer no larger than {MAX_INPUTS}, got {n}"
        )))
    }
}

impl DjOracle {
    /// Draw an oracle: constant half the time (each output value equally
    /// likely), otherwise balanced with a uniformly random pattern.
    pub fn random<R: Rng + ?Sized>(n: u32, rng: &mut R) -> AlgoResult<Self> {
        check_inputs(n)?;
        if rng.gen_bool(0.5) {
            Ok(Self::Constant {
                value: rng.gen_bool(0.5),
            })
        } else {
            Ok(Self::Balanced {
                pattern: rng.gen_range(0..(1u64 << n)),
            })
        }
    }

    /// Whether the oracle is constant or balanced.
    pub fn kind(&self) -> Verdict {
        match self {
            Self::Constant { .. } => Verdict::Constant,
            Self::Balanced { .. } => Verdict::Balanced,
        }
    }

    /// Evaluate the oracle classically on input `x`.
    pub fn evaluate(&self, x: u64) -> bool {
        match *self {
            Self::Constant { value } => value,
            Self::Balanced { pattern } => (x ^ pattern).count_ones() % 2 == 1,
        }
    }

    /// The oracle as an `(n + 1)`-qubit circuit; qubit `n` is the output.
    pub fn circuit(&self, n: u32) -> AlgoResult<Circuit> {
        check_inputs(n)?;
        let output = QubitId(n);
        let mut qc = Circuit::with_size("oracle", n + 1, 0);
        match *self {
            Self::Constant { value } => {
                if value {
                    qc.x(output)?;
                }
            }
            Self::Balanced { pattern } => {
                if pattern >> n != 0 {
                    return Err(AlgoError::invalid(format!(
                        "pattern {pattern:#b} does not fit in {n} inputs"
                    )));
                }
                let flipped: Vec<_> = (0..n)
                    .filter(|&i| pattern >> i & 1 == 1)
                    .map(QubitId)
                    .collect();
                for &q in &flipped {
                    qc.x(q)?;
                }
                qc.barrier_all()?;
                for i in 0..n {
                    qc.cx(QubitId(i), output)?;
                }
                qc.barrier_all()?;
                for &q in &flipped {
                    qc.x(q)?;
                }
            }
        }
        Ok(qc)
    }
}

/// A Deutsch–Jozsa run: the verdict and the circuit that produced it.
#[derive(Debug, Clone)]
pub struct DjOutcome {
    /// Constant or balanced, as measured.
    pub verdict: Verdict,
    /// The full circuit, oracle included.
    pub circuit: Circuit,
}

/// The full Deutsch–Jozsa circuit for `oracle` over `n` inputs.
pub fn deutsch_jozsa_circuit(oracle: &DjOracle, n: u32) -> AlgoResult<Circuit> {
    let query = oracle.circuit(n)?;
    let mut qc = Circuit::with_size(format!("deutsch_jozsa_{n}"), n + 1, n);
    qc.x(QubitId(n))?;
    for q in 0..=n {
        qc.h(QubitId(q))?;
    }
    qc.barrier_all()?;
    let all: Vec<_> = (0..=n).map(QubitId).collect();
    qc.compose(&query, &all)?;
    qc.barrier_all()?;
    for q in 0..n {
        qc.h(QubitId(q))?.measure(QubitId(q), ClbitId(q))?;
    }
    Ok(qc)
}

/// Run Deutsch–Jozsa with a single shot. Any `1` in the outcome means
/// balanced.
pub fn run(backend: &dyn Backend, oracle: &DjOracle, n: u32) -> AlgoResult<DjOutcome> {
    let circuit = deutsch_jozsa_circuit(oracle, n)?;
    let result = backend.run(&circuit, 1)?;
    let (bits, _) = result.counts.most_frequent().ok_or_else(|| {
        HalError::Backend(format!("backend '{}' returned no outcome", backend.name()))
    })?;
    let verdict = if bits.contains('1') {
        Verdict::Balanced
    } else {
        Verdict::Constant
    };
    debug!(n, outcome = %bits, %verdict, "deutsch-jozsa");
    Ok(DjOutcome { verdict, circuit })
}
