//! Quantum phase estimation.
//!
//! Given a controlled unitary `U` and a preparation of one of its
//! eigenstates `|ψ⟩` with `U|ψ⟩ = e^(2πiφ)|ψ⟩`, phase estimation writes the
//! best `m`-bit approximation of `φ` into an ancilla register:
//!
//! ```text
//! ancilla k ──H──●────────── ... ──┤     ├──M── clbit k
//!                │                 │ QFT†│
//! target   ─ψ────U^(2^k)──── ... ──┤     ├
//! ```
//!
//! Ancilla `k` controls `2^k` literal repetitions of `U`. The measured
//! register, read as an unsigned integer `y` (ancilla `k` is bit `k`), gives
//! the estimate `y / 2^m`.

use std::f64::consts::PI;
use std::fmt;

use qalgo_hal::{Backend, HalError};
use qalgo_ir::{Circuit, StandardGate};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{AlgoError, AlgoResult};
use crate::operation::Operation;

/// Number of ancilla qubits in a phase estimation, between 1 and 15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Precision(u32);

impl Precision {
    /// Smallest supported precision.
    pub const MIN: u32 = 1;
    /// Largest supported precision.
    pub const MAX: u32 = 15;

    /// Validate a precision.
    pub fn new(bits: u32) -> AlgoResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(AlgoError::invalid(format!(
                "precision must be an integer between {} and {} (inclusive), got {bits}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// Number of ancilla bits.
    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// `2^bits`, the denominator of every estimate at this precision.
    #[inline]
    pub fn resolution(self) -> u64 {
        1u64 << self.0
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u32> for Precision {
    type Error = AlgoError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl From<Precision> for u32 {
    fn from(p: Precision) -> Self {
        p.0
    }
}

/// A phase estimate `numerator / 2^precision`, always in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseEstimate {
    /// The measured ancilla register as an integer.
    pub numerator: u64,
    /// Ancilla width the estimate was taken at.
    pub precision: Precision,
}

impl PhaseEstimate {
    /// Build an estimate, rejecting numerators that do not fit the precision.
    pub fn new(numerator: u64, precision: Precision) -> AlgoResult<Self> {
        if numerator >= precision.resolution() {
            return Err(AlgoError::invalid(format!(
                "numerator {numerator} does not fit in {} bits",
                precision.bits()
            )));
        }
        Ok(Self {
            numerator,
            precision,
        })
    }

    /// `2^precision`.
    pub fn denominator(&self) -> u64 {
        self.precision.resolution()
    }

    /// The estimate as a float.
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator() as f64
    }
}

impl fmt::Display for PhaseEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}/{})",
            self.value(),
            self.numerator,
            self.denominator()
        )
    }
}

/// How the ancilla register is collapsed to a single outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Readout {
    /// Sample the circuit and keep the most frequent outcome. With one shot
    /// this is simply the observed outcome.
    Sample {
        /// Number of shots to take.
        shots: u32,
    },
    /// Take the most probable outcome of the noiseless distribution.
    Exact,
}

impl Readout {
    /// A single collapse event.
    pub const SINGLE_SHOT: Self = Self::Sample { shots: 1 };

    /// Collapse `circuit` on `backend` and return the chosen bitstring.
    pub fn collapse(self, backend: &dyn Backend, circuit: &Circuit) -> AlgoResult<String> {
        let outcome = match self {
            Self::Sample { shots } => {
                let result = backend.run(circuit, shots)?;
                result
                    .counts
                    .most_frequent()
                    .map(|(bits, _)| bits.clone())
            }
            Self::Exact => {
                let probs = backend.probabilities(circuit)?;
                probs.most_probable().map(|(bits, _)| bits.clone())
            }
        };
        outcome.ok_or_else(|| {
            AlgoError::Backend(HalError::Backend(format!(
                "backend '{}' returned no outcomes for '{}'",
                backend.name(),
                circuit.name()
            )))
        })
    }
}

impl Default for Readout {
    fn default() -> Self {
        Self::Sample { shots: 1024 }
    }
}

/// Build the phase estimation circuit without running it.
///
/// Qubits `0..m` are the ancillas, followed by the target register. The
/// circuit measures ancilla `k` into clbit `k` and nothing else.
pub fn phase_estimation_circuit(
    controlled_unitary: &Operation,
    eigenstate_prep: &Operation,
    precision: Precision,
) -> AlgoResult<Circuit> {
    let width = eigenstate_prep.width();
    if controlled_unitary.width() != width {
        return Err(AlgoError::invalid(format!(
            "unitary '{}' acts on {} qubits but eigenstate preparation '{}' prepares {}",
            controlled_unitary.name(),
            controlled_unitary.width(),
            eigenstate_prep.name(),
            width
        )));
    }

    let m = precision.bits();
    let mut circuit = Circuit::new(format!("qpe_{m}"));
    let ancilla = circuit.add_qreg("ancilla", m);
    #[allow(clippy::cast_possible_truncation)]
    let target = circuit.add_qreg("target", width as u32);
    let readout = circuit.add_creg("c", m);

    eigenstate_prep.apply(&mut circuit, &target)?;
    circuit.barrier_all()?;
    for &q in &ancilla {
        circuit.h(q)?;
    }

    let controlled = controlled_unitary.controlled_gate()?;
    for (k, &control) in ancilla.iter().enumerate() {
        for _ in 0..(1u64 << k) {
            circuit.gate(
                controlled.clone(),
                std::iter::once(control).chain(target.iter().copied()),
            )?;
        }
    }
    circuit.barrier_all()?;

    circuit.compose(&Circuit::iqft(m)?, &ancilla)?;
    circuit.barrier_all()?;

    for (&q, &c) in ancilla.iter().zip(&readout) {
        circuit.measure(q, c)?;
    }

    debug!(
        qubits = circuit.num_qubits(),
        ops = circuit.num_ops(),
        depth = circuit.depth(),
        "built phase estimation circuit"
    );
    Ok(circuit)
}

/// Estimate the eigenphase of `controlled_unitary` on the state prepared by
/// `eigenstate_prep`.
///
/// Exactly representable phases `y / 2^m` are returned exactly. Otherwise
/// the result is close to the true phase with high probability; there is no
/// retry or averaging.
#[instrument(skip_all, fields(unitary = controlled_unitary.name(), precision = precision.bits()))]
pub fn estimate_phase(
    backend: &dyn Backend,
    controlled_unitary: &Operation,
    eigenstate_prep: &Operation,
    precision: Precision,
    readout: Readout,
) -> AlgoResult<PhaseEstimate> {
    let circuit = phase_estimation_circuit(controlled_unitary, eigenstate_prep, precision)?;
    let bits = readout.collapse(backend, &circuit)?;
    let numerator = u64::from_str_radix(&bits, 2).map_err(|e| {
        AlgoError::Backend(HalError::Backend(format!(
            "unreadable outcome '{bits}': {e}"
        )))
    })?;
    let estimate = PhaseEstimate::new(numerator, precision)?;
    debug!(outcome = %bits, estimate = estimate.value(), "phase estimated");
    Ok(estimate)
}

fn check_phase(phi: f64) -> AlgoResult<()> {
    if (0.0..=1.0).contains(&phi) {
        Ok(())
    } else {
        Err(AlgoError::invalid(format!(
            "phi must be between 0 and 1, got {phi}"
        )))
    }
}

/// Estimate `φ` for the phase gate `P(2πφ)` with eigenstate `|1⟩`.
pub fn estimate_phase_gate(
    backend: &dyn Backend,
    phi: f64,
    precision: u32,
    readout: Readout,
) -> AlgoResult<PhaseEstimate> {
    check_phase(phi)?;
    let precision = Precision::new(precision)?;
    estimate_phase(
        backend,
        &Operation::phase(2.0 * PI * phi),
        &Operation::Gate(StandardGate::X),
        precision,
        readout,
    )
}

/// One ancilla: the estimate is rounded to the nearest half (0 or 0.5).
pub fn estimate_phase_low_precision(backend: &dyn Backend, phi: f64) -> AlgoResult<PhaseEstimate> {
    estimate_phase_gate(backend, phi, 1, Readout::default())
}

/// Two ancillas: the estimate is rounded to the nearest quarter.
pub fn estimate_phase_two_qubits(backend: &dyn Backend, phi: f64) -> AlgoResult<PhaseEstimate> {
    estimate_phase_gate(backend, phi, 2, Readout::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_bounds() {
        assert!(Precision::new(0).is_err());
        assert!(Precision::new(16).is_err());
        assert_eq!(Precision::new(1).unwrap().bits(), 1);
        assert_eq!(Precision::new(15).unwrap().resolution(), 32768);
        assert_eq!(Precision::default().bits(), 3);
    }

    #[test]
    fn test_estimate_value() {
        let p = Precision::new(3).unwrap();
        let est = PhaseEstimate::new(3, p).unwrap();
        assert!((est.value() - 0.375).abs() < f64::EPSILON);
        assert_eq!(est.denominator(), 8);
        assert_eq!(est.to_string(), "0.375 (3/8)");
        assert!(PhaseEstimate::new(8, p).is_err());
    }

    #[test]
    fn test_circuit_shape() {
        let p = Precision::new(3).unwrap();
        let circuit =
            phase_estimation_circuit(&Operation::phase(1.0), &Operation::Gate(StandardGate::X), p)
                .unwrap();
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.num_clbits(), 3);

        let cp_count = circuit
            .instructions()
            .filter(|i| i.name() == "cp")
            .count();
        // 1 + 2 + 4 controlled applications, plus the 3 from the inverse QFT.
        assert_eq!(cp_count, 7 + 3);
        let measures = circuit.instructions().filter(|i| i.is_measure()).count();
        assert_eq!(measures, 3);
    }

    #[test]
    fn test_width_mismatch() {
        let p = Precision::new(2).unwrap();
        let err = phase_estimation_circuit(
            &Operation::phase(1.0),
            &Operation::Gate(StandardGate::Swap),
            p,
        )
        .unwrap_err();
        assert!(matches!(err, AlgoError::InvalidArgument(_)));
    }

    #[test]
    fn test_precision_serde() {
        let p: Precision = serde_json::from_str("8").unwrap();
        assert_eq!(p.bits(), 8);
        assert!(serde_json::from_str::<Precision>("0").is_err());
    }
}
