//! Superdense coding: two classical bits carried by one qubit of a shared
//! Bell pair.

use qalgo_hal::{Backend, Counts};
use qalgo_ir::{Circuit, QubitId};
use tracing::debug;

use crate::bits::BitString;
use crate::error::{AlgoError, AlgoResult};

/// The protocol circuit for a two-bit message `ab`.
///
/// Alice applies `Z` when `b = 1` and `X` when `a = 1` to her half of the
/// pair; Bob undoes the entanglement and measures both qubits. Read with
/// clbit 1 leftmost, the outcome equals the message.
pub fn encode(message: &BitString) -> AlgoResult<Circuit> {
    let (a, b) = match message.bits() {
        [a, b] => (*a, *b),
        _ => {
            return Err(AlgoError::invalid(format!(
                "message must be a two-digit binary string, got '{message}'"
            )));
        }
    };

    let mut qc = Circuit::with_size(format!("superdense_{message}"), 2, 0);
    qc.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.barrier_all()?;
    if b {
        qc.z(QubitId(0))?;
    }
    if a {
        qc.x(QubitId(0))?;
    }
    qc.barrier_all()?
        .cx(QubitId(0), QubitId(1))?
        .h(QubitId(0))?
        .measure_all()?;
    Ok(qc)
}

/// Send `message` `shots` times and return Bob's measurement counts.
pub fn run(backend: &dyn Backend, message: &BitString, shots: u32) -> AlgoResult<Counts> {
    let circuit = encode(message)?;
    let result = backend.run(&circuit, shots)?;
    debug!(%message, outcomes = result.counts.len(), "superdense");
    Ok(result.counts)
}

/// Bob's reading of the message: the most frequent outcome.
pub fn decode(counts: &Counts) -> AlgoResult<BitString> {
    let (bits, _) = counts
        .most_frequent()
        .ok_or_else(|| AlgoError::invalid("cannot decode empty counts"))?;
    bits.parse()
}
