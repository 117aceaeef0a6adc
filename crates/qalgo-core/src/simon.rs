//! Simon's algorithm for a hidden XOR period.
//!
//! The oracle for a secret `s` copies the input register into the output
//! register and then XORs `s` into the output whenever input qubit 0 is set.
//! When `s` starts with `1` the resulting function is two-to-one with
//! `f(x) = f(x ⊕ s)`, and every measured `y` is orthogonal to `s` over
//! GF(2). Recovering `s` from those equations is classical work, done by
//! [`recover_secret`].

use std::collections::BTreeSet;

use qalgo_hal::Backend;
use qalgo_ir::{Circuit, ClbitId, QubitId};
use tracing::debug;

use crate::bits::BitString;
use crate::error::AlgoResult;

/// The `2n`-qubit oracle for secret `s`; character `i` of `s` is qubit `i`.
pub fn oracle(secret: &BitString) -> AlgoResult<Circuit> {
    #[allow(clippy::cast_possible_truncation)]
    let n = secret.width() as u32;
    let mut qc = Circuit::with_size(format!("simon_oracle_{secret}"), 2 * n, 0);
    for i in 0..n {
        qc.cx(QubitId(i), QubitId(i + n))?;
    }
    qc.barrier_all()?;
    for (i, bit) in (0..n).zip(secret.bits()) {
        if *bit {
            qc.cx(QubitId(0), QubitId(n + i))?;
        }
    }
    Ok(qc)
}

/// The full Simon circuit, measuring the input register.
pub fn simon_circuit(secret: &BitString) -> AlgoResult<Circuit> {
    #[allow(clippy::cast_possible_truncation)]
    let n = secret.width() as u32;
    let mut qc = Circuit::with_size(format!("simon_{secret}"), 2 * n, n);
    for i in 0..n {
        qc.h(QubitId(i))?;
    }
    qc.barrier_all()?;
    let all: Vec<_> = (0..2 * n).map(QubitId).collect();
    qc.compose(&oracle(secret)?, &all)?;
    qc.barrier_all()?;
    for i in 0..n {
        qc.h(QubitId(i))?.measure(QubitId(i), ClbitId(i))?;
    }
    Ok(qc)
}

/// Sample the Simon circuit and return the distinct outcomes, sorted.
///
/// Outcomes use the secret's character order, so `y.dot(secret)` is the
/// GF(2) inner product the algorithm guarantees to vanish.
pub fn run(backend: &dyn Backend, secret: &BitString, shots: u32) -> AlgoResult<Vec<BitString>> {
    let circuit = simon_circuit(secret)?;
    let result = backend.run(&circuit, shots)?;
    let samples = result
        .counts
        .iter()
        .map(|(bits, _)| bits.parse::<BitString>().map(|b| b.reversed()))
        .collect::<AlgoResult<BTreeSet<_>>>()?;
    debug!(secret = %secret, distinct = samples.len(), shots, "simon");
    Ok(samples.into_iter().collect())
}

fn to_mask(bits: &BitString) -> u64 {
    bits.bits()
        .iter()
        .enumerate()
        .fold(0, |acc, (i, &b)| acc | (u64::from(b) << i))
}

/// Solve `y·s = 0` for every sample `y` over GF(2).
///
/// Returns the unique nonzero solution when the samples span a space of
/// dimension `n − 1`, and `None` when they do not pin `s` down (or a sample
/// has the wrong width).
pub fn recover_secret(samples: &[BitString], n: usize) -> Option<BitString> {
    if n == 0 || n > crate::bits::MAX_WIDTH || samples.iter().any(|y| y.width() != n) {
        return None;
    }

    // Fully reduced rows, each owning the pivot at its lowest set bit.
    let mut rows: Vec<u64> = Vec::new();
    for y in samples {
        let mut v = to_mask(y);
        for &row in &rows {
            if v >> row.trailing_zeros() & 1 == 1 {
                v ^= row;
            }
        }
        if v == 0 {
            continue;
        }
        let pivot = v.trailing_zeros();
        for row in &mut rows {
            if *row >> pivot & 1 == 1 {
                *row ^= v;
            }
        }
        rows.push(v);
    }

    if rows.len() + 1 != n {
        return None;
    }

    let pivots: u64 = rows.iter().fold(0, |acc, row| acc | (1 << row.trailing_zeros()));
    let free = (0..n).find(|&i| pivots >> i & 1 == 0)?;
    let mut secret = 1u64 << free;
    for row in &rows {
        if row >> free & 1 == 1 {
            secret |= 1 << row.trailing_zeros();
        }
    }
    BitString::from_bits((0..n).map(|i| secret >> i & 1 == 1)).ok()
}
