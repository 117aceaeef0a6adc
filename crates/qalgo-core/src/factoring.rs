//! Order finding and factoring on top of phase estimation.
//!
//! The phase of controlled multiplication by `a mod n`, estimated on `|1⟩`,
//! is `s/r` for a random `s` and the multiplicative order `r` of `a`. A
//! continued-fraction read-out recovers `r`, and `gcd(a^(r/2) − 1, n)` is a
//! non-trivial factor often enough that a handful of attempts suffice.

use qalgo_hal::Backend;
use qalgo_ir::{Circuit, QubitId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{AlgoError, AlgoResult};
use crate::operation::Operation;
use crate::phase::{PhaseEstimate, Precision, Readout, estimate_phase};

/// The only modulus with a multiplier circuit.
pub const MODULUS_15: u64 = 15;

/// Multipliers coprime to 15 that have a hard-coded circuit.
pub const AMOD15_MULTIPLIERS: [u64; 6] = [2, 4, 7, 8, 11, 13];

/// Result of a bounded factoring run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FactorOutcome {
    /// A non-trivial factor was found.
    Found {
        /// The factor.
        factor: u64,
        /// Attempts used, including the successful one.
        attempts: u32,
        /// The phase that produced the factor.
        phase: PhaseEstimate,
    },
    /// Every attempt failed.
    Exhausted {
        /// Attempts made.
        attempts: u32,
    },
}

impl FactorOutcome {
    /// The factor, if one was found.
    pub fn factor(&self) -> Option<u64> {
        match self {
            Self::Found { factor, .. } => Some(*factor),
            Self::Exhausted { .. } => None,
        }
    }
}

/// Best rational approximation of `x` with denominator at most `max_den`.
///
/// `x` is taken at its exact binary value. The continued fraction of `x` is
/// truncated before its denominator exceeds `max_den`, and the last
/// convergent is compared with the best semiconvergent, so results agree
/// with the usual `limit_denominator` of rational libraries.
pub fn limit_denominator(x: f64, max_den: u64) -> AlgoResult<(u64, u64)> {
    if max_den < 1 {
        return Err(AlgoError::invalid("max_den must be at least 1"));
    }
    if !x.is_finite() || x < 0.0 || x >= 2f64.powi(63) {
        return Err(AlgoError::invalid(format!(
            "cannot approximate {x}: expected a finite number in [0, 2^63)"
        )));
    }
    if x < 2f64.powi(-70) {
        // Nothing with a 64-bit denominator beats 0/1 this close to zero.
        return Ok((0, 1));
    }
    let Some((num, den)) = exact_ratio(x) else {
        return Err(AlgoError::invalid(format!("cannot approximate {x}")));
    };
    limit_ratio(num, den, u128::from(max_den))
}

/// `x` as an exact, reduced ratio with a power-of-two denominator.
fn exact_ratio(x: f64) -> Option<(u128, u128)> {
    if x == 0.0 {
        return Some((0, 1));
    }
    let bits = x.to_bits();
    let biased = i64::try_from((bits >> 52) & 0x7ff).ok()?;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mut mantissa, mut exponent) = if biased == 0 {
        (fraction, -1074i64)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    let zeros = mantissa.trailing_zeros();
    mantissa >>= zeros;
    exponent += i64::from(zeros);

    if exponent >= 0 {
        let shift = u32::try_from(exponent).ok().filter(|&s| s < 64)?;
        Some((u128::from(mantissa) << shift, 1))
    } else {
        let shift = u32::try_from(-exponent).ok().filter(|&s| s <= 126)?;
        Some((u128::from(mantissa), 1u128 << shift))
    }
}

fn limit_ratio(num: u128, den: u128, max_den: u128) -> AlgoResult<(u64, u64)> {
    let narrow = |(p, q): (u128, u128)| -> AlgoResult<(u64, u64)> {
        match (u64::try_from(p), u64::try_from(q)) {
            (Ok(p), Ok(q)) => Ok((p, q)),
            _ => Err(AlgoError::invalid(format!(
                "{p}/{q} does not fit in 64 bits"
            ))),
        }
    };

    if den <= max_den {
        return narrow((num, den));
    }

    let (mut p0, mut q0, mut p1, mut q1) = (0u128, 1u128, 1u128, 0u128);
    let (mut n, mut d) = (num, den);
    loop {
        let a = n / d;
        let q2 = q0 + a * q1;
        if q2 > max_den {
            break;
        }
        (p0, q0, p1, q1) = (p1, q1, p0 + a * p1, q2);
        (n, d) = (d, n - a * d);
    }

    let k = (max_den - q0) / q1;
    let semi_den = q0 + k * q1;
    // The convergent p1/q1 wins when 2·d·semi_den ≤ den; an overflow means
    // the left side is far larger.
    let convergent_wins = d
        .checked_mul(2)
        .and_then(|v| v.checked_mul(semi_den))
        .is_some_and(|v| v <= den);
    if convergent_wins {
        narrow((p1, q1))
    } else {
        narrow((p0 + k * p1, semi_den))
    }
}

/// Greatest common divisor.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `base^exp mod modulus`.
pub fn mod_pow(base: u64, mut exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let m = u128::from(modulus);
    let mut result = 1u128;
    let mut b = u128::from(base) % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * b % m;
        }
        b = b * b % m;
        exp >>= 1;
    }
    // Reduced modulo a u64, so it fits.
    #[allow(clippy::cast_possible_truncation)]
    let reduced = result as u64;
    reduced
}

/// Try to turn a measured phase into a factor of `n`.
///
/// The order guess `r` is the denominator of the phase limited to `n`. A
/// zero phase carries no information and yields `None`.
pub fn factor_from_phase(phase: f64, a: u64, n: u64) -> AlgoResult<Option<u64>> {
    if n < 2 {
        return Err(AlgoError::invalid(format!(
            "modulus must be at least 2, got {n}"
        )));
    }
    let (_, r) = limit_denominator(phase, n)?;
    if phase == 0.0 {
        return Ok(None);
    }
    // a^(r/2) − 1, reduced mod n without underflow.
    let x = mod_pow(a, r / 2, n);
    let guess = gcd((x + n - 1) % n, n);
    debug!(phase, r, guess, "order guess");
    if guess != 1 && guess != n && n % guess == 0 {
        Ok(Some(guess))
    } else {
        Ok(None)
    }
}

/// Multiplication by `a mod 15` on a 4-qubit register, as a swap network.
///
/// Defined for `a ∈ {2, 4, 7, 8, 11, 13}`.
pub fn amod15(a: u64) -> AlgoResult<Circuit> {
    if !AMOD15_MULTIPLIERS.contains(&a) {
        return Err(AlgoError::invalid(format!(
            "a must be one of {AMOD15_MULTIPLIERS:?}, got {a}"
        )));
    }
    let q = |i: u32| QubitId(i);
    let mut circuit = Circuit::with_size(format!("{a} mod 15"), 4, 0);
    match a {
        2 | 13 => {
            circuit
                .swap(q(2), q(3))?
                .swap(q(1), q(2))?
                .swap(q(0), q(1))?;
        }
        7 | 8 => {
            circuit
                .swap(q(0), q(1))?
                .swap(q(1), q(2))?
                .swap(q(2), q(3))?;
        }
        4 | 11 => {
            circuit.swap(q(1), q(3))?.swap(q(0), q(2))?;
        }
        _ => {}
    }
    if matches!(a, 7 | 11 | 13) {
        for i in 0..4 {
            circuit.x(q(i))?;
        }
    }
    Ok(circuit)
}

/// The multiplier circuit for `a mod n`.
pub fn modular_multiplier(a: u64, n: u64) -> AlgoResult<Circuit> {
    if n != MODULUS_15 {
        return Err(AlgoError::invalid(format!(
            "no multiplier circuit for modulus {n}; only {MODULUS_15} is supported"
        )));
    }
    amod15(a)
}

/// Search for a non-trivial factor of `n`, trying at most `max_attempts`
/// single-shot phase estimations.
#[instrument(skip(backend), fields(backend = backend.name()))]
pub fn find_factor(
    backend: &dyn Backend,
    a: u64,
    n: u64,
    precision: u32,
    max_attempts: u32,
) -> AlgoResult<FactorOutcome> {
    if max_attempts == 0 {
        return Err(AlgoError::invalid("max_attempts must be at least 1"));
    }
    let precision = Precision::new(precision)?;
    let multiplier = Operation::SubCircuit(modular_multiplier(a, n)?);

    let mut one = Circuit::with_size("one", 4, 0);
    one.x(QubitId(0))?;
    let eigenstate = Operation::SubCircuit(one);

    for attempt in 1..=max_attempts {
        let phase = estimate_phase(
            backend,
            &multiplier,
            &eigenstate,
            precision,
            Readout::SINGLE_SHOT,
        )?;
        info!(attempt, phase = phase.value(), "factoring attempt");

        if let Some(factor) = factor_from_phase(phase.value(), a, n)? {
            info!(attempt, factor, "found non-trivial factor of {n}");
            return Ok(FactorOutcome::Found {
                factor,
                attempts: attempt,
                phase,
            });
        }
    }

    info!(max_attempts, "no factor found");
    Ok(FactorOutcome::Exhausted {
        attempts: max_attempts,
    })
}
