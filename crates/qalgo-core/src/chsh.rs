//! The CHSH game.
//!
//! A referee sends Alice and Bob one random bit each, `x` and `y`. Without
//! communicating they answer `a` and `b`, and win when `a ⊕ b = x ∧ y`. The
//! best classical strategy wins 3/4 of the time; sharing a Bell pair and
//! measuring in rotated bases raises that to `cos²(π/8) ≈ 0.854`.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use qalgo_hal::{Backend, HalError};
use qalgo_ir::{Circuit, ClbitId, QubitId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::error::{AlgoError, AlgoResult};

/// How Alice and Bob choose their answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChshStrategy {
    /// Shared Bell pair, measurement angles chosen from the questions.
    Quantum,
    /// The deterministic table `a = x`, `b = 1 − y`.
    Classical,
    /// Shared Bell pair, random angles that ignore the questions.
    RandomQuantum,
    /// Independent fair coin flips.
    RandomClassical,
}

impl ChshStrategy {
    /// Every strategy, in display order.
    pub const ALL: [Self; 4] = [
        Self::Classical,
        Self::Quantum,
        Self::RandomQuantum,
        Self::RandomClassical,
    ];

    /// The strategy's name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quantum => "quantum",
            Self::Classical => "classical",
            Self::RandomQuantum => "random_quantum",
            Self::RandomClassical => "random_classical",
        }
    }
}

impl fmt::Display for ChshStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChshStrategy {
    type Err = AlgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == lowered)
            .ok_or_else(|| {
                AlgoError::invalid(format!(
                    "unknown strategy '{s}': expected quantum, classical, random_quantum or random_classical"
                ))
            })
    }
}

/// One round of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChshRound {
    /// Alice's question.
    pub x: u8,
    /// Bob's question.
    pub y: u8,
    /// Alice's answer.
    pub a: u8,
    /// Bob's answer.
    pub b: u8,
}

impl ChshRound {
    /// Whether the answers satisfy `a ⊕ b = x ∧ y`.
    pub fn won(&self) -> bool {
        (self.a ^ self.b) == (self.x & self.y)
    }
}

/// Aggregate of many rounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChshReport {
    /// The strategy played.
    pub strategy: ChshStrategy,
    /// Rounds won.
    pub wins: u32,
    /// Rounds played.
    pub games: u32,
    /// `wins / games`.
    pub rate: f64,
}

fn check_bit(name: &str, value: u8) -> AlgoResult<()> {
    if value <= 1 {
        Ok(())
    } else {
        Err(AlgoError::invalid(format!(
            "{name} must be 0 or 1, got {value}"
        )))
    }
}

/// A Bell pair measured after `Ry(alice)` on qubit 0 and `Ry(bob)` on qubit 1.
pub fn bell_circuit(alice: f64, bob: f64) -> AlgoResult<Circuit> {
    let mut qc = Circuit::with_size("chsh", 2, 2);
    qc.h(QubitId(0))?
        .cx(QubitId(0), QubitId(1))?
        .barrier_all()?
        .ry(alice, QubitId(0))?
        .ry(bob, QubitId(1))?
        .measure(QubitId(0), ClbitId(0))?
        .measure(QubitId(1), ClbitId(1))?;
    Ok(qc)
}

/// Measure the rotated Bell pair once; `a` is clbit 1 and `b` is clbit 0.
fn measure_pair(backend: &dyn Backend, alice: f64, bob: f64) -> AlgoResult<(u8, u8)> {
    let circuit = bell_circuit(alice, bob)?;
    let result = backend.run(&circuit, 1)?;
    let (bits, _) = result.counts.most_frequent().ok_or_else(|| {
        HalError::Backend(format!("backend '{}' returned no outcome", backend.name()))
    })?;
    let mut chars = bits.chars().map(|c| u8::from(c == '1'));
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(HalError::Backend(format!("unreadable outcome '{bits}'")).into()),
    }
}

/// The answers `(a, b)` a strategy gives to questions `(x, y)`.
pub fn answers<R: Rng + ?Sized>(
    backend: &dyn Backend,
    strategy: ChshStrategy,
    x: u8,
    y: u8,
    rng: &mut R,
) -> AlgoResult<(u8, u8)> {
    check_bit("x", x)?;
    check_bit("y", y)?;
    match strategy {
        ChshStrategy::Classical => Ok((x, 1 - y)),
        ChshStrategy::RandomClassical => Ok((rng.gen_range(0..=1), rng.gen_range(0..=1))),
        ChshStrategy::Quantum => {
            let alice = if x == 0 { 0.0 } else { -PI / 2.0 };
            let bob = if y == 0 { -PI / 4.0 } else { PI / 4.0 };
            measure_pair(backend, alice, bob)
        }
        ChshStrategy::RandomQuantum => {
            let alice = PI / 8.0 * f64::from(rng.gen_range(-8i32..=8));
            let bob = PI / 8.0 * f64::from(rng.gen_range(-8i32..=8));
            measure_pair(backend, alice, bob)
        }
    }
}

/// Play one round with uniformly random questions.
pub fn play_round<R: Rng + ?Sized>(
    backend: &dyn Backend,
    strategy: ChshStrategy,
    rng: &mut R,
) -> AlgoResult<ChshRound> {
    let x = rng.gen_range(0..=1);
    let y = rng.gen_range(0..=1);
    let (a, b) = answers(backend, strategy, x, y, rng)?;
    let round = ChshRound { x, y, a, b };
    trace!(?round, won = round.won(), "chsh round");
    Ok(round)
}

/// Play `games` rounds and report the fraction won.
pub fn win_rate<R: Rng + ?Sized>(
    backend: &dyn Backend,
    strategy: ChshStrategy,
    games: u32,
    rng: &mut R,
) -> AlgoResult<ChshReport> {
    if games == 0 {
        return Err(AlgoError::invalid("games must be at least 1"));
    }
    let mut wins = 0u32;
    for game in 1..=games {
        if play_round(backend, strategy, rng)?.won() {
            wins += 1;
        }
        if game % 100 == 0 {
            debug!(game, wins, "chsh progress");
        }
    }
    let rate = f64::from(wins) / f64::from(games);
    info!(%strategy, wins, games, rate, "chsh finished");
    Ok(ChshReport {
        strategy,
        wins,
        games,
        rate,
    })
}
