//! qalgo Algorithms
//!
//! Textbook quantum algorithms built on the `qalgo-ir` circuit builder and
//! run through any [`qalgo_hal::Backend`].
//!
//! | Module | Algorithm |
//! |--------|-----------|
//! | [`phase`] | Quantum phase estimation |
//! | [`factoring`] | Order finding for `a mod 15` and continued-fraction read-out |
//! | [`deutsch`] | Deutsch's algorithm |
//! | [`deutsch_jozsa`] | Deutsch–Jozsa |
//! | [`simon`] | Simon's algorithm, with GF(2) recovery of the secret |
//! | [`chsh`] | The CHSH game, classical and quantum strategies |
//! | [`superdense`] | Superdense coding |
//!
//! Every function validates its arguments before building a circuit, and
//! none of them prints or prompts.
//!
//! # Example
//!
//! ```
//! use qalgo_adapter_sim::SimulatorBackend;
//! use qalgo_core::phase::{Readout, estimate_phase_gate};
//!
//! let backend = SimulatorBackend::with_seed(1);
//! let estimate = estimate_phase_gate(&backend, 0.625, 3, Readout::Exact).unwrap();
//! assert_eq!(estimate.numerator, 5);
//! assert_eq!(estimate.value(), 0.625);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod bits;
pub mod chsh;
pub mod deutsch;
pub mod deutsch_jozsa;
pub mod error;
pub mod factoring;
pub mod operation;
pub mod phase;
pub mod simon;
pub mod superdense;

pub use bits::BitString;
pub use chsh::{ChshReport, ChshRound, ChshStrategy};
pub use deutsch::DeutschFunction;
pub use deutsch_jozsa::{DjOracle, DjOutcome};
pub use error::{AlgoError, AlgoResult};
pub use factoring::FactorOutcome;
pub use operation::Operation;
pub use phase::{PhaseEstimate, Precision, Readout, estimate_phase};

/// Answer of a constant-or-balanced promise problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Same output on every input.
    Constant,
    /// Output `1` on exactly half of the inputs.
    Balanced,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => f.write_str("constant"),
            Self::Balanced => f.write_str("balanced"),
        }
    }
}
