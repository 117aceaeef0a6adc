//! Validated classical bitstrings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AlgoError, AlgoResult};

/// Longest bitstring accepted; wide enough for every register a statevector
/// simulator can hold.
pub const MAX_WIDTH: usize = 64;

/// A non-empty string of `0`/`1` characters.
///
/// Character `i` is bit `i` of the string in reading order. How that maps to
/// qubits is up to the algorithm using it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BitString(Vec<bool>);

impl BitString {
    /// Build from individual bits, in reading order.
    pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> AlgoResult<Self> {
        let bits: Vec<bool> = bits.into_iter().collect();
        if bits.is_empty() {
            return Err(AlgoError::invalid("bitstring must not be empty"));
        }
        if bits.len() > MAX_WIDTH {
            return Err(AlgoError::invalid(format!(
                "bitstring of width {} exceeds the maximum of {MAX_WIDTH}",
                bits.len()
            )));
        }
        Ok(Self(bits))
    }

    /// Number of characters.
    pub fn width(&self) -> usize {
        self.0.len()
    }

    /// The bits in reading order.
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    /// Character `i` as a bool.
    pub fn bit(&self, i: usize) -> Option<bool> {
        self.0.get(i).copied()
    }

    /// Whether every character is `0`.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| !b)
    }

    /// Whether any character is `1`.
    pub fn any(&self) -> bool {
        !self.is_zero()
    }

    /// The string read as an unsigned binary number, leftmost character most
    /// significant.
    pub fn as_u64(&self) -> u64 {
        self.0.iter().fold(0, |acc, &b| (acc << 1) | u64::from(b))
    }

    /// The same bits in the opposite order.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().copied().collect())
    }

    /// Dot product modulo 2, pairing character `i` with character `i`.
    pub fn dot(&self, other: &BitString) -> AlgoResult<bool> {
        if self.width() != other.width() {
            return Err(AlgoError::invalid(format!(
                "cannot take the dot product of '{self}' and '{other}': widths differ"
            )));
        }
        Ok(self
            .0
            .iter()
            .zip(&other.0)
            .fold(false, |acc, (&a, &b)| acc ^ (a & b)))
    }
}

impl FromStr for BitString {
    type Err = AlgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(AlgoError::invalid(format!(
                    "'{s}' is not a binary string (found '{other}')"
                ))),
            })
            .collect::<AlgoResult<Vec<_>>>()?;
        Self::from_bits(bits)
    }
}

impl TryFrom<String> for BitString {
    type Error = AlgoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BitString> for String {
    fn from(bits: BitString) -> Self {
        bits.to_string()
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            f.write_str(if b { "1" } else { "0" })?;
        }
        Ok(())
    }
}
