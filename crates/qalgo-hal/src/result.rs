//! Execution results.
//!
//! Bitstrings are written with the highest classical bit leftmost: for a
//! circuit with clbits `c0..c{n-1}`, character `0` of the string is `c{n-1}`
//! and the last character is `c0`. Parsing a bitstring as a binary number
//! therefore yields the integer whose bit `k` is clbit `k`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Measurement counts keyed by bitstring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create an empty set of counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build counts from `(bitstring, count)` pairs. Repeated keys accumulate.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, u64)>) -> Self {
        let mut counts = Self::new();
        for (bitstring, n) in pairs {
            counts.insert(bitstring, n);
        }
        counts
    }

    /// Add `n` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, n: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += n;
    }

    /// Number of times `bitstring` was observed (0 if never).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of recorded shots.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct bitstrings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no shot has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(bitstring, count)` in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// The outcome observed most often. Ties go to the smallest bitstring so
    /// the answer does not depend on hash order.
    pub fn most_frequent(&self) -> Option<(&String, u64)> {
        self.counts
            .iter()
            .map(|(k, &v)| (k, v))
            .max_by(|(ka, va), (kb, vb)| va.cmp(vb).then_with(|| kb.cmp(ka)))
    }

    /// Outcomes sorted by descending count, then ascending bitstring.
    pub fn sorted(&self) -> Vec<(&String, u64)> {
        let mut entries: Vec<_> = self.counts.iter().map(|(k, &v)| (k, v)).collect();
        entries.sort_by(|(ka, va), (kb, vb)| vb.cmp(va).then_with(|| ka.cmp(kb)));
        entries
    }
}

/// Exact outcome distribution of a circuit, keyed like [`Counts`].
///
/// Outcomes with zero probability are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Probabilities {
    probabilities: FxHashMap<String, f64>,
}

impl Probabilities {
    /// Create an empty distribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add probability mass to an outcome.
    pub fn insert(&mut self, bitstring: impl Into<String>, p: f64) {
        *self.probabilities.entry(bitstring.into()).or_insert(0.0) += p;
    }

    /// Probability of `bitstring` (0.0 if absent).
    pub fn get(&self, bitstring: &str) -> f64 {
        self.probabilities.get(bitstring).copied().unwrap_or(0.0)
    }

    /// Sum of all probabilities; 1.0 up to rounding for a complete distribution.
    pub fn total(&self) -> f64 {
        self.probabilities.values().sum()
    }

    /// Number of outcomes with non-zero probability.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Whether the distribution is empty.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Iterate over `(bitstring, probability)` in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.probabilities.iter()
    }

    /// The most probable outcome. Ties go to the smallest bitstring.
    pub fn most_probable(&self) -> Option<(&String, f64)> {
        self.probabilities
            .iter()
            .map(|(k, &p)| (k, p))
            .max_by(|(ka, pa), (kb, pb)| pa.total_cmp(pb).then_with(|| kb.cmp(ka)))
    }

    /// Outcomes sorted by descending probability, then ascending bitstring.
    pub fn sorted(&self) -> Vec<(&String, f64)> {
        let mut entries: Vec<_> = self.probabilities.iter().map(|(k, &p)| (k, p)).collect();
        entries.sort_by(|(ka, pa), (kb, pb)| pb.total_cmp(pa).then_with(|| ka.cmp(kb)));
        entries
    }
}

/// Result of running a circuit for a number of shots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measurement counts.
    pub counts: Counts,
    /// Number of shots requested.
    pub shots: u32,
    /// Wall-clock time spent in the backend, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a new execution result.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            execution_time_ms: None,
        }
    }

    /// Attach the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut counts = Counts::new();
        counts.insert("01", 3);
        counts.insert("01", 2);
        counts.insert("10", 1);

        assert_eq!(counts.get("01"), 5);
        assert_eq!(counts.get("11"), 0);
        assert_eq!(counts.total_shots(), 6);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_most_frequent_breaks_ties_by_bitstring() {
        let counts = Counts::from_pairs([("11", 500), ("00", 500), ("01", 3)]);
        let (bits, n) = counts.most_frequent().unwrap();
        assert_eq!(bits, "00");
        assert_eq!(n, 500);

        assert!(Counts::new().most_frequent().is_none());
    }

    #[test]
    fn test_sorted() {
        let counts = Counts::from_pairs([("10", 1), ("00", 7), ("11", 7)]);
        let sorted: Vec<_> = counts.sorted().into_iter().map(|(k, v)| (k.as_str(), v)).collect();
        assert_eq!(sorted, vec![("00", 7), ("11", 7), ("10", 1)]);
    }

    #[test]
    fn test_probabilities() {
        let mut probs = Probabilities::new();
        probs.insert("010", 0.25);
        probs.insert("011", 0.75);

        assert!((probs.total() - 1.0).abs() < 1e-12);
        assert_eq!(probs.most_probable().unwrap().0, "011");
        assert_eq!(probs.get("111"), 0.0);
        assert_eq!(probs.sorted()[1].0, "010");
    }

    #[test]
    fn test_execution_result_serialization() {
        let result = ExecutionResult::new(Counts::from_pairs([("1", 10)]), 10);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["counts"]["1"], 10);
        assert!(json.get("execution_time_ms").is_none());

        let timed = result.with_execution_time(4);
        assert_eq!(timed.execution_time_ms, Some(4));
    }
}
