//! A test backend that answers every circuit with the all-zero outcome.
//!
//! Every call to `run` and `probabilities` is counted, so tests can check
//! that argument validation happens before anything is simulated.

use std::sync::atomic::{AtomicUsize, Ordering};

use qalgo_hal::{
    Backend, Capabilities, Counts, ExecutionResult, HalError, HalResult, Probabilities,
    ValidationResult,
};
use qalgo_ir::Circuit;

pub struct ZeroBackend {
    capabilities: Capabilities,
    runs: AtomicUsize,
    probability_calls: AtomicUsize,
}

impl ZeroBackend {
    pub fn new() -> Self {
        Self {
            capabilities: Capabilities::simulator(32),
            runs: AtomicUsize::new(0),
            probability_calls: AtomicUsize::new(0),
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::Relaxed)
    }

    /// Calls to either `run` or `probabilities`.
    pub fn calls(&self) -> usize {
        self.runs() + self.probability_calls.load(Ordering::Relaxed)
    }

    fn zeros(circuit: &Circuit) -> String {
        "0".repeat(circuit.num_clbits())
    }
}

impl Backend for ZeroBackend {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "zero-test"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn validate(&self, _circuit: &Circuit) -> HalResult<ValidationResult> {
        Ok(ValidationResult::Valid)
    }

    fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        self.runs.fetch_add(1, Ordering::Relaxed);
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be positive".into()));
        }
        let counts = Counts::from_pairs([(Self::zeros(circuit), u64::from(shots))]);
        Ok(ExecutionResult::new(counts, shots))
    }

    fn probabilities(&self, circuit: &Circuit) -> HalResult<Probabilities> {
        self.probability_calls.fetch_add(1, Ordering::Relaxed);
        let mut probs = Probabilities::new();
        probs.insert(Self::zeros(circuit), 1.0);
        Ok(probs)
    }
}
