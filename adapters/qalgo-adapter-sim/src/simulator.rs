//! Simulator backend implementation.

use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, instrument};

use qalgo_hal::{
    Backend, BackendConfig, BackendFactory, Capabilities, Counts, ExecutionResult, HalError,
    HalResult, Probabilities, ValidationResult,
};
use qalgo_ir::{Circuit, CompositeGate, GateKind, Instruction, InstructionKind};

use crate::statevector::Statevector;

/// Default qubit limit.
pub const DEFAULT_MAX_QUBITS: u32 = 20;

/// Hard ceiling on `max_qubits`: 2^30 amplitudes is 16 GiB.
const QUBIT_CEILING: u32 = 30;

/// Probabilities below this are treated as exact zeros.
const PROBABILITY_EPSILON: f64 = 1e-12;

/// Local simulator backend.
///
/// This backend simulates quantum circuits using a statevector simulation.
/// Measurement is deferred: the circuit's gates are applied once, the
/// final state is marginalised onto the measured classical bits, and every
/// shot is drawn from that distribution. A gate acting on a qubit after it
/// has been measured is therefore rejected.
pub struct SimulatorBackend {
    /// Backend configuration.
    config: BackendConfig,
    /// Cached capabilities.
    capabilities: Capabilities,
    /// Shot sampler. Seeded simulators reproduce the same sequence of runs.
    rng: Mutex<StdRng>,
}

/// A validated circuit ready for simulation.
struct Plan<'a> {
    num_qubits: usize,
    num_clbits: usize,
    gates: Vec<&'a Instruction>,
    /// `(qubit, clbit)` pairs copied out of the final state.
    measurements: Vec<(usize, usize)>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings and an
    /// entropy-seeded sampler.
    pub fn new() -> Self {
        Self::build(
            BackendConfig::new("simulator"),
            DEFAULT_MAX_QUBITS,
            StdRng::from_entropy(),
        )
    }

    /// Create a simulator whose sampling is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(
            BackendConfig::new("simulator"),
            DEFAULT_MAX_QUBITS,
            StdRng::seed_from_u64(seed),
        )
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::build(
            BackendConfig::new("simulator"),
            max_qubits,
            StdRng::from_entropy(),
        )
    }

    fn build(config: BackendConfig, max_qubits: u32, rng: StdRng) -> Self {
        let mut capabilities = Capabilities::simulator(max_qubits);
        capabilities.name.clone_from(&config.name);
        Self {
            config,
            capabilities,
            rng: Mutex::new(rng),
        }
    }

    /// Check a circuit and extract what the simulation needs.
    fn plan<'a>(&self, circuit: &'a Circuit) -> HalResult<Plan<'a>> {
        let num_qubits = circuit.num_qubits();
        if num_qubits > self.capabilities.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                num_qubits, self.capabilities.num_qubits
            )));
        }

        let mut measured = vec![false; num_qubits];
        let mut gates = Vec::new();
        let mut measurements = Vec::new();

        for inst in circuit.instructions() {
            match &inst.kind {
                InstructionKind::Gate(gate) => {
                    if let Some(q) = inst.qubits.iter().find(|q| measured[q.index()]) {
                        return Err(HalError::Unsupported(format!(
                            "gate '{}' acts on {} after it was measured",
                            gate.name(),
                            q
                        )));
                    }
                    self.check_gate(&gate.kind)?;
                    gates.push(inst);
                }
                InstructionKind::Measure => {
                    for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                        measured[q.index()] = true;
                        measurements.push((q.index(), c.index()));
                    }
                }
                InstructionKind::Reset => {
                    return Err(HalError::Unsupported(
                        "reset is not supported by the statevector simulator".into(),
                    ));
                }
                InstructionKind::Barrier => {}
            }
        }

        if measurements.is_empty() {
            return Err(HalError::InvalidCircuit(format!(
                "circuit '{}' has no measurements",
                circuit.name()
            )));
        }

        Ok(Plan {
            num_qubits,
            num_clbits: circuit.num_clbits(),
            gates,
            measurements,
        })
    }

    fn check_gate(&self, gate: &GateKind) -> HalResult<()> {
        match gate {
            GateKind::Standard(g) => {
                if self.capabilities.gate_set.contains(g.name()) {
                    Ok(())
                } else {
                    Err(HalError::Unsupported(format!("gate '{}'", g.name())))
                }
            }
            GateKind::Composite(g) => self.check_composite(g),
        }
    }

    /// Composite bodies are not checked by the IR when built by hand.
    fn check_composite(&self, gate: &CompositeGate) -> HalResult<()> {
        for inst in &gate.body {
            match &inst.kind {
                InstructionKind::Gate(inner) => {
                    if inner.num_qubits() as usize != inst.qubits.len() {
                        return Err(HalError::InvalidCircuit(format!(
                            "gate '{}' in '{}' has {} operands, expected {}",
                            inner.name(),
                            gate.name,
                            inst.qubits.len(),
                            inner.num_qubits()
                        )));
                    }
                    if let Some(q) = inst.qubits.iter().find(|q| q.0 >= gate.width) {
                        return Err(HalError::InvalidCircuit(format!(
                            "'{}' body addresses {} outside its width {}",
                            gate.name, q, gate.width
                        )));
                    }
                    self.check_gate(&inner.kind)?;
                }
                InstructionKind::Barrier => {}
                InstructionKind::Measure | InstructionKind::Reset => {
                    return Err(HalError::InvalidCircuit(format!(
                        "'{}' body contains non-unitary '{}'",
                        gate.name,
                        inst.name()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Evolve the state and return the outcome distribution over clbit
    /// values, sorted by value.
    #[instrument(skip(self, plan), fields(qubits = plan.num_qubits, gates = plan.gates.len()))]
    fn distribution(&self, plan: &Plan<'_>) -> Vec<(u64, f64)> {
        let start = Instant::now();
        let mut sv = Statevector::new(plan.num_qubits);

        for inst in &plan.gates {
            if let InstructionKind::Gate(gate) = &inst.kind {
                let qubits: Vec<usize> = inst.qubits.iter().map(|q| q.index()).collect();
                sv.apply_gate(&gate.kind, &qubits, 0);
            }
        }
        debug!("Applied {} gates in {:?}", plan.gates.len(), start.elapsed());

        let mut marginal: FxHashMap<u64, f64> = FxHashMap::default();
        for (index, p) in sv.probabilities() {
            if p < PROBABILITY_EPSILON {
                continue;
            }
            let value = plan
                .measurements
                .iter()
                .filter(|(q, _)| index & (1 << q) != 0)
                .fold(0u64, |acc, (_, c)| acc | (1 << c));
            *marginal.entry(value).or_insert(0.0) += p;
        }

        let mut outcomes: Vec<_> = marginal.into_iter().collect();
        outcomes.sort_unstable_by_key(|(value, _)| *value);
        outcomes
    }

    fn bitstring(value: u64, width: usize) -> String {
        format!("{value:0width$b}")
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        match self.plan(circuit) {
            Ok(_) => Ok(ValidationResult::Valid),
            Err(e) => Ok(ValidationResult::Invalid {
                reasons: vec![e.to_string()],
            }),
        }
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be at least 1".into()));
        }
        if shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{} shots exceeds the limit of {}",
                shots, self.capabilities.max_shots
            )));
        }

        let start = Instant::now();
        let plan = self.plan(circuit)?;
        debug!(
            "Starting simulation: {} qubits, {} shots",
            plan.num_qubits, shots
        );

        let outcomes = self.distribution(&plan);
        let sampler = WeightedIndex::new(outcomes.iter().map(|(_, p)| *p))
            .map_err(|e| HalError::Backend(format!("cannot sample final state: {e}")))?;

        let mut tallies = vec![0u64; outcomes.len()];
        {
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            for _ in 0..shots {
                tallies[sampler.sample(&mut *rng)] += 1;
            }
        }

        let mut counts = Counts::new();
        for ((value, _), n) in outcomes.iter().zip(tallies) {
            if n > 0 {
                counts.insert(Self::bitstring(*value, plan.num_clbits), n);
            }
        }

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        #[allow(clippy::cast_possible_truncation)]
        let ms = elapsed.as_millis() as u64;
        Ok(ExecutionResult::new(counts, shots).with_execution_time(ms))
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn probabilities(&self, circuit: &Circuit) -> HalResult<Probabilities> {
        let plan = self.plan(circuit)?;
        let mut probabilities = Probabilities::new();
        for (value, p) in self.distribution(&plan) {
            probabilities.insert(Self::bitstring(value, plan.num_clbits), p);
        }
        Ok(probabilities)
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.extra_u64("max_qubits")? {
            None => DEFAULT_MAX_QUBITS,
            Some(n) if (1..=u64::from(QUBIT_CEILING)).contains(&n) => n as u32,
            Some(n) => {
                return Err(HalError::Configuration(format!(
                    "max_qubits must be between 1 and {QUBIT_CEILING}, got {n}"
                )));
            }
        };

        let rng = match config.extra_u64("seed")? {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        debug!(
            "Configured simulator '{}' with max_qubits={}",
            config.name, max_qubits
        );
        Ok(Self::build(config, max_qubits, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qalgo_ir::{ClbitId, QubitId};

    #[test]
    fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();

        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 20);
        assert_eq!(backend.name(), "simulator");
    }

    #[test]
    fn test_simulator_bell_state() {
        let backend = SimulatorBackend::with_seed(1);

        let circuit = Circuit::bell().unwrap();
        let result = backend.run(&circuit, 1000).unwrap();
        assert_eq!(result.shots, 1000);

        let counts = &result.counts;
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
        assert!(counts.get("00") > 0 && counts.get("11") > 0);
    }

    #[test]
    fn test_simulator_ghz_state() {
        let backend = SimulatorBackend::with_seed(2);

        let circuit = Circuit::ghz(3).unwrap();
        let result = backend.run(&circuit, 1000).unwrap();
        assert_eq!(result.counts.get("000") + result.counts.get("111"), 1000);
    }

    #[test]
    fn test_bitstring_order_is_high_clbit_first() {
        // X on q0 measured into c0 of a 3-bit register: only the last character is set.
        let mut circuit = Circuit::with_size("order", 3, 3);
        circuit.x(QubitId(0)).unwrap();
        circuit.measure_all().unwrap();

        let backend = SimulatorBackend::with_seed(3);
        let result = backend.run(&circuit, 10).unwrap();
        assert_eq!(result.counts.get("001"), 10);
    }

    #[test]
    fn test_unmeasured_clbits_read_zero() {
        let mut circuit = Circuit::with_size("partial", 2, 2);
        circuit.x(QubitId(0)).unwrap().x(QubitId(1)).unwrap();
        circuit.measure(QubitId(0), ClbitId(1)).unwrap();

        let probs = SimulatorBackend::new().probabilities(&circuit).unwrap();
        assert_eq!(probs.len(), 1);
        assert!((probs.get("10") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mut circuit = Circuit::with_size("coins", 4, 4);
        for q in 0..4 {
            circuit.h(QubitId(q)).unwrap();
        }
        circuit.measure_all().unwrap();

        let a = SimulatorBackend::with_seed(42).run(&circuit, 200).unwrap();
        let b = SimulatorBackend::with_seed(42).run(&circuit, 200).unwrap();
        assert_eq!(a.counts, b.counts);
    }

    #[test]
    fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_max_qubits(5);

        let mut circuit = Circuit::with_size("test", 10, 1);
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        let result = backend.run(&circuit, 100);

        assert!(matches!(result, Err(HalError::CircuitTooLarge(_))));
    }

    #[test]
    fn test_zero_shots() {
        let backend = SimulatorBackend::new();
        let circuit = Circuit::bell().unwrap();
        assert!(matches!(
            backend.run(&circuit, 0),
            Err(HalError::InvalidShots(_))
        ));
    }

    #[test]
    fn test_no_measurement_is_invalid() {
        let backend = SimulatorBackend::new();
        let mut circuit = Circuit::with_size("silent", 1, 0);
        circuit.h(QubitId(0)).unwrap();

        assert!(matches!(
            backend.run(&circuit, 1),
            Err(HalError::InvalidCircuit(_))
        ));
        assert!(!backend.validate(&circuit).unwrap().is_valid());
    }

    #[test]
    fn test_gate_after_measure_unsupported() {
        let backend = SimulatorBackend::new();
        let mut circuit = Circuit::with_size("mid", 1, 1);
        circuit
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .x(QubitId(0))
            .unwrap();

        assert!(matches!(
            backend.run(&circuit, 1),
            Err(HalError::Unsupported(_))
        ));
    }

    #[test]
    fn test_reset_unsupported() {
        let backend = SimulatorBackend::new();
        let mut circuit = Circuit::with_size("reset", 1, 1);
        circuit
            .reset(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap();

        let validation = backend.validate(&circuit).unwrap();
        match validation {
            ValidationResult::Invalid { reasons } => assert!(reasons[0].contains("reset")),
            ValidationResult::Valid => panic!("reset must be rejected"),
        }
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig::new("seeded")
            .with_extra("max_qubits", serde_json::json!(8))
            .with_extra("seed", serde_json::json!(11));
        let backend = SimulatorBackend::from_config(config).unwrap();
        assert_eq!(backend.name(), "seeded");
        assert_eq!(backend.capabilities().num_qubits, 8);

        let bad = BackendConfig::new("sim").with_extra("max_qubits", serde_json::json!(0));
        assert!(matches!(
            SimulatorBackend::from_config(bad),
            Err(HalError::Configuration(_))
        ));
    }
}
