//! Backend capability introspection.
//!
//! [`Capabilities`] describes what a backend can run: how many qubits, how
//! many shots, and which gates it executes natively. Backends build it once
//! at construction time.

use serde::{Deserialize, Serialize};

/// Capabilities of a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set.
    pub gate_set: GateSet,
    /// Maximum number of shots per run.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or hardware (`false`).
    pub is_simulator: bool,
    /// Additional capability flags, e.g. `"statevector"`, `"exact_probabilities"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Create capabilities for a simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::universal(),
            max_shots: 1_000_000,
            is_simulator: true,
            features: vec![
                "statevector".into(),
                "exact_probabilities".into(),
                "composite_gates".into(),
            ],
        }
    }

    /// Check whether a feature flag is present.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

/// Gate set supported by a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    pub two_qubit: Vec<String>,
    /// Three-qubit gates supported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub three_qubit: Vec<String>,
}

impl GateSet {
    /// Every standard gate of the IR.
    pub fn universal() -> Self {
        Self {
            single_qubit: [
                "id", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "sx", "sxdg", "rx", "ry", "rz",
                "p", "u",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            two_qubit: [
                "cx", "cy", "cz", "ch", "swap", "crx", "cry", "crz", "cp",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            three_qubit: vec!["ccx".into(), "cswap".into()],
        }
    }

    /// Check if a gate is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit.iter().any(|g| g == gate)
            || self.two_qubit.iter().any(|g| g == gate)
            || self.three_qubit.iter().any(|g| g == gate)
    }

    /// Every supported gate name.
    pub fn all_gates(&self) -> impl Iterator<Item = &str> {
        self.single_qubit
            .iter()
            .chain(&self.two_qubit)
            .chain(&self.three_qubit)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator(20);
        assert_eq!(caps.num_qubits, 20);
        assert!(caps.is_simulator);
        assert!(caps.has_feature("statevector"));
        assert!(!caps.has_feature("mid_circuit_measurement"));
    }

    #[test]
    fn test_universal_gate_set() {
        let gates = GateSet::universal();
        assert!(gates.contains("cp"));
        assert!(gates.contains("cswap"));
        assert!(!gates.contains("rxx"));
        assert_eq!(gates.all_gates().count(), 16 + 9 + 2);
    }

    #[test]
    fn test_capabilities_serialization() {
        let caps = Capabilities::simulator(5);
        let json = serde_json::to_value(&caps).unwrap();
        assert_eq!(json["num_qubits"], 5);
        assert_eq!(json["gate_set"]["three_qubit"][0], "ccx");
    }
}
