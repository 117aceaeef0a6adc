//! Phase estimation against the local simulator.

use proptest::prelude::*;
use qalgo_adapter_sim::SimulatorBackend;
use qalgo_core::operation::Operation;
use qalgo_core::phase::{
    Precision, Readout, estimate_phase, estimate_phase_gate, estimate_phase_low_precision,
    estimate_phase_two_qubits,
};
use qalgo_core::AlgoError;
use qalgo_hal::{Backend, BackendConfig, BackendFactory, HalError};
use qalgo_ir::{Circuit, QubitId, StandardGate};
use std::f64::consts::PI;

mod common;
use common::ZeroBackend;

fn exact_phi(y: u64, p: u32) -> f64 {
    y as f64 / (1u64 << p) as f64
}

// ---------------------------------------------------------------------------
// Exact phases
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn exact_phase_is_recovered_single_shot(p in 1u32..=15, raw in any::<u64>(), seed in any::<u64>()) {
        let y = raw % (1u64 << p);
        let backend = SimulatorBackend::with_seed(seed);
        let est = estimate_phase_gate(&backend, exact_phi(y, p), p, Readout::SINGLE_SHOT).unwrap();
        prop_assert_eq!(est.numerator, y);
        prop_assert_eq!(est.precision.bits(), p);
    }

    #[test]
    fn estimate_is_a_multiple_of_resolution(phi in 0.0f64..=1.0, p in 1u32..=6, seed in any::<u64>()) {
        let backend = SimulatorBackend::with_seed(seed);
        let est = estimate_phase_gate(&backend, phi, p, Readout::SINGLE_SHOT).unwrap();
        prop_assert!(est.numerator < (1u64 << p));
        let v = est.value();
        prop_assert!((0.0..1.0).contains(&v));
        prop_assert!((v * (1u64 << p) as f64 - est.numerator as f64).abs() < 1e-12);
    }
}

#[test]
fn every_register_value_round_trips_at_precision_4() {
    let backend = SimulatorBackend::with_seed(3);
    for y in 0..16u64 {
        for readout in [Readout::SINGLE_SHOT, Readout::Exact] {
            let est = estimate_phase_gate(&backend, exact_phi(y, 4), 4, readout).unwrap();
            assert_eq!(est.numerator, y, "y = {y}, {readout:?}");
        }
    }
}

#[test]
fn highest_precision_reads_exact_phase() {
    let backend = SimulatorBackend::with_seed(0);
    let y = 0b101_1001_0110_0011u64;
    let est = estimate_phase_gate(&backend, exact_phi(y, 15), 15, Readout::SINGLE_SHOT).unwrap();
    assert_eq!(est.numerator, y);
}

#[test]
fn phi_of_one_wraps_to_zero() {
    let backend = SimulatorBackend::with_seed(0);
    let est = estimate_phase_gate(&backend, 1.0, 5, Readout::Exact).unwrap();
    assert_eq!(est.numerator, 0);
}

// ---------------------------------------------------------------------------
// Inexact phases
// ---------------------------------------------------------------------------

#[test]
fn inexact_phase_rounds_to_a_neighbour() {
    let backend = SimulatorBackend::with_seed(42);
    for trial in 0..10 {
        let sampled = estimate_phase_gate(&backend, 0.3, 3, Readout::default()).unwrap();
        assert!(
            [0.25, 0.375].contains(&sampled.value()),
            "trial {trial}: {sampled}"
        );
    }
    let exact = estimate_phase_gate(&backend, 0.3, 3, Readout::Exact).unwrap();
    assert!([0.25, 0.375].contains(&exact.value()));
}

#[test]
fn single_shot_of_inexact_phase_stays_on_the_grid() {
    let backend = SimulatorBackend::with_seed(9);
    for _ in 0..20 {
        let est = estimate_phase_gate(&backend, 0.3, 3, Readout::SINGLE_SHOT).unwrap();
        assert!(est.numerator < 8);
    }
}

#[test]
fn toy_variants() {
    let backend = SimulatorBackend::with_seed(1);
    for _ in 0..5 {
        assert_eq!(estimate_phase_two_qubits(&backend, 0.25).unwrap().value(), 0.25);
        assert_eq!(estimate_phase_low_precision(&backend, 0.5).unwrap().value(), 0.5);
        assert_eq!(estimate_phase_low_precision(&backend, 0.0).unwrap().value(), 0.0);
    }
    // 0.8 is nearer 3/4 than any other quarter, with probability ≈ 0.87
    assert_eq!(estimate_phase_two_qubits(&backend, 0.8).unwrap().value(), 0.75);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn invalid_precision_is_rejected_before_simulation() {
    let backend = ZeroBackend::new();
    for p in [0, 16, 100] {
        for readout in [Readout::SINGLE_SHOT, Readout::Exact] {
            let err = estimate_phase_gate(&backend, 0.5, p, readout).unwrap_err();
            assert!(matches!(err, AlgoError::InvalidArgument(_)), "{err}");
        }
    }
    assert_eq!(backend.calls(), 0);
}

#[test]
fn phase_outside_unit_interval_is_rejected_before_simulation() {
    let backend = ZeroBackend::new();
    for phi in [-0.1, 1.5, f64::NAN] {
        for readout in [Readout::SINGLE_SHOT, Readout::Exact] {
            let err = estimate_phase_gate(&backend, phi, 3, readout).unwrap_err();
            assert!(matches!(err, AlgoError::InvalidArgument(_)), "{err}");
        }
    }
    assert!(estimate_phase_low_precision(&backend, 2.0).is_err());
    assert!(estimate_phase_two_qubits(&backend, -1.0).is_err());
    assert_eq!(backend.calls(), 0);
}

#[test]
fn valid_arguments_reach_the_backend_once() {
    let backend = ZeroBackend::new();
    let est = estimate_phase_gate(&backend, 0.5, 3, Readout::SINGLE_SHOT).unwrap();
    assert_eq!(est.numerator, 0);
    assert_eq!(backend.runs(), 1);
    estimate_phase_gate(&backend, 0.5, 3, Readout::Exact).unwrap();
    assert_eq!(backend.calls(), 2);
}

#[test]
fn backend_errors_pass_through() {
    let config = BackendConfig::new("small").with_extra("max_qubits", serde_json::json!(3));
    let backend = SimulatorBackend::from_config(config).unwrap();
    let err = estimate_phase_gate(&backend, 0.5, 4, Readout::SINGLE_SHOT).unwrap_err();
    match err {
        AlgoError::Backend(inner) => {
            assert!(matches!(inner, HalError::CircuitTooLarge(_)));
        }
        other => panic!("expected a backend error, got {other}"),
    }
}

#[test]
fn zero_shot_readout_is_a_backend_error() {
    let backend = SimulatorBackend::with_seed(0);
    let err = estimate_phase_gate(&backend, 0.5, 2, Readout::Sample { shots: 0 }).unwrap_err();
    assert!(matches!(err, AlgoError::Backend(_)));
}

// ---------------------------------------------------------------------------
// General operations
// ---------------------------------------------------------------------------

#[test]
fn sub_circuit_unitary_on_two_qubit_eigenstate() {
    // U = T ⊗ S on |11⟩ has eigenphase 1/8 + 1/4 = 3/8.
    let mut u = Circuit::with_size("ts", 2, 0);
    u.t(QubitId(0)).unwrap().s(QubitId(1)).unwrap();
    let mut prep = Circuit::with_size("ones", 2, 0);
    prep.x(QubitId(0)).unwrap().x(QubitId(1)).unwrap();

    let backend = SimulatorBackend::with_seed(5);
    let est = estimate_phase(
        &backend,
        &Operation::SubCircuit(u),
        &Operation::SubCircuit(prep),
        Precision::new(3).unwrap(),
        Readout::SINGLE_SHOT,
    )
    .unwrap();
    assert_eq!(est.numerator, 3);
}

#[test]
fn gate_without_native_control_uses_composite() {
    // T|1⟩ = e^(iπ/4)|1⟩, phase 1/8.
    let backend = SimulatorBackend::with_seed(5);
    let est = estimate_phase(
        &backend,
        &Operation::Gate(StandardGate::T),
        &Operation::Gate(StandardGate::X),
        Precision::new(4).unwrap(),
        Readout::Exact,
    )
    .unwrap();
    assert_eq!(est.numerator, 2);
}

#[test]
fn eigenstate_of_zero_phase() {
    // P(θ)|0⟩ = |0⟩: the identity preparation gives phase 0 for any θ.
    let backend = SimulatorBackend::with_seed(5);
    let est = estimate_phase(
        &backend,
        &Operation::phase(2.0 * PI * 0.3),
        &Operation::Gate(StandardGate::I),
        Precision::new(5).unwrap(),
        Readout::SINGLE_SHOT,
    )
    .unwrap();
    assert_eq!(est.numerator, 0);
    assert!(backend.capabilities().is_simulator);
}
