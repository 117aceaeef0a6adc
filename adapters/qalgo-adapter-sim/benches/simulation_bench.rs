//! Benchmarks for statevector simulation
//!
//! Run with: cargo bench -p qalgo-adapter-sim

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qalgo_adapter_sim::SimulatorBackend;
use qalgo_hal::Backend;
use qalgo_ir::{Circuit, QubitId};
use std::f64::consts::PI;

fn phase_estimation_circuit(precision: u32, phi: f64) -> Circuit {
    let mut circuit = Circuit::new("qpe");
    let ancilla = circuit.add_qreg("ancilla", precision);
    let target = circuit.add_qreg("target", 1)[0];
    let readout = circuit.add_creg("c", precision);

    circuit.x(target).unwrap();
    for &q in &ancilla {
        circuit.h(q).unwrap();
    }
    for (k, &q) in ancilla.iter().enumerate() {
        for _ in 0..(1u32 << k) {
            circuit.cp(2.0 * PI * phi, q, target).unwrap();
        }
    }
    circuit
        .compose(&Circuit::iqft(precision).unwrap(), &ancilla)
        .unwrap();
    for (&q, &c) in ancilla.iter().zip(&readout) {
        circuit.measure(q, c).unwrap();
    }
    circuit
}

/// Benchmark end-to-end phase estimation runs
fn bench_phase_estimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("phase_estimation");
    group.sample_size(20);

    let backend = SimulatorBackend::with_seed(0);
    for p in &[4u32, 8, 10] {
        let circuit = phase_estimation_circuit(*p, 0.3);
        group.bench_with_input(BenchmarkId::new("run_1024", p), &circuit, |b, circuit| {
            b.iter(|| backend.run(black_box(circuit), 1024).unwrap());
        });
        group.bench_with_input(
            BenchmarkId::new("probabilities", p),
            &circuit,
            |b, circuit| {
                b.iter(|| backend.probabilities(black_box(circuit)).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark a layer of Hadamards across growing registers
fn bench_hadamard_layer(c: &mut Criterion) {
    let mut group = c.benchmark_group("hadamard_layer");

    let backend = SimulatorBackend::with_seed(0);
    for n in &[8u32, 12, 16] {
        let mut circuit = Circuit::with_size("layer", *n, *n);
        for q in 0..*n {
            circuit.h(QubitId(q)).unwrap();
        }
        circuit.measure_all().unwrap();

        group.bench_with_input(BenchmarkId::new("run", n), &circuit, |b, circuit| {
            b.iter(|| backend.run(black_box(circuit), 100).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_phase_estimation, bench_hadamard_layer);
criterion_main!(benches);
