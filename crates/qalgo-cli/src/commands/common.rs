//! Shared helpers for CLI commands.

use anyhow::{Context, Result};
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;

use qalgo_adapter_sim::SimulatorBackend;
use qalgo_hal::{BackendConfig, BackendFactory, Counts};
use qalgo_ir::Circuit;

use crate::config::Config;

/// Build the local simulator from the `simulator` config section.
pub fn create_backend(config: &Config) -> Result<SimulatorBackend> {
    let mut backend_config = BackendConfig::new("simulator").with_extra(
        "max_qubits",
        serde_json::json!(config.simulator.max_qubits),
    );
    if let Some(seed) = config.simulator.seed {
        backend_config = backend_config.with_extra("seed", serde_json::json!(seed));
    }
    SimulatorBackend::from_config(backend_config).context("Failed to configure simulator")
}

/// Random source for the classical side of a protocol, seeded like the
/// simulator so a seeded run is fully reproducible.
pub fn create_rng(config: &Config) -> StdRng {
    match config.simulator.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    }
}

/// Print a section header.
pub fn print_header(title: &str) {
    println!("{} {}", style("→").cyan().bold(), style(title).bold());
}

/// Print measurement counts as a bar chart, most frequent first.
pub fn print_counts(counts: &Counts) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        counts.total_shots()
    );

    let sorted = counts.sorted();
    let total = counts.total_shots().max(1) as f64;

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = *count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }
}

/// Print a circuit one instruction per line.
pub fn print_circuit(circuit: &Circuit) {
    println!(
        "\n{} {} ({} qubits, {} clbits, depth {}):",
        style("Circuit").bold(),
        style(circuit.name()).cyan(),
        circuit.num_qubits(),
        circuit.num_clbits(),
        circuit.depth()
    );
    for instruction in circuit.instructions() {
        println!("  {instruction}");
    }
}
