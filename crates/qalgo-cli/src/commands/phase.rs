//! Phase estimation command.

use anyhow::{Context, Result};
use console::style;

use qalgo_core::phase::{self, Readout};

use super::common::{create_backend, print_header};
use crate::config::Config;

/// Estimate `phi` for the single-qubit phase gate `P(2πφ)`.
pub fn execute(config: &Config, phi: f64, precision: Option<u32>, exact: bool) -> Result<()> {
    let precision = precision.unwrap_or(config.phase_estimation.default_precision);
    let readout = if exact {
        Readout::Exact
    } else {
        Readout::default()
    };
    let backend = create_backend(config)?;

    print_header(&format!(
        "Estimating φ = {phi} with {precision} counting qubits"
    ));

    let estimate = phase::estimate_phase_gate(&backend, phi, precision, readout)
        .context("Phase estimation failed")?;

    println!(
        "\n{} Estimated phase: {}",
        style("✓").green().bold(),
        style(&estimate).cyan().bold()
    );
    let error = (estimate.value() - phi).abs();
    println!(
        "  Error: {} (resolution {})",
        style(format!("{error:.6}")).yellow(),
        1.0 / estimate.denominator() as f64
    );

    Ok(())
}
