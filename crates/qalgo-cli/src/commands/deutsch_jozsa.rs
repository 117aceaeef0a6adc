//! Deutsch–Jozsa command.

use anyhow::{Context, Result};
use console::style;

use qalgo_core::deutsch_jozsa::{self, DjOracle};

use super::common::{create_backend, create_rng, print_circuit, print_header};
use crate::config::Config;

/// Draw a random oracle on `n` input bits and classify it.
pub fn execute(config: &Config, n: u32, show_circuit: bool) -> Result<()> {
    let backend = create_backend(config)?;
    let mut rng = create_rng(config);
    let oracle = DjOracle::random(n, &mut rng)?;

    print_header(&format!("Deutsch–Jozsa on {n} input bits"));
    let outcome = deutsch_jozsa::run(&backend, &oracle, n).context("Deutsch–Jozsa failed")?;

    if show_circuit {
        print_circuit(&outcome.circuit);
    }

    let mark = if outcome.verdict == oracle.kind() {
        style("✓").green().bold()
    } else {
        style("✗").red().bold()
    };
    println!(
        "\n{} The oracle is {}",
        mark,
        style(outcome.verdict).cyan().bold()
    );
    Ok(())
}
