//! Order-finding factoring command.

use anyhow::{Context, Result};
use console::style;

use qalgo_core::FactorOutcome;
use qalgo_core::factoring;

use super::common::{create_backend, print_header};
use crate::config::Config;

/// Look for a factor of `n` using multiplier `a`.
pub fn execute(
    config: &Config,
    a: u64,
    n: u64,
    precision: u32,
    max_attempts: Option<u32>,
) -> Result<()> {
    let max_attempts = max_attempts.unwrap_or(config.factoring.max_attempts);
    let backend = create_backend(config)?;

    print_header(&format!(
        "Factoring {n} with a = {a} ({precision} counting qubits, up to {max_attempts} attempts)"
    ));

    let outcome = factoring::find_factor(&backend, a, n, precision, max_attempts)
        .context("Factoring failed")?;

    match outcome {
        FactorOutcome::Found {
            factor,
            attempts,
            phase,
        } => {
            println!(
                "\n{} Non-trivial factor found: {}",
                style("✓").green().bold(),
                style(factor).cyan().bold()
            );
            println!("  {n} = {factor} × {}", n / factor);
            println!("  Phase: {phase}");
            println!("  Attempts: {attempts}");
        }
        FactorOutcome::Exhausted { attempts } => {
            println!(
                "\n{} No factor found after {} attempts",
                style("✗").red().bold(),
                attempts
            );
        }
    }

    Ok(())
}
