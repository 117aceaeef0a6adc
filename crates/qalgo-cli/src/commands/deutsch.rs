//! Deutsch's algorithm command.

use anyhow::{Context, Result};
use console::style;

use qalgo_core::deutsch::{self, DeutschFunction};

use super::common::{create_backend, print_header};
use crate::config::Config;

/// Classify function `index`, or list the four candidates when omitted.
pub fn execute(config: &Config, index: Option<u32>) -> Result<()> {
    let Some(index) = index else {
        print_truth_tables();
        return Ok(());
    };

    let f = DeutschFunction::from_index(index)?;
    let backend = create_backend(config)?;

    print_header(&format!("Querying {f} once"));
    let verdict = deutsch::run(&backend, f).context("Deutsch's algorithm failed")?;

    println!(
        "\n{} {} is {}",
        style("✓").green().bold(),
        f,
        style(verdict).cyan().bold()
    );
    Ok(())
}

fn print_truth_tables() {
    println!("{}", style("Single-bit functions:").bold());
    for f in DeutschFunction::ALL {
        println!("\n  {} ({})", style(f).cyan().bold(), f.kind());
        println!("  | x | f(x) |");
        println!("  |---|------|");
        for (x, fx) in f.truth_table() {
            println!("  | {x} |    {fx} |");
        }
    }
    println!("\nPass --function 1..4 to classify one with a single query.");
}
