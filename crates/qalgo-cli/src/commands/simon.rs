//! Simon's algorithm command.

use anyhow::{Context, Result};
use console::style;

use qalgo_core::{BitString, simon};

use super::common::{create_backend, print_header};
use crate::config::Config;

/// Sample the Simon circuit for `secret` and solve for it.
pub fn execute(config: &Config, secret: &str, shots: u32) -> Result<()> {
    let secret: BitString = secret.parse()?;
    let backend = create_backend(config)?;

    print_header(&format!("Simon's algorithm for s = {secret} ({shots} shots)"));
    let samples = simon::run(&backend, &secret, shots).context("Simon's algorithm failed")?;

    println!("\n{} Observed y:", style("✓").green().bold());
    for y in &samples {
        let dot = u8::from(y.dot(&secret)?);
        println!("  {} · {} = {} (mod 2)", style(y).cyan(), secret, dot);
    }

    match simon::recover_secret(&samples, secret.width()) {
        Some(found) => println!(
            "\n  Recovered secret: {}",
            style(found).cyan().bold()
        ),
        None => println!(
            "\n  {} Not enough independent samples to recover the secret",
            style("!").yellow().bold()
        ),
    }
    Ok(())
}
