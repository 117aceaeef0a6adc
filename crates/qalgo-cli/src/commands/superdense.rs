//! Superdense coding command.

use anyhow::{Context, Result};
use console::style;

use qalgo_core::{BitString, superdense};

use super::common::{create_backend, print_counts, print_header};
use crate::config::Config;

/// Send a two-bit message through one qubit.
pub fn execute(config: &Config, bits: &str, shots: u32) -> Result<()> {
    let message: BitString = bits.parse()?;
    let backend = create_backend(config)?;

    print_header(&format!("Sending {message} with superdense coding"));
    let counts = superdense::run(&backend, &message, shots).context("Superdense coding failed")?;
    print_counts(&counts);

    let decoded = superdense::decode(&counts)?;
    println!(
        "\n  Decoded message: {}",
        style(&decoded).cyan().bold()
    );
    Ok(())
}
