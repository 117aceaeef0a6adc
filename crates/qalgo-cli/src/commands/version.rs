//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - textbook quantum algorithms on a local statevector simulator",
        style("qalgo").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qalgo-ir           Circuit intermediate representation");
    println!("  qalgo-hal          Backend abstraction");
    println!("  qalgo-adapter-sim  Statevector simulator");
    println!("  qalgo-core         Algorithms");
    println!("  qalgo-cli          Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
