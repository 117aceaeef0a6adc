//! qalgo Command-Line Interface
//!
//! Runs the textbook algorithms of `qalgo-core` on the local statevector
//! simulator and prints the results.
//!
//! ```text
//! qalgo phase --phi 0.625 --precision 3
//! qalgo factor -a 7
//! qalgo chsh --strategy quantum --games 2000
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{chsh, deutsch, deutsch_jozsa, factor, phase, simon, superdense, version};
use config::Config;

/// qalgo - textbook quantum algorithms on a local statevector simulator
#[derive(Parser)]
#[command(name = "qalgo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ~/.qalgo/config.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed the simulator and the classical random choices
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the phase of P(2πφ) with quantum phase estimation
    Phase {
        /// Phase to encode, in [0, 1]
        #[arg(long, allow_negative_numbers = true)]
        phi: f64,

        /// Counting qubits (1-15)
        #[arg(short, long)]
        precision: Option<u32>,

        /// Read the most probable outcome instead of sampling
        #[arg(long)]
        exact: bool,
    },

    /// Factor 15 by order finding
    Factor {
        /// Multiplier, coprime to n
        #[arg(short, long, default_value = "8")]
        a: u64,

        /// Number to factor
        #[arg(short, long, default_value = "15")]
        n: u64,

        /// Counting qubits (1-15)
        #[arg(short, long, default_value = "8")]
        precision: u32,

        /// Give up after this many attempts
        #[arg(long)]
        max_attempts: Option<u32>,
    },

    /// Decide whether a single-bit function is constant or balanced
    Deutsch {
        /// Function index (1-4); prints the truth tables when omitted
        #[arg(short, long)]
        function: Option<u32>,
    },

    /// Decide whether a random n-bit oracle is constant or balanced
    DeutschJozsa {
        /// Number of input bits
        #[arg(short, long, default_value = "4")]
        n: u32,

        /// Print the circuit that was run
        #[arg(long)]
        show_circuit: bool,
    },

    /// Recover a hidden XOR mask with Simon's algorithm
    Simon {
        /// Secret bitstring
        #[arg(short, long, default_value = "101")]
        secret: String,

        /// Number of shots
        #[arg(long, default_value = "1024")]
        shots: u32,
    },

    /// Play the CHSH game
    Chsh {
        /// Strategy (quantum, classical, random_quantum, random_classical); all when omitted
        #[arg(short, long)]
        strategy: Option<String>,

        /// Rounds per strategy
        #[arg(short, long)]
        games: Option<u32>,
    },

    /// Send two classical bits through one qubit
    Superdense {
        /// Two-bit message
        #[arg(short, long)]
        bits: String,

        /// Number of shots
        #[arg(long, default_value = "1024")]
        shots: u32,
    },

    /// Show version information
    Version,
}

/// Log filter: `RUST_LOG` first, then `-v`, then the configured level.
fn log_filter(verbose: u8, configured: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::new(level)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(cli.config.as_deref());
    let configured_level = loaded
        .as_ref()
        .map_or("warn", |config| config.logging.level.as_str());

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, configured_level))
        .with_target(false)
        .init();

    let result = loaded
        .map_err(anyhow::Error::from)
        .and_then(|mut config| {
            if cli.seed.is_some() {
                config.simulator.seed = cli.seed;
            }
            tracing::debug!(?config, "configuration loaded");
            dispatch(&config, cli.command)
        });

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

fn dispatch(config: &Config, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Phase {
            phi,
            precision,
            exact,
        } => phase::execute(config, phi, precision, exact),

        Commands::Factor {
            a,
            n,
            precision,
            max_attempts,
        } => factor::execute(config, a, n, precision, max_attempts),

        Commands::Deutsch { function } => deutsch::execute(config, function),

        Commands::DeutschJozsa { n, show_circuit } => {
            deutsch_jozsa::execute(config, n, show_circuit)
        }

        Commands::Simon { secret, shots } => simon::execute(config, &secret, shots),

        Commands::Chsh { strategy, games } => chsh::execute(config, strategy.as_deref(), games),

        Commands::Superdense { bits, shots } => superdense::execute(config, &bits, shots),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
