//! CHSH game command.

use anyhow::{Context, Result};
use console::style;

use qalgo_core::chsh::{self, ChshStrategy};

use super::common::{create_backend, create_rng, print_header};
use crate::config::Config;

/// Win probability of the best classical strategy.
const CLASSICAL_BOUND: f64 = 0.75;

/// Play `games` rounds with one strategy, or with every strategy when none
/// is given.
pub fn execute(config: &Config, strategy: Option<&str>, games: Option<u32>) -> Result<()> {
    let games = games.unwrap_or(config.chsh.games);
    let strategies = match strategy {
        Some(name) => vec![name.parse::<ChshStrategy>()?],
        None => ChshStrategy::ALL.to_vec(),
    };

    let backend = create_backend(config)?;
    let mut rng = create_rng(config);

    print_header(&format!("CHSH game, {games} rounds per strategy"));
    println!();
    for strategy in strategies {
        let report = chsh::win_rate(&backend, strategy, games, &mut rng)
            .with_context(|| format!("CHSH game failed for strategy {strategy}"))?;

        let rate = format!("{:.3}", report.rate);
        let rate = if report.rate > CLASSICAL_BOUND {
            style(rate).green().bold()
        } else {
            style(rate).yellow()
        };
        println!(
            "  {} {:>6}/{:<6} win rate {}",
            style(format!("{:<16}", strategy.as_str())).cyan(),
            report.wins,
            report.games,
            rate
        );
    }
    println!("\n  Classical bound: {CLASSICAL_BOUND}, quantum bound: cos²(π/8) ≈ 0.854");
    Ok(())
}
