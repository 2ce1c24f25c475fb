use std::env;
use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::info;

use lastman::store::MemoryStore;
use lastman::{mc, portfolio, print};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// snapshot file holding the schedule and entries
    #[clap(short = 'f', long)]
    file: PathBuf,

    #[clap(short = 's', long)]
    season: u16,

    /// the week picks are due
    #[clap(short = 'w', long)]
    week: u8,

    /// number of Monte Carlo simulations per entry
    #[clap(short = 'n', long, default_value_t = mc::N_SIMULATIONS)]
    n_sims: u64,
}

fn main() -> anyhow::Result<()> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let store = MemoryStore::load(&args.file)?;

    let entry_states = portfolio::entry_states(&store, args.season);
    if entry_states.iter().all(|state| !state.is_alive) {
        bail!("no alive entries found for season {}", args.season);
    }
    info!(
        "recommending for {} entries, season {} week {}",
        entry_states.len(),
        args.season,
        args.week
    );

    let recommendations = portfolio::recommend(
        &store,
        args.season,
        args.week,
        &entry_states,
        mc::clamp_sims(args.n_sims),
    );
    if recommendations.is_empty() {
        bail!("no matchup data available for season {}", args.season);
    }
    println!(
        "{}",
        Console::default().render(&print::tabulate_recommendations(&recommendations))
    );
    Ok(())
}
