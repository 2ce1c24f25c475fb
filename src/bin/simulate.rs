use std::env;
use std::path::PathBuf;

use anyhow::bail;
use chrono::Utc;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::info;

use lastman::domain::SimulationRun;
use lastman::store::{MemoryStore, Store};
use lastman::{matchup, matrix::WinMatrix, mc, print, scarcity};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// snapshot file holding the schedule and entries
    #[clap(short = 'f', long)]
    file: PathBuf,

    #[clap(short = 's', long)]
    season: u16,

    /// the week the pick is due
    #[clap(short = 'w', long)]
    week: u8,

    /// number of Monte Carlo simulations
    #[clap(short = 'n', long, default_value_t = mc::N_SIMULATIONS)]
    n_sims: u64,

    /// entry whose used teams to respect
    #[clap(short = 'e', long)]
    entry: Option<u32>,
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
    let mut store = MemoryStore::load(&args.file)?;

    let used_teams: Vec<String> = match args.entry {
        None => vec![],
        Some(entry_id) => store
            .picks_for_entry(entry_id)
            .into_iter()
            .filter(|pick| pick.season == args.season)
            .map(|pick| pick.team)
            .collect(),
    };

    let matchups_by_week = matchup::remaining_matchups(&store, args.season, args.week);
    if matchups_by_week.is_empty() {
        bail!(
            "no matchup data available for season {} week {}+",
            args.season,
            args.week
        );
    }
    let matrix = WinMatrix::from_matchups(&matchups_by_week);
    let used = matrix
        .teams()
        .set_of(used_teams.iter().map(String::as_str));

    let n_sims = mc::clamp_sims(args.n_sims);
    let mut rand = mc::seeded_rand();
    let survival_probs = mc::simulate_survival(&matrix, used, n_sims, &mut rand);
    let scarcity_by_week = scarcity::strong_teams_by_week(
        &matchups_by_week,
        &used_teams,
        scarcity::STRONG_TEAM_THRESHOLD,
    );

    let week_matchups = matchups_by_week
        .get(&args.week)
        .map(Vec::as_slice)
        .unwrap_or_default();
    println!(
        "{}",
        Console::default().render(&print::tabulate_survival(&survival_probs, week_matchups))
    );
    println!(
        "{}",
        Console::default().render(&print::tabulate_scarcity(&scarcity_by_week))
    );

    store.insert_run(SimulationRun {
        season: args.season,
        week: args.week,
        n_simulations: n_sims,
        run_at: Utc::now(),
        results: survival_probs,
    });
    store.save(&args.file)?;
    info!("simulation run recorded in {}", args.file.display());
    Ok(())
}
