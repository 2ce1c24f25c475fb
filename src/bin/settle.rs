use std::env;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use lastman::model::Predictor;
use lastman::results;
use lastman::store::MemoryStore;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// snapshot file holding the schedule and entries
    #[clap(short = 'f', long)]
    file: PathBuf,

    #[clap(short = 's', long)]
    season: u16,

    /// the completed week to settle picks for
    #[clap(short = 'w', long)]
    week: u8,

    /// fitted model to refresh win probabilities with
    #[clap(short = 'm', long, default_value = "win_model.json")]
    model: PathBuf,
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

    let predictor = Predictor::load_or_fallback(&args.model);
    let win_probs_updated = results::update_win_probs(&mut store, &predictor, args.season);
    let picks_settled = results::settle_picks(&mut store, args.season, args.week);

    store.save(&args.file)?;
    info!(
        "season {} week {}: {win_probs_updated} win probs refreshed, {picks_settled} picks settled",
        args.season, args.week
    );
    Ok(())
}
