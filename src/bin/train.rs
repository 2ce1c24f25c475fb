use std::env;
use std::fs::File;
use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::info;

use lastman::model::fit::{self, FitOptions};
use lastman::print;
use lastman::store::MemoryStore;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// snapshot file to source games and stats from
    #[clap(short = 'f', long)]
    file: PathBuf,

    /// seasons to train on, e.g. -t 2018,2019,2020
    #[clap(short = 't', long, value_delimiter = ',')]
    train_seasons: Vec<u16>,

    /// held-out season to validate on
    #[clap(short = 'v', long)]
    val_season: Option<u16>,

    /// where to write the fitted model
    #[clap(short = 'm', long, default_value = "win_model.json")]
    model: PathBuf,

    /// where to write the metrics report
    #[clap(long)]
    metrics: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.train_seasons.is_empty() {
            bail!("at least one training season must be specified");
        }
        if let Some(val_season) = self.val_season {
            if self.train_seasons.contains(&val_season) {
                bail!("the validation season cannot also be a training season");
            }
        }
        Ok(())
    }
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
    args.validate()?;

    let store = MemoryStore::load(&args.file)?;
    let (model, report) = fit::train(
        &store,
        &args.train_seasons,
        args.val_season,
        &FitOptions::default(),
    )?;
    println!(
        "{}",
        Console::default().render(&print::tabulate_train_report(&report))
    );

    model.save(&args.model)?;
    info!("model saved to {}", args.model.display());

    if let Some(path) = &args.metrics {
        serde_json::to_writer_pretty(File::create(path)?, &report)?;
        info!("metrics saved to {}", path.display());
    }
    Ok(())
}
