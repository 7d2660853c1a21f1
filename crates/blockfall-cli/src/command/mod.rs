use std::sync::Arc;

use anyhow::Context;
use blockfall_engine::{GameConfig, GameRules, catalog::CatalogKind};
use blockfall_evaluator::weights::Weights;
use clap::{Parser, Subcommand};

use crate::model::TrainedModel;

use self::{auto_play::AutoPlayArg, compare::CompareArg, train::TrainArg};

mod auto_play;
mod compare;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Tune the search agent's weights with the genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Let an agent play games and report the results
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Play several weight sets on the same games
    Compare(#[clap(flatten)] CompareArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::Compare(arg) => compare::run(&arg)?,
    }
    Ok(())
}

/// Board and scoring options shared by every subcommand.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GameArg {
    /// Playable board width
    #[arg(long, default_value_t = 10)]
    width: usize,
    /// Playable board height
    #[arg(long, default_value_t = 20)]
    height: usize,
    /// Piece catalog (`classic` or `small`)
    #[arg(long, default_value_t = CatalogKind::Classic)]
    pieces: CatalogKind,
    /// Base score per cleared line
    #[arg(long, default_value_t = 50)]
    line_score: u64,
    /// Ticks between gravity steps at level 0
    #[arg(long, default_value_t = 35)]
    initial_speed: u32,
}

impl GameArg {
    pub(crate) fn rules(&self) -> anyhow::Result<Arc<GameRules>> {
        let rules = GameRules::new(GameConfig {
            board_width: self.width,
            board_height: self.height,
            pieces: self.pieces.pieces(),
            line_score: self.line_score,
            initial_speed: self.initial_speed,
            ..GameConfig::default()
        })
        .context("Invalid game configuration")?;
        Ok(rules)
    }
}

/// Loads the weights of a saved model, or the built-in defaults without a path.
pub(crate) fn load_weights(
    model_path: Option<&std::path::Path>,
) -> anyhow::Result<(String, Weights)> {
    let Some(path) = model_path else {
        return Ok(("default".to_owned(), Weights::default()));
    };
    let model = TrainedModel::open(path)?;
    let weights = model
        .to_weights()
        .with_context(|| format!("Invalid weights in model: {}", path.display()))?;
    Ok((model.name, weights))
}
