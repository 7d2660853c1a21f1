use std::path::PathBuf;

use blockfall_engine::Game;
use blockfall_evaluator::{
    search_agent::{SearchAgent, SelectionPolicy},
    session,
    weights::Weights,
};
use blockfall_stats::descriptive::DescriptiveStats;
use rand::Rng as _;
use serde::Serialize;

use crate::{
    command::{self, GameArg},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CompareArg {
    #[clap(flatten)]
    game: GameArg,
    /// Model files to compare; the built-in weights are used when none is given
    models: Vec<PathBuf>,
    /// Also play the built-in weights
    #[arg(long)]
    include_default: bool,
    /// Selection policies to try for every weight set
    #[arg(long, value_delimiter = ',', default_value = "weighted")]
    policies: Vec<SelectionPolicy>,
    /// Games per contender; every contender plays the same games
    #[arg(long, default_value_t = 10)]
    games: usize,
    /// Piece cap per game
    #[arg(long, default_value_t = 500)]
    max_pieces: usize,
    /// Seed of the first game
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path for the comparison table
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ContenderResult {
    name: String,
    policy: String,
    weights: Weights,
    mean_lines: f64,
    std_lines: f64,
    min_lines: f64,
    max_lines: f64,
    mean_pieces: f64,
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    let CompareArg {
        game,
        models,
        include_default,
        policies,
        games,
        max_pieces,
        seed,
        output,
    } = arg;

    let rules = game.rules()?;
    let first_seed = seed.unwrap_or_else(|| rand::rng().random());

    let mut contenders = vec![];
    if *include_default || models.is_empty() {
        contenders.push(command::load_weights(None)?);
    }
    for path in models {
        contenders.push(command::load_weights(Some(path.as_path()))?);
    }

    eprintln!(
        "Comparing {} weight sets x {} policies on {games} games (seeds from {first_seed})",
        contenders.len(),
        policies.len()
    );

    let mut results = vec![];
    for (name, weights) in &contenders {
        for policy in policies {
            let mut agent =
                SearchAgent::new(*weights, rules.board_width()).with_policy(*policy);
            let summaries = (0..*games)
                .map(|i| {
                    let mut game = Game::with_seed(rules.clone(), first_seed.wrapping_add(i as u64));
                    session::play_game(&mut agent, &mut game, *max_pieces)
                })
                .collect::<Vec<_>>();

            #[expect(clippy::cast_precision_loss)]
            let lines = DescriptiveStats::new(summaries.iter().map(|s| s.lines as f64));
            #[expect(clippy::cast_precision_loss)]
            let pieces = DescriptiveStats::new(summaries.iter().map(|s| s.pieces as f64));
            let (Some(lines), Some(pieces)) = (lines, pieces) else {
                anyhow::bail!("At least one game is needed to compare weights");
            };
            let policy = policy.to_string();
            eprintln!(
                "  {name:>12} {policy:>9}: lines mean {:8.2} std {:7.2} min {:5.0} max {:5.0}",
                lines.mean, lines.std_dev, lines.min, lines.max
            );
            results.push(ContenderResult {
                name: name.clone(),
                policy,
                weights: *weights,
                mean_lines: lines.mean,
                std_lines: lines.std_dev,
                min_lines: lines.min,
                max_lines: lines.max,
                mean_pieces: pieces.mean,
            });
        }
    }

    if let Some(best) = results
        .iter()
        .max_by(|a, b| a.mean_lines.total_cmp(&b.mean_lines))
    {
        eprintln!("Best: {} ({}) with {:.2} lines per game", best.name, best.policy, best.mean_lines);
    }
    util::save_json(&results, output.as_deref())
}
