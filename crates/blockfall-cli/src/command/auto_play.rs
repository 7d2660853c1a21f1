use std::{path::PathBuf, sync::Arc};

use blockfall_engine::{Game, GameRules};
use blockfall_evaluator::{
    agent::{Agent, AutoPlayer, RandomAgent},
    search_agent::{SearchAgent, SelectionPolicy},
    session::GameSummary,
};
use blockfall_stats::descriptive::DescriptiveStats;
use rand::Rng as _;
use serde::Serialize;

use crate::{
    command::{self, GameArg},
    util,
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum AgentKind {
    #[default]
    Search,
    Random,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    #[clap(flatten)]
    game: GameArg,
    /// Which agent plays (`search` or `random`)
    #[arg(long, default_value = "search")]
    agent: AgentKind,
    /// Path to the model file (JSON format); built-in weights when omitted
    #[arg(long)]
    model: Option<PathBuf>,
    /// How the search agent ranks candidates (`weighted` or `reference`)
    #[arg(long, default_value = "weighted")]
    policy: SelectionPolicy,
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Piece cap per game
    #[arg(long, default_value_t = 1000)]
    max_pieces: usize,
    /// Seed of the first game; later games use the following seeds
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path for the game summaries
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PlayReport {
    agent: String,
    games: Vec<GameSummary>,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        game,
        agent,
        model,
        policy,
        games,
        max_pieces,
        seed,
        output,
    } = arg;

    let rules = game.rules()?;
    let first_seed = seed.unwrap_or_else(|| rand::rng().random());

    let (label, summaries) = match agent {
        AgentKind::Search => {
            let (name, weights) = command::load_weights(model.as_deref())?;
            eprintln!("Search agent with {name} weights {weights:?} ({policy} selection)");
            let agent = SearchAgent::new(weights, rules.board_width()).with_policy(*policy);
            let summaries = play_games(agent, &rules, first_seed, *games, *max_pieces)?;
            (name, summaries)
        }
        AgentKind::Random => {
            eprintln!("Random agent");
            let agent = RandomAgent::new(Some(first_seed));
            let summaries = play_games(agent, &rules, first_seed, *games, *max_pieces)?;
            ("random".to_owned(), summaries)
        }
    };

    print_summary(&summaries);
    util::save_json(
        &PlayReport {
            agent: label,
            games: summaries,
        },
        output.as_deref(),
    )
}

fn play_games<A>(
    agent: A,
    rules: &Arc<GameRules>,
    first_seed: u64,
    games: usize,
    max_pieces: usize,
) -> anyhow::Result<Vec<GameSummary>>
where
    A: Agent,
{
    let mut player = AutoPlayer::new(agent);
    let mut summaries = Vec::with_capacity(games);
    for i in 0..games {
        let seed = first_seed.wrapping_add(i as u64);
        player.bind(Game::with_seed(Arc::clone(rules), seed));
        let summary = player.play(max_pieces)?;
        eprintln!(
            "  Game {i:3} (seed {seed}): {} lines, {} pieces, score {}, level {}{}",
            summary.lines,
            summary.pieces,
            summary.score,
            summary.level,
            if summary.terminated { "" } else { " (capped)" }
        );
        summaries.push(summary);
    }
    Ok(summaries)
}

#[expect(clippy::cast_precision_loss)]
fn print_summary(summaries: &[GameSummary]) {
    let lines = DescriptiveStats::new(summaries.iter().map(|s| s.lines as f64));
    let scores = DescriptiveStats::new(summaries.iter().map(|s| s.score as f64));
    let (Some(lines), Some(scores)) = (lines, scores) else {
        eprintln!("No games played");
        return;
    };
    eprintln!("Lines:");
    eprintln!("  Min:    {:.0} (game {})", lines.min, lines.argmin);
    eprintln!("  Max:    {:.0} (game {})", lines.max, lines.argmax);
    eprintln!("  Mean:   {:.3}", lines.mean);
    eprintln!("  Median: {:.1}", lines.median);
    eprintln!("  Std:    {:.3}", lines.std_dev);
    eprintln!("Score:");
    eprintln!("  Mean:   {:.1}", scores.mean);
    eprintln!("  Max:    {:.0}", scores.max);
}
