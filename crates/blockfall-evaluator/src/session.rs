//! Playing whole games with an agent.

use blockfall_engine::{Command, Game};
use serde::{Deserialize, Serialize};

use crate::agent::Agent;

/// Final state of a played game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub seed: u64,
    pub pieces: usize,
    pub lines: usize,
    pub score: u64,
    pub level: u32,
    /// `true` when the game ended by a blocked spawn rather than the piece cap.
    pub terminated: bool,
}

impl GameSummary {
    #[must_use]
    pub fn from_game(game: &Game) -> Self {
        Self {
            seed: game.seed(),
            pieces: game.placed_pieces(),
            lines: game.cleared_lines(),
            score: game.score(),
            level: game.level(),
            terminated: game.is_terminated(),
        }
    }
}

/// Lets `agent` play `game` until it terminates or `max_pieces` pieces have
/// been locked.
///
/// Every decision is ticked into the game in order. A decision with no
/// command advances the game by one `Nothing` tick, so gravity guarantees
/// progress for any agent.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Game, GameConfig, GameRules};
/// use blockfall_evaluator::{search_agent::SearchAgent, session, weights::Weights};
///
/// let rules = GameRules::new(GameConfig::default()).unwrap();
/// let mut game = Game::with_seed(rules, 11);
/// let mut agent = SearchAgent::new(Weights::default(), 10);
///
/// let summary = session::play_game(&mut agent, &mut game, 30);
/// assert!(summary.terminated || summary.pieces == 30);
/// ```
pub fn play_game<A>(agent: &mut A, game: &mut Game, max_pieces: usize) -> GameSummary
where
    A: Agent + ?Sized,
{
    while !game.is_terminated() && game.placed_pieces() < max_pieces {
        let moves = agent.decide(game);
        if moves.is_empty() {
            game.tick(Command::Nothing);
            continue;
        }
        for command in moves {
            game.tick(command);
        }
    }
    let summary = GameSummary::from_game(game);
    tracing::debug!(
        "Game {} finished: pieces={}, lines={}, score={}, terminated={}",
        summary.seed,
        summary.pieces,
        summary.lines,
        summary.score,
        summary.terminated
    );
    summary
}
