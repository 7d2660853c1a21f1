//! Greedy one-piece move search.
//!
//! For every sequence of the [`MoveCatalog`] the agent replays the sequence on a
//! simulation copy of the game (see [`Game::try_moves`]), measures the board
//! the piece locked into, and keeps the best candidate.
//!
//! # Selection Policies
//!
//! - [`SelectionPolicy::Weighted`] ranks candidates by the dot product of
//!   their [`FeatureVector`] with the agent's [`Weights`]. On equal scores the
//!   later candidate wins.
//! - [`SelectionPolicy::Reference`] ranks candidates with the fixed
//!   lexicographic ordering of [`compare_reference`], which needs no weights.
//!   On a complete tie the earlier candidate is kept.
//!
//! Only the current piece is considered; the next piece is ignored.

use std::cmp::Ordering;

use blockfall_engine::{Board, Command, Game};

use crate::{
    agent::Agent,
    board_metrics::BoardMetrics,
    move_catalog::MoveCatalog,
    weights::{FeatureVector, Weights},
};

/// Outcome of one catalog sequence replayed on a simulation copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Commands consumed up to the lock, including padding `Down`s.
    pub moves: Vec<Command>,
    /// Locked board after the placement and its line clears.
    pub board: Board,
    /// Total cleared lines of the game after the placement.
    pub total_lines: usize,
    /// Total score of the game after the placement.
    pub score: u64,
    /// Lines cleared by this placement alone.
    pub cleared: usize,
    pub metrics: BoardMetrics,
}

impl Candidate {
    /// Replays `moves` on a copy of `game` and measures the result.
    #[must_use]
    pub fn evaluate(game: &Game, moves: &[Command]) -> Self {
        let outcome = game.try_moves(moves);
        let board = outcome.game.board().clone();
        Self {
            moves: outcome.moves,
            metrics: BoardMetrics::from_board(&board),
            board,
            total_lines: outcome.game.cleared_lines(),
            score: outcome.game.score(),
            cleared: outcome.game.cleared_lines() - game.cleared_lines(),
        }
    }

    #[must_use]
    pub fn features(&self) -> FeatureVector {
        FeatureVector::new(&self.metrics, self.cleared)
    }
}

/// Lexicographic ranking of two candidates; `Greater` means `a` is better.
///
/// 1. If either side clears 3 or more lines at once, more cleared lines win.
/// 2. Fewer holes.
/// 3. Lower bumpiness.
/// 4. Lower aggregate height.
/// 5. More total lines.
/// 6. Higher score.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
///
/// use blockfall_engine::Board;
/// use blockfall_evaluator::{
///     board_metrics::BoardMetrics,
///     search_agent::{Candidate, compare_reference},
/// };
///
/// let candidate = |cleared, holes| Candidate {
///     moves: vec![],
///     board: Board::new(10, 20),
///     total_lines: cleared,
///     score: 0,
///     cleared,
///     metrics: BoardMetrics { holes, ..BoardMetrics::default() },
/// };
///
/// // a triple beats any hole count
/// assert_eq!(compare_reference(&candidate(3, 5), &candidate(1, 2)), Ordering::Greater);
/// // below three lines, holes decide first
/// assert_eq!(compare_reference(&candidate(2, 5), &candidate(1, 2)), Ordering::Less);
/// ```
#[must_use]
pub fn compare_reference(a: &Candidate, b: &Candidate) -> Ordering {
    if a.cleared >= 3 || b.cleared >= 3 {
        let ord = a.cleared.cmp(&b.cleared);
        if ord.is_ne() {
            return ord;
        }
    }
    b.metrics
        .holes
        .cmp(&a.metrics.holes)
        .then_with(|| b.metrics.bumpiness.cmp(&a.metrics.bumpiness))
        .then_with(|| b.metrics.aggregate_height.cmp(&a.metrics.aggregate_height))
        .then_with(|| a.total_lines.cmp(&b.total_lines))
        .then_with(|| a.score.cmp(&b.score))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::FromStr)]
pub enum SelectionPolicy {
    #[default]
    Weighted,
    Reference,
}

/// Move-search agent driven by a weight vector.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Game, GameConfig, GameRules};
/// use blockfall_evaluator::{agent::Agent, search_agent::SearchAgent, weights::Weights};
///
/// let rules = GameRules::new(GameConfig::default()).unwrap();
/// let game = Game::with_seed(rules, 0);
/// let mut agent = SearchAgent::new(Weights::default(), game.rules().board_width());
///
/// let moves = agent.decide(&game);
/// let outcome = game.try_moves(&moves);
/// assert_eq!(outcome.moves, moves);
/// assert_eq!(outcome.game.placed_pieces(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SearchAgent {
    weights: Weights,
    policy: SelectionPolicy,
    catalog: MoveCatalog,
}

impl SearchAgent {
    #[must_use]
    pub fn new(weights: Weights, board_width: usize) -> Self {
        Self {
            weights,
            policy: SelectionPolicy::Weighted,
            catalog: MoveCatalog::new(board_width),
        }
    }

    #[must_use]
    pub fn with_policy(self, policy: SelectionPolicy) -> Self {
        Self { policy, ..self }
    }

    #[must_use]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn set_weights(&mut self, weights: Weights) {
        self.weights = weights;
    }

    #[must_use]
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    #[must_use]
    pub fn catalog(&self) -> &MoveCatalog {
        &self.catalog
    }

    /// Rebuilds the move catalog when `board_width` calls for a different
    /// shift range.
    pub fn fit_board_width(&mut self, board_width: usize) {
        if !self.catalog.fits(board_width) {
            self.catalog = MoveCatalog::new(board_width);
        }
    }

    /// Evaluates every catalog sequence in catalog order.
    ///
    /// A game whose board width does not match the catalog is searched with a
    /// catalog built for that width.
    #[must_use]
    pub fn candidates(&self, game: &Game) -> Vec<Candidate> {
        let board_width = game.rules().board_width();
        let fitted;
        let catalog = if self.catalog.fits(board_width) {
            &self.catalog
        } else {
            fitted = MoveCatalog::new(board_width);
            &fitted
        };
        catalog
            .sequences()
            .iter()
            .map(|moves| Candidate::evaluate(game, moves))
            .collect()
    }

    /// Picks the best candidate under the agent's selection policy.
    ///
    /// Returns `None` only for an empty candidate list.
    #[must_use]
    pub fn select<I>(&self, candidates: I) -> Option<Candidate>
    where
        I: IntoIterator<Item = Candidate>,
    {
        match self.policy {
            SelectionPolicy::Weighted => {
                let mut best: Option<(f64, Candidate)> = None;
                for candidate in candidates {
                    let score = self.weights.score(&candidate.features());
                    if best.as_ref().is_none_or(|(best, _)| score >= *best) {
                        best = Some((score, candidate));
                    }
                }
                best.map(|(_, candidate)| candidate)
            }
            SelectionPolicy::Reference => candidates.into_iter().reduce(|best, candidate| {
                if compare_reference(&candidate, &best).is_gt() {
                    candidate
                } else {
                    best
                }
            }),
        }
    }

    /// Best candidate for the current piece, or `None` once the game is over.
    #[must_use]
    pub fn best_candidate(&self, game: &Game) -> Option<Candidate> {
        if game.is_terminated() {
            return None;
        }
        self.select(self.candidates(game))
    }
}

impl Agent for SearchAgent {
    fn decide(&mut self, game: &Game) -> Vec<Command> {
        self.fit_board_width(game.rules().board_width());
        self.best_candidate(game)
            .map(|candidate| candidate.moves)
            .unwrap_or_default()
    }
}
