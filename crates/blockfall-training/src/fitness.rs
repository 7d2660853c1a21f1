//! Fitness functions scoring a genome by playing games with it.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use blockfall_engine::{Game, GameRules};
use blockfall_evaluator::{search_agent::SearchAgent, session, weights::FEATURE_COUNT};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::genome::Genome;

/// Scores genomes. Higher is better.
///
/// Implementations are shared across evaluation threads, so they must be
/// `Sync` and may not keep per-call mutable state outside atomics.
pub trait FitnessFunction: Sync {
    /// Genome length this function accepts.
    fn genes_count(&self) -> usize;

    /// Scores `genome`, deriving all game randomness from `seed`.
    ///
    /// Returns `None` when `interrupt` was raised before the evaluation
    /// finished; the partial result is discarded.
    fn evaluate(&self, genome: &Genome, seed: u64, interrupt: &AtomicBool) -> Option<f64>;
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("a genome must be evaluated on at least one game")]
pub struct NoGamesError;

/// Average number of lines cleared by the search agent over several games.
///
/// Every game is capped at `max_pieces` so weak genomes that never top out
/// still finish.
#[derive(Debug, Clone)]
pub struct LineClearFitness {
    rules: Arc<GameRules>,
    games_per_genome: usize,
    max_pieces: usize,
}

impl LineClearFitness {
    pub const DEFAULT_GAMES_PER_GENOME: usize = 100;
    pub const DEFAULT_MAX_PIECES: usize = 100;

    pub fn new(
        rules: Arc<GameRules>,
        games_per_genome: usize,
        max_pieces: usize,
    ) -> Result<Self, NoGamesError> {
        if games_per_genome == 0 {
            return Err(NoGamesError);
        }
        Ok(Self {
            rules,
            games_per_genome,
            max_pieces,
        })
    }

    #[must_use]
    pub fn rules(&self) -> &Arc<GameRules> {
        &self.rules
    }

    #[must_use]
    pub fn games_per_genome(&self) -> usize {
        self.games_per_genome
    }

    #[must_use]
    pub fn max_pieces(&self) -> usize {
        self.max_pieces
    }
}

impl FitnessFunction for LineClearFitness {
    fn genes_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// # Panics
    ///
    /// Panics if the genome length differs from [`FEATURE_COUNT`], which
    /// [`GeneticAlgorithm`](crate::genetic::GeneticAlgorithm) rules out at
    /// construction.
    fn evaluate(&self, genome: &Genome, seed: u64, interrupt: &AtomicBool) -> Option<f64> {
        let weights = genome
            .to_weights()
            .expect("genome length is checked against the feature count");
        let mut agent = SearchAgent::new(weights, self.rules.board_width());
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut lines = 0;
        for _ in 0..self.games_per_genome {
            if interrupt.load(Ordering::Relaxed) {
                return None;
            }
            let mut game = Game::with_seed(Arc::clone(&self.rules), rng.random());
            lines += session::play_game(&mut agent, &mut game, self.max_pieces).lines;
        }

        #[expect(clippy::cast_precision_loss)]
        let fitness = lines as f64 / self.games_per_genome as f64;
        Some(fitness)
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::GameConfig;
    use blockfall_evaluator::weights::Weights;

    use super::*;

    fn fitness(games: usize, max_pieces: usize) -> LineClearFitness {
        let rules = GameRules::new(GameConfig::default()).unwrap();
        LineClearFitness::new(rules, games, max_pieces).unwrap()
    }

    #[test]
    fn test_zero_games_rejected() {
        let rules = GameRules::new(GameConfig::default()).unwrap();
        assert_eq!(
            LineClearFitness::new(rules, 0, 10).unwrap_err(),
            NoGamesError
        );
    }

    #[test]
    fn test_same_seed_same_fitness() {
        let fitness = fitness(2, 40);
        let genome = Genome::from(Weights::default());
        let interrupt = AtomicBool::new(false);
        let a = fitness.evaluate(&genome, 5, &interrupt).unwrap();
        let b = fitness.evaluate(&genome, 5, &interrupt).unwrap();
        assert_eq!(a, b);
        assert!(a >= 0.0);
    }

    #[test]
    fn test_tuned_weights_beat_inverted_weights() {
        let fitness = fitness(2, 60);
        let interrupt = AtomicBool::new(false);
        let good = Genome::from(Weights::default());
        let bad = Genome::from(vec![0.5, -0.7, 0.35, 0.18]);
        let good = fitness.evaluate(&good, 1, &interrupt).unwrap();
        let bad = fitness.evaluate(&bad, 1, &interrupt).unwrap();
        assert!(good > bad, "good = {good}, bad = {bad}");
    }

    #[test]
    fn test_interrupt_discards_evaluation() {
        let fitness = fitness(3, 20);
        let interrupt = AtomicBool::new(true);
        let genome = Genome::from(Weights::default());
        assert_eq!(fitness.evaluate(&genome, 0, &interrupt), None);
    }
}
