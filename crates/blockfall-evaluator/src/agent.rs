//! Players and the binding between a player and a live game.
//!
//! An [`Agent`] looks at a game and returns the commands to feed it. Agents
//! never mutate the game themselves: [`AutoPlayer`] owns the bound game and
//! ticks the returned commands into it.

use blockfall_engine::{Command, Game, LockEvent};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::session::{self, GameSummary};

/// Chooses commands for the current state of a game.
pub trait Agent {
    /// Returns the commands to play next, in order.
    ///
    /// An empty list means the agent has nothing to do, for example because the
    /// game is over.
    fn decide(&mut self, game: &Game) -> Vec<Command>;
}

/// Baseline player issuing one uniformly random command per decision.
///
/// `Store` is never chosen since it has no effect.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: Pcg32,
}

impl RandomAgent {
    const CHOICES: [Command; 6] = [
        Command::Nothing,
        Command::Left,
        Command::Right,
        Command::RotateLeft,
        Command::RotateRight,
        Command::Down,
    ];

    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn decide(&mut self, _game: &Game) -> Vec<Command> {
        let index = self.rng.random_range(0..Self::CHOICES.len());
        vec![Self::CHOICES[index]]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no game is bound to the agent; call `bind` first")]
pub struct UnboundAgentError;

/// An agent together with the game it plays.
///
/// Asking for a prediction before a game is bound is a programming error and
/// reported as [`UnboundAgentError`], never answered with a default move.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Game, GameConfig, GameRules};
/// use blockfall_evaluator::{
///     agent::{AutoPlayer, UnboundAgentError},
///     search_agent::SearchAgent,
///     weights::Weights,
/// };
///
/// let rules = GameRules::new(GameConfig::default()).unwrap();
/// let mut player = AutoPlayer::new(SearchAgent::new(Weights::default(), 10));
/// assert_eq!(player.predict(), Err(UnboundAgentError));
///
/// player.bind(Game::with_seed(rules, 5));
/// player.play_piece().unwrap();
/// assert_eq!(player.game().unwrap().placed_pieces(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct AutoPlayer<A> {
    agent: A,
    game: Option<Game>,
}

impl<A> AutoPlayer<A>
where
    A: Agent,
{
    #[must_use]
    pub fn new(agent: A) -> Self {
        Self { agent, game: None }
    }

    /// Binds a game, returning the previously bound one.
    pub fn bind(&mut self, game: Game) -> Option<Game> {
        self.game.replace(game)
    }

    pub fn unbind(&mut self) -> Option<Game> {
        self.game.take()
    }

    #[must_use]
    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    #[must_use]
    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut A {
        &mut self.agent
    }

    /// Asks the agent for its next commands without playing them.
    pub fn predict(&mut self) -> Result<Vec<Command>, UnboundAgentError> {
        let game = self.game.as_ref().ok_or(UnboundAgentError)?;
        Ok(self.agent.decide(game))
    }

    /// Plays one decision of the agent and returns the locks it caused.
    ///
    /// An agent that returns no command still advances the game by one
    /// `Nothing` tick so gravity keeps running.
    pub fn play_piece(&mut self) -> Result<Vec<LockEvent>, UnboundAgentError> {
        let game = self.game.as_mut().ok_or(UnboundAgentError)?;
        let mut moves = self.agent.decide(game);
        if moves.is_empty() {
            moves.push(Command::Nothing);
        }
        let mut events = Vec::new();
        for command in moves {
            events.extend(game.tick(command));
        }
        Ok(events)
    }

    /// Plays the bound game until it terminates or `max_pieces` are locked.
    pub fn play(&mut self, max_pieces: usize) -> Result<GameSummary, UnboundAgentError> {
        let game = self.game.as_mut().ok_or(UnboundAgentError)?;
        Ok(session::play_game(&mut self.agent, game, max_pieces))
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{GameConfig, GameRules};

    use super::*;
    use crate::{search_agent::SearchAgent, weights::Weights};

    #[test]
    fn test_unbound_player_fails() {
        let mut player = AutoPlayer::new(RandomAgent::new(Some(1)));
        assert_eq!(player.predict(), Err(UnboundAgentError));
        assert_eq!(player.play_piece(), Err(UnboundAgentError));
        assert!(player.play(10).is_err());
    }

    #[test]
    fn test_bind_and_unbind() {
        let rules = GameRules::new(GameConfig::default()).unwrap();
        let mut player = AutoPlayer::new(SearchAgent::new(Weights::default(), 10));
        assert!(player.bind(Game::with_seed(rules.clone(), 1)).is_none());
        let previous = player.bind(Game::with_seed(rules, 2)).unwrap();
        assert_eq!(previous.seed(), 1);
        assert_eq!(player.game().unwrap().seed(), 2);

        let moves = player.predict().unwrap();
        assert!(!moves.is_empty());
        // predicting never touches the bound game
        assert_eq!(player.game().unwrap().placed_pieces(), 0);

        let events = player.play_piece().unwrap();
        assert_eq!(events.len(), 1);
        assert!(player.unbind().is_some());
        assert_eq!(player.predict(), Err(UnboundAgentError));
    }

    #[test]
    fn test_random_agent_never_stores() {
        let rules = GameRules::new(GameConfig::default()).unwrap();
        let game = Game::with_seed(rules, 0);
        let mut agent = RandomAgent::new(Some(42));
        for _ in 0..500 {
            let moves = agent.decide(&game);
            assert_eq!(moves.len(), 1);
            assert_ne!(moves[0], Command::Store);
        }
    }

    #[test]
    fn test_random_agent_is_seeded() {
        let rules = GameRules::new(GameConfig::default()).unwrap();
        let game = Game::with_seed(rules, 0);
        let mut a = RandomAgent::new(Some(9));
        let mut b = RandomAgent::new(Some(9));
        for _ in 0..50 {
            assert_eq!(a.decide(&game), b.decide(&game));
        }
    }
}
