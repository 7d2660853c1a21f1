use std::sync::Arc;

use crate::core::{Piece, catalog};

use super::policy::{
    ConstantSpeed, EveryNLines, LevelPolicy, LineScoringPolicy, PlacementScoringPolicy,
    QuadraticLineScoring, SpeedPolicy, SquaredColumnScoring,
};

/// Everything needed to start a game.
///
/// Build one with struct-update syntax over [`GameConfig::default`] and turn it
/// into validated [`GameRules`] with [`GameRules::new`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameConfig, GameRules, catalog};
///
/// let rules = GameRules::new(GameConfig {
///     board_width: 6,
///     pieces: catalog::small_pieces(),
///     ..GameConfig::default()
/// })
/// .unwrap();
/// assert_eq!(rules.board_width(), 6);
/// assert_eq!(rules.board_height(), 20);
/// ```
#[derive(Debug)]
pub struct GameConfig {
    /// Playable columns, walls excluded. Default `10`.
    pub board_width: usize,
    /// Playable rows, bottom wall excluded. Default `20`.
    pub board_height: usize,
    /// Pieces drawn uniformly at random. Default: the classic tetrominoes.
    pub pieces: Vec<Piece>,
    /// Fixed seed for the game's random source. Default `None`.
    pub seed: Option<u64>,
    /// Base score handed to the line scoring policy. Default `50`.
    pub line_score: u64,
    /// Ticks between gravity steps at level 0. Default `35`.
    pub initial_speed: u32,
    pub speed_policy: Box<dyn SpeedPolicy>,
    pub line_scoring: Box<dyn LineScoringPolicy>,
    pub placement_scoring: Box<dyn PlacementScoringPolicy>,
    pub level_policy: Box<dyn LevelPolicy>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 10,
            board_height: 20,
            pieces: catalog::classic_pieces(),
            seed: None,
            line_score: 50,
            initial_speed: 35,
            speed_policy: Box::new(ConstantSpeed),
            line_scoring: Box::new(QuadraticLineScoring),
            placement_scoring: Box::new(SquaredColumnScoring),
            level_policy: Box::new(EveryNLines::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board must be at least 1x1, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },
    #[display("piece catalog is empty")]
    EmptyCatalog,
    #[display("initial speed must be positive")]
    ZeroSpeed,
    #[display("piece `{name}` needs {side} columns but the board has {width}")]
    PieceTooWide {
        name: char,
        side: usize,
        width: usize,
    },
    #[display("piece `{name}` needs {side} rows but the board has {height}")]
    PieceTooTall {
        name: char,
        side: usize,
        height: usize,
    },
}

/// Validated, shareable game configuration.
///
/// Many games (for example the thousands played during training) can share one
/// `Arc<GameRules>`; each game keeps its own board, pieces and random source.
#[derive(Debug)]
pub struct GameRules {
    config: GameConfig,
}

impl GameRules {
    pub fn new(config: GameConfig) -> Result<Arc<Self>, ConfigError> {
        let GameConfig {
            board_width: width,
            board_height: height,
            ..
        } = config;
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyBoard { width, height });
        }
        if config.pieces.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        if config.initial_speed == 0 {
            return Err(ConfigError::ZeroSpeed);
        }
        for piece in &config.pieces {
            let side = piece.max_side();
            if side > width {
                return Err(ConfigError::PieceTooWide {
                    name: piece.name(),
                    side,
                    width,
                });
            }
            if side > height {
                return Err(ConfigError::PieceTooTall {
                    name: piece.name(),
                    side,
                    height,
                });
            }
        }
        Ok(Arc::new(Self { config }))
    }

    #[must_use]
    pub fn board_width(&self) -> usize {
        self.config.board_width
    }

    #[must_use]
    pub fn board_height(&self) -> usize {
        self.config.board_height
    }

    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.config.pieces
    }

    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.config.seed
    }

    #[must_use]
    pub fn line_score(&self) -> u64 {
        self.config.line_score
    }

    #[must_use]
    pub fn initial_speed(&self) -> u32 {
        self.config.initial_speed
    }

    #[must_use]
    pub fn speed_policy(&self) -> &dyn SpeedPolicy {
        self.config.speed_policy.as_ref()
    }

    #[must_use]
    pub fn line_scoring(&self) -> &dyn LineScoringPolicy {
        self.config.line_scoring.as_ref()
    }

    #[must_use]
    pub fn placement_scoring(&self) -> &dyn PlacementScoringPolicy {
        self.config.placement_scoring.as_ref()
    }

    #[must_use]
    pub fn level_policy(&self) -> &dyn LevelPolicy {
        self.config.level_policy.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = GameRules::new(GameConfig::default()).unwrap();
        assert_eq!(rules.board_width(), 10);
        assert_eq!(rules.board_height(), 20);
        assert_eq!(rules.pieces().len(), 7);
        assert_eq!(rules.line_score(), 50);
        assert_eq!(rules.initial_speed(), 35);
        assert_eq!(rules.seed(), None);
    }

    #[test]
    fn test_invalid_configs() {
        let err = GameRules::new(GameConfig {
            board_height: 0,
            ..GameConfig::default()
        })
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::EmptyBoard {
                width: 10,
                height: 0
            }
        );

        let err = GameRules::new(GameConfig {
            pieces: vec![],
            ..GameConfig::default()
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::EmptyCatalog);

        let err = GameRules::new(GameConfig {
            initial_speed: 0,
            ..GameConfig::default()
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::ZeroSpeed);

        let err = GameRules::new(GameConfig {
            board_width: 3,
            ..GameConfig::default()
        })
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::PieceTooWide {
                name: 'I',
                side: 4,
                width: 3
            }
        );
    }
}
