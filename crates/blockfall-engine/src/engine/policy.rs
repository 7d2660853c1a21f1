//! Pluggable scoring, speed and level rules.
//!
//! A [`GameConfig`](crate::GameConfig) holds one boxed strategy per rule. The
//! defaults reproduce the classic rules; custom implementations only have to
//! honor the numeric contract documented on each trait.

use std::fmt;

use crate::core::Position;

/// Fall speed after a level-up.
///
/// Speed is the number of ticks between two gravity steps, so smaller is
/// faster. Implementations should be non-increasing in the level. A returned
/// value of `0` is treated as `1`.
pub trait SpeedPolicy: fmt::Debug + Send + Sync {
    fn next_speed(&self, current: u32) -> u32;
}

/// Score awarded for clearing `lines` rows at once at `level`.
///
/// Must return `0` for `lines == 0` and should be non-decreasing in both
/// `lines` and `level`.
pub trait LineScoringPolicy: fmt::Debug + Send + Sync {
    fn score(&self, line_score: u64, lines: usize, level: u32) -> u64;
}

/// Score awarded for locking a piece at `position` at `level`.
pub trait PlacementScoringPolicy: fmt::Debug + Send + Sync {
    fn score(&self, position: Position, level: u32) -> u64;
}

/// Decides whether the level advances after a lock.
///
/// Called at most once per lock, after `total_lines` has been updated.
pub trait LevelPolicy: fmt::Debug + Send + Sync {
    fn should_advance(&self, level: u32, total_lines: usize) -> bool;
}

/// Keeps the speed unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstantSpeed;

impl SpeedPolicy for ConstantSpeed {
    fn next_speed(&self, current: u32) -> u32 {
        current
    }
}

/// Lowers the tick threshold by `step` per level, never below `min`.
#[derive(Debug, Clone, Copy)]
pub struct SpeedUpBy {
    pub step: u32,
    pub min: u32,
}

impl SpeedPolicy for SpeedUpBy {
    fn next_speed(&self, current: u32) -> u32 {
        current.saturating_sub(self.step).max(self.min).max(1)
    }
}

/// `line_score * lines² * (level + 1)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuadraticLineScoring;

impl LineScoringPolicy for QuadraticLineScoring {
    fn score(&self, line_score: u64, lines: usize, level: u32) -> u64 {
        let lines = lines as u64;
        line_score * lines * lines * (u64::from(level) + 1)
    }
}

/// `(x + level + 1)²` where `x` is the locked piece's reference column.
///
/// A negative reference column counts as `0`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SquaredColumnScoring;

impl PlacementScoringPolicy for SquaredColumnScoring {
    fn score(&self, position: Position, level: u32) -> u64 {
        let x = u64::try_from(position.x).unwrap_or(0);
        let base = x + u64::from(level) + 1;
        base * base
    }
}

/// Advances one level every `lines` cleared rows.
///
/// The level after a lock is `total_lines / lines`, reached one step at a time,
/// so sitting on a multiple of `lines` never grants a second level.
#[derive(Debug, Clone, Copy)]
pub struct EveryNLines {
    pub lines: usize,
}

impl Default for EveryNLines {
    fn default() -> Self {
        Self { lines: 40 }
    }
}

impl LevelPolicy for EveryNLines {
    fn should_advance(&self, level: u32, total_lines: usize) -> bool {
        let Ok(level) = usize::try_from(level) else {
            return false;
        };
        self.lines != 0 && total_lines >= self.lines * (level + 1)
    }
}
