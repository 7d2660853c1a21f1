use std::sync::Arc;

use arrayvec::ArrayVec;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::core::{Board, Piece, Position, Rotation, Shape};

use super::{command::Command, config::GameRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameState {
    Running,
    Terminated,
}

/// What happened when a piece locked into the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    /// Reference position the piece locked at.
    pub position: Position,
    pub cleared_lines: usize,
    /// Placement score plus line score awarded for this lock.
    pub score_gained: u64,
    pub level_up: bool,
    /// The next piece could not spawn.
    pub game_over: bool,
}

/// Locks caused by a single tick: the command's own `Down` and gravity can
/// each lock a piece when the speed is `1`.
pub type TickEvents = ArrayVec<LockEvent, 2>;

/// Result of replaying moves on a simulation copy with [`Game::try_moves`].
#[derive(Debug, Clone)]
pub struct TrialOutcome {
    /// Commands actually consumed: the input padded with `Down` until the
    /// piece locked, or trimmed at the lock.
    pub moves: Vec<Command>,
    /// The simulation copy right after the lock (or termination).
    pub game: Game,
}

/// A single game: board, falling and next piece, counters and random source.
///
/// The game is advanced only by [`Game::tick`]. Each instance owns its random
/// source, so two games built from the same rules and seed and fed the same
/// commands stay identical, and a [`clone_for_simulation`] copy never
/// perturbs the original's piece sequence.
///
/// [`clone_for_simulation`]: Game::clone_for_simulation
///
/// # Example
///
/// ```
/// use blockfall_engine::{Command, Game, GameConfig, GameRules};
///
/// let rules = GameRules::new(GameConfig::default()).unwrap();
/// let mut game = Game::with_seed(rules, 42);
///
/// while game.placed_pieces() == 0 {
///     game.tick(Command::Down);
/// }
/// assert!(game.board().occupied_count() > 0);
/// assert!(game.score() > 0);
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    rules: Arc<GameRules>,
    seed: u64,
    rng: Pcg32,
    board: Board,
    current_piece: Piece,
    next_piece: Piece,
    position: Position,
    score: u64,
    cleared_lines: usize,
    level: u32,
    speed: u32,
    timer: u32,
    placed_pieces: usize,
    state: GameState,
}

impl Game {
    /// Starts a game seeded from the rules, or randomly if they carry no seed.
    #[must_use]
    pub fn new(rules: Arc<GameRules>) -> Self {
        let seed = rules.seed().unwrap_or_else(|| rand::rng().random());
        Self::with_seed(rules, seed)
    }

    /// Starts a game with an explicit seed, ignoring the rules' seed.
    #[must_use]
    pub fn with_seed(rules: Arc<GameRules>, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let current_piece = draw_piece(&rules, &mut rng);
        let next_piece = draw_piece(&rules, &mut rng);
        let board = Board::new(rules.board_width(), rules.board_height());
        let position = spawn_position(&rules, &current_piece);
        let speed = rules.initial_speed();
        let mut game = Self {
            rules,
            seed,
            rng,
            board,
            current_piece,
            next_piece,
            position,
            score: 0,
            cleared_lines: 0,
            level: 0,
            speed,
            timer: 0,
            placed_pieces: 0,
            state: GameState::Running,
        };
        game.check_spawn();
        game
    }

    /// Restores a fresh game, continuing this game's random stream.
    ///
    /// This is the only way out of [`GameState::Terminated`].
    pub fn reset(&mut self) {
        self.board = Board::new(self.rules.board_width(), self.rules.board_height());
        self.current_piece = draw_piece(&self.rules, &mut self.rng);
        self.next_piece = draw_piece(&self.rules, &mut self.rng);
        self.position = spawn_position(&self.rules, &self.current_piece);
        self.score = 0;
        self.cleared_lines = 0;
        self.level = 0;
        self.speed = self.rules.initial_speed();
        self.timer = 0;
        self.placed_pieces = 0;
        self.state = GameState::Running;
        self.check_spawn();
    }

    #[must_use]
    pub fn rules(&self) -> &Arc<GameRules> {
        &self.rules
    }

    /// Seed the game's random source was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Locked cells only, without the falling piece.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current_piece(&self) -> &Piece {
        &self.current_piece
    }

    #[must_use]
    pub fn next_piece(&self) -> &Piece {
        &self.next_piece
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Number of pieces locked so far.
    #[must_use]
    pub fn placed_pieces(&self) -> usize {
        self.placed_pieces
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.state.is_terminated()
    }

    /// Board with the falling piece drawn in. Does not modify the game.
    #[must_use]
    pub fn snapshot_with_active_piece(&self) -> Board {
        self.board
            .with_overlay(self.current_piece.current_state(), self.position)
    }

    /// Independent deep copy, including the random source.
    #[must_use]
    pub fn clone_for_simulation(&self) -> Self {
        self.clone()
    }

    /// Advances the game by one tick.
    ///
    /// Applies `command`, then advances the gravity timer and forces a `Down`
    /// once the timer reaches the current speed. Does nothing once terminated.
    /// Returns the locks that happened during this tick.
    pub fn tick(&mut self, command: Command) -> TickEvents {
        let mut events = TickEvents::new();
        if self.state.is_terminated() {
            return events;
        }

        events.extend(self.apply(command));
        self.timer += 1;
        if self.timer >= self.speed && self.state.is_running() {
            events.extend(self.apply(Command::Down));
        }
        events
    }

    /// Replays `moves` on a simulation copy until the current piece locks or
    /// the game ends.
    ///
    /// Missing moves are padded with `Down`; moves left over after the lock are
    /// dropped from [`TrialOutcome::moves`]. `self` is not modified.
    #[must_use]
    pub fn try_moves(&self, moves: &[Command]) -> TrialOutcome {
        let mut game = self.clone_for_simulation();
        let placed = game.placed_pieces;
        let mut pending = moves.iter().copied();
        let mut consumed = Vec::with_capacity(moves.len());
        while game.placed_pieces == placed && game.state.is_running() {
            let command = pending.next().unwrap_or(Command::Down);
            game.tick(command);
            consumed.push(command);
        }
        TrialOutcome {
            moves: consumed,
            game,
        }
    }

    fn apply(&mut self, command: Command) -> Option<LockEvent> {
        match command {
            Command::Nothing | Command::Store => None,
            Command::Left => {
                self.try_shift(self.position.left());
                None
            }
            Command::Right => {
                self.try_shift(self.position.right());
                None
            }
            Command::RotateLeft => {
                self.try_rotate(Rotation::Left);
                None
            }
            Command::RotateRight => {
                self.try_rotate(Rotation::Right);
                None
            }
            Command::Down => {
                self.timer = 0;
                let below = self.position.down();
                if self.fits(self.current_piece.current_state(), below) {
                    self.position = below;
                    None
                } else {
                    Some(self.lock_piece())
                }
            }
        }
    }

    fn fits(&self, shape: &Shape, position: Position) -> bool {
        !self.board.is_colliding(shape, position)
    }

    fn try_shift(&mut self, position: Position) {
        if self.fits(self.current_piece.current_state(), position) {
            self.position = position;
        }
    }

    fn try_rotate(&mut self, rotation: Rotation) {
        let rotated = self.current_piece.peek_rotation(rotation);
        let position = rotation_position(self.position, rotated, self.board.width());
        if self.fits(rotated, position) {
            self.current_piece.rotate(rotation);
            self.position = position;
        }
    }

    fn lock_piece(&mut self) -> LockEvent {
        let position = self.position;
        self.board
            .lock(self.current_piece.current_state(), position);
        self.placed_pieces += 1;

        let lines = self.board.clear_lines();
        self.cleared_lines += lines;
        let score_gained = self.rules.placement_scoring().score(position, self.level)
            + self
                .rules
                .line_scoring()
                .score(self.rules.line_score(), lines, self.level);
        self.score += score_gained;

        let level_up = self
            .rules
            .level_policy()
            .should_advance(self.level, self.cleared_lines);
        if level_up {
            self.speed = self.rules.speed_policy().next_speed(self.speed).max(1);
            self.level += 1;
        }

        let next = draw_piece(&self.rules, &mut self.rng);
        self.current_piece = std::mem::replace(&mut self.next_piece, next);
        self.position = spawn_position(&self.rules, &self.current_piece);
        let game_over = !self.check_spawn();

        LockEvent {
            position,
            cleared_lines: lines,
            score_gained,
            level_up,
            game_over,
        }
    }

    fn check_spawn(&mut self) -> bool {
        let fits = self.fits(self.current_piece.current_state(), self.position);
        if !fits {
            self.state = GameState::Terminated;
        }
        fits
    }
}

fn draw_piece(rules: &GameRules, rng: &mut Pcg32) -> Piece {
    let pieces = rules.pieces();
    pieces[rng.random_range(0..pieces.len())].reset_rotation()
}

fn spawn_position(rules: &GameRules, piece: &Piece) -> Position {
    let side = piece.current_state().side();
    let offset = (rules.board_width() - side) / 2;
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let x = 1 + offset as i32;
    Position::new(x, 0)
}

/// Pulls the reference column back so the rotated shape's rightmost cell stays
/// inside the playable columns and the reference is at least column 1.
///
/// This is a horizontal correction only, not a wall-kick search; the caller
/// still checks the corrected placement for collisions.
fn rotation_position(position: Position, rotated: &Shape, board_width: usize) -> Position {
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let (width, col_max) = (board_width as i32, rotated.bounding_box().col_max as i32);
    Position::new(position.x.max(1).min(width - col_max), position.y)
}

#[cfg(test)]
mod tests {
    use crate::{GameConfig, catalog};

    use super::*;

    fn rules_with(config: GameConfig) -> Arc<GameRules> {
        GameRules::new(config).unwrap()
    }

    fn single_piece_rules(name: char, width: usize, height: usize) -> Arc<GameRules> {
        let piece = catalog::classic_pieces()
            .into_iter()
            .find(|p| p.name() == name)
            .unwrap();
        rules_with(GameConfig {
            board_width: width,
            board_height: height,
            pieces: vec![piece],
            initial_speed: 1000,
            ..GameConfig::default()
        })
    }

    fn drop_piece(game: &mut Game) -> LockEvent {
        loop {
            if let Some(event) = game.tick(Command::Down).into_iter().next() {
                return event;
            }
        }
    }

    #[test]
    fn test_spawn_position_is_centered() {
        let game = Game::with_seed(single_piece_rules('O', 10, 20), 0);
        assert_eq!(game.position(), Position::new(5, 0));

        let game = Game::with_seed(single_piece_rules('I', 10, 20), 0);
        assert_eq!(game.position(), Position::new(4, 0));

        let game = Game::with_seed(single_piece_rules('T', 10, 20), 0);
        assert_eq!(game.position(), Position::new(4, 0));
    }

    #[test]
    fn test_shift_stops_at_walls() {
        let mut game = Game::with_seed(single_piece_rules('O', 4, 10), 0);
        assert_eq!(game.position().x, 2);
        for _ in 0..5 {
            game.tick(Command::Left);
        }
        assert_eq!(game.position().x, 1);
        for _ in 0..5 {
            game.tick(Command::Right);
        }
        assert_eq!(game.position().x, 3);
    }

    #[test]
    fn test_rotation_is_corrected_near_the_wall() {
        let mut game = Game::with_seed(single_piece_rules('I', 10, 20), 0);
        game.tick(Command::RotateRight);
        assert_eq!(game.current_piece().rotation_index(), 1);
        // vertical I occupies matrix column 2; slide it against the left wall
        for _ in 0..10 {
            game.tick(Command::Left);
        }
        assert_eq!(game.position().x, -1);

        // horizontal I needs the reference pulled back to column 1
        game.tick(Command::RotateLeft);
        assert_eq!(game.current_piece().rotation_index(), 0);
        assert_eq!(game.position().x, 1);
    }

    #[test]
    fn test_rotation_blocked_by_stack_is_not_committed() {
        let mut game = Game::with_seed(single_piece_rules('I', 4, 6), 0);
        game.tick(Command::RotateRight);
        // fill the lower rows except a 1-wide well on the right so a vertical
        // I has nowhere to become horizontal
        for row in 2..6 {
            let filler = Shape::new([[9, 9, 9], [0, 0, 0], [0, 0, 0]]);
            game.board.lock(&filler, Position::new(1, row));
        }
        for _ in 0..4 {
            game.tick(Command::Right);
        }
        let before = game.position();
        while game.position().y < 2 {
            game.tick(Command::Down);
        }
        game.tick(Command::RotateRight);
        assert_eq!(game.current_piece().rotation_index(), 1);
        assert_eq!(game.position().x, before.x);
    }

    #[test]
    fn test_lock_increases_occupied_cells_and_scores() {
        let mut game = Game::with_seed(single_piece_rules('O', 10, 20), 0);
        let event = drop_piece(&mut game);
        assert_eq!(event.position, Position::new(5, 18));
        assert_eq!(event.cleared_lines, 0);
        assert_eq!(event.score_gained, 36);
        assert!(!event.game_over);
        assert_eq!(game.board().occupied_count(), 4);
        assert_eq!(game.placed_pieces(), 1);
        assert_eq!(game.position(), Position::new(5, 0));
    }

    #[test]
    fn test_line_clear_through_play() {
        let mut game = Game::with_seed(single_piece_rules('O', 4, 6), 0);
        game.tick(Command::Left);
        drop_piece(&mut game);
        game.tick(Command::Right);
        let event = drop_piece(&mut game);

        assert_eq!(event.cleared_lines, 2);
        // placement (3 + 0 + 1)^2 plus 50 * 2^2 * 1
        assert_eq!(event.score_gained, 16 + 200);
        assert_eq!(game.cleared_lines(), 2);
        assert_eq!(game.board().occupied_count(), 0);
    }

    #[test]
    fn test_game_over_when_spawn_blocked() {
        let mut game = Game::with_seed(single_piece_rules('O', 3, 4), 0);
        let first = drop_piece(&mut game);
        assert!(!first.game_over);
        let second = drop_piece(&mut game);
        assert!(second.game_over);
        assert!(game.is_terminated());

        let board = game.board().clone();
        let score = game.score();
        assert!(game.tick(Command::Down).is_empty());
        assert_eq!(*game.board(), board);
        assert_eq!(game.score(), score);

        game.reset();
        assert!(game.state().is_running());
        assert_eq!(game.score(), 0);
        assert_eq!(game.board().occupied_count(), 0);
    }

    #[test]
    fn test_gravity_resets_with_manual_down() {
        let mut game = Game::with_seed(
            rules_with(GameConfig {
                initial_speed: 3,
                ..GameConfig::default()
            }),
            7,
        );
        game.tick(Command::Nothing);
        game.tick(Command::Nothing);
        assert_eq!(game.position().y, 0);
        game.tick(Command::Nothing);
        assert_eq!(game.position().y, 1);

        game.tick(Command::Nothing);
        game.tick(Command::Down);
        assert_eq!(game.position().y, 2);
        game.tick(Command::Nothing);
        assert_eq!(game.position().y, 2);
        game.tick(Command::Nothing);
        assert_eq!(game.position().y, 3);
    }

    #[test]
    fn test_same_seed_same_game() {
        let rules = rules_with(GameConfig::default());
        let mut a = Game::with_seed(Arc::clone(&rules), 1234);
        let mut b = Game::with_seed(rules, 1234);
        let commands = [
            Command::Left,
            Command::RotateRight,
            Command::Down,
            Command::Right,
            Command::Right,
            Command::Nothing,
            Command::RotateLeft,
        ];
        for command in commands.iter().cycle().take(2000) {
            a.tick(*command);
            b.tick(*command);
            assert_eq!(a.board(), b.board());
            assert_eq!(a.score(), b.score());
            assert_eq!(a.position(), b.position());
        }
        assert!(a.placed_pieces() > 0);
    }

    #[test]
    fn test_simulation_clone_is_independent() {
        let game = Game::with_seed(rules_with(GameConfig::default()), 99);
        let before = game.snapshot_with_active_piece();

        let outcome = game.try_moves(&[Command::Left, Command::Left]);
        assert_eq!(&outcome.moves[..2], [Command::Left, Command::Left]);
        assert!(outcome.moves[2..].iter().all(|c| *c == Command::Down));
        assert_eq!(outcome.game.placed_pieces(), 1);
        assert_eq!(outcome.game.current_piece(), game.next_piece());

        assert_eq!(game.placed_pieces(), 0);
        assert_eq!(game.snapshot_with_active_piece(), before);
    }

    #[test]
    fn test_try_moves_trims_after_lock() {
        let game = Game::with_seed(single_piece_rules('O', 10, 4), 3);
        let moves = vec![Command::Down; 10];
        let outcome = game.try_moves(&moves);
        // two steps down, then the third down locks
        assert_eq!(outcome.moves.len(), 3);
        assert_eq!(outcome.game.board().occupied_count(), 4);
    }

    #[test]
    fn test_snapshot_overlays_active_piece() {
        let game = Game::with_seed(single_piece_rules('O', 10, 20), 0);
        let snapshot = game.snapshot_with_active_piece();
        assert_eq!(snapshot.occupied_count(), 4);
        assert_eq!(snapshot.playable_cell(0, 4), 4);
        assert_eq!(game.board().occupied_count(), 0);
    }

    #[test]
    fn test_random_play_keeps_border_intact() {
        use crate::core::WALL;

        let assert_border = |board: &Board, tick: usize| {
            let rows = board.rows().collect::<Vec<_>>();
            let (bottom, playable) = rows.split_last().unwrap();
            assert!(bottom.iter().all(|&c| c == WALL), "bottom wall at tick {tick}");
            for (y, row) in playable.iter().enumerate() {
                assert_eq!(row[0], WALL, "left wall at row {y}, tick {tick}");
                assert_eq!(row[row.len() - 1], WALL, "right wall at row {y}, tick {tick}");
                assert!(
                    row[1..row.len() - 1].iter().all(|&c| c != WALL),
                    "wall inside row {y} at tick {tick}"
                );
            }
        };

        for (seed, board_width) in (0..30).zip([6, 7, 8, 9, 10].into_iter().cycle()) {
            let rules = rules_with(GameConfig {
                board_width,
                board_height: 12,
                initial_speed: 3,
                ..GameConfig::default()
            });
            let mut game = Game::with_seed(rules, seed);
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut tick = 0;
            while !game.is_terminated() {
                let command = Command::ALL[rng.random_range(0..Command::ALL.len())];
                game.tick(command);
                tick += 1;
                assert_border(game.board(), tick);
                assert!(tick < 100_000, "seed {seed} never terminated");
            }
            assert!(game.placed_pieces() > 0);
        }
    }
}
