//! Two-player N-in-a-row board game.
//!
//! Players alternate placing marks on a square board. After every placement
//! the engine scans outward from the placed cell along the four axes; a run of
//! `win_length` same-player marks wins. A full board without a run is a draw.
//!
//! Marks can be placed directly (`Command::Place`, pointer clicks) or by
//! moving a keyboard cursor and confirming with `Drop`/`Fire`. With a turn
//! time limit configured, an expired turn passes to the other player.

use log::debug;

use crate::core::{ArcadeError, BoardStrategyConfig, Command, GameVariant, Result};
use crate::engine::{Advance, FrameState, GameEngine, GameOutcome, WorkHandle};

/// Number of seats at the board.
pub const PLAYERS: u8 = 2;

/// Axes scanned for runs: horizontal, vertical, both diagonals.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// State machine states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    WaitingForMove(u8),
    MoveApplied,
    WinCheck,
    Win(u8),
    Draw,
    /// Ended by an internal fault.
    Aborted,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::WaitingForMove(_) => "waiting-for-move",
            Phase::MoveApplied => "move-applied",
            Phase::WinCheck => "win-check",
            Phase::Win(_) => "win",
            Phase::Draw => "draw",
            Phase::Aborted => "aborted",
        }
    }

    fn is_terminal(self) -> bool {
        matches!(self, Phase::Win(_) | Phase::Draw | Phase::Aborted)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Work {
    TurnTimeout,
}

/// N-in-a-row engine.
pub struct BoardStrategy {
    config: BoardStrategyConfig,
    frame: FrameState<Work>,
    /// Row-major cells; `Some(seat)` when marked.
    board: Vec<Option<u8>>,
    current: u8,
    cursor: (usize, usize),
    last_move: Option<(usize, usize)>,
    moves: usize,
    phase: Phase,
    turn_timer: Option<WorkHandle>,
}

impl BoardStrategy {
    /// Create an unstarted engine.
    pub fn new(config: BoardStrategyConfig) -> Self {
        Self {
            config,
            frame: FrameState::new(),
            board: Vec::new(),
            current: 0,
            cursor: (0, 0),
            last_move: None,
            moves: 0,
            phase: Phase::WaitingForMove(0),
            turn_timer: None,
        }
    }

    #[must_use]
    pub fn current_phase(&self) -> Phase {
        self.phase
    }

    /// Seat whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> u8 {
        self.current
    }

    /// Mark at (row, col), if any.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.config.size || col >= self.config.size {
            return None;
        }
        self.board.get(row * self.config.size + col).copied().flatten()
    }

    #[must_use]
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    #[must_use]
    pub fn moves_played(&self) -> usize {
        self.moves
    }

    fn restart_turn_timer(&mut self) {
        if let Some(handle) = self.turn_timer.take() {
            self.frame.work.cancel(handle);
        }
        if let Some(limit) = self.config.turn_time_limit {
            self.turn_timer = Some(self.frame.work.schedule_after(limit, Work::TurnTimeout));
        }
    }

    fn pass_turn(&mut self) {
        self.current = (self.current + 1) % PLAYERS;
        self.phase = Phase::WaitingForMove(self.current);
        self.restart_turn_timer();
    }

    fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let max = self.config.size.saturating_sub(1) as isize;
        let row = (self.cursor.0 as isize + d_row).clamp(0, max);
        let col = (self.cursor.1 as isize + d_col).clamp(0, max);
        self.cursor = (row as usize, col as usize);
    }

    /// Length of the same-seat run through `origin` along `axis`.
    fn run_length(&self, origin: (usize, usize), axis: (isize, isize), seat: u8) -> usize {
        let size = self.config.size as isize;
        let mut count = 1;
        for sign in [1isize, -1] {
            let (mut r, mut c) = (origin.0 as isize, origin.1 as isize);
            loop {
                r += axis.0 * sign;
                c += axis.1 * sign;
                if r < 0 || c < 0 || r >= size || c >= size {
                    break;
                }
                if self.board[(r * size + c) as usize] != Some(seat) {
                    break;
                }
                count += 1;
            }
        }
        count
    }

    fn check_win(&self) -> Result<bool> {
        let (row, col) = self
            .last_move
            .ok_or_else(|| ArcadeError::runtime(GameVariant::BoardStrategy, "win check, no move"))?;
        let seat = self.board.get(row * self.config.size + col).copied().flatten().ok_or_else(|| {
            let reason = format!("last move ({row}, {col}) is empty");
            ArcadeError::runtime(GameVariant::BoardStrategy, reason)
        })?;
        Ok(AXES
            .iter()
            .any(|&axis| self.run_length((row, col), axis, seat) >= self.config.win_length))
    }

    fn place(&mut self, row: usize, col: usize) -> Result<()> {
        if !matches!(self.phase, Phase::WaitingForMove(_)) {
            return Ok(());
        }
        if row >= self.config.size || col >= self.config.size {
            debug!("board-strategy: ignoring out-of-range placement ({}, {})", row, col);
            return Ok(());
        }
        let index = row * self.config.size + col;
        let Some(cell) = self.board.get(index) else {
            return Err(ArcadeError::runtime(
                GameVariant::BoardStrategy,
                format!("placement ({row}, {col}) on an unallocated board"),
            ));
        };
        if cell.is_some() {
            debug!("board-strategy: ignoring placement on occupied ({}, {})", row, col);
            return Ok(());
        }

        self.board[index] = Some(self.current);
        self.last_move = Some((row, col));
        self.cursor = (row, col);
        self.moves += 1;
        self.phase = Phase::MoveApplied;

        self.phase = Phase::WinCheck;
        if self.check_win()? {
            debug!("board-strategy: seat {} wins on move {}", self.current, self.moves);
            self.phase = Phase::Win(self.current);
            self.finish();
        } else if self.moves == self.board.len() {
            self.phase = Phase::Draw;
            self.finish();
        } else {
            self.pass_turn();
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.turn_timer = None;
        self.frame.work.cancel_all();
    }

    fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Place { row, col } => self.place(row, col)?,
            Command::Drop | Command::Fire => {
                let (row, col) = self.cursor;
                self.place(row, col)?;
            }
            Command::Left => self.move_cursor(0, -1),
            Command::Right => self.move_cursor(0, 1),
            Command::Up => self.move_cursor(-1, 0),
            Command::Down => self.move_cursor(1, 0),
            _ => {}
        }
        Ok(())
    }

    fn step(&mut self, dt: f32) -> Result<()> {
        for command in self.frame.take_commands() {
            self.apply(command)?;
            if self.phase.is_terminal() {
                return Ok(());
            }
        }

        let Some(Advance { fired, .. }) = self.frame.advance(dt) else {
            return Ok(());
        };
        for (handle, work) in fired {
            if work == Work::TurnTimeout && self.turn_timer == Some(handle) {
                debug!("board-strategy: seat {} ran out of time", self.current);
                self.turn_timer = None;
                self.pass_turn();
            }
        }
        Ok(())
    }
}

impl GameEngine for BoardStrategy {
    fn variant(&self) -> GameVariant {
        GameVariant::BoardStrategy
    }

    fn start(&mut self) -> Result<()> {
        let BoardStrategyConfig { size, win_length, .. } = self.config;
        if size == 0 || win_length < 2 || win_length > size {
            return Err(ArcadeError::StartFailed {
                variant: GameVariant::BoardStrategy,
                reason: format!("cannot play {win_length} in a row on a {size}x{size} board"),
            });
        }

        self.frame.begin();
        self.board = vec![None; size * size];
        self.current = 0;
        self.cursor = (size / 2, size / 2);
        self.last_move = None;
        self.moves = 0;
        self.phase = Phase::WaitingForMove(0);
        self.turn_timer = None;
        self.restart_turn_timer();
        Ok(())
    }

    fn tick(&mut self, dt: f32) -> Result<()> {
        if self.phase.is_terminal() || !self.frame.is_started() {
            return Ok(());
        }
        let result = self.step(dt);
        if result.is_err() {
            self.phase = Phase::Aborted;
            self.finish();
        }
        result
    }

    fn handle_input(&mut self, command: Command) {
        self.frame.queue(command);
    }

    fn cleanup(&mut self) {
        self.frame.reset();
        self.board.clear();
        self.last_move = None;
        self.turn_timer = None;
    }

    fn phase(&self) -> &'static str {
        self.phase.name()
    }

    fn outcome(&self) -> Option<GameOutcome> {
        match self.phase {
            Phase::Win(seat) => Some(GameOutcome::Winner(seat)),
            Phase::Draw => Some(GameOutcome::Draw),
            Phase::Aborted => Some(GameOutcome::GameOver),
            _ => None,
        }
    }

    fn score(&self) -> u64 {
        self.moves as u64
    }

    fn elapsed(&self) -> f32 {
        self.frame.elapsed()
    }

    fn entity_count(&self) -> usize {
        self.board.iter().filter(|c| c.is_some()).count()
    }

    fn pending_work(&self) -> usize {
        self.frame.pending_work()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(config: BoardStrategyConfig) -> BoardStrategy {
        let mut game = BoardStrategy::new(config);
        game.start().unwrap();
        game
    }

    fn play(game: &mut BoardStrategy, row: usize, col: usize) {
        game.handle_input(Command::Place { row, col });
        game.tick(0.016).unwrap();
    }

    #[test]
    fn test_five_in_a_row_wins_on_fifth_mark() {
        let mut game = started(BoardStrategyConfig::default());

        for i in 0..4 {
            play(&mut game, 7, 3 + i);
            assert_eq!(game.current_phase(), Phase::WaitingForMove(1));
            play(&mut game, 0, i);
            assert_eq!(game.current_phase(), Phase::WaitingForMove(0));
        }
        assert_eq!(game.outcome(), None);

        play(&mut game, 7, 7);
        assert_eq!(game.current_phase(), Phase::Win(0));
        assert_eq!(game.outcome(), Some(GameOutcome::Winner(0)));
    }

    #[test]
    fn test_diagonal_win_found_from_middle_placement() {
        let mut game = started(BoardStrategyConfig::default());
        // Seat 0 fills a diagonal leaving the middle for last.
        let diagonal = [(2, 2), (3, 3), (5, 5), (6, 6), (4, 4)];
        for (i, &(r, c)) in diagonal.iter().enumerate() {
            play(&mut game, r, c);
            if i < 4 {
                play(&mut game, 14, i);
            }
        }
        assert_eq!(game.current_phase(), Phase::Win(0));
    }

    #[test]
    fn test_full_board_is_draw() {
        let mut game = started(BoardStrategyConfig {
            size: 3,
            win_length: 3,
            ..BoardStrategyConfig::default()
        });
        let moves = [(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (2, 0), (1, 2), (2, 2), (2, 1)];
        for (r, c) in moves {
            play(&mut game, r, c);
        }
        assert_eq!(game.current_phase(), Phase::Draw);
        assert_eq!(game.entity_count(), 9);
    }

    #[test]
    fn test_occupied_cell_is_ignored() {
        let mut game = started(BoardStrategyConfig::default());
        play(&mut game, 1, 1);
        play(&mut game, 1, 1);
        assert_eq!(game.moves_played(), 1);
        assert_eq!(game.current_player(), 1);
        assert_eq!(game.cell(1, 1), Some(0));
    }

    #[test]
    fn test_cursor_placement() {
        let mut game = started(BoardStrategyConfig::default());
        game.handle_input(Command::Up);
        game.handle_input(Command::Left);
        game.handle_input(Command::Drop);
        game.tick(0.0).unwrap();
        assert_eq!(game.cell(6, 6), Some(0));
    }

    #[test]
    fn test_turn_timeout_passes_turn() {
        let mut game = started(BoardStrategyConfig {
            turn_time_limit: Some(1.0),
            ..BoardStrategyConfig::default()
        });
        assert_eq!(game.pending_work(), 1);

        game.tick(0.5).unwrap();
        assert_eq!(game.current_player(), 0);
        game.tick(0.6).unwrap();
        assert_eq!(game.current_player(), 1);
        assert_eq!(game.pending_work(), 1);
    }

    #[test]
    fn test_invalid_config_fails_to_start() {
        let mut game = BoardStrategy::new(BoardStrategyConfig {
            size: 3,
            win_length: 5,
            ..BoardStrategyConfig::default()
        });
        assert!(game.start().is_err());
    }

    #[test]
    fn test_cleanup_releases_board() {
        let mut game = started(BoardStrategyConfig {
            turn_time_limit: Some(3.0),
            ..BoardStrategyConfig::default()
        });
        play(&mut game, 0, 0);
        game.cleanup();
        assert_eq!(game.pending_work(), 0);
        assert_eq!(game.entity_count(), 0);
        game.cleanup();
    }

    #[test]
    fn test_input_before_start_is_ignored() {
        let mut game = BoardStrategy::new(BoardStrategyConfig::default());
        game.handle_input(Command::Place { row: 0, col: 0 });
        assert!(game.tick(0.016).is_ok());
        assert_eq!(game.moves_played(), 0);
        assert_eq!(game.outcome(), None);
    }

    #[test]
    fn test_input_after_cleanup_is_ignored() {
        let mut game = started(BoardStrategyConfig::default());
        game.cleanup();
        game.handle_input(Command::Drop);
        assert!(game.tick(0.016).is_ok());
        assert_eq!(game.entity_count(), 0);
    }
}
