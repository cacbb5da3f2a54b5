//! Falling-blocks engine.

use log::debug;
use smallvec::SmallVec;

use super::pieces::{Piece, PieceKind};
use crate::core::{ArcadeError, Command, FallingBlocksConfig, GameRng, GameVariant, Result};
use crate::engine::{Advance, FrameState, GameEngine, GameOutcome, WorkHandle};

/// Points for clearing 1, 2, 3 or 4 rows at once, before the level multiplier.
const LINE_SCORES: [u64; 4] = [100, 300, 500, 800];

/// Rows cleared per level.
const LINES_PER_LEVEL: u32 = 10;

/// Gravity speed-up per level.
const GRAVITY_DECAY: f32 = 0.85;

/// Fastest gravity interval in seconds.
const MIN_GRAVITY: f32 = 0.05;

/// Board cell: empty or the kind of piece that locked there.
pub type Cell = Option<PieceKind>;

/// State machine states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Spawning,
    Falling,
    Locking,
    LineClear,
    GameOver,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::Spawning => "spawning",
            Phase::Falling => "falling",
            Phase::Locking => "locking",
            Phase::LineClear => "line-clear",
            Phase::GameOver => "game-over",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Work {
    Spawn,
    Gravity,
    ClearLines,
}

/// Falling-block puzzle.
///
/// Row 0 is the top of the board. A piece that cannot move down on a gravity
/// step enters `Locking`; if it still cannot move on the next step it locks.
/// Hard drop locks immediately.
pub struct FallingBlocks {
    config: FallingBlocksConfig,
    seed: u64,
    rng: GameRng,
    frame: FrameState<Work>,
    grid: Vec<Vec<Cell>>,
    active: Option<Piece>,
    bag: Vec<PieceKind>,
    full_rows: SmallVec<[usize; 4]>,
    phase: Phase,
    score: u64,
    lines: u32,
    level: u32,
    gravity: Option<WorkHandle>,
}

impl FallingBlocks {
    /// Create an unstarted engine.
    pub fn new(config: FallingBlocksConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            rng: GameRng::new(seed),
            frame: FrameState::new(),
            grid: Vec::new(),
            active: None,
            bag: Vec::new(),
            full_rows: SmallVec::new(),
            phase: Phase::Spawning,
            score: 0,
            lines: 0,
            level: 1,
            gravity: None,
        }
    }

    /// Board rows, top first.
    #[must_use]
    pub fn grid(&self) -> &[Vec<Cell>] {
        &self.grid
    }

    /// Piece currently under player control.
    #[must_use]
    pub fn active_piece(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn current_phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn lines_cleared(&self) -> u32 {
        self.lines
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    fn gravity_interval(&self) -> f32 {
        let exp = self.level.saturating_sub(1) as i32;
        (self.config.gravity_interval * GRAVITY_DECAY.powi(exp)).max(MIN_GRAVITY)
    }

    fn collides(&self, piece: &Piece) -> bool {
        let height = self.grid.len() as i32;
        let width = self.config.width as i32;
        piece.cells().iter().any(|&(row, col)| {
            row < 0
                || col < 0
                || row >= height
                || col >= width
                || self.grid[row as usize][col as usize].is_some()
        })
    }

    fn try_move(&mut self, d_row: i32, d_col: i32) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        let moved = piece.shifted(d_row, d_col);
        if self.collides(&moved) {
            return false;
        }
        self.active = Some(moved);
        true
    }

    fn try_rotate(&mut self) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        let rotated = piece.rotated();
        if self.collides(&rotated) {
            return false;
        }
        self.active = Some(rotated);
        true
    }

    fn next_kind(&mut self) -> PieceKind {
        if self.bag.is_empty() {
            self.bag.extend_from_slice(&PieceKind::ALL);
            self.rng.shuffle(&mut self.bag);
        }
        self.bag.pop().unwrap_or(PieceKind::T)
    }

    fn spawn(&mut self) {
        let kind = self.next_kind();
        let col = (self.config.width as i32 - kind.box_size()) / 2;
        let piece = Piece::new(kind, 0, 0, col);

        if self.collides(&piece) {
            debug!("falling-blocks: spawn of {:?} collided, game over", kind);
            self.game_over();
            return;
        }
        self.active = Some(piece);
        self.phase = Phase::Falling;
    }

    fn lock_piece(&mut self) -> Result<()> {
        let piece = self.active.take().ok_or_else(|| {
            ArcadeError::runtime(GameVariant::FallingBlocks, "lock without an active piece")
        })?;

        let (height, width) = (self.grid.len(), self.config.width);
        for (row, col) in piece.cells() {
            if row < 0 || col < 0 || row as usize >= height || col as usize >= width {
                return Err(ArcadeError::runtime(
                    GameVariant::FallingBlocks,
                    format!("locked cell ({row}, {col}) outside the board"),
                ));
            }
            self.grid[row as usize][col as usize] = Some(piece.kind);
        }

        self.full_rows = self
            .grid
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().all(Option::is_some))
            .map(|(i, _)| i)
            .collect();

        if self.full_rows.is_empty() {
            self.phase = Phase::Spawning;
            self.frame.work.request_frame(Work::Spawn);
        } else {
            self.phase = Phase::LineClear;
            self.frame.work.request_frame(Work::ClearLines);
        }
        Ok(())
    }

    /// Remove every full row and compact the board in one step.
    fn clear_lines(&mut self) {
        let cleared = self.full_rows.len();
        if cleared > 0 {
            let width = self.config.width;
            let full = std::mem::take(&mut self.full_rows);
            let mut index = 0;
            self.grid.retain(|_| {
                let keep = !full.contains(&index);
                index += 1;
                keep
            });
            for _ in 0..cleared {
                self.grid.insert(0, vec![None; width]);
            }

            self.score += LINE_SCORES[cleared.min(4) - 1] * u64::from(self.level);
            self.lines += cleared as u32;

            let level = self.lines / LINES_PER_LEVEL + 1;
            if level != self.level {
                self.level = level;
                self.reschedule_gravity();
            }
            debug!("falling-blocks: cleared {} rows, level {}", cleared, self.level);
        }

        self.phase = Phase::Spawning;
        self.frame.work.request_frame(Work::Spawn);
    }

    fn reschedule_gravity(&mut self) {
        if let Some(handle) = self.gravity.take() {
            self.frame.work.cancel(handle);
        }
        let interval = self.gravity_interval();
        self.gravity = Some(self.frame.work.schedule_every(interval, Work::Gravity));
    }

    fn gravity_step(&mut self) -> Result<()> {
        match self.phase {
            Phase::Falling => {
                if !self.try_move(1, 0) {
                    self.phase = Phase::Locking;
                }
            }
            Phase::Locking => {
                if self.try_move(1, 0) {
                    self.phase = Phase::Falling;
                } else {
                    self.lock_piece()?;
                }
            }
            Phase::Spawning | Phase::LineClear | Phase::GameOver => {}
        }
        Ok(())
    }

    fn apply(&mut self, command: Command) -> Result<()> {
        if !matches!(self.phase, Phase::Falling | Phase::Locking) {
            return Ok(());
        }
        match command {
            Command::Left => {
                self.try_move(0, -1);
            }
            Command::Right => {
                self.try_move(0, 1);
            }
            Command::Rotate | Command::Up => {
                self.try_rotate();
            }
            Command::Down => {
                if self.try_move(1, 0) {
                    self.score += 1;
                }
            }
            Command::Drop => {
                let mut rows = 0u64;
                while self.try_move(1, 0) {
                    rows += 1;
                }
                self.score += 2 * rows;
                self.lock_piece()?;
            }
            _ => {}
        }
        Ok(())
    }

    fn step(&mut self, dt: f32) -> Result<()> {
        for command in self.frame.take_commands() {
            self.apply(command)?;
        }

        let Some(Advance { fired, .. }) = self.frame.advance(dt) else {
            return Ok(());
        };
        for (handle, work) in fired {
            match work {
                Work::Spawn if self.phase == Phase::Spawning => self.spawn(),
                // a level-up mid-batch replaces the timer; drop the old one's firings
                Work::Gravity if self.gravity == Some(handle) => self.gravity_step()?,
                Work::ClearLines if self.phase == Phase::LineClear => self.clear_lines(),
                _ => {}
            }
            if self.phase == Phase::GameOver {
                break;
            }
        }
        Ok(())
    }

    fn game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.active = None;
        self.gravity = None;
        self.frame.work.cancel_all();
    }
}

impl GameEngine for FallingBlocks {
    fn variant(&self) -> GameVariant {
        GameVariant::FallingBlocks
    }

    fn start(&mut self) -> Result<()> {
        if self.config.width < 4 || self.config.height < 4 {
            return Err(ArcadeError::StartFailed {
                variant: GameVariant::FallingBlocks,
                reason: format!("board {}x{} is too small", self.config.width, self.config.height),
            });
        }

        self.frame.begin();
        self.rng = GameRng::new(self.seed).for_context("falling-blocks/bag");
        self.grid = vec![vec![None; self.config.width]; self.config.height];
        self.active = None;
        self.bag.clear();
        self.full_rows.clear();
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.phase = Phase::Spawning;

        let interval = self.gravity_interval();
        self.gravity = Some(self.frame.work.schedule_every(interval, Work::Gravity));
        self.frame.work.request_frame(Work::Spawn);
        Ok(())
    }

    fn tick(&mut self, dt: f32) -> Result<()> {
        if self.phase == Phase::GameOver {
            return Ok(());
        }
        let result = self.step(dt);
        if result.is_err() {
            self.game_over();
        }
        result
    }

    fn handle_input(&mut self, command: Command) {
        self.frame.queue(command);
    }

    fn cleanup(&mut self) {
        self.frame.reset();
        self.grid.clear();
        self.bag.clear();
        self.full_rows.clear();
        self.active = None;
        self.gravity = None;
    }

    fn phase(&self) -> &'static str {
        self.phase.name()
    }

    fn outcome(&self) -> Option<GameOutcome> {
        (self.phase == Phase::GameOver).then_some(GameOutcome::GameOver)
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn elapsed(&self) -> f32 {
        self.frame.elapsed()
    }

    fn entity_count(&self) -> usize {
        let locked = self.grid.iter().flatten().filter(|c| c.is_some()).count();
        locked + if self.active.is_some() { 4 } else { 0 }
    }

    fn pending_work(&self) -> usize {
        self.frame.pending_work()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> FallingBlocks {
        let mut game = FallingBlocks::new(FallingBlocksConfig::default(), 7);
        game.start().unwrap();
        game
    }

    #[test]
    fn test_first_tick_spawns() {
        let mut game = started();
        assert_eq!(game.current_phase(), Phase::Spawning);
        assert!(game.active_piece().is_none());

        game.tick(0.0).unwrap();
        assert_eq!(game.current_phase(), Phase::Falling);
        assert_eq!(game.active_piece().unwrap().row, 0);
    }

    #[test]
    fn test_gravity_moves_piece_down() {
        let mut game = started();
        game.tick(0.0).unwrap();
        game.tick(0.8).unwrap();
        assert_eq!(game.active_piece().unwrap().row, 1);
    }

    #[test]
    fn test_filling_last_cell_clears_row_and_shifts_down() {
        let mut game = started();
        let bottom = game.grid.len() - 1;

        // Bottom row full except column 0, plus a marker one row above.
        for col in 1..10 {
            game.grid[bottom][col] = Some(PieceKind::O);
        }
        game.grid[bottom - 1][5] = Some(PieceKind::T);

        // Vertical I piece over column 0.
        game.active = Some(Piece::new(PieceKind::I, 1, 0, -2));
        game.phase = Phase::Falling;

        game.handle_input(Command::Drop);
        game.tick(0.0).unwrap();

        assert_eq!(game.lines_cleared(), 1);
        assert_eq!(game.current_phase(), Phase::Spawning);

        // Marker moved down by one into the bottom row.
        assert_eq!(game.grid[bottom][5], Some(PieceKind::T));
        assert_eq!(game.grid[bottom - 1][5], None);

        // Remaining three I cells shifted down too.
        assert_eq!(game.grid[bottom][0], Some(PieceKind::I));
        assert_eq!(game.grid[bottom - 1][0], Some(PieceKind::I));
        assert_eq!(game.grid[bottom - 2][0], Some(PieceKind::I));
        assert_eq!(game.grid[bottom - 3][0], None);

        // Rest of the old bottom row is gone.
        for col in (1..10).filter(|&c| c != 5) {
            assert_eq!(game.grid[bottom][col], None);
        }
        assert!(game.score() >= 100);
    }

    #[test]
    fn test_piece_locks_after_locking_step() {
        let mut game = started();
        let bottom = game.grid.len() as i32 - 1;
        game.active = Some(Piece::new(PieceKind::O, 0, bottom - 1, 4));
        game.phase = Phase::Falling;

        game.tick(0.8).unwrap();
        assert_eq!(game.current_phase(), Phase::Locking);

        game.tick(0.8).unwrap();
        assert!(game.active_piece().is_none() || game.active_piece().unwrap().row == 0);
        assert_eq!(game.grid[bottom as usize][4], Some(PieceKind::O));
    }

    #[test]
    fn test_spawn_collision_is_game_over() {
        let mut game = started();
        for row in 0..2 {
            for col in 2..8 {
                game.grid[row][col] = Some(PieceKind::Z);
            }
        }

        game.tick(0.0).unwrap();
        assert_eq!(game.current_phase(), Phase::GameOver);
        assert_eq!(game.outcome(), Some(GameOutcome::GameOver));
        assert_eq!(game.pending_work(), 0);

        // Terminal: further ticks change nothing.
        game.tick(5.0).unwrap();
        assert_eq!(game.current_phase(), Phase::GameOver);
    }

    #[test]
    fn test_walls_block_movement() {
        let mut game = started();
        game.tick(0.0).unwrap();
        for _ in 0..20 {
            game.handle_input(Command::Left);
        }
        game.tick(0.0).unwrap();
        let piece = *game.active_piece().unwrap();
        assert!(piece.cells().iter().all(|&(_, c)| c >= 0));
        assert!(piece.cells().iter().any(|&(_, c)| c == 0));
    }

    #[test]
    fn test_level_up_reschedules_gravity() {
        let mut game = started();
        game.lines = 9;
        game.full_rows.push(game.grid.len() - 1);
        game.phase = Phase::LineClear;
        let before = game.gravity;

        game.clear_lines();

        assert_eq!(game.level(), 2);
        assert_ne!(game.gravity, before);
        assert!(game.gravity_interval() < game.config.gravity_interval);
    }

    #[test]
    fn test_replaced_gravity_timer_is_ignored() {
        let mut game = started();
        game.tick(0.0).unwrap();
        let row = game.active_piece().unwrap().row;

        // the old timer stays queued but is no longer the game's gravity
        game.gravity = Some(game.frame.work.schedule_every(100.0, Work::Gravity));
        game.tick(0.8).unwrap();

        assert_eq!(game.active_piece().unwrap().row, row);
    }

    #[test]
    fn test_soft_and_hard_drop_scoring() {
        let mut game = started();
        game.tick(0.0).unwrap();

        game.handle_input(Command::Down);
        game.tick(0.0).unwrap();
        assert_eq!(game.score(), 1);

        let lowest = game.active_piece().unwrap().cells().iter().map(|&(r, _)| r).max().unwrap();
        let rows = (game.grid.len() as i32 - 1 - lowest) as u64;
        assert!(rows > 0);

        game.handle_input(Command::Drop);
        game.tick(0.0).unwrap();
        assert_eq!(game.score(), 1 + 2 * rows);
        assert_eq!(game.lines_cleared(), 0);
    }

    #[test]
    fn test_cleanup_before_start_is_safe() {
        let mut game = FallingBlocks::new(FallingBlocksConfig::default(), 1);
        game.cleanup();
        game.cleanup();
        assert_eq!(game.pending_work(), 0);
        assert_eq!(game.entity_count(), 0);
    }

    #[test]
    fn test_too_small_board_fails_to_start() {
        let config = FallingBlocksConfig {
            width: 2,
            ..FallingBlocksConfig::default()
        };
        let mut game = FallingBlocks::new(config, 1);
        assert!(matches!(game.start(), Err(ArcadeError::StartFailed { .. })));
    }
}
