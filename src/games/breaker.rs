//! Paddle-and-ball brick breaker.
//!
//! The ball reflects off walls, the paddle and bricks by mirroring its
//! velocity across the struck surface's normal, so speed is preserved and a
//! 45° approach leaves at 45°. A brick is removed and scored in the same step
//! as the hit that destroyed it. Clearing the wall wins; losing the ball
//! through the bottom edge ends the game.

use glam::Vec2;
use log::debug;

use crate::core::{reflect, Aabb, ArcadeError, BreakerConfig, Command, GameVariant, Result};
use crate::engine::{substeps, Advance, FrameState, GameEngine, GameOutcome};

const PADDLE_HEIGHT: f32 = 12.0;
const PADDLE_MARGIN: f32 = 30.0;
const BRICK_HEIGHT: f32 = 16.0;
const BRICK_GAP: f32 = 4.0;
const BRICK_TOP: f32 = 60.0;
const WALL_MARGIN: f32 = 10.0;

/// Seconds the ball rests on the paddle before serving itself.
const SERVE_DELAY: f32 = 0.5;

/// Points for a brick in the bottom row; each row above is worth this much more.
const ROW_POINTS: u64 = 10;

/// State machine states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Ball resting on the paddle.
    Serving,
    BallMoving,
    WallOrPaddleBounce,
    BrickHit,
    BrickRemoved,
    WinCheck,
    Win,
    GameOver,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::Serving => "serving",
            Phase::BallMoving => "ball-moving",
            Phase::WallOrPaddleBounce => "wall-or-paddle-bounce",
            Phase::BrickHit => "brick-hit",
            Phase::BrickRemoved => "brick-removed",
            Phase::WinCheck => "win-check",
            Phase::Win => "win",
            Phase::GameOver => "game-over",
        }
    }

    fn is_terminal(self) -> bool {
        matches!(self, Phase::Win | Phase::GameOver)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Work {
    Serve,
}

/// One brick in the wall.
#[derive(Clone, Debug, PartialEq)]
pub struct Brick {
    pub row: usize,
    pub col: usize,
    pub bounds: Aabb,
}

/// Brick-breaker engine.
pub struct Breaker {
    config: BreakerConfig,
    frame: FrameState<Work>,
    paddle: Aabb,
    paddle_dir: f32,
    ball: Vec2,
    velocity: Vec2,
    bricks: Vec<Brick>,
    phase: Phase,
    score: u64,
}

impl Breaker {
    /// Create an unstarted engine.
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            frame: FrameState::new(),
            paddle: Aabb::from_origin(Vec2::ZERO, Vec2::ZERO),
            paddle_dir: 0.0,
            ball: Vec2::ZERO,
            velocity: Vec2::ZERO,
            bricks: Vec::new(),
            phase: Phase::Serving,
            score: 0,
        }
    }

    #[must_use]
    pub fn current_phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn ball(&self) -> (Vec2, Vec2) {
        (self.ball, self.velocity)
    }

    #[must_use]
    pub fn paddle(&self) -> Aabb {
        self.paddle
    }

    #[must_use]
    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    fn ball_box(&self) -> Aabb {
        let r = self.config.ball_radius;
        Aabb::from_center(self.ball, Vec2::splat(r * 2.0))
    }

    fn build_wall(&mut self) {
        let cols = self.config.brick_cols;
        let usable = self.config.width - 2.0 * WALL_MARGIN - BRICK_GAP * (cols as f32 - 1.0);
        let width = usable / cols as f32;

        self.bricks.clear();
        for row in 0..self.config.brick_rows {
            for col in 0..cols {
                let origin = Vec2::new(
                    WALL_MARGIN + col as f32 * (width + BRICK_GAP),
                    BRICK_TOP + row as f32 * (BRICK_HEIGHT + BRICK_GAP),
                );
                self.bricks.push(Brick {
                    row,
                    col,
                    bounds: Aabb::from_origin(origin, Vec2::new(width, BRICK_HEIGHT)),
                });
            }
        }
    }

    fn rest_on_paddle(&mut self) {
        self.ball = Vec2::new(self.paddle.center().x, self.paddle.min.y - self.config.ball_radius);
    }

    fn serve(&mut self) {
        if self.phase != Phase::Serving {
            return;
        }
        self.velocity = Vec2::new(1.0, -1.0).normalize() * self.config.ball_speed;
        self.phase = Phase::BallMoving;
    }

    fn set_paddle_x(&mut self, center_x: f32) {
        let half = self.paddle.size().x * 0.5;
        let x = center_x.clamp(half, self.config.width - half);
        self.paddle = self.paddle.translated(Vec2::new(x - self.paddle.center().x, 0.0));
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Left => self.paddle_dir = -1.0,
            Command::Right => self.paddle_dir = 1.0,
            Command::StopHorizontal => self.paddle_dir = 0.0,
            Command::Aim { x } => self.set_paddle_x(x),
            Command::Fire | Command::Jump | Command::Drop => self.serve(),
            _ => {}
        }
    }

    /// Reflect off `normal` if the ball is moving into the surface.
    fn bounce(&mut self, normal: Vec2) -> bool {
        if self.velocity.dot(normal) < 0.0 {
            self.velocity = reflect(self.velocity, normal);
            true
        } else {
            false
        }
    }

    fn bounce_walls(&mut self) -> bool {
        let r = self.config.ball_radius;
        let mut hit = false;
        if self.ball.x - r < 0.0 {
            self.ball.x = r;
            hit |= self.bounce(Vec2::X);
        }
        if self.ball.x + r > self.config.width {
            self.ball.x = self.config.width - r;
            hit |= self.bounce(Vec2::NEG_X);
        }
        if self.ball.y - r < 0.0 {
            self.ball.y = r;
            hit |= self.bounce(Vec2::Y);
        }
        hit
    }

    fn bounce_paddle(&mut self) -> bool {
        if self.velocity.y <= 0.0 || !self.ball_box().overlaps(&self.paddle) {
            return false;
        }
        self.ball.y = self.paddle.min.y - self.config.ball_radius;
        self.bounce(Vec2::NEG_Y)
    }

    /// Hit at most one brick. Returns the points scored.
    fn hit_brick(&mut self) -> Option<u64> {
        let ball_box = self.ball_box();
        let index = self.bricks.iter().position(|b| b.bounds.overlaps(&ball_box))?;
        let brick = &self.bricks[index];
        let depth = brick.bounds.penetration(&ball_box)?;
        let center = brick.bounds.center();

        let normal = if depth.x < depth.y {
            Vec2::new((self.ball.x - center.x).signum(), 0.0)
        } else {
            Vec2::new(0.0, (self.ball.y - center.y).signum())
        };
        let points = ROW_POINTS * (self.config.brick_rows - brick.row) as u64;

        self.phase = Phase::BrickHit;
        self.bounce(normal);
        self.bricks.remove(index);
        self.score += points;
        self.phase = Phase::BrickRemoved;
        Some(points)
    }

    fn step(&mut self, dt: f32) -> Result<()> {
        for command in self.frame.take_commands() {
            self.apply(command);
        }

        let Some(Advance { dt, fired }) = self.frame.advance(dt) else {
            return Ok(());
        };
        for (_, work) in fired {
            if work == Work::Serve {
                self.serve();
            }
        }

        // one brick per frame, however many substeps it spans
        let mut brick_hit = false;
        for step in substeps(dt) {
            if self.paddle_dir != 0.0 {
                let x = self.paddle.center().x + self.paddle_dir * self.config.paddle_speed * step;
                self.set_paddle_x(x);
            }

            if self.phase == Phase::Serving {
                self.rest_on_paddle();
                continue;
            }

            self.phase = Phase::BallMoving;
            self.ball += self.velocity * step;
            if !self.ball.is_finite() {
                let reason = "ball position is not finite";
                return Err(ArcadeError::runtime(GameVariant::Breaker, reason));
            }

            if self.ball.y - self.config.ball_radius > self.config.height {
                debug!("breaker: ball lost at score {}", self.score);
                self.game_over();
                return Ok(());
            }

            if self.bounce_walls() | self.bounce_paddle() {
                self.phase = Phase::WallOrPaddleBounce;
            }

            if !brick_hit {
                if let Some(points) = self.hit_brick() {
                    brick_hit = true;
                    let left = self.bricks.len();
                    debug!("breaker: brick removed for {} points, {} left", points, left);
                    self.phase = Phase::WinCheck;
                    if self.bricks.is_empty() {
                        self.phase = Phase::Win;
                        self.frame.work.cancel_all();
                        return Ok(());
                    }
                }
            }

            self.phase = Phase::BallMoving;
        }
        Ok(())
    }

    fn game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.frame.work.cancel_all();
    }
}

impl GameEngine for Breaker {
    fn variant(&self) -> GameVariant {
        GameVariant::Breaker
    }

    fn start(&mut self) -> Result<()> {
        let BreakerConfig { brick_cols, brick_rows, width, paddle_width, .. } = self.config;
        if brick_cols == 0 || brick_rows == 0 || width <= paddle_width {
            return Err(ArcadeError::StartFailed {
                variant: GameVariant::Breaker,
                reason: "wall or play area is empty".to_string(),
            });
        }

        self.frame.begin();
        self.build_wall();
        let center = Vec2::new(self.config.width * 0.5, self.config.height - PADDLE_MARGIN);
        self.paddle = Aabb::from_center(center, Vec2::new(self.config.paddle_width, PADDLE_HEIGHT));
        self.paddle_dir = 0.0;
        self.velocity = Vec2::ZERO;
        self.rest_on_paddle();
        self.phase = Phase::Serving;
        self.score = 0;

        self.frame.work.schedule_after(SERVE_DELAY, Work::Serve);
        Ok(())
    }

    fn tick(&mut self, dt: f32) -> Result<()> {
        if self.phase.is_terminal() {
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
        self.bricks.clear();
        self.velocity = Vec2::ZERO;
        self.paddle_dir = 0.0;
    }

    fn phase(&self) -> &'static str {
        self.phase.name()
    }

    fn outcome(&self) -> Option<GameOutcome> {
        match self.phase {
            Phase::Win => Some(GameOutcome::Cleared),
            Phase::GameOver => Some(GameOutcome::GameOver),
            _ => None,
        }
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn elapsed(&self) -> f32 {
        self.frame.elapsed()
    }

    fn entity_count(&self) -> usize {
        self.bricks.len()
    }

    fn pending_work(&self) -> usize {
        self.frame.pending_work()
    }
}
