//! Endless runner: jump over obstacles scrolling in from the right.
//!
//! Difficulty is a level derived from survival time and score. The level is
//! only ever raised, so scroll speed never drops and the spawn delay never
//! grows during a run.

use glam::Vec2;
use log::debug;

use crate::core::{Aabb, ArcadeError, Command, DodgerConfig, GameRng, GameVariant, Result};
use crate::engine::{Advance, FrameState, GameEngine, GameOutcome};

const RUNNER_SIZE: Vec2 = Vec2::new(24.0, 40.0);
const RUNNER_X: f32 = 80.0;

/// Candidate obstacle heights.
const OBSTACLE_HEIGHTS: [f32; 3] = [30.0, 45.0, 60.0];

/// Spawn delay multiplier per difficulty level.
const SPAWN_DECAY: f32 = 0.9;

/// Distance units per point.
const DISTANCE_PER_POINT: f32 = 10.0;

/// State machine states, in per-tick order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Scrolling,
    ObstacleSpawn,
    CollisionCheck,
    GameOver,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::Scrolling => "scrolling",
            Phase::ObstacleSpawn => "obstacle-spawn",
            Phase::CollisionCheck => "collision-check",
            Phase::GameOver => "game-over",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Work {
    SpawnObstacle,
}

/// Obstacle standing on the ground line.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub id: u64,
    pub bounds: Aabb,
}

/// Obstacle-dodger engine.
pub struct ObstacleDodger {
    config: DodgerConfig,
    seed: u64,
    rng: GameRng,
    frame: FrameState<Work>,
    runner: Aabb,
    runner_vy: f32,
    on_ground: bool,
    obstacles: Vec<Obstacle>,
    next_id: u64,
    distance: f32,
    score: u64,
    level: u32,
    phase: Phase,
}

impl ObstacleDodger {
    /// Create an unstarted engine.
    pub fn new(config: DodgerConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            rng: GameRng::new(seed),
            frame: FrameState::new(),
            runner: Aabb::from_origin(Vec2::ZERO, RUNNER_SIZE),
            runner_vy: 0.0,
            on_ground: true,
            obstacles: Vec::new(),
            next_id: 0,
            distance: 0.0,
            score: 0,
            level: 0,
            phase: Phase::Scrolling,
        }
    }

    #[must_use]
    pub fn current_phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn runner(&self) -> Aabb {
        self.runner
    }

    #[must_use]
    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Current difficulty level; never decreases within a run.
    #[must_use]
    pub fn difficulty_level(&self) -> u32 {
        self.level
    }

    /// Scroll speed at the current level.
    #[must_use]
    pub fn scroll_speed(&self) -> f32 {
        self.config.base_speed + self.config.speed_per_level * self.level as f32
    }

    /// Base delay before the next obstacle at the current level.
    #[must_use]
    pub fn spawn_delay(&self) -> f32 {
        let delay = self.config.base_spawn_delay * SPAWN_DECAY.powi(self.level as i32);
        delay.max(self.config.min_spawn_delay)
    }

    fn ground_origin(&self) -> Vec2 {
        Vec2::new(RUNNER_X, self.config.ground_y - RUNNER_SIZE.y)
    }

    fn raise_difficulty(&mut self) {
        let by_time = (self.frame.elapsed() / self.config.level_interval.max(f32::EPSILON)) as u32;
        let by_score = (self.score / self.config.score_per_level.max(1)) as u32;
        let target = by_time.max(by_score);
        if target > self.level {
            debug!("obstacle-dodger: difficulty {} -> {}", self.level, target);
            self.level = target;
        }
    }

    fn schedule_next_spawn(&mut self) {
        let jitter = self.rng.gen_range_f32(0.8..1.2);
        let delay = (self.spawn_delay() * jitter).max(self.config.min_spawn_delay);
        self.frame.work.schedule_after(delay, Work::SpawnObstacle);
    }

    fn spawn_obstacle(&mut self) {
        let height = self.rng.choose(&OBSTACLE_HEIGHTS).copied().unwrap_or(OBSTACLE_HEIGHTS[0]);
        let width = self.rng.gen_range_f32(20.0..40.0);
        let origin = Vec2::new(self.config.width, self.config.ground_y - height);
        self.obstacles.push(Obstacle {
            id: self.next_id,
            bounds: Aabb::from_origin(origin, Vec2::new(width, height)),
        });
        self.next_id += 1;
        self.schedule_next_spawn();
    }

    fn scroll(&mut self, dt: f32) {
        if !self.on_ground {
            self.runner_vy += self.config.gravity * dt;
            self.runner = self.runner.translated(Vec2::new(0.0, self.runner_vy * dt));
            if self.runner.max.y >= self.config.ground_y {
                self.runner = Aabb::from_origin(self.ground_origin(), RUNNER_SIZE);
                self.runner_vy = 0.0;
                self.on_ground = true;
            }
        }

        let shift = self.scroll_speed() * dt;
        for obstacle in &mut self.obstacles {
            obstacle.bounds = obstacle.bounds.translated(Vec2::new(-shift, 0.0));
        }
        self.obstacles.retain(|o| o.bounds.max.x >= 0.0);

        self.distance += shift;
        self.score = (self.distance / DISTANCE_PER_POINT) as u64;
        self.raise_difficulty();
    }

    fn step(&mut self, dt: f32) -> Result<()> {
        for command in self.frame.take_commands() {
            if matches!(command, Command::Jump | Command::Up | Command::Fire) && self.on_ground {
                self.runner_vy = -self.config.jump_speed;
                self.on_ground = false;
            }
        }

        let Some(Advance { dt, fired }) = self.frame.advance(dt) else {
            return Ok(());
        };

        self.phase = Phase::Scrolling;
        self.scroll(dt);

        self.phase = Phase::ObstacleSpawn;
        for (_, work) in fired {
            if work == Work::SpawnObstacle {
                self.spawn_obstacle();
            }
        }

        self.phase = Phase::CollisionCheck;
        if self.obstacles.iter().any(|o| o.bounds.overlaps(&self.runner)) {
            debug!("obstacle-dodger: collision at score {}", self.score);
            self.game_over();
            return Ok(());
        }
        if self.runner.min.y > self.config.ground_y {
            return Err(ArcadeError::runtime(
                GameVariant::ObstacleDodger,
                "runner fell through the ground",
            ));
        }

        self.phase = Phase::Scrolling;
        Ok(())
    }

    fn game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.frame.work.cancel_all();
    }
}

impl GameEngine for ObstacleDodger {
    fn variant(&self) -> GameVariant {
        GameVariant::ObstacleDodger
    }

    fn start(&mut self) -> Result<()> {
        if self.config.ground_y < RUNNER_SIZE.y || self.config.width <= RUNNER_X + RUNNER_SIZE.x {
            return Err(ArcadeError::StartFailed {
                variant: GameVariant::ObstacleDodger,
                reason: "play area smaller than the runner".to_string(),
            });
        }

        self.frame.begin();
        self.rng = GameRng::new(self.seed).for_context("obstacle-dodger/spawn");
        self.runner = Aabb::from_origin(self.ground_origin(), RUNNER_SIZE);
        self.runner_vy = 0.0;
        self.on_ground = true;
        self.obstacles.clear();
        self.next_id = 0;
        self.distance = 0.0;
        self.score = 0;
        self.level = 0;
        self.phase = Phase::Scrolling;

        self.frame
            .work
            .schedule_after(self.config.base_spawn_delay, Work::SpawnObstacle);
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
        self.obstacles.clear();
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
        self.obstacles.len()
    }

    fn pending_work(&self) -> usize {
        self.frame.pending_work()
    }
}
