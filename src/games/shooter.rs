//! Vertical shooter.
//!
//! Each tick runs the same fixed pipeline:
//! 1. Spawning: fired spawn timers add enemies at the top edge
//! 2. Moving: ship and every entity integrate their velocity
//! 3. CollisionCheck: bounding-box overlaps resolved in entity-creation order
//! 4. ScoreUpdate: points banked, dead entities dropped
//!
//! An enemy touching the ship ends the game. Enemies escaping through the
//! bottom cost a life; running out of lives also ends the game.

use glam::Vec2;
use log::debug;

use crate::core::{Aabb, ArcadeError, Command, GameRng, GameVariant, Result, ShooterConfig};
use crate::engine::{substeps, Advance, FrameState, GameEngine, GameOutcome};

const SHIP_SIZE: Vec2 = Vec2::new(32.0, 24.0);
const BULLET_SIZE: Vec2 = Vec2::new(4.0, 12.0);
const ENEMY_SIZE: Vec2 = Vec2::new(28.0, 24.0);

/// Distance from the bottom edge to the ship's center.
const SHIP_MARGIN: f32 = 40.0;

/// Points per destroyed enemy.
const ENEMY_POINTS: u64 = 100;

/// State machine states, in per-tick order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Spawning,
    Moving,
    CollisionCheck,
    ScoreUpdate,
    GameOver,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::Spawning => "spawning",
            Phase::Moving => "moving",
            Phase::CollisionCheck => "collision-check",
            Phase::ScoreUpdate => "score-update",
            Phase::GameOver => "game-over",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Work {
    SpawnEnemy,
    FireReady,
}

/// Kind of a non-ship entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Bullet,
    Enemy,
}

/// Moving sprite. `id` increases with creation order.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: u64,
    pub kind: EntityKind,
    pub bounds: Aabb,
    pub velocity: Vec2,
    pub alive: bool,
}

/// Shooter engine.
pub struct Shooter {
    config: ShooterConfig,
    seed: u64,
    rng: GameRng,
    frame: FrameState<Work>,
    ship: Aabb,
    ship_dir: f32,
    fire_ready: bool,
    entities: Vec<Entity>,
    next_id: u64,
    pending_points: u64,
    phase: Phase,
    score: u64,
    lives: u32,
}

impl Shooter {
    /// Create an unstarted engine.
    pub fn new(config: ShooterConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            rng: GameRng::new(seed),
            frame: FrameState::new(),
            ship: Aabb::from_center(Vec2::ZERO, SHIP_SIZE),
            ship_dir: 0.0,
            fire_ready: true,
            entities: Vec::new(),
            next_id: 0,
            pending_points: 0,
            phase: Phase::Spawning,
            score: 0,
            lives: 0,
        }
    }

    #[must_use]
    pub fn current_phase(&self) -> Phase {
        self.phase
    }

    /// Bullets and enemies in creation order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn ship(&self) -> Aabb {
        self.ship
    }

    #[must_use]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    fn spawn(&mut self, kind: EntityKind, bounds: Aabb, velocity: Vec2) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.push(Entity {
            id,
            kind,
            bounds,
            velocity,
            alive: true,
        });
        id
    }

    fn spawn_enemy(&mut self) {
        let x = self.rng.gen_range_f32(0.0..(self.config.width - ENEMY_SIZE.x).max(0.0));
        let bounds = Aabb::from_origin(Vec2::new(x, -ENEMY_SIZE.y), ENEMY_SIZE);
        self.spawn(EntityKind::Enemy, bounds, Vec2::new(0.0, self.config.enemy_speed));
    }

    fn fire(&mut self) {
        if !self.fire_ready {
            return;
        }
        let muzzle = Vec2::new(self.ship.center().x, self.ship.min.y - BULLET_SIZE.y * 0.5);
        let bounds = Aabb::from_center(muzzle, BULLET_SIZE);
        self.spawn(EntityKind::Bullet, bounds, Vec2::new(0.0, -self.config.bullet_speed));
        self.fire_ready = false;
        self.frame.work.schedule_after(self.config.fire_cooldown, Work::FireReady);
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Left => self.ship_dir = -1.0,
            Command::Right => self.ship_dir = 1.0,
            Command::StopHorizontal => self.ship_dir = 0.0,
            Command::Fire | Command::Jump => self.fire(),
            _ => {}
        }
    }

    fn move_entities(&mut self, dt: f32) {
        let dx = self.ship_dir * self.config.ship_speed * dt;
        let max_dx = self.config.width - self.ship.max.x;
        let min_dx = -self.ship.min.x;
        self.ship = self.ship.translated(Vec2::new(dx.clamp(min_dx, max_dx), 0.0));

        for entity in &mut self.entities {
            entity.bounds = entity.bounds.translated(entity.velocity * dt);
        }
    }

    /// Resolve overlaps. Returns true on a lethal hit.
    fn resolve_collisions(&mut self) -> bool {
        let count = self.entities.len();
        for i in 0..count {
            if self.entities[i].kind != EntityKind::Bullet || !self.entities[i].alive {
                continue;
            }
            for j in 0..count {
                let target = &self.entities[j];
                if target.kind != EntityKind::Enemy || !target.alive {
                    continue;
                }
                if self.entities[i].bounds.overlaps(&target.bounds) {
                    self.entities[i].alive = false;
                    self.entities[j].alive = false;
                    self.pending_points += ENEMY_POINTS;
                    break;
                }
            }
        }

        let height = self.config.height;
        let mut lethal = false;
        for entity in &mut self.entities {
            if !entity.alive {
                continue;
            }
            match entity.kind {
                EntityKind::Enemy if entity.bounds.overlaps(&self.ship) => {
                    lethal = true;
                }
                EntityKind::Enemy if entity.bounds.min.y > height => {
                    entity.alive = false;
                    self.lives = self.lives.saturating_sub(1);
                    debug!("shooter: enemy {} escaped, {} lives left", entity.id, self.lives);
                }
                EntityKind::Bullet if entity.bounds.max.y < 0.0 => {
                    entity.alive = false;
                }
                _ => {}
            }
        }
        lethal
    }

    fn step(&mut self, dt: f32) -> Result<()> {
        for command in self.frame.take_commands() {
            self.apply(command);
        }

        let Some(Advance { dt, fired }) = self.frame.advance(dt) else {
            return Ok(());
        };

        self.phase = Phase::Spawning;
        for (_, work) in fired {
            match work {
                Work::SpawnEnemy => self.spawn_enemy(),
                Work::FireReady => self.fire_ready = true,
            }
        }

        let mut lethal = false;
        for step in substeps(dt) {
            self.phase = Phase::Moving;
            self.move_entities(step);

            self.phase = Phase::CollisionCheck;
            lethal = self.resolve_collisions();
            if lethal {
                break;
            }
        }

        self.phase = Phase::ScoreUpdate;
        self.score += std::mem::take(&mut self.pending_points);
        self.entities.retain(|e| e.alive);

        if lethal || self.lives == 0 {
            debug!("shooter: game over at score {}", self.score);
            self.game_over();
        }

        if !self.ship.min.is_finite() {
            return Err(ArcadeError::runtime(GameVariant::Shooter, "ship position is not finite"));
        }
        Ok(())
    }

    fn game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.frame.work.cancel_all();
    }
}

impl GameEngine for Shooter {
    fn variant(&self) -> GameVariant {
        GameVariant::Shooter
    }

    fn start(&mut self) -> Result<()> {
        if self.config.width < SHIP_SIZE.x || self.config.height < SHIP_MARGIN * 2.0 {
            return Err(ArcadeError::StartFailed {
                variant: GameVariant::Shooter,
                reason: "play area smaller than the ship".to_string(),
            });
        }

        self.frame.begin();
        self.rng = GameRng::new(self.seed).for_context("shooter/spawn");
        let center = Vec2::new(self.config.width * 0.5, self.config.height - SHIP_MARGIN);
        self.ship = Aabb::from_center(center, SHIP_SIZE);
        self.ship_dir = 0.0;
        self.fire_ready = true;
        self.entities.clear();
        self.next_id = 0;
        self.pending_points = 0;
        self.phase = Phase::Spawning;
        self.score = 0;
        self.lives = self.config.lives.max(1);

        self.frame.work.schedule_every(self.config.spawn_interval, Work::SpawnEnemy);
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
        self.entities.clear();
        self.pending_points = 0;
        self.ship_dir = 0.0;
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
        self.entities.len()
    }

    fn pending_work(&self) -> usize {
        self.frame.pending_work()
    }
}
