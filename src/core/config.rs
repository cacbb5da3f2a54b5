//! Engine configuration.
//!
//! `ArcadeConfig` carries one section per game plus the RNG seed. Every
//! section has sensible defaults, so hosts only override what they need:
//!
//! ```
//! use arcade_session::core::ArcadeConfig;
//!
//! let config = ArcadeConfig::default().with_seed(7);
//! assert_eq!(config.seed, 7);
//! assert_eq!(config.falling_blocks.width, 10);
//! ```

use serde::{Deserialize, Serialize};

/// Falling-block puzzle parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallingBlocksConfig {
    /// Board width in cells.
    pub width: usize,
    /// Board height in cells.
    pub height: usize,
    /// Seconds between gravity steps at level 1.
    pub gravity_interval: f32,
}

impl Default for FallingBlocksConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
            gravity_interval: 0.8,
        }
    }
}

/// Board-strategy (N-in-a-row) parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardStrategyConfig {
    /// Board edge length in cells.
    pub size: usize,
    /// Marks in a row needed to win.
    pub win_length: usize,
    /// Seconds a player has to move before the turn passes (None = unlimited).
    pub turn_time_limit: Option<f32>,
    /// Pixel size of one cell, used to map pointer clicks to cells.
    pub cell_pixels: f32,
}

impl Default for BoardStrategyConfig {
    fn default() -> Self {
        Self {
            size: 15,
            win_length: 5,
            turn_time_limit: None,
            cell_pixels: 32.0,
        }
    }
}

/// Shooter parameters. Distances in pixels, speeds in pixels per second.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterConfig {
    pub width: f32,
    pub height: f32,
    pub ship_speed: f32,
    pub bullet_speed: f32,
    pub enemy_speed: f32,
    /// Seconds between enemy spawns.
    pub spawn_interval: f32,
    /// Minimum seconds between two shots.
    pub fire_cooldown: f32,
    pub lives: u32,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 640.0,
            ship_speed: 300.0,
            bullet_speed: 600.0,
            enemy_speed: 120.0,
            spawn_interval: 1.2,
            fire_cooldown: 0.25,
            lives: 3,
        }
    }
}

/// Obstacle-dodger parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DodgerConfig {
    pub width: f32,
    /// Y coordinate of the ground line (screen space, y grows downward).
    pub ground_y: f32,
    pub gravity: f32,
    pub jump_speed: f32,
    /// Scroll speed at difficulty level 0.
    pub base_speed: f32,
    /// Scroll speed added per difficulty level.
    pub speed_per_level: f32,
    /// Delay before the next obstacle at level 0.
    pub base_spawn_delay: f32,
    /// Floor for the spawn delay.
    pub min_spawn_delay: f32,
    /// Seconds of survival per difficulty level.
    pub level_interval: f32,
    /// Score per difficulty level.
    pub score_per_level: u64,
}

impl Default for DodgerConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            ground_y: 300.0,
            gravity: 1800.0,
            jump_speed: 650.0,
            base_speed: 240.0,
            speed_per_level: 40.0,
            base_spawn_delay: 1.6,
            min_spawn_delay: 0.6,
            level_interval: 10.0,
            score_per_level: 500,
        }
    }
}

/// Brick-breaker parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakerConfig {
    pub width: f32,
    pub height: f32,
    pub brick_rows: usize,
    pub brick_cols: usize,
    pub paddle_width: f32,
    pub paddle_speed: f32,
    pub ball_speed: f32,
    pub ball_radius: f32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 640.0,
            brick_rows: 6,
            brick_cols: 10,
            paddle_width: 80.0,
            paddle_speed: 420.0,
            ball_speed: 360.0,
            ball_radius: 6.0,
        }
    }
}

/// Complete configuration handed to the game registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    /// Seed for every engine's RNG. Same seed, same game.
    pub seed: u64,
    pub falling_blocks: FallingBlocksConfig,
    pub board_strategy: BoardStrategyConfig,
    pub shooter: ShooterConfig,
    pub obstacle_dodger: DodgerConfig,
    pub breaker: BreakerConfig,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            falling_blocks: FallingBlocksConfig::default(),
            board_strategy: BoardStrategyConfig::default(),
            shooter: ShooterConfig::default(),
            obstacle_dodger: DodgerConfig::default(),
            breaker: BreakerConfig::default(),
        }
    }
}

impl ArcadeConfig {
    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the falling-blocks section.
    #[must_use]
    pub fn with_falling_blocks(mut self, section: FallingBlocksConfig) -> Self {
        self.falling_blocks = section;
        self
    }

    /// Replace the board-strategy section.
    #[must_use]
    pub fn with_board_strategy(mut self, section: BoardStrategyConfig) -> Self {
        self.board_strategy = section;
        self
    }

    /// Replace the shooter section.
    #[must_use]
    pub fn with_shooter(mut self, section: ShooterConfig) -> Self {
        self.shooter = section;
        self
    }

    /// Replace the obstacle-dodger section.
    #[must_use]
    pub fn with_obstacle_dodger(mut self, section: DodgerConfig) -> Self {
        self.obstacle_dodger = section;
        self
    }

    /// Replace the breaker section.
    #[must_use]
    pub fn with_breaker(mut self, section: BreakerConfig) -> Self {
        self.breaker = section;
        self
    }
}
