//! Built-in minigames.
//!
//! Each game implements [`GameEngine`](crate::engine::GameEngine) with its own
//! state machine:
//! - `falling_blocks`: Spawning → Falling → Locking → LineClear
//! - `board_strategy`: WaitingForMove → MoveApplied → WinCheck
//! - `shooter`: Spawning → Moving → CollisionCheck → ScoreUpdate
//! - `obstacle_dodger`: Scrolling → ObstacleSpawn → CollisionCheck
//! - `breaker`: BallMoving → bounce / BrickHit → BrickRemoved → WinCheck

pub mod board_strategy;
pub mod breaker;
pub mod falling_blocks;
pub mod obstacle_dodger;
pub mod shooter;

pub use board_strategy::BoardStrategy;
pub use breaker::Breaker;
pub use falling_blocks::FallingBlocks;
pub use obstacle_dodger::ObstacleDodger;
pub use shooter::Shooter;
