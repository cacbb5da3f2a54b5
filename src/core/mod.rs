//! Core types shared by the session layer and every game: variants,
//! commands, configuration, errors, geometry and RNG.
//!
//! Nothing here knows about a particular game's rules.

pub mod command;
pub mod config;
pub mod error;
pub mod geometry;
pub mod rng;
pub mod variant;

pub use command::Command;
pub use config::{
    ArcadeConfig, BoardStrategyConfig, BreakerConfig, DodgerConfig, FallingBlocksConfig,
    ShooterConfig,
};
pub use error::{ArcadeError, Result};
pub use geometry::{reflect, Aabb};
pub use rng::GameRng;
pub use variant::GameVariant;
