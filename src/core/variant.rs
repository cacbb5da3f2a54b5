//! The closed set of minigame kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ArcadeError;

/// Minigame kind. Immutable once chosen for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameVariant {
    /// Falling-block puzzle.
    FallingBlocks,
    /// Two-player N-in-a-row board game.
    BoardStrategy,
    /// Vertical shooter.
    Shooter,
    /// Endless runner jumping over obstacles.
    ObstacleDodger,
    /// Paddle-and-ball brick breaker.
    Breaker,
}

impl GameVariant {
    /// Every variant, in declaration order.
    pub const ALL: [GameVariant; 5] = [
        GameVariant::FallingBlocks,
        GameVariant::BoardStrategy,
        GameVariant::Shooter,
        GameVariant::ObstacleDodger,
        GameVariant::Breaker,
    ];

    /// Stable identifier used in routes and configuration.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            GameVariant::FallingBlocks => "falling-blocks",
            GameVariant::BoardStrategy => "board-strategy",
            GameVariant::Shooter => "shooter",
            GameVariant::ObstacleDodger => "obstacle-dodger",
            GameVariant::Breaker => "breaker",
        }
    }

    /// Parse an identifier, failing with [`ArcadeError::UnknownVariant`].
    pub fn from_id(id: &str) -> Result<Self, ArcadeError> {
        Self::ALL
            .into_iter()
            .find(|v| v.id() == id)
            .ok_or_else(|| ArcadeError::UnknownVariant(id.to_string()))
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for GameVariant {
    type Err = ArcadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s)
    }
}
