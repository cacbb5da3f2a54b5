//! Error types for session control and engine execution.

use thiserror::Error;

use super::variant::GameVariant;

/// Errors surfaced by the session controller, registry and engines.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArcadeError {
    /// `activate` was called while another session is still running.
    ///
    /// Callers must `deactivate()` first; this is an ordering bug, never retried.
    #[error("a {running} session is already running")]
    AlreadyActive {
        /// Variant of the session that is still live.
        running: GameVariant,
    },

    /// Identifier outside the closed variant set, or a variant with no factory.
    #[error("unknown game variant: {0}")]
    UnknownVariant(String),

    /// Internal rule violation detected during `tick`.
    #[error("{variant} engine fault: {reason}")]
    EngineRuntime {
        /// Engine that reached the invalid state.
        variant: GameVariant,
        /// Human-readable description of the violation.
        reason: String,
    },

    /// `start()` could not allocate the initial state.
    #[error("{variant} failed to start: {reason}")]
    StartFailed {
        /// Engine that refused to start.
        variant: GameVariant,
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl ArcadeError {
    /// Build an [`ArcadeError::EngineRuntime`].
    pub fn runtime(variant: GameVariant, reason: impl Into<String>) -> Self {
        Self::EngineRuntime {
            variant,
            reason: reason.into(),
        }
    }

    /// Whether this error is a caller ordering/configuration bug.
    #[must_use]
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, Self::AlreadyActive { .. } | Self::UnknownVariant(_))
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ArcadeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ArcadeError::AlreadyActive {
            running: GameVariant::Shooter,
        };
        assert_eq!(err.to_string(), "a shooter session is already running");

        let err = ArcadeError::runtime(GameVariant::Breaker, "ball escaped the grid");
        assert_eq!(err.to_string(), "breaker engine fault: ball escaped the grid");
    }

    #[test]
    fn test_programmer_errors() {
        assert!(ArcadeError::UnknownVariant("pong".into()).is_programmer_error());
        assert!(!ArcadeError::runtime(GameVariant::Shooter, "x").is_programmer_error());
    }
}
