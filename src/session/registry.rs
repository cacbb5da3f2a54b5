//! Game registry: variant identifiers to engine factories.
//!
//! The registry decouples "which game" from "how to build it". The session
//! controller asks for a fresh engine and input adapter on every activation
//! and never constructs engines itself.
//!
//! ## Example
//!
//! ```
//! use arcade_session::core::{ArcadeConfig, GameVariant};
//! use arcade_session::session::GameRegistry;
//!
//! let registry = GameRegistry::with_defaults(ArcadeConfig::default());
//! let (engine, adapter) = registry.create(GameVariant::Breaker).unwrap();
//! assert_eq!(engine.variant(), GameVariant::Breaker);
//! assert!(!adapter.is_attached());
//! ```

use rustc_hash::FxHashMap;

use crate::core::{ArcadeConfig, ArcadeError, GameVariant, Result};
use crate::engine::GameEngine;
use crate::games::{BoardStrategy, Breaker, FallingBlocks, ObstacleDodger, Shooter};
use crate::input::{Bindings, InputAdapter};

/// Fresh engine plus the adapter bound to it.
pub type EnginePair = (Box<dyn GameEngine>, InputAdapter);

/// Builds a fresh, unstarted engine and its adapter.
pub type EngineFactory = Box<dyn Fn(&ArcadeConfig) -> EnginePair>;

/// Registry of engine factories keyed by variant.
pub struct GameRegistry {
    config: ArcadeConfig,
    factories: FxHashMap<GameVariant, EngineFactory>,
}

impl GameRegistry {
    /// Registry with no factories.
    #[must_use]
    pub fn new(config: ArcadeConfig) -> Self {
        Self {
            config,
            factories: FxHashMap::default(),
        }
    }

    /// Registry with every built-in game registered.
    #[must_use]
    pub fn with_defaults(config: ArcadeConfig) -> Self {
        let mut registry = Self::new(config);
        for variant in GameVariant::ALL {
            registry.register(variant, move |config| built_in(variant, config));
        }
        registry
    }

    /// Register or replace the factory for `variant`.
    ///
    /// Returns true if a previous factory was replaced.
    pub fn register<F>(&mut self, variant: GameVariant, factory: F) -> bool
    where
        F: Fn(&ArcadeConfig) -> EnginePair + 'static,
    {
        self.factories.insert(variant, Box::new(factory)).is_some()
    }

    /// Build a fresh engine and adapter for `variant`.
    pub fn create(&self, variant: GameVariant) -> Result<EnginePair> {
        let factory = self
            .factories
            .get(&variant)
            .ok_or_else(|| ArcadeError::UnknownVariant(variant.id().to_string()))?;

        let (engine, adapter) = factory(&self.config);
        if engine.variant() != variant {
            return Err(ArcadeError::UnknownVariant(format!(
                "factory for {} built a {} engine",
                variant,
                engine.variant()
            )));
        }
        Ok((engine, adapter))
    }

    /// Build by string identifier.
    pub fn create_by_id(&self, id: &str) -> Result<EnginePair> {
        self.create(GameVariant::from_id(id)?)
    }

    /// Whether a factory is registered for `variant`.
    #[must_use]
    pub fn contains(&self, variant: GameVariant) -> bool {
        self.factories.contains_key(&variant)
    }

    /// Registered variants in declaration order.
    #[must_use]
    pub fn variants(&self) -> Vec<GameVariant> {
        GameVariant::ALL
            .into_iter()
            .filter(|v| self.factories.contains_key(v))
            .collect()
    }

    /// Configuration handed to every factory.
    #[must_use]
    pub fn config(&self) -> &ArcadeConfig {
        &self.config
    }
}

fn built_in(variant: GameVariant, config: &ArcadeConfig) -> EnginePair {
    let engine: Box<dyn GameEngine> = match variant {
        GameVariant::FallingBlocks => {
            Box::new(FallingBlocks::new(config.falling_blocks.clone(), config.seed))
        }
        GameVariant::BoardStrategy => Box::new(BoardStrategy::new(config.board_strategy.clone())),
        GameVariant::Shooter => Box::new(Shooter::new(config.shooter.clone(), config.seed)),
        GameVariant::ObstacleDodger => {
            Box::new(ObstacleDodger::new(config.obstacle_dodger.clone(), config.seed))
        }
        GameVariant::Breaker => Box::new(Breaker::new(config.breaker.clone())),
    };
    let adapter = InputAdapter::new(Bindings::for_variant(variant, config));
    (engine, adapter)
}
