// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The agent responsible for scene serialization.
//!
//! It holds the available [`SerializationStrategy`] lanes, picks one for a
//! given [`SerializationGoal`], frames payloads in a [`SceneFile`] and
//! drives the capture and spawner lanes around them.

mod config;

pub use config::*;

use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use strata_core::{
    asset::AssetSource,
    scene::{HeaderError, SceneFile, SerializationGoal},
};
use strata_data::{ecs::World, registry::CapabilityRegistry};
use strata_lanes::scene_lane::{
    BinarySerializationLane, DefinitionSerializationLane, DeserializationError, LoadReport,
    SaveReport, SceneCapture, SceneSpawner, SerializationError, SerializationStrategy,
};
use thiserror::Error;

/// An error that can occur within the [`SerializationAgent`].
#[derive(Debug, Error)]
pub enum AgentError {
    /// No registered strategy has this id.
    #[error("no serialization strategy '{0}' is registered")]
    StrategyNotFound(String),
    /// The scene file header is invalid or corrupted.
    #[error("invalid scene header: {0}")]
    InvalidHeader(#[from] HeaderError),
    /// The strategy failed to encode the scene.
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    /// The strategy failed to decode the payload.
    #[error(transparent)]
    Deserialization(#[from] DeserializationError),
}

/// Saves and loads worlds.
pub struct SerializationAgent<'a> {
    registry: &'a CapabilityRegistry,
    assets: &'a dyn AssetSource,
    strategies: HashMap<&'static str, Box<dyn SerializationStrategy>>,
    default_goal: SerializationGoal,
}

impl<'a> SerializationAgent<'a> {
    /// Creates an agent with the built-in strategies and default settings.
    pub fn new(registry: &'a CapabilityRegistry, assets: &'a dyn AssetSource) -> Self {
        Self::with_config(registry, assets, &SceneIoConfig::default())
    }

    /// Creates an agent with the built-in strategies configured by `config`.
    pub fn with_config(
        registry: &'a CapabilityRegistry,
        assets: &'a dyn AssetSource,
        config: &SceneIoConfig,
    ) -> Self {
        let mut agent = Self {
            registry,
            assets,
            strategies: HashMap::new(),
            default_goal: config.default_goal,
        };
        agent.register_strategy(Box::new(
            DefinitionSerializationLane::new()
                .with_indent(config.indent.as_str())
                .with_struct_names(config.struct_names),
        ));
        agent.register_strategy(Box::new(BinarySerializationLane::new()));
        agent
    }

    /// Adds a strategy, replacing any other with the same id.
    pub fn register_strategy(&mut self, strategy: Box<dyn SerializationStrategy>) {
        self.strategies.insert(strategy.get_strategy_id(), strategy);
    }

    /// The goal used by [`save`](Self::save).
    pub fn default_goal(&self) -> SerializationGoal {
        self.default_goal
    }

    /// The id of the strategy that serves `goal`.
    pub fn strategy_for(goal: SerializationGoal) -> &'static str {
        match goal {
            SerializationGoal::HumanReadableDebug | SerializationGoal::LongTermStability => {
                DefinitionSerializationLane::STRATEGY_ID
            }
            SerializationGoal::FastestLoad | SerializationGoal::SmallestFileSize => {
                BinarySerializationLane::STRATEGY_ID
            }
        }
    }

    fn strategy(&self, id: &str) -> Result<&dyn SerializationStrategy, AgentError> {
        self.strategies
            .get(id)
            .map(|strategy| &**strategy)
            .ok_or_else(|| AgentError::StrategyNotFound(id.to_owned()))
    }

    /// Captures `world` and encodes it with the strategy serving `goal`.
    pub fn save_world(
        &self,
        world: &World,
        goal: SerializationGoal,
    ) -> Result<(SceneFile, SaveReport), AgentError> {
        let strategy = self.strategy(Self::strategy_for(goal))?;
        let (definition, report) = SceneCapture::new(self.registry, self.assets).capture(world);
        let payload = strategy.encode(&definition)?;
        let file = SceneFile::new(strategy.get_strategy_id(), payload)?;
        log::info!(
            "Saved scene with '{}' for goal {} ({} bytes)",
            strategy.get_strategy_id(),
            goal,
            file.payload.len()
        );
        Ok((file, report))
    }

    /// Decodes `file` with the strategy named in its header and spawns it into `world`.
    ///
    /// Per-node and per-reference problems do not make this fail; they are
    /// listed in the returned report.
    pub fn load_world(
        &self,
        file: &SceneFile,
        world: &mut World,
    ) -> Result<LoadReport, AgentError> {
        let strategy = self.strategy(file.header.strategy_id_str()?)?;
        let definition = strategy.decode(&file.payload)?;
        Ok(SceneSpawner::new(self.registry, self.assets).spawn(&definition, world))
    }

    /// Saves `world` to `path` with the default goal.
    pub fn save(&self, path: impl AsRef<Path>, world: &World) -> anyhow::Result<SaveReport> {
        self.save_with_goal(path, world, self.default_goal)
    }

    /// Saves `world` to `path` with the strategy serving `goal`.
    pub fn save_with_goal(
        &self,
        path: impl AsRef<Path>,
        world: &World,
        goal: SerializationGoal,
    ) -> anyhow::Result<SaveReport> {
        let path = path.as_ref();
        let (file, report) = self
            .save_world(world, goal)
            .with_context(|| format!("Failed to save scene '{}'", path.display()))?;
        fs::write(path, file.to_bytes())
            .with_context(|| format!("Failed to write scene file '{}'", path.display()))?;
        Ok(report)
    }

    /// Loads the scene file at `path` into `world`.
    pub fn load(&self, path: impl AsRef<Path>, world: &mut World) -> anyhow::Result<LoadReport> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read scene file '{}'", path.display()))?;
        let file = SceneFile::from_bytes(&bytes)
            .map_err(AgentError::from)
            .with_context(|| format!("'{}' is not a scene file", path.display()))?;
        self.load_world(&file, world)
            .with_context(|| format!("Failed to load scene '{}'", path.display()))
    }
}
