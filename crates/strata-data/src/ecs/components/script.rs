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

use strata_core::{asset::AssetHandle, scene::NodeError, DefinitionNode, EntityId};
use strata_macros::Component;

use crate::{
    assets::ScriptAsset,
    registry::{Persist, PersistContext, RestoreContext, TypeDescriptor},
};

/// Binds a script to an entity, optionally aimed at another entity.
///
/// Scripting bookkeeping: persisted, but registered without an editor.
#[derive(Debug, Clone, PartialEq, Component)]
pub struct ScriptBinding {
    /// The script source.
    pub script: Option<AssetHandle<ScriptAsset>>,
    /// The entity the script acts on, if not its own.
    pub target: Option<EntityId>,
    /// Disabled bindings are kept but not run.
    pub enabled: bool,
}

impl Default for ScriptBinding {
    fn default() -> Self {
        Self {
            script: None,
            target: None,
            enabled: true,
        }
    }
}

impl ScriptBinding {
    /// The registry key of the type.
    pub const KEY: &'static str = "ScriptBinding";

    /// The registry description of `ScriptBinding`.
    pub fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<ScriptBinding>(Self::KEY)
            .display_name("Script")
            .constructible()
            .serializable()
            .entity_component()
            .build()
    }
}

impl Persist for ScriptBinding {
    fn persist(&self, node: &mut DefinitionNode, ctx: &mut PersistContext<'_>) {
        if let Some(script) = &self.script {
            ctx.write_asset(node, "script", script);
        }
        if let Some(target) = self.target {
            ctx.write_entity(node, "target", target);
        }
        node.set("enabled", self.enabled);
    }

    fn restore(node: &DefinitionNode, ctx: &mut RestoreContext) -> Result<Self, NodeError> {
        ctx.read_asset::<ScriptBinding, ScriptAsset>(node, "script", |binding, script| {
            binding.script = Some(script)
        })?;
        ctx.read_entity::<ScriptBinding>(node, "target", |binding, target| {
            binding.target = Some(target)
        })?;
        Ok(Self {
            enabled: node.bool_or("enabled", true)?,
            ..Self::default()
        })
    }
}
