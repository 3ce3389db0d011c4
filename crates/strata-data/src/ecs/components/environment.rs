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

//! Scene-wide components, attached to the scene container.

use std::any::Any;

use strata_core::{
    asset::AssetHandle,
    editor::{EditContext, ObjectEditor},
    scene::NodeError,
    DefinitionNode,
};
use strata_macros::Component;

use crate::{
    assets::Cubemap,
    registry::{Persist, PersistContext, RestoreContext, TypeDescriptor},
};

/// Ambient lighting and sky.
#[derive(Debug, Clone, PartialEq, Component)]
pub struct Environment {
    /// Linear RGB ambient color.
    pub ambient_color: [f32; 3],
    /// Ambient intensity multiplier.
    pub ambient_intensity: f32,
    /// The sky cubemap, or a flat clear color when `None`.
    pub skybox: Option<AssetHandle<Cubemap>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            ambient_color: [0.2; 3],
            ambient_intensity: 1.0,
            skybox: None,
        }
    }
}

impl Environment {
    /// The registry key of the type.
    pub const KEY: &'static str = "Environment";

    /// The registry description of `Environment`.
    pub fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Environment>(Self::KEY)
            .constructible()
            .serializable()
            .scene_component()
            .editor::<EnvironmentEditor>()
            .build()
    }
}

impl Persist for Environment {
    fn persist(&self, node: &mut DefinitionNode, ctx: &mut PersistContext<'_>) {
        node.set("ambient_color", self.ambient_color);
        node.set("ambient_intensity", self.ambient_intensity);
        if let Some(skybox) = &self.skybox {
            ctx.write_asset(node, "skybox", skybox);
        }
    }

    fn restore(node: &DefinitionNode, ctx: &mut RestoreContext) -> Result<Self, NodeError> {
        ctx.read_asset::<Environment, Cubemap>(node, "skybox", |env, skybox| {
            env.skybox = Some(skybox)
        })?;
        Ok(Self {
            ambient_color: node.floats_or("ambient_color", [0.2; 3])?,
            ambient_intensity: node.f32_or("ambient_intensity", 1.0)?,
            skybox: None,
        })
    }
}

/// Edits an [`Environment`].
#[derive(Debug, Default)]
pub struct EnvironmentEditor;

impl ObjectEditor for EnvironmentEditor {
    fn render(&self, ctx: &mut EditContext<'_>, value: &mut dyn Any) -> bool {
        let Some(env) = value.downcast_mut::<Environment>() else {
            return false;
        };
        let ui = ctx.ui();
        let mut changed = ui.edit_vec3("ambient_color", &mut env.ambient_color);
        changed |= ui.edit_f32("ambient_intensity", &mut env.ambient_intensity);
        match &env.skybox {
            Some(skybox) => ui.label("skybox", &format!("{}px cubemap", skybox.resolution)),
            None => ui.label("skybox", "<none>"),
        }
        changed
    }
}

/// Exponential distance fog.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Fog {
    /// Linear RGB fog color.
    pub color: [f32; 3],
    /// Extinction per world unit.
    pub density: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            color: [0.7; 3],
            density: 0.02,
        }
    }
}

impl Fog {
    /// The registry key of the type.
    pub const KEY: &'static str = "Fog";

    /// The registry description of `Fog`.
    pub fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Fog>(Self::KEY)
            .constructible()
            .serializable()
            .scene_component()
            .editor::<FogEditor>()
            .build()
    }
}

impl Persist for Fog {
    fn persist(&self, node: &mut DefinitionNode, _: &mut PersistContext<'_>) {
        node.set("color", self.color);
        node.set("density", self.density);
    }

    fn restore(node: &DefinitionNode, _: &mut RestoreContext) -> Result<Self, NodeError> {
        Ok(Self {
            color: node.vec3("color")?,
            density: node.f32("density")?,
        })
    }
}

/// Edits a [`Fog`].
#[derive(Debug, Default)]
pub struct FogEditor;

impl ObjectEditor for FogEditor {
    fn render(&self, ctx: &mut EditContext<'_>, value: &mut dyn Any) -> bool {
        let Some(fog) = value.downcast_mut::<Fog>() else {
            return false;
        };
        let ui = ctx.ui();
        ui.edit_vec3("color", &mut fog.color) | ui.edit_f32("density", &mut fog.density)
    }
}
