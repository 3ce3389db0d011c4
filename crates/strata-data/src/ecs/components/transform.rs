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

use std::any::Any;

use strata_core::{
    editor::{EditContext, ObjectEditor},
    scene::NodeError,
    DefinitionNode, EntityId,
};
use strata_macros::Component;

use crate::registry::{Persist, PersistContext, RestoreContext, TypeDescriptor};

const IDENTITY_ROTATION: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

const NAME: u8 = 1;
const TRANSLATION: u8 = 1 << 1;
const ROTATION: u8 = 1 << 2;
const SCALE: u8 = 1 << 3;

/// The optional fields a loaded definition wrote out explicitly.
#[derive(Debug, Clone, Copy, Default)]
struct Spelled(u8);

impl Spelled {
    fn of(node: &DefinitionNode) -> Self {
        let fields = [
            ("name", NAME),
            ("translation", TRANSLATION),
            ("rotation", ROTATION),
            ("scale", SCALE),
        ];
        Spelled(
            fields
                .into_iter()
                .filter(|(field, _)| node.get(field).is_some())
                .fold(0, |bits, (_, bit)| bits | bit),
        )
    }

    fn has(self, bit: u8) -> bool {
        self.0 & bit != 0
    }
}

/// A component that describes an entity's name, position, rotation and scale
/// relative to its `parent`. Without a parent it is relative to the world
/// origin.
#[derive(Debug, Clone, Component)]
pub struct Transform {
    /// A display name for the entity.
    pub name: String,
    /// The translation of the entity.
    pub translation: [f32; 3],
    /// The rotation of the entity, as an `[x, y, z, w]` quaternion.
    pub rotation: [f32; 4],
    /// The scale of the entity.
    pub scale: [f32; 3],
    /// The entity this transform is relative to.
    pub parent: Option<EntityId>,
    spelled: Spelled,
}

impl PartialEq for Transform {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.translation == other.translation
            && self.rotation == other.rotation
            && self.scale == other.scale
            && self.parent == other.parent
    }
}

impl Transform {
    /// The registry key of the type.
    pub const KEY: &'static str = "Transform";

    /// Creates a named identity transform.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns this transform with `parent` set.
    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// The registry description of `Transform`.
    pub fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Transform>(Self::KEY)
            .constructible()
            .serializable()
            .entity_component()
            .editor::<TransformEditor>()
            .build()
    }
}

impl Default for Transform {
    /// Returns the identity transform.
    fn default() -> Self {
        Self {
            name: String::new(),
            translation: [0.0; 3],
            rotation: IDENTITY_ROTATION,
            scale: [1.0; 3],
            parent: None,
            spelled: Spelled::default(),
        }
    }
}

// Fields equal to the identity are left out unless the loaded definition
// wrote them, so hand-written definitions survive a load/save cycle unchanged.
impl Persist for Transform {
    fn persist(&self, node: &mut DefinitionNode, ctx: &mut PersistContext<'_>) {
        let spelled = self.spelled;
        if !self.name.is_empty() || spelled.has(NAME) {
            node.set("name", self.name.as_str());
        }
        if self.translation != [0.0; 3] || spelled.has(TRANSLATION) {
            node.set("translation", self.translation);
        }
        if self.rotation != IDENTITY_ROTATION || spelled.has(ROTATION) {
            node.set("rotation", self.rotation);
        }
        if self.scale != [1.0; 3] || spelled.has(SCALE) {
            node.set("scale", self.scale);
        }
        if let Some(parent) = self.parent {
            ctx.write_entity(node, "parent", parent);
        }
    }

    fn restore(node: &DefinitionNode, ctx: &mut RestoreContext) -> Result<Self, NodeError> {
        let transform = Self {
            name: node.text_or("name", "")?.to_owned(),
            translation: node.floats_or("translation", [0.0; 3])?,
            rotation: node.floats_or("rotation", IDENTITY_ROTATION)?,
            scale: node.floats_or("scale", [1.0; 3])?,
            parent: None,
            spelled: Spelled::of(node),
        };
        ctx.read_entity::<Transform>(node, "parent", |t, parent| t.parent = Some(parent))?;
        Ok(transform)
    }
}

/// Edits a [`Transform`].
#[derive(Debug, Default)]
pub struct TransformEditor;

impl ObjectEditor for TransformEditor {
    fn render(&self, ctx: &mut EditContext<'_>, value: &mut dyn Any) -> bool {
        let Some(transform) = value.downcast_mut::<Transform>() else {
            return false;
        };
        let ui = ctx.ui();
        let mut changed = ui.edit_text("name", &mut transform.name);
        changed |= ui.edit_vec3("translation", &mut transform.translation);
        changed |= ui.edit_vec4("rotation", &mut transform.rotation);
        changed |= ui.edit_vec3("scale", &mut transform.scale);
        changed |= ui.edit_entity("parent", &mut transform.parent);
        changed
    }
}
