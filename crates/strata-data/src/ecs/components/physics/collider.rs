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
    DefinitionNode,
};
use strata_macros::Component;

use crate::registry::{Persist, PersistContext, RestoreContext, TypeDescriptor};

/// The geometric shape of a collider.
///
/// Registered on its own as a constructible, editable value type so the
/// collider editor can hand it to the shape editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// A box, given by its half extents.
    Cuboid {
        /// Half the size of the box on each axis.
        half_extents: [f32; 3],
    },
    /// A sphere.
    Sphere {
        /// The sphere radius.
        radius: f32,
    },
    /// A capsule aligned with the Y axis.
    Capsule {
        /// Half the height of the cylindrical part.
        half_height: f32,
        /// The radius of the caps.
        radius: f32,
    },
}

impl Default for ColliderShape {
    fn default() -> Self {
        ColliderShape::Cuboid {
            half_extents: [0.5; 3],
        }
    }
}

impl ColliderShape {
    /// The registry key of the type.
    pub const KEY: &'static str = "ColliderShape";

    const NAMES: [&'static str; 3] = ["Cuboid", "Sphere", "Capsule"];

    fn index(&self) -> usize {
        match self {
            ColliderShape::Cuboid { .. } => 0,
            ColliderShape::Sphere { .. } => 1,
            ColliderShape::Capsule { .. } => 2,
        }
    }

    fn default_for(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::default()),
            1 => Some(ColliderShape::Sphere { radius: 0.5 }),
            2 => Some(ColliderShape::Capsule {
                half_height: 0.5,
                radius: 0.25,
            }),
            _ => None,
        }
    }

    /// The registry description of `ColliderShape`.
    pub fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<ColliderShape>(Self::KEY)
            .display_name("Collider Shape")
            .constructible()
            .serializable()
            .editor::<ColliderShapeEditor>()
            .build()
    }
}

impl Persist for ColliderShape {
    fn persist(&self, node: &mut DefinitionNode, _: &mut PersistContext<'_>) {
        node.set("kind", Self::NAMES[self.index()]);
        match *self {
            ColliderShape::Cuboid { half_extents } => node.set("half_extents", half_extents),
            ColliderShape::Sphere { radius } => node.set("radius", radius),
            ColliderShape::Capsule {
                half_height,
                radius,
            } => {
                node.set("half_height", half_height);
                node.set("radius", radius);
            }
        }
    }

    fn restore(node: &DefinitionNode, _: &mut RestoreContext) -> Result<Self, NodeError> {
        match node.text("kind")? {
            "Cuboid" => Ok(ColliderShape::Cuboid {
                half_extents: node.vec3("half_extents")?,
            }),
            "Sphere" => Ok(ColliderShape::Sphere {
                radius: node.f32("radius")?,
            }),
            "Capsule" => Ok(ColliderShape::Capsule {
                half_height: node.f32("half_height")?,
                radius: node.f32("radius")?,
            }),
            other => Err(NodeError::InvalidValue {
                key: node.key.clone(),
                field: "kind".to_owned(),
                reason: format!("unknown collider shape '{other}'"),
            }),
        }
    }
}

/// Edits a [`ColliderShape`]. Switching the kind resets the dimensions.
#[derive(Debug, Default)]
pub struct ColliderShapeEditor;

impl ObjectEditor for ColliderShapeEditor {
    fn render(&self, ctx: &mut EditContext<'_>, value: &mut dyn Any) -> bool {
        let Some(shape) = value.downcast_mut::<ColliderShape>() else {
            return false;
        };
        let ui = ctx.ui();
        let mut selected = shape.index();
        let mut changed = false;
        if ui.edit_choice("kind", &mut selected, &ColliderShape::NAMES) && selected != shape.index()
        {
            if let Some(replacement) = ColliderShape::default_for(selected) {
                *shape = replacement;
                changed = true;
            }
        }
        changed |= match shape {
            ColliderShape::Cuboid { half_extents } => ui.edit_vec3("half_extents", half_extents),
            ColliderShape::Sphere { radius } => ui.edit_f32("radius", radius),
            ColliderShape::Capsule {
                half_height,
                radius,
            } => ui.edit_f32("half_height", half_height) | ui.edit_f32("radius", radius),
        };
        changed
    }
}

/// A physics collider attached to an entity.
#[derive(Debug, Clone, PartialEq, Component)]
pub struct Collider {
    /// The collision shape.
    pub shape: ColliderShape,
    /// Triggers report overlaps but do not collide.
    pub is_trigger: bool,
    /// Friction coefficient.
    pub friction: f32,
    /// Restitution coefficient.
    pub restitution: f32,
}

impl Default for Collider {
    fn default() -> Self {
        Self {
            shape: ColliderShape::default(),
            is_trigger: false,
            friction: 0.5,
            restitution: 0.0,
        }
    }
}

impl Collider {
    /// The registry key of the type.
    pub const KEY: &'static str = "Collider";

    /// Creates a solid collider with default material values.
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            ..Self::default()
        }
    }

    /// The registry description of `Collider`.
    pub fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Collider>(Self::KEY)
            .constructible()
            .serializable()
            .entity_component()
            .editor::<ColliderEditor>()
            .build()
    }
}

impl Persist for Collider {
    fn persist(&self, node: &mut DefinitionNode, ctx: &mut PersistContext<'_>) {
        node.set("shape", self.shape.to_node(ColliderShape::KEY, ctx));
        node.set("is_trigger", self.is_trigger);
        node.set("friction", self.friction);
        node.set("restitution", self.restitution);
    }

    fn restore(node: &DefinitionNode, ctx: &mut RestoreContext) -> Result<Self, NodeError> {
        let shape_node = node.node("shape")?;
        shape_node.expect_key(ColliderShape::KEY)?;
        Ok(Self {
            shape: ColliderShape::restore(shape_node, ctx)?,
            is_trigger: node.bool_or("is_trigger", false)?,
            friction: node.f32_or("friction", 0.5)?,
            restitution: node.f32_or("restitution", 0.0)?,
        })
    }
}

/// Edits a [`Collider`]; the shape is delegated to its own editor.
#[derive(Debug, Default)]
pub struct ColliderEditor;

impl ObjectEditor for ColliderEditor {
    fn render(&self, ctx: &mut EditContext<'_>, value: &mut dyn Any) -> bool {
        let Some(collider) = value.downcast_mut::<Collider>() else {
            return false;
        };
        let mut changed = ctx.render_nested("shape", &mut collider.shape);
        let ui = ctx.ui();
        changed |= ui.edit_bool("is_trigger", &mut collider.is_trigger);
        changed |= ui.edit_f32("friction", &mut collider.friction);
        changed |= ui.edit_f32("restitution", &mut collider.restitution);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{AttachTarget, InstanceRef};

    #[test]
    fn shape_kind_is_required() {
        let node = DefinitionNode::new(Collider::KEY)
            .with("shape", DefinitionNode::new(ColliderShape::KEY).with("radius", 1.0f32));
        let mut ctx = RestoreContext::new(InstanceRef::new(Collider::KEY, AttachTarget::Scene));
        assert!(matches!(
            Collider::restore(&node, &mut ctx),
            Err(NodeError::MissingField { ref field, .. }) if field == "kind"
        ));
    }

    #[test]
    fn switching_kind_resets_dimensions() {
        assert_eq!(
            ColliderShape::default_for(1),
            Some(ColliderShape::Sphere { radius: 0.5 })
        );
        assert_eq!(ColliderShape::default_for(3), None);
    }
}
