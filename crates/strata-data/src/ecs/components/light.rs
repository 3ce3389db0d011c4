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

//! Defines the Light component.
//!
//! The entity's `Transform` provides the position and orientation of the light.

use std::any::Any;

use strata_core::{
    editor::{EditContext, ObjectEditor},
    scene::NodeError,
    DefinitionNode,
};
use strata_macros::Component;

use crate::registry::{Persist, PersistContext, RestoreContext, TypeDescriptor};

/// The shape of the emitted light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightKind {
    /// Parallel rays, like the sun.
    #[default]
    Directional,
    /// Emits in every direction from a point.
    Point,
    /// Emits in a cone.
    Spot,
}

impl LightKind {
    const NAMES: [&'static str; 3] = ["Directional", "Point", "Spot"];
    const ALL: [LightKind; 3] = [LightKind::Directional, LightKind::Point, LightKind::Spot];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| Self::ALL[i])
    }
}

/// A component that adds a light source to an entity.
#[derive(Debug, Clone, PartialEq, Component)]
pub struct Light {
    /// The kind of light.
    pub kind: LightKind,
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Intensity multiplier.
    pub intensity: f32,
    /// Falloff distance of point and spot lights.
    pub range: f32,
    /// Whether the light casts shadows.
    pub cast_shadows: bool,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            kind: LightKind::Directional,
            color: [1.0; 3],
            intensity: 1.0,
            range: 10.0,
            cast_shadows: false,
        }
    }
}

impl Light {
    /// The registry key of the type.
    pub const KEY: &'static str = "Light";

    /// Creates a default light of the given kind.
    pub fn new(kind: LightKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// The registry description of `Light`.
    pub fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Light>(Self::KEY)
            .constructible()
            .serializable()
            .entity_component()
            .editor::<LightEditor>()
            .build()
    }
}

impl Persist for Light {
    fn persist(&self, node: &mut DefinitionNode, _: &mut PersistContext<'_>) {
        node.set("kind", self.kind.name());
        node.set("color", self.color);
        node.set("intensity", self.intensity);
        node.set("range", self.range);
        node.set("cast_shadows", self.cast_shadows);
    }

    fn restore(node: &DefinitionNode, _: &mut RestoreContext) -> Result<Self, NodeError> {
        let defaults = Self::default();
        let kind_name = node.text_or("kind", defaults.kind.name())?;
        let kind = LightKind::from_name(kind_name).ok_or_else(|| NodeError::InvalidValue {
            key: node.key.clone(),
            field: "kind".to_owned(),
            reason: format!("unknown light kind '{kind_name}'"),
        })?;
        Ok(Self {
            kind,
            color: node.floats_or("color", defaults.color)?,
            intensity: node.f32_or("intensity", defaults.intensity)?,
            range: node.f32_or("range", defaults.range)?,
            cast_shadows: node.bool_or("cast_shadows", defaults.cast_shadows)?,
        })
    }
}

/// Edits a [`Light`].
#[derive(Debug, Default)]
pub struct LightEditor;

impl ObjectEditor for LightEditor {
    fn render(&self, ctx: &mut EditContext<'_>, value: &mut dyn Any) -> bool {
        let Some(light) = value.downcast_mut::<Light>() else {
            return false;
        };
        let ui = ctx.ui();
        let mut selected = light.kind.index();
        let mut changed = false;
        if ui.edit_choice("kind", &mut selected, &LightKind::NAMES) {
            if let Some(kind) = LightKind::ALL.get(selected) {
                light.kind = *kind;
                changed = true;
            }
        }
        changed |= ui.edit_vec3("color", &mut light.color);
        changed |= ui.edit_f32("intensity", &mut light.intensity);
        if light.kind != LightKind::Directional {
            changed |= ui.edit_f32("range", &mut light.range);
        }
        changed |= ui.edit_bool("cast_shadows", &mut light.cast_shadows);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{AttachTarget, InstanceRef};

    #[test]
    fn test_light_default() {
        let light = Light::default();
        assert_eq!(light.kind, LightKind::Directional);
        assert!(!light.cast_shadows);
    }

    #[test]
    fn test_unknown_kind_is_malformed() {
        let node = DefinitionNode::new(Light::KEY).with("kind", "Area");
        let mut ctx = RestoreContext::new(InstanceRef::new(Light::KEY, AttachTarget::Scene));
        assert!(matches!(
            Light::restore(&node, &mut ctx),
            Err(NodeError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in LightKind::ALL {
            assert_eq!(LightKind::from_name(kind.name()), Some(kind));
        }
    }
}
