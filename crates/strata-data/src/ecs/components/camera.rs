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

//! Components attached to cameras rather than entities.

use std::any::Any;

use strata_core::{
    editor::{EditContext, ObjectEditor},
    scene::NodeError,
    DefinitionNode,
};
use strata_macros::Component;

use crate::registry::{Persist, PersistContext, RestoreContext, TypeDescriptor};

/// A perspective projection.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Projection {
    /// The vertical field of view, in degrees.
    pub fov_y_degrees: f32,
    /// The distance to the near clipping plane.
    pub near: f32,
    /// The distance to the far clipping plane.
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Projection {
    /// The registry key of the type.
    pub const KEY: &'static str = "Projection";

    /// The registry description of `Projection`.
    pub fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Projection>(Self::KEY)
            .constructible()
            .serializable()
            .camera_component()
            .editor::<ProjectionEditor>()
            .build()
    }
}

impl Persist for Projection {
    fn persist(&self, node: &mut DefinitionNode, _: &mut PersistContext<'_>) {
        node.set("fov_y_degrees", self.fov_y_degrees);
        node.set("near", self.near);
        node.set("far", self.far);
    }

    fn restore(node: &DefinitionNode, _: &mut RestoreContext) -> Result<Self, NodeError> {
        let projection = Self {
            fov_y_degrees: node.f32("fov_y_degrees")?,
            near: node.f32("near")?,
            far: node.f32("far")?,
        };
        if projection.near <= 0.0 || projection.far <= projection.near {
            return Err(NodeError::InvalidValue {
                key: node.key.clone(),
                field: "near".to_owned(),
                reason: format!(
                    "clip planes must satisfy 0 < near < far, got {} and {}",
                    projection.near, projection.far
                ),
            });
        }
        Ok(projection)
    }
}

/// Edits a [`Projection`].
#[derive(Debug, Default)]
pub struct ProjectionEditor;

impl ObjectEditor for ProjectionEditor {
    fn render(&self, ctx: &mut EditContext<'_>, value: &mut dyn Any) -> bool {
        let Some(projection) = value.downcast_mut::<Projection>() else {
            return false;
        };
        let ui = ctx.ui();
        let mut changed = ui.edit_f32("fov_y_degrees", &mut projection.fov_y_degrees);
        changed |= ui.edit_f32("near", &mut projection.near);
        changed |= ui.edit_f32("far", &mut projection.far);
        changed
    }
}

/// Manual exposure, as an EV100 value.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Exposure {
    /// Exposure value at ISO 100.
    pub ev100: f32,
}

impl Default for Exposure {
    fn default() -> Self {
        Self { ev100: 9.7 }
    }
}

impl Exposure {
    /// The registry key of the type.
    pub const KEY: &'static str = "Exposure";

    /// The registry description of `Exposure`.
    pub fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Exposure>(Self::KEY)
            .constructible()
            .serializable()
            .camera_component()
            .editor::<ExposureEditor>()
            .build()
    }
}

impl Persist for Exposure {
    fn persist(&self, node: &mut DefinitionNode, _: &mut PersistContext<'_>) {
        node.set("ev100", self.ev100);
    }

    fn restore(node: &DefinitionNode, _: &mut RestoreContext) -> Result<Self, NodeError> {
        Ok(Self {
            ev100: node.f32("ev100")?,
        })
    }
}

/// Edits an [`Exposure`].
#[derive(Debug, Default)]
pub struct ExposureEditor;

impl ObjectEditor for ExposureEditor {
    fn render(&self, ctx: &mut EditContext<'_>, value: &mut dyn Any) -> bool {
        match value.downcast_mut::<Exposure>() {
            Some(exposure) => ctx.ui().edit_f32("ev100", &mut exposure.ev100),
            None => false,
        }
    }
}
