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
    asset::AssetHandle,
    editor::{EditContext, ObjectEditor},
    scene::NodeError,
    DefinitionNode,
};
use strata_macros::Component;

use crate::{
    assets::Font,
    registry::{Persist, PersistContext, RestoreContext, TypeDescriptor},
};

/// World-space text drawn at the entity's transform.
#[derive(Debug, Clone, PartialEq, Component)]
pub struct Text {
    /// The displayed string.
    pub content: String,
    /// Glyph height in world units.
    pub size: f32,
    /// Linear RGBA color.
    pub color: [f32; 4],
    /// The font, or the renderer's fallback font when `None`.
    pub font: Option<AssetHandle<Font>>,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            content: String::new(),
            size: 16.0,
            color: [1.0; 4],
            font: None,
        }
    }
}

impl Text {
    /// The registry key of the type.
    pub const KEY: &'static str = "Text";

    /// Creates a text component with the fallback font.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// The registry description of `Text`.
    pub fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Text>(Self::KEY)
            .constructible()
            .serializable()
            .entity_component()
            .editor::<TextEditor>()
            .build()
    }
}

impl Persist for Text {
    fn persist(&self, node: &mut DefinitionNode, ctx: &mut PersistContext<'_>) {
        node.set("content", self.content.as_str());
        node.set("size", self.size);
        node.set("color", self.color);
        if let Some(font) = &self.font {
            ctx.write_asset(node, "font", font);
        }
    }

    fn restore(node: &DefinitionNode, ctx: &mut RestoreContext) -> Result<Self, NodeError> {
        let text = Self {
            content: node.text("content")?.to_owned(),
            size: node.f32_or("size", 16.0)?,
            color: node.floats_or("color", [1.0; 4])?,
            font: None,
        };
        ctx.read_asset::<Text, Font>(node, "font", |text, font| text.font = Some(font))?;
        Ok(text)
    }
}

/// Edits a [`Text`]. The font is shown but picked through the asset browser.
#[derive(Debug, Default)]
pub struct TextEditor;

impl ObjectEditor for TextEditor {
    fn render(&self, ctx: &mut EditContext<'_>, value: &mut dyn Any) -> bool {
        let Some(text) = value.downcast_mut::<Text>() else {
            return false;
        };
        let ui = ctx.ui();
        let mut changed = ui.edit_text("content", &mut text.content);
        changed |= ui.edit_f32("size", &mut text.size);
        changed |= ui.edit_vec4("color", &mut text.color);
        let font = text.font.as_ref().map_or("<fallback>", |f| f.family.as_str());
        ui.label("font", font);
        changed
    }
}
