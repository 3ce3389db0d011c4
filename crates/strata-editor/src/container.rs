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

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
};

use strata_core::{
    editor::{EditContext, EditorFactory, EditorLookup, ObjectEditor, PropertyUi},
    InstanceRef, TypeKey,
};
use strata_data::{
    ecs::World,
    registry::{CapabilityRegistry, Channel},
};
use thiserror::Error;

/// An error raised while registering editors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// The type already has an editor.
    #[error("an editor is already registered for '{existing}' (while adding '{key}')")]
    DuplicateEditor {
        /// The key the rejected editor was added under.
        key: TypeKey,
        /// The key of the editor already registered for the type.
        existing: TypeKey,
    },
}

struct EditorEntry {
    key: TypeKey,
    display_name: String,
    editor: Box<dyn ObjectEditor>,
}

/// The editors of every editable type, keyed by concrete type.
///
/// Editors are added at startup, before any render pass. Rendering only
/// reads the table, so editors can render nested values through it.
#[derive(Default)]
pub struct ObjectEditorContainer {
    editors: HashMap<TypeId, EditorEntry>,
}

impl ObjectEditorContainer {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a container holding an editor for every type of `registry`
    /// that exposes one.
    pub fn from_registry(registry: &CapabilityRegistry) -> Result<Self, EditorError> {
        let mut container = Self::new();
        for descriptor in registry.all_with_capability(Channel::Editor) {
            let Some(factory) = descriptor.editor_factory() else {
                continue;
            };
            container.insert(
                descriptor.type_id(),
                descriptor.key().clone(),
                descriptor.display_name().to_owned(),
                factory,
            )?;
        }
        log::debug!("Editor container holds {} editors", container.len());
        Ok(container)
    }

    /// Registers the editor of the type identified by `type_id`.
    ///
    /// Fails with [`EditorError::DuplicateEditor`] if the type already has one.
    pub fn add_editor(
        &mut self,
        type_id: TypeId,
        key: impl Into<TypeKey>,
        factory: EditorFactory,
    ) -> Result<(), EditorError> {
        let key = key.into();
        let display_name = key.to_string();
        self.insert(type_id, key, display_name, factory)
    }

    /// Registers the editor of `T`.
    pub fn add_editor_for<T: Any>(
        &mut self,
        key: impl Into<TypeKey>,
        factory: EditorFactory,
    ) -> Result<(), EditorError> {
        self.add_editor(TypeId::of::<T>(), key, factory)
    }

    fn insert(
        &mut self,
        type_id: TypeId,
        key: TypeKey,
        display_name: String,
        factory: EditorFactory,
    ) -> Result<(), EditorError> {
        if let Some(existing) = self.editors.get(&type_id) {
            return Err(EditorError::DuplicateEditor {
                key,
                existing: existing.key.clone(),
            });
        }
        self.editors.insert(
            type_id,
            EditorEntry {
                key,
                display_name,
                editor: factory(),
            },
        );
        Ok(())
    }

    /// Returns `true` if the type has an editor.
    pub fn has_editor(&self, type_id: TypeId) -> bool {
        self.editors.contains_key(&type_id)
    }

    /// The title the type's editor is shown under.
    pub fn display_name(&self, type_id: TypeId) -> Option<&str> {
        self.editors
            .get(&type_id)
            .map(|entry| entry.display_name.as_str())
    }

    /// The number of registered editors.
    pub fn len(&self) -> usize {
        self.editors.len()
    }

    /// Returns `true` if no editor is registered.
    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    /// Renders `value` with the editor of its concrete type and reports
    /// whether it was mutated.
    ///
    /// Without an editor nothing is drawn and `false` is returned.
    pub fn render(&self, ui: &mut dyn PropertyUi, value: &mut dyn Any) -> bool {
        let Some(entry) = self.editors.get(&(*value).type_id()) else {
            return false;
        };
        ui.heading(&entry.display_name);
        let mut ctx = EditContext::new(ui, self);
        entry.editor.render(&mut ctx, value)
    }

    /// Renders the live instance `instance` designates, if it still exists.
    pub fn render_instance(
        &self,
        ui: &mut dyn PropertyUi,
        world: &mut World,
        registry: &CapabilityRegistry,
        instance: &InstanceRef,
    ) -> bool {
        match registry.instance_mut(world, instance) {
            Some(value) => self.render(ui, value),
            None => false,
        }
    }
}

impl EditorLookup for ObjectEditorContainer {
    fn editor_for(&self, type_id: TypeId) -> Option<&dyn ObjectEditor> {
        self.editors.get(&type_id).map(|entry| &*entry.editor)
    }
}

impl fmt::Debug for ObjectEditorContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.editors.values().map(|entry| &entry.key))
            .finish()
    }
}
