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

//! The generic object editing contract.
//!
//! An [`ObjectEditor`] knows how to present one concrete type. It draws through
//! a [`PropertyUi`], the only part of the widget toolkit visible here, and can
//! hand nested values back to whatever editors are registered through
//! [`EditContext::render_nested`].

use crate::EntityId;
use std::any::{Any, TypeId};

/// Labeled property controls provided by the widget toolkit.
///
/// Every `edit_*` call returns `true` when the user changed the value during
/// this call.
pub trait PropertyUi {
    /// Draws a section title.
    fn heading(&mut self, text: &str);
    /// Draws a read-only line.
    fn label(&mut self, label: &str, text: &str);
    /// Opens an indented group of controls.
    fn begin_group(&mut self, label: &str);
    /// Closes the group opened last.
    fn end_group(&mut self);
    /// A checkbox.
    fn edit_bool(&mut self, label: &str, value: &mut bool) -> bool;
    /// A scalar field.
    fn edit_f32(&mut self, label: &str, value: &mut f32) -> bool;
    /// A three-component vector field.
    fn edit_vec3(&mut self, label: &str, value: &mut [f32; 3]) -> bool;
    /// A four-component vector field, also used for RGBA colors and quaternions.
    fn edit_vec4(&mut self, label: &str, value: &mut [f32; 4]) -> bool;
    /// A single-line text field.
    fn edit_text(&mut self, label: &str, value: &mut String) -> bool;
    /// A drop-down over `options`; `selected` indexes into it.
    fn edit_choice(&mut self, label: &str, selected: &mut usize, options: &[&str]) -> bool;
    /// An entity picker.
    fn edit_entity(&mut self, label: &str, value: &mut Option<EntityId>) -> bool;
}

/// Presents and mutates values of one concrete type.
///
/// `value` is the instance under inspection. Editors downcast it and return
/// `false` without touching anything when it is not of their type.
pub trait ObjectEditor: Send + Sync {
    /// Draws the value and reports whether it was mutated.
    fn render(&self, ctx: &mut EditContext<'_>, value: &mut dyn Any) -> bool;
}

/// Builds a fresh editor for a registered type.
pub type EditorFactory = fn() -> Box<dyn ObjectEditor>;

/// Read-only editor lookup by concrete type.
pub trait EditorLookup {
    /// Returns the editor registered for `type_id`, if any.
    fn editor_for(&self, type_id: TypeId) -> Option<&dyn ObjectEditor>;
}

/// The state threaded through one render pass.
pub struct EditContext<'a> {
    ui: &'a mut dyn PropertyUi,
    editors: &'a dyn EditorLookup,
    depth: usize,
}

impl<'a> EditContext<'a> {
    /// Starts a render pass drawing into `ui`.
    pub fn new(ui: &'a mut dyn PropertyUi, editors: &'a dyn EditorLookup) -> Self {
        Self {
            ui,
            editors,
            depth: 0,
        }
    }

    /// The widget toolkit.
    pub fn ui(&mut self) -> &mut dyn PropertyUi {
        &mut *self.ui
    }

    /// How many nested editors enclose the one currently drawing.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Renders a nested value with its own registered editor, inside a group.
    ///
    /// Returns `false` and draws nothing when no editor is registered for the
    /// value's type. The lookup only reads the editor table, so editors may
    /// call this from inside their own `render`.
    pub fn render_nested(&mut self, label: &str, value: &mut dyn Any) -> bool {
        let editors = self.editors;
        let Some(editor) = editors.editor_for((*value).type_id()) else {
            return false;
        };

        self.ui.begin_group(label);
        self.depth += 1;
        let changed = editor.render(self, value);
        self.depth -= 1;
        self.ui.end_group();
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingUi {
        groups: Vec<String>,
    }

    impl PropertyUi for RecordingUi {
        fn heading(&mut self, _: &str) {}
        fn label(&mut self, _: &str, _: &str) {}
        fn begin_group(&mut self, label: &str) {
            self.groups.push(label.to_owned());
        }
        fn end_group(&mut self) {}
        fn edit_bool(&mut self, _: &str, _: &mut bool) -> bool {
            false
        }
        fn edit_f32(&mut self, _: &str, value: &mut f32) -> bool {
            *value += 1.0;
            true
        }
        fn edit_vec3(&mut self, _: &str, _: &mut [f32; 3]) -> bool {
            false
        }
        fn edit_vec4(&mut self, _: &str, _: &mut [f32; 4]) -> bool {
            false
        }
        fn edit_text(&mut self, _: &str, _: &mut String) -> bool {
            false
        }
        fn edit_choice(&mut self, _: &str, _: &mut usize, _: &[&str]) -> bool {
            false
        }
        fn edit_entity(&mut self, _: &str, _: &mut Option<EntityId>) -> bool {
            false
        }
    }

    struct Inner(f32);
    struct Outer(Inner);

    struct InnerEditor;
    impl ObjectEditor for InnerEditor {
        fn render(&self, ctx: &mut EditContext<'_>, value: &mut dyn Any) -> bool {
            let Some(inner) = value.downcast_mut::<Inner>() else {
                return false;
            };
            assert_eq!(ctx.depth(), 2);
            ctx.ui().edit_f32("value", &mut inner.0)
        }
    }

    struct OuterEditor;
    impl ObjectEditor for OuterEditor {
        fn render(&self, ctx: &mut EditContext<'_>, value: &mut dyn Any) -> bool {
            let Some(outer) = value.downcast_mut::<Outer>() else {
                return false;
            };
            assert_eq!(ctx.depth(), 1);
            ctx.render_nested("inner", &mut outer.0)
        }
    }

    struct Table;
    impl EditorLookup for Table {
        fn editor_for(&self, type_id: TypeId) -> Option<&dyn ObjectEditor> {
            if type_id == TypeId::of::<Inner>() {
                Some(&InnerEditor)
            } else if type_id == TypeId::of::<Outer>() {
                Some(&OuterEditor)
            } else {
                None
            }
        }
    }

    #[test]
    fn nested_values_reach_their_own_editor() {
        let mut ui = RecordingUi::default();
        let mut value = Outer(Inner(1.0));

        let mut ctx = EditContext::new(&mut ui, &Table);
        assert_eq!(ctx.depth(), 0);
        let changed = ctx.render_nested("outer", &mut value);
        assert_eq!(ctx.depth(), 0);

        assert!(changed);
        assert_eq!(value.0 .0, 2.0);
        assert_eq!(ui.groups, vec!["outer", "inner"]);
    }

    #[test]
    fn values_without_an_editor_are_left_alone() {
        let mut ui = RecordingUi::default();
        let mut value = 5u8;

        let changed = EditContext::new(&mut ui, &Table).render_nested("byte", &mut value);

        assert!(!changed);
        assert_eq!(value, 5);
        assert!(ui.groups.is_empty());
    }
}
