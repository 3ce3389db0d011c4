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

use std::fmt::{self, Write};

use strata_core::{editor::PropertyUi, EntityId};

/// A read-only [`PropertyUi`] that prints every control as an indented line.
///
/// Nothing is ever edited: every `edit_*` call reports `false`.
#[derive(Debug, Default)]
pub struct TextUi {
    out: String,
    depth: usize,
}

impl TextUi {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The text written so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Takes the text written so far, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        self.depth = 0;
        std::mem::take(&mut self.out)
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        // Writing into a String cannot fail.
        let _ = self.out.write_fmt(args);
        self.out.push('\n');
    }
}

impl PropertyUi for TextUi {
    fn heading(&mut self, text: &str) {
        self.line(format_args!("[{text}]"));
    }

    fn label(&mut self, label: &str, text: &str) {
        self.line(format_args!("{label}: {text}"));
    }

    fn begin_group(&mut self, label: &str) {
        self.line(format_args!("{label}:"));
        self.depth += 1;
    }

    fn end_group(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn edit_bool(&mut self, label: &str, value: &mut bool) -> bool {
        self.line(format_args!("{label}: {value}"));
        false
    }

    fn edit_f32(&mut self, label: &str, value: &mut f32) -> bool {
        self.line(format_args!("{label}: {value}"));
        false
    }

    fn edit_vec3(&mut self, label: &str, value: &mut [f32; 3]) -> bool {
        let [x, y, z] = *value;
        self.line(format_args!("{label}: ({x}, {y}, {z})"));
        false
    }

    fn edit_vec4(&mut self, label: &str, value: &mut [f32; 4]) -> bool {
        let [x, y, z, w] = *value;
        self.line(format_args!("{label}: ({x}, {y}, {z}, {w})"));
        false
    }

    fn edit_text(&mut self, label: &str, value: &mut String) -> bool {
        self.line(format_args!("{label}: {value:?}"));
        false
    }

    fn edit_choice(&mut self, label: &str, selected: &mut usize, options: &[&str]) -> bool {
        let choice = options.get(*selected).copied().unwrap_or("?");
        self.line(format_args!("{label}: {choice}"));
        false
    }

    fn edit_entity(&mut self, label: &str, value: &mut Option<EntityId>) -> bool {
        match value {
            Some(entity) => self.line(format_args!("{label}: entity {entity}")),
            None => self.line(format_args!("{label}: <none>")),
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_indent_their_controls() {
        let mut ui = TextUi::new();
        ui.heading("Collider");
        ui.begin_group("shape");
        ui.edit_f32("radius", &mut 0.5);
        ui.end_group();
        ui.edit_bool("is_trigger", &mut false);

        assert_eq!(
            ui.take(),
            "[Collider]\nshape:\n  radius: 0.5\nis_trigger: false\n"
        );
        assert!(ui.as_str().is_empty());
    }
}
