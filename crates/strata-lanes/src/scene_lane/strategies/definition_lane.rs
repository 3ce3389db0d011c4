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

//! A human-readable strategy encoding the scene definition as RON.

use ron::ser::PrettyConfig;
use strata_data::scene::SceneDefinition;

use super::{DeserializationError, SerializationError, SerializationStrategy};

/// Encodes scene definitions as pretty-printed RON.
///
/// Meant for long-term stability and debugging: field names are written
/// out, so files stay readable and diffable, and types unknown to a build
/// can still be parsed and skipped.
#[derive(Debug, Clone)]
pub struct DefinitionSerializationLane {
    indent: String,
    struct_names: bool,
}

impl Default for DefinitionSerializationLane {
    fn default() -> Self {
        Self {
            indent: "  ".to_owned(),
            struct_names: false,
        }
    }
}

impl DefinitionSerializationLane {
    /// The identifier written to scene headers.
    pub const STRATEGY_ID: &'static str = "ST_DEFINITION_RON_V1";

    /// Creates a lane with two-space indentation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the string used for one level of indentation.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Writes struct names in front of every struct when `true`.
    pub fn with_struct_names(mut self, struct_names: bool) -> Self {
        self.struct_names = struct_names;
        self
    }
}

impl SerializationStrategy for DefinitionSerializationLane {
    fn get_strategy_id(&self) -> &'static str {
        Self::STRATEGY_ID
    }

    fn encode(&self, definition: &SceneDefinition) -> Result<Vec<u8>, SerializationError> {
        let pretty_config = PrettyConfig::default()
            .indentor(self.indent.clone())
            .struct_names(self.struct_names);
        ron::ser::to_string_pretty(definition, pretty_config)
            .map(String::into_bytes)
            .map_err(|e| SerializationError::ProcessingFailed(e.to_string()))
    }

    fn decode(&self, data: &[u8]) -> Result<SceneDefinition, DeserializationError> {
        ron::de::from_bytes(data).map_err(|e| DeserializationError::InvalidFormat(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{scene::EntityReference, DefinitionNode};
    use strata_data::scene::EntityDefinition;

    fn sample() -> SceneDefinition {
        SceneDefinition {
            entities: vec![EntityDefinition {
                id: EntityReference(0),
                components: vec![DefinitionNode::new("Transform")
                    .with("name", "Root")
                    .with("translation", [1.0_f32, 2.0, 3.0])],
            }],
            ..SceneDefinition::default()
        }
    }

    #[test]
    fn output_is_readable_text() {
        let lane = DefinitionSerializationLane::new();

        let bytes = lane.encode(&sample()).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();

        assert!(text.contains("\"Transform\""));
        assert!(text.contains("\"Root\""));
        assert_eq!(lane.decode(&bytes).unwrap(), sample());
    }

    #[test]
    fn hand_written_definitions_parse() {
        let text = r#"(
            entities: [
                (id: 1, components: [
                    (key: "Transform", fields: [
                        (name: "name", value: Text("Child")),
                        (name: "parent", value: Entity(0)),
                    ]),
                ]),
                (id: 0, components: [(key: "Transform")]),
            ],
        )"#;

        let definition = DefinitionSerializationLane::new()
            .decode(text.as_bytes())
            .unwrap();

        assert_eq!(definition.entities.len(), 2);
        let child = &definition.entities[0].components[0];
        assert_eq!(child.entity("parent").unwrap(), Some(EntityReference(0)));
        assert!(definition.entities[1].components[0].is_empty());
    }

    #[test]
    fn garbage_is_an_invalid_format() {
        let result = DefinitionSerializationLane::new().decode(b"(entities: [oops");
        assert!(matches!(result, Err(DeserializationError::InvalidFormat(_))));
    }
}
