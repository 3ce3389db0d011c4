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

//! A compact strategy encoding the scene definition with bincode.

use bincode::config;
use strata_data::scene::SceneDefinition;

use super::{DeserializationError, SerializationError, SerializationStrategy};

/// Encodes scene definitions with bincode's standard configuration.
///
/// The payload is the same tree as the RON lane's, without field names or
/// whitespace, for the smallest files and the fastest loads.
#[derive(Debug, Default, Clone, Copy)]
pub struct BinarySerializationLane;

impl BinarySerializationLane {
    /// The identifier written to scene headers.
    pub const STRATEGY_ID: &'static str = "ST_DEFINITION_BIN_V1";

    /// Creates a new binary lane.
    pub fn new() -> Self {
        Self
    }
}

impl SerializationStrategy for BinarySerializationLane {
    fn get_strategy_id(&self) -> &'static str {
        Self::STRATEGY_ID
    }

    fn encode(&self, definition: &SceneDefinition) -> Result<Vec<u8>, SerializationError> {
        bincode::serde::encode_to_vec(definition, config::standard())
            .map_err(|e| SerializationError::ProcessingFailed(e.to_string()))
    }

    fn decode(&self, data: &[u8]) -> Result<SceneDefinition, DeserializationError> {
        let (definition, read): (SceneDefinition, usize) =
            bincode::serde::decode_from_slice(data, config::standard())
                .map_err(|e| DeserializationError::InvalidFormat(e.to_string()))?;
        if read != data.len() {
            return Err(DeserializationError::InvalidFormat(format!(
                "{} trailing byte(s) after the definition",
                data.len() - read
            )));
        }
        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_lane::DefinitionSerializationLane;
    use strata_core::{
        scene::{AssetReference, EntityReference},
        DefinitionNode, Value,
    };
    use strata_data::scene::{CameraDefinition, EntityDefinition};

    fn sample() -> SceneDefinition {
        SceneDefinition {
            entities: vec![EntityDefinition {
                id: EntityReference(7),
                components: vec![DefinitionNode::new("Text")
                    .with("content", "hello")
                    .with("size", 14.5)
                    .with("font", AssetReference::new("fonts/mono.ttf"))
                    .with(
                        "tags",
                        Value::List(vec![Value::Bool(true), Value::Int(-3)]),
                    )],
            }],
            cameras: vec![CameraDefinition {
                name: "Main".into(),
                components: vec![DefinitionNode::new("Exposure").with("ev100", 12.0)],
            }],
            scene: vec![],
        }
    }

    #[test]
    fn decodes_what_it_encodes() {
        let lane = BinarySerializationLane::new();
        let bytes = lane.encode(&sample()).unwrap();
        assert_eq!(lane.decode(&bytes).unwrap(), sample());
    }

    #[test]
    fn is_smaller_than_the_text_encoding() {
        let binary = BinarySerializationLane::new().encode(&sample()).unwrap();
        let text = DefinitionSerializationLane::new().encode(&sample()).unwrap();
        assert!(binary.len() < text.len());
    }

    #[test]
    fn truncated_and_padded_payloads_are_rejected() {
        let lane = BinarySerializationLane::new();
        let mut bytes = lane.encode(&sample()).unwrap();

        assert!(lane.decode(&bytes[..bytes.len() / 2]).is_err());
        bytes.push(0);
        assert!(matches!(
            lane.decode(&bytes),
            Err(DeserializationError::InvalidFormat(_))
        ));
    }
}
