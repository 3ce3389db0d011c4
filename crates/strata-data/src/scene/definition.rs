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

//! Defines a stable, intermediate representation of a scene using serializable data types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strata_core::{scene::EntityReference, DefinitionNode, Value};

/// The root container for a scene's intermediate representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDefinition {
    /// All entities in the scene.
    pub entities: Vec<EntityDefinition>,
    /// All cameras in the scene.
    #[serde(default)]
    pub cameras: Vec<CameraDefinition>,
    /// The components attached to the scene itself.
    #[serde(default)]
    pub scene: Vec<DefinitionNode>,
}

/// A serializable representation of a single entity and its components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDefinition {
    /// The identifier of the entity, valid only within this definition.
    pub id: EntityReference,
    /// The components attached to the entity.
    #[serde(default)]
    pub components: Vec<DefinitionNode>,
}

/// A serializable representation of a camera and its components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDefinition {
    /// The display name of the camera.
    pub name: String,
    /// The components attached to the camera.
    #[serde(default)]
    pub components: Vec<DefinitionNode>,
}

impl SceneDefinition {
    /// The total number of component nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.entities.iter().map(|e| e.components.len()).sum::<usize>()
            + self.cameras.iter().map(|c| c.components.len()).sum::<usize>()
            + self.scene.len()
    }

    /// Returns a copy with every node in canonical field order.
    pub fn canonical(&self) -> SceneDefinition {
        let canonical = |nodes: &[DefinitionNode]| -> Vec<DefinitionNode> {
            nodes.iter().map(DefinitionNode::canonical).collect()
        };
        SceneDefinition {
            entities: self
                .entities
                .iter()
                .map(|e| EntityDefinition {
                    id: e.id,
                    components: canonical(&e.components),
                })
                .collect(),
            cameras: self
                .cameras
                .iter()
                .map(|c| CameraDefinition {
                    name: c.name.clone(),
                    components: canonical(&c.components),
                })
                .collect(),
            scene: canonical(&self.scene),
        }
    }

    /// Returns a copy where entity ids are renumbered by position and every
    /// entity reference rewritten accordingly, in canonical field order.
    ///
    /// Two trees with equal normalized forms have the same content and the
    /// same reference topology, whatever ids they were written with. A
    /// reference to an id the tree does not define is left as is.
    pub fn normalized(&self) -> SceneDefinition {
        let renumber: HashMap<EntityReference, EntityReference> = self
            .entities
            .iter()
            .enumerate()
            .map(|(position, e)| (e.id, EntityReference(position as u32)))
            .collect();

        let mut normalized = self.canonical();
        for entity in &mut normalized.entities {
            entity.id = renumber.get(&entity.id).copied().unwrap_or(entity.id);
        }

        let mut rewrite = |value: &mut Value| {
            if let Value::Entity(reference) = value {
                if let Some(new) = renumber.get(&*reference) {
                    *reference = *new;
                }
            }
        };
        let nodes = normalized
            .entities
            .iter_mut()
            .flat_map(|e| e.components.iter_mut())
            .chain(normalized.cameras.iter_mut().flat_map(|c| c.components.iter_mut()))
            .chain(normalized.scene.iter_mut());
        for node in nodes {
            node.visit_values_mut(&mut rewrite);
        }
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(name: &str, parent: Option<u32>) -> DefinitionNode {
        let node = DefinitionNode::new("Transform").with("name", name);
        match parent {
            Some(id) => node.with("parent", EntityReference(id)),
            None => node,
        }
    }

    fn tree(root: u32, child: u32) -> SceneDefinition {
        SceneDefinition {
            entities: vec![
                EntityDefinition {
                    id: EntityReference(child),
                    components: vec![transform("Child", Some(root))],
                },
                EntityDefinition {
                    id: EntityReference(root),
                    components: vec![transform("Root", None)],
                },
            ],
            ..SceneDefinition::default()
        }
    }

    #[test]
    fn normalization_ignores_id_values_but_keeps_topology() {
        assert_ne!(tree(0, 1), tree(7, 3));
        assert_eq!(tree(0, 1).normalized(), tree(7, 3).normalized());

        let normalized = tree(7, 3).normalized();
        assert_eq!(normalized.entities[0].id, EntityReference(0));
        assert_eq!(
            normalized.entities[0].components[0].entity("parent").unwrap(),
            Some(EntityReference(1))
        );
    }

    #[test]
    fn optional_sections_default_when_absent() {
        let text = "(entities: [(id: 0, components: [])])";
        let parsed: SceneDefinition = ron::de::from_str(text).unwrap();
        assert!(parsed.cameras.is_empty());
        assert!(parsed.scene.is_empty());
        assert_eq!(parsed.node_count(), 0);
    }
}
