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

//! The save walk: live world to scene definition.

use strata_core::{asset::AssetSource, AttachTarget, DefinitionNode, InstanceRef};
use strata_data::{
    ecs::World,
    registry::{
        CapabilityRegistry, Channel, PersistContext, ReferenceExternalizer, SkippedField,
        TypeDescriptor,
    },
    scene::{CameraDefinition, EntityDefinition, SceneDefinition},
};

use super::ReferenceResolver;

/// What a save left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveReport {
    /// Reference fields that could not be written.
    pub skipped: Vec<SkippedField>,
}

impl SaveReport {
    /// Returns `true` if every field was written.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Walks a world and emits its scene definition.
///
/// The walk is stateless and single-pass: every live entity gets a tree id
/// up front, so relations are written inline whatever the visiting order.
pub struct SceneCapture<'a> {
    registry: &'a CapabilityRegistry,
    assets: &'a dyn AssetSource,
}

impl<'a> SceneCapture<'a> {
    /// Creates a capture lane over `registry`, identifying assets through `assets`.
    pub fn new(registry: &'a CapabilityRegistry, assets: &'a dyn AssetSource) -> Self {
        Self { registry, assets }
    }

    /// Captures every entity, camera and scene component of `world`.
    pub fn capture(&self, world: &World) -> (SceneDefinition, SaveReport) {
        let mut resolver = ReferenceResolver::new(self.assets);
        let serializable: Vec<&TypeDescriptor> = self
            .registry
            .all_with_capability(Channel::Serialization)
            .collect();

        let ids: Vec<_> = world
            .iter_entities()
            .map(|entity| (entity, resolver.externalize_entity(entity)))
            .collect();

        let entities = ids
            .into_iter()
            .map(|(entity, id)| EntityDefinition {
                id,
                components: capture_target(
                    &serializable,
                    world,
                    AttachTarget::Entity(entity),
                    &mut resolver,
                ),
            })
            .collect();

        let cameras = world
            .iter_cameras()
            .map(|(id, camera)| CameraDefinition {
                name: camera.name().to_owned(),
                components: capture_target(
                    &serializable,
                    world,
                    AttachTarget::Camera(id),
                    &mut resolver,
                ),
            })
            .collect();

        let scene = capture_target(&serializable, world, AttachTarget::Scene, &mut resolver);

        let definition = SceneDefinition {
            entities,
            cameras,
            scene,
        };
        let report = SaveReport {
            skipped: resolver.take_skipped(),
        };
        log::info!(
            "Captured {} entities and {} cameras ({} nodes, {} skipped fields)",
            definition.entities.len(),
            definition.cameras.len(),
            definition.node_count(),
            report.skipped.len()
        );
        (definition, report)
    }
}

fn capture_target(
    serializable: &[&TypeDescriptor],
    world: &World,
    target: AttachTarget,
    resolver: &mut ReferenceResolver<'_>,
) -> Vec<DefinitionNode> {
    let mut nodes = Vec::new();
    for descriptor in serializable {
        let Some(instance) = descriptor.get(world, target) else {
            continue;
        };
        let owner = InstanceRef::new(descriptor.key(), target);
        let mut ctx = PersistContext::new(owner, &mut *resolver);
        if let Some(node) = descriptor.serialize(instance, &mut ctx) {
            log::debug!("Captured {} on {}", node.key, target);
            nodes.push(node);
        }
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{
        asset::AssetHandle,
        scene::{EntityReference, ResolveError},
    };
    use strata_data::{
        assets::{AssetCatalog, Font},
        ecs::components::{Fog, Projection, Text, Transform},
    };

    #[test]
    fn relations_are_written_with_pass_local_ids() {
        let registry = CapabilityRegistry::with_builtins().unwrap();
        let catalog = AssetCatalog::new();
        let mut world = World::new();
        let root = world.spawn_with((Transform::named("Root"),));
        world.spawn_with((Transform::named("Child").with_parent(root),));

        let (definition, report) = SceneCapture::new(&registry, &catalog).capture(&world);

        assert!(report.is_complete());
        assert_eq!(definition.entities.len(), 2);
        assert_eq!(definition.entities[0].id, EntityReference(0));
        let child = &definition.entities[1].components[0];
        assert_eq!(child.entity("parent").unwrap(), Some(EntityReference(0)));
    }

    #[test]
    fn cameras_and_scene_components_are_captured() {
        let registry = CapabilityRegistry::with_builtins().unwrap();
        let catalog = AssetCatalog::new();
        let mut world = World::new();
        let camera = world.spawn_camera("Main");
        world
            .camera_mut(camera)
            .unwrap()
            .components_mut()
            .insert(Projection::default());
        world.scene_components_mut().insert(Fog::default());

        let (definition, _) = SceneCapture::new(&registry, &catalog).capture(&world);

        assert!(definition.entities.is_empty());
        assert_eq!(definition.cameras[0].name, "Main");
        assert_eq!(definition.cameras[0].components[0].key, Projection::KEY);
        assert_eq!(definition.scene[0].key, Fog::KEY);
    }

    #[test]
    fn unidentifiable_assets_are_skipped_not_fatal() {
        let registry = CapabilityRegistry::with_builtins().unwrap();
        let catalog = AssetCatalog::new();
        let mut world = World::new();
        let label = Text {
            font: Some(AssetHandle::new(Font { family: "Generated".into() })),
            ..Text::new("score")
        };
        world.spawn_with((label,));

        let (definition, report) = SceneCapture::new(&registry, &catalog).capture(&world);

        let node = &definition.entities[0].components[0];
        assert_eq!(node.text("content").unwrap(), "score");
        assert!(node.get("font").is_none());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].field, "font");
        assert!(matches!(
            report.skipped[0].error,
            ResolveError::UnidentifiableAsset { .. }
        ));
    }
}
