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

//! The load pipeline: scene definition to live world.

use std::{collections::HashMap, fmt};

use strata_core::{
    asset::AssetSource,
    scene::{EntityReference, NodeError},
    AttachTarget, CameraId, DefinitionNode, EntityId, InstanceRef, TypeKey,
};
use strata_data::{
    ecs::World,
    registry::{AttachError, CapabilityRegistry, Channel, RestoreContext},
    scene::SceneDefinition,
};

use super::{ReferenceResolver, UnresolvedReference};

/// The stage a scene load is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// No load has started.
    #[default]
    Idle,
    /// Nodes are being constructed and attached.
    ConstructingNodes,
    /// Queued references are being patched.
    ResolvingReferences,
    /// Every reference resolved.
    Done,
    /// Some references stayed unresolved. Constructed nodes are kept.
    Failed,
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadPhase::Idle => "idle",
            LoadPhase::ConstructingNodes => "constructing nodes",
            LoadPhase::ResolvingReferences => "resolving references",
            LoadPhase::Done => "done",
            LoadPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A recoverable problem met during a load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    /// The node's type is not registered in this build; the node was skipped.
    UnknownType {
        /// The unknown key.
        key: TypeKey,
        /// Where the node would have been attached.
        target: AttachTarget,
    },
    /// The type is registered but cannot be restored onto this kind of container.
    UnsupportedTarget {
        /// The type's key.
        key: TypeKey,
        /// The container the node addressed.
        target: AttachTarget,
    },
    /// The node does not describe a valid instance of its type.
    MalformedNode {
        /// The type's key.
        key: TypeKey,
        /// The container the node addressed.
        target: AttachTarget,
        /// What was wrong with the node.
        error: NodeError,
    },
    /// Two entities of the tree share an id; the later one was skipped.
    DuplicateEntityId(EntityReference),
    /// The instance was built but could not be attached.
    AttachFailed {
        /// The type's key.
        key: TypeKey,
        /// The container the node addressed.
        target: AttachTarget,
        /// Why attaching failed.
        error: AttachError,
    },
    /// A reference field could not be patched back.
    UnresolvedReference(UnresolvedReference),
}

impl LoadEvent {
    /// A short name for the kind of event.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadEvent::UnknownType { .. } => "unknown type",
            LoadEvent::UnsupportedTarget { .. } => "unsupported target",
            LoadEvent::MalformedNode { .. } => "malformed node",
            LoadEvent::DuplicateEntityId(_) => "duplicate entity id",
            LoadEvent::AttachFailed { .. } => "attach failure",
            LoadEvent::UnresolvedReference(_) => "unresolved reference",
        }
    }

    /// The type key, entity id or reference the event is about.
    pub fn subject(&self) -> String {
        match self {
            LoadEvent::UnknownType { key, .. }
            | LoadEvent::UnsupportedTarget { key, .. }
            | LoadEvent::MalformedNode { key, .. }
            | LoadEvent::AttachFailed { key, .. } => key.to_string(),
            LoadEvent::DuplicateEntityId(id) => id.to_string(),
            LoadEvent::UnresolvedReference(unresolved) => unresolved.token.to_string(),
        }
    }
}

impl fmt::Display for LoadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadEvent::UnknownType { key, target } => {
                write!(f, "unknown type '{key}' on {target}, node skipped")
            }
            LoadEvent::UnsupportedTarget { key, target } => {
                write!(f, "'{key}' cannot be restored onto {target}")
            }
            LoadEvent::MalformedNode { key, target, error } => {
                write!(f, "malformed '{key}' node on {target}: {error}")
            }
            LoadEvent::DuplicateEntityId(id) => {
                write!(f, "entity id {id} is defined twice, later entity skipped")
            }
            LoadEvent::AttachFailed { key, target, error } => {
                write!(f, "could not attach '{key}' to {target}: {error}")
            }
            LoadEvent::UnresolvedReference(unresolved) => {
                write!(f, "unresolved reference {unresolved}")
            }
        }
    }
}

/// The outcome of a scene load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// The phase the load ended in.
    pub phase: LoadPhase,
    /// Every recoverable problem, in the order met.
    pub events: Vec<LoadEvent>,
    /// The live entity spawned for each tree id.
    pub entity_map: HashMap<EntityReference, EntityId>,
    /// The cameras spawned, in tree order.
    pub cameras: Vec<CameraId>,
    /// The number of instances constructed and attached.
    pub constructed: usize,
}

impl LoadReport {
    /// Returns `true` if the load finished with every reference resolved.
    pub fn is_done(&self) -> bool {
        self.phase == LoadPhase::Done
    }

    /// Returns `true` if the load met no problem at all.
    pub fn is_clean(&self) -> bool {
        self.is_done() && self.events.is_empty()
    }

    /// The references left unresolved.
    pub fn unresolved(&self) -> impl Iterator<Item = &UnresolvedReference> + '_ {
        self.events.iter().filter_map(|event| match event {
            LoadEvent::UnresolvedReference(unresolved) => Some(unresolved),
            _ => None,
        })
    }

    /// The live entity spawned for a tree id.
    pub fn entity(&self, id: EntityReference) -> Option<EntityId> {
        self.entity_map.get(&id).copied()
    }

    /// A one-paragraph account of the load, with counts and names per kind
    /// of problem.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Load {}: {} component(s) on {} entities and {} camera(s)",
            self.phase,
            self.constructed,
            self.entity_map.len(),
            self.cameras.len()
        );

        let mut kinds: Vec<(&'static str, Vec<String>)> = Vec::new();
        for event in &self.events {
            let subject = event.subject();
            match kinds.iter_mut().find(|(kind, _)| *kind == event.kind()) {
                Some((_, subjects)) => {
                    if !subjects.contains(&subject) {
                        subjects.push(subject);
                    }
                }
                None => kinds.push((event.kind(), vec![subject])),
            }
        }
        for (kind, subjects) in kinds {
            let count = self.events.iter().filter(|e| e.kind() == kind).count();
            summary.push_str(&format!("; {count} {kind}(s): {}", subjects.join(", ")));
        }
        summary
    }
}

/// Rebuilds a world from a scene definition.
///
/// A load walks `Idle → ConstructingNodes → ResolvingReferences` and ends in
/// `Done` or `Failed`. Per-node problems are recorded and skipped. Unresolved
/// references fail the load but nothing already constructed is undone.
pub struct SceneSpawner<'a> {
    registry: &'a CapabilityRegistry,
    assets: &'a dyn AssetSource,
    phase: LoadPhase,
}

impl<'a> SceneSpawner<'a> {
    /// Creates a spawner that builds types from `registry` and loads assets
    /// from `assets`.
    pub fn new(registry: &'a CapabilityRegistry, assets: &'a dyn AssetSource) -> Self {
        Self {
            registry,
            assets,
            phase: LoadPhase::Idle,
        }
    }

    /// The phase of the current or last load.
    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    /// Spawns the content of `definition` into `world`.
    pub fn spawn(&mut self, definition: &SceneDefinition, world: &mut World) -> LoadReport {
        let mut resolver = ReferenceResolver::new(self.assets);
        let mut report = LoadReport::default();

        self.enter(LoadPhase::ConstructingNodes);

        // Every entity exists before any node is built, so references can be
        // bound in any order.
        let mut targets: Vec<(AttachTarget, &[DefinitionNode])> = Vec::new();
        for entity in &definition.entities {
            if resolver.lookup(entity.id).is_some() {
                log::warn!("Entity id {} is defined twice, skipping", entity.id);
                report.events.push(LoadEvent::DuplicateEntityId(entity.id));
                continue;
            }
            let id = world.spawn();
            resolver.bind(entity.id, id);
            targets.push((AttachTarget::Entity(id), entity.components.as_slice()));
        }
        for camera in &definition.cameras {
            let id = world.spawn_camera(camera.name.as_str());
            report.cameras.push(id);
            targets.push((AttachTarget::Camera(id), camera.components.as_slice()));
        }
        targets.push((AttachTarget::Scene, definition.scene.as_slice()));

        for (target, nodes) in targets {
            for node in nodes {
                self.construct(node, target, world, &mut resolver, &mut report);
            }
        }

        self.enter(LoadPhase::ResolvingReferences);
        let outcome = resolver.resolve_all(world, self.registry);
        report.entity_map = resolver.bindings().clone();

        match outcome {
            Ok(_) => self.enter(LoadPhase::Done),
            Err(unresolved) => {
                report
                    .events
                    .extend(unresolved.0.into_iter().map(LoadEvent::UnresolvedReference));
                self.enter(LoadPhase::Failed);
            }
        }
        report.phase = self.phase;
        log::info!("{}", report.summary());
        report
    }

    fn enter(&mut self, phase: LoadPhase) {
        log::debug!("Scene load: {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    fn construct(
        &self,
        node: &DefinitionNode,
        target: AttachTarget,
        world: &mut World,
        resolver: &mut ReferenceResolver<'_>,
        report: &mut LoadReport,
    ) {
        let Some(descriptor) = self.registry.find(node.key.as_str()) else {
            log::warn!("Unknown type '{}' on {}, skipping node", node.key, target);
            report.events.push(LoadEvent::UnknownType {
                key: node.key.clone(),
                target,
            });
            return;
        };

        let unsupported = || LoadEvent::UnsupportedTarget {
            key: node.key.clone(),
            target,
        };
        if !descriptor.has(Channel::Serialization) || !descriptor.supports(target) {
            log::warn!("'{}' cannot be restored onto {}, skipping node", node.key, target);
            report.events.push(unsupported());
            return;
        }

        let mut ctx = RestoreContext::new(InstanceRef::new(descriptor.key(), target));
        let instance = match descriptor.deserialize(node, &mut ctx) {
            Some(Ok(instance)) => instance,
            Some(Err(error)) => {
                log::warn!("Malformed '{}' node on {}: {}", node.key, target, error);
                report.events.push(LoadEvent::MalformedNode {
                    key: node.key.clone(),
                    target,
                    error,
                });
                return;
            }
            None => {
                report.events.push(unsupported());
                return;
            }
        };

        match descriptor.attach(world, target, instance) {
            Ok(()) => {
                log::debug!("Constructed {} on {}", node.key, target);
                report.constructed += 1;
                resolver.enqueue_all(ctx.into_pending());
            }
            Err(error) => {
                log::warn!("Could not attach '{}' to {}: {}", node.key, target, error);
                report.events.push(LoadEvent::AttachFailed {
                    key: node.key.clone(),
                    target,
                    error,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_data::{
        assets::AssetCatalog,
        ecs::components::{Fog, Projection, Transform},
        scene::{CameraDefinition, EntityDefinition},
    };

    fn entity(id: u32, components: Vec<DefinitionNode>) -> EntityDefinition {
        EntityDefinition {
            id: EntityReference(id),
            components,
        }
    }

    #[test]
    fn phases_end_in_done_for_a_clean_tree() {
        let registry = CapabilityRegistry::with_builtins().unwrap();
        let catalog = AssetCatalog::new();
        let definition = SceneDefinition {
            entities: vec![entity(0, vec![DefinitionNode::new("Transform")])],
            cameras: vec![CameraDefinition {
                name: "Main".into(),
                components: vec![DefinitionNode::new("Projection")
                    .with("fov_y_degrees", 45.0)
                    .with("near", 0.5)
                    .with("far", 50.0)],
            }],
            scene: vec![DefinitionNode::new("Fog")
                .with("color", [0.5_f32; 3])
                .with("density", 0.1)],
        };
        let mut world = World::new();
        let mut spawner = SceneSpawner::new(&registry, &catalog);
        assert_eq!(spawner.phase(), LoadPhase::Idle);

        let report = spawner.spawn(&definition, &mut world);

        assert!(report.is_clean(), "{}", report.summary());
        assert_eq!(spawner.phase(), LoadPhase::Done);
        assert_eq!(report.constructed, 3);
        let camera = world.camera(report.cameras[0]).unwrap();
        assert_eq!(camera.name(), "Main");
        assert_eq!(camera.components().get::<Projection>().unwrap().far, 50.0);
        assert!(world.scene_components().contains::<Fog>());
        assert!(world.has::<Transform>(report.entity(EntityReference(0)).unwrap()));
    }

    #[test]
    fn duplicate_ids_skip_the_later_entity() {
        let registry = CapabilityRegistry::with_builtins().unwrap();
        let catalog = AssetCatalog::new();
        let definition = SceneDefinition {
            entities: vec![
                entity(3, vec![DefinitionNode::new("Transform").with("name", "first")]),
                entity(3, vec![DefinitionNode::new("Transform").with("name", "second")]),
            ],
            ..SceneDefinition::default()
        };
        let mut world = World::new();

        let report = SceneSpawner::new(&registry, &catalog).spawn(&definition, &mut world);

        assert_eq!(world.entity_count(), 1);
        assert_eq!(report.events, vec![LoadEvent::DuplicateEntityId(EntityReference(3))]);
        let first = report.entity(EntityReference(3)).unwrap();
        assert_eq!(world.get::<Transform>(first).unwrap().name, "first");
        assert!(report.is_done());
    }

    #[test]
    fn nodes_on_the_wrong_container_are_skipped() {
        let registry = CapabilityRegistry::with_builtins().unwrap();
        let catalog = AssetCatalog::new();
        let definition = SceneDefinition {
            entities: vec![entity(0, vec![DefinitionNode::new("Fog")])],
            scene: vec![DefinitionNode::new("Transform")],
            ..SceneDefinition::default()
        };
        let mut world = World::new();

        let report = SceneSpawner::new(&registry, &catalog).spawn(&definition, &mut world);

        assert_eq!(report.constructed, 0);
        assert_eq!(report.events.len(), 2);
        assert!(report
            .events
            .iter()
            .all(|e| matches!(e, LoadEvent::UnsupportedTarget { .. })));
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn malformed_nodes_abort_only_themselves() {
        let registry = CapabilityRegistry::with_builtins().unwrap();
        let catalog = AssetCatalog::new();
        let definition = SceneDefinition {
            entities: vec![entity(
                0,
                vec![
                    DefinitionNode::new("Transform").with("translation", "up"),
                    DefinitionNode::new("Light"),
                ],
            )],
            ..SceneDefinition::default()
        };
        let mut world = World::new();

        let report = SceneSpawner::new(&registry, &catalog).spawn(&definition, &mut world);

        assert_eq!(report.constructed, 1);
        assert!(matches!(
            &report.events[..],
            [LoadEvent::MalformedNode { key, .. }] if key == "Transform"
        ));
        assert!(report.is_done());
    }

    #[test]
    fn summary_names_each_problem() {
        let report = LoadReport {
            phase: LoadPhase::Done,
            events: vec![
                LoadEvent::UnknownType {
                    key: "Cloth".into(),
                    target: AttachTarget::Scene,
                },
                LoadEvent::UnknownType {
                    key: "Cloth".into(),
                    target: AttachTarget::Scene,
                },
                LoadEvent::DuplicateEntityId(EntityReference(2)),
            ],
            ..LoadReport::default()
        };

        let summary = report.summary();

        assert!(summary.starts_with("Load done"));
        assert!(summary.contains("2 unknown type(s): Cloth"));
        assert!(summary.contains("1 duplicate entity id(s): #2"));
    }
}
