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

use anyhow::Result;
use strata_agents::SerializationAgent;
use strata_core::{editor::PropertyUi, scene::EntityReference, AttachTarget, EntityId, InstanceRef};
use strata_data::{
    assets::AssetCatalog,
    ecs::{
        components::{Collider, ColliderShape, Transform},
        World,
    },
    registry::CapabilityRegistry,
};
use strata_editor::{Inspector, ObjectEditorContainer, TextUi};
use tempfile::tempdir;

/// Doubles every scalar it is shown and records the groups it enters.
#[derive(Default)]
struct DoublingUi {
    groups: Vec<String>,
    depth: usize,
    max_depth: usize,
}

impl PropertyUi for DoublingUi {
    fn heading(&mut self, _: &str) {}
    fn label(&mut self, _: &str, _: &str) {}
    fn begin_group(&mut self, label: &str) {
        self.groups.push(label.to_owned());
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }
    fn end_group(&mut self) {
        self.depth -= 1;
    }
    fn edit_bool(&mut self, _: &str, _: &mut bool) -> bool {
        false
    }
    fn edit_f32(&mut self, _: &str, value: &mut f32) -> bool {
        *value *= 2.0;
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

#[test]
fn nested_editors_are_reached_through_the_container() {
    // --- 1. SETUP ---
    let registry = CapabilityRegistry::with_builtins().unwrap();
    let editors = ObjectEditorContainer::from_registry(&registry).unwrap();
    let mut world = World::new();
    let entity = world.spawn_with((Collider {
        shape: ColliderShape::Sphere { radius: 1.5 },
        friction: 0.25,
        ..Collider::default()
    },));
    let mut ui = DoublingUi::default();

    // --- 2. ACTION ---
    let changed = editors.render_instance(
        &mut ui,
        &mut world,
        &registry,
        &InstanceRef::new(Collider::KEY, AttachTarget::Entity(entity)),
    );

    // --- 3. ASSERTIONS ---
    assert!(changed);
    assert_eq!(ui.groups, vec!["shape".to_owned()]);
    assert_eq!(ui.max_depth, 1);
    assert_eq!(ui.depth, 0);
    let collider = world.get::<Collider>(entity).unwrap();
    assert_eq!(collider.shape, ColliderShape::Sphere { radius: 3.0 });
    assert_eq!(collider.friction, 0.5);
}

#[test]
fn stale_instances_render_nothing() {
    // --- 1. SETUP ---
    let registry = CapabilityRegistry::with_builtins().unwrap();
    let editors = ObjectEditorContainer::from_registry(&registry).unwrap();
    let mut world = World::new();
    let entity = world.spawn_with((Transform::named("Gone"),));
    world.despawn(entity);
    let mut ui = TextUi::new();

    // --- 2. ACTION ---
    let changed = editors.render_instance(
        &mut ui,
        &mut world,
        &registry,
        &InstanceRef::new(Transform::KEY, AttachTarget::Entity(entity)),
    );

    // --- 3. ASSERTIONS ---
    assert!(!changed);
    assert!(ui.as_str().is_empty());
}

#[test]
fn a_loaded_scene_can_be_inspected() -> Result<()> {
    // --- 1. SETUP ---
    let dir = tempdir()?;
    let path = dir.path().join("level.strata");
    let registry = CapabilityRegistry::with_builtins()?;
    let catalog = AssetCatalog::new();
    let agent = SerializationAgent::new(&registry, &catalog);

    let mut source = World::new();
    let root = source.spawn_with((Transform::named("Level"),));
    source.spawn_with((Transform::named("Door").with_parent(root),));
    agent.save(&path, &source)?;

    // --- 2. ACTION ---
    let mut world = World::new();
    let report = agent.load(&path, &mut world)?;
    let editors = ObjectEditorContainer::from_registry(&registry)?;
    let inspector = Inspector::new(&registry, &editors);
    let mut ui = TextUi::new();
    let door = report.entity(EntityReference(1)).unwrap();
    let level = report.entity(EntityReference(0)).unwrap();
    let changed = inspector.inspect_entity(&mut ui, &mut world, door);

    // --- 3. ASSERTIONS ---
    assert!(!changed);
    let text = ui.take();
    assert!(text.contains("name: \"Door\""));
    assert!(text.contains(&format!("parent: entity {level}")));
    Ok(())
}
