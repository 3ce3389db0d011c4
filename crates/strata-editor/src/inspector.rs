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

use strata_core::{editor::PropertyUi, AttachTarget, CameraId, EntityId};
use strata_data::{ecs::World, registry::CapabilityRegistry};

use crate::ObjectEditorContainer;

/// Renders every registered component attached to a container.
///
/// Components are visited in registration order. Each one is drawn by the
/// editor of its type; components without an editor are skipped silently.
pub struct Inspector<'a> {
    registry: &'a CapabilityRegistry,
    editors: &'a ObjectEditorContainer,
}

impl<'a> Inspector<'a> {
    /// Creates an inspector over the types of `registry` and their `editors`.
    pub fn new(registry: &'a CapabilityRegistry, editors: &'a ObjectEditorContainer) -> Self {
        Self { registry, editors }
    }

    /// Renders the components of `entity`. Returns `true` if any was mutated.
    pub fn inspect_entity(
        &self,
        ui: &mut dyn PropertyUi,
        world: &mut World,
        entity: EntityId,
    ) -> bool {
        self.inspect(ui, world, AttachTarget::Entity(entity))
    }

    /// Renders the components of `camera`. Returns `true` if any was mutated.
    pub fn inspect_camera(
        &self,
        ui: &mut dyn PropertyUi,
        world: &mut World,
        camera: CameraId,
    ) -> bool {
        self.inspect(ui, world, AttachTarget::Camera(camera))
    }

    /// Renders the scene components. Returns `true` if any was mutated.
    pub fn inspect_scene(&self, ui: &mut dyn PropertyUi, world: &mut World) -> bool {
        self.inspect(ui, world, AttachTarget::Scene)
    }

    fn inspect(&self, ui: &mut dyn PropertyUi, world: &mut World, target: AttachTarget) -> bool {
        let mut changed = false;
        for descriptor in self.registry.iter().filter(|d| d.supports(target)) {
            if let Some(instance) = descriptor.get_mut(world, target) {
                // Every editor runs, even after a change was reported.
                changed |= self.editors.render(ui, instance);
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextUi;
    use strata_core::editor::{EditContext, ObjectEditor};
    use strata_data::ecs::components::{Fog, Light, ScriptBinding, Transform};
    use std::any::{Any, TypeId};

    /// Nudges every light's intensity, to observe mutations.
    struct Dimmer;
    impl ObjectEditor for Dimmer {
        fn render(&self, _: &mut EditContext<'_>, value: &mut dyn Any) -> bool {
            match value.downcast_mut::<Light>() {
                Some(light) => {
                    light.intensity *= 0.5;
                    true
                }
                None => false,
            }
        }
    }

    #[test]
    fn every_editable_component_is_drawn() {
        let registry = CapabilityRegistry::with_builtins().unwrap();
        let editors = ObjectEditorContainer::from_registry(&registry).unwrap();
        let mut world = World::new();
        let entity = world.spawn_with((
            Transform::named("Lamp"),
            Light::default(),
            ScriptBinding::default(),
        ));
        let mut ui = TextUi::new();

        let inspector = Inspector::new(&registry, &editors);
        let changed = inspector.inspect_entity(&mut ui, &mut world, entity);

        assert!(!changed);
        let text = ui.take();
        assert!(text.contains("[Transform]"));
        assert!(text.contains("name: \"Lamp\""));
        assert!(text.contains("[Light]"));
        assert!(!text.contains("Script"));
    }

    #[test]
    fn mutations_are_reported_and_applied() {
        let registry = CapabilityRegistry::with_builtins().unwrap();
        let mut editors = ObjectEditorContainer::new();
        editors
            .add_editor(TypeId::of::<Light>(), "Light", || {
                Box::new(Dimmer) as Box<dyn ObjectEditor>
            })
            .unwrap();
        let mut world = World::new();
        let entity = world.spawn_with((Light {
            intensity: 8.0,
            ..Light::default()
        },));
        world.scene_components_mut().insert(Fog::default());
        let inspector = Inspector::new(&registry, &editors);
        let mut ui = TextUi::new();

        assert!(inspector.inspect_entity(&mut ui, &mut world, entity));
        assert!(!inspector.inspect_scene(&mut ui, &mut world));
        assert_eq!(world.get::<Light>(entity).unwrap().intensity, 4.0);
    }
}
