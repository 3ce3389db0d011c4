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

use strata_core::{AttachTarget, CameraId, EntityId};
use thiserror::Error;

use crate::ecs::{
    entity_store::EntityStore, Camera, Component, ComponentBundle, ComponentSet,
};

/// An error raised by a [`World`] operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldError {
    /// The entity does not exist or has been despawned.
    #[error("entity {0} is not alive")]
    EntityNotFound(EntityId),
    /// The camera does not exist.
    #[error("{0} does not exist")]
    CameraNotFound(CameraId),
}

/// The owner of every component value: entities, cameras and the scene.
///
/// The three kinds of container expose the same per-type operations through
/// [`ComponentSet`]; [`World::host`] and [`World::host_mut`] select one by
/// [`AttachTarget`].
#[derive(Debug, Default)]
pub struct World {
    entities: EntityStore,
    cameras: Vec<Camera>,
    scene: ComponentSet,
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns an entity with no component.
    pub fn spawn(&mut self) -> EntityId {
        self.entities.create_entity()
    }

    /// Spawns an entity carrying every component of `bundle`.
    pub fn spawn_with<B: ComponentBundle>(&mut self, bundle: B) -> EntityId {
        let id = self.entities.create_entity();
        if let Some(metadata) = self.entities.get_metadata_mut(id) {
            bundle.insert_into(&mut metadata.components);
        }
        id
    }

    /// Despawns an entity and drops its components.
    ///
    /// Returns `false` if the entity was not alive.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        self.entities.destroy_entity(id).is_some()
    }

    /// Returns `true` if `id` refers to a live entity.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.get_metadata(id).is_some()
    }

    /// Iterates over live entities in slot order.
    pub fn iter_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter_alive().map(|(id, _)| id)
    }

    /// The number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.alive_count()
    }

    /// Returns the component of type `T` on an entity.
    pub fn get<T: Component>(&self, id: EntityId) -> Option<&T> {
        self.entities.get_metadata(id)?.components.get::<T>()
    }

    /// Returns a mutable reference to the component of type `T` on an entity.
    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        self.entities.get_metadata_mut(id)?.components.get_mut::<T>()
    }

    /// Returns `true` if the entity is alive and carries a `T`.
    pub fn has<T: Component>(&self, id: EntityId) -> bool {
        self.get::<T>(id).is_some()
    }

    /// Adds or replaces a component on a live entity.
    pub fn add_component<T: Component>(
        &mut self,
        id: EntityId,
        component: T,
    ) -> Result<Option<T>, WorldError> {
        let metadata = self
            .entities
            .get_metadata_mut(id)
            .ok_or(WorldError::EntityNotFound(id))?;
        Ok(metadata.components.insert(component))
    }

    /// Removes a component from an entity.
    pub fn remove_component<T: Component>(&mut self, id: EntityId) -> Option<T> {
        self.entities
            .get_metadata_mut(id)?
            .components
            .remove::<T>()
    }

    /// Creates a new camera with no component.
    pub fn spawn_camera(&mut self, name: impl Into<String>) -> CameraId {
        let id = CameraId(self.cameras.len() as u32);
        self.cameras.push(Camera::new(name));
        id
    }

    /// Returns a camera by id.
    pub fn camera(&self, id: CameraId) -> Option<&Camera> {
        self.cameras.get(id.0 as usize)
    }

    /// Mutable variant of [`camera`](Self::camera).
    pub fn camera_mut(&mut self, id: CameraId) -> Option<&mut Camera> {
        self.cameras.get_mut(id.0 as usize)
    }

    /// Iterates over the cameras in creation order.
    pub fn iter_cameras(&self) -> impl Iterator<Item = (CameraId, &Camera)> + '_ {
        self.cameras
            .iter()
            .enumerate()
            .map(|(index, camera)| (CameraId(index as u32), camera))
    }

    /// The components attached to the scene itself.
    pub fn scene_components(&self) -> &ComponentSet {
        &self.scene
    }

    /// Mutable access to the scene's components.
    pub fn scene_components_mut(&mut self) -> &mut ComponentSet {
        &mut self.scene
    }

    /// The container addressed by `target`, if it exists.
    pub fn host(&self, target: AttachTarget) -> Option<&ComponentSet> {
        match target {
            AttachTarget::Entity(id) => self.entities.get_metadata(id).map(|m| &m.components),
            AttachTarget::Camera(id) => self.camera(id).map(Camera::components),
            AttachTarget::Scene => Some(&self.scene),
        }
    }

    /// Mutable variant of [`host`](Self::host).
    pub fn host_mut(&mut self, target: AttachTarget) -> Option<&mut ComponentSet> {
        match target {
            AttachTarget::Entity(id) => self
                .entities
                .get_metadata_mut(id)
                .map(|m| &mut m.components),
            AttachTarget::Camera(id) => self.camera_mut(id).map(Camera::components_mut),
            AttachTarget::Scene => Some(&mut self.scene),
        }
    }
}
