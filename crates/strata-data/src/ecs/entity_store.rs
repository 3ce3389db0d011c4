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

//! Internal entity storage and ID management.

use crate::ecs::entity::EntityMetadata;
use strata_core::EntityId;

/// Internal manager for entity slots and metadata.
///
/// Slots are never removed. Despawning an entity empties its slot and pushes
/// the index on a free list; the next spawn reuses it with a bumped generation
/// so stale ids stop matching.
#[derive(Debug, Default)]
pub(crate) struct EntityStore {
    /// Every slot ever created, with the id currently bound to it. The
    /// metadata is `Some` only while the entity is alive.
    entities: Vec<(EntityId, Option<EntityMetadata>)>,
    /// Indices available for reuse.
    freed_entities: Vec<u32>,
}

impl EntityStore {
    /// Allocates a new or recycled `EntityId`.
    pub fn create_entity(&mut self) -> EntityId {
        if let Some(index) = self.freed_entities.pop() {
            let (id_slot, metadata_slot) = &mut self.entities[index as usize];
            id_slot.generation += 1;
            *metadata_slot = Some(EntityMetadata::default());
            *id_slot
        } else {
            let new_id = EntityId {
                index: self.entities.len() as u32,
                generation: 0,
            };
            self.entities.push((new_id, Some(EntityMetadata::default())));
            new_id
        }
    }

    /// Frees the slot of a live entity and returns its metadata.
    pub fn destroy_entity(&mut self, id: EntityId) -> Option<EntityMetadata> {
        let (slot_id, metadata) = self.entities.get_mut(id.index as usize)?;
        if *slot_id != id {
            return None;
        }
        let metadata = metadata.take()?;
        self.freed_entities.push(id.index);
        Some(metadata)
    }

    /// Returns an entity's metadata if the entity is alive.
    ///
    /// The generation of `id` must match the one currently bound to the slot.
    pub fn get_metadata(&self, id: EntityId) -> Option<&EntityMetadata> {
        self.entities
            .get(id.index as usize)
            .and_then(|(slot_id, meta)| {
                if slot_id.generation == id.generation {
                    meta.as_ref()
                } else {
                    None
                }
            })
    }

    /// Mutable variant of [`get_metadata`](Self::get_metadata).
    pub fn get_metadata_mut(&mut self, id: EntityId) -> Option<&mut EntityMetadata> {
        self.entities
            .get_mut(id.index as usize)
            .and_then(|(slot_id, meta)| {
                if slot_id.generation == id.generation {
                    meta.as_mut()
                } else {
                    None
                }
            })
    }

    /// Iterates over live entities in slot order.
    pub fn iter_alive(&self) -> impl Iterator<Item = (EntityId, &EntityMetadata)> + '_ {
        self.entities
            .iter()
            .filter_map(|(id, meta)| meta.as_ref().map(|m| (*id, m)))
    }

    /// The number of live entities.
    pub fn alive_count(&self) -> usize {
        self.entities.len() - self.freed_entities.len()
    }
}
