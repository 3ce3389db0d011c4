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

use std::collections::HashMap;

use strata_core::{
    asset::{AssetHandle, UntypedAssetHandle},
    scene::{AssetReference, EntityReference, ReferenceToken, ResolveError},
    AttachTarget, EntityId, InstanceRef,
};
use strata_data::{
    assets::Font,
    ecs::{components::*, World},
    registry::{
        CapabilityRegistry, Channel, PersistContext, ReferenceExternalizer, Resolved,
        RestoreContext, SkippedField,
    },
};

/// Maps entities by index and assets by family name, for tests only.
#[derive(Default)]
struct Refs {
    entities: HashMap<EntityId, EntityReference>,
    skipped: Vec<SkippedField>,
}

impl ReferenceExternalizer for Refs {
    fn externalize_entity(&mut self, entity: EntityId) -> EntityReference {
        let next = EntityReference(self.entities.len() as u32);
        *self.entities.entry(entity).or_insert(next)
    }

    fn reference_entity(&self, entity: EntityId) -> Result<EntityReference, ResolveError> {
        self.entities
            .get(&entity)
            .copied()
            .ok_or(ResolveError::DanglingEntity(entity))
    }

    fn externalize_asset(
        &mut self,
        handle: &UntypedAssetHandle,
    ) -> Result<AssetReference, ResolveError> {
        match handle.typed::<Font>() {
            Some(font) => Ok(AssetReference::new(format!("fonts/{}", font.family))),
            None => Err(ResolveError::UnidentifiableAsset {
                type_name: handle.type_name(),
            }),
        }
    }

    fn record_skipped(&mut self, skipped: SkippedField) {
        self.skipped.push(skipped);
    }
}

fn owner(key: &str) -> InstanceRef {
    InstanceRef::new(key, AttachTarget::Scene)
}

#[test]
fn every_serializable_builtin_survives_a_round_trip() {
    // --- 1. SETUP ---
    let registry = CapabilityRegistry::with_builtins().unwrap();
    let mut refs = Refs::default();

    for descriptor in registry.all_with_capability(Channel::Serialization) {
        // --- 2. ACTION ---
        let instance = descriptor.construct_default().unwrap();
        let mut ctx = PersistContext::new(owner(descriptor.key().as_str()), &mut refs);
        let node = descriptor.serialize(&*instance, &mut ctx).unwrap();

        let mut restore = RestoreContext::new(owner(descriptor.key().as_str()));
        let restored = descriptor
            .deserialize(&node, &mut restore)
            .unwrap()
            .unwrap_or_else(|e| panic!("{} failed to restore: {e}", descriptor.key()));
        let mut ctx = PersistContext::new(owner(descriptor.key().as_str()), &mut refs);
        let again = descriptor.serialize(&*restored, &mut ctx).unwrap();

        // --- 3. ASSERTIONS ---
        assert_eq!(node.key, *descriptor.key());
        assert_eq!(node.canonical(), again.canonical(), "{}", descriptor.key());
        assert_eq!(restore.pending_len(), 0);
    }
    assert!(refs.skipped.is_empty());
}

#[test]
fn default_transform_persists_as_an_empty_node() {
    // --- 1. SETUP ---
    let registry = CapabilityRegistry::with_builtins().unwrap();
    let descriptor = registry.find(Transform::KEY).unwrap();
    let mut refs = Refs::default();

    // --- 2. ACTION ---
    let mut ctx = PersistContext::new(owner(Transform::KEY), &mut refs);
    let node = descriptor.serialize(&Transform::default(), &mut ctx).unwrap();

    // --- 3. ASSERTIONS ---
    assert!(node.is_empty());
}

#[test]
fn entity_and_asset_fields_are_deferred_then_applied() {
    // --- 1. SETUP ---
    let mut world = World::new();
    let parent = world.spawn();
    let child = world.spawn();
    let mut refs = Refs::default();
    refs.externalize_entity(parent);
    refs.externalize_entity(child);

    let font = AssetHandle::new(Font { family: "Mono".into() });
    let text = Text {
        font: Some(font.clone()),
        ..Text::new("hello")
    };
    let transform = Transform::named("child").with_parent(parent);

    let registry = CapabilityRegistry::with_builtins().unwrap();
    let mut ctx = PersistContext::new(owner(Transform::KEY), &mut refs);
    let transform_node = registry
        .find(Transform::KEY)
        .unwrap()
        .serialize(&transform, &mut ctx)
        .unwrap();
    let mut ctx = PersistContext::new(owner(Text::KEY), &mut refs);
    let text_node = registry
        .find(Text::KEY)
        .unwrap()
        .serialize(&text, &mut ctx)
        .unwrap();

    // --- 2. ACTION ---
    let mut restore = RestoreContext::new(owner(Transform::KEY));
    let mut restored = registry
        .find(Transform::KEY)
        .unwrap()
        .deserialize(&transform_node, &mut restore)
        .unwrap()
        .unwrap();
    let pending = restore.into_pending();

    let mut text_restore = RestoreContext::new(owner(Text::KEY));
    let mut restored_text = registry
        .find(Text::KEY)
        .unwrap()
        .deserialize(&text_node, &mut text_restore)
        .unwrap()
        .unwrap();
    let text_pending = text_restore.into_pending();

    // --- 3. ASSERTIONS ---
    assert_eq!(transform_node.entity("parent").unwrap(), Some(EntityReference(0)));
    assert_eq!(
        text_node.asset("font").unwrap().map(AssetReference::as_str),
        Some("fonts/Mono")
    );

    // Before the resolution pass the reference fields are unset.
    assert_eq!(restored.downcast_ref::<Transform>().unwrap().parent, None);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].field(), "parent");
    assert_eq!(pending[0].token(), &ReferenceToken::Entity(EntityReference(0)));

    for fixup in pending {
        fixup.apply(&mut *restored, Resolved::Entity(parent)).unwrap();
    }
    assert_eq!(
        restored.downcast_ref::<Transform>().unwrap(),
        &Transform::named("child").with_parent(parent)
    );

    assert_eq!(text_pending.len(), 1);
    for fixup in text_pending {
        fixup
            .apply(&mut *restored_text, Resolved::Asset(font.untyped()))
            .unwrap();
    }
    let restored_text = restored_text.downcast_ref::<Text>().unwrap();
    assert!(restored_text.font.as_ref().unwrap().ptr_eq(&font));
}

#[test]
fn a_mistyped_resolution_is_rejected() {
    // --- 1. SETUP ---
    let node = strata_core::DefinitionNode::new(Text::KEY)
        .with("content", "hi")
        .with("font", AssetReference::new("fonts/Mono"));
    let registry = CapabilityRegistry::with_builtins().unwrap();
    let mut restore = RestoreContext::new(owner(Text::KEY));
    let mut instance = registry
        .find(Text::KEY)
        .unwrap()
        .deserialize(&node, &mut restore)
        .unwrap()
        .unwrap();
    let mut pending = restore.into_pending();

    // --- 2. ACTION ---
    let wrong_kind = pending
        .pop()
        .unwrap()
        .apply(&mut *instance, Resolved::Entity(EntityId { index: 0, generation: 0 }));

    // --- 3. ASSERTIONS ---
    assert!(matches!(
        wrong_kind,
        Err(ResolveError::TokenKindMismatch { .. })
    ));
}

#[test]
fn references_outside_the_saved_world_are_skipped() {
    // --- 1. SETUP ---
    let mut world = World::new();
    let stranger = world.spawn();
    let mut refs = Refs::default();
    let binding = ScriptBinding {
        target: Some(stranger),
        ..ScriptBinding::default()
    };

    // --- 2. ACTION ---
    let registry = CapabilityRegistry::with_builtins().unwrap();
    let mut ctx = PersistContext::new(owner(ScriptBinding::KEY), &mut refs);
    let node = registry
        .find(ScriptBinding::KEY)
        .unwrap()
        .serialize(&binding, &mut ctx)
        .unwrap();

    // --- 3. ASSERTIONS ---
    assert!(node.get("target").is_none());
    assert_eq!(refs.skipped.len(), 1);
    assert_eq!(refs.skipped[0].field, "target");
    assert_eq!(
        refs.skipped[0].error,
        ResolveError::DanglingEntity(stranger)
    );
}
