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

//! Converts between live relations and the reference tokens of a definition.

use std::{collections::HashMap, fmt, mem};

use strata_core::{
    asset::{AssetSource, AssetSourceError, UntypedAssetHandle},
    scene::{AssetReference, EntityReference, ReferenceToken, ResolveError},
    EntityId, InstanceRef,
};
use strata_data::{
    ecs::World,
    registry::{
        CapabilityRegistry, PendingResolution, ReferenceExternalizer, Resolved, SkippedField,
    },
};
use thiserror::Error;

/// A pending reference that could not be patched back.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedReference {
    /// The instance holding the field.
    pub owner: InstanceRef,
    /// The field the token stood for.
    pub field: String,
    /// The token that failed.
    pub token: ReferenceToken,
    /// Why it failed.
    pub error: ResolveError,
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} ({}): {}",
            self.owner, self.field, self.token, self.error
        )
    }
}

/// Every reference a resolution pass left unresolved.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} reference(s) left unresolved: {}", .0.len(), list(.0))]
pub struct UnresolvedReferences(pub Vec<UnresolvedReference>);

fn list(unresolved: &[UnresolvedReference]) -> String {
    unresolved
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The two-way mapping between live relations and reference tokens, scoped
/// to a single save or load pass.
///
/// On save it hands out pass-local entity ids and asks the asset source for
/// identifiers. On load it collects the fix-ups queued while nodes are
/// constructed and applies them all in [`resolve_all`](Self::resolve_all),
/// once every entity of the tree exists.
pub struct ReferenceResolver<'a> {
    assets: &'a dyn AssetSource,
    outgoing: HashMap<EntityId, EntityReference>,
    next_id: u32,
    incoming: HashMap<EntityReference, EntityId>,
    queue: Vec<PendingResolution>,
    skipped: Vec<SkippedField>,
}

impl<'a> ReferenceResolver<'a> {
    /// Creates a resolver for one pass over `assets`.
    pub fn new(assets: &'a dyn AssetSource) -> Self {
        Self {
            assets,
            outgoing: HashMap::new(),
            next_id: 0,
            incoming: HashMap::new(),
            queue: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Binds a tree id to the entity spawned for it.
    ///
    /// Returns `false`, leaving the first binding in place, if the id is
    /// already bound.
    pub fn bind(&mut self, reference: EntityReference, entity: EntityId) -> bool {
        if self.incoming.contains_key(&reference) {
            return false;
        }
        self.incoming.insert(reference, entity);
        true
    }

    /// The entity bound to a tree id.
    pub fn lookup(&self, reference: EntityReference) -> Option<EntityId> {
        self.incoming.get(&reference).copied()
    }

    /// The tree id to live entity bindings made so far.
    pub fn bindings(&self) -> &HashMap<EntityReference, EntityId> {
        &self.incoming
    }

    /// Queues a fix-up for the resolution pass.
    pub fn enqueue(&mut self, pending: PendingResolution) {
        self.queue.push(pending);
    }

    /// Queues several fix-ups for the resolution pass.
    pub fn enqueue_all(&mut self, pending: impl IntoIterator<Item = PendingResolution>) {
        self.queue.extend(pending);
    }

    /// The number of queued fix-ups.
    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    /// Takes the fields skipped while saving.
    pub fn take_skipped(&mut self) -> Vec<SkippedField> {
        mem::take(&mut self.skipped)
    }

    /// Drains the queue, writing each resolved value into its owner.
    ///
    /// A failure does not stop the pass: every remaining fix-up is still
    /// attempted, and all failures are returned together. Returns the number
    /// of fields patched on success.
    pub fn resolve_all(
        &mut self,
        world: &mut World,
        registry: &CapabilityRegistry,
    ) -> Result<usize, UnresolvedReferences> {
        let queue = mem::take(&mut self.queue);
        let mut loaded: HashMap<AssetReference, Result<UntypedAssetHandle, AssetSourceError>> =
            HashMap::new();
        let mut unresolved = Vec::new();
        let mut patched = 0;

        for pending in queue {
            let owner = pending.owner().clone();
            let field = pending.field().to_owned();
            let token = pending.token().clone();

            let result = self
                .resolve_token(&token, world, &mut loaded)
                .and_then(|value| {
                    let instance = registry
                        .instance_mut(world, &owner)
                        .ok_or_else(|| ResolveError::owner_missing(&owner))?;
                    pending.apply(instance, value)
                });

            match result {
                Ok(()) => patched += 1,
                Err(error) => {
                    log::warn!("Unresolved reference {}.{}: {}", owner, field, error);
                    unresolved.push(UnresolvedReference {
                        owner,
                        field,
                        token,
                        error,
                    });
                }
            }
        }

        log::debug!(
            "Resolution pass patched {} field(s), {} unresolved",
            patched,
            unresolved.len()
        );
        if unresolved.is_empty() {
            Ok(patched)
        } else {
            Err(UnresolvedReferences(unresolved))
        }
    }

    fn resolve_token(
        &self,
        token: &ReferenceToken,
        world: &World,
        loaded: &mut HashMap<AssetReference, Result<UntypedAssetHandle, AssetSourceError>>,
    ) -> Result<Resolved, ResolveError> {
        match token {
            ReferenceToken::Entity(reference) => self
                .lookup(*reference)
                .filter(|entity| world.is_alive(*entity))
                .map(Resolved::Entity)
                .ok_or(ResolveError::UnknownEntity(*reference)),
            ReferenceToken::Asset(reference) => {
                let handle = loaded
                    .entry(reference.clone())
                    .or_insert_with(|| self.assets.load_by_identifier(reference.as_str()))
                    .clone()
                    .map_err(|source| ResolveError::AssetUnavailable {
                        reference: reference.clone(),
                        source,
                    })?;
                Ok(Resolved::Asset(handle))
            }
        }
    }
}

impl ReferenceExternalizer for ReferenceResolver<'_> {
    fn externalize_entity(&mut self, entity: EntityId) -> EntityReference {
        if let Some(reference) = self.outgoing.get(&entity) {
            return *reference;
        }
        let reference = EntityReference(self.next_id);
        self.next_id += 1;
        self.outgoing.insert(entity, reference);
        reference
    }

    fn reference_entity(&self, entity: EntityId) -> Result<EntityReference, ResolveError> {
        self.outgoing
            .get(&entity)
            .copied()
            .ok_or(ResolveError::DanglingEntity(entity))
    }

    fn externalize_asset(
        &mut self,
        handle: &UntypedAssetHandle,
    ) -> Result<AssetReference, ResolveError> {
        self.assets
            .identifier_of(handle)
            .map(AssetReference::new)
            .ok_or(ResolveError::UnidentifiableAsset {
                type_name: handle.type_name(),
            })
    }

    fn record_skipped(&mut self, skipped: SkippedField) {
        self.skipped.push(skipped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{asset::AssetHandle, AttachTarget};
    use strata_data::{
        assets::{AssetCatalog, Font},
        ecs::components::{Text, Transform},
        registry::RestoreContext,
    };

    fn owner(key: &str, entity: EntityId) -> InstanceRef {
        InstanceRef::new(key, AttachTarget::Entity(entity))
    }

    #[test]
    fn entity_ids_are_assigned_once_per_pass() {
        let catalog = AssetCatalog::new();
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();
        let mut resolver = ReferenceResolver::new(&catalog);

        assert_eq!(resolver.externalize_entity(b), EntityReference(0));
        assert_eq!(resolver.externalize_entity(a), EntityReference(1));
        assert_eq!(resolver.externalize_entity(b), EntityReference(0));
        assert_eq!(resolver.reference_entity(a), Ok(EntityReference(1)));

        let fresh = ReferenceResolver::new(&catalog);
        assert_eq!(fresh.reference_entity(a), Err(ResolveError::DanglingEntity(a)));
    }

    #[test]
    fn procedural_assets_are_unidentifiable() {
        let catalog = AssetCatalog::new();
        let stored = catalog.insert_asset("fonts/serif.ttf", Font { family: "Serif".into() });
        let procedural = AssetHandle::new(Font { family: "Generated".into() });
        let mut resolver = ReferenceResolver::new(&catalog);

        assert_eq!(
            resolver.externalize_asset(&stored.untyped()),
            Ok(AssetReference::new("fonts/serif.ttf"))
        );
        assert!(matches!(
            resolver.externalize_asset(&procedural.untyped()),
            Err(ResolveError::UnidentifiableAsset { .. })
        ));
    }

    #[test]
    fn resolution_continues_past_failures() {
        let registry = CapabilityRegistry::with_builtins().unwrap();
        let catalog = AssetCatalog::new();
        let font = catalog.insert_asset("fonts/mono.ttf", Font { family: "Mono".into() });

        let mut world = World::new();
        let parent = world.spawn();
        let child = world.spawn_with((Transform::named("child"),));
        let label = world.spawn_with((Text::new("hp"),));

        let mut resolver = ReferenceResolver::new(&catalog);
        resolver.bind(EntityReference(0), parent);

        let mut ctx = RestoreContext::new(owner(Transform::KEY, child));
        ctx.defer_entity::<Transform>("parent", EntityReference(9), |t, p| t.parent = Some(p));
        resolver.enqueue_all(ctx.into_pending());

        let mut ctx = RestoreContext::new(owner(Text::KEY, label));
        ctx.defer_asset::<Text, Font>("font", AssetReference::new("fonts/mono.ttf"), |t, f| {
            t.font = Some(f)
        });
        resolver.enqueue_all(ctx.into_pending());

        let error = resolver.resolve_all(&mut world, &registry).unwrap_err();

        assert_eq!(error.0.len(), 1);
        assert_eq!(error.0[0].field, "parent");
        assert_eq!(error.0[0].token, ReferenceToken::Entity(EntityReference(9)));
        assert_eq!(error.0[0].error, ResolveError::UnknownEntity(EntityReference(9)));
        assert!(world.get::<Text>(label).unwrap().font.as_ref().unwrap().ptr_eq(&font));
        assert_eq!(resolver.pending_len(), 0);
    }

    #[test]
    fn a_missing_owner_is_reported() {
        let registry = CapabilityRegistry::with_builtins().unwrap();
        let catalog = AssetCatalog::new();
        let mut world = World::new();
        let target = world.spawn();
        let gone = world.spawn();

        let mut resolver = ReferenceResolver::new(&catalog);
        resolver.bind(EntityReference(0), target);
        let mut ctx = RestoreContext::new(owner(Transform::KEY, gone));
        ctx.defer_entity::<Transform>("parent", EntityReference(0), |t, p| t.parent = Some(p));
        resolver.enqueue_all(ctx.into_pending());
        world.despawn(gone);

        let error = resolver.resolve_all(&mut world, &registry).unwrap_err();
        assert!(matches!(error.0[0].error, ResolveError::OwnerMissing(_)));
    }

    #[test]
    fn a_tree_id_binds_only_once() {
        let catalog = AssetCatalog::new();
        let mut world = World::new();
        let first = world.spawn();
        let second = world.spawn();
        let mut resolver = ReferenceResolver::new(&catalog);

        assert!(resolver.bind(EntityReference(4), first));
        assert!(!resolver.bind(EntityReference(4), second));
        assert_eq!(resolver.lookup(EntityReference(4)), Some(first));
    }
}
