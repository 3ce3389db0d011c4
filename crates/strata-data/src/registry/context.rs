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

//! Persistence hooks and the contexts they run in.
//!
//! Writing a component goes through a [`PersistContext`], which turns live
//! relations into reference tokens as they are visited. Reading one goes
//! through a [`RestoreContext`], which never resolves anything: every relation
//! becomes a [`PendingResolution`] applied after the whole tree exists.

use std::{
    any::{type_name, Any},
    fmt,
};

use strata_core::{
    asset::{Asset, AssetHandle, UntypedAssetHandle},
    scene::{AssetReference, EntityReference, NodeError, ReferenceToken, ResolveError},
    DefinitionNode, EntityId, InstanceRef, TypeKey,
};

/// A type that can be written to and rebuilt from a [`DefinitionNode`].
pub trait Persist: Any + Send + Sync + Sized {
    /// Writes the state of `self` into `node`.
    ///
    /// Reference-valued fields go through `ctx`; a reference that cannot be
    /// externalized is left out of the node.
    fn persist(&self, node: &mut DefinitionNode, ctx: &mut PersistContext<'_>);

    /// Rebuilds a value from `node`.
    ///
    /// Reference-valued fields are left at their defaults and queued on `ctx`.
    fn restore(node: &DefinitionNode, ctx: &mut RestoreContext) -> Result<Self, NodeError>;

    /// Writes `self` into a fresh node tagged with `key`.
    fn to_node(&self, key: impl Into<TypeKey>, ctx: &mut PersistContext<'_>) -> DefinitionNode {
        let mut node = DefinitionNode::new(key);
        self.persist(&mut node, ctx);
        node
    }
}

/// The save-side half of the reference resolver, as seen by persist hooks.
pub trait ReferenceExternalizer {
    /// Assigns or reuses the pass-local id of `entity`.
    fn externalize_entity(&mut self, entity: EntityId) -> EntityReference;

    /// Returns the id already assigned to `entity`.
    ///
    /// Fails with [`ResolveError::DanglingEntity`] for an entity that is not
    /// part of the world being saved.
    fn reference_entity(&self, entity: EntityId) -> Result<EntityReference, ResolveError>;

    /// Derives the persisted identifier of a shared asset.
    fn externalize_asset(
        &mut self,
        handle: &UntypedAssetHandle,
    ) -> Result<AssetReference, ResolveError>;

    /// Records a field that was left out of the saved tree.
    fn record_skipped(&mut self, skipped: SkippedField);
}

/// A reference field left out during a save.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedField {
    /// The instance that holds the field.
    pub owner: InstanceRef,
    /// The field name.
    pub field: String,
    /// Why the reference could not be written.
    pub error: ResolveError,
}

impl fmt::Display for SkippedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.owner, self.field, self.error)
    }
}

/// The context handed to [`Persist::persist`].
pub struct PersistContext<'a> {
    owner: InstanceRef,
    refs: &'a mut dyn ReferenceExternalizer,
}

impl<'a> PersistContext<'a> {
    /// Creates a context for writing `owner`.
    pub fn new(owner: InstanceRef, refs: &'a mut dyn ReferenceExternalizer) -> Self {
        Self { owner, refs }
    }

    /// The instance being written.
    pub fn owner(&self) -> &InstanceRef {
        &self.owner
    }

    /// The key of the type being written.
    pub fn key(&self) -> &TypeKey {
        &self.owner.key
    }

    /// Writes a relation to another entity, or skips the field if the entity
    /// is not part of the saved world.
    pub fn write_entity(&mut self, node: &mut DefinitionNode, field: &str, entity: EntityId) {
        match self.refs.reference_entity(entity) {
            Ok(reference) => node.set(field, reference),
            Err(error) => self.skip(field, error),
        }
    }

    /// Writes a relation to a shared asset, or skips the field if the asset
    /// has no stable identifier.
    pub fn write_asset<A: Asset>(
        &mut self,
        node: &mut DefinitionNode,
        field: &str,
        handle: &AssetHandle<A>,
    ) {
        match self.refs.externalize_asset(&handle.untyped()) {
            Ok(reference) => node.set(field, reference),
            Err(error) => self.skip(field, error),
        }
    }

    fn skip(&mut self, field: &str, error: ResolveError) {
        log::warn!("Skipping field '{}' of {}: {}", field, self.owner, error);
        self.refs.record_skipped(SkippedField {
            owner: self.owner.clone(),
            field: field.to_owned(),
            error,
        });
    }
}

/// A live value a reference token resolved to.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// A live entity.
    Entity(EntityId),
    /// A loaded asset.
    Asset(UntypedAssetHandle),
}

type Setter = Box<dyn FnOnce(&mut dyn Any, Resolved) -> Result<(), ResolveError> + Send>;

/// A deferred reference fix-up: once the token resolves, the setter writes the
/// live value into the field of the owning instance.
pub struct PendingResolution {
    owner: InstanceRef,
    field: String,
    token: ReferenceToken,
    setter: Setter,
}

impl PendingResolution {
    /// The instance holding the field.
    pub fn owner(&self) -> &InstanceRef {
        &self.owner
    }

    /// The field the token stands for.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The token to resolve.
    pub fn token(&self) -> &ReferenceToken {
        &self.token
    }

    /// Writes the resolved value into `instance`, which must be the owner.
    pub fn apply(self, instance: &mut dyn Any, value: Resolved) -> Result<(), ResolveError> {
        (self.setter)(instance, value)
    }
}

impl fmt::Debug for PendingResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingResolution")
            .field("owner", &self.owner)
            .field("field", &self.field)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

/// The context handed to [`Persist::restore`].
#[derive(Debug)]
pub struct RestoreContext {
    owner: InstanceRef,
    pending: Vec<PendingResolution>,
}

impl RestoreContext {
    /// Creates a context for rebuilding `owner`.
    pub fn new(owner: InstanceRef) -> Self {
        Self {
            owner,
            pending: Vec::new(),
        }
    }

    /// The instance being rebuilt.
    pub fn owner(&self) -> &InstanceRef {
        &self.owner
    }

    /// The key of the type being rebuilt.
    pub fn key(&self) -> &TypeKey {
        &self.owner.key
    }

    /// Queues an entity relation; `apply` runs once `reference` is bound.
    pub fn defer_entity<T: Any>(
        &mut self,
        field: &str,
        reference: EntityReference,
        apply: impl FnOnce(&mut T, EntityId) + Send + 'static,
    ) {
        let token = ReferenceToken::Entity(reference);
        let expected = token.clone();
        self.push(field, token, move |instance, value| {
            let target = downcast_owner::<T>(instance)?;
            match value {
                Resolved::Entity(id) => {
                    apply(target, id);
                    Ok(())
                }
                Resolved::Asset(_) => Err(ResolveError::TokenKindMismatch { token: expected }),
            }
        });
    }

    /// Queues an asset relation; `apply` runs once `reference` is loaded.
    pub fn defer_asset<T: Any, A: Asset>(
        &mut self,
        field: &str,
        reference: AssetReference,
        apply: impl FnOnce(&mut T, AssetHandle<A>) + Send + 'static,
    ) {
        let token = ReferenceToken::Asset(reference.clone());
        let expected = token.clone();
        self.push(field, token, move |instance, value| {
            let target = downcast_owner::<T>(instance)?;
            let handle = match value {
                Resolved::Asset(handle) => handle,
                Resolved::Entity(_) => {
                    return Err(ResolveError::TokenKindMismatch { token: expected })
                }
            };
            let typed = handle
                .typed::<A>()
                .ok_or_else(|| ResolveError::AssetTypeMismatch {
                    reference,
                    expected: type_name::<A>(),
                    found: handle.type_name(),
                })?;
            apply(target, typed);
            Ok(())
        });
    }

    /// Reads an optional entity reference from `node` and queues it.
    pub fn read_entity<T: Any>(
        &mut self,
        node: &DefinitionNode,
        field: &str,
        apply: impl FnOnce(&mut T, EntityId) + Send + 'static,
    ) -> Result<(), NodeError> {
        if let Some(reference) = node.entity(field)? {
            self.defer_entity(field, reference, apply);
        }
        Ok(())
    }

    /// Reads an optional asset reference from `node` and queues it.
    pub fn read_asset<T: Any, A: Asset>(
        &mut self,
        node: &DefinitionNode,
        field: &str,
        apply: impl FnOnce(&mut T, AssetHandle<A>) + Send + 'static,
    ) -> Result<(), NodeError> {
        if let Some(reference) = node.asset(field)? {
            self.defer_asset(field, reference.clone(), apply);
        }
        Ok(())
    }

    /// The number of queued fix-ups.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Hands the queued fix-ups over to the resolver.
    pub fn into_pending(self) -> Vec<PendingResolution> {
        self.pending
    }

    fn push(
        &mut self,
        field: &str,
        token: ReferenceToken,
        setter: impl FnOnce(&mut dyn Any, Resolved) -> Result<(), ResolveError> + Send + 'static,
    ) {
        self.pending.push(PendingResolution {
            owner: self.owner.clone(),
            field: field.to_owned(),
            token,
            setter: Box::new(setter),
        });
    }
}

fn downcast_owner<T: Any>(instance: &mut dyn Any) -> Result<&mut T, ResolveError> {
    instance
        .downcast_mut::<T>()
        .ok_or(ResolveError::OwnerTypeMismatch {
            expected: type_name::<T>(),
        })
}
