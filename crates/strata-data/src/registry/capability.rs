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

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

use strata_core::{InstanceRef, TypeKey};
use thiserror::Error;

use crate::{
    ecs::{components::builtin_descriptors, World},
    registry::{submitted_descriptors, Channel, TypeDescriptor},
};

/// A registration-time conflict. These are programming errors and are fatal
/// for the process-wide registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Another type is already registered under this key.
    #[error("type key '{0}' is already registered")]
    DuplicateKey(TypeKey),
    /// The same Rust type is already registered under another key.
    #[error("type '{type_name}' is already registered as '{existing}'")]
    DuplicateType {
        /// The Rust type name.
        type_name: &'static str,
        /// The key it was first registered under.
        existing: TypeKey,
    },
    /// A registration arrived after the registry started answering lookups.
    #[error("registry is frozen; '{0}' was registered after the first lookup")]
    RegistryFrozen(TypeKey),
}

/// Maps type keys to [`TypeDescriptor`]s.
///
/// The registry has two phases. It is open while modules register their
/// types, and it freezes the first time it answers a lookup; from then on
/// every [`register`](Self::register) call fails with
/// [`RegistryError::RegistryFrozen`] and the mapping never changes again.
#[derive(Default)]
pub struct CapabilityRegistry {
    descriptors: Vec<TypeDescriptor>,
    by_key: HashMap<TypeKey, usize>,
    by_type: HashMap<TypeId, usize>,
    frozen: AtomicBool,
}

impl CapabilityRegistry {
    /// Creates an empty, open registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in component types.
    pub fn with_builtins() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for descriptor in builtin_descriptors() {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Creates a registry holding the built-in types followed by every
    /// module submission linked into the binary, sorted by key.
    pub fn with_submitted() -> Result<Self, RegistryError> {
        let mut registry = Self::with_builtins()?;
        for descriptor in submitted_descriptors() {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Registers a type.
    ///
    /// On error the registry is left exactly as it was.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<(), RegistryError> {
        if self.is_frozen() {
            return Err(RegistryError::RegistryFrozen(descriptor.key().clone()));
        }
        if self.by_key.contains_key(descriptor.key()) {
            return Err(RegistryError::DuplicateKey(descriptor.key().clone()));
        }
        if let Some(&index) = self.by_type.get(&descriptor.type_id()) {
            return Err(RegistryError::DuplicateType {
                type_name: descriptor.type_name(),
                existing: self.descriptors[index].key().clone(),
            });
        }

        log::debug!(
            "Registered '{}' [{}]",
            descriptor.key(),
            descriptor
                .channels()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let index = self.descriptors.len();
        self.by_key.insert(descriptor.key().clone(), index);
        self.by_type.insert(descriptor.type_id(), index);
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Closes the registry for registration.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    /// Returns `true` once the registry has answered a lookup.
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Looks a type up by key.
    pub fn find(&self, key: &str) -> Option<&TypeDescriptor> {
        self.freeze();
        self.by_key.get(key).map(|&i| &self.descriptors[i])
    }

    /// Looks a type up by its Rust `TypeId`.
    pub fn find_by_type_id(&self, type_id: TypeId) -> Option<&TypeDescriptor> {
        self.freeze();
        self.by_type.get(&type_id).map(|&i| &self.descriptors[i])
    }

    /// Returns `true` if `key` is registered and exposes `channel`.
    pub fn has_capability(&self, key: &str, channel: Channel) -> bool {
        self.find(key).is_some_and(|d| d.has(channel))
    }

    /// Every type exposing `channel`, in registration order.
    pub fn all_with_capability(
        &self,
        channel: Channel,
    ) -> impl Iterator<Item = &TypeDescriptor> + '_ {
        self.iter().filter(move |d| d.has(channel))
    }

    /// Every registered type, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> + '_ {
        self.freeze();
        self.descriptors.iter()
    }

    /// The number of registered types.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if no type is registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Mutably borrows the live instance an [`InstanceRef`] designates.
    pub fn instance_mut<'w>(
        &self,
        world: &'w mut World,
        instance: &InstanceRef,
    ) -> Option<&'w mut (dyn Any + Send + Sync)> {
        self.find(instance.key.as_str())?
            .get_mut(world, instance.target)
    }
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("descriptors", &self.descriptors)
            .field("frozen", &self.is_frozen())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Component;

    struct Alpha;
    impl Component for Alpha {}

    #[derive(Default)]
    struct Beta;
    impl Component for Beta {}

    fn alpha() -> TypeDescriptor {
        TypeDescriptor::builder::<Alpha>("Alpha")
            .entity_component()
            .build()
    }

    fn beta() -> TypeDescriptor {
        TypeDescriptor::builder::<Beta>("Beta")
            .constructible()
            .scene_component()
            .build()
    }

    #[test]
    fn duplicate_key_leaves_the_registry_unchanged() {
        let mut registry = CapabilityRegistry::new();
        registry.register(alpha()).unwrap();

        let clash = TypeDescriptor::builder::<Beta>("Alpha").build();
        assert_eq!(
            registry.register(clash),
            Err(RegistryError::DuplicateKey("Alpha".into()))
        );

        assert_eq!(registry.len(), 1);
        let found = registry.find("Alpha").unwrap();
        assert_eq!(found.type_id(), TypeId::of::<Alpha>());
        assert!(registry.find_by_type_id(TypeId::of::<Beta>()).is_none());
    }

    #[test]
    fn duplicate_type_is_rejected() {
        let mut registry = CapabilityRegistry::new();
        registry.register(alpha()).unwrap();

        let again = TypeDescriptor::builder::<Alpha>("AlphaAgain").build();
        assert!(matches!(
            registry.register(again),
            Err(RegistryError::DuplicateType { ref existing, .. }) if existing == "Alpha"
        ));
    }

    #[test]
    fn lookups_freeze_the_registry() {
        let mut registry = CapabilityRegistry::new();
        registry.register(alpha()).unwrap();
        assert!(!registry.is_frozen());

        assert!(registry.has_capability("Alpha", Channel::EntityComponent));
        assert!(!registry.has_capability("Alpha", Channel::SceneComponent));
        assert!(!registry.has_capability("Missing", Channel::EntityComponent));

        assert_eq!(
            registry.register(beta()),
            Err(RegistryError::RegistryFrozen("Beta".into()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn capability_listing_keeps_registration_order() {
        let mut registry = CapabilityRegistry::new();
        registry.register(beta()).unwrap();
        registry.register(alpha()).unwrap();

        let all: Vec<_> = registry.iter().map(|d| d.key().as_str()).collect();
        assert_eq!(all, ["Beta", "Alpha"]);

        let objects: Vec<_> = registry
            .all_with_capability(Channel::Object)
            .map(|d| d.key().as_str())
            .collect();
        assert_eq!(objects, ["Beta"]);
    }

    #[test]
    fn builtins_register_without_conflict() {
        let registry = CapabilityRegistry::with_builtins().unwrap();
        assert!(registry.has_capability("Transform", Channel::EntityComponent));
        assert!(registry.has_capability("Projection", Channel::CameraComponent));
        assert!(registry.has_capability("Environment", Channel::SceneComponent));
        assert!(registry.has_capability("ColliderShape", Channel::Object));
        assert!(!registry.has_capability("ColliderShape", Channel::EntityComponent));
        assert!(!registry.has_capability("ScriptBinding", Channel::Editor));
    }
}
