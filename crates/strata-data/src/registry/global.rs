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

//! The process-wide registry.
//!
//! Modules either submit a [`ComponentRegistration`] with
//! `inventory::submit!`, or call [`register`] during startup. The first call
//! to [`global`] builds the registry (built-in types, then submissions sorted
//! by key, then explicit registrations in call order) and freezes it for the
//! rest of the process.
//!
//! ```ignore
//! inventory::submit! {
//!     ComponentRegistration::new(Buoyancy::descriptor)
//! }
//! ```

use std::sync::{Mutex, OnceLock, PoisonError};

use crate::{
    ecs::components::builtin_descriptors,
    registry::{CapabilityRegistry, RegistryError, TypeDescriptor},
};

/// A module's registration of one type, collected at link time.
pub struct ComponentRegistration {
    describe: fn() -> TypeDescriptor,
}

impl ComponentRegistration {
    /// Wraps the function that describes the type.
    pub const fn new(describe: fn() -> TypeDescriptor) -> Self {
        Self { describe }
    }

    /// Builds the descriptor.
    pub fn describe(&self) -> TypeDescriptor {
        (self.describe)()
    }
}

inventory::collect!(ComponentRegistration);

/// Every submitted descriptor, sorted by key.
pub(crate) fn submitted_descriptors() -> Vec<TypeDescriptor> {
    let mut descriptors: Vec<TypeDescriptor> = inventory::iter::<ComponentRegistration>
        .into_iter()
        .map(ComponentRegistration::describe)
        .collect();
    descriptors.sort_by(|a, b| a.key().cmp(b.key()));
    descriptors
}

static OPEN: Mutex<Vec<TypeDescriptor>> = Mutex::new(Vec::new());
static GLOBAL: OnceLock<CapabilityRegistry> = OnceLock::new();

/// Registers a type with the process-wide registry.
///
/// Fails with [`RegistryError::DuplicateKey`] or
/// [`RegistryError::DuplicateType`] if the type clashes with a built-in, a
/// submission or an earlier registration. Must be called before the first
/// call to [`global`]; afterwards it fails with
/// [`RegistryError::RegistryFrozen`].
pub fn register(descriptor: TypeDescriptor) -> Result<(), RegistryError> {
    let mut open = OPEN.lock().unwrap_or_else(PoisonError::into_inner);
    if GLOBAL.get().is_some() {
        return Err(RegistryError::RegistryFrozen(descriptor.key().clone()));
    }

    let known = builtin_descriptors()
        .into_iter()
        .chain(submitted_descriptors())
        .chain(open.iter().cloned());
    for existing in known {
        if existing.key() == descriptor.key() {
            return Err(RegistryError::DuplicateKey(descriptor.key().clone()));
        }
        if existing.type_id() == descriptor.type_id() {
            return Err(RegistryError::DuplicateType {
                type_name: descriptor.type_name(),
                existing: existing.key().clone(),
            });
        }
    }
    open.push(descriptor);
    Ok(())
}

/// Builds (on first use) and returns the frozen process-wide registry.
pub fn try_global() -> Result<&'static CapabilityRegistry, RegistryError> {
    if let Some(registry) = GLOBAL.get() {
        return Ok(registry);
    }

    let open = OPEN.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(registry) = GLOBAL.get() {
        return Ok(registry);
    }

    let mut registry = CapabilityRegistry::with_submitted()?;
    for descriptor in open.iter() {
        registry.register(descriptor.clone())?;
    }
    registry.freeze();
    log::info!("Capability registry frozen with {} types", registry.len());

    Ok(GLOBAL.get_or_init(|| registry))
}

/// The frozen process-wide registry.
///
/// # Panics
///
/// Panics if two registrations conflict. A conflict is a build-time
/// programming error and startup cannot continue.
pub fn global() -> &'static CapabilityRegistry {
    match try_global() {
        Ok(registry) => registry,
        Err(error) => panic!("Capability registry setup failed: {error}"),
    }
}
